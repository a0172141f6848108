use std::collections::BTreeSet;

use crate::models::body::{Token, TokenKind};

/// Parse highlight-text markup into a token sequence. `[...]` marks a
/// correct candidate, `{...}` a distractor candidate; everything else is a
/// plain, non-clickable span. An unterminated bracket is kept as literal
/// text so a half-typed markup never eats the rest of the document; empty
/// brackets are dropped.
pub fn parse_markup(source: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut plain = String::new();
    let mut chars = source.char_indices();

    fn flush_plain(plain: &mut String, tokens: &mut Vec<Token>) {
        if !plain.is_empty() {
            tokens.push(Token { text: std::mem::take(plain), kind: TokenKind::Plain });
        }
    }

    while let Some((pos, c)) = chars.next() {
        let (close, kind) = match c {
            '[' => (']', TokenKind::Correct),
            '{' => ('}', TokenKind::Distractor),
            _ => {
                plain.push(c);
                continue;
            }
        };

        let rest = &source[pos + c.len_utf8()..];
        match rest.find(close) {
            Some(end) => {
                let inner = &rest[..end];
                flush_plain(&mut plain, &mut tokens);
                if !inner.is_empty() {
                    tokens.push(Token { text: inner.to_string(), kind });
                }
                // Skip past the delimited span, closing bracket included.
                for _ in 0..inner.chars().count() + 1 {
                    chars.next();
                }
            }
            None => plain.push(c),
        }
    }
    flush_plain(&mut plain, &mut tokens);
    tokens
}

/// Indices of correct tokens in the clickable index space: only clickable
/// tokens count, in document order, plain spans excluded.
pub fn derive_answer_key(tokens: &[Token]) -> BTreeSet<usize> {
    tokens
        .iter()
        .filter(|t| t.is_clickable())
        .enumerate()
        .filter(|(_, t)| t.kind == TokenKind::Correct)
        .map(|(idx, _)| idx)
        .collect()
}

pub fn clickable_count(tokens: &[Token]) -> usize {
    tokens.iter().filter(|t| t.is_clickable()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_markup_tokenizes_in_document_order() {
        let tokens = parse_markup("The patient has [hypertension] and {hypotension}.");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Plain,
                TokenKind::Correct,
                TokenKind::Plain,
                TokenKind::Distractor,
                TokenKind::Plain,
            ]
        );
        assert_eq!(tokens[1].text, "hypertension");
        assert_eq!(tokens[3].text, "hypotension");
        assert_eq!(derive_answer_key(&tokens), BTreeSet::from([0]));
        assert_eq!(clickable_count(&tokens), 2);
    }

    #[test]
    fn unterminated_bracket_stays_literal() {
        let tokens = parse_markup("watch for [brady");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Plain);
        assert_eq!(tokens[0].text, "watch for [brady");
    }

    #[test]
    fn empty_brackets_are_dropped() {
        let tokens = parse_markup("a [] b {}");
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Plain));
    }

    #[test]
    fn multibyte_text_round_trips() {
        let tokens = parse_markup("Gabe von [5 µg] möglich");
        assert_eq!(tokens[1].text, "5 µg");
        assert_eq!(tokens[1].kind, TokenKind::Correct);
    }
}
