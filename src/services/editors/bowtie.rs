use crate::error::{Error, Result};
use crate::models::body::{BowtieKey, BowtiePayload, ItemBody, PoolLimits};
use crate::models::format::FormatTag;
use crate::models::item::AssessmentItem;

use super::choice::{remove_at, set_at, shift_set};

/// The three named pools of a bow-tie item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BowtiePool {
    Findings,
    Condition,
    Actions,
}

/// Editor for bow-tie items: three independent option pools with per-pool
/// selection limits (platform default 2 findings / 1 condition / 2 actions,
/// configurable per item).
pub struct BowtieEditor;

impl BowtieEditor {
    fn parts(item: &AssessmentItem) -> Result<(BowtiePayload, BowtieKey)> {
        match &item.body {
            ItemBody::Bowtie { payload, key } => Ok((payload.clone(), key.clone())),
            other => Err(Error::FormatMismatch {
                expected: FormatTag::Bowtie,
                actual: other.tag(),
            }),
        }
    }

    pub fn add_option(item: AssessmentItem, pool: BowtiePool, text: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        pool_options_mut(&mut payload, pool).push(text.into());
        item.apply(ItemBody::Bowtie { payload, key })
    }

    pub fn set_option(item: AssessmentItem, pool: BowtiePool, index: usize, text: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        set_at(pool_options_mut(&mut payload, pool), index, text.into())?;
        item.apply(ItemBody::Bowtie { payload, key })
    }

    pub fn remove_option(item: AssessmentItem, pool: BowtiePool, index: usize) -> Result<AssessmentItem> {
        let (mut payload, mut key) = Self::parts(&item)?;
        remove_at(pool_options_mut(&mut payload, pool), index)?;
        let selections = pool_key_mut(&mut key, pool);
        *selections = shift_set(selections, index);
        item.apply(ItemBody::Bowtie { payload, key })
    }

    /// Toggle a pool selection, capped at the pool's limit.
    pub fn toggle_selection(item: AssessmentItem, pool: BowtiePool, index: usize) -> Result<AssessmentItem> {
        let (mut payload, mut key) = Self::parts(&item)?;
        let len = pool_options_mut(&mut payload, pool).len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let limit = pool_limit(&payload.limits, pool);
        let selections = pool_key_mut(&mut key, pool);
        if !selections.remove(&index) {
            if selections.len() >= limit {
                return Err(Error::SelectionLimit { limit });
            }
            selections.insert(index);
        }
        item.apply(ItemBody::Bowtie { payload, key })
    }

    /// Change the per-pool limits. Refused while any pool already holds more
    /// selections than its new limit.
    pub fn set_limits(item: AssessmentItem, limits: PoolLimits) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        for (pool, selected) in [
            (BowtiePool::Findings, key.findings.len()),
            (BowtiePool::Condition, key.condition.len()),
            (BowtiePool::Actions, key.actions.len()),
        ] {
            let limit = pool_limit(&limits, pool);
            if selected > limit {
                return Err(Error::SelectionLimit { limit });
            }
        }
        payload.limits = limits;
        item.apply(ItemBody::Bowtie { payload, key })
    }
}

fn pool_options_mut(payload: &mut BowtiePayload, pool: BowtiePool) -> &mut Vec<String> {
    match pool {
        BowtiePool::Findings => &mut payload.findings,
        BowtiePool::Condition => &mut payload.conditions,
        BowtiePool::Actions => &mut payload.actions,
    }
}

fn pool_key_mut(key: &mut BowtieKey, pool: BowtiePool) -> &mut std::collections::BTreeSet<usize> {
    match pool {
        BowtiePool::Findings => &mut key.findings,
        BowtiePool::Condition => &mut key.condition,
        BowtiePool::Actions => &mut key.actions,
    }
}

fn pool_limit(limits: &PoolLimits, pool: BowtiePool) -> usize {
    match pool {
        BowtiePool::Findings => limits.findings,
        BowtiePool::Condition => limits.condition,
        BowtiePool::Actions => limits.actions,
    }
}
