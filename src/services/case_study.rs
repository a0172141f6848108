use crate::error::{Error, Result};
use crate::models::body::{
    CaseStudyKey, CaseStudyPayload, ItemBody, CASE_STUDY_STEPS, CASE_STUDY_STEP_LABELS,
};
use crate::models::format::FormatTag;
use crate::models::item::AssessmentItem;

/// Orchestrates the six sequential sub-items of a case study (one per
/// clinical-judgment step). Each step is a classic single-best-answer
/// sub-item; delivery walks them 1..=6 in order, while authoring may jump
/// around freely, which is why the active step lives here and not on the
/// item.
pub struct CaseStudyOrchestrator {
    active_step: usize,
}

impl Default for CaseStudyOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseStudyOrchestrator {
    pub fn new() -> CaseStudyOrchestrator {
        CaseStudyOrchestrator { active_step: 1 }
    }

    /// 1-based step currently being authored.
    pub fn active_step(&self) -> usize {
        self.active_step
    }

    pub fn active_step_label(&self) -> &'static str {
        CASE_STUDY_STEP_LABELS[self.active_step - 1]
    }

    /// Jump to any step 1..=6; authoring is non-linear.
    pub fn go_to_step(&mut self, step: usize) -> Result<()> {
        check_step(step)?;
        self.active_step = step;
        Ok(())
    }

    pub fn next_step(&mut self) -> Result<()> {
        self.go_to_step(self.active_step + 1)
    }

    fn parts(item: &AssessmentItem) -> Result<(CaseStudyPayload, CaseStudyKey)> {
        match &item.body {
            ItemBody::CaseStudy { payload, key } => Ok((payload.clone(), key.clone())),
            other => Err(Error::FormatMismatch {
                expected: FormatTag::CaseStudy,
                actual: other.tag(),
            }),
        }
    }

    pub fn set_question(&self, item: AssessmentItem, text: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        payload.steps[self.active_step - 1].question = text.into();
        item.apply(ItemBody::CaseStudy { payload, key })
    }

    pub fn add_option(&self, item: AssessmentItem, text: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        payload.steps[self.active_step - 1].options.push(text.into());
        item.apply(ItemBody::CaseStudy { payload, key })
    }

    pub fn set_option(&self, item: AssessmentItem, index: usize, text: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        let options = &mut payload.steps[self.active_step - 1].options;
        let len = options.len();
        let slot = options
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = text.into();
        item.apply(ItemBody::CaseStudy { payload, key })
    }

    pub fn remove_option(&self, item: AssessmentItem, index: usize) -> Result<AssessmentItem> {
        let (mut payload, mut key) = Self::parts(&item)?;
        let step = self.active_step - 1;
        let options = &mut payload.steps[step].options;
        if index >= options.len() {
            return Err(Error::IndexOutOfRange { index, len: options.len() });
        }
        options.remove(index);
        key.correct[step] = super::editors::choice::shift_single(key.correct[step], index);
        item.apply(ItemBody::CaseStudy { payload, key })
    }

    pub fn select_answer(&self, item: AssessmentItem, index: usize) -> Result<AssessmentItem> {
        let (payload, mut key) = Self::parts(&item)?;
        let step = self.active_step - 1;
        let len = payload.steps[step].options.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        key.correct[step] = Some(index);
        item.apply(ItemBody::CaseStudy { payload, key })
    }

    /// Count of steps whose question text has been written; the publish
    /// validator requires all six.
    pub fn steps_completed(item: &AssessmentItem) -> Result<usize> {
        let (payload, _) = Self::parts(item)?;
        Ok(payload
            .steps
            .iter()
            .filter(|s| !s.question.trim().is_empty())
            .count())
    }
}

fn check_step(step: usize) -> Result<()> {
    if step < 1 || step > CASE_STUDY_STEPS {
        return Err(Error::IndexOutOfRange { index: step, len: CASE_STUDY_STEPS });
    }
    Ok(())
}
