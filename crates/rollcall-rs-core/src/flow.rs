//! The fixed intake sequence as an explicit state machine.
//!
//! States are the steps of a [`FlowPlan`]; [`advance`] is the transition
//! table (current step × input shape → outcome). There are no branches,
//! skips, or timeout-driven transitions.

use crate::record::{DraftRecord, Field};
use crate::texts;
use rollcall_rs_protocol::ContactShare;

/// Identifier for a step in the intake sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    School,
    Grade,
    FullName,
    Phone,
}

/// Input shape a step accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape {
    /// Free-form text reply.
    Text,
    /// Structured contact share.
    Contact,
}

/// One prompt in the fixed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSpec {
    pub id: StepId,
    pub field: Field,
    pub prompt: &'static str,
    pub expects: InputShape,
}

const BASE_STEPS: &[StepSpec] = &[
    StepSpec {
        id: StepId::School,
        field: Field::School,
        prompt: texts::PROMPT_SCHOOL,
        expects: InputShape::Text,
    },
    StepSpec {
        id: StepId::Grade,
        field: Field::Grade,
        prompt: texts::PROMPT_GRADE,
        expects: InputShape::Text,
    },
    StepSpec {
        id: StepId::FullName,
        field: Field::FullName,
        prompt: texts::PROMPT_FULL_NAME,
        expects: InputShape::Text,
    },
];

const PHONE_STEP: StepSpec = StepSpec {
    id: StepId::Phone,
    field: Field::Phone,
    prompt: texts::PROMPT_PHONE,
    expects: InputShape::Contact,
};

/// The ordered step list for the active flow variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowPlan {
    steps: Vec<StepSpec>,
}

impl FlowPlan {
    /// Build the plan; `collect_phone` appends the contact step.
    pub fn new(collect_phone: bool) -> Self {
        let mut steps = BASE_STEPS.to_vec();
        if collect_phone {
            steps.push(PHONE_STEP);
        }
        Self { steps }
    }

    /// All steps in order.
    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    /// The step at the given cursor, if the cursor is in range.
    pub fn step(&self, cursor: usize) -> Option<&StepSpec> {
        self.steps.get(cursor)
    }

    /// Number of steps in this variant.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the plan collects the given field.
    pub fn requires(&self, field: Field) -> bool {
        self.steps.iter().any(|step| step.field == field)
    }
}

/// Input offered to the current step.
#[derive(Debug, Clone, Copy)]
pub enum StepInput<'a> {
    Text(&'a str),
    Contact(&'a ContactShare),
}

/// Result of offering input to the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Field stored; prompt the step at this cursor next.
    Advance(usize),
    /// Wrong input shape; repeat the current step's prompt unchanged.
    Reprompt,
    /// Field stored and the sequence is complete.
    Complete,
}

/// Apply one input to the step at `cursor`, mutating the draft only when the
/// input matches the step's expected shape.
pub fn advance(
    plan: &FlowPlan,
    cursor: usize,
    input: StepInput<'_>,
    draft: &mut DraftRecord,
) -> StepOutcome {
    let Some(step) = plan.step(cursor) else {
        return StepOutcome::Reprompt;
    };
    let value = match (step.expects, input) {
        (InputShape::Text, StepInput::Text(text)) => text.trim().to_string(),
        (InputShape::Contact, StepInput::Contact(contact)) => contact.phone_number.clone(),
        _ => return StepOutcome::Reprompt,
    };
    draft.set(step.field, value);
    let next = cursor + 1;
    if next == plan.len() {
        StepOutcome::Complete
    } else {
        StepOutcome::Advance(next)
    }
}
