//! Per-session draft record and its conversion to a completed record.

use crate::error::CoreError;
use crate::flow::FlowPlan;
use rollcall_rs_protocol::{IntakeRecord, UserId};

/// Fields collected by the intake flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    School,
    Grade,
    FullName,
    Phone,
}

impl Field {
    /// Field name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Field::School => "school",
            Field::Grade => "grade",
            Field::FullName => "full_name",
            Field::Phone => "phone",
        }
    }
}

/// The in-progress answers for one user's session.
///
/// Each slot is assigned exactly once, by the step that owns it; the draft
/// only becomes an [`IntakeRecord`] when every field the active plan
/// requires is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRecord {
    user_id: UserId,
    username: Option<String>,
    school: Option<String>,
    grade: Option<String>,
    full_name: Option<String>,
    phone: Option<String>,
}

impl DraftRecord {
    /// Start an empty draft for the given user identity.
    pub fn new(user_id: UserId, username: Option<String>) -> Self {
        Self {
            user_id,
            username,
            school: None,
            grade: None,
            full_name: None,
            phone: None,
        }
    }

    /// Assign a field's value.
    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::School => &mut self.school,
            Field::Grade => &mut self.grade,
            Field::FullName => &mut self.full_name,
            Field::Phone => &mut self.phone,
        };
        *slot = Some(value);
    }

    /// Current value of a field, if it has been collected.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::School => self.school.as_deref(),
            Field::Grade => self.grade.as_deref(),
            Field::FullName => self.full_name.as_deref(),
            Field::Phone => self.phone.as_deref(),
        }
    }

    /// Assemble the completed record for the active plan.
    pub fn finish(&self, plan: &FlowPlan) -> Result<IntakeRecord, CoreError> {
        for step in plan.steps() {
            if self.get(step.field).is_none() {
                return Err(CoreError::MissingField(step.field.name()));
            }
        }
        Ok(IntakeRecord {
            user_id: self.user_id,
            username: self.username.clone(),
            school: self.school.clone().unwrap_or_default(),
            grade: self.grade.clone().unwrap_or_default(),
            full_name: self.full_name.clone().unwrap_or_default(),
            phone: if plan.requires(Field::Phone) {
                self.phone.clone()
            } else {
                None
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DraftRecord, Field};
    use crate::error::CoreError;
    use crate::flow::FlowPlan;
    use pretty_assertions::assert_eq;

    #[test]
    fn finish_requires_every_field_of_the_active_plan() {
        let plan = FlowPlan::new(false);
        let mut draft = DraftRecord::new(42, Some("aziz".to_string()));
        draft.set(Field::School, "Lyceum 1".to_string());
        draft.set(Field::Grade, "9".to_string());

        let err = draft.finish(&plan).expect_err("incomplete");
        assert!(matches!(err, CoreError::MissingField("full_name")));

        draft.set(Field::FullName, "Aziz Karimov".to_string());
        let record = draft.finish(&plan).expect("complete");
        assert_eq!(record.school, "Lyceum 1");
        assert_eq!(record.full_name, "Aziz Karimov");
        assert_eq!(record.phone, None);
    }

    #[test]
    fn finish_drops_a_phone_the_plan_does_not_collect() {
        let plan = FlowPlan::new(false);
        let mut draft = DraftRecord::new(42, None);
        draft.set(Field::School, "Lyceum 1".to_string());
        draft.set(Field::Grade, "9".to_string());
        draft.set(Field::FullName, "Aziz Karimov".to_string());
        draft.set(Field::Phone, "+998901234567".to_string());

        let record = draft.finish(&plan).expect("complete");
        assert_eq!(record.phone, None);
    }

    #[test]
    fn phone_plan_requires_the_contact_step() {
        let plan = FlowPlan::new(true);
        let mut draft = DraftRecord::new(42, None);
        draft.set(Field::School, "Lyceum 1".to_string());
        draft.set(Field::Grade, "9".to_string());
        draft.set(Field::FullName, "Aziz Karimov".to_string());

        let err = draft.finish(&plan).expect_err("incomplete");
        assert!(matches!(err, CoreError::MissingField("phone")));
    }
}
