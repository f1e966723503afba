//! The completed intake record handed to a sink.

use crate::UserId;
use serde::{Deserialize, Serialize};

/// Answers collected from one completed intake session.
///
/// `phone` is only present for flow variants that collect a contact share.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntakeRecord {
    /// Numeric account id of the student.
    pub user_id: UserId,
    /// Public handle, when the account has one.
    pub username: Option<String>,
    /// School name as the student entered it.
    pub school: String,
    /// Grade or class label.
    pub grade: String,
    /// First and last name.
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl IntakeRecord {
    /// Handle rendered for humans: `@name` or a dash when absent.
    pub fn display_handle(&self) -> String {
        match &self.username {
            Some(name) => format!("@{name}"),
            None => "—".to_string(),
        }
    }
}
