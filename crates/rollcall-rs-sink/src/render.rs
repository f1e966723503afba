//! Shared renderings of a record: broadcast summary text and tabular rows.

use chrono::{DateTime, Utc};
use rollcall_rs_protocol::IntakeRecord;

/// Column order used by every row-shaped sink (CSV, SQLite, cloud sheet).
pub const ROW_HEADER: &[&str] = &[
    "submitted_at",
    "user_id",
    "username",
    "school",
    "grade",
    "full_name",
    "phone",
];

/// Markdown summary relayed to a broadcast chat.
pub fn summary_markdown(record: &IntakeRecord) -> String {
    let mut lines = vec![
        "🧾 *New participant*".to_string(),
        String::new(),
        format!("👤 Name: {}", record.full_name),
        format!("🏫 School: {}", record.school),
        format!("📚 Grade: {}", record.grade),
    ];
    if let Some(phone) = &record.phone {
        lines.push(format!("📱 Phone: {phone}"));
    }
    lines.push(format!("🆔 ID: `{}`", record.user_id));
    lines.push(format!("👤 Handle: {}", record.display_handle()));
    lines.join("\n")
}

/// One spreadsheet/database row for the record, stamped with the write time.
pub fn row_cells(record: &IntakeRecord, submitted_at: DateTime<Utc>) -> Vec<String> {
    vec![
        submitted_at.to_rfc3339(),
        record.user_id.to_string(),
        record.username.clone().unwrap_or_default(),
        record.school.clone(),
        record.grade.clone(),
        record.full_name.clone(),
        record.phone.clone().unwrap_or_default(),
    ]
}

#[cfg(test)]
mod tests {
    use super::{row_cells, summary_markdown, ROW_HEADER};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rollcall_rs_protocol::IntakeRecord;

    fn record() -> IntakeRecord {
        IntakeRecord {
            user_id: 42,
            username: Some("aziz".to_string()),
            school: "Lyceum 1".to_string(),
            grade: "9".to_string(),
            full_name: "Aziz Karimov".to_string(),
            phone: Some("+998901234567".to_string()),
        }
    }

    #[test]
    fn summary_lists_every_answer() {
        let summary = summary_markdown(&record());
        assert!(summary.contains("Aziz Karimov"));
        assert!(summary.contains("Lyceum 1"));
        assert!(summary.contains("Grade: 9"));
        assert!(summary.contains("+998901234567"));
        assert!(summary.contains("`42`"));
        assert!(summary.contains("@aziz"));
    }

    #[test]
    fn summary_omits_the_phone_line_when_not_collected() {
        let mut record = record();
        record.phone = None;
        assert!(!summary_markdown(&record).contains("Phone"));
    }

    #[test]
    fn row_cells_match_the_header_order() {
        let now = Utc::now();
        let cells = row_cells(&record(), now);
        assert_eq!(cells.len(), ROW_HEADER.len());
        assert_eq!(cells[0], now.to_rfc3339());
        assert_eq!(
            &cells[1..],
            &[
                "42".to_string(),
                "aziz".to_string(),
                "Lyceum 1".to_string(),
                "9".to_string(),
                "Aziz Karimov".to_string(),
                "+998901234567".to_string(),
            ]
        );
    }
}
