//! Note entity - append-only comments on a work order

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::lenient;

/// A note as returned by `GET /work-orders/:id/notes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,

    #[serde(default)]
    pub author: String,

    #[serde(alias = "text", default)]
    pub message: String,

    #[serde(
        default,
        deserialize_with = "lenient::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for `POST /work-orders/:id/notes`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewNote {
    pub author: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_accepts_text_or_message() {
        let a: Note = serde_json::from_str(r#"{"id":1,"author":"Owner","message":"hi"}"#).unwrap();
        let b: Note = serde_json::from_str(r#"{"id":2,"author":"Owner","text":"hi"}"#).unwrap();
        assert_eq!(a.message, "hi");
        assert_eq!(b.message, "hi");
    }

    #[test]
    fn test_zone_less_created_at() {
        let notes: Vec<Note> = serde_json::from_str(
            r#"[{"id":1,"text":"a","created_at":"2024-05-01 10:00:00"},{"id":2,"text":"b","created_at":"later"}]"#,
        )
        .unwrap();
        assert_eq!(
            notes[0].created_at.map(|t| t.to_rfc3339()),
            Some("2024-05-01T10:00:00+00:00".to_string())
        );
        assert!(notes[1].created_at.is_none());
    }
}
