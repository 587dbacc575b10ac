//! The parsed email record submitted to the search engine.

use chrono::{DateTime, Utc};

/// One email file, parsed into the fields the index knows about.
///
/// Records are only ever built by [`crate::parser::email::parse_email`], which
/// refuses content without both a `From:` and a `To:` line.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EmailRecord {
    /// Path of the source file. Unique per record.
    pub path: String,

    /// Full raw text of the file, kept verbatim.
    pub content: String,

    /// Value of the first `From:` line, or empty.
    pub sender: String,

    /// Value of the first `To:` line, or empty.
    pub recipient: String,

    /// Value of the first `Subject:` line, or empty.
    pub subject: String,

    /// Parsed `Date:` header.
    /// Unix epoch when the header is missing or in no recognized format.
    pub date: DateTime<Utc>,

    /// Name of the directory containing the file.
    pub folder: String,
}

impl EmailRecord {
    /// Whether the date header was recognized.
    pub fn has_date(&self) -> bool {
        self.date != DateTime::<Utc>::UNIX_EPOCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EmailRecord {
        EmailRecord {
            path: "maildir/allen-p/inbox/1.".to_string(),
            content: "From: a@b.com\nTo: c@d.com\n\nHi".to_string(),
            sender: "a@b.com".to_string(),
            recipient: "c@d.com".to_string(),
            subject: String::new(),
            date: DateTime::UNIX_EPOCH,
            folder: "inbox".to_string(),
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(record()).expect("serialize");
        let object = value.as_object().expect("object");
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["content", "date", "folder", "path", "recipient", "sender", "subject"]
        );
        assert_eq!(object["date"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_has_date() {
        let mut r = record();
        assert!(!r.has_date());
        r.date = DateTime::from_timestamp(1_000_000_000, 0).expect("valid timestamp");
        assert!(r.has_date());
    }
}
