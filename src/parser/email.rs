//! Turn the raw text of one email file into an [`EmailRecord`].

use std::path::Path;

use chrono::DateTime;

use crate::error::ParseError;
use crate::model::email::EmailRecord;
use crate::parser::header::{extract_header, has_header, parse_date};

/// Parse one email file.
///
/// The content must contain a `From:` line and a `To:` line; anything else
/// is rejected with [`ParseError::InvalidFormat`]. All other fields are
/// optional: a missing `Subject:` yields an empty subject and a missing or
/// unrecognized `Date:` yields the Unix epoch.
pub fn parse_email(path: &Path, content: impl Into<String>) -> Result<EmailRecord, ParseError> {
    let content = content.into();

    for required in ["From:", "To:"] {
        if !has_header(&content, required) {
            return Err(ParseError::InvalidFormat { missing: required });
        }
    }

    let date = parse_date(&extract_header(&content, "Date:")).unwrap_or(DateTime::UNIX_EPOCH);

    Ok(EmailRecord {
        path: path.to_string_lossy().into_owned(),
        sender: extract_header(&content, "From:"),
        recipient: extract_header(&content, "To:"),
        subject: extract_header(&content, "Subject:"),
        date,
        folder: folder_of(path),
        content,
    })
}

/// Name of the directory that contains `path`, or empty at the filesystem root.
pub fn folder_of(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
