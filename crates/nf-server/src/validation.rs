use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Folder name is required")]
    FolderNameRequired,

    #[error("Missing '{0}' in request body")]
    MissingField(&'static str),
}

impl ValidationError {
    /// Convert to the `(StatusCode, String)` error tuple pattern used by axum handlers.
    pub fn bad_request(self) -> (axum::http::StatusCode, String) {
        (axum::http::StatusCode::BAD_REQUEST, self.to_string())
    }
}

impl From<ValidationError> for (axum::http::StatusCode, String) {
    fn from(err: ValidationError) -> Self {
        (axum::http::StatusCode::BAD_REQUEST, err.to_string())
    }
}

/// Validate a folder-create payload. Returns the accepted name.
pub fn validate_folder_name(folder_name: Option<String>) -> Result<String, ValidationError> {
    match folder_name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(ValidationError::FolderNameRequired),
    }
}

/// Validate a note-create payload. Fields are checked independently, in the
/// fixed order `note_name`, `folder_id`, `content`; the first missing or
/// empty one is reported. Returns the accepted values.
pub fn validate_note_fields(
    note_name: Option<String>,
    folder_id: Option<i64>,
    content: Option<String>,
) -> Result<(String, i64, String), ValidationError> {
    let note_name = require_text("note_name", note_name)?;
    let folder_id = folder_id.ok_or(ValidationError::MissingField("folder_id"))?;
    let content = require_text("content", content)?;
    Ok((note_name, folder_id, content))
}

fn require_text(
    field: &'static str,
    value: Option<String>,
) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_name_absent_or_empty_is_rejected() {
        assert_eq!(
            validate_folder_name(None).unwrap_err(),
            ValidationError::FolderNameRequired
        );
        assert_eq!(
            validate_folder_name(Some("".into())).unwrap_err(),
            ValidationError::FolderNameRequired
        );
        assert_eq!(
            validate_folder_name(Some("   ".into())).unwrap_err(),
            ValidationError::FolderNameRequired
        );
        assert_eq!(
            validate_folder_name(Some("Important".into())).unwrap(),
            "Important"
        );
    }

    #[test]
    fn folder_error_message_matches_api_contract() {
        assert_eq!(
            ValidationError::FolderNameRequired.to_string(),
            "Folder name is required"
        );
    }

    #[test]
    fn note_fields_are_checked_in_fixed_order() {
        // All missing: note_name is reported first.
        let err = validate_note_fields(None, None, None).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("note_name"));

        // note_name present: folder_id is next.
        let err = validate_note_fields(Some("n".into()), None, None).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("folder_id"));

        // note_name + folder_id present: content is last.
        let err = validate_note_fields(Some("n".into()), Some(1), None).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("content"));
    }

    #[test]
    fn note_empty_strings_count_as_missing() {
        let err = validate_note_fields(Some("".into()), Some(1), Some("c".into())).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("note_name"));

        let err = validate_note_fields(Some("n".into()), Some(1), Some(" ".into())).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("content"));
    }

    #[test]
    fn note_error_message_names_the_field() {
        assert_eq!(
            ValidationError::MissingField("folder_id").to_string(),
            "Missing 'folder_id' in request body"
        );
    }

    #[test]
    fn note_valid_payload_passes_through() {
        let (name, folder_id, content) = validate_note_fields(
            Some("Mice".into()),
            Some(3),
            Some("But wait, maybe mice are.".into()),
        )
        .unwrap();
        assert_eq!(name, "Mice");
        assert_eq!(folder_id, 3);
        assert_eq!(content, "But wait, maybe mice are.");
    }
}
