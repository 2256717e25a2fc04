use crate::SubmissionRequest;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a valid URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", EMPTY_INPUT_MESSAGE)]
    EmptyInput,
}

/// Presence check only; malformed URLs are left for the retrieval collaborator to reject.
pub fn validate_input(raw: &str) -> Result<SubmissionRequest, ValidationError> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    Ok(SubmissionRequest {
        url: url.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let request = validate_input("  https://example.com/page \n").unwrap();
        assert_eq!(request.url, "https://example.com/page");
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert_eq!(validate_input(" \t\n"), Err(ValidationError::EmptyInput));
        assert_eq!(validate_input(""), Err(ValidationError::EmptyInput));
    }

    #[test]
    fn malformed_urls_pass_through() {
        let request = validate_input("not a url").unwrap();
        assert_eq!(request.url, "not a url");
    }

    #[test]
    fn error_message_matches_banner_text() {
        assert_eq!(ValidationError::EmptyInput.to_string(), EMPTY_INPUT_MESSAGE);
    }
}
