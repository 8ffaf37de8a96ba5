use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoistError {
    #[error(
        "Todoist rejected the API token (HTTP {0}).\n\
         Check TODOIST_API_TOKEN or todoist.api_token in your config."
    )]
    Unauthorized(u16),

    #[error("Todoist request failed: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not reach Todoist: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response from Todoist: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TodoistError {
    /// Builds the error for a non-success response, keeping only the head of the body.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        const MAX_BODY: usize = 200;

        if status == 401 || status == 403 {
            return TodoistError::Unauthorized(status);
        }

        let body = body.trim();
        let body = match body.char_indices().nth(MAX_BODY) {
            Some((idx, _)) => format!("{}...", &body[..idx]),
            None => body.to_string(),
        };
        TodoistError::Status { status, body }
    }
}

pub type Result<T> = std::result::Result<T, TodoistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses_map_to_unauthorized() {
        assert!(matches!(
            TodoistError::from_status(401, ""),
            TodoistError::Unauthorized(401)
        ));
        assert!(matches!(
            TodoistError::from_status(403, "forbidden"),
            TodoistError::Unauthorized(403)
        ));
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(500);
        match TodoistError::from_status(500, &body) {
            TodoistError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body.len(), 203);
                assert!(body.ends_with("..."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_body_kept_verbatim() {
        let err = TodoistError::from_status(503, "  service unavailable \n");
        assert_eq!(
            err.to_string(),
            "Todoist request failed: HTTP 503: service unavailable"
        );
    }
}
