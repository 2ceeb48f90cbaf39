use super::schemas::GraphError;
use derive_more::{Display, Error};

/// Platform limit violated by a template. Only the first violation is reported.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[display("template element title exceeds the 45 character limit")]
    TitleLengthExceeded,
    #[display("template element subtitle exceeds the 80 character limit")]
    SubtitleLengthExceeded,
    #[display("template call to action title exceeds the 20 character limit")]
    CallToActionTitleLengthExceeded,
    #[display("limit of 3 buttons exceeded")]
    ButtonsLimitExceeded,
    #[display("limit of 10 bubbles per message exceeded")]
    BubblesLimitExceeded,
}

#[derive(Debug, Display, Error)]
pub enum ClientError {
    #[display("unsupported message content type")]
    UnsupportedContent,
    #[display("page id is required to set the welcome message")]
    MissingPageId,
    #[display("request to the graph api failed: {_0}")]
    Transport(reqwest::Error),
    #[display("error response received ({status}): {}", error.message)]
    Remote { status: u16, error: GraphError },
    #[display("failed to encode request body: {_0}")]
    Serialize(serde_json::Error),
    #[display("failed to decode graph api response: {_0}")]
    Decode(serde_json::Error),
    #[display("invalid graph api url: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    #[display("unexpected thread settings result: {_0}")]
    UnexpectedResult(#[error(not(source))] String),
}

impl ClientError {
    /// Remote error message, when the failure came from the Graph API.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            ClientError::Remote { error, .. } => Some(&error.message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display_embeds_message() {
        let err = ClientError::Remote {
            status: 400,
            error: GraphError {
                message: "(#100) No matching user found".to_string(),
                ..Default::default()
            },
        };

        assert_eq!(
            err.to_string(),
            "error response received (400): (#100) No matching user found"
        );
        assert_eq!(err.remote_message(), Some("(#100) No matching user found"));
        assert_eq!(ClientError::UnsupportedContent.remote_message(), None);
    }
}
