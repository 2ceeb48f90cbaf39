use super::security::SignatureError;
use derive_more::{Display, Error};
use log::warn;
use ntex::{http, web};

/// Rejections of the webhook endpoint. Responses carry no body.
#[derive(Debug, Display, Error)]
pub enum WebhookError {
    #[display("invalid verify token")]
    InvalidVerifyToken,
    #[display("invalid signature: {_0}")]
    InvalidSignature(SignatureError),
    #[display("malformed payload: {_0}")]
    MalformedPayload(#[error(not(source))] String),
    #[display("method not allowed")]
    MethodNotAllowed,
}

impl web::error::WebResponseError for WebhookError {
    fn error_response(&self, req: &web::HttpRequest) -> web::HttpResponse {
        warn!("Rejected webhook {} {}: {}", req.method(), req.path(), self);

        web::HttpResponse::build(self.status_code()).finish()
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            WebhookError::InvalidVerifyToken => http::StatusCode::UNAUTHORIZED,
            WebhookError::InvalidSignature(_) | WebhookError::MalformedPayload(_) => {
                http::StatusCode::BAD_REQUEST
            }
            WebhookError::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntex::web::error::WebResponseError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WebhookError::InvalidVerifyToken.status_code(),
            http::StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::InvalidSignature(SignatureError::Mismatch).status_code(),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::MalformedPayload("eof".into()).status_code(),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::MethodNotAllowed.status_code(),
            http::StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            WebhookError::InvalidSignature(SignatureError::MissingHeader).to_string(),
            "invalid signature: missing signature header"
        );
    }
}
