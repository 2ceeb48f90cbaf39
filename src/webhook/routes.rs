//! Messenger webhook endpoint
//!
//! - `GET` answers the subscription challenge sent when the webhook is
//!   registered on the app dashboard.
//! - `POST` receives the event batches. When the bot has an app secret the
//!   body signature is checked before anything is parsed. Events are
//!   dispatched to background tasks and the platform gets its 200 right away.
//! - Any other method is rejected with 405.

use super::{dispatch, errors::WebhookError, events::WebhookPayload, security};
use crate::{bot::MessengerBot, consts};
use log::{debug, error};
use ntex::{util::Bytes, web};
use serde::Deserialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Mounts the webhook at `path`. The app must hold an `Arc<MessengerBot>` as state.
pub fn messenger(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(
        web::resource(path)
            .route(web::get().to(verify))
            .route(web::post().to(receive))
            .default_service(web::route().to(method_not_allowed)),
    );
}

/// Query parameters of the subscription challenge
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

pub async fn verify(
    query: web::types::Query<VerifyQuery>,
    bot: web::types::State<Arc<MessengerBot>>,
) -> Result<web::HttpResponse, web::Error> {
    let query = query.into_inner();
    let expected = bot.config().verify_token.as_bytes();

    let token_matches = query
        .verify_token
        .as_deref()
        .is_some_and(|token| bool::from(token.as_bytes().ct_eq(expected)));
    if !token_matches {
        return Err(WebhookError::InvalidVerifyToken.into());
    }

    debug!("Webhook verified (mode: {:?})", query.mode);

    Ok(web::HttpResponse::Ok()
        .content_type("text/plain")
        .body(query.challenge.unwrap_or_default()))
}

pub async fn receive(
    req: web::HttpRequest,
    body: Bytes,
    bot: web::types::State<Arc<MessengerBot>>,
) -> Result<web::HttpResponse, web::Error> {
    if let Some(app_secret) = bot.config().app_secret.as_deref() {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
        };

        security::verify_request(
            header(consts::SIGNATURE_SHA1_HEADER),
            header(consts::SIGNATURE_SHA256_HEADER),
            &body,
            app_secret,
        )
        .map_err(WebhookError::InvalidSignature)?;
    }

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        error!("Failed to parse webhook payload: {e}");
        WebhookError::MalformedPayload(e.to_string())
    })?;

    let dispatched = dispatch::dispatch(&*bot, payload);
    debug!("Dispatched {dispatched} webhook events");

    Ok(web::HttpResponse::Ok().json(&serde_json::json!({ "status": "ok" })))
}

async fn method_not_allowed() -> Result<web::HttpResponse, web::Error> {
    Err(WebhookError::MethodNotAllowed.into())
}
