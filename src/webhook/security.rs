//! Signature verification for incoming webhook requests
//!
//! The platform signs every POST body with the app secret and sends the
//! result in two headers:
//!
//! - `X-Hub-Signature: sha1=<hex>` (HMAC-SHA1)
//! - `X-Hub-Signature-256: sha256=<hex>` (HMAC-SHA256)
//!
//! The signature is computed on the raw body bytes, never on re-serialized
//! JSON, and compared in constant time.

use hmac::{Hmac, Mac, digest::KeyInit};
use log::warn;
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

const SHA1_PREFIX: &str = "sha1=";
const SHA256_PREFIX: &str = "sha256=";

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SignatureError {
    #[display("missing signature header")]
    MissingHeader,
    #[display("signature header without the expected algorithm prefix")]
    InvalidFormat,
    #[display("signature is not valid hex")]
    InvalidHex,
    #[display("app secret rejected as hmac key")]
    InvalidKey,
    #[display("signature does not match the payload")]
    Mismatch,
}

/// Checks the signature headers of a webhook POST.
///
/// `X-Hub-Signature` is required. `X-Hub-Signature-256` is optional but must
/// verify too when the platform sends it.
pub fn verify_request(
    sha1_header: Option<&str>,
    sha256_header: Option<&str>,
    payload: &[u8],
    app_secret: &str,
) -> Result<(), SignatureError> {
    let sha1_header = sha1_header.ok_or(SignatureError::MissingHeader)?;
    verify_sha1_signature(sha1_header, payload, app_secret)?;

    if let Some(sha256_header) = sha256_header {
        verify_sha256_signature(sha256_header, payload, app_secret)?;
    }

    Ok(())
}

/// Verifies a `sha1=<hex>` header value against `payload`
pub fn verify_sha1_signature(
    signature_header: &str,
    payload: &[u8],
    app_secret: &str,
) -> Result<(), SignatureError> {
    verify::<HmacSha1>(signature_header, SHA1_PREFIX, payload, app_secret)
}

/// Verifies a `sha256=<hex>` header value against `payload`
pub fn verify_sha256_signature(
    signature_header: &str,
    payload: &[u8],
    app_secret: &str,
) -> Result<(), SignatureError> {
    verify::<HmacSha256>(signature_header, SHA256_PREFIX, payload, app_secret)
}

/// `X-Hub-Signature` value for `payload`, as the platform would send it
pub fn sign_sha1(payload: &[u8], app_secret: &str) -> Result<String, SignatureError> {
    let signature = compute::<HmacSha1>(payload, app_secret)?;
    Ok(format!("{SHA1_PREFIX}{}", hex::encode(signature)))
}

/// `X-Hub-Signature-256` value for `payload`
pub fn sign_sha256(payload: &[u8], app_secret: &str) -> Result<String, SignatureError> {
    let signature = compute::<HmacSha256>(payload, app_secret)?;
    Ok(format!("{SHA256_PREFIX}{}", hex::encode(signature)))
}

fn compute<M: Mac + KeyInit>(payload: &[u8], app_secret: &str) -> Result<Vec<u8>, SignatureError> {
    let mut mac = <M as KeyInit>::new_from_slice(app_secret.as_bytes())
        .map_err(|_| SignatureError::InvalidKey)?;
    mac.update(payload);

    Ok(mac.finalize().into_bytes().to_vec())
}

fn verify<M: Mac + KeyInit>(
    signature_header: &str,
    prefix: &str,
    payload: &[u8],
    app_secret: &str,
) -> Result<(), SignatureError> {
    let Some(signature_hex) = signature_header.strip_prefix(prefix) else {
        warn!("Invalid signature header format: expected '{prefix}' prefix");
        return Err(SignatureError::InvalidFormat);
    };

    let expected = hex::decode(signature_hex).map_err(|e| {
        warn!("Failed to decode signature hex: {e}");
        SignatureError::InvalidHex
    })?;

    let computed = compute::<M>(payload, app_secret)?;

    if bool::from(computed.ct_eq(&expected)) {
        Ok(())
    } else {
        warn!("Webhook signature verification failed: signatures do not match");
        Err(SignatureError::Mismatch)
    }
}
