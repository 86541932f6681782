//! Checksum signing and verification for gateway requests and callbacks.
//!
//! Every checksum has the form `hex(sha256(input + salt_key)) + "###" + salt_index`,
//! where `input` depends on the call being signed.

use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use paygate_types::{PaymentError, PaymentRequest};

/// Path of the pay API; part of the signed input.
pub const PAY_API_PATH: &str = "/pg/v1/pay";

/// Prefix of the status API path.
pub const STATUS_API_PATH: &str = "/pg/v1/status";

pub const CHECKSUM_SEPARATOR: &str = "###";

/// A base64-encoded payload together with its `X-VERIFY` checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    pub payload: String,
    pub checksum: String,
}

/// Computes `sha256hex(input + salt_key)###salt_index`.
pub fn checksum(input: &str, salt_key: &str, salt_index: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hasher.update(salt_key.as_bytes());
    format!(
        "{}{}{}",
        hex::encode(hasher.finalize()),
        CHECKSUM_SEPARATOR,
        salt_index
    )
}

/// Encodes a pay request and signs it together with the pay API path.
pub fn sign_pay_request(
    request: &PaymentRequest,
    salt_key: &str,
    salt_index: u32,
) -> Result<SignedEnvelope, PaymentError> {
    let json = serde_json::to_string(request)
        .map_err(|e| PaymentError::Validation(format!("failed to encode request: {e}")))?;
    let payload = STANDARD.encode(json);
    let checksum = checksum(&format!("{payload}{PAY_API_PATH}"), salt_key, salt_index);
    Ok(SignedEnvelope { payload, checksum })
}

/// Path of the status API for one transaction.
pub fn status_path(merchant_id: &str, merchant_transaction_id: &str) -> String {
    format!("{STATUS_API_PATH}/{merchant_id}/{merchant_transaction_id}")
}

/// Signs a status lookup; there is no body, so only the path is hashed.
pub fn sign_status_request(
    merchant_id: &str,
    merchant_transaction_id: &str,
    salt_key: &str,
    salt_index: u32,
) -> String {
    checksum(
        &status_path(merchant_id, merchant_transaction_id),
        salt_key,
        salt_index,
    )
}

/// Verifies the `X-VERIFY` header of a server callback using constant-time comparison.
pub fn verify_callback_checksum(
    response: &str,
    x_verify: &str,
    salt_key: &str,
    salt_index: u32,
) -> bool {
    let expected = checksum(response, salt_key, salt_index);
    expected.as_bytes().ct_eq(x_verify.trim().as_bytes()).into()
}
