//! # Paygate Client
//!
//! A signing HTTP client for the payment gateway's hosted checkout flow.
//!
//! ```rust,ignore
//! use paygate_client::{GatewayConfig, PhonePeClient};
//!
//! let config = GatewayConfig::from_env()?;
//! let client = PhonePeClient::new(config)?;
//!
//! let url = client
//!     .initiate_payment(499.0, "", "asha@example.com", "Asha")
//!     .await?;
//! // Send the shopper's browser to `url`.
//! ```

pub mod checksum;
pub mod config;

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use paygate_types::domain::mobile_or_default;
use paygate_types::error::DEFAULT_REJECTION_MESSAGE;
use paygate_types::{
    CallbackEnvelope, CallbackPayload, CheckoutSession, GatewayErrorBody, GatewayResponse,
    IdGenerator, MinorUnits, MonotonicIdGenerator, PayRequestBody, PaymentError, PaymentGateway, PaymentInstrument,
    PaymentRequest, PaymentStatus, RedirectMode, StatusResponse,
};

pub use checksum::SignedEnvelope;
pub use config::GatewayConfig;

pub const X_VERIFY: &str = "X-VERIFY";
pub const X_MERCHANT_ID: &str = "X-MERCHANT-ID";
const APPLICATION_JSON: &str = "application/json";

/// Gateway client.
///
/// Holds no per-payment state: every call builds, signs and sends its own
/// request, so one client can serve concurrent checkouts.
pub struct PhonePeClient {
    config: GatewayConfig,
    ids: Arc<dyn IdGenerator>,
    http: Client,
}

impl PhonePeClient {
    /// Creates a client that draws identifiers from the system clock.
    pub fn new(config: GatewayConfig) -> Result<Self, PaymentError> {
        Self::with_id_generator(config, Arc::new(MonotonicIdGenerator::new()))
    }

    /// Creates a client with a custom identifier source.
    pub fn with_id_generator(
        config: GatewayConfig,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self, PaymentError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| PaymentError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, ids, http })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Assembles the pay-page request for one attempt, drawing fresh identifiers.
    pub fn build_request(&self, amount: MinorUnits, mobile_number: &str) -> PaymentRequest {
        PaymentRequest {
            merchant_id: self.config.merchant_id.clone(),
            merchant_transaction_id: self.ids.transaction_id(),
            merchant_user_id: self.ids.user_id(),
            amount,
            redirect_url: self.config.redirect_url(),
            redirect_mode: RedirectMode::Post,
            callback_url: self.config.callback_url(),
            mobile_number: mobile_or_default(mobile_number),
            payment_instrument: PaymentInstrument::pay_page(),
        }
    }

    /// Signs and submits a pay-page request.
    ///
    /// `amount` is in whole currency units; it is validated before anything
    /// is sent.
    #[instrument(skip(self, mobile_number), fields(merchant_id = %self.config.merchant_id))]
    pub async fn create_checkout(
        &self,
        amount: f64,
        mobile_number: &str,
        email: &str,
        name: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        let amount = MinorUnits::from_major(amount)?;
        let request = self.build_request(amount, mobile_number);
        let envelope =
            checksum::sign_pay_request(&request, &self.config.salt_key, self.config.salt_index)?;

        debug!(
            merchant_transaction_id = %request.merchant_transaction_id,
            amount = amount.get(),
            "Submitting pay request"
        );

        let resp = self
            .http
            .post(self.config.pay_url())
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(X_VERIFY, &envelope.checksum)
            .header(X_MERCHANT_ID, &self.config.merchant_id)
            .json(&PayRequestBody {
                request: envelope.payload,
            })
            .send()
            .await
            .map_err(transport_error)?;

        let body: GatewayResponse = handle_response(resp).await?;
        if !body.success {
            let message = non_empty(body.message).unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.into());
            warn!(code = ?body.code, %message, "Gateway rejected pay request");
            return Err(PaymentError::GatewayRejected(message));
        }

        let redirect_url = body
            .redirect_url()
            .ok_or_else(|| {
                PaymentError::MalformedResponse("no redirect URL received from gateway".into())
            })?
            .to_string();

        info!(
            merchant_transaction_id = %request.merchant_transaction_id,
            "Checkout initiated"
        );

        Ok(CheckoutSession {
            merchant_transaction_id: request.merchant_transaction_id,
            merchant_user_id: request.merchant_user_id,
            amount,
            redirect_url,
        })
    }

    /// Initiates a checkout and returns only the hosted page URL.
    pub async fn initiate_payment(
        &self,
        amount: f64,
        mobile_number: &str,
        email: &str,
        name: &str,
    ) -> Result<String, PaymentError> {
        PaymentGateway::initiate_payment(self, amount, mobile_number, email, name).await
    }

    /// Fetches the gateway's view of a previously initiated payment.
    #[instrument(skip(self), fields(merchant_id = %self.config.merchant_id))]
    pub async fn check_status(
        &self,
        merchant_transaction_id: &str,
    ) -> Result<PaymentStatus, PaymentError> {
        let merchant_transaction_id = merchant_transaction_id.trim();
        validate_transaction_id(merchant_transaction_id)?;

        let path = checksum::status_path(&self.config.merchant_id, merchant_transaction_id);
        let x_verify = checksum::sign_status_request(
            &self.config.merchant_id,
            merchant_transaction_id,
            &self.config.salt_key,
            self.config.salt_index,
        );

        let resp = self
            .http
            .get(format!("{}{}", self.config.api_base_url, path))
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(X_VERIFY, x_verify)
            .header(X_MERCHANT_ID, &self.config.merchant_id)
            .send()
            .await
            .map_err(transport_error)?;

        let body: StatusResponse = handle_response(resp).await?;
        match body.data {
            Some(status) => {
                debug!(state = %status.state, code = ?body.code, "Status received");
                Ok(status)
            }
            None if body.success => Err(PaymentError::MalformedResponse(
                "status response without payment data".into(),
            )),
            None => Err(PaymentError::GatewayRejected(
                non_empty(body.message).unwrap_or_else(|| "Payment status unavailable".into()),
            )),
        }
    }

    /// Verifies and decodes a raw callback body (`{"response": "..."}`).
    pub fn verify_callback_body(
        &self,
        body: &str,
        x_verify: &str,
    ) -> Result<CallbackPayload, PaymentError> {
        let envelope: CallbackEnvelope = serde_json::from_str(body)
            .map_err(|e| PaymentError::Validation(format!("callback body is not valid: {e}")))?;
        self.verify_callback(&envelope.response, x_verify)
    }

    /// Verifies and decodes a server-to-server callback.
    ///
    /// `response` is the `response` field of the callback body and
    /// `x_verify` the value of its `X-VERIFY` header.
    pub fn verify_callback(
        &self,
        response: &str,
        x_verify: &str,
    ) -> Result<CallbackPayload, PaymentError> {
        if !checksum::verify_callback_checksum(
            response,
            x_verify,
            &self.config.salt_key,
            self.config.salt_index,
        ) {
            warn!("Callback checksum mismatch");
            return Err(PaymentError::InvalidChecksum);
        }

        let decoded = STANDARD
            .decode(response.trim())
            .map_err(|e| PaymentError::MalformedResponse(format!("callback is not base64: {e}")))?;
        serde_json::from_slice(&decoded)
            .map_err(|e| PaymentError::MalformedResponse(format!("callback is not valid JSON: {e}")))
    }
}

#[async_trait::async_trait]
impl PaymentGateway for PhonePeClient {
    async fn create_checkout(
        &self,
        amount: f64,
        mobile_number: &str,
        email: &str,
        name: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        PhonePeClient::create_checkout(self, amount, mobile_number, email, name).await
    }

    async fn check_status(
        &self,
        merchant_transaction_id: &str,
    ) -> Result<PaymentStatus, PaymentError> {
        PhonePeClient::check_status(self, merchant_transaction_id).await
    }
}

async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, PaymentError> {
    let status = resp.status();
    let body = resp.text().await.map_err(transport_error)?;
    if status.is_success() {
        serde_json::from_str(&body).map_err(|e| PaymentError::MalformedResponse(e.to_string()))
    } else {
        let message = serde_json::from_str::<GatewayErrorBody>(&body)
            .ok()
            .and_then(|b| non_empty(b.message));
        match message {
            Some(message) => {
                warn!(status = status.as_u16(), %message, "Gateway returned an error");
                Err(PaymentError::GatewayRejected(message))
            }
            None => {
                warn!(status = status.as_u16(), "Gateway returned an unstructured error");
                Err(PaymentError::GatewayUnreachable(format!("HTTP {}", status)))
            }
        }
    }
}

fn transport_error(err: reqwest::Error) -> PaymentError {
    warn!(error = %err, "Gateway request failed");
    PaymentError::GatewayUnreachable(err.to_string())
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

fn validate_transaction_id(id: &str) -> Result<(), PaymentError> {
    if id.is_empty() {
        return Err(PaymentError::Validation(
            "merchant transaction id is required".into(),
        ));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(PaymentError::Validation(format!(
            "invalid merchant transaction id: {id}"
        )));
    }
    Ok(())
}
