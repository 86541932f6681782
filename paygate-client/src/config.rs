//! Gateway configuration: credentials, endpoints and the shopper-facing URLs.

use std::fmt;
use std::time::Duration;

use paygate_types::PaymentError;

use crate::checksum::PAY_API_PATH;

/// Pre-production base URL of the gateway's REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://api-preprod.phonepe.com/apis/hermes";
pub const DEFAULT_APP_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_REDIRECT_PATH: &str = "/payment-status";
pub const DEFAULT_CALLBACK_PATH: &str = "/api/payment-callback";
pub const DEFAULT_SALT_INDEX: u32 = 1;

/// Everything the client needs to sign and address gateway calls.
///
/// `app_base_url` is the origin of the site the shopper returns to; the
/// redirect and callback URLs sent to the gateway are built from it.
#[derive(Clone)]
pub struct GatewayConfig {
    pub merchant_id: String,
    pub salt_key: String,
    pub salt_index: u32,
    pub api_base_url: String,
    pub app_base_url: String,
    pub redirect_path: String,
    pub callback_path: String,
    /// Per-request timeout handed to the HTTP client. `None` means no timeout.
    pub timeout: Option<Duration>,
}

impl GatewayConfig {
    /// Creates a configuration pointing at the pre-production gateway.
    pub fn new(merchant_id: impl Into<String>, salt_key: impl Into<String>, salt_index: u32) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            salt_key: salt_key.into(),
            salt_index,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            app_base_url: DEFAULT_APP_BASE_URL.to_string(),
            redirect_path: DEFAULT_REDIRECT_PATH.to_string(),
            callback_path: DEFAULT_CALLBACK_PATH.to_string(),
            timeout: None,
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = trim_base(url.into());
        self
    }

    pub fn with_app_base_url(mut self, url: impl Into<String>) -> Self {
        self.app_base_url = trim_base(url.into());
        self
    }

    pub fn with_redirect_path(mut self, path: impl Into<String>) -> Self {
        self.redirect_path = normalize_path(path.into());
        self
    }

    pub fn with_callback_path(mut self, path: impl Into<String>) -> Self {
        self.callback_path = normalize_path(path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, PaymentError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// `PHONEPE_MERCHANT_ID` and `PHONEPE_SALT_KEY` are required; everything
    /// else falls back to the pre-production defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PaymentError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let merchant_id = var("PHONEPE_MERCHANT_ID")
            .ok_or_else(|| PaymentError::Config("PHONEPE_MERCHANT_ID not set".into()))?;
        let salt_key = var("PHONEPE_SALT_KEY")
            .ok_or_else(|| PaymentError::Config("PHONEPE_SALT_KEY not set".into()))?;
        let salt_index = match var("PHONEPE_SALT_INDEX") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                PaymentError::Config(format!("PHONEPE_SALT_INDEX is not a valid index: {raw}"))
            })?,
            None => DEFAULT_SALT_INDEX,
        };

        let mut config = Self::new(merchant_id, salt_key, salt_index);
        if let Some(url) = var("PHONEPE_API_URL") {
            config = config.with_api_base_url(url);
        }
        if let Some(url) = var("APP_BASE_URL") {
            config = config.with_app_base_url(url);
        }
        if let Some(path) = var("PHONEPE_REDIRECT_PATH") {
            config = config.with_redirect_path(path);
        }
        if let Some(path) = var("PHONEPE_CALLBACK_PATH") {
            config = config.with_callback_path(path);
        }
        if let Some(raw) = var("PHONEPE_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                PaymentError::Config(format!("PHONEPE_TIMEOUT_SECS is not a number: {raw}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Full URL of the pay API.
    pub fn pay_url(&self) -> String {
        format!("{}{}", self.api_base_url, PAY_API_PATH)
    }

    /// Where the gateway sends the shopper after checkout.
    pub fn redirect_url(&self) -> String {
        format!("{}{}", self.app_base_url, self.redirect_path)
    }

    /// Where the gateway POSTs the server-to-server callback.
    pub fn callback_url(&self) -> String {
        format!("{}{}", self.app_base_url, self.callback_path)
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("merchant_id", &self.merchant_id)
            .field("salt_key", &"***")
            .field("salt_index", &self.salt_index)
            .field("api_base_url", &self.api_base_url)
            .field("app_base_url", &self.app_base_url)
            .field("redirect_path", &self.redirect_path)
            .field("callback_path", &self.callback_path)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn trim_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn normalize_path(path: String) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
