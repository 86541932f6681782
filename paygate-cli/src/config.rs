//! Gateway configuration from flags and environment.

use std::time::Duration;

use clap::Args;
use paygate_client::GatewayConfig;
use paygate_client::config::{
    DEFAULT_API_BASE_URL, DEFAULT_APP_BASE_URL, DEFAULT_CALLBACK_PATH, DEFAULT_REDIRECT_PATH,
};

/// Gateway settings; every flag can also come from the environment or `.env`.
#[derive(Args, Debug)]
pub struct GatewayArgs {
    /// Merchant identifier issued by the gateway
    #[arg(long, env = "PHONEPE_MERCHANT_ID")]
    merchant_id: String,

    /// Shared salt key used to sign requests
    #[arg(long, env = "PHONEPE_SALT_KEY", hide_env_values = true)]
    salt_key: String,

    /// Index of the salt key
    #[arg(long, env = "PHONEPE_SALT_INDEX", default_value_t = 1)]
    salt_index: u32,

    /// Base URL of the gateway API
    #[arg(long, env = "PHONEPE_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Origin of the site shoppers return to
    #[arg(long, env = "APP_BASE_URL", default_value = DEFAULT_APP_BASE_URL)]
    app_url: String,

    #[arg(long, env = "PHONEPE_REDIRECT_PATH", default_value = DEFAULT_REDIRECT_PATH)]
    redirect_path: String,

    #[arg(long, env = "PHONEPE_CALLBACK_PATH", default_value = DEFAULT_CALLBACK_PATH)]
    callback_path: String,

    /// Request timeout in seconds
    #[arg(long, env = "PHONEPE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

impl GatewayArgs {
    pub fn into_config(self) -> anyhow::Result<GatewayConfig> {
        if self.merchant_id.trim().is_empty() {
            anyhow::bail!("merchant id must not be empty");
        }
        if self.salt_key.trim().is_empty() {
            anyhow::bail!("salt key must not be empty");
        }

        let mut config = GatewayConfig::new(self.merchant_id, self.salt_key, self.salt_index)
            .with_api_base_url(self.api_url)
            .with_app_base_url(self.app_url)
            .with_redirect_path(self.redirect_path)
            .with_callback_path(self.callback_path);
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}
