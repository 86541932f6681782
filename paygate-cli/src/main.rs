//! Paygate CLI
//!
//! Command-line collaborator for the hosted checkout flow: starts a checkout,
//! looks up its status and verifies server callbacks.

mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paygate_client::PhonePeClient;

use config::GatewayArgs;

#[derive(Parser)]
#[command(name = "paygate")]
#[command(author, version, about = "Hosted checkout gateway CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    gateway: GatewayArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a hosted checkout and print the session
    Pay {
        /// Amount in whole currency units (e.g. rupees)
        #[arg(long)]
        amount: f64,
        /// Shopper's mobile number; a placeholder is sent when omitted
        #[arg(long, default_value = "")]
        mobile: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
    },
    /// Look up the state of a payment
    Status {
        /// Merchant transaction ID returned by `pay`
        merchant_transaction_id: String,
    },
    /// Verify and decode a server-to-server callback
    VerifyCallback {
        /// The raw callback body, `{"response": "..."}`
        #[arg(long, required_unless_present = "response")]
        body: Option<String>,
        /// Only the `response` field of the callback body
        #[arg(long, conflicts_with = "body")]
        response: Option<String>,
        /// The callback's X-VERIFY header
        #[arg(long)]
        x_verify: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,paygate_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.gateway.into_config()?;
    tracing::debug!(?config, "Loaded gateway configuration");

    let client = PhonePeClient::new(config)?;

    if let Err(err) = run(&client, cli.command).await {
        eprintln!("✗ {}", err);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(client: &PhonePeClient, command: Commands) -> Result<()> {
    match command {
        Commands::Pay {
            amount,
            mobile,
            email,
            name,
        } => {
            let session = client.create_checkout(amount, &mobile, &email, &name).await?;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }

        Commands::Status {
            merchant_transaction_id,
        } => {
            let status = client.check_status(&merchant_transaction_id).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }

        Commands::VerifyCallback {
            body,
            response,
            x_verify,
        } => {
            let payload = match (body, response) {
                (Some(body), _) => client.verify_callback_body(&body, &x_verify)?,
                (None, Some(response)) => client.verify_callback(&response, &x_verify)?,
                (None, None) => anyhow::bail!("either --body or --response is required"),
            };
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATEWAY_FLAGS: [&str; 5] = ["paygate", "--merchant-id", "M", "--salt-key", "s"];

    #[test]
    fn test_verify_callback_accepts_raw_body() {
        let args = GATEWAY_FLAGS
            .iter()
            .copied()
            .chain(["verify-callback", "--body", r#"{"response":"e30="}"#, "--x-verify", "x###1"]);
        let cli = Cli::try_parse_from(args).unwrap();

        assert!(matches!(
            cli.command,
            Commands::VerifyCallback { body: Some(_), response: None, .. }
        ));
    }

    #[test]
    fn test_verify_callback_requires_a_payload() {
        let args = GATEWAY_FLAGS
            .iter()
            .copied()
            .chain(["verify-callback", "--x-verify", "x###1"]);
        assert!(Cli::try_parse_from(args).is_err());
    }
}
