//! Resolves a fixed postal code by racing the public CEP providers.
//!
//! Queries BrasilAPI and ViaCEP at the same time and prints whichever answers
//! first, or a timeout message if neither does within one second. Log output
//! is controlled through `RUST_LOG`.

use cep_race_client::{CepClient, ProviderConfig, RaceConfig, RaceError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const CEP: &str = "01153000";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    if let Err(e) = color_eyre::install() {
        tracing::warn!("failed to install error report hooks: {e}");
    }

    let cfg = RaceConfig::default();
    let timeout = cfg.timeout;
    let client = CepClient::new(ProviderConfig::defaults(), cfg);

    match client.lookup(CEP).await {
        Ok((provider, address)) => {
            println!("Address from {provider}: {address}");
        }
        Err(RaceError::Timeout { failures, .. }) => {
            for (provider, error) in &failures {
                tracing::info!(%provider, %error, "provider failed");
            }
            println!("Error: timeout - no provider answered within {timeout:?}");
        }
        Err(e) => {
            println!("Error: {e}");
        }
    }
}
