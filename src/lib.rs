//! A postal code (CEP) client that races address providers.
//!
//! Every lookup queries all configured providers at once and returns the first
//! address that comes back. A single deadline bounds the whole lookup: when it
//! elapses, providers still in flight are cancelled and the lookup fails with
//! a timeout.
//!
//! # Quick Start
//!
//! ```no_run
//! use cep_race_client::{CepClient, ProviderConfig, RaceConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CepClient::new(ProviderConfig::defaults(), RaceConfig::default());
//!
//! let (provider, address) = client.lookup("01153000").await?;
//! println!("Got address from {provider}: {address}");
//! # Ok(())
//! # }
//! ```
//!
//! # Race Semantics
//!
//! 1. One cancellation token is created per lookup
//! 2. Every provider is queried concurrently with a clone of that token
//! 3. The first successful answer wins and the token is cancelled
//! 4. Failures are collected but never end the race before the deadline
//! 5. At the deadline the token is cancelled and the lookup reports a timeout
//!
//! Providers are not retried, ranked, or cached. The generic [`race`] function
//! drives the same logic for any provider query, which is how the client
//! itself is built.

pub mod address;
pub mod client;
pub mod config;
pub mod errors;
pub mod provider;
pub mod race;

pub use address::Address;
pub use client::{CepClient, ProviderStatsSnapshot};
pub use config::{ProviderConfig, ProviderId, RaceConfig};
pub use errors::{LookupError, RaceError};
pub use race::{race, Entrant};
pub use tokio_util::sync::CancellationToken;
