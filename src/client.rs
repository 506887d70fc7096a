use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Instant,
};

use crate::{
    address::Address,
    config::{ProviderConfig, ProviderId, RaceConfig},
    errors::{LookupError, RaceError},
    provider::fetch_address,
    race::race,
};

#[derive(Debug, Default)]
struct ProviderStats {
    wins: u64,
    total_latency_ms: f64,
    errors: u64,
    timeouts: u64,
}

/// Snapshot of provider performance statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderStatsSnapshot {
    /// Number of times this provider won the race.
    pub wins: u64,
    /// Average latency in milliseconds for winning lookups.
    pub avg_latency_ms: f64,
    /// Number of lookups from this provider that failed before the deadline.
    pub errors: u64,
    /// Number of timed-out races in which this provider was still in flight.
    ///
    /// A zero deadline starts no provider, so it never counts here.
    pub timeouts: u64,
}

/// A postal code client that races every configured provider.
///
/// Each lookup queries all providers at once and returns the first address
/// that comes back, or a timeout once the configured deadline elapses.
/// Statistics are only recorded; they never influence which providers run.
#[derive(Clone)]
pub struct CepClient {
    http: reqwest::Client,
    providers: Arc<Vec<ProviderConfig>>,
    cfg: RaceConfig,
    stats: Arc<Mutex<HashMap<ProviderId, ProviderStats>>>,
}

impl CepClient {
    /// Creates a new client with the specified providers and configuration.
    ///
    /// # Example
    /// ```no_run
    /// use cep_race_client::{CepClient, ProviderConfig, RaceConfig};
    /// use std::time::Duration;
    ///
    /// let client = CepClient::new(
    ///     ProviderConfig::defaults(),
    ///     RaceConfig::with_timeout(Duration::from_millis(800)),
    /// );
    /// ```
    pub fn new(providers: Vec<ProviderConfig>, cfg: RaceConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build HTTP client: {e}. Falling back to defaults.");
                reqwest::Client::new()
            });

        Self::with_http_client(http, providers, cfg)
    }

    /// Creates a client that shares an existing HTTP client.
    ///
    /// Statistics are keyed by [`ProviderId`]: providers configured with the
    /// same id share one entry.
    pub fn with_http_client(
        http: reqwest::Client,
        providers: Vec<ProviderConfig>,
        cfg: RaceConfig,
    ) -> Self {
        let stats_map = providers
            .iter()
            .map(|p| (p.id, ProviderStats::default()))
            .collect();

        Self {
            http,
            providers: Arc::new(providers),
            cfg,
            stats: Arc::new(Mutex::new(stats_map)),
        }
    }

    /// Returns the configured providers.
    pub fn providers(&self) -> &[ProviderConfig] {
        &self.providers
    }

    /// Returns the race configuration.
    pub fn config(&self) -> &RaceConfig {
        &self.cfg
    }

    /// Returns a snapshot of accumulated statistics for each provider.
    pub fn provider_stats(&self) -> HashMap<ProviderId, ProviderStatsSnapshot> {
        let stats = self.stats.lock().expect("provider stats mutex poisoned");

        stats
            .iter()
            .map(|(id, s)| {
                let avg = if s.wins > 0 {
                    s.total_latency_ms / (s.wins as f64)
                } else {
                    0.0
                };

                (
                    *id,
                    ProviderStatsSnapshot {
                        wins: s.wins,
                        avg_latency_ms: avg,
                        errors: s.errors,
                        timeouts: s.timeouts,
                    },
                )
            })
            .collect()
    }

    /// Resolves `cep` to an address using whichever provider answers first.
    ///
    /// The postal code is passed to every provider unchanged. Returns the
    /// address together with the ID of the provider that produced it.
    pub async fn lookup(&self, cep: &str) -> Result<(ProviderId, Address), RaceError> {
        let start = Instant::now();

        let outcome = race(self.providers.as_slice(), self.cfg.timeout, |provider, cancel| {
            let http = &self.http;
            let stats = &self.stats;
            async move {
                let result = fetch_address(http, provider, cep, &cancel).await;
                if let Err(e) = &result {
                    if !matches!(e, LookupError::Cancelled) {
                        tracing::debug!(provider = %provider.id, error = %e, "lookup failed");
                        if let Ok(mut stats) = stats.lock() {
                            if let Some(entry) = stats.get_mut(&provider.id) {
                                entry.errors += 1;
                            }
                        }
                    }
                }
                result
            }
        })
        .await;

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match &outcome {
            Ok((winner_id, _)) => {
                if let Ok(mut stats) = self.stats.lock() {
                    if let Some(entry) = stats.get_mut(winner_id) {
                        entry.wins += 1;
                        entry.total_latency_ms += elapsed_ms;
                    }
                }
            }
            Err(RaceError::Timeout { after, failures }) if !after.is_zero() => {
                if let Ok(mut stats) = self.stats.lock() {
                    for provider in self.providers.iter() {
                        if failures.iter().any(|(id, _)| *id == provider.id) {
                            continue;
                        }
                        if let Some(entry) = stats.get_mut(&provider.id) {
                            entry.timeouts += 1;
                        }
                    }
                }
            }
            Err(_) => {}
        }

        outcome
    }

    /// Resolves `cep`, returning only the address without provider information.
    pub async fn lookup_any(&self, cep: &str) -> Result<Address, RaceError> {
        let (_id, address) = self.lookup(cep).await?;
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn lookup_without_providers_fails_fast() {
        let client = CepClient::new(Vec::new(), RaceConfig::default());
        let res = client.lookup("01153000").await;
        assert!(matches!(res, Err(RaceError::NoProviders)));
        assert!(client.provider_stats().is_empty());
    }

    #[tokio::test]
    async fn zero_timeout_counts_no_provider_as_timed_out() {
        let client = CepClient::new(
            ProviderConfig::defaults(),
            RaceConfig::with_timeout(Duration::ZERO),
        );

        let err = client.lookup_any("01153000").await.unwrap_err();
        assert!(err.is_timeout());

        let stats = client.provider_stats();
        assert_eq!(stats.len(), 2);
        for snapshot in stats.values() {
            assert_eq!(snapshot.timeouts, 0);
            assert_eq!(snapshot.wins, 0);
            assert_eq!(snapshot.errors, 0);
        }
    }

    #[test]
    fn providers_sharing_an_id_share_stats() {
        let twin = ProviderConfig {
            url_template: "http://localhost:1/{cep}".to_string(),
            ..ProviderConfig::via_cep()
        };
        let client = CepClient::new(
            vec![ProviderConfig::via_cep(), twin],
            RaceConfig::default(),
        );

        assert_eq!(client.providers().len(), 2);
        assert_eq!(client.provider_stats().len(), 1);
    }
}
