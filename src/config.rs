use std::time::Duration;

/// Placeholder replaced by the postal code in a provider URL template.
pub const CEP_PLACEHOLDER: &str = "{cep}";

/// Unique identifier for an address provider.
///
/// Doubles as the source tag attached to every resolved address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProviderId(pub &'static str);

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Configuration for a single address provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Unique identifier for this provider.
    pub id: ProviderId,
    /// Lookup URL containing a `{cep}` placeholder.
    pub url_template: String,
}

impl ProviderConfig {
    /// BrasilAPI CEP v1 endpoint.
    pub fn brasil_api() -> Self {
        Self {
            id: ProviderId("BrasilAPI"),
            url_template: "https://brasilapi.com.br/api/cep/v1/{cep}".to_string(),
        }
    }

    /// ViaCEP JSON endpoint.
    pub fn via_cep() -> Self {
        Self {
            id: ProviderId("ViaCEP"),
            url_template: "http://viacep.com.br/ws/{cep}/json/".to_string(),
        }
    }

    /// The two public providers raced by default.
    pub fn defaults() -> Vec<Self> {
        vec![Self::brasil_api(), Self::via_cep()]
    }

    /// Builds the lookup URL for `cep`.
    ///
    /// The postal code is inserted verbatim. Templates without a placeholder
    /// get it appended as the final path segment.
    pub fn url_for(&self, cep: &str) -> String {
        if self.url_template.contains(CEP_PLACEHOLDER) {
            self.url_template.replace(CEP_PLACEHOLDER, cep)
        } else {
            format!("{}/{cep}", self.url_template.trim_end_matches('/'))
        }
    }
}

/// Race configuration.
#[derive(Debug, Clone)]
pub struct RaceConfig {
    /// Deadline for the whole race, measured from the start of the lookup.
    ///
    /// Providers still in flight when it elapses are cancelled and the lookup
    /// fails with a timeout.
    pub timeout: Duration,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(1),
        }
    }
}

impl RaceConfig {
    /// Creates a configuration with a custom deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_replaced_verbatim() {
        let provider = ProviderConfig::via_cep();
        assert_eq!(
            provider.url_for("01153000"),
            "http://viacep.com.br/ws/01153000/json/"
        );
        assert_eq!(
            ProviderConfig::brasil_api().url_for("01153-000"),
            "https://brasilapi.com.br/api/cep/v1/01153-000"
        );
    }

    #[test]
    fn template_without_placeholder_appends_segment() {
        let provider = ProviderConfig {
            id: ProviderId("plain"),
            url_template: "http://localhost:8080/cep/".to_string(),
        };
        assert_eq!(provider.url_for("01153000"), "http://localhost:8080/cep/01153000");
    }

    #[test]
    fn defaults_race_two_distinct_providers() {
        let providers = ProviderConfig::defaults();
        assert_eq!(providers.len(), 2);
        assert_ne!(providers[0].id, providers[1].id);
        assert_eq!(RaceConfig::default().timeout, Duration::from_secs(1));
    }
}
