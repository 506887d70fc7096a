use std::fmt;

use serde::{Deserialize, Serialize};

/// Address resolved from a postal code.
///
/// Providers disagree on field names, so decoding accepts each provider's
/// vocabulary alongside the canonical names. Every field is optional: a
/// provider that omits one still yields an address. When a payload carries
/// several names for the same field, the canonical one wins, then ViaCEP's
/// spelling, then BrasilAPI's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireAddress")]
pub struct Address {
    pub postal_code: Option<String>,
    pub street: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub locality: Option<String>,
    pub region_code: Option<String>,
}

/// Every spelling providers use, each in its own slot.
#[derive(Deserialize)]
struct WireAddress {
    #[serde(default)]
    postal_code: Option<String>,
    #[serde(default)]
    cep: Option<String>,
    #[serde(default)]
    street: Option<String>,
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    complement: Option<String>,
    #[serde(default)]
    complemento: Option<String>,
    #[serde(default)]
    neighborhood: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    locality: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region_code: Option<String>,
    #[serde(default)]
    uf: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl From<WireAddress> for Address {
    fn from(wire: WireAddress) -> Self {
        Self {
            postal_code: wire.postal_code.or(wire.cep),
            street: wire.street.or(wire.logradouro),
            complement: wire.complement.or(wire.complemento),
            neighborhood: wire.neighborhood.or(wire.bairro),
            locality: wire.locality.or(wire.localidade).or(wire.city),
            region_code: wire.region_code.or(wire.uf).or(wire.state),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("postal_code", &self.postal_code),
            ("street", &self.street),
            ("complement", &self.complement),
            ("neighborhood", &self.neighborhood),
            ("locality", &self.locality),
            ("region_code", &self.region_code),
        ];

        let mut first = true;
        for (name, value) in fields {
            let Some(value) = value else { continue };
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}
