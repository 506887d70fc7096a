//! Single address lookup against one provider.

use tokio_util::sync::CancellationToken;

use crate::{address::Address, config::ProviderConfig, errors::LookupError};

/// Fetches the address for `cep` from one provider.
///
/// Issues exactly one GET. The request is abandoned as soon as `cancel`
/// fires, even mid-transfer, for callers that keep polling after cancelling;
/// inside a race, dropping the query abandons it first. Non-success statuses
/// and bodies that are not a JSON object are failures; missing address fields
/// are not.
pub async fn fetch_address(
    http: &reqwest::Client,
    provider: &ProviderConfig,
    cep: &str,
    cancel: &CancellationToken,
) -> Result<Address, LookupError> {
    let url = provider.url_for(cep);

    let request = async {
        let response = http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }

        let body = response.bytes().await?;
        decode_address(&body)
    };

    tokio::select! {
        biased;

        () = cancel.cancelled() => {
            tracing::trace!(provider = %provider.id, "lookup abandoned");
            Err(LookupError::Cancelled)
        }
        result = request => result,
    }
}

/// Decodes a provider body into an [`Address`].
pub fn decode_address(body: &[u8]) -> Result<Address, LookupError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(LookupError::NotAnObject);
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            decode_address(b"<html>oops</html>"),
            Err(LookupError::Decode(_))
        ));
    }

    #[test]
    fn rejects_non_object_json() {
        assert!(matches!(
            decode_address(br#"["01153000"]"#),
            Err(LookupError::NotAnObject)
        ));
        assert!(matches!(decode_address(b"null"), Err(LookupError::NotAnObject)));
    }

    #[test]
    fn rejects_mistyped_fields() {
        assert!(matches!(
            decode_address(br#"{"cep": 1153000}"#),
            Err(LookupError::Decode(_))
        ));
    }

    #[test]
    fn accepts_partial_object() {
        let address = decode_address(br#"{"cep": "01153000"}"#).unwrap();
        assert_eq!(address.postal_code.as_deref(), Some("01153000"));
        assert_eq!(address.street, None);
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits_the_request() {
        let http = reqwest::Client::new();
        let provider = ProviderConfig {
            id: crate::config::ProviderId("unreachable"),
            // Reserved TEST-NET-1 address; the request would hang or fail.
            url_template: "http://192.0.2.1/{cep}".to_string(),
        };
        let cancel = CancellationToken::new();
        cancel.cancel();

        let res = fetch_address(&http, &provider, "01153000", &cancel).await;
        assert!(matches!(res, Err(LookupError::Cancelled)));
    }
}
