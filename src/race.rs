//! First-answer-wins race across providers under a single deadline.

use std::{future::Future, time::Duration};

use futures::{stream::FuturesUnordered, StreamExt};
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{
    config::{ProviderConfig, ProviderId},
    errors::{LookupError, RaceError},
};

/// Anything that can enter a race under a source tag.
pub trait Entrant {
    fn provider_id(&self) -> ProviderId;
}

impl Entrant for ProviderId {
    fn provider_id(&self) -> ProviderId {
        *self
    }
}

impl Entrant for ProviderConfig {
    fn provider_id(&self) -> ProviderId {
        self.id
    }
}

/// Runs `query` once per provider, concurrently, and returns the first success.
///
/// Queries are polled in place rather than spawned. Once the race is settled,
/// either by a winner or by the deadline, the ones still in flight are dropped
/// unpolled, which is what abandons their I/O; a late result is never seen.
///
/// Each query also receives a child of the race's [`CancellationToken`]. Only
/// the race cancels the parent, right before dropping the queries, so work a
/// query hands off elsewhere (a spawned task, another runtime) can observe it.
/// A query cancelling its own child token affects no other query.
///
/// Failed queries do not end the race early: if every provider fails, the
/// call still waits for `timeout` and reports [`RaceError::Timeout`] with the
/// collected failures.
///
/// # Type Parameters
/// * `P` - Provider description handed to each query
/// * `T` - The value a successful query produces
/// * `F` - Closure that starts the query for one provider
/// * `Fut` - Future returned by the closure
pub async fn race<'a, P, T, F, Fut>(
    providers: &'a [P],
    timeout: Duration,
    query: F,
) -> Result<(ProviderId, T), RaceError>
where
    P: Entrant,
    F: Fn(&'a P, CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, LookupError>>,
{
    if providers.is_empty() {
        return Err(RaceError::NoProviders);
    }

    // Nothing can beat a zero deadline.
    if timeout.is_zero() {
        return Err(RaceError::Timeout {
            after: timeout,
            failures: Vec::new(),
        });
    }

    let cancel = CancellationToken::new();
    let deadline = time::sleep(timeout);
    tokio::pin!(deadline);

    let mut in_flight = providers
        .iter()
        .map(|provider| {
            let provider_id = provider.provider_id();
            let fut = query(provider, cancel.child_token());
            async move { (provider_id, fut.await) }
        })
        .collect::<FuturesUnordered<_>>();

    let mut failures = Vec::new();

    let outcome = loop {
        tokio::select! {
            biased;

            () = &mut deadline => {
                tracing::warn!(
                    ?timeout,
                    failed = failures.len(),
                    pending = in_flight.len(),
                    "race timed out"
                );
                break Err(RaceError::Timeout {
                    after: timeout,
                    failures: std::mem::take(&mut failures),
                });
            }
            Some((provider_id, result)) = in_flight.next(), if !in_flight.is_empty() => {
                match result {
                    Ok(value) => {
                        tracing::debug!(provider = %provider_id, "provider won the race");
                        break Ok((provider_id, value));
                    }
                    Err(e) => {
                        tracing::debug!(provider = %provider_id, error = %e, "provider failed");
                        failures.push((provider_id, e));
                    }
                }
            }
        }
    };

    cancel.cancel();
    drop(in_flight);

    outcome
}
