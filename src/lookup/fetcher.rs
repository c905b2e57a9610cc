//! Single-service fetch bound to a race deadline.

use std::future::Future;
use std::time::Instant;

use reqwest::{Client, StatusCode};
use tokio::sync::mpsc;
use tracing::debug;

use super::address::AddressRecord;
use super::deadline::DeadlineToken;
use super::endpoint::Endpoint;
use super::outcome::{FetchError, FetchOutcome};

/// Fetch one address and write exactly one outcome to `sink`.
///
/// Never blocks on the sink: if the race has already concluded and the
/// receiver is gone, the outcome is dropped.
pub async fn fetch(
    client: &Client,
    deadline: &DeadlineToken,
    endpoint: &Endpoint,
    url: &str,
    sink: &mpsc::Sender<FetchOutcome>,
) {
    let start = Instant::now();
    let service = endpoint.label.clone();

    let outcome = match lookup(client, deadline, endpoint, url).await {
        Ok(address) => FetchOutcome::Found { service, address },
        Err(error) => FetchOutcome::Failed { service, error },
    };

    debug!(
        "{} answered in {}ms: {}",
        endpoint.label,
        start.elapsed().as_millis(),
        outcome
    );

    if sink.try_send(outcome).is_err() {
        debug!("Discarding {} outcome, race already concluded", endpoint.label);
    }
}

async fn lookup(
    client: &Client,
    deadline: &DeadlineToken,
    endpoint: &Endpoint,
    url: &str,
) -> Result<AddressRecord, FetchError> {
    debug!("GET {} ({})", url, endpoint.label);

    let response = bounded(deadline, client.get(url).send()).await?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status(status));
    }

    let body = bounded(deadline, response.bytes()).await?;
    Ok(endpoint.schema.decode(&body)?)
}

/// Run a request future until it finishes or the deadline token is done.
async fn bounded<T>(
    deadline: &DeadlineToken,
    request: impl Future<Output = Result<T, reqwest::Error>>,
) -> Result<T, FetchError> {
    tokio::select! {
        result = request => result.map_err(FetchError::from),
        reason = deadline.done() => Err(reason.into()),
    }
}
