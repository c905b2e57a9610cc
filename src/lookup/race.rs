//! First-answer-wins race across lookup services.

use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::deadline::DeadlineToken;
use super::endpoint::Endpoint;
use super::fetcher::fetch;
use super::outcome::RaceResult;

/// Races one fetcher per endpoint against a shared deadline.
#[derive(Debug, Clone)]
pub struct Racer {
    client: Client,
    endpoints: Vec<Endpoint>,
    timeout: Duration,
}

impl Racer {
    pub fn new(client: Client, endpoints: Vec<Endpoint>, timeout: Duration) -> Self {
        Self {
            client,
            endpoints,
            timeout,
        }
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Look up `cep` on every endpoint and return the first outcome.
    ///
    /// Whatever arrives later is never read. The shared deadline is canceled
    /// when this returns, which aborts fetchers still in flight.
    pub async fn race(&self, cep: &str) -> RaceResult {
        let start = Instant::now();
        let deadline = DeadlineToken::after(self.timeout);
        let _cancel_on_return = deadline.drop_guard();

        // One slot per producer so a late fetcher never blocks.
        let (sink, mut results) = mpsc::channel(self.endpoints.len().max(2));

        for endpoint in &self.endpoints {
            let client = self.client.clone();
            let deadline = deadline.clone();
            let endpoint = endpoint.clone();
            let sink = sink.clone();
            let url = endpoint.url_for(cep);
            tokio::spawn(async move {
                fetch(&client, &deadline, &endpoint, &url, &sink).await;
            });
        }
        drop(sink);

        // Fetchers watch the same deadline, so their own deadline outcomes
        // can land in the channel as the timer fires. Those mean nobody
        // answered in time.
        let result = tokio::select! {
            biased;
            _ = deadline.done() => RaceResult::TimedOut,
            Some(outcome) = results.recv() => {
                if outcome.is_deadline_exceeded() {
                    RaceResult::TimedOut
                } else {
                    RaceResult::Resolved { outcome }
                }
            }
        };

        match &result {
            RaceResult::Resolved { outcome } => info!(
                "Race for {} resolved by {} after {}ms",
                cep,
                outcome.service(),
                start.elapsed().as_millis()
            ),
            RaceResult::TimedOut => info!(
                "Race for {} timed out after {}ms",
                cep,
                self.timeout.as_millis()
            ),
        }
        debug!("Canceling remaining fetchers for {}", cep);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::address::Schema;

    fn racer(endpoints: Vec<Endpoint>, timeout: Duration) -> Racer {
        Racer::new(Client::new(), endpoints, timeout)
    }

    #[test]
    fn test_accessors() {
        let racer = racer(Endpoint::defaults(), Duration::from_millis(750));
        assert_eq!(racer.endpoints(), Endpoint::defaults().as_slice());
        assert_eq!(racer.timeout(), Duration::from_millis(750));
    }

    #[tokio::test]
    async fn test_no_endpoints_times_out() {
        let result = racer(Vec::new(), Duration::from_millis(30))
            .race("01001000")
            .await;
        assert!(result.is_timed_out());
    }

    #[tokio::test]
    async fn test_invalid_urls_fail_fast() {
        let endpoints = vec![
            Endpoint::new("ServiceA", "not a url/{cep}", Schema::BrasilApi),
            Endpoint::new("ServiceB", "::/{cep}", Schema::ViaCep),
        ];
        let start = Instant::now();
        let result = racer(endpoints, Duration::from_secs(5))
            .race("01001000")
            .await;

        assert!(start.elapsed() < Duration::from_secs(1));
        let message = result.to_string();
        assert!(message.starts_with("Error in Service"), "{}", message);
    }
}
