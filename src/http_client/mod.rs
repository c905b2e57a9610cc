//! Shared HTTP client for lookup services.

mod user_agent;

pub use user_agent::{resolve_user_agent, USER_AGENT};

use reqwest::Client;

/// Build the client shared by every fetcher of a race.
///
/// No client-level timeouts are set: every request, connection setup
/// included, is bounded by the race deadline alone.
pub fn build_client(user_agent_config: Option<&str>) -> Result<Client, reqwest::Error> {
    let user_agent = resolve_user_agent(user_agent_config);
    Client::builder()
        .user_agent(&user_agent)
        .gzip(true)
        .brotli(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client() {
        assert!(build_client(None).is_ok());
        assert!(build_client(Some("MyBot/1.0")).is_ok());
    }
}
