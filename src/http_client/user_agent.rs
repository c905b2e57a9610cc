//! User agent handling for lookup requests.

pub const USER_AGENT: &str = concat!("cep-race/", env!("CARGO_PKG_VERSION"));

/// Resolve user agent from config value.
/// - None or empty => default cep-race user agent
/// - other => custom user agent string
pub fn resolve_user_agent(config: Option<&str>) -> String {
    match config.map(str::trim) {
        None | Some("") => USER_AGENT.to_string(),
        Some(custom) => custom.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_user_agent_default() {
        let ua = resolve_user_agent(None);
        assert!(ua.starts_with("cep-race/"));
    }

    #[test]
    fn test_resolve_user_agent_blank_is_default() {
        assert_eq!(resolve_user_agent(Some("  ")), USER_AGENT);
    }

    #[test]
    fn test_resolve_user_agent_custom() {
        let ua = resolve_user_agent(Some("MyBot/1.0"));
        assert_eq!(ua, "MyBot/1.0");
    }
}
