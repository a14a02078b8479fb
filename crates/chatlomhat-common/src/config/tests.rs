#[cfg(test)]
mod tests {
    use super::super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_override_always_wins() {
        assert_eq!(
            resolve_api_url(Some("https://math.example.com"), RuntimeEnv::Production),
            "https://math.example.com"
        );
        assert_eq!(
            resolve_api_url(Some("http://10.0.0.5:9000"), RuntimeEnv::Development),
            "http://10.0.0.5:9000"
        );
    }

    #[test]
    fn test_environment_fallbacks() {
        assert_eq!(resolve_api_url(None, RuntimeEnv::Production), PRODUCTION_API_URL);
        assert_eq!(resolve_api_url(None, RuntimeEnv::Development), LOCAL_API_URL);
        assert_eq!(resolve_api_url(None, RuntimeEnv::Test), LOCAL_API_URL);
    }

    #[test]
    fn test_blank_override_is_ignored() {
        assert_eq!(resolve_api_url(Some("   "), RuntimeEnv::Production), PRODUCTION_API_URL);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(
            resolve_api_url(Some("http://localhost:5002/"), RuntimeEnv::Development),
            "http://localhost:5002"
        );
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let backend = BackendConfig::resolve(None, RuntimeEnv::Development);
        assert_eq!(backend.endpoint("/health"), "http://localhost:5002/health");
        assert_eq!(backend.endpoint("solve"), "http://localhost:5002/solve");
    }

    #[test]
    fn test_runtime_env_parse_is_lenient() {
        assert_eq!(RuntimeEnv::parse("PRODUCTION"), RuntimeEnv::Production);
        assert_eq!(RuntimeEnv::parse("test"), RuntimeEnv::Test);
        assert_eq!(RuntimeEnv::parse("staging"), RuntimeEnv::Development);
    }

    #[test]
    fn test_toml_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.backend.environment, RuntimeEnv::Development);
        assert!(config.backend.api_url.is_none());
        assert_eq!(config.server.max_sessions, 1_000);
        assert_eq!(config.backend.request_timeout(), std::time::Duration::from_secs(60));
    }

    #[test]
    fn test_toml_values() {
        let config = AppConfig::from_toml_str(
            r#"
            [server]
            bind = "0.0.0.0:8080"

            max_sessions = 50

            [backend]
            environment = "production"
            request_timeout_ms = 2500
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.max_sessions, 50);
        assert_eq!(config.backend.request_timeout_ms, 2500);
        assert_eq!(config.backend_config().api_url, PRODUCTION_API_URL);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = AppConfig::from_toml_str(
            r#"
            [backend]
            api_url = "http://from-file:5002"
            environment = "production"
            "#,
        )
        .unwrap();
        config.apply_overrides(lookup_from(&[
            (ENV_API_URL, "http://from-env:7000"),
            (ENV_BIND, "127.0.0.1:4000"),
        ]));

        let backend = config.backend_config();
        assert_eq!(backend.api_url, "http://from-env:7000");
        assert_eq!(backend.environment, RuntimeEnv::Production);
        assert_eq!(config.server.socket_addr().unwrap().port(), 4000);
    }

    #[test]
    fn test_invalid_bind_is_config_error() {
        let mut config = AppConfig::default();
        config.apply_overrides(lookup_from(&[(ENV_BIND, "not-an-address")]));
        assert!(matches!(config.server.socket_addr(), Err(ChatLomhatError::Config(_))));
    }
}
