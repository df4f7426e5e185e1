//! Build-time client configuration.

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TOKEN_KEY: &str = "token";

/// Where the API lives and where the bearer token is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub token_key: String,
}

impl AppConfig {
    /// Reads `FINANZAS_API_URL` at compile time, falling back to the local
    /// development server.
    pub fn from_env() -> Self {
        Self::with_base_url(option_env!("FINANZAS_API_URL").unwrap_or(DEFAULT_API_BASE_URL))
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            api_base_url: base_url.trim_end_matches('/').to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = AppConfig::with_base_url("https://api.example.test/v1//");
        assert_eq!(config.api_base_url, "https://api.example.test/v1");
        assert_eq!(config.token_key, "token");
    }

    #[test]
    fn default_points_at_local_server() {
        assert_eq!(AppConfig::default().api_base_url, "http://localhost:3000");
    }
}
