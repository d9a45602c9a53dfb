use reqwest::Url;

use crate::error::GatewayError;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";

/// Endpoint and public key of the hosted backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub url: Url,
    pub anon_key: String,
}

impl BackendConfig {
    pub fn new(url: &str, anon_key: impl Into<String>) -> Result<Self, GatewayError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(GatewayError::Config(format!("{} is not set", URL_VAR)));
        }
        let url = Url::parse(url)
            .map_err(|e| GatewayError::Config(format!("invalid {} '{}': {}", URL_VAR, url, e)))?;

        let anon_key = anon_key.into();
        if anon_key.trim().is_empty() {
            return Err(GatewayError::Config(format!("{} is not set", ANON_KEY_VAR)));
        }

        Ok(Self { url, anon_key })
    }

    /// Reads the process environment, loading `.env` first when present.
    pub fn from_env() -> Result<Self, GatewayError> {
        dotenvy::dotenv().ok();

        let url = std::env::var(URL_VAR).unwrap_or_default();
        let anon_key = std::env::var(ANON_KEY_VAR).unwrap_or_default();
        Self::new(&url, anon_key)
    }

    /// Joins a service path such as `rest/v1/blogs` onto the project URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = BackendConfig::new("https://abc.supabase.co/", "anon").unwrap();
        assert_eq!(
            config.endpoint("/rest/v1/blogs"),
            "https://abc.supabase.co/rest/v1/blogs"
        );
    }

    #[test]
    fn rejects_missing_values() {
        assert!(matches!(
            BackendConfig::new("", "anon"),
            Err(GatewayError::Config(m)) if m.contains(URL_VAR)
        ));
        assert!(matches!(
            BackendConfig::new("https://abc.supabase.co", "  "),
            Err(GatewayError::Config(m)) if m.contains(ANON_KEY_VAR)
        ));
        assert!(BackendConfig::new("not a url", "anon").is_err());
    }

    #[test]
    #[serial]
    fn reads_environment() {
        std::env::set_var(URL_VAR, "http://127.0.0.1:54321");
        std::env::set_var(ANON_KEY_VAR, "public-anon-key");

        let config = BackendConfig::from_env().unwrap();
        assert_eq!(config.url.as_str(), "http://127.0.0.1:54321/");
        assert_eq!(config.anon_key, "public-anon-key");

        std::env::remove_var(URL_VAR);
        std::env::remove_var(ANON_KEY_VAR);
    }
}
