use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.openalex.org";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    /// Contact address for the OpenAlex polite pool, sent as `mailto`.
    pub mailto: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            mailto: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_without_double_slashes() {
        let config = ClientConfig {
            api_url: "https://api.openalex.org/".to_owned(),
            ..ClientConfig::default()
        };
        assert_eq!(
            config.endpoint_url("/domains"),
            "https://api.openalex.org/domains"
        );
        assert_eq!(config.endpoint_url("fields"), "https://api.openalex.org/fields");
    }
}
