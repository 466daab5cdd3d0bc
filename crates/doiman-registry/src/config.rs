//! Client configuration and authority environments.

use serde::{Deserialize, Serialize};

/// Which DataCite instance to talk to.
///
/// Test and production use disjoint base URLs; the citation service behind
/// `doi_base_url` only returns data against production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataCiteInstance {
    Test,
    Production,
}

impl DataCiteInstance {
    /// Resolve the base URLs for this instance.
    pub fn environment(self) -> Environment {
        match self {
            Self::Test => Environment {
                backend_url: "https://doi.test.datacite.org/dois",
                api_url: "https://api.test.datacite.org/",
                doi_base_url: "https://handle.stage.datacite.org/",
            },
            Self::Production => Environment {
                backend_url: "https://doi.datacite.org/dois",
                api_url: "https://api.datacite.org/",
                doi_base_url: "https://doi.org/",
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

impl std::str::FromStr for DataCiteInstance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown DataCite instance: {other}")),
        }
    }
}

/// Base URLs for one authority environment.
#[derive(Debug, Clone, Copy)]
pub struct Environment {
    /// Fabrica UI base URL, used to link to the authority's record.
    pub backend_url: &'static str,

    /// REST API base URL, used for every client call.
    pub api_url: &'static str,

    /// Resolver base URL, used for citation snippet lookups.
    pub doi_base_url: &'static str,
}

/// Registry client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Authority instance (selects all base URLs).
    #[serde(default = "default_instance")]
    pub instance: DataCiteInstance,

    /// Repository id, doubles as the Basic auth username.
    pub repo_id: String,

    /// Basic auth password.
    pub password: String,

    /// DOI prefix assigned to this repository (e.g. `10.5438`).
    pub prefix: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Override for the REST API base URL (tests point this at a mock).
    #[serde(default)]
    pub api_url: Option<String>,
}

fn default_instance() -> DataCiteInstance {
    DataCiteInstance::Test
}

fn default_timeout() -> u64 {
    15
}

impl RegistryConfig {
    /// Create a config for the given instance with required credentials.
    pub fn new(
        instance: DataCiteInstance,
        repo_id: impl Into<String>,
        password: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            instance,
            repo_id: repo_id.into(),
            password: password.into(),
            prefix: prefix.into(),
            timeout_secs: default_timeout(),
            api_url: None,
        }
    }

    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `DOIMAN_INSTANCE` | `test` (default) or `production` |
    /// | `DOIMAN_REPO_ID` | Repository id / Basic auth username |
    /// | `DOIMAN_PASSWORD` | Basic auth password |
    /// | `DOIMAN_PREFIX` | DOI prefix |
    /// | `DOIMAN_TIMEOUT` | Request timeout in seconds (default: 15) |
    /// | `DOIMAN_API_URL` | REST API base URL override |
    pub fn from_env() -> Self {
        Self {
            instance: std::env::var("DOIMAN_INSTANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_instance),
            repo_id: std::env::var("DOIMAN_REPO_ID").unwrap_or_default(),
            password: std::env::var("DOIMAN_PASSWORD").unwrap_or_default(),
            prefix: std::env::var("DOIMAN_PREFIX").unwrap_or_default(),
            timeout_secs: std::env::var("DOIMAN_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
            api_url: std::env::var("DOIMAN_API_URL").ok(),
        }
    }

    /// Effective REST API base URL.
    pub fn api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| self.instance.environment().api_url.to_string())
    }

    /// Effective resolver base URL for citation lookups.
    pub fn doi_base_url(&self) -> String {
        self.instance.environment().doi_base_url.to_string()
    }

    /// Link to the authority's own record page (Fabrica) for a DOI.
    pub fn backend_doi_url(&self, doi: &str) -> String {
        format!(
            "{}/{}",
            self.instance.environment().backend_url.trim_end_matches('/'),
            doi
        )
    }

    /// Override the API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Override the timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
