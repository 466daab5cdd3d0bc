use serde::{Deserialize, Serialize};

use doiman_registry::{DataCiteInstance, RegistryConfig};

/// Local record tracking one externally-registered DOI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoiRecordRow {
    pub id: i64,
    /// Owning resource; nullable on resource deletion.
    pub resource_id: Option<String>,
    /// The identifier, nullable until the first draft transition.
    pub doi: Option<String>,
    /// Cached citation snippet, derived after reaching findable.
    pub citation_snippet: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One persisted audit trail row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRow {
    pub id: i64,
    pub record_id: i64,
    /// RFC 3339 timestamp of the call.
    pub at: String,
    pub method: String,
    pub url: String,
    pub request_body: Option<String>,
    pub response_status: Option<u16>,
    pub response_body: Option<String>,
    pub error: Option<String>,
}

/// One stored authority configuration (environment + credentials).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationRow {
    pub id: i64,
    pub is_active: bool,
    pub instance: String,
    pub doi_prefix: String,
    pub repo_id: String,
    pub password: String,
    pub note: String,
}

impl ConfigurationRow {
    /// Build a registry client config from this row.
    pub fn to_registry_config(&self) -> anyhow::Result<RegistryConfig> {
        let instance: DataCiteInstance = self
            .instance
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
        Ok(RegistryConfig::new(
            instance,
            self.repo_id.clone(),
            self.password.clone(),
            self.doi_prefix.clone(),
        ))
    }
}
