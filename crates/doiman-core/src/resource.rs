//! Resource collaborator interface.
//!
//! The surrounding catalog owns the full metadata model; the lifecycle core
//! only needs the subset below to build a registration payload and a
//! landing URL.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// External identifier entry for a creator beyond ORCID, e.g. an
/// institutional person registry id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionId {
    pub scheme_uri: String,
    pub scheme_name: String,
    pub value: String,
}

/// One creator of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCreator {
    /// Display name ("Family, Given").
    pub name: String,

    #[serde(default)]
    pub given_name: Option<String>,

    #[serde(default)]
    pub family_name: Option<String>,

    /// ORCID id (bare, e.g. `0000-0001-2345-6789`).
    #[serde(default)]
    pub orcid_id: Option<String>,

    /// Institutional person identifier, with its scheme.
    #[serde(default)]
    pub institution_id: Option<InstitutionId>,
}

/// The slice of a catalog resource the DOI core consumes.
///
/// All metadata fields are optional here; the metadata builder enforces
/// which of them are required and reports every missing one at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Stable catalog id, also used in the landing URL.
    pub id: String,

    #[serde(default)]
    pub resource_type: Option<String>,

    #[serde(default)]
    pub resource_type_general: Option<String>,

    #[serde(default)]
    pub creators: Vec<ResourceCreator>,

    /// Start date; its year becomes the publication year.
    #[serde(default)]
    pub date_start: Option<NaiveDate>,

    #[serde(default)]
    pub title_en: Option<String>,

    #[serde(default)]
    pub title_de: Option<String>,

    #[serde(default)]
    pub abstract_en: Option<String>,

    #[serde(default)]
    pub abstract_de: Option<String>,

    #[serde(default)]
    pub publisher: Option<String>,

    #[serde(default)]
    pub language: Option<String>,
}

/// Where landing pages live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site domain, e.g. `data.example.org`.
    pub domain: String,
}

impl SiteConfig {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    /// Externally resolvable landing-page URL for a resource.
    pub fn landing_url(&self, resource_id: &str) -> String {
        format!("https://{}/resolve/{}", self.domain, resource_id)
    }
}
