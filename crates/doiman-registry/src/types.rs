//! Wire types for the authority's JSON:API protocol.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a DOI at the registration authority.
///
/// Never stored locally; always re-derived by querying the authority.
/// `Unset` is synthetic: no record found, or no DOI assigned yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoiState {
    Unset,
    Draft,
    Registered,
    Findable,
}

impl DoiState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Draft => "draft",
            Self::Registered => "registered",
            Self::Findable => "findable",
        }
    }
}

impl std::fmt::Display for DoiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DoiState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unset" => Ok(Self::Unset),
            "draft" => Ok(Self::Draft),
            "registered" => Ok(Self::Registered),
            "findable" => Ok(Self::Findable),
            other => Err(format!("unknown DOI state: {other}")),
        }
    }
}

/// State-changing event understood by the authority.
///
/// `publish` moves draft/registered to findable, `register` moves draft to
/// registered, `hide` moves findable back to registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoiEvent {
    Register,
    Publish,
    Hide,
}

impl std::fmt::Display for DoiEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Register => "register",
            Self::Publish => "publish",
            Self::Hide => "hide",
        };
        f.write_str(s)
    }
}

/// One creator, with optional external identifier entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_identifiers: Vec<NameIdentifier>,
}

/// External identifier for a creator (ORCID, institutional person id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameIdentifier {
    pub scheme_uri: String,
    pub name_identifier: String,
    pub name_identifier_scheme: String,
}

/// Resource type pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    pub resource_type: String,
    pub resource_type_general: String,
}

/// Multilingual title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub lang: String,
    pub title: String,
}

/// Multilingual description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    pub lang: String,
    pub description: String,
    pub description_type: String,
}

/// DOI attributes as sent to and returned by the authority.
///
/// Serves both as the registration payload (built fresh per mutating call)
/// and as the parsed `data.attributes` of responses; either direction only
/// populates the fields it has.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoiAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<DoiEvent>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creators: Vec<Creator>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<ResourceType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub titles: Vec<Title>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub descriptions: Vec<Description>,
}

/// JSON:API request envelope: `{"data": {"type": "dois", "attributes": ...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct DoiRequest<'a> {
    pub data: DoiRequestData<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoiRequestData<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: &'a DoiAttributes,
}

impl<'a> DoiRequest<'a> {
    /// Wrap attributes in the fixed `"dois"` resource envelope.
    pub fn new(attributes: &'a DoiAttributes) -> Self {
        Self {
            data: DoiRequestData {
                kind: "dois",
                attributes,
            },
        }
    }
}

/// JSON:API response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct DoiResponse {
    pub data: DoiResponseData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoiResponseData {
    #[serde(default)]
    pub id: Option<String>,

    pub attributes: DoiAttributes,

    #[serde(default)]
    pub relationships: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_envelope_shape() {
        let attrs = DoiAttributes {
            prefix: Some("10.5438".to_string()),
            event: Some(DoiEvent::Publish),
            ..Default::default()
        };
        let body = serde_json::to_value(DoiRequest::new(&attrs)).unwrap();
        assert_eq!(body["data"]["type"], "dois");
        assert_eq!(body["data"]["attributes"]["prefix"], "10.5438");
        assert_eq!(body["data"]["attributes"]["event"], "publish");
        // Unset fields must be omitted, not serialized as null.
        assert!(body["data"]["attributes"].get("doi").is_none());
        assert!(body["data"]["attributes"].get("creators").is_none());
    }

    #[test]
    fn attributes_round_trip_camel_case() {
        let json = serde_json::json!({
            "doi": "10.5438/0012",
            "state": "findable",
            "publicationYear": 2024,
            "creators": [{
                "name": "Doe, Jane",
                "givenName": "Jane",
                "familyName": "Doe",
                "nameIdentifiers": [{
                    "schemeUri": "https://orcid.org",
                    "nameIdentifier": "0000-0001-2345-6789",
                    "nameIdentifierScheme": "ORCID"
                }]
            }]
        });
        let attrs: DoiAttributes = serde_json::from_value(json).unwrap();
        assert_eq!(attrs.publication_year, Some(2024));
        assert_eq!(attrs.creators[0].given_name.as_deref(), Some("Jane"));
        assert_eq!(
            attrs.creators[0].name_identifiers[0].name_identifier_scheme,
            "ORCID"
        );
    }

    #[test]
    fn doi_state_parses_lowercase_only() {
        assert_eq!("findable".parse::<DoiState>().unwrap(), DoiState::Findable);
        assert!("Findable".parse::<DoiState>().is_err());
        assert_eq!(DoiState::Unset.to_string(), "unset");
    }
}
