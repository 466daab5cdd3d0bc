//! Registration payload builder.
//!
//! Assembles schema-compliant DOI attributes from a catalog resource,
//! enforcing required-field preconditions before any network traffic.

use doiman_registry::{
    Creator, Description, DoiAttributes, NameIdentifier, ResourceType, Title,
};

use crate::errors::MetadataError;
use crate::resource::{ResourceCreator, ResourceRecord, SiteConfig};

const ORCID_SCHEME_URI: &str = "https://orcid.org";
const ABSTRACT_TYPE: &str = "Abstract";

/// A payload ready for submission, plus the landing URL it points at.
#[derive(Debug, Clone)]
pub struct BuiltMetadata {
    pub attributes: DoiAttributes,
    pub url: String,
}

/// Build a registration payload for a resource.
///
/// Required: resource type, resource type general, at least one creator,
/// start date, English title, publisher, language. Every missing field is
/// collected and reported in one [`MetadataError::MissingFields`]; the
/// builder never fails on just the first gap.
///
/// The prefix comes from the resource's existing DOI when there is one,
/// otherwise from the active configuration's prefix.
pub fn build_metadata(
    resource: &ResourceRecord,
    existing_doi: Option<&str>,
    default_prefix: &str,
    site: &SiteConfig,
) -> Result<BuiltMetadata, MetadataError> {
    let mut missing = Vec::new();

    if resource.resource_type.is_none() {
        missing.push("Resource Type".to_string());
    }
    if resource.resource_type_general.is_none() {
        missing.push("Resource Type General".to_string());
    }
    if resource.creators.is_empty() {
        missing.push("Creators".to_string());
    }
    if resource.date_start.is_none() {
        missing.push("Start Date (for publicationYear)".to_string());
    }
    if resource.title_en.is_none() {
        missing.push("Title (English)".to_string());
    }
    if resource.publisher.is_none() {
        missing.push("Publisher".to_string());
    }
    if resource.language.is_none() {
        missing.push("Language".to_string());
    }

    if !missing.is_empty() {
        return Err(MetadataError::MissingFields(missing));
    }

    let url = site.landing_url(&resource.id);

    let prefix = existing_doi
        .and_then(|doi| doi.split('/').next())
        .unwrap_or(default_prefix)
        .to_string();

    let mut titles = vec![Title {
        lang: "en".to_string(),
        title: resource.title_en.clone().expect("checked above"),
    }];
    if let Some(title_de) = &resource.title_de {
        titles.push(Title {
            lang: "de".to_string(),
            title: title_de.clone(),
        });
    }

    let mut descriptions = Vec::new();
    if let Some(abstract_en) = &resource.abstract_en {
        descriptions.push(Description {
            lang: "en".to_string(),
            description: abstract_en.clone(),
            description_type: ABSTRACT_TYPE.to_string(),
        });
    }
    if let Some(abstract_de) = &resource.abstract_de {
        descriptions.push(Description {
            lang: "de".to_string(),
            description: abstract_de.clone(),
            description_type: ABSTRACT_TYPE.to_string(),
        });
    }

    let date_start = resource.date_start.expect("checked above");
    let attributes = DoiAttributes {
        url: Some(url.clone()),
        prefix: Some(prefix),
        publisher: resource.publisher.clone(),
        language: resource.language.clone(),
        publication_year: Some(chrono::Datelike::year(&date_start)),
        creators: resource.creators.iter().map(build_creator).collect(),
        types: Some(ResourceType {
            resource_type: resource.resource_type.clone().expect("checked above"),
            resource_type_general: resource
                .resource_type_general
                .clone()
                .expect("checked above"),
        }),
        titles,
        descriptions,
        ..Default::default()
    };

    Ok(BuiltMetadata { attributes, url })
}

fn build_creator(creator: &ResourceCreator) -> Creator {
    let mut name_identifiers = Vec::new();
    if let Some(orcid) = &creator.orcid_id {
        name_identifiers.push(NameIdentifier {
            scheme_uri: ORCID_SCHEME_URI.to_string(),
            name_identifier: orcid.clone(),
            name_identifier_scheme: "ORCID".to_string(),
        });
    }
    if let Some(institution) = &creator.institution_id {
        name_identifiers.push(NameIdentifier {
            scheme_uri: institution.scheme_uri.clone(),
            name_identifier: institution.value.clone(),
            name_identifier_scheme: institution.scheme_name.clone(),
        });
    }

    Creator {
        name: creator.name.clone(),
        given_name: creator.given_name.clone(),
        family_name: creator.family_name.clone(),
        name_identifiers,
    }
}
