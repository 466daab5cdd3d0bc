//! DOI string normalization and prefix validation.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{RegistryError, RegistryResult};

/// Accepts `10.123/suffix`, optionally wrapped in a `doi:` label or a
/// resolver URL (`https://doi.org/...`, `dx.doi.org`). Case-insensitive.
fn doi_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:doi:\s*|(?:https?://)?(?:dx\.)?doi\.org/)?(10\.\d+(?:\.\d+)*/.+)$")
            .expect("DOI regex is valid")
    })
}

/// Normalize a DOI to its bare `10.<registrant>/<suffix>` form.
///
/// Strips an optional `doi:` label or resolver-URL wrapper. Fails when the
/// remainder is not a structurally valid DOI. Idempotent: normalizing an
/// already-normalized DOI returns it unchanged.
pub fn normalize_doi(doi: &str) -> RegistryResult<String> {
    if doi.is_empty() {
        return Err(RegistryError::InvalidDoi {
            value: doi.to_string(),
            reason: "DOI must be given".to_string(),
        });
    }
    let caps = doi_regex()
        .captures(doi)
        .ok_or_else(|| RegistryError::InvalidDoi {
            value: doi.to_string(),
            reason: "expected 10.<registrant>/<suffix>".to_string(),
        })?;
    Ok(caps[1].to_string())
}

/// Validate a DOI against the configured prefix and normalize it.
///
/// A bare suffix (no slash) gets the configured prefix prepended. An
/// embedded prefix must match the configured one exactly; a mismatch is an
/// error, never a silent substitution.
pub fn check_doi(doi: &str, prefix: &str) -> RegistryResult<String> {
    let full = if let Some((found_prefix, _suffix)) = doi.split_once('/') {
        if found_prefix != prefix && !found_prefix.is_empty() {
            // Resolver-URL forms embed the prefix after the host; let the
            // regex strip the wrapper before comparing.
            let normalized = normalize_doi(doi)?;
            let embedded = normalized.split('/').next().unwrap_or_default();
            if embedded != prefix {
                return Err(RegistryError::WrongPrefix {
                    found: embedded.to_string(),
                    expected: prefix.to_string(),
                });
            }
            return Ok(normalized);
        }
        doi.to_string()
    } else {
        format!("{prefix}/{doi}")
    };
    normalize_doi(&full)
}
