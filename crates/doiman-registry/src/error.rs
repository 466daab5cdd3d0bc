//! Error types for the registration client.

/// Errors raised by the registry client.
///
/// HTTP status codes returned by the registration authority are mapped to
/// one variant each via [`RegistryError::from_status`]. Everything the
/// mapping does not recognise (5xx, but also 3xx and 429) lands in
/// [`RegistryError::Server`] with the raw status preserved.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Network, TLS or timeout failure. Never carries a status code.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// 204: the DOI is known to the authority but not resolvable.
    #[error("no content: {body}")]
    NoContent { body: String },

    /// 400: malformed payload, wrong domain or wrong prefix.
    #[error("bad request: {body}")]
    BadRequest { body: String },

    /// 401: bad repository id or password.
    #[error("unauthorized: {body}")]
    Unauthorized { body: String },

    /// 403: quota exceeded or the DOI belongs to another party.
    #[error("forbidden: {body}")]
    Forbidden { body: String },

    /// 404: the DOI does not exist at the authority.
    #[error("not found: {body}")]
    NotFound { body: String },

    /// 410: the DOI was deleted.
    #[error("gone: {body}")]
    Gone { body: String },

    /// 412: metadata must be uploaded first.
    #[error("precondition failed: {body}")]
    PreconditionFailed { body: String },

    /// 5xx and every unmapped status code.
    #[error("server error (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    /// The DOI string does not match `10.<registrant>/<suffix>`.
    #[error("invalid DOI {value:?}: {reason}")]
    InvalidDoi { value: String, reason: String },

    /// The DOI carries a prefix other than the configured one.
    #[error("wrong DOI prefix {found}, expected {expected}")]
    WrongPrefix { found: String, expected: String },

    /// Response body did not have the expected JSON:API shape.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },
}

impl RegistryError {
    /// Map an authority HTTP status code plus response body to an error.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            204 => Self::NoContent { body },
            400 => Self::BadRequest { body },
            401 => Self::Unauthorized { body },
            403 => Self::Forbidden { body },
            404 => Self::NotFound { body },
            410 => Self::Gone { body },
            412 => Self::PreconditionFailed { body },
            _ => Self::Server { status, body },
        }
    }

    /// Whether the failure is transient (server-side or network).
    ///
    /// The core never retries automatically; this only classifies.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Server { .. } | Self::Transport { .. })
    }

    /// Whether the failure was caused by the request itself (4xx family).
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::NoContent { .. }
                | Self::BadRequest { .. }
                | Self::Unauthorized { .. }
                | Self::Forbidden { .. }
                | Self::NotFound { .. }
                | Self::Gone { .. }
                | Self::PreconditionFailed { .. }
        )
    }

    /// Exit code for CLI error reporting.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidDoi { .. } | Self::WrongPrefix { .. } => 1,
            Self::Unauthorized { .. } | Self::Forbidden { .. } => 2,
            Self::NotFound { .. } | Self::Gone { .. } | Self::NoContent { .. } => 3,
            Self::BadRequest { .. } | Self::PreconditionFailed { .. } => 4,
            Self::Transport { .. } | Self::Server { .. } => 5,
            Self::InvalidResponse { .. } => 6,
        }
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_enumerated_codes() {
        assert!(matches!(
            RegistryError::from_status(204, ""),
            RegistryError::NoContent { .. }
        ));
        assert!(matches!(
            RegistryError::from_status(400, ""),
            RegistryError::BadRequest { .. }
        ));
        assert!(matches!(
            RegistryError::from_status(401, ""),
            RegistryError::Unauthorized { .. }
        ));
        assert!(matches!(
            RegistryError::from_status(403, ""),
            RegistryError::Forbidden { .. }
        ));
        assert!(matches!(
            RegistryError::from_status(404, ""),
            RegistryError::NotFound { .. }
        ));
        assert!(matches!(
            RegistryError::from_status(410, ""),
            RegistryError::Gone { .. }
        ));
        assert!(matches!(
            RegistryError::from_status(412, ""),
            RegistryError::PreconditionFailed { .. }
        ));
    }

    #[test]
    fn unmapped_codes_collapse_into_server() {
        for status in [300u16, 429, 500, 502, 503] {
            match RegistryError::from_status(status, "boom") {
                RegistryError::Server { status: s, body } => {
                    assert_eq!(s, status);
                    assert_eq!(body, "boom");
                }
                other => panic!("expected Server for {status}, got {other:?}"),
            }
        }
    }

    #[test]
    fn exit_codes_group_error_classes() {
        assert_eq!(
            RegistryError::InvalidDoi {
                value: "x".to_string(),
                reason: "bad".to_string(),
            }
            .exit_code(),
            1
        );
        assert_eq!(RegistryError::from_status(401, "").exit_code(), 2);
        assert_eq!(RegistryError::from_status(403, "").exit_code(), 2);
        assert_eq!(RegistryError::from_status(404, "").exit_code(), 3);
        assert_eq!(RegistryError::from_status(410, "").exit_code(), 3);
        assert_eq!(RegistryError::from_status(400, "").exit_code(), 4);
        assert_eq!(RegistryError::from_status(412, "").exit_code(), 4);
        assert_eq!(RegistryError::from_status(500, "").exit_code(), 5);
        assert_eq!(
            RegistryError::Transport {
                message: "refused".to_string(),
            }
            .exit_code(),
            5
        );
    }

    #[test]
    fn transience_classification() {
        assert!(RegistryError::from_status(503, "").is_transient());
        assert!(!RegistryError::from_status(404, "").is_transient());
        assert!(RegistryError::from_status(404, "").is_request_error());
        assert!(!RegistryError::from_status(500, "").is_request_error());
    }
}
