use thiserror::Error;

/// Compute Engine API errors.
///
/// SECURITY: Error messages must NEVER contain the bearer token.
#[derive(Debug, Error)]
pub enum ComputeError {
    /// Credentials missing, invalid, or lacking permission
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network-level error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A single-resource get returned 404
    #[error("{kind} not found: '{name}'")]
    NotFound { kind: String, name: String },

    #[error("failed to decode {kind}: {message}")]
    Decode { kind: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = ComputeError::Auth {
            message: "Request had invalid authentication credentials.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "authentication failed: Request had invalid authentication credentials."
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = ComputeError::Api {
            status: 400,
            message: "Invalid value for field 'filter'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (400): Invalid value for field 'filter'"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = ComputeError::NotFound {
            kind: "subnetwork".to_string(),
            name: "mrpn-psc-us-we1".to_string(),
        };
        assert_eq!(err.to_string(), "subnetwork not found: 'mrpn-psc-us-we1'");
    }

    #[test]
    fn test_decode_display() {
        let err = ComputeError::Decode {
            kind: "routes".to_string(),
            message: "invalid type".to_string(),
        };
        assert_eq!(err.to_string(), "failed to decode routes: invalid type");
    }
}
