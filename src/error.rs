//! Fatal errors.
//!
//! Anything in here means there is no subnet to report on. Degraded
//! collectors and drift are not errors; they travel inside the report as
//! [`crate::models::Diagnostic`] values.

/// Errors that abort a usage report.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("{0} does not look like a subnet ID or CIDR block")]
    InvalidIdentifier(String),

    #[error("no subnet found matching {0}")]
    NotFound(String),

    #[error("{count} subnets found matching {query}")]
    Ambiguous { query: String, count: usize },

    #[error("invalid CIDR block: {0}")]
    InvalidCidr(String),

    #[error("subnet lookup for {query} failed: {message}")]
    SubnetLookup { query: String, message: String },
}

/// Boxed error used by collectors and other IO plumbing.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            UsageError::InvalidIdentifier("vpc-123".to_string()).to_string(),
            "vpc-123 does not look like a subnet ID or CIDR block"
        );
        assert_eq!(
            UsageError::Ambiguous {
                query: "10.0.0.0/24".to_string(),
                count: 2
            }
            .to_string(),
            "2 subnets found matching 10.0.0.0/24"
        );
    }
}
