use thiserror::Error;

/// A request-level key that does not map to any known regulatory entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unknown contribution group '{0}'")]
    UnknownContributionGroup(String),

    #[error("unknown contract type '{0}' (expected 'indefinite' or 'temporary')")]
    UnknownContractType(String),

    #[error("region '{0}' has no regional scale yet (only Catalunya is implemented)")]
    UnsupportedRegion(String),
}
