use thiserror::Error;

#[derive(Error, Debug)]
pub enum HorizonsError {
    #[error("Invalid location filter: {0}")]
    InvalidLocationFilter(String),

    #[error("No category configured for tag '{0}'")]
    UnknownCategory(String),

    #[error("Unknown host: {0}")]
    UnknownHost(String),

    #[error("No data snapshot for host '{0}'")]
    SnapshotNotFound(String),

    #[error("Mismatch in currency: expected {expected}, collective '{slug}' reports {found}")]
    CurrencyMismatch {
        slug: String,
        expected: String,
        found: String,
    },

    #[error("No conversion rate from {from} to {to} for {year}")]
    UnsupportedCurrencyPair { from: String, to: String, year: i32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
