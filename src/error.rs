use thiserror::Error;

/// Everything that can end a campaign run early.
#[derive(Debug, Error)]
pub enum CampaignError {
    /// Inconsistent campaign settings, caught before any connection is opened.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Structural problems in the recipient table.
    #[error("recipient validation failed: {0}")]
    Validation(String),

    /// The operator rejected the pre-send confirmation. A deliberate
    /// abort, not a failure; nothing has been sent.
    #[error("aborted at operator confirmation, nothing sent")]
    Declined,

    /// The message could not be assembled from its parts.
    #[error("could not assemble message: {0}")]
    Message(String),

    /// The SMTP server rejected our credentials.
    #[error("smtp authentication failed: {0}")]
    Authentication(String),

    /// The SMTP server rejected the message, or negotiation failed.
    #[error("smtp delivery failed: {0}")]
    Delivery(String),

    /// A body or attachment source could not be read.
    #[error("could not read {what}")]
    Io {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The recipient table could not be read at the CSV level.
    #[error("could not read recipient table")]
    Table(#[from] csv::Error),
}

impl From<lettre::error::Error> for CampaignError {
    fn from(e: lettre::error::Error) -> Self {
        CampaignError::Message(e.to_string())
    }
}

impl From<lettre::address::AddressError> for CampaignError {
    fn from(e: lettre::address::AddressError) -> Self {
        CampaignError::Message(e.to_string())
    }
}
