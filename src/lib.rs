pub mod campaign;
pub mod config;
pub mod confirm;
pub mod delivery;
pub mod error;
pub mod message;
pub mod recipients;
pub mod source;
pub mod spoof;
pub mod template;

pub use campaign::Campaign;
pub use config::{CampaignConfig, SmtpCredentials};
pub use confirm::{Answer, ConfirmPrompt, LinePrompt};
pub use delivery::{Deliver, EmlDelivery, SmtpDelivery};
pub use error::CampaignError;
pub use message::{
    AttachmentSource, BodyFormat, CcSpoof, MessageSpec, Priority, SenderIdentity, build_message,
};
pub use recipients::{RecipientRecord, parse_recipients};
pub use template::substitute;
