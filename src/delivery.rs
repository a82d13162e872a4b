use std::fs;
use std::path::PathBuf;

use lettre::address::Envelope;
use lettre::message::Message;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, SmtpTransport, Transport};

use crate::config::{CampaignConfig, SmtpCredentials};
use crate::error::CampaignError;

/// Delivery seam: one constructed message in, pass or fail out.
pub trait Deliver {
    fn deliver(
        &mut self,
        message: &Message,
        envelope_from: Option<&Address>,
    ) -> Result<(), CampaignError>;
}

/// MAIL FROM for a submission: the override when one is configured,
/// otherwise whatever the message's own headers produce. The override
/// diverges the protocol-level sender from the From header without
/// touching the message itself.
pub fn submission_envelope(
    message: &Message,
    envelope_from: Option<&Address>,
) -> Result<Envelope, CampaignError> {
    match envelope_from {
        Some(address) => Envelope::new(Some(address.clone()), message.envelope().to().to_vec())
            .map_err(|e| CampaignError::Message(e.to_string())),
        None => Ok(message.envelope().clone()),
    }
}

/// Delivers over SMTP, one scoped connection per message. The
/// connection is released when the call returns, on success or failure.
pub struct SmtpDelivery {
    server: String,
    port: u16,
    credentials: Option<SmtpCredentials>,
}

impl SmtpDelivery {
    pub fn new(config: &CampaignConfig) -> Self {
        Self {
            server: config.server.clone(),
            port: config.port,
            credentials: config.credentials.clone(),
        }
    }

    /// Transport for a single submission. With credentials the session
    /// is EHLO, STARTTLS, EHLO again, then AUTH; without, plain
    /// unencrypted submission.
    fn transport(&self) -> Result<SmtpTransport, CampaignError> {
        match &self.credentials {
            Some(credentials) => {
                log::info!(
                    "Logging into {} on port {} using user: {}",
                    self.server,
                    self.port,
                    credentials.username
                );
                let builder = SmtpTransport::starttls_relay(&self.server)
                    .map_err(|e| CampaignError::Delivery(e.to_string()))?;
                Ok(builder
                    .port(self.port)
                    .credentials(Credentials::new(
                        credentials.username.clone(),
                        credentials.password.clone(),
                    ))
                    .build())
            }
            None => Ok(SmtpTransport::builder_dangerous(&self.server)
                .port(self.port)
                .build()),
        }
    }
}

impl Deliver for SmtpDelivery {
    fn deliver(
        &mut self,
        message: &Message,
        envelope_from: Option<&Address>,
    ) -> Result<(), CampaignError> {
        let mailer = self.transport()?;

        if self.credentials.is_some() {
            match mailer.test_connection() {
                Ok(true) => {}
                Ok(false) => {
                    return Err(CampaignError::Delivery(
                        "SMTP server closed the connection during negotiation".into(),
                    ));
                }
                Err(e) if e.is_permanent() => {
                    return Err(CampaignError::Authentication(e.to_string()));
                }
                Err(e) => return Err(CampaignError::Delivery(e.to_string())),
            }
        }

        let envelope = submission_envelope(message, envelope_from)?;
        mailer
            .send_raw(&envelope, &message.formatted())
            .map(|_| ())
            .map_err(|e| CampaignError::Delivery(e.to_string()))
    }
}

/// Writes each constructed message to a numbered .eml file instead of
/// transmitting it, for offline inspection of the composed headers.
pub struct EmlDelivery {
    dir: PathBuf,
    written: usize,
}

impl EmlDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), written: 0 }
    }
}

impl Deliver for EmlDelivery {
    fn deliver(
        &mut self,
        message: &Message,
        envelope_from: Option<&Address>,
    ) -> Result<(), CampaignError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| CampaignError::Io { what: "eml output directory", source: e })?;

        self.written += 1;
        let path = self.dir.join(format!("message-{:03}.eml", self.written));
        if let Some(address) = envelope_from {
            // the envelope exists only on the wire, not in the file
            log::debug!("Envelope sender {} is not recorded in the .eml output", address);
        }
        fs::write(&path, message.formatted())
            .map_err(|e| CampaignError::Io { what: "eml output file", source: e })?;
        log::info!("EML written to {}", path.display());
        Ok(())
    }
}
