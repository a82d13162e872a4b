use std::io::Read;
use std::time::Duration;

use lettre::Address;

use crate::config::CampaignConfig;
use crate::confirm::{Answer, ConfirmPrompt};
use crate::delivery::Deliver;
use crate::error::CampaignError;
use crate::message::{CcSpoof, MessageSpec, SenderIdentity, build_message};
use crate::recipients::{self, RecipientRecord};
use crate::template;

/// Everything shared across the sends of one run: the claimed sender,
/// the optional header tricks, the message skeleton, and the server
/// settings.
pub struct Campaign {
    pub sender: SenderIdentity,
    pub cc: Option<CcSpoof>,
    pub spec: MessageSpec,
    pub config: CampaignConfig,
}

impl Campaign {
    fn envelope_override(&self) -> Result<Option<Address>, CampaignError> {
        self.sender
            .envelope_override
            .as_deref()
            .map(|address| address.parse::<Address>())
            .transpose()
            .map_err(|e| CampaignError::Message(e.to_string()))
    }

    /// Build and submit one message. A fresh message is constructed per
    /// call; nothing is reused across recipients except the rewound
    /// sources.
    fn send_one(
        &mut self,
        recipient: &str,
        values: Option<&RecipientRecord>,
        deliverer: &mut dyn Deliver,
    ) -> Result<(), CampaignError> {
        let body = self.spec.read_body()?;
        let body = match values {
            Some(record) => template::substitute(&body, record.fields()),
            None => body,
        };
        let attachment = self.spec.read_attachment()?;
        let message = build_message(
            &self.spec,
            &self.sender,
            self.cc.as_ref(),
            recipient,
            &body,
            attachment.as_ref(),
        )?;
        let envelope_override = self.envelope_override()?;

        log::info!("Sending an email to {}", recipient);
        deliverer.deliver(&message, envelope_override.as_ref())
    }

    /// Single-recipient path: no substitution data and no confirmation
    /// gate.
    pub fn send_single(
        &mut self,
        recipient: &str,
        deliverer: &mut dyn Deliver,
    ) -> Result<(), CampaignError> {
        self.send_one(recipient, None, deliverer)
    }

    /// Batch path: parse and validate the recipient table, show every
    /// record for operator review, gate on confirmation, then send in
    /// file order with the configured pause after every send, the last
    /// one included. A failed send propagates and leaves the remaining
    /// recipients unprocessed.
    pub fn run_batch<R: Read>(
        &mut self,
        table: R,
        deliverer: &mut dyn Deliver,
        prompt: &mut dyn ConfirmPrompt,
        pause: &mut dyn FnMut(Duration),
    ) -> Result<usize, CampaignError> {
        let records = recipients::parse_recipients(table)?;

        log::info!("The following {} emails are about to be sent:", records.len());
        for record in &records {
            log::info!("--------------------");
            for (name, value) in record.fields() {
                log::info!("[{}] {}", name, value);
            }
        }

        if !prompt.ask(
            "Before multiple emails are sent, do these values look correct?",
            Answer::Yes,
        ) {
            return Err(CampaignError::Declined);
        }

        for record in &records {
            log::debug!("Processing an email to {}", record.email_address());
            self.send_one(record.email_address(), Some(record), deliverer)?;
            pause(self.config.delay);
        }

        Ok(records.len())
    }
}
