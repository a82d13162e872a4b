use std::path::Path;

use clap::ValueEnum;
use lettre::Address;
use lettre::message::header::{
    ContentDisposition, ContentTransferEncoding, ContentType, Header, HeaderName, HeaderValue,
};
use lettre::message::{Mailbox, Message, MultiPart, SinglePart};

use crate::error::CampaignError;
use crate::source::{self, RewindRead};
use crate::spoof::{self, SpoofedCc};

/// Who the message claims to come from, and how honest that claim is.
pub struct SenderIdentity {
    pub address: String,
    pub display_name: String,
    /// Pad the From display name so clients truncate the address out of view.
    pub hide_address: bool,
    /// Alternate MAIL FROM address, leaving the From header untouched.
    pub envelope_override: Option<String>,
}

/// Carbon-copy display name with no backing address.
pub struct CcSpoof {
    pub display_name: String,
}

/// Encoding of the message body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BodyFormat {
    Plain,
    Html,
}

impl BodyFormat {
    fn content_type(self) -> ContentType {
        match self {
            BodyFormat::Plain => ContentType::TEXT_PLAIN,
            BodyFormat::Html => ContentType::TEXT_HTML,
        }
    }
}

/// X-Priority value; lower is greater importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Priority {
    #[value(name = "1")]
    Highest,
    #[value(name = "3")]
    Normal,
    #[value(name = "5")]
    Lowest,
}

impl Priority {
    fn header_value(self) -> &'static str {
        match self {
            Priority::Highest => "1",
            Priority::Normal => "3",
            Priority::Lowest => "5",
        }
    }
}

/// `X-Priority` message header.
#[derive(Debug, Clone)]
struct XPriority(Priority);

impl Header for XPriority {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-Priority")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let priority = match s.trim() {
            "1" => Priority::Highest,
            "3" => Priority::Normal,
            "5" => Priority::Lowest,
            other => return Err(format!("invalid X-Priority value '{other}'").into()),
        };
        Ok(Self(priority))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.header_value().to_string())
    }
}

/// Attachment source plus the name it was supplied under. Directory
/// components are stripped when the message is assembled.
pub struct AttachmentSource {
    pub file_name: String,
    pub data: Box<dyn RewindRead>,
}

/// Everything about the message that does not depend on the recipient.
pub struct MessageSpec {
    pub subject: String,
    pub body: Box<dyn RewindRead>,
    pub format: BodyFormat,
    pub priority: Priority,
    pub attachment: Option<AttachmentSource>,
}

impl MessageSpec {
    /// Read the body template, leaving the source rewound for the next
    /// recipient.
    pub fn read_body(&mut self) -> Result<String, CampaignError> {
        source::read_string(self.body.as_mut(), "message body")
    }

    /// Read the attachment bytes, if any, leaving the source rewound.
    pub fn read_attachment(&mut self) -> Result<Option<(String, Vec<u8>)>, CampaignError> {
        match &mut self.attachment {
            Some(attachment) => {
                let data = source::read_all(attachment.data.as_mut(), "attachment")?;
                Ok(Some((attachment.file_name.clone(), data)))
            }
            None => Ok(None),
        }
    }
}

/// Only the base name of the attachment goes on the wire.
fn base_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

/// Assemble the MIME document for one recipient.
///
/// Pure transform: the body has already been resolved through the
/// template engine and the attachment to bytes, so no I/O happens here.
/// The container is a `multipart/alternative` with exactly one text
/// part, plus an optional base64 attachment part.
pub fn build_message(
    spec: &MessageSpec,
    sender: &SenderIdentity,
    cc: Option<&CcSpoof>,
    recipient: &str,
    body: &str,
    attachment: Option<&(String, Vec<u8>)>,
) -> Result<Message, CampaignError> {
    let from_name = if sender.hide_address {
        spoof::hidden_display_name(&sender.display_name)
    } else {
        sender.display_name.clone()
    };
    let from = Mailbox::new(Some(from_name), sender.address.parse::<Address>()?);
    let to = Mailbox::new(None, recipient.parse::<Address>()?);

    let mut builder = Message::builder()
        .from(from)
        .to(to)
        .subject(spec.subject.as_str())
        .header(XPriority(spec.priority));

    if let Some(cc) = cc {
        builder = builder.header(SpoofedCc::new(cc.display_name.as_str()));
    }

    let text_part = SinglePart::builder()
        .header(spec.format.content_type())
        .body(body.to_string());

    let container = match attachment {
        Some((file_name, data)) => {
            let attachment_part = SinglePart::builder()
                .header(
                    ContentType::parse("application/octet-stream")
                        .map_err(|e| CampaignError::Message(e.to_string()))?,
                )
                .header(ContentDisposition::attachment(&base_name(file_name)))
                .header(ContentTransferEncoding::Base64)
                .body(data.clone());
            MultiPart::alternative()
                .singlepart(text_part)
                .singlepart(attachment_part)
        }
        None => MultiPart::alternative().singlepart(text_part),
    };

    Ok(builder.multipart(container)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sender(hide: bool) -> SenderIdentity {
        SenderIdentity {
            address: "sender@example.com".to_string(),
            display_name: "Mr Sender".to_string(),
            hide_address: hide,
            envelope_override: None,
        }
    }

    fn spec(attachment: Option<AttachmentSource>) -> MessageSpec {
        MessageSpec {
            subject: "Quarterly update".to_string(),
            body: Box::new(Cursor::new(b"unused by build_message".to_vec())),
            format: BodyFormat::Plain,
            priority: Priority::Normal,
            attachment,
        }
    }

    /// Header lines may be folded on the wire; unfolding restores the
    /// logical value a client sees.
    fn unfolded(message: &Message) -> String {
        String::from_utf8(message.formatted())
            .unwrap()
            .replace("\r\n ", " ")
            .replace("\r\n\t", "\t")
    }

    #[test]
    fn test_plain_from_header_carries_name_and_address() {
        let message = build_message(&spec(None), &sender(false), None, "victim@example.org", "hello", None)
            .unwrap();
        let raw = unfolded(&message);
        assert!(raw.contains("Mr Sender"));
        assert!(raw.contains("<sender@example.com>"));
        assert!(raw.contains("To: victim@example.org"));
        assert!(raw.contains("Subject: Quarterly update"));
        assert!(raw.contains("X-Priority: 3"));
        assert!(raw.contains("hello"));
    }

    #[test]
    fn test_hidden_sender_pads_the_display_name() {
        let message = build_message(&spec(None), &sender(true), None, "victim@example.org", "hello", None)
            .unwrap();
        let raw = unfolded(&message);
        let pad = format!("{}|", " ".repeat(200));
        assert!(raw.contains(&pad));
        assert!(raw.contains("Mr Sender"));
        assert!(raw.contains("<sender@example.com>"));
    }

    #[test]
    fn test_cc_spoof_emits_an_empty_address() {
        let cc = CcSpoof { display_name: "IT Support".to_string() };
        let message =
            build_message(&spec(None), &sender(false), Some(&cc), "victim@example.org", "hi", None)
                .unwrap();
        let raw = unfolded(&message);
        assert!(raw.contains("Cc: \"IT Support\" <>"));
        // the spoofed copy never becomes a protocol-level recipient
        assert_eq!(message.envelope().to().len(), 1);
    }

    #[test]
    fn test_priority_value_is_forwarded() {
        let mut spec = spec(None);
        spec.priority = Priority::Highest;
        let message = build_message(&spec, &sender(false), None, "victim@example.org", "hi", None)
            .unwrap();
        assert!(unfolded(&message).contains("X-Priority: 1"));
    }

    #[test]
    fn test_attachment_is_base64_with_base_name_only() {
        let attachment = ("reports/q3/report.pdf".to_string(), b"hello attachment".to_vec());
        let message = build_message(
            &spec(None),
            &sender(false),
            None,
            "victim@example.org",
            "see attached",
            Some(&attachment),
        )
        .unwrap();
        let raw = unfolded(&message);
        assert!(raw.contains("Content-Disposition: attachment; filename=\"report.pdf\""));
        assert!(!raw.contains("q3"));
        assert!(raw.contains("Content-Transfer-Encoding: base64"));
        assert!(raw.contains("aGVsbG8gYXR0YWNobWVudA=="));
        assert!(raw.contains("application/octet-stream"));
    }

    #[test]
    fn test_html_body_gets_an_html_content_type() {
        let mut spec = spec(None);
        spec.format = BodyFormat::Html;
        let message = build_message(&spec, &sender(false), None, "victim@example.org", "<b>hi</b>", None)
            .unwrap();
        assert!(unfolded(&message).contains("Content-Type: text/html"));
    }

    #[test]
    fn test_invalid_recipient_is_a_message_error() {
        let err = build_message(&spec(None), &sender(false), None, "not-an-address", "hi", None)
            .unwrap_err();
        assert!(matches!(err, CampaignError::Message(_)));
    }
}
