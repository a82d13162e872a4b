use lettre::message::header::{Header, HeaderName, HeaderValue};

/// Width of the space run appended to the display name when the sender
/// address should be pushed out of the rendered width.
const HIDDEN_PAD_WIDTH: usize = 200;

/// Display-name variant that hides the real address in most mail
/// clients: the name, a run of spaces, and a pipe terminator, so the
/// `<address>` part lands past the visible edge of the From column.
pub fn hidden_display_name(display_name: &str) -> String {
    format!("{} {}|", display_name, " ".repeat(HIDDEN_PAD_WIDTH))
}

/// `Cc` header carrying a display name with an intentionally empty
/// address field, e.g. `Cc: "IT Support" <>`. Clients render the name
/// as a copied recipient, but there is no deliverable address behind
/// it and the envelope never picks it up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoofedCc(String);

impl SpoofedCc {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self(display_name.into())
    }
}

impl Header for SpoofedCc {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Cc")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let name = s
            .strip_suffix(" <>")
            .and_then(|rest| rest.strip_prefix('"'))
            .and_then(|rest| rest.strip_suffix('"'));
        match name {
            Some(name) => Ok(Self(name.to_string())),
            None => Err(format!("not a blank-copy Cc header: {s}").into()),
        }
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), format!("\"{}\" <>", self.0))
    }
}
