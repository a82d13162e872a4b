use std::time::Duration;

use crate::error::CampaignError;

/// SMTP AUTH credential pair.
#[derive(Debug, Clone)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

/// Connection and pacing settings shared by every send in a run.
#[derive(Debug, Clone)]
pub struct CampaignConfig {
    pub server: String,
    pub port: u16,
    pub credentials: Option<SmtpCredentials>,
    /// Blocking pause after each message, including the last one.
    pub delay: Duration,
}

impl CampaignConfig {
    /// Credentials must come as a full pair; half a pair is rejected
    /// here, before any connection is attempted.
    pub fn new(
        server: impl Into<String>,
        port: u16,
        username: Option<String>,
        password: Option<String>,
        delay_secs: u64,
    ) -> Result<Self, CampaignError> {
        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(SmtpCredentials { username, password }),
            (None, None) => None,
            _ => {
                return Err(CampaignError::Configuration(
                    "both a username and password are required for SMTP authentication".into(),
                ));
            }
        };

        Ok(Self {
            server: server.into(),
            port,
            credentials,
            delay: Duration::from_secs(delay_secs),
        })
    }
}
