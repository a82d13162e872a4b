use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use spoof_mailer::{
    AttachmentSource, BodyFormat, Campaign, CampaignConfig, CampaignError, CcSpoof, Deliver,
    EmlDelivery, LinePrompt, MessageSpec, Priority, SenderIdentity, SmtpDelivery,
};

#[derive(Parser)]
#[command(
    version,
    about = "Composes and delivers spoofed email campaigns over SMTP (authorized use only)",
    group(ArgGroup::new("target").required(true))
)]
struct Cli {
    /// The sending email address
    #[arg(short = 'f', long = "from", value_name = "ADDRESS")]
    sender_address: String,

    /// The sending display name
    #[arg(short = 'd', long = "display-name", value_name = "NAME")]
    sender_display_name: String,

    /// Set an alternate envelope sending address for SPF spoofing [EXPERIMENTAL]
    #[arg(long = "envelope-from", value_name = "ADDRESS")]
    envelope_from: Option<String>,

    /// Hide the sender email address from view in the target's mailbox
    #[arg(long = "hide-email")]
    hide_email: bool,

    /// Add a carbon copy display name with no email address for CC spoofing
    #[arg(long = "blank-copy", value_name = "NAME")]
    cc_display_name: Option<String>,

    /// The receiving address
    #[arg(short = 'r', long = "recipient", group = "target")]
    recipient: Option<String>,

    /// A CSV file of recipients and substitution values
    #[arg(short = 'R', long = "recipient-file", group = "target", value_name = "FILE")]
    recipient_file: Option<PathBuf>,

    /// The subject of the email
    #[arg(short = 's', long)]
    subject: String,

    /// A file containing the email body
    #[arg(short = 'm', long = "body", value_name = "FILE")]
    body: PathBuf,

    /// An attachment to include with the email
    #[arg(short = 'a', long = "attachment", value_name = "FILE")]
    attachment: Option<PathBuf>,

    /// The encoding of the email body
    #[arg(long, value_enum, default_value = "html")]
    encoding: BodyFormat,

    /// The priority of the email, lower is greater importance
    #[arg(long, value_enum, default_value = "3")]
    priority: Priority,

    /// The IP address or FQDN of the SMTP server
    #[arg(short = 'i', long = "server", value_name = "HOST")]
    smtp_server: String,

    /// The port of the SMTP server
    #[arg(long, default_value_t = 25)]
    port: u16,

    /// The number of seconds to wait between sending each message
    #[arg(long, default_value_t = 10)]
    delay: u64,

    /// Username for SMTP authentication
    #[arg(long)]
    username: Option<String>,

    /// Password for SMTP authentication
    #[arg(long)]
    password: Option<String>,

    /// Write .eml files into this directory instead of sending
    #[arg(long = "eml-out", value_name = "DIR")]
    eml_out: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();

    ctrlc::set_handler(|| {
        log::info!("Program termination requested by user");
        std::process::exit(130);
    })
    .context("could not install the interrupt handler")?;

    let config = CampaignConfig::new(
        &cli.smtp_server,
        cli.port,
        cli.username.clone(),
        cli.password.clone(),
        cli.delay,
    )?;

    let body = File::open(&cli.body)
        .with_context(|| format!("could not open body file {}", cli.body.display()))?;

    let attachment = match &cli.attachment {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("could not open attachment {}", path.display()))?;
            Some(AttachmentSource {
                file_name: path.to_string_lossy().into_owned(),
                data: Box::new(file),
            })
        }
        None => None,
    };

    let mut campaign = Campaign {
        sender: SenderIdentity {
            address: cli.sender_address.clone(),
            display_name: cli.sender_display_name.clone(),
            hide_address: cli.hide_email,
            envelope_override: cli.envelope_from.clone(),
        },
        cc: cli.cc_display_name.clone().map(|display_name| CcSpoof { display_name }),
        spec: MessageSpec {
            subject: cli.subject.clone(),
            body: Box::new(body),
            format: cli.encoding,
            priority: cli.priority,
            attachment,
        },
        config,
    };

    let mut deliverer: Box<dyn Deliver> = match &cli.eml_out {
        Some(dir) => Box::new(EmlDelivery::new(dir)),
        None => Box::new(SmtpDelivery::new(&campaign.config)),
    };

    if let Some(recipient) = cli.recipient.as_deref() {
        log::info!("Processing a single email to {}", recipient);
        campaign.send_single(recipient, deliverer.as_mut())?;
        return Ok(());
    }

    let path = cli
        .recipient_file
        .as_ref()
        .context("either a recipient (-r) or a recipient file (-R) is required")?;
    log::info!(
        "Processing multiple emails to individuals in the file at {}",
        path.display()
    );
    let table = File::open(path)
        .with_context(|| format!("could not open recipient file {}", path.display()))?;

    let mut prompt = LinePrompt::new(io::stdin().lock());
    let mut pause = |delay: Duration| thread::sleep(delay);

    match campaign.run_batch(table, deliverer.as_mut(), &mut prompt, &mut pause) {
        Ok(_) => Ok(()),
        Err(CampaignError::Declined) => {
            log::warn!("User termination. Improper values detected.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
