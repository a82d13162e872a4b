use std::io::{self, Read, Seek, SeekFrom};

use crate::error::CampaignError;

/// A byte source that can be read in full more than once.
///
/// The body template and the attachment are read once per recipient
/// across a batch run, so every read leaves the source rewound to its
/// start for the next one.
pub trait RewindRead: Read + Seek {}

impl<T: Read + Seek> RewindRead for T {}

/// Read the whole source, then rewind it to the start.
pub fn read_all(source: &mut dyn RewindRead, what: &'static str) -> Result<Vec<u8>, CampaignError> {
    let mut buf = Vec::new();
    source
        .read_to_end(&mut buf)
        .map_err(|e| CampaignError::Io { what, source: e })?;
    source
        .seek(SeekFrom::Start(0))
        .map_err(|e| CampaignError::Io { what, source: e })?;
    Ok(buf)
}

/// Read the whole source as UTF-8 text, then rewind it to the start.
pub fn read_string(
    source: &mut dyn RewindRead,
    what: &'static str,
) -> Result<String, CampaignError> {
    let bytes = read_all(source, what)?;
    String::from_utf8(bytes).map_err(|e| CampaignError::Io {
        what,
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })
}
