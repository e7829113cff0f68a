use thiserror::Error;

/// Errors that stop an FLV file from being parsed at all.
///
/// Problems inside individual tags are never reported here; they are recorded
/// on the tag itself and parsing carries on.
#[derive(Error, Debug)]
pub enum FlvError {
    #[error("Invalid FLV signature: expected 'FLV', found {0:?}")]
    InvalidSignature([u8; 3]),
    #[error("FLV header too short: got {0} of 9 bytes")]
    HeaderTooShort(usize),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
