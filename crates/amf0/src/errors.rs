use std::io;

/// Errors that can occur when decoding AMF0 data.
#[derive(Debug, thiserror::Error)]
pub enum Amf0ReadError {
    /// An IO error occurred, usually running out of data.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// Values were nested deeper than the decoder allows.
    #[error("nesting depth exceeds limit of {0}")]
    DepthLimitExceeded(usize),
}

impl Amf0ReadError {
    /// Whether the error means the input ended before the value did.
    pub fn is_out_of_data(&self) -> bool {
        matches!(self, Self::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof)
    }
}

/// Errors that can occur when encoding AMF0 data.
#[derive(Debug, thiserror::Error)]
pub enum Amf0WriteError {
    /// A normal string was too long.
    #[error("normal string too long")]
    NormalStringTooLong,
    /// An IO error occurred.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// The value has no encoding, carrying its marker byte.
    #[error("unsupported type: {0}")]
    UnsupportedType(u8),
}
