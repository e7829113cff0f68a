//! AMF0 decoding and encoding for the values found in FLV script data.
//!
//! The decoder is lenient in the ways real-world muxers need: objects that run
//! out of data return the properties read so far, ECMA arrays may omit their
//! end marker, and markers outside the supported subset decode to a placeholder
//! instead of failing.
//!
//! # Examples
//!
//! ```rust
//! # fn test() -> Result<(), Box<dyn std::error::Error>> {
//! use amf0::{Amf0Decoder, Amf0Encoder, Amf0Value};
//! # let bytes = &[0x01, 0x01];
//! # let mut writer = Vec::new();
//!
//! let mut reader = Amf0Decoder::new(bytes);
//! let value = reader.decode()?;
//! assert_eq!(value, Amf0Value::Boolean(true));
//!
//! Amf0Encoder::encode(&mut writer, &value)?;
//!
//! # assert_eq!(writer, bytes);
//! # Ok(())
//! # }
//! # test().expect("test failed");
//! ```
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(unsafe_code)]

mod decode;
mod define;
mod encode;
mod errors;

pub use crate::decode::{Amf0Decoder, DEFAULT_MAX_DEPTH};
pub use crate::define::{Amf0Marker, Amf0Properties, Amf0Value, insert_property};
pub use crate::encode::Amf0Encoder;
pub use crate::errors::{Amf0ReadError, Amf0WriteError};
