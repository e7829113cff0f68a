use std::borrow::Cow;
use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};
use bytes_util::CursorExt;
use num_traits::FromPrimitive;

use super::define::{Amf0Properties, insert_property};
use super::{Amf0Marker, Amf0ReadError, Amf0Value};

/// Default limit on how deeply objects and arrays may nest.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Upper bound on the entries reserved up front for an array. Larger arrays
/// grow as they are decoded.
const MAX_PREALLOCATED_ENTRIES: usize = 1024;

/// Capacity to reserve for `len` declared entries when `remaining` bytes are
/// left and every entry takes at least `min_entry_size` bytes.
fn capacity_hint(len: usize, remaining: usize, min_entry_size: usize) -> usize {
    len.min(remaining / min_entry_size).min(MAX_PREALLOCATED_ENTRIES)
}

/// The three bytes closing an object or ECMA array: an empty key followed by
/// the object-end marker.
const OBJECT_END_SEQUENCE: [u8; 3] = [0x00, 0x00, Amf0Marker::ObjectEnd as u8];

/// An AMF0 Decoder.
///
/// This decoder takes a reference to a byte slice and reads the AMF0 data from
/// it. Strings borrow from the original slice unless they had to be repaired
/// (invalid UTF-8 is replaced rather than rejected).
pub struct Amf0Decoder<'a> {
    cursor: Cursor<&'a [u8]>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Amf0Decoder<'a> {
    /// Create a new AMF0 decoder.
    pub const fn new(buff: &'a [u8]) -> Self {
        Self::with_max_depth(buff, DEFAULT_MAX_DEPTH)
    }

    /// Create a decoder that refuses to nest containers deeper than `max_depth`.
    pub const fn with_max_depth(buff: &'a [u8], max_depth: usize) -> Self {
        Self {
            cursor: Cursor::new(buff),
            depth: 0,
            max_depth,
        }
    }

    /// Check if the decoder has reached the end of the AMF0 data.
    pub fn is_empty(&self) -> bool {
        self.cursor.remaining() == 0
    }

    /// Current read position in the input.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Amf0ReadError> {
        self.cursor.ensure_remaining(len)?;
        let buf: &'a [u8] = *self.cursor.get_ref();
        let pos = self.cursor.position() as usize;
        self.cursor.set_position((pos + len) as u64);
        Ok(&buf[pos..pos + len])
    }

    /// Read all the encoded values from the decoder.
    /// Returns both successfully decoded values and any error that occurred.
    pub fn decode_all(&mut self) -> (Vec<Amf0Value<'a>>, Option<Amf0ReadError>) {
        let mut results = vec![];

        while !self.is_empty() {
            match self.decode() {
                Ok(value) => results.push(value),
                Err(err) => return (results, Some(err)),
            }
        }

        (results, None)
    }

    /// Read the next type-prefixed value from the decoder.
    pub fn decode(&mut self) -> Result<Amf0Value<'a>, Amf0ReadError> {
        let marker = self.cursor.read_u8()?;
        self.decode_with_marker(marker)
    }

    /// Decode a value whose type marker has already been read.
    ///
    /// Markers other than number, boolean, string, object, ECMA array and strict
    /// array produce [`Amf0Value::Unsupported`] without consuming anything.
    pub fn decode_with_marker(&mut self, marker: u8) -> Result<Amf0Value<'a>, Amf0ReadError> {
        match Amf0Marker::from_u8(marker) {
            Some(Amf0Marker::Number) => Ok(Amf0Value::Number(self.read_number()?)),
            Some(Amf0Marker::Boolean) => Ok(Amf0Value::Boolean(self.read_bool()?)),
            Some(Amf0Marker::String) => Ok(Amf0Value::String(self.read_string()?)),
            Some(Amf0Marker::Object) => self.nested(Self::read_object).map(Amf0Value::Object),
            Some(Amf0Marker::EcmaArray) => {
                self.nested(Self::read_ecma_array).map(Amf0Value::EcmaArray)
            }
            Some(Amf0Marker::StrictArray) => {
                self.nested(Self::read_strict_array).map(Amf0Value::StrictArray)
            }
            _ => Ok(Amf0Value::Unsupported(marker)),
        }
    }

    fn nested<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, Amf0ReadError>,
    ) -> Result<T, Amf0ReadError> {
        if self.depth >= self.max_depth {
            return Err(Amf0ReadError::DepthLimitExceeded(self.max_depth));
        }

        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    fn read_number(&mut self) -> Result<f64, Amf0ReadError> {
        Ok(self.cursor.read_f64::<BigEndian>()?)
    }

    fn read_bool(&mut self) -> Result<bool, Amf0ReadError> {
        Ok(self.cursor.read_u8()? != 0)
    }

    fn read_string(&mut self) -> Result<Cow<'a, str>, Amf0ReadError> {
        let l = self.cursor.read_u16::<BigEndian>()?;
        let bytes = self.read_bytes(l as usize)?;

        Ok(String::from_utf8_lossy(bytes))
    }

    /// Reads one `key, marker, value` entry. `None` means the object is closed.
    fn read_object_property(
        &mut self,
    ) -> Result<Option<(Cow<'a, str>, Amf0Value<'a>)>, Amf0ReadError> {
        let key = self.read_string()?;
        let marker = self.cursor.read_u8()?;

        // The end marker closes the object whatever key preceded it, and an
        // empty key is never a real property either.
        if marker == Amf0Marker::ObjectEnd as u8 || key.is_empty() {
            return Ok(None);
        }

        let value = self.decode_with_marker(marker)?;
        Ok(Some((key, value)))
    }

    fn read_object(&mut self) -> Result<Amf0Properties<'a>, Amf0ReadError> {
        let mut properties = Vec::new();

        loop {
            match self.read_object_property() {
                Ok(Some((key, value))) => insert_property(&mut properties, key, value),
                Ok(None) => break,
                // A truncated object still yields whatever was read before the
                // data ran out.
                Err(err) if err.is_out_of_data() => break,
                Err(err) => return Err(err),
            }
        }

        Ok(properties)
    }

    /// Consumes the object-end sequence if it is next; otherwise leaves the
    /// cursor untouched.
    fn skip_object_end(&mut self) {
        let pos = self.cursor.position();
        match self.read_bytes(OBJECT_END_SEQUENCE.len()) {
            Ok(bytes) if bytes == OBJECT_END_SEQUENCE => {}
            _ => self.cursor.set_position(pos),
        }
    }

    fn read_ecma_array(&mut self) -> Result<Amf0Properties<'a>, Amf0ReadError> {
        let len = self.cursor.read_u32::<BigEndian>()? as usize;

        // Every entry takes at least a key length and a marker.
        let mut properties = Vec::with_capacity(capacity_hint(len, self.cursor.remaining(), 3));

        for _ in 0..len {
            let key = self.read_string()?;
            let val = self.decode()?;
            insert_property(&mut properties, key, val);
        }

        self.skip_object_end();

        Ok(properties)
    }

    fn read_strict_array(&mut self) -> Result<Vec<Amf0Value<'a>>, Amf0ReadError> {
        let len = self.cursor.read_u32::<BigEndian>()? as usize;

        let mut values = Vec::with_capacity(capacity_hint(len, self.cursor.remaining(), 1));

        for _ in 0..len {
            let val = self.decode()?;
            values.push(val);
        }

        Ok(values)
    }
}

impl<'a> Iterator for Amf0Decoder<'a> {
    type Item = Result<Amf0Value<'a>, Amf0ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_empty() {
            return None;
        }

        Some(self.decode())
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    fn key(name: &str) -> Vec<u8> {
        let mut out = (name.len() as u16).to_be_bytes().to_vec();
        out.extend_from_slice(name.as_bytes());
        out
    }

    #[test]
    fn test_reader_bool() {
        let amf0_bool = vec![0x01, 0x01]; // true
        let mut amf_reader = Amf0Decoder::new(&amf0_bool);
        let value = amf_reader.decode().unwrap();
        assert_eq!(value, Amf0Value::Boolean(true));

        let mut amf_reader = Amf0Decoder::new(&[0x01, 0x07]);
        assert_eq!(amf_reader.decode().unwrap(), Amf0Value::Boolean(true));
    }

    #[test]
    fn test_reader_number() {
        let mut amf0_number = vec![0x00];
        amf0_number.extend_from_slice(&772.161_f64.to_be_bytes());

        let mut amf_reader = Amf0Decoder::new(&amf0_number);
        let value = amf_reader.decode().unwrap();
        assert_eq!(value, Amf0Value::Number(772.161));
        assert!(amf_reader.is_empty());
    }

    #[test]
    fn test_reader_string() {
        let mut amf0_string = vec![0x02, 0x00, 0x0b]; // 11 bytes
        amf0_string.extend_from_slice(b"Hello World");

        let mut amf_reader = Amf0Decoder::new(&amf0_string);
        let value = amf_reader.decode().unwrap();
        assert_eq!(value, Amf0Value::String(Cow::Borrowed("Hello World")));
    }

    #[test]
    fn test_reader_string_invalid_utf8_is_replaced() {
        let amf0_string = [0x02, 0x00, 0x03, b'a', 0xFF, b'b'];

        let mut amf_reader = Amf0Decoder::new(&amf0_string);
        let value = amf_reader.decode().unwrap();
        assert_eq!(value, Amf0Value::String("a\u{FFFD}b".into()));
    }

    #[test]
    fn test_reader_string_truncated() {
        let amf0_string = [0x02, 0x00, 0x0b, b'H', b'i'];
        let mut amf_reader = Amf0Decoder::new(&amf0_string);
        let err = amf_reader.decode().unwrap_err();
        assert!(err.is_out_of_data());
    }

    #[test]
    fn test_reader_object() {
        let mut amf0_object = vec![0x03];
        amf0_object.extend_from_slice(&key("test"));
        amf0_object.extend_from_slice(&[0x01, 0x01]); // true
        amf0_object.extend_from_slice(&[0x00, 0x00, 0x09]); // object end (0x00 0x00 0x09)
        amf0_object.extend_from_slice(&[0x01, 0x00]); // trailing value

        let mut amf_reader = Amf0Decoder::new(&amf0_object);
        let value = amf_reader.decode().unwrap();

        assert_eq!(
            value,
            Amf0Value::Object(vec![("test".into(), Amf0Value::Boolean(true))])
        );
        // The end sequence is fully consumed.
        assert_eq!(amf_reader.decode().unwrap(), Amf0Value::Boolean(false));
    }

    #[test]
    fn test_reader_object_end_marker_after_key() {
        // A non-empty key followed by the end marker still closes the object.
        let mut amf0_object = vec![0x03];
        amf0_object.extend_from_slice(&key("a"));
        amf0_object.extend_from_slice(&[0x00]);
        amf0_object.extend_from_slice(&1.0_f64.to_be_bytes());
        amf0_object.extend_from_slice(&key("junk"));
        amf0_object.push(0x09);

        let mut amf_reader = Amf0Decoder::new(&amf0_object);
        let value = amf_reader.decode().unwrap();
        assert_eq!(
            value,
            Amf0Value::Object(vec![("a".into(), Amf0Value::Number(1.0))])
        );
        assert!(amf_reader.is_empty());
    }

    #[test]
    fn test_reader_object_empty_key_stops() {
        // Empty key with a marker other than object-end.
        let amf0_object = [0x03, 0x00, 0x00, 0x05, 0x01, 0x01];
        let mut amf_reader = Amf0Decoder::new(&amf0_object);
        assert_eq!(amf_reader.decode().unwrap(), Amf0Value::Object(vec![]));
        assert_eq!(amf_reader.decode().unwrap(), Amf0Value::Boolean(true));
    }

    #[test]
    fn test_reader_object_truncated_returns_partial() {
        let mut amf0_object = vec![0x03];
        amf0_object.extend_from_slice(&key("width"));
        amf0_object.push(0x00);
        amf0_object.extend_from_slice(&1280.0_f64.to_be_bytes());
        amf0_object.extend_from_slice(&key("height"));
        amf0_object.push(0x00);
        amf0_object.extend_from_slice(&[0x40, 0x86]); // only 2 of 8 bytes

        let mut amf_reader = Amf0Decoder::new(&amf0_object);
        let value = amf_reader.decode().unwrap();
        assert_eq!(
            value,
            Amf0Value::Object(vec![("width".into(), Amf0Value::Number(1280.0))])
        );
    }

    #[test]
    fn test_reader_object_unsupported_value_continues() {
        let mut amf0_object = vec![0x03];
        amf0_object.extend_from_slice(&key("nothing"));
        amf0_object.push(0x05); // null
        amf0_object.extend_from_slice(&key("flag"));
        amf0_object.extend_from_slice(&[0x01, 0x00]);
        amf0_object.extend_from_slice(&OBJECT_END_SEQUENCE);

        let mut amf_reader = Amf0Decoder::new(&amf0_object);
        assert_eq!(
            amf_reader.decode().unwrap(),
            Amf0Value::Object(vec![
                ("nothing".into(), Amf0Value::Unsupported(0x05)),
                ("flag".into(), Amf0Value::Boolean(false)),
            ])
        );
    }

    #[test]
    fn test_reader_ecma_array() {
        let mut amf0_object = vec![0x08, 0x00, 0x00, 0x00, 0x01]; // 1 property
        amf0_object.extend_from_slice(&key("test"));
        amf0_object.extend_from_slice(&[0x01, 0x01]);
        amf0_object.extend_from_slice(&OBJECT_END_SEQUENCE);

        let mut amf_reader = Amf0Decoder::new(&amf0_object);
        let value = amf_reader.decode().unwrap();

        assert_eq!(
            value,
            Amf0Value::EcmaArray(vec![("test".into(), Amf0Value::Boolean(true))])
        );
        assert!(amf_reader.is_empty());
    }

    #[test]
    fn test_reader_ecma_array_without_end_marker() {
        let mut amf0_object = vec![0x08, 0x00, 0x00, 0x00, 0x01];
        amf0_object.extend_from_slice(&key("test"));
        amf0_object.extend_from_slice(&[0x01, 0x01]);
        // Next value starts right away, no end sequence in between.
        amf0_object.extend_from_slice(&[0x02, 0x00, 0x01, b'x']);

        let mut amf_reader = Amf0Decoder::new(&amf0_object);
        let (values, error) = amf_reader.decode_all();
        assert!(error.is_none());
        assert_eq!(
            values,
            vec![
                Amf0Value::EcmaArray(vec![("test".into(), Amf0Value::Boolean(true))]),
                Amf0Value::String("x".into()),
            ]
        );
    }

    #[test]
    fn test_reader_ecma_array_truncated_is_error() {
        let mut amf0_object = vec![0x08, 0x00, 0x00, 0x00, 0x02];
        amf0_object.extend_from_slice(&key("test"));
        amf0_object.extend_from_slice(&[0x01, 0x01]);

        let mut amf_reader = Amf0Decoder::new(&amf0_object);
        assert!(amf_reader.decode().unwrap_err().is_out_of_data());
    }

    #[test]
    fn test_reader_strict_array() {
        let mut amf0_array = vec![0x0a, 0x00, 0x00, 0x00, 0x03]; // StrictArray marker with 3 elements
        amf0_array.extend_from_slice(&[0x00]); // Number marker
        amf0_array.extend_from_slice(&1.0_f64.to_be_bytes());
        amf0_array.extend_from_slice(&[0x01, 0x01]); // Boolean true
        amf0_array.extend_from_slice(&[0x02, 0x00, 0x04]); // String with 4 bytes
        amf0_array.extend_from_slice(b"test");

        let mut amf_reader = Amf0Decoder::new(&amf0_array);
        let value = amf_reader.decode().unwrap();

        let expected = Amf0Value::StrictArray(vec![
            Amf0Value::Number(1.0),
            Amf0Value::Boolean(true),
            Amf0Value::String(Cow::Borrowed("test")),
        ]);

        assert_eq!(value, expected);
    }

    #[test]
    fn test_reader_strict_array_huge_count() {
        // A count far larger than the input must fail, not allocate.
        let amf0_array = [0x0a, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x01];
        let mut amf_reader = Amf0Decoder::new(&amf0_array);
        assert!(amf_reader.decode().unwrap_err().is_out_of_data());
    }

    #[test]
    fn test_capacity_hint() {
        assert_eq!(capacity_hint(10, 100, 1), 10);
        assert_eq!(capacity_hint(100, 30, 3), 10);
        assert_eq!(capacity_hint(u32::MAX as usize, 16 * 1024 * 1024, 1), MAX_PREALLOCATED_ENTRIES);
        assert_eq!(capacity_hint(u32::MAX as usize, 16 * 1024 * 1024, 3), MAX_PREALLOCATED_ENTRIES);
    }

    #[test]
    fn test_reader_depth_limit() {
        let mut nested = Vec::new();
        for _ in 0..100 {
            nested.extend_from_slice(&[0x0a, 0x00, 0x00, 0x00, 0x01]);
        }
        nested.extend_from_slice(&[0x01, 0x01]);

        let mut amf_reader = Amf0Decoder::new(&nested);
        assert!(matches!(
            amf_reader.decode(),
            Err(Amf0ReadError::DepthLimitExceeded(DEFAULT_MAX_DEPTH))
        ));

        let mut amf_reader = Amf0Decoder::with_max_depth(&nested, 100);
        assert!(amf_reader.decode().is_ok());
        assert!(amf_reader.is_empty());
    }

    #[test]
    fn test_reader_depth_limit_inside_object() {
        // The depth error is not swallowed by the lenient object reader.
        let mut nested = vec![0x03];
        nested.extend_from_slice(&key("inner"));
        nested.extend_from_slice(&[0x0a, 0x00, 0x00, 0x00, 0x01, 0x01, 0x01]);

        let mut amf_reader = Amf0Decoder::with_max_depth(&nested, 1);
        assert!(matches!(
            amf_reader.decode(),
            Err(Amf0ReadError::DepthLimitExceeded(1))
        ));
    }

    #[test]
    fn test_reader_multi_value() {
        let mut amf0_multi = vec![0x00];
        amf0_multi.extend_from_slice(&772.161_f64.to_be_bytes());
        amf0_multi.extend_from_slice(&[0x01, 0x01]); // true
        amf0_multi.extend_from_slice(&[0x02, 0x00, 0x0b]); // 11 bytes
        amf0_multi.extend_from_slice(b"Hello World");
        amf0_multi.push(0x03);
        amf0_multi.extend_from_slice(&key("test"));
        amf0_multi.extend_from_slice(&[0x01, 0x00]);
        amf0_multi.extend_from_slice(&OBJECT_END_SEQUENCE);

        let mut amf_reader = Amf0Decoder::new(&amf0_multi);
        let (values, error) = amf_reader.decode_all();

        assert_eq!(values.len(), 4);
        assert!(error.is_none());

        assert_eq!(values[0], Amf0Value::Number(772.161));
        assert_eq!(values[1], Amf0Value::Boolean(true));
        assert_eq!(values[2], Amf0Value::String(Cow::Borrowed("Hello World")));
        assert_eq!(
            values[3],
            Amf0Value::Object(vec![("test".into(), Amf0Value::Boolean(false))])
        );
    }

    #[test]
    fn test_decode_all_with_error() {
        let mut amf0_data = vec![0x00]; // Number marker
        amf0_data.extend_from_slice(&772.161_f64.to_be_bytes());
        amf0_data.extend_from_slice(&[0x01, 0x01]); // Boolean true
        amf0_data.extend_from_slice(&[0x00, 0x40]); // Truncated number

        let mut amf_reader = Amf0Decoder::new(&amf0_data);
        let (values, error) = amf_reader.decode_all();

        assert_eq!(values.len(), 2);
        assert!(error.is_some_and(|e| e.is_out_of_data()));

        assert_eq!(values[0], Amf0Value::Number(772.161));
        assert_eq!(values[1], Amf0Value::Boolean(true));
    }

    #[test]
    fn test_reader_iterator() {
        let mut amf0_multi = vec![0x00];
        amf0_multi.extend_from_slice(&772.161_f64.to_be_bytes());
        amf0_multi.extend_from_slice(&[0x01, 0x01]); // true
        amf0_multi.extend_from_slice(&[0x02, 0x00, 0x0b]); // 11 bytes
        amf0_multi.extend_from_slice(b"Hello World");

        let amf_reader = Amf0Decoder::new(&amf0_multi);
        let values = amf_reader.collect::<Result<Vec<_>, _>>().unwrap();

        assert_eq!(values.len(), 3);

        assert_eq!(values[0], Amf0Value::Number(772.161));
        assert_eq!(values[1], Amf0Value::Boolean(true));
        assert_eq!(values[2], Amf0Value::String(Cow::Borrowed("Hello World")));
    }

    #[test]
    fn test_reader_unsupported_marker() {
        for marker in [0x05, 0x06, 0x0b, 0x0c, 0x42] {
            let data = [marker];
            let mut amf_reader = Amf0Decoder::new(&data);
            assert_eq!(amf_reader.decode().unwrap(), Amf0Value::Unsupported(marker));
            assert!(amf_reader.is_empty());
        }
    }
}
