use std::io;

use bytes::Bytes;

/// A cursor for reading bytes.
///
/// This cursor is a [`io::Cursor`] where the underlying type is a [`Bytes`] object
/// which enables zero copy decoding.
pub type BytesCursor = io::Cursor<Bytes>;

fn out_of_data() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "not enough bytes")
}

/// Bounds-checked helpers for any in-memory [`io::Cursor`].
///
/// Fixed width big-endian scalars are read through
/// [`byteorder::ReadBytesExt`](https://docs.rs/byteorder), which already fails
/// with [`io::ErrorKind::UnexpectedEof`] when the buffer is exhausted. This trait
/// adds the remaining-length queries and raw slice reads on top of that, using
/// the same error kind so callers can tell "out of data" apart from anything else.
pub trait CursorExt {
    /// Number of bytes between the current position and the end of the buffer.
    fn remaining(&self) -> usize;

    /// Fails with [`io::ErrorKind::UnexpectedEof`] unless at least `size` bytes remain.
    fn ensure_remaining(&self, size: usize) -> io::Result<()> {
        if size > self.remaining() {
            return Err(out_of_data());
        }
        Ok(())
    }

    /// Advances the cursor by `size` bytes without looking at them.
    fn skip(&mut self, size: usize) -> io::Result<()>;

    /// Reads `size` bytes as a borrowed slice and advances the cursor.
    fn read_slice(&mut self, size: usize) -> io::Result<&[u8]>;
}

impl<T: AsRef<[u8]>> CursorExt for io::Cursor<T> {
    fn remaining(&self) -> usize {
        self.get_ref()
            .as_ref()
            .len()
            .saturating_sub(self.position() as usize)
    }

    fn skip(&mut self, size: usize) -> io::Result<()> {
        self.ensure_remaining(size)?;
        self.set_position(self.position() + size as u64);
        Ok(())
    }

    fn read_slice(&mut self, size: usize) -> io::Result<&[u8]> {
        self.ensure_remaining(size)?;
        let position = self.position() as usize;
        self.set_position((position + size) as u64);
        Ok(&self.get_ref().as_ref()[position..position + size])
    }
}

/// A helper trait to implement zero copy reads on a [`BytesCursor`] type.
///
/// Allowing for zero copy reads from a [`BytesCursor`] type.
pub trait BytesCursorExt {
    /// Extracts the remaining bytes from the cursor.
    ///
    /// This does not do a copy of the bytes, and is O(1) time.
    fn extract_remaining(&mut self) -> Bytes;

    /// Extracts bytes from the cursor.
    ///
    /// This does not do a copy of the bytes, and is O(1) time.
    /// Returns an error if the size is greater than the remaining bytes.
    fn extract_bytes(&mut self, size: usize) -> io::Result<Bytes>;
}

impl BytesCursorExt for BytesCursor {
    fn extract_remaining(&mut self) -> Bytes {
        // Asking for exactly what is left can only fail if the position was set
        // past the end, in which case there is nothing to return anyway.
        let remaining = self.remaining();
        self.extract_bytes(remaining).unwrap_or_default()
    }

    fn extract_bytes(&mut self, size: usize) -> io::Result<Bytes> {
        if size == 0 {
            return Ok(Bytes::new());
        }

        self.ensure_remaining(size)?;

        let position = self.position() as usize;

        // Slicing a `Bytes` only bumps a reference count.
        let slice = self.get_ref().slice(position..position + size);
        self.set_position((position + size) as u64);

        Ok(slice)
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use byteorder::{BigEndian, ReadBytesExt};

    use super::*;

    #[test]
    fn test_bytes_cursor_extract_remaining() {
        let mut cursor = io::Cursor::new(Bytes::from_static(&[1, 2, 3, 4, 5]));
        let remaining = cursor.extract_remaining();
        assert_eq!(remaining, Bytes::from_static(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_bytes_cursor_extract_bytes() {
        let mut cursor = io::Cursor::new(Bytes::from_static(&[1, 2, 3, 4, 5]));
        let bytes = cursor.extract_bytes(3).unwrap();
        assert_eq!(bytes, Bytes::from_static(&[1, 2, 3]));
        assert_eq!(cursor.remaining(), 2);

        let bytes = cursor.extract_bytes(2).unwrap();
        assert_eq!(bytes, Bytes::from_static(&[4, 5]));
        assert_eq!(cursor.remaining(), 0);

        let err = cursor.extract_bytes(1).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        let bytes = cursor.extract_bytes(0).unwrap();
        assert_eq!(bytes, Bytes::from_static(&[]));
        assert!(cursor.extract_remaining().is_empty());
    }

    #[test]
    fn seek_out_of_bounds() {
        let mut cursor = io::Cursor::new(Bytes::from_static(&[1, 2, 3, 4, 5]));
        cursor.set_position(10);
        assert_eq!(cursor.remaining(), 0);
        assert!(cursor.extract_remaining().is_empty());
        assert_eq!(
            cursor.extract_bytes(1).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn test_read_slice_and_skip() {
        let data = [0xAA, 0xBB, 0xCC, 0xDD];
        let mut cursor = io::Cursor::new(&data[..]);

        cursor.skip(1).unwrap();
        assert_eq!(cursor.read_slice(2).unwrap(), &[0xBB, 0xCC]);
        assert_eq!(cursor.remaining(), 1);

        // A failed read leaves the position untouched.
        let err = cursor.read_slice(2).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(cursor.position(), 3);

        assert!(cursor.skip(2).is_err());
        assert_eq!(cursor.read_u8().unwrap(), 0xDD);
    }

    #[test]
    fn test_scalar_reads_stop_at_end() {
        let data = [0x00, 0x01, 0x02, 0x03, 0x04, 0x05];
        let mut cursor = io::Cursor::new(&data[..]);

        assert_eq!(cursor.read_u24::<BigEndian>().unwrap(), 0x000102);
        assert_eq!(cursor.read_u16::<BigEndian>().unwrap(), 0x0304);
        assert_eq!(
            cursor.read_u32::<BigEndian>().unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }
}
