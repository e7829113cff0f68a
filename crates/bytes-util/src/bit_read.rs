use std::io;

/// Reads individual bits, most significant bit first, from a byte slice.
///
/// Reads that ask for more bits than are left fail up front with
/// [`io::ErrorKind::UnexpectedEof`] and leave the reader where it was.
#[derive(Debug, Clone)]
#[must_use]
pub struct BitReader<'a> {
    data: &'a [u8],
    byte_pos: usize,
    bit_pos: u8,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader positioned at the first bit of `data`
    pub const fn new_from_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            bit_pos: 0,
        }
    }

    /// Number of bits that can still be read
    #[must_use]
    pub const fn remaining_bits(&self) -> usize {
        if self.byte_pos >= self.data.len() {
            return 0;
        }
        (self.data.len() - self.byte_pos) * 8 - self.bit_pos as usize
    }

    /// Reads a single bit
    pub fn read_bit(&mut self) -> io::Result<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Reads `count` bits (at most 32) and returns them right aligned
    pub fn read_bits(&mut self, count: u8) -> io::Result<u32> {
        if count > 32 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot read {count} bits at once"),
            ));
        }

        if count as usize > self.remaining_bits() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "not enough bits left to read",
            ));
        }

        let mut value: u32 = 0;
        let mut left = count;
        while left > 0 {
            let current = self.data[self.byte_pos];
            let available = 8 - self.bit_pos;
            let take = left.min(available);
            let shift = available - take;
            let mask = ((1u16 << take) - 1) as u8;
            let bits = (current >> shift) & mask;

            // `take` is at most 8 so the shift never overflows the u32 when
            // count <= 32.
            value = (value << take) | bits as u32;

            self.bit_pos += take;
            left -= take;
            if self.bit_pos == 8 {
                self.bit_pos = 0;
                self.byte_pos += 1;
            }
        }

        Ok(value)
    }

    /// Aligns the reader to the next byte boundary
    #[inline(always)]
    pub fn align(&mut self) {
        if !self.is_aligned() {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
    }
}

impl<'a> BitReader<'a> {
    /// Returns the underlying slice
    #[inline(always)]
    #[must_use]
    pub const fn get_ref(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the current bit position inside the current byte (0-7)
    #[inline(always)]
    #[must_use]
    pub const fn bit_pos(&self) -> u8 {
        self.bit_pos
    }

    /// Returns the index of the byte the next bit is read from
    #[inline(always)]
    #[must_use]
    pub const fn byte_pos(&self) -> usize {
        self.byte_pos
    }

    /// Checks if the reader is aligned to the byte boundary
    #[inline(always)]
    #[must_use]
    pub const fn is_aligned(&self) -> bool {
        self.bit_pos == 0
    }
}
