// Bounds-checked reading over an in-memory buffer

use crate::error::OutOfBounds;

pub type ReadResult<T> = Result<T, OutOfBounds>;

/// Read head over a fixed byte slice.
///
/// Every read either returns the requested bytes or an [`OutOfBounds`]
/// without moving the head, so a caller can stop at a truncation point and
/// still trust the position it had.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Bytes not yet consumed.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn check(&self, wanted: usize) -> ReadResult<()> {
        if wanted > self.remaining() {
            return Err(OutOfBounds {
                offset: self.pos,
                wanted,
                len: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn peek_bytes(&self, n: usize) -> ReadResult<&'a [u8]> {
        self.check(n)?;
        Ok(&self.data[self.pos..self.pos + n])
    }

    pub fn read_bytes(&mut self, n: usize) -> ReadResult<&'a [u8]> {
        let bytes = self.peek_bytes(n)?;
        self.pos += n;
        Ok(bytes)
    }

    pub fn skip(&mut self, n: usize) -> ReadResult<()> {
        self.check(n)?;
        self.pos += n;
        Ok(())
    }

    pub fn read_array<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut buffer = [0u8; N];
        buffer.copy_from_slice(self.read_bytes(N)?);
        Ok(buffer)
    }

    pub fn read_u8(&mut self) -> ReadResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> ReadResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16_be(&mut self) -> ReadResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Big-endian 24-bit integer (FLAC block lengths)
    pub fn read_u24_be(&mut self) -> ReadResult<u32> {
        let [b0, b1, b2] = self.read_array()?;
        Ok((b0 as u32) << 16 | (b1 as u32) << 8 | b2 as u32)
    }

    pub fn read_u32_be(&mut self) -> ReadResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> ReadResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read synchsafe 32-bit integer (7 bits per byte)
    pub fn read_synchsafe_u32(&mut self) -> ReadResult<u32> {
        Ok(decode_synchsafe(self.read_array()?))
    }
}

/// Decode a 28-bit synchsafe integer. The high bit of every byte is ignored.
pub fn decode_synchsafe(bytes: [u8; 4]) -> u32 {
    ((bytes[0] & 0x7F) as u32) << 21
        | ((bytes[1] & 0x7F) as u32) << 14
        | ((bytes[2] & 0x7F) as u32) << 7
        | (bytes[3] & 0x7F) as u32
}
