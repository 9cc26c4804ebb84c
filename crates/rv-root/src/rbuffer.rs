//! Cursor over ROOT's big-endian object encoding.

use crate::error::{Result, RootError};

/// ROOT sets this bit on the leading u32 of an object to flag a byte count.
pub(crate) const BYTE_COUNT_MASK: u32 = 0x4000_0000;

/// TObject `kIsReferenced`: a 2-byte process id follows the bits.
const IS_REFERENCED: u32 = 0x0000_0010;

/// A read cursor over a byte slice.
pub struct RBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

macro_rules! read_be {
    ($name:ident, $ty:ty, $n:expr) => {
        #[doc = concat!("Read a big-endian `", stringify!($ty), "`.")]
        pub fn $name(&mut self) -> Result<$ty> {
            let b = self.read_bytes($n)?;
            let mut raw = [0u8; $n];
            raw.copy_from_slice(b);
            Ok(<$ty>::from_be_bytes(raw))
        }
    };
}

impl<'a> RBuffer<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read position.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Move the cursor to an absolute position.
    pub fn set_pos(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(RootError::BufferUnderflow {
                offset: self.pos,
                need: pos - self.pos.min(pos),
                have: self.remaining(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Skip `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Borrow the next `n` bytes and advance.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    read_be!(read_u8, u8, 1);
    read_be!(read_i8, i8, 1);
    read_be!(read_u16, u16, 2);
    read_be!(read_i16, i16, 2);
    read_be!(read_u32, u32, 4);
    read_be!(read_i32, i32, 4);
    read_be!(read_u64, u64, 8);
    read_be!(read_f32, f32, 4);
    read_be!(read_f64, f64, 8);

    /// Read a ROOT string: one length byte, or `255` followed by a u32 length.
    pub fn read_string(&mut self) -> Result<String> {
        let first = self.read_u8()?;
        let len = if first == 255 { self.read_u32()? as usize } else { first as usize };
        if len == 0 {
            return Ok(String::new());
        }
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read a streamer version header.
    ///
    /// Returns `(version, end)` where `end` is the absolute position at which
    /// the object ends, when the writer recorded a byte count.
    pub fn read_version(&mut self) -> Result<(u16, Option<usize>)> {
        let start = self.pos;
        let raw = self.read_u32()?;
        if raw & BYTE_COUNT_MASK != 0 {
            let byte_count = (raw & !BYTE_COUNT_MASK) as usize;
            let version = self.read_u16()?;
            Ok((version, Some(start + 4 + byte_count)))
        } else {
            // Bare version: only the first two bytes belong to the header.
            self.pos = start + 2;
            Ok(((raw >> 16) as u16, None))
        }
    }

    /// Skip an embedded object whose header carries a byte count.
    ///
    /// Objects written without a byte count are left at the position right
    /// after their version; modern ROOT always writes the count.
    pub fn skip_object(&mut self) -> Result<()> {
        let (_ver, end) = self.read_version()?;
        if let Some(end) = end {
            self.set_pos(end)?;
        }
        Ok(())
    }

    /// Read a `TObject` header, returning `(unique_id, bits)`.
    pub fn read_tobject(&mut self) -> Result<(u32, u32)> {
        let _ver = self.read_u16()?;
        let unique_id = self.read_u32()?;
        let bits = self.read_u32()?;
        if bits & IS_REFERENCED != 0 {
            self.skip(2)?;
        }
        Ok((unique_id, bits))
    }

    /// Read a `TNamed`, returning `(name, title)`.
    pub fn read_tnamed(&mut self) -> Result<(String, String)> {
        let (_ver, end) = self.read_version()?;
        self.read_tobject()?;
        let name = self.read_string()?;
        let title = self.read_string()?;
        if let Some(end) = end {
            self.set_pos(end)?;
        }
        Ok((name, title))
    }

    /// Read a length-prefixed `TArrayD`.
    pub fn read_tarray_f64(&mut self) -> Result<Vec<f64>> {
        let n = self.read_u32()? as usize;
        self.read_array(n, Self::read_f64)
    }

    /// Read `n` elements with `read` into a `Vec<f64>`.
    pub fn read_array<T: Into<f64>>(
        &mut self,
        n: usize,
        read: fn(&mut Self) -> Result<T>,
    ) -> Result<Vec<f64>> {
        // A corrupt length must not trigger a huge allocation.
        self.ensure(n)?;
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(read(self)?.into());
        }
        Ok(out)
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if self.pos.saturating_add(n) > self.data.len() {
            return Err(RootError::BufferUnderflow {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_primitives() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x40, 0x09, 0x21, 0xfb, 0x54, 0x44, 0x2d, 0x18];
        let mut r = RBuffer::new(&data);
        assert_eq!(r.read_u32().unwrap(), 0x0102_0304);
        assert!((r.read_f64().unwrap() - std::f64::consts::PI).abs() < 1e-15);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn read_long_string() {
        let mut data = vec![255u8];
        data.extend_from_slice(&300u32.to_be_bytes());
        data.extend(std::iter::repeat_n(b'x', 300));
        let mut r = RBuffer::new(&data);
        assert_eq!(r.read_string().unwrap().len(), 300);
    }

    #[test]
    fn version_with_byte_count_reports_absolute_end() {
        let mut data = vec![0u8; 3];
        data.extend_from_slice(&(BYTE_COUNT_MASK | 16).to_be_bytes());
        data.extend_from_slice(&3u16.to_be_bytes());
        data.extend_from_slice(&[0u8; 20]);
        let mut r = RBuffer::new(&data);
        r.skip(3).unwrap();
        let (ver, end) = r.read_version().unwrap();
        assert_eq!(ver, 3);
        assert_eq!(end, Some(3 + 4 + 16));
    }

    #[test]
    fn version_without_byte_count() {
        let data = [0x00, 0x05, 0xAA, 0xBB];
        let mut r = RBuffer::new(&data);
        let (ver, end) = r.read_version().unwrap();
        assert_eq!(ver, 5);
        assert!(end.is_none());
        assert_eq!(r.pos(), 2);
    }

    #[test]
    fn oversized_array_length_is_rejected() {
        let mut data = Vec::new();
        data.extend_from_slice(&u32::MAX.to_be_bytes());
        let mut r = RBuffer::new(&data);
        assert!(matches!(r.read_tarray_f64(), Err(RootError::BufferUnderflow { .. })));
    }
}
