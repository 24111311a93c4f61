//! Byte-stream serialization contracts
//!
//! The expression factory defines the framing of the objects it persists;
//! the stream underneath only knows how to move primitive values. Integers
//! are written as variable-length quantities: 7 bits per byte, least
//! significant group first, high bit set on every byte but the last.

use crate::error::SerialError;

/// Ordered, synchronous writer the factory drives
pub trait Serializer {
    fn write_u8(&mut self, value: u8);

    fn write_u64(&mut self, value: u64);

    fn write_bytes(&mut self, bytes: &[u8]);

    fn write_usize(&mut self, value: usize) {
        self.write_u64(value as u64);
    }

    fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8);
    }

    /// Length-prefixed utf-8
    fn write_str(&mut self, value: &str) {
        self.write_usize(value.len());
        self.write_bytes(value.as_bytes());
    }
}

/// Ordered, synchronous reader the factory drives
///
/// A failed read may or may not have advanced the stream; callers abort
/// the object being decoded.
pub trait Deserializer {
    fn read_u8(&mut self) -> Result<u8, SerialError>;

    fn read_u64(&mut self) -> Result<u64, SerialError>;

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, SerialError>;

    fn read_usize(&mut self) -> Result<usize, SerialError> {
        usize::try_from(self.read_u64()?).map_err(|_| SerialError::Overflow)
    }

    fn read_bool(&mut self) -> Result<bool, SerialError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            n => Err(SerialError::InvalidValue {
                message: format!("boolean byte {n}"),
            }),
        }
    }

    fn read_string(&mut self) -> Result<String, SerialError> {
        let len = self.read_usize()?;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Serializer appending to an in-memory buffer
#[derive(Debug, Default, Clone)]
pub struct BufferSerializer {
    buf: Vec<u8>,
}

impl BufferSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Serializer for BufferSerializer {
    fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    fn write_u64(&mut self, mut value: u64) {
        loop {
            let group = (value & 0x7f) as u8;
            value >>= 7;

            if value == 0 {
                self.buf.push(group);
                break;
            }

            self.buf.push(group | 0x80);
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }
}

/// Deserializer reading from a borrowed buffer
#[derive(Debug, Clone)]
pub struct BufferDeserializer<'a> {
    buf: &'a [u8],
    index: usize,
}

impl<'a> BufferDeserializer<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, index: 0 }
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.index
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.buf.len()
    }
}

impl Deserializer for BufferDeserializer<'_> {
    fn read_u8(&mut self) -> Result<u8, SerialError> {
        match self.buf.get(self.index) {
            Some(byte) => {
                self.index += 1;
                Ok(*byte)
            }
            None => Err(SerialError::UnexpectedEof),
        }
    }

    fn read_u64(&mut self) -> Result<u64, SerialError> {
        let mut result: u64 = 0;
        let mut shift = 0u32;

        loop {
            let byte = self.read_u8()?;
            let group = (byte & 0x7f) as u64;

            // the tenth group may only carry the top bit
            if shift == 63 && group > 1 {
                return Err(SerialError::Overflow);
            }

            result |= group << shift;

            if byte & 0x80 == 0 {
                return Ok(result);
            }

            shift += 7;

            if shift > 63 {
                return Err(SerialError::Overflow);
            }
        }
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, SerialError> {
        if len > self.remaining() {
            return Err(SerialError::UnexpectedEof);
        }

        let bytes = self.buf[self.index..self.index + len].to_vec();
        self.index += len;
        Ok(bytes)
    }
}
