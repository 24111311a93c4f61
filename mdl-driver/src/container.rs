//! `.mdlx` files: a short header followed by one serialized expression

use log::debug;
use mdl_common::{BufferDeserializer, BufferSerializer, Deserializer, SerialError, Serializer};
use mdl_expr::{Expression, ExpressionFactory, ExpressionRef};

pub const MAGIC: &[u8; 4] = b"MDLX";
pub const VERSION: u8 = 1;

pub fn encode(factory: &ExpressionFactory, expr: &Expression) -> Vec<u8> {
    let mut ser = BufferSerializer::new();
    ser.write_bytes(MAGIC);
    ser.write_u8(VERSION);
    factory.serialize(&mut ser, expr);
    ser.into_bytes()
}

pub fn decode(factory: &ExpressionFactory, bytes: &[u8]) -> Result<ExpressionRef, SerialError> {
    let mut de = BufferDeserializer::new(bytes);

    let magic = de.read_bytes(MAGIC.len()).map_err(|_| SerialError::BadHeader)?;
    if magic.as_slice() != MAGIC {
        return Err(SerialError::BadHeader);
    }

    let version = de.read_u8().map_err(|_| SerialError::BadHeader)?;
    if version != VERSION {
        return Err(SerialError::UnsupportedVersion { version });
    }

    let expr = factory.deserialize(&mut de)?;
    if !de.is_at_end() {
        return Err(SerialError::TrailingBytes {
            remaining: de.remaining(),
        });
    }

    debug!("decoded {} byte container", bytes.len());
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdl_common::basic::{BasicValue, BasicValueFactory};
    use std::cmp::Ordering;
    use std::sync::Arc;

    fn factory() -> ExpressionFactory {
        ExpressionFactory::new(Arc::new(BasicValueFactory::new()))
    }

    #[test]
    fn test_roundtrip() {
        let f = factory();
        let expr = f.create_constant(BasicValue::Float(0.75).shared());

        let bytes = encode(&f, &expr);
        assert_eq!(&bytes[..4], MAGIC);
        assert_eq!(bytes[4], VERSION);

        let decoded = decode(&f, &bytes).unwrap();
        assert_eq!(f.compare(&expr, &decoded), Ordering::Equal);
    }

    #[test]
    fn test_bad_header() {
        let f = factory();
        assert_eq!(decode(&f, b"MD").err(), Some(SerialError::BadHeader));
        assert_eq!(decode(&f, b"ABCD\x01\x00").err(), Some(SerialError::BadHeader));
        assert_eq!(decode(&f, b"MDLX").err(), Some(SerialError::BadHeader));
    }

    #[test]
    fn test_unsupported_version() {
        let f = factory();
        let expr = f.create_constant(BasicValue::Int(1).shared());
        let mut bytes = encode(&f, &expr);
        bytes[4] = 2;

        assert_eq!(
            decode(&f, &bytes).err(),
            Some(SerialError::UnsupportedVersion { version: 2 })
        );
    }

    #[test]
    fn test_deeply_nested_file() {
        let f = factory();
        let mut bytes = MAGIC.to_vec();
        bytes.push(VERSION);
        for _ in 0..20_000 {
            bytes.extend_from_slice(&[3, 5, 1, 1, 0]);
        }

        assert_eq!(
            decode(&f, &bytes).err(),
            Some(SerialError::NestingTooDeep {
                limit: mdl_expr::MAX_NESTING
            })
        );
    }

    #[test]
    fn test_trailing_bytes() {
        let f = factory();
        let expr = f.create_constant(BasicValue::Int(1).shared());
        let mut bytes = encode(&f, &expr);
        bytes.extend_from_slice(&[0, 0]);

        assert_eq!(
            decode(&f, &bytes).err(),
            Some(SerialError::TrailingBytes { remaining: 2 })
        );
    }
}
