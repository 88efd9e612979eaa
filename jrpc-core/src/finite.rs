//! Non-finite number detection for outgoing params
//!
//! `serde_json` writes NaN and infinities as `null`, which would silently turn
//! a caller's value into something else. [`check`] walks any `Serialize` value
//! without building output and fails on the first non-finite float.

use serde::ser::{self, Error as _, Serialize};

type Outcome = std::result::Result<(), serde_json::Error>;

/// Fail if `value` contains a NaN or infinite float anywhere, map keys included
pub(crate) fn check<T: Serialize + ?Sized>(value: &T) -> Outcome {
    value.serialize(FiniteCheck)
}

struct FiniteCheck;

impl ser::Serializer for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _v: bool) -> Outcome {
        Ok(())
    }

    fn serialize_i8(self, _v: i8) -> Outcome {
        Ok(())
    }

    fn serialize_i16(self, _v: i16) -> Outcome {
        Ok(())
    }

    fn serialize_i32(self, _v: i32) -> Outcome {
        Ok(())
    }

    fn serialize_i64(self, _v: i64) -> Outcome {
        Ok(())
    }

    fn serialize_i128(self, _v: i128) -> Outcome {
        Ok(())
    }

    fn serialize_u8(self, _v: u8) -> Outcome {
        Ok(())
    }

    fn serialize_u16(self, _v: u16) -> Outcome {
        Ok(())
    }

    fn serialize_u32(self, _v: u32) -> Outcome {
        Ok(())
    }

    fn serialize_u64(self, _v: u64) -> Outcome {
        Ok(())
    }

    fn serialize_u128(self, _v: u128) -> Outcome {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Outcome {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Outcome {
        if v.is_finite() {
            Ok(())
        } else {
            Err(serde_json::Error::custom(format!("non-finite number {}", v)))
        }
    }

    fn serialize_char(self, _v: char) -> Outcome {
        Ok(())
    }

    fn serialize_str(self, _v: &str) -> Outcome {
        Ok(())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Outcome {
        Ok(())
    }

    fn serialize_none(self) -> Outcome {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Outcome {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Outcome {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Outcome {
        Ok(())
    }

    fn serialize_unit_variant(self, _name: &'static str, _index: u32, _variant: &'static str) -> Outcome {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(self, _name: &'static str, value: &T) -> Outcome {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Outcome {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> std::result::Result<Self, Self::Error> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> std::result::Result<Self, Self::Error> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> std::result::Result<Self, Self::Error> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> std::result::Result<Self, Self::Error> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> std::result::Result<Self, Self::Error> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> std::result::Result<Self, Self::Error> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> std::result::Result<Self, Self::Error> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Outcome {
        check(value)
    }

    fn end(self) -> Outcome {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Outcome {
        check(value)
    }

    fn end(self) -> Outcome {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Outcome {
        check(value)
    }

    fn end(self) -> Outcome {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Outcome {
        check(value)
    }

    fn end(self) -> Outcome {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Outcome {
        check(key)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Outcome {
        check(value)
    }

    fn end(self) -> Outcome {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _key: &'static str, value: &T) -> Outcome {
        check(value)
    }

    fn end(self) -> Outcome {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _key: &'static str, value: &T) -> Outcome {
        check(value)
    }

    fn end(self) -> Outcome {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_finite_values_pass() {
        assert!(check(&json!({"a": [1, 2.5, "x", null, true]})).is_ok());
        assert!(check(&vec![0.0f64, -1.5, f64::MAX]).is_ok());
        assert!(check(&Some(3.0f32)).is_ok());
    }

    #[test]
    fn test_non_finite_rejected_at_any_depth() {
        assert!(check(&f64::NAN).is_err());
        assert!(check(&vec![1.0, f64::INFINITY]).is_err());
        assert!(check(&(1u8, f32::NEG_INFINITY)).is_err());

        let mut nested = BTreeMap::new();
        nested.insert("inner", vec![Some(f64::NAN)]);
        assert!(check(&nested).is_err());
    }

    #[test]
    fn test_struct_fields_checked() {
        #[derive(Serialize)]
        struct Sample {
            label: &'static str,
            value: f64,
        }

        assert!(check(&Sample { label: "ok", value: 1.0 }).is_ok());
        assert!(check(&Sample { label: "bad", value: f64::NAN }).is_err());
    }
}
