use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use smol_str::SmolStr;

/// The closed set of scalars that can be bound as statement parameters.
///
/// Numbers are split into integer and floating point so callers never lose
/// precision on the way to the driver. `BigInt` carries integers that do not
/// fit an `i64`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(untagged))]
pub enum Value {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Bytes(Vec<u8>),
    BigInt(i128),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    #[inline(always)]
    fn into_value(self) -> Value {
        self
    }
}

impl<T> IntoValue for Option<T>
where
    T: IntoValue,
{
    fn into_value(self) -> Value {
        if let Some(value) = self {
            value.into_value()
        } else {
            Value::Null
        }
    }
}

impl IntoValue for &str {
    #[inline]
    fn into_value(self) -> Value {
        Value::Text(self.to_owned())
    }
}

impl IntoValue for String {
    #[inline]
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &String {
    #[inline]
    fn into_value(self) -> Value {
        Value::Text(self.clone())
    }
}

impl IntoValue for SmolStr {
    #[inline]
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl IntoValue for bool {
    #[inline]
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

macro_rules! int_into_value {
    ($($ty:ty),*) => {
        $(
            impl IntoValue for $ty {
                #[inline]
                fn into_value(self) -> Value {
                    Value::Int(i64::from(self))
                }
            }
        )*
    };
}

int_into_value!(i8, i16, i32, i64, u8, u16, u32);

impl IntoValue for u64 {
    fn into_value(self) -> Value {
        match i64::try_from(self) {
            Ok(small) => Value::Int(small),
            Err(_) => Value::BigInt(i128::from(self)),
        }
    }
}

impl IntoValue for usize {
    fn into_value(self) -> Value {
        (self as u64).into_value()
    }
}

impl IntoValue for i128 {
    fn into_value(self) -> Value {
        match i64::try_from(self) {
            Ok(small) => Value::Int(small),
            Err(_) => Value::BigInt(self),
        }
    }
}

impl IntoValue for f32 {
    #[inline]
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl IntoValue for f64 {
    #[inline]
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for Vec<u8> {
    #[inline]
    fn into_value(self) -> Value {
        Value::Bytes(self)
    }
}

impl IntoValue for &[u8] {
    #[inline]
    fn into_value(self) -> Value {
        Value::Bytes(self.to_vec())
    }
}

impl IntoValue for DateTime<Utc> {
    #[inline]
    fn into_value(self) -> Value {
        Value::Timestamp(self)
    }
}

impl IntoValue for DateTime<FixedOffset> {
    fn into_value(self) -> Value {
        Value::Timestamp(self.with_timezone(&Utc))
    }
}

impl IntoValue for NaiveDateTime {
    fn into_value(self) -> Value {
        Value::Timestamp(self.and_utc())
    }
}

#[cfg(feature = "time")]
impl IntoValue for time::OffsetDateTime {
    fn into_value(self) -> Value {
        // the time crate's range is a subset of chrono's
        DateTime::from_timestamp(self.unix_timestamp(), self.nanosecond())
            .map_or(Value::Null, Value::Timestamp)
    }
}

#[cfg(feature = "uuid")]
impl IntoValue for uuid::Uuid {
    fn into_value(self) -> Value {
        Value::Text(self.hyphenated().to_string())
    }
}

#[cfg(feature = "json")]
impl IntoValue for serde_json::Value {
    fn into_value(self) -> Value {
        match self {
            serde_json::Value::Null => Value::Null,
            other => Value::Text(other.to_string()),
        }
    }
}

#[cfg(feature = "secrecy")]
impl IntoValue for secrecy::SecretString {
    fn into_value(self) -> Value {
        use secrecy::ExposeSecret;
        Value::Text(self.expose_secret().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_option_is_null() {
        assert_eq!(None::<i32>.into_value(), Value::Null);
        assert_eq!(Some(42).into_value(), Value::Int(42));
    }

    #[test]
    fn test_wide_integers() {
        assert_eq!(u64::MAX.into_value(), Value::BigInt(i128::from(u64::MAX)));
        assert_eq!(7u64.into_value(), Value::Int(7));
        assert_eq!(i128::MIN.into_value(), Value::BigInt(i128::MIN));
        assert_eq!(12i128.into_value(), Value::Int(12));
    }

    #[test]
    fn test_timestamps_are_utc() {
        let offset = FixedOffset::east_opt(3600).expect("valid offset");
        let local = offset.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(local.into_value(), Value::Timestamp(expected));
    }

    #[test]
    fn test_bytes() {
        let raw: &[u8] = b"\x00\x01";
        assert_eq!(raw.into_value(), Value::Bytes(vec![0, 1]));
    }
}
