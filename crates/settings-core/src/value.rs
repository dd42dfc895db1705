//! Typed setting values
//!
//! Every stored setting is a [`SettingValue`], a closed sum over the kinds the
//! settings file can represent. Rust types opt in through [`SettingType`],
//! which names the type (the first half of an entry's identity) and converts
//! to and from the stored form.

use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Number, Value};

use crate::{Error, Result};

/// A single stored setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    /// Arbitrary structured data (objects, arrays, nested values)
    Json(Value),
}

/// Storage bucket a value is filed under in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueBucket {
    /// Booleans and numbers
    Primitive,
    /// Plain strings
    String,
    /// Structured values
    Complex,
}

impl SettingValue {
    pub fn bucket(&self) -> ValueBucket {
        match self {
            Self::Bool(_) | Self::Int(_) | Self::UInt(_) | Self::Float(_) => ValueBucket::Primitive,
            Self::Str(_) => ValueBucket::String,
            Self::Json(_) => ValueBucket::Complex,
        }
    }

    /// Whether the value has a JSON form. Only non-finite floats do not.
    pub fn is_storable(&self) -> bool {
        match self {
            Self::Float(f) => f.is_finite(),
            _ => true,
        }
    }

    /// Convert to the JSON written to disk.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::UInt(u) => Value::from(*u),
            // Unreachable for stored values, see `is_storable`
            Self::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::Str(s) => Value::String(s.clone()),
            Self::Json(v) => v.clone(),
        }
    }

    /// Rebuild a value that was filed under `bucket`.
    ///
    /// Returns `None` when the JSON does not fit the bucket, e.g. an object
    /// in the primitive bucket.
    pub fn from_bucket_json(bucket: ValueBucket, json: Value) -> Option<Self> {
        match bucket {
            ValueBucket::Primitive => match json {
                Value::Bool(b) => Some(Self::Bool(b)),
                Value::Number(n) => Some(Self::from_number(&n)),
                _ => None,
            },
            ValueBucket::String => match json {
                Value::String(s) => Some(Self::Str(s)),
                _ => None,
            },
            ValueBucket::Complex => Some(Self::Json(json)),
        }
    }

    /// Infer the variant from the shape of `json`.
    ///
    /// Used where values are stored without a bucket, such as flat
    /// preference stores.
    pub fn infer(json: Value) -> Self {
        match json {
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::from_number(&n),
            Value::String(s) => Self::Str(s),
            other => Self::Json(other),
        }
    }

    fn from_number(n: &Number) -> Self {
        if let Some(i) = n.as_i64() {
            Self::Int(i)
        } else if let Some(u) = n.as_u64() {
            Self::UInt(u)
        } else {
            Self::Float(n.as_f64().unwrap_or_default())
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

/// A Rust type that can be stored as a setting.
///
/// `type_name` is persisted in settings files and forms half of every
/// entry's identity, so it must stay stable across releases.
pub trait SettingType: Sized {
    /// Stable name identifying this type in the store
    fn type_name() -> Cow<'static, str>;

    /// Convert into the stored form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the value cannot be represented.
    fn into_value(self) -> Result<SettingValue>;

    /// Decode from the stored form, or `None` if it does not fit this type.
    fn from_value(value: &SettingValue) -> Option<Self>;
}

impl SettingType for bool {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("bool")
    }

    fn into_value(self) -> Result<SettingValue> {
        Ok(SettingValue::Bool(self))
    }

    fn from_value(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

macro_rules! impl_integer_setting {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SettingType for $ty {
                fn type_name() -> Cow<'static, str> {
                    Cow::Borrowed(stringify!($ty))
                }

                fn into_value(self) -> Result<SettingValue> {
                    Ok(canonical_integer(self.into()))
                }

                fn from_value(value: &SettingValue) -> Option<Self> {
                    match value {
                        SettingValue::Int(i) => <$ty>::try_from(*i).ok(),
                        SettingValue::UInt(u) => <$ty>::try_from(*u).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_integer_setting!(i32, i64, u32, u64);

/// Integers are kept as `Int` whenever they fit, which is also how they
/// parse back from disk.
fn canonical_integer(value: i128) -> SettingValue {
    match i64::try_from(value) {
        Ok(i) => SettingValue::Int(i),
        Err(_) => SettingValue::UInt(u64::try_from(value).unwrap_or(u64::MAX)),
    }
}

impl SettingType for f64 {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("f64")
    }

    fn into_value(self) -> Result<SettingValue> {
        if !self.is_finite() {
            return Err(Error::serialization("f64", format!("{self} is not a finite number")));
        }
        Ok(SettingValue::Float(self))
    }

    fn from_value(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Float(f) => Some(*f),
            SettingValue::Int(i) => Some(*i as f64),
            SettingValue::UInt(u) => Some(*u as f64),
            _ => None,
        }
    }
}

impl SettingType for f32 {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("f32")
    }

    fn into_value(self) -> Result<SettingValue> {
        if !self.is_finite() {
            return Err(Error::serialization("f32", format!("{self} is not a finite number")));
        }
        // Widen through the shortest decimal form so 0.8 is stored as 0.8
        // rather than 0.800000011920929.
        let widened = self.to_string().parse::<f64>().unwrap_or(f64::from(self));
        Ok(SettingValue::Float(widened))
    }

    fn from_value(value: &SettingValue) -> Option<Self> {
        let narrowed = match value {
            SettingValue::Float(f) => *f as f32,
            SettingValue::Int(i) => *i as f32,
            SettingValue::UInt(u) => *u as f32,
            _ => return None,
        };
        narrowed.is_finite().then_some(narrowed)
    }
}

impl SettingType for String {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("String")
    }

    fn into_value(self) -> Result<SettingValue> {
        Ok(SettingValue::Str(self))
    }

    fn from_value(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Stores any serde type as a structured setting.
///
/// The type name is [`std::any::type_name`] of `T`, so moving or renaming
/// `T` orphans previously stored entries.
///
/// ```
/// use settings_core::{Json, SettingsDictionary};
///
/// let mut store = SettingsDictionary::new();
/// store.set("recent", Json(vec!["a.txt".to_string()])).unwrap();
/// let recent: Json<Vec<String>> = store.get("recent", Json(Vec::new()));
/// assert_eq!(recent.0, vec!["a.txt"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Serialize + DeserializeOwned> SettingType for Json<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<T>())
    }

    fn into_value(self) -> Result<SettingValue> {
        serde_json::to_value(&self.0)
            .map(SettingValue::Json)
            .map_err(|e| Error::serialization(std::any::type_name::<T>(), e.to_string()))
    }

    fn from_value(value: &SettingValue) -> Option<Self> {
        // Values read from flat stores may arrive as scalars
        serde_json::from_value(value.to_json()).ok().map(Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Window {
        width: u32,
        height: u32,
    }

    #[test]
    fn f32_is_stored_in_shortest_decimal_form() {
        let value = 0.8f32.into_value().unwrap();
        assert_eq!(value, SettingValue::Float(0.8));
        assert_eq!(f32::from_value(&value), Some(0.8f32));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn non_finite_floats_fail_to_serialize(#[case] value: f64) {
        let err = value.into_value().unwrap_err();
        assert!(matches!(err, Error::Serialization { ref type_name, .. } if type_name == "f64"));
    }

    #[test]
    fn integers_are_range_checked_on_decode() {
        let big = SettingValue::Int(i64::from(i32::MAX) + 1);
        assert_eq!(i32::from_value(&big), None);
        assert_eq!(i64::from_value(&big), Some(i64::from(i32::MAX) + 1));
        assert_eq!(u32::from_value(&SettingValue::Int(-1)), None);
    }

    #[test]
    fn integers_use_the_form_they_parse_back_as() {
        assert_eq!(3u32.into_value().unwrap(), SettingValue::Int(3));
        assert_eq!(u64::MAX.into_value().unwrap(), SettingValue::UInt(u64::MAX));
        assert_eq!((-3i32).into_value().unwrap(), SettingValue::Int(-3));
    }

    #[test]
    fn unsigned_values_decode_from_signed_storage() {
        // Small unsigned values read back from disk arrive as Int
        assert_eq!(u64::from_value(&SettingValue::Int(42)), Some(42));
    }

    #[test]
    fn strings_and_bools_do_not_coerce() {
        assert_eq!(String::from_value(&SettingValue::Int(1)), None);
        assert_eq!(bool::from_value(&SettingValue::Str("true".into())), None);
        assert_eq!(i32::from_value(&SettingValue::Float(1.0)), None);
    }

    #[test]
    fn json_values_round_trip() {
        let window = Window { width: 800, height: 600 };
        let value = Json(window.clone()).into_value().unwrap();
        assert_eq!(value.bucket(), ValueBucket::Complex);
        assert_eq!(Json::<Window>::from_value(&value), Some(Json(window)));
    }

    #[test]
    fn json_decodes_from_inferred_scalars() {
        let value = SettingValue::infer(serde_json::json!("dark"));
        assert_eq!(value, SettingValue::Str("dark".into()));
        assert_eq!(Json::<String>::from_value(&value), Some(Json("dark".to_string())));
    }

    #[test]
    fn bucket_json_rejects_mismatched_shapes() {
        let object = serde_json::json!({"a": 1});
        assert_eq!(
            SettingValue::from_bucket_json(ValueBucket::Primitive, object.clone()),
            None
        );
        assert_eq!(
            SettingValue::from_bucket_json(ValueBucket::String, serde_json::json!(3)),
            None
        );
        assert_eq!(
            SettingValue::from_bucket_json(ValueBucket::Complex, object.clone()),
            Some(SettingValue::Json(object))
        );
    }

    #[test]
    fn numbers_keep_their_kind() {
        assert_eq!(
            SettingValue::infer(serde_json::json!(2.0)),
            SettingValue::Float(2.0)
        );
        assert_eq!(SettingValue::infer(serde_json::json!(2)), SettingValue::Int(2));
        assert_eq!(
            SettingValue::infer(serde_json::json!(u64::MAX)),
            SettingValue::UInt(u64::MAX)
        );
    }
}
