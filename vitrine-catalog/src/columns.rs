//! Serde adapters for row columns.
//!
//! Rows are flat: every column holds a scalar or `null`. A `null` in a
//! column the record models as a plain value reads as that value's default.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// `null` (or a missing column, with `#[serde(default)]`) reads as `T::default()`.
pub fn null_as_default<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'de> + Default,
    D: Deserializer<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A structured value kept in a single text column as JSON.
///
/// Reads accept the encoded text, an already decoded object, an empty
/// string or `null`.
pub mod json_text {
    use super::*;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        let text = serde_json::to_string(value).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: DeserializeOwned + Default,
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(T::default()),
            Value::String(text) if text.trim().is_empty() => Ok(T::default()),
            Value::String(text) => serde_json::from_str(&text).map_err(de::Error::custom),
            other => serde_json::from_value(other).map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        flag: bool,
        #[serde(default, with = "json_text")]
        extra: HashMap<String, String>,
    }

    #[test]
    fn nulls_read_as_defaults() {
        let sample: Sample =
            serde_json::from_value(json!({"name": null, "flag": null, "extra": null})).unwrap();
        assert_eq!(sample.name, "");
        assert!(!sample.flag);
        assert!(sample.extra.is_empty());
    }

    #[test]
    fn structured_column_is_written_as_text() {
        let mut sample = Sample::default();
        sample.extra.insert("en".into(), "Open day".into());

        let value = serde_json::to_value(&sample).unwrap();
        assert_eq!(value["extra"], json!(r#"{"en":"Open day"}"#));

        let back: Sample = serde_json::from_value(value).unwrap();
        assert_eq!(back.extra["en"], "Open day");
    }

    #[test]
    fn decoded_object_is_also_accepted() {
        let sample: Sample =
            serde_json::from_value(json!({"extra": {"en": "Open day"}})).unwrap();
        assert_eq!(sample.extra["en"], "Open day");
    }
}
