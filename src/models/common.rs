//! Common types shared across all models.
//!
//! Last.fm is loose with its JSON: counters arrive as numbers in one method
//! and as strings in the next, and a list with a single entry is sometimes
//! sent as a bare object. The deserializers here accept both shapes.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Image size labels used by Last.fm.
pub mod image_size {
    pub const SMALL: &str = "small";
    pub const MEDIUM: &str = "medium";
    pub const LARGE: &str = "large";
    pub const EXTRA_LARGE: &str = "extralarge";
    pub const MEGA: &str = "mega";
}

/// One image variant of an artist or album.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageItem {
    /// URL to the image. Empty when Last.fm has no picture.
    #[serde(rename = "#text", default)]
    pub url: String,

    /// Size label ("small", "medium", "large", ...).
    #[serde(default)]
    pub size: String,
}

impl ImageItem {
    /// Create a new image variant.
    pub fn new<S1: Into<String>, S2: Into<String>>(url: S1, size: S2) -> Self {
        Self {
            url: url.into(),
            size: size.into(),
        }
    }
}

/// Find the URL of the variant with the given size label.
pub fn image_url<'a>(images: &'a [ImageItem], size: &str) -> Option<&'a str> {
    images
        .iter()
        .find(|image| image.size == size)
        .map(|image| image.url.as_str())
}

/// Accept `123`, `"123"`, `""` or `null` as a counter.
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .ok_or_else(|| D::Error::custom(format!("invalid counter: {}", n))),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(0)
            } else {
                s.parse()
                    .map_err(|_| D::Error::custom(format!("invalid counter: {:?}", s)))
            }
        }
        Some(other) => Err(D::Error::custom(format!("invalid counter: {}", other))),
    }
}

/// Accept `[a, b]`, a bare `a`, or `null` as a list.
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
        None => Vec::new(),
    })
}

/// Accept a string or `null`, mapping `null` to the empty string.
pub(crate) fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept an object, or a placeholder string / `null` meaning "absent".
pub(crate) fn object_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Counter {
        #[serde(default, deserialize_with = "lenient_u64")]
        value: u64,
    }

    #[derive(Debug, Deserialize)]
    struct Names {
        #[serde(default, deserialize_with = "one_or_many")]
        name: Vec<String>,
    }

    #[test]
    fn test_lenient_counter_shapes() {
        let parse = |v: Value| serde_json::from_value::<Counter>(v).unwrap().value;
        assert_eq!(parse(json!({ "value": 42 })), 42);
        assert_eq!(parse(json!({ "value": "42" })), 42);
        assert_eq!(parse(json!({ "value": "" })), 0);
        assert_eq!(parse(json!({ "value": null })), 0);
        assert_eq!(parse(json!({})), 0);
    }

    #[test]
    fn test_lenient_counter_rejects_garbage() {
        assert!(serde_json::from_value::<Counter>(json!({ "value": "many" })).is_err());
        assert!(serde_json::from_value::<Counter>(json!({ "value": [1] })).is_err());
    }

    #[test]
    fn test_one_or_many() {
        let parse = |v: Value| serde_json::from_value::<Names>(v).unwrap().name;
        assert_eq!(parse(json!({ "name": ["a", "b"] })), vec!["a", "b"]);
        assert_eq!(parse(json!({ "name": "a" })), vec!["a"]);
        assert!(parse(json!({ "name": null })).is_empty());
        assert!(parse(json!({})).is_empty());
    }

    #[test]
    fn test_image_url_by_size() {
        let images = vec![
            ImageItem::new("https://img/s.png", image_size::SMALL),
            ImageItem::new("https://img/l.png", image_size::LARGE),
        ];
        assert_eq!(image_url(&images, image_size::LARGE), Some("https://img/l.png"));
        assert_eq!(image_url(&images, image_size::MEGA), None);
    }
}
