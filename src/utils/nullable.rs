use serde::{Deserialize, Deserializer};

/// Tells an absent field apart from an explicit `null`.
///
/// Use together with `#[serde(default)]`: a missing key stays `None`, `null`
/// becomes `Some(None)` and a value becomes `Some(Some(value))`.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "super::deserialize")]
        image_url: Option<Option<String>>,
    }

    #[test]
    fn distinguishes_missing_null_and_value() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"image_url":null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"image_url":"https://x.io/a.png"}"#).unwrap();

        assert_eq!(missing.image_url, None);
        assert_eq!(null.image_url, Some(None));
        assert_eq!(
            value.image_url,
            Some(Some(String::from("https://x.io/a.png")))
        );
    }
}
