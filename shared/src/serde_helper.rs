use serde::{Deserialize, Deserializer};

/// Accepts either a JSON string or a number and keeps it as a string.
///
/// Depot ids come back as `0` from some solver runs and as `"DEPOT"` from others.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(i) => i.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "string_or_number")]
        id: String,
    }

    #[test]
    fn test_string_or_number() {
        let a: Holder = serde_json::from_str(r#"{"id":"C046"}"#).unwrap();
        let b: Holder = serde_json::from_str(r#"{"id":12}"#).unwrap();
        assert_eq!(a.id, "C046");
        assert_eq!(b.id, "12");
    }
}
