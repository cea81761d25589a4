use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;

/// A raw document as returned by the store: its id plus the JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Decode the body into a typed model.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        name: String,
    }

    #[test]
    fn test_decode_typed() {
        let doc = Document::new("p1", serde_json::json!({ "name": "x" }));
        let probe: Probe = doc.decode().unwrap();
        assert_eq!(probe, Probe { name: "x".into() });
    }

    #[test]
    fn test_decode_failure_is_error() {
        let doc = Document::new("p1", serde_json::json!({ "name": 7 }));
        assert!(doc.decode::<Probe>().is_err());
    }
}
