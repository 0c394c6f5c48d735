//! Typed access to tool call arguments.

use crate::error::TernError;

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Parse the raw `arguments` string a model sends with a function call.
    ///
    /// An empty string means "no arguments".
    pub fn from_json_str(raw: &str) -> Result<Self, TernError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::new(serde_json::json!({})));
        }
        serde_json::from_str(trimmed)
            .map(Self::new)
            .map_err(|e| {
                TernError::InvalidArgument(format!("Tool arguments must be valid JSON: {e}"))
            })
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, TernError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| TernError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, TernError> {
        serde_json::from_value(self.value.clone()).map_err(|e| {
            TernError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn parses_model_argument_string() {
        let args = ToolArguments::from_json_str(r#"{"city":"Tokyo"}"#).unwrap();
        assert_eq!(args.get_str("city").unwrap(), "Tokyo");
        assert_eq!(args.get_str_opt("country"), None);
    }

    #[test]
    fn empty_string_is_empty_object() {
        let args = ToolArguments::from_json_str("  ").unwrap();
        assert!(args.raw().as_object().is_some_and(|o| o.is_empty()));
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        let err = ToolArguments::from_json_str(r#"{"city":"#).unwrap_err();
        assert!(matches!(err, TernError::InvalidArgument(m) if m.contains("valid JSON")));
    }

    #[test]
    fn missing_key_names_the_key() {
        let args = ToolArguments::new(serde_json::json!({}));
        let err = args.get_str("city").unwrap_err();
        assert!(err.to_string().contains("city"));
    }

    #[test]
    fn deserializes_into_struct() {
        #[derive(Deserialize)]
        struct Weather {
            city: String,
        }
        let args = ToolArguments::new(serde_json::json!({"city": "Oslo"}));
        let weather: Weather = args.deserialize().unwrap();
        assert_eq!(weather.city, "Oslo");
    }
}
