//! HTTP client for the Responses API (Azure flavour).

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::FunctionCall;
use crate::config::Endpoint;
use crate::error::{Result, TernError};

/// Posts to `{base_url}/responses`.
#[derive(Debug, Clone)]
pub struct ResponsesClient {
    endpoint: Endpoint,
    http: reqwest::Client,
}

impl ResponsesClient {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn url(&self) -> String {
        format!("{}/responses", self.endpoint.base_url)
    }

    /// Azure convention: nominal key in `api-key`, then any extra headers.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.endpoint.api_key {
            headers.insert("api-key", header_value("api-key", key.expose())?);
        }
        for (name, value) in &self.endpoint.headers {
            let header = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                TernError::Configuration(format!("invalid header name {name:?}: {e}"))
            })?;
            headers.insert(header, header_value(name, value.expose())?);
        }
        Ok(headers)
    }

    /// Create one response.
    pub async fn create(&self, body: &Value) -> Result<ResponsesApiResponse> {
        let mut request = self
            .http
            .post(self.url())
            .headers(self.build_headers()?)
            .json(body);
        if let Some(version) = &self.endpoint.api_version {
            request = request.query(&[("api-version", version)]);
        }

        debug!(url = %self.url(), "POST responses");
        let resp = request.send().await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: ResponsesApiResponse = resp.json().await?;
        if let Some(error) = data.error.as_ref().filter(|e| !e.is_null()) {
            return Err(TernError::Provider {
                provider: "responses".into(),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string()),
            });
        }
        if let Some(status) = data.status.as_deref().filter(|s| *s != "completed") {
            let reason = data
                .incomplete_details
                .as_ref()
                .and_then(|d| d.get("reason"))
                .and_then(Value::as_str)
                .map(|r| format!(" ({r})"))
                .unwrap_or_default();
            return Err(TernError::Provider {
                provider: "responses".into(),
                message: format!("response ended with status {status}{reason}"),
            });
        }
        Ok(data)
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|_| TernError::Configuration(format!("invalid value for header {name}")))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> TernError {
    match status {
        401 | 403 => TernError::Authentication(body.to_string()),
        _ => TernError::api(status, body),
    }
}

/// Subset of a Responses API payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsesApiResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Vec<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub incomplete_details: Option<Value>,
    #[serde(default)]
    pub usage: Option<ResponsesUsage>,
}

impl ResponsesApiResponse {
    /// Concatenated `output_text` of every message item.
    pub fn output_text(&self) -> String {
        let mut text = String::new();
        for item in &self.output {
            if item.get("type").and_then(Value::as_str) != Some("message") {
                continue;
            }
            let Some(content) = item.get("content").and_then(Value::as_array) else {
                continue;
            };
            for chunk in content {
                if chunk.get("type").and_then(Value::as_str) == Some("output_text") {
                    if let Some(segment) = chunk.get("text").and_then(Value::as_str) {
                        text.push_str(segment);
                    }
                }
            }
        }
        text
    }

    /// Function calls the model requested, in order.
    ///
    /// A `function_call` item without `call_id` or `name` is a protocol error.
    pub fn function_calls(&self) -> Result<Vec<FunctionCall>> {
        self.output
            .iter()
            .filter(|item| item.get("type").and_then(Value::as_str) == Some("function_call"))
            .map(|item| {
                Ok(FunctionCall {
                    call_id: required_str(item, "call_id")?,
                    name: required_str(item, "name")?,
                    arguments: item
                        .get("arguments")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                })
            })
            .collect()
    }
}

fn required_str(item: &Value, field: &str) -> Result<String> {
    item.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            TernError::Protocol(format!("function_call item without {field}: {item}"))
        })
}

/// Token usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ResponsesUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

impl ResponsesUsage {
    pub fn add(&mut self, other: &ResponsesUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        self.total_tokens += other.total_tokens;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credential;
    use serde_json::json;

    fn endpoint() -> Endpoint {
        Endpoint {
            base_url: "https://llm.example.com/OpenAI".into(),
            api_version: Some("2025-04-01-preview".into()),
            api_key: Some(Credential::new("dummy")),
            headers: vec![("Ocp-Apim-Subscription-Key".into(), Credential::new("sub"))],
        }
    }

    #[test]
    fn headers_include_api_key_and_extras() {
        let headers = ResponsesClient::new(endpoint()).build_headers().unwrap();
        assert_eq!(headers["api-key"], "dummy");
        assert_eq!(headers["ocp-apim-subscription-key"], "sub");
        assert!(headers["api-key"].is_sensitive());
    }

    #[test]
    fn invalid_header_name_is_configuration_error() {
        let mut endpoint = endpoint();
        endpoint.headers = vec![("bad header".into(), Credential::new("x"))];
        let err = ResponsesClient::new(endpoint).build_headers().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn url_appends_responses_path() {
        assert_eq!(
            ResponsesClient::new(endpoint()).url(),
            "https://llm.example.com/OpenAI/responses"
        );
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(status_to_error(401, "no"), TernError::Authentication(_)));
        assert!(matches!(status_to_error(403, "no"), TernError::Authentication(_)));
        assert!(matches!(status_to_error(500, "x"), TernError::Api { status: 500, .. }));
    }

    #[test]
    fn parses_text_and_calls_from_output_items() {
        let response: ResponsesApiResponse = serde_json::from_value(json!({
            "id": "resp_1",
            "status": "completed",
            "output": [
                {"type": "reasoning", "id": "rs_1", "summary": []},
                {"type": "function_call", "call_id": "call_1", "name": "get_weather", "arguments": "{\"city\":\"Tokyo\"}"},
                {"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "text": "Sunny "},
                    {"type": "refusal", "refusal": "no"},
                    {"type": "output_text", "text": "Tokyo"}
                ]}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5, "total_tokens": 15}
        }))
        .unwrap();

        assert_eq!(response.output_text(), "Sunny Tokyo");
        let calls = response.function_calls().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "get_weather");
        assert_eq!(calls[0].arguments, "{\"city\":\"Tokyo\"}");
        assert_eq!(response.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn function_call_without_call_id_is_a_protocol_error() {
        let response: ResponsesApiResponse = serde_json::from_value(json!({
            "status": "completed",
            "output": [
                {"type": "function_call", "name": "get_weather", "arguments": "{}"}
            ]
        }))
        .unwrap();

        let err = response.function_calls().unwrap_err();
        assert!(matches!(err, TernError::Protocol(m) if m.contains("call_id")));
    }
}
