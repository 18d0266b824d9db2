//! IMS HTTP client for raw API calls

use std::collections::BTreeMap;
use std::time::Duration;

use log::debug;
use reqwest::{Client, StatusCode};

use crate::config::api;
use crate::error::{ImsError, Result};

use super::api_error_message;

/// HTTP method for an API invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMethod {
    Get,
    Post,
}

/// IMS API client bound to one base URL and one bearer token
pub struct ImsClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ImsClient {
    /// Create a new client with bounded timeouts
    pub fn new(base_url: String, token: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(api::REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url,
            token,
        }
    }

    /// Invoke an IMS API and return the parsed JSON result.
    ///
    /// GET sends the parameters as query string, POST as a form body.
    /// Classification: 404 maps to `ApiNotFound`; any other non-success
    /// status carries the response body's error description.
    pub async fn call(
        &self,
        method: CallMethod,
        api_path: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, api_path);
        debug!("call({:?}, {}, {} params)", method, url, params.len());

        let builder = match method {
            CallMethod::Get => self.client.get(&url).query(params),
            CallMethod::Post => self.client.post(&url).form(params),
        };

        let response = builder.bearer_auth(&self.token).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ImsError::ApiNotFound);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImsError::Api {
                status: status.as_u16(),
                message: api_error_message(status.as_u16(), &body),
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_get_returns_json_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ims/profile/v1"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "email": "user@example.com" })),
            )
            .mount(&server)
            .await;

        let client = ImsClient::new(server.uri(), "tok-1".to_string());
        let result = client
            .call(CallMethod::Get, "/ims/profile/v1", &BTreeMap::new())
            .await
            .unwrap();

        assert_eq!(result["email"], "user@example.com");
    }

    #[tokio::test]
    async fn test_get_forwards_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ims/profile/v1"))
            .and(query_param("client_id", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = ImsClient::new(server.uri(), "tok-1".to_string());
        let result = client
            .call(
                CallMethod::Get,
                "/ims/profile/v1",
                &params(&[("client_id", "abc")]),
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_post_sends_form_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ims/check/v1"))
            .and(wiremock::matchers::body_string_contains("key=value"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = ImsClient::new(server.uri(), "tok-1".to_string());
        let result = client
            .call(CallMethod::Post, "/ims/check/v1", &params(&[("key", "value")]))
            .await
            .unwrap();

        assert_eq!(result["ok"], true);
    }

    #[tokio::test]
    async fn test_404_maps_to_api_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ims/missing/v1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ImsClient::new(server.uri(), "tok-1".to_string());
        let result = client
            .call(CallMethod::Get, "/ims/missing/v1", &BTreeMap::new())
            .await;

        assert!(matches!(result, Err(ImsError::ApiNotFound)));
    }

    #[tokio::test]
    async fn test_error_message_from_body_description() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ims/profile/v1"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "invalid_token",
                "error_description": "The access token is invalid"
            })))
            .mount(&server)
            .await;

        let client = ImsClient::new(server.uri(), "tok-1".to_string());
        let result = client
            .call(CallMethod::Get, "/ims/profile/v1", &BTreeMap::new())
            .await;

        match result {
            Err(ImsError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "The access token is invalid");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_without_body_falls_back_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ims/profile/v1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ImsClient::new(server.uri(), "tok-1".to_string());
        let result = client
            .call(CallMethod::Get, "/ims/profile/v1", &BTreeMap::new())
            .await;

        match result {
            Err(ImsError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert!(message.contains("500"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }
}
