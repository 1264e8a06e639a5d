//! Event store REST client
//!
//! Shapes authenticated JSON requests against the event store and maps
//! failures onto [`ApiError`]. Adapters for the individual ports live in
//! `calendar` and `schedule`.

use std::sync::Arc;
use std::time::Duration;

use cyclarc_domain::EventStoreConfig;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use super::auth::AccessTokenProvider;
use super::errors::ApiError;
use crate::http::HttpClient;

/// Configuration for the event store client
#[derive(Debug, Clone)]
pub struct EventStoreClientConfig {
    /// Base URL, e.g. "https://store.example.org/api"
    pub base_url: String,
    /// `User-Agent` override.
    pub user_agent: Option<String>,
    /// No timeout unless set.
    pub timeout: Option<Duration>,
}

impl From<&EventStoreConfig> for EventStoreClientConfig {
    fn from(config: &EventStoreConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            user_agent: Some(config.user_agent.clone()),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Authenticated JSON client for the event store
pub struct EventStoreClient {
    http_client: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    base_url: String,
}

impl EventStoreClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL is not an absolute http(s)
    /// URL or the HTTP client cannot be built.
    pub fn new(
        config: EventStoreClientConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, ApiError> {
        let parsed = Url::parse(config.base_url.trim())
            .map_err(|e| ApiError::Config(format!("Invalid event store URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "Event store URL must use http or https, got {}",
                parsed.scheme()
            )));
        }

        let mut builder = HttpClient::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = config.user_agent {
            builder = builder.user_agent(agent);
        }
        let http_client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {}", e)))?;

        Ok(Self {
            http_client,
            auth,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a GET request with query parameters.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.execute::<()>(Method::GET, path, query, None).await?;
        Self::decode(response).await
    }

    /// Execute a POST request with a JSON body.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let response = self.execute(Method::POST, path, &[], Some(body)).await?;
        Self::decode(response).await
    }

    /// Execute a POST request whose response body is ignored.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post_unit<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.execute(Method::POST, path, &[], Some(body)).await?;
        Ok(())
    }

    /// Execute a PUT request with a JSON body.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let response = self.execute(Method::PUT, path, &[], Some(body)).await?;
        Self::decode(response).await
    }

    /// Execute a DELETE request; any success status is a confirmation.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute::<()>(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    async fn execute<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.auth.access_token().await?;

        let mut request = self
            .http_client
            .request(method.clone(), &url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.http_client.send(request).await.map_err(ApiError::from)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &url, &body));
        }

        debug!(%method, url = %url, %status, "event store request succeeded");
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Decode(format!(
                    "No content response ({}), but a body was expected",
                    status.as_u16()
                ))
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response: {}", e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Decode(format!("Failed to parse response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde::Deserialize;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::auth::StaticSession;

    struct MockAuthProvider {
        token: String,
    }

    #[async_trait]
    impl AccessTokenProvider for MockAuthProvider {
        async fn access_token(&self) -> Result<String, ApiError> {
            Ok(self.token.clone())
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestResponse {
        message: String,
    }

    fn client(base_url: String) -> EventStoreClient {
        let config = EventStoreClientConfig { base_url, user_agent: None, timeout: None };
        let auth = Arc::new(MockAuthProvider { token: "test-token".to_string() });
        EventStoreClient::new(config, auth).unwrap()
    }

    #[tokio::test]
    async fn test_get_sends_bearer_and_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test"))
            .and(query_param("start", "2024-06-01"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "success"
            })))
            .mount(&mock_server)
            .await;

        let result: TestResponse = client(mock_server.uri())
            .get("/test", &[("start", "2024-06-01".to_string())])
            .await
            .unwrap();
        assert_eq!(result.message, "success");
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url_is_ignored() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/items/4"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        client(format!("{}/", mock_server.uri())).delete("/items/4").await.unwrap();
    }

    #[tokio::test]
    async fn test_post_with_204_no_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/action"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let result: Result<(), ApiError> =
            client(mock_server.uri()).post("/action", &serde_json::json!({"a": 1})).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let result: Result<TestResponse, ApiError> = client(mock_server.uri()).get("/broken", &[]).await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/protected"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/error"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal server error"))
            .mount(&mock_server)
            .await;

        let client = client(mock_server.uri());
        let auth: Result<TestResponse, ApiError> = client.get("/protected", &[]).await;
        assert!(matches!(auth, Err(ApiError::Auth(_))));
        let server: Result<TestResponse, ApiError> = client.get("/error", &[]).await;
        assert!(matches!(server, Err(ApiError::Server(_))));
    }

    #[tokio::test]
    async fn test_missing_session_sends_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let config =
            EventStoreClientConfig { base_url: mock_server.uri(), user_agent: None, timeout: None };
        let client = EventStoreClient::new(config, Arc::new(StaticSession::anonymous())).unwrap();
        let result: Result<TestResponse, ApiError> = client.get("/anything", &[]).await;
        assert!(matches!(result, Err(ApiError::Auth(_))));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let config = EventStoreClientConfig {
            base_url: "ftp://store.example.org".into(),
            user_agent: None,
            timeout: None,
        };
        let auth = Arc::new(MockAuthProvider { token: "t".into() });
        assert!(matches!(EventStoreClient::new(config, auth), Err(ApiError::Config(_))));
    }
}
