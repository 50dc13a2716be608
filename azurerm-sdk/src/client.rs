//! Resource Manager HTTP client.
//!
//! Every generated operation describes itself with a [`RequestOptions`]
//! (method, path, API version, expected status codes) and hands it to
//! [`ArmClient::execute`], [`ArmClient::execute_paged`] or
//! [`ArmClient::execute_long_running`].

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, USER_AGENT};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Authorizer;
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::poller::{Poller, PollerOptions};

pub const DEFAULT_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const DEFAULT_USER_AGENT: &str = concat!("azurerm-rs/", env!("CARGO_PKG_VERSION"));

/// Body argument for operations that send none
pub const NO_BODY: Option<&()> = None;

/// Settings shared by every service client
#[derive(Clone)]
pub struct ClientOptions {
    pub environment: Environment,
    pub authorizer: Arc<dyn Authorizer>,
    pub user_agent: String,
    pub poller: PollerOptions,
}

impl ClientOptions {
    pub fn new(environment: Environment, authorizer: Arc<dyn Authorizer>) -> Self {
        Self {
            environment,
            authorizer,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            poller: PollerOptions::default(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_poller(mut self, poller: PollerOptions) -> Self {
        self.poller = poller;
        self
    }
}

/// Description of a single API call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub content_type: String,
    pub expected_status_codes: Vec<u16>,
    pub http_method: Method,
    /// Path relative to the Resource Manager endpoint, usually a resource ID
    pub path: String,
    pub api_version: String,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new(http_method: Method, path: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            expected_status_codes: vec![200],
            http_method,
            path: path.into(),
            api_version: api_version.into(),
            query: Vec::new(),
        }
    }

    pub fn expect(mut self, status_codes: &[u16]) -> Self {
        self.expected_status_codes = status_codes.to_vec();
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// A response whose status was expected by the operation
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub url: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl Response {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|source| Error::Decode {
            url: self.url.clone(),
            source,
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

/// One page of a list operation
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,
}

#[derive(Deserialize)]
struct ArmErrorResponse {
    error: Option<ArmErrorDetail>,
}

#[derive(Deserialize)]
struct ArmErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

/// Pull `error.code` and `error.message` out of an ARM error body
pub(crate) fn parse_error_body(body: &str) -> (String, String) {
    match serde_json::from_str::<ArmErrorResponse>(body) {
        Ok(ArmErrorResponse {
            error: Some(detail),
        }) => (
            detail.code.unwrap_or_default(),
            detail.message.unwrap_or_default(),
        ),
        _ => (String::new(), body.to_string()),
    }
}

#[derive(Clone)]
pub struct ArmClient {
    http: reqwest::Client,
    endpoint: Url,
    authorizer: Arc<dyn Authorizer>,
    user_agent: String,
    poller: PollerOptions,
}

impl ArmClient {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            endpoint: Url::parse(&options.environment.resource_manager)?,
            authorizer: options.authorizer.clone(),
            user_agent: options.user_agent.clone(),
            poller: options.poller.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn poller_options(&self) -> &PollerOptions {
        &self.poller
    }

    /// Full URL of an operation, including `api-version`
    pub fn url_for(&self, options: &RequestOptions) -> Result<Url> {
        let mut url = self.endpoint.join(&options.path)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api-version", &options.api_version);
            for (key, value) in &options.query {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Send a request and check its status against the expected codes
    pub async fn execute<B: Serialize + ?Sized>(
        &self,
        options: &RequestOptions,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = self.url_for(options)?;
        let body = body
            .map(|b| serde_json::to_vec(b).map_err(Error::Encode))
            .transpose()?;
        self.send(
            options.http_method.clone(),
            url,
            &options.content_type,
            body,
            &options.expected_status_codes,
        )
        .await
    }

    /// Send a list request and follow `nextLink` until every page is read
    pub async fn execute_paged<T: DeserializeOwned>(&self, options: &RequestOptions) -> Result<Vec<T>> {
        let mut response = self.execute(options, NO_BODY).await?;
        let mut items = Vec::new();
        loop {
            let page: Page<T> = response.json()?;
            items.extend(page.value);
            match page.next_link.filter(|link| !link.is_empty()) {
                Some(link) => {
                    log::debug!("following nextLink {}", link);
                    response = self
                        .send(
                            Method::GET,
                            Url::parse(&link)?,
                            &options.content_type,
                            None,
                            &options.expected_status_codes,
                        )
                        .await?;
                }
                None => break,
            }
        }
        Ok(items)
    }

    /// Send a request starting a long-running operation and wait for it
    ///
    /// Returns the initial response once the operation reached `Succeeded`.
    pub async fn execute_long_running<B: Serialize + ?Sized>(
        &self,
        options: &RequestOptions,
        body: Option<&B>,
    ) -> Result<Response> {
        let response = self.execute(options, body).await?;
        Poller::new(self, &response, options)?.poll_until_done().await?;
        Ok(response)
    }

    /// GET an absolute URL, as handed out by polling headers
    pub(crate) async fn get_url(&self, url: &str, expected: &[u16]) -> Result<Response> {
        self.send(Method::GET, Url::parse(url)?, DEFAULT_CONTENT_TYPE, None, expected)
            .await
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        content_type: &str,
        body: Option<Vec<u8>>,
        expected: &[u16],
    ) -> Result<Response> {
        let token = self.authorizer.token().await?;
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(token)
            .header(USER_AGENT, &self.user_agent)
            .header(CONTENT_TYPE, content_type);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        log::debug!("{} {} -> {}", method, url, status);

        let headers = response.headers().clone();
        let body = response.text().await?;

        if !expected.contains(&status) {
            let (code, message) = parse_error_body(&body);
            return Err(Error::UnexpectedStatus {
                status,
                method: method.to_string(),
                url: url.to_string(),
                code,
                message,
            });
        }

        Ok(Response {
            status,
            url: url.to_string(),
            headers,
            body,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::StaticTokenAuthorizer;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub(crate) fn test_client(server: &MockServer) -> ArmClient {
        let options = ClientOptions::new(
            Environment::custom(server.uri()),
            Arc::new(StaticTokenAuthorizer::new("test-token")),
        )
        .with_poller(PollerOptions {
            interval: Duration::from_millis(10),
            max_attempts: 5,
        });
        ArmClient::new(&options).unwrap()
    }

    #[tokio::test]
    async fn execute_sends_token_and_api_version() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/subscriptions/sub/resourceGroups/rg"))
            .and(query_param("api-version", "2021-04-01"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(serde_json::json!({"location": "westeurope"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"name": "rg"})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let options = RequestOptions::new(Method::PUT, "/subscriptions/sub/resourceGroups/rg", "2021-04-01")
            .expect(&[200, 201]);
        let response = client
            .execute(&options, Some(&serde_json::json!({"location": "westeurope"})))
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body["name"], "rg");
    }

    #[tokio::test]
    async fn unexpected_status_carries_arm_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": "ResourceGroupNotFound", "message": "Resource group 'rg' could not be found."}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let options = RequestOptions::new(Method::GET, "/subscriptions/sub/resourceGroups/rg", "2021-04-01");
        let err = client.execute(&options, NO_BODY).await.unwrap_err();

        assert!(err.is_not_found());
        match err {
            Error::UnexpectedStatus { code, message, .. } => {
                assert_eq!(code, "ResourceGroupNotFound");
                assert!(message.contains("could not be found"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn execute_paged_follows_next_link() {
        let server = MockServer::start().await;
        let next = format!("{}/subscriptions/sub/things?page=2", server.uri());
        Mock::given(method("GET"))
            .and(path("/subscriptions/sub/things"))
            .and(query_param("api-version", "2023-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"name": "a"}, {"name": "b"}],
                "nextLink": next
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/subscriptions/sub/things"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"name": "c"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let options = RequestOptions::new(Method::GET, "/subscriptions/sub/things", "2023-06-01");
        let items: Vec<serde_json::Value> = client.execute_paged(&options).await.unwrap();

        let names: Vec<_> = items.iter().map(|i| i["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn error_body_fallback() {
        assert_eq!(
            parse_error_body("gateway timeout"),
            (String::new(), "gateway timeout".to_string())
        );
    }
}
