use std::fmt;
use std::sync::Arc;

use reqwest::{header, Client, Response, StatusCode};
use serde_json::{Map, Value};
use tracing::{instrument, warn};
use url::Url;

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::error::{Error, Result, ServiceError};
use crate::models::records::{RecordOptions, RecordsQuery};

/// Warning emitted when a mutating request is suppressed by configuration.
pub const PUSH_DISABLED_WARNING: &str =
    "SNClient.enable_push_changes is set to False. [POST, PUT, DELETE] requests will not be executed.";

/// The closed set of request types the client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Map case-insensitive verb text onto a supported method. Anything else
    /// fails with [`Error::InvalidVerb`].
    pub fn parse(verb: &str) -> Result<Self> {
        match verb.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => Err(Error::invalid_verb(verb)),
        }
    }

    fn is_mutating(self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Receives the warning produced when a mutating request is suppressed.
///
/// The default observer forwards to `tracing::warn!`; tests inject their own
/// to assert on the side effect without a global subscriber.
pub trait PushObserver: Send + Sync + fmt::Debug {
    fn on_push_suppressed(&self, message: &str);
}

#[derive(Debug, Default)]
pub struct TracingPushObserver;

impl PushObserver for TracingPushObserver {
    fn on_push_suppressed(&self, message: &str) {
        warn!("{message}");
    }
}

#[derive(Debug, Clone)]
pub struct SNClient {
    client: Client,
    config: ClientConfig,
    push_observer: Arc<dyn PushObserver>,
}

impl SNClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        // default headers sent on every request, GET included
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            config,
            push_observer: Arc::new(TracingPushObserver),
        })
    }

    pub fn builder(
        instance: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> SNClientBuilder {
        SNClientBuilder::new(instance, username, password)
    }

    /// Whether POST/PUT/DELETE requests are currently transmitted.
    pub fn push_changes(&self) -> bool {
        self.config.push_changes
    }

    /// Toggle transmission of mutating requests. GET is unaffected.
    pub fn set_push_changes(&mut self, enabled: bool) {
        self.config.push_changes = enabled;
    }

    /// Root of the Table API namespace for this instance.
    pub fn table_api_url(&self) -> Result<Url> {
        Ok(self.config.instance_url.join("api/now/table/")?)
    }

    /// Issue a request with a caller-supplied verb against an absolute URL.
    ///
    /// The verb is matched case-insensitively against GET/POST/PUT/DELETE; any
    /// other text fails before the network is touched. An omitted body is
    /// transmitted as the literal JSON text `{}`.
    #[instrument(skip(self, data))]
    pub async fn execute(
        &self,
        verb: &str,
        url: &str,
        data: Option<Map<String, Value>>,
    ) -> Result<Value> {
        let method = Method::parse(verb)?;
        let url = Url::parse(url)?;
        self.request(method, url, data.unwrap_or_default()).await
    }

    /// Retrieve records from a table.
    #[instrument(skip(self))]
    pub async fn get_table_records(&self, table: &str, query: &RecordsQuery) -> Result<Value> {
        let url = self
            .table_api_url()?
            .join(&format!("{table}?{}", query.to_query_string()))?;
        self.request(Method::Get, url, Map::new()).await
    }

    /// Retrieve a single record by sys_id.
    #[instrument(skip(self))]
    pub async fn get_table_record(
        &self,
        table: &str,
        sys_id: &str,
        options: &RecordOptions,
    ) -> Result<Value> {
        let url = self
            .table_api_url()?
            .join(&format!("{table}/{sys_id}?{}", options.to_query_string()))?;
        self.request(Method::Get, url, Map::new()).await
    }

    /// Create a new record in a table.
    #[instrument(skip(self, data))]
    pub async fn post_table_record(
        &self,
        table: &str,
        data: Map<String, Value>,
        options: &RecordOptions,
    ) -> Result<Value> {
        let url = self
            .table_api_url()?
            .join(&format!("{table}?{}", options.to_query_string()))?;
        self.request(Method::Post, url, data).await
    }

    /// Update an existing record by sys_id.
    #[instrument(skip(self, data))]
    pub async fn put_table_record(
        &self,
        table: &str,
        sys_id: &str,
        data: Map<String, Value>,
        options: &RecordOptions,
    ) -> Result<Value> {
        let url = self
            .table_api_url()?
            .join(&format!("{table}/{sys_id}?{}", options.to_query_string()))?;
        self.request(Method::Put, url, data).await
    }

    /// Escape hatch for endpoints under the `api/now/` namespace that have no
    /// dedicated helper.
    #[instrument(skip(self, data))]
    pub async fn call_api_now(
        &self,
        verb: &str,
        path: &str,
        data: Option<Map<String, Value>>,
    ) -> Result<Value> {
        let method = Method::parse(verb)?;
        let url = self.config.instance_url.join(&format!("api/now/{path}"))?;
        self.request(method, url, data.unwrap_or_default()).await
    }

    /// Single chokepoint for all verbs: gate, send, classify.
    async fn request(&self, method: Method, url: Url, data: Map<String, Value>) -> Result<Value> {
        if method.is_mutating() && !self.config.push_changes {
            self.push_observer.on_push_suppressed(PUSH_DISABLED_WARNING);
            return Ok(Value::Object(Map::new()));
        }

        let body = serde_json::to_string(&data)?;
        let response = self
            .client
            .request(method.into(), url.clone())
            .basic_auth(&self.config.username, Some(&self.config.password))
            .body(body)
            .send()
            .await?;

        self.classify_response(method, &url, response).await
    }

    /// 202 outranks ordinary status handling: the instance accepted the call
    /// but has nothing to return.
    async fn classify_response(
        &self,
        method: Method,
        url: &Url,
        response: Response,
    ) -> Result<Value> {
        if response.status() == StatusCode::ACCEPTED {
            return Err(Error::EmptyContent(ServiceError::new(
                "No content returned",
                "ServiceNow",
                format!("Unexpected empty content in response for {method} request: {url}"),
            )));
        }

        if !response.status().is_success() {
            let source = response.error_for_status_ref().err();
            // a body that is not JSON, or carries neither envelope key,
            // degrades to an all-sentinel error
            let payload = response.json::<Value>().await.unwrap_or(Value::Null);
            let error = if payload.get("error").is_some() {
                ServiceError::from_envelope(&payload)
            } else if let Some(result) = payload.get("result") {
                ServiceError::from_fields(result)
            } else {
                ServiceError::default()
            };
            return Err(Error::Api { error, source });
        }

        let text = response.text().await?;
        let payload: Value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };
        Ok(payload
            .get("result")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new())))
    }
}

pub struct SNClientBuilder {
    config_builder: ClientConfigBuilder,
    push_observer: Option<Arc<dyn PushObserver>>,
}

impl SNClientBuilder {
    pub fn new(
        instance: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            config_builder: ClientConfig::build(instance, username, password),
            push_observer: None,
        }
    }

    pub fn with_push_changes(mut self, enabled: bool) -> Self {
        self.config_builder = self.config_builder.with_push_changes(enabled);
        self
    }

    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.with_timeout(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.with_connect_timeout(timeout);
        self
    }

    pub fn with_push_observer(mut self, observer: Arc<dyn PushObserver>) -> Self {
        self.push_observer = Some(observer);
        self
    }

    pub fn build(self) -> Result<SNClient> {
        let config = self.config_builder.build()?;
        let mut client = SNClient::new(config)?;
        if let Some(observer) = self.push_observer {
            client.push_observer = observer;
        }
        Ok(client)
    }
}
