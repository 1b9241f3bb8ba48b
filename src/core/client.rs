//! REST client for the shop API
//!
//! Every call builds `${api_url}${path}`, sends and receives JSON, and attaches
//! `Authorization: Bearer <token>` when the [`Session`] carries a token. A
//! non-2xx response becomes [`ApiError::Http`] embedding the path, status code
//! and response body text. There is no retry and no cancellation.
//!
//! The wire is behind the [`Transport`] trait; [`HttpTransport`] is the
//! reqwest-backed implementation used by the CLI.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::core::config::{Config, ConfigError};
use crate::core::session::Session;
use crate::entities::{
    MechanicId, NewNote, NewUnit, NewWorkOrder, Note, Part, PartAttachment, PartId, Summary,
    SummaryPayload, TimelineEvent, Unit, Mechanic, WorkOrder, WorkOrderId,
};

/// Errors surfaced by API calls
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Fetch {path} failed: {status} {body}")]
    Http {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Fetch {path} failed: {message}")]
    Network { path: String, message: String },

    #[error("Unexpected response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// HTTP status code, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A fully-built request handed to a [`Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, including any query string
    pub path: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response as read off the wire
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Some("text/plain".to_string()),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure below HTTP: connection refused, DNS, timeout
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Sends a request and returns the raw response
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// reqwest-backed blocking transport
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ApiError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        // A body that cannot be read is treated as empty, matching `res.text().catch(() => "")`
        let body = response.text().unwrap_or_default();

        Ok(ApiResponse {
            status,
            content_type,
            body,
        })
    }
}

#[derive(Serialize)]
struct MechanicBody {
    mechanic_id: MechanicId,
}

#[derive(Serialize)]
struct StartBody {
    mechanic_id: MechanicId,
    #[serde(skip_serializing_if = "Option::is_none")]
    odometer: Option<u64>,
}

#[derive(Serialize)]
struct PauseBody<'a> {
    mechanic_id: MechanicId,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// Client for the shop API
pub struct ApiClient<T: Transport = HttpTransport> {
    base_url: String,
    session: Session,
    transport: T,
}

impl ApiClient<HttpTransport> {
    /// Build a client from configuration and an explicit session
    pub fn from_config(config: &Config, session: Session) -> Result<Self, ApiError> {
        let base_url = config.api_url()?;
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::new(base_url, session, transport))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, session: Session, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            session,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue a request and decode the body as JSON (text bodies become strings)
    pub fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if let Some(auth) = self.session.authorization() {
            headers.push(("Authorization".to_string(), auth));
        }

        let request = ApiRequest {
            method,
            path: path.to_string(),
            url: format!("{}{}", self.base_url, path),
            headers,
            body,
        };

        tracing::debug!(method = %method, path, "api request");
        let response = self.transport.send(&request).map_err(|e| {
            tracing::error!(method = %method, path, error = %e, "api request failed");
            ApiError::Network {
                path: path.to_string(),
                message: e.to_string(),
            }
        })?;

        if !response.is_success() {
            tracing::error!(
                method = %method,
                path,
                status = response.status,
                body = %response.body,
                "api error"
            );
            return Err(ApiError::Http {
                path: path.to_string(),
                status: response.status,
                body: response.body,
            });
        }
        tracing::debug!(method = %method, path, status = response.status, "api response");

        decode_body(path, &response)
    }

    pub fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let value = self.request(Method::Get, path, None)?;
        from_value(path, value)
    }

    pub fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let value = self.request(Method::Post, path, Some(body))?;
        from_value(path, value)
    }

    // Units & mechanics

    pub fn units(&self) -> Result<Vec<Unit>, ApiError> {
        self.get("/units")
    }

    pub fn create_unit(&self, unit: &NewUnit) -> Result<Value, ApiError> {
        self.post("/units", unit)
    }

    pub fn mechanics(&self) -> Result<Vec<Mechanic>, ApiError> {
        self.get("/mechanics")
    }

    // Work orders

    pub fn work_orders(&self) -> Result<Vec<WorkOrder>, ApiError> {
        self.get("/work-orders")
    }

    pub fn create_work_order(&self, work_order: &NewWorkOrder) -> Result<Value, ApiError> {
        self.post("/work-orders", work_order)
    }

    // Notes

    pub fn notes(&self, wo: WorkOrderId) -> Result<Vec<Note>, ApiError> {
        self.get(&format!("/work-orders/{}/notes", wo))
    }

    pub fn add_note(&self, wo: WorkOrderId, author: &str, text: &str) -> Result<Value, ApiError> {
        let note = NewNote {
            author: author.to_string(),
            text: text.to_string(),
        };
        self.post(&format!("/work-orders/{}/notes", wo), &note)
    }

    // Parts

    pub fn search_parts(&self, query: &str) -> Result<Vec<Part>, ApiError> {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.get(&format!("/parts/search?q={}", encoded))
    }

    pub fn attach_part(&self, wo: WorkOrderId, part_id: PartId, qty: u32) -> Result<Value, ApiError> {
        self.post(
            &format!("/work-orders/{}/parts", wo),
            &PartAttachment { part_id, qty },
        )
    }

    // Summary & timeline

    pub fn summary(&self, wo: WorkOrderId) -> Result<Summary, ApiError> {
        let payload: SummaryPayload = self.get(&format!("/work-orders/{}/summary", wo))?;
        Ok(payload.for_work_order(wo))
    }

    pub fn timeline(&self, wo: WorkOrderId) -> Result<Vec<TimelineEvent>, ApiError> {
        self.get(&format!("/work-orders/{}/timeline", wo))
    }

    // Assignment & lifecycle

    pub fn assign(&self, wo: WorkOrderId, mechanic_id: MechanicId) -> Result<Value, ApiError> {
        self.post(&format!("/work-orders/{}/assign", wo), &MechanicBody { mechanic_id })
    }

    pub fn start(
        &self,
        wo: WorkOrderId,
        mechanic_id: MechanicId,
        odometer: Option<u64>,
    ) -> Result<Value, ApiError> {
        self.post(
            &format!("/work-orders/{}/start", wo),
            &StartBody {
                mechanic_id,
                odometer,
            },
        )
    }

    pub fn pause(
        &self,
        wo: WorkOrderId,
        mechanic_id: MechanicId,
        reason: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.post(
            &format!("/work-orders/{}/pause", wo),
            &PauseBody {
                mechanic_id,
                reason,
            },
        )
    }

    pub fn resume(&self, wo: WorkOrderId, mechanic_id: MechanicId) -> Result<Value, ApiError> {
        self.post(&format!("/work-orders/{}/resume", wo), &MechanicBody { mechanic_id })
    }

    pub fn complete(&self, wo: WorkOrderId, mechanic_id: MechanicId) -> Result<Value, ApiError> {
        self.post(&format!("/work-orders/{}/complete", wo), &MechanicBody { mechanic_id })
    }
}

fn decode_body(path: &str, response: &ApiResponse) -> Result<Value, ApiError> {
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    let is_json = response
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.contains("application/json"));
    if is_json {
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    } else {
        Ok(Value::String(response.body.clone()))
    }
}

fn from_value<R: DeserializeOwned>(path: &str, value: Value) -> Result<R, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// In-memory transport for exercising the client without a network
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};

    /// Replays canned responses per (method, path) and records every request.
    /// The last queued response for a route repeats; unknown routes answer 404.
    #[derive(Default)]
    pub struct FakeTransport {
        routes: RefCell<HashMap<(Method, String), VecDeque<ApiResponse>>>,
        requests: RefCell<Vec<ApiRequest>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, method: Method, path: &str, response: ApiResponse) -> &Self {
            self.routes
                .borrow_mut()
                .entry((method, path.to_string()))
                .or_default()
                .push_back(response);
            self
        }

        pub fn json(&self, method: Method, path: &str, body: Value) -> &Self {
            self.respond(method, path, ApiResponse::json(200, body))
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.borrow().clone()
        }

        pub fn count(&self, method: Method, path: &str) -> usize {
            self.requests
                .borrow()
                .iter()
                .filter(|r| r.method == method && r.path == path)
                .count()
        }

        pub fn total(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Transport for FakeTransport {
        fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
            self.requests.borrow_mut().push(request.clone());
            let mut routes = self.routes.borrow_mut();
            let Some(queue) = routes.get_mut(&(request.method, request.path.clone())) else {
                return Ok(ApiResponse::text(404, "not found"));
            };
            let response = if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            };
            response.ok_or_else(|| TransportError("connection refused".to_string()))
        }
    }

    /// Client over a fresh fake transport at `http://shop.test`
    pub fn fake_client() -> ApiClient<FakeTransport> {
        ApiClient::new("http://shop.test/", Session::anonymous(), FakeTransport::new())
    }
}
