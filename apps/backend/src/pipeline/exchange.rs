//! The request-scoped context every pipeline step reads and writes.

use std::collections::HashMap;
use std::fmt;

use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use actix_web::{web, HttpRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::{Game, Rating, User};
use crate::state::AppState;

/// Where a field was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Body,
    Params,
    Query,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Location::Body => "body",
            Location::Params => "params",
            Location::Query => "query",
        })
    }
}

/// One failed field rule or resolution, as reported to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub location: Location,
    pub param: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub msg: String,
}

/// The entity a resolver attached to this request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Resource {
    #[default]
    None,
    User(User),
    Game(Game),
    Rating(Rating),
}

impl From<User> for Resource {
    fn from(user: User) -> Self {
        Resource::User(user)
    }
}

impl From<Game> for Resource {
    fn from(game: Game) -> Self {
        Resource::Game(game)
    }
}

impl From<Rating> for Resource {
    fn from(rating: Rating) -> Self {
        Resource::Rating(rating)
    }
}

pub struct Exchange {
    pub state: web::Data<AppState>,
    pub headers: HeaderMap,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Map<String, Value>,
    /// Set by `Authenticate`.
    pub user: Option<User>,
    pub resource: Resource,
    /// Sanitized values of every field rule that passed, keyed by field name.
    pub validated: Map<String, Value>,
    pub errors: Vec<FieldError>,
}

impl Exchange {
    pub fn new(state: web::Data<AppState>) -> Self {
        Self {
            state,
            headers: HeaderMap::new(),
            params: HashMap::new(),
            query: HashMap::new(),
            body: Map::new(),
            user: None,
            resource: Resource::None,
            validated: Map::new(),
            errors: Vec::new(),
        }
    }

    /// Build the exchange for one request. An empty body is an empty object;
    /// anything else must be a JSON object.
    pub fn from_request(
        state: web::Data<AppState>,
        req: &HttpRequest,
        body: &[u8],
    ) -> Result<Self, AppError> {
        let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
            .map_err(|_| AppError::bad_request(ErrorCode::InvalidQuery, "Invalid query string"))?
            .into_inner();

        let params = req
            .match_info()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let mut ex = Self::new(state);
        ex.headers = req.headers().clone();
        ex.params = params;
        ex.query = query;
        ex.body = parse_body(body)?;
        Ok(ex)
    }

    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.insert(name.to_string(), value.to_string());
        self
    }

    /// Replace the body. Non-object values are ignored.
    pub fn with_body(mut self, body: Value) -> Self {
        if let Value::Object(map) = body {
            self.body = map;
        }
        self
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(HeaderName::from_static(name), value);
        }
        self
    }

    /// The raw client value of a field. Path and query values are always strings.
    pub fn raw(&self, location: Location, name: &str) -> Option<Value> {
        match location {
            Location::Body => self.body.get(name).cloned(),
            Location::Params => self.params.get(name).cloned().map(Value::String),
            Location::Query => self.query.get(name).cloned().map(Value::String),
        }
    }

    pub fn fail(
        &mut self,
        location: Location,
        param: &str,
        value: Option<Value>,
        msg: impl Into<String>,
    ) {
        self.errors.push(FieldError {
            location,
            param: param.to_string(),
            value,
            msg: msg.into(),
        });
    }

    pub fn has_error(&self, location: Location, param: &str) -> bool {
        self.errors
            .iter()
            .any(|e| e.location == location && e.param == param)
    }

    pub fn validated_i64(&self, name: &str) -> Option<i64> {
        self.validated.get(name).and_then(Value::as_i64)
    }

    /// Deserialize the validated fields into a typed input.
    pub fn validated_as<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_value(Value::Object(self.validated.clone()))
            .map_err(|e| AppError::internal(format!("validated data has unexpected shape: {e}")))
    }

    /// The authenticated user; only absent if the endpoint skipped `Authenticate`.
    pub fn current_user(&self) -> Result<&User, AppError> {
        self.user
            .as_ref()
            .ok_or_else(|| AppError::internal("no authenticated user on exchange"))
    }

    pub fn game(&self) -> Result<&Game, AppError> {
        match &self.resource {
            Resource::Game(game) => Ok(game),
            _ => Err(AppError::internal("no resolved game on exchange")),
        }
    }

    pub fn resolved_user(&self) -> Result<&User, AppError> {
        match &self.resource {
            Resource::User(user) => Ok(user),
            _ => Err(AppError::internal("no resolved user on exchange")),
        }
    }
}

fn parse_body(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::bad_request(
            ErrorCode::InvalidJson,
            "Request body must be a JSON object",
        )),
        Err(e) => {
            debug!(error = %e, body_size = body.len(), "JSON parsing failed");
            Err(AppError::bad_request(
                ErrorCode::InvalidJson,
                classify_json_error(&e),
            ))
        }
    }
}

/// Classify serde_json::Error and return a sanitized error message
fn classify_json_error(error: &serde_json::Error) -> String {
    use serde_json::error::Category;

    match error.classify() {
        Category::Syntax => format!("Invalid JSON at line {}", error.line()),
        Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        Category::Data => "Invalid JSON: wrong types for one or more fields".to_string(),
        Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}
