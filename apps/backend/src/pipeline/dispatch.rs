//! Endpoint descriptors and the dispatcher that binds them to actix.
//!
//! Each (path, method) pair owns an ordered chain: authentication steps,
//! validation steps, the aggregated check, then exactly one handler. The
//! table is built once at startup; a request only ever walks its own chain.

use std::sync::Arc;

use actix_web::http::Method as HttpMethod;
use actix_web::{web, HttpRequest, HttpResponse};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use serde::Serialize;

use super::check::check_validation;
use super::exchange::Exchange;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::AppState;

/// One link of a descriptor chain. Returning `Err` ends the request.
#[async_trait(?Send)]
pub trait Step: Send + Sync {
    async fn run(&self, ex: &mut Exchange) -> Result<(), AppError>;
}

pub type Handler = fn(Exchange) -> LocalBoxFuture<'static, Result<HttpResponse, AppError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_http(self) -> HttpMethod {
        match self {
            Method::Get => HttpMethod::GET,
            Method::Post => HttpMethod::POST,
            Method::Patch => HttpMethod::PATCH,
            Method::Delete => HttpMethod::DELETE,
        }
    }
}

pub struct MethodDescriptor {
    pub method: Method,
    pub authentication: Vec<Box<dyn Step>>,
    pub validation: Vec<Box<dyn Step>>,
    pub handler: Handler,
}

impl MethodDescriptor {
    pub fn new(method: Method, handler: Handler) -> Self {
        Self {
            method,
            authentication: Vec::new(),
            validation: Vec::new(),
            handler,
        }
    }

    pub fn authenticate(mut self, step: impl Step + 'static) -> Self {
        self.authentication.push(Box::new(step));
        self
    }

    pub fn validate(mut self, step: impl Step + 'static) -> Self {
        self.validation.push(Box::new(step));
        self
    }

    pub fn validate_each<S: Step + 'static>(mut self, steps: impl IntoIterator<Item = S>) -> Self {
        for step in steps {
            self.validation.push(Box::new(step));
        }
        self
    }

    /// Walk the chain for one request.
    pub async fn execute(&self, mut ex: Exchange) -> Result<HttpResponse, AppError> {
        for step in &self.authentication {
            step.run(&mut ex).await?;
        }
        for step in &self.validation {
            step.run(&mut ex).await?;
        }
        check_validation(&mut ex)?;
        (self.handler)(ex).await
    }
}

pub struct Endpoint {
    /// actix path pattern, e.g. `/games/{id}`
    pub href: &'static str,
    pub methods: Vec<MethodDescriptor>,
}

impl Endpoint {
    pub fn new(href: &'static str) -> Self {
        Self {
            href,
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, descriptor: MethodDescriptor) -> Self {
        self.methods.push(descriptor);
        self
    }
}

/// Public summary of one endpoint, as listed by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub href: &'static str,
    pub methods: Vec<Method>,
}

pub fn summarize(table: &[Endpoint]) -> Vec<IndexEntry> {
    table
        .iter()
        .map(|endpoint| IndexEntry {
            href: endpoint.href,
            methods: endpoint.methods.iter().map(|m| m.method).collect(),
        })
        .collect()
}

/// Register every (href, method) of `table` on `cfg`, plus the JSON 404
/// for unknown paths. Undeclared methods on a known path get actix's 405.
pub fn bind(cfg: &mut web::ServiceConfig, table: Vec<Endpoint>) {
    for endpoint in table {
        let mut resource = web::resource(endpoint.href);
        for descriptor in endpoint.methods {
            let method = descriptor.method.as_http();
            let descriptor = Arc::new(descriptor);
            resource = resource.route(web::method(method).to(
                move |req: HttpRequest, body: web::Bytes, state: web::Data<AppState>| {
                    let descriptor = Arc::clone(&descriptor);
                    async move {
                        let ex = Exchange::from_request(state, &req, &body)?;
                        descriptor.execute(ex).await
                    }
                },
            ));
        }
        cfg.service(resource);
    }
    cfg.default_service(web::to(route_not_found));
}

async fn route_not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::not_found(ErrorCode::RouteNotFound, "Not found"))
}
