use actix_web::HttpResponse;
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use once_cell::sync::Lazy;

use crate::error::AppError;
use crate::pipeline::dispatch::{summarize, IndexEntry};
use crate::pipeline::Exchange;

static INDEX: Lazy<Vec<IndexEntry>> = Lazy::new(|| summarize(&super::endpoints()));

/// `GET /`: every declared path and its methods.
pub fn get_index(_ex: Exchange) -> LocalBoxFuture<'static, Result<HttpResponse, AppError>> {
    async { Ok(HttpResponse::Ok().json(&*INDEX)) }.boxed_local()
}
