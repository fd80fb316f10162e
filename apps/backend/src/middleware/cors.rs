use actix_cors::Cors;
use actix_web::http::header;

/// Keep only well-formed http(s) origins; drop empty and `null` entries.
fn valid_origins(configured: &[String]) -> Vec<String> {
    configured
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(String::from)
        .collect()
}

/// Build CORS middleware for the configured origins (`CORS_ALLOWED_ORIGINS`).
/// With nothing valid configured, only local frontends are allowed.
pub fn cors_middleware(configured: &[String]) -> Cors {
    let mut origins = valid_origins(configured);
    if origins.is_empty() {
        origins = vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ];
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-trace-id")])
        .max_age(3600);

    for origin in &origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
