use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use super::MetricsRegistry;

/// Records request count and latency per route template.
pub async fn metrics_middleware(
    State(metrics): State<Arc<MetricsRegistry>>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| normalize_path(req.uri().path()));

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    metrics
        .http_requests_total
        .with_label_values(&[&method, &endpoint, &status])
        .inc();
    metrics
        .http_request_duration_seconds
        .with_label_values(&[&method, &endpoint])
        .observe(start.elapsed().as_secs_f64());

    response
}

/// Normalize path to reduce cardinality
/// Converts /api/seminars/<uuid> -> /api/seminars/:id
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let mut normalized = Vec::new();
    
    for segment in segments {
        if segment.is_empty() {
            continue;
        }
        
        // Check if segment looks like an ID (UUID, number, hash)
        if is_id_like(segment) {
            normalized.push(":id");
        } else {
            normalized.push(segment);
        }
    }
    
    format!("/{}", normalized.join("/"))
}

/// Check if a segment looks like an ID
fn is_id_like(segment: &str) -> bool {
    // UUID pattern
    if segment.len() == 36 && segment.chars().filter(|c| *c == '-').count() == 4 {
        return true;
    }
    
    // All digits (numeric ID)
    if segment.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    
    // Blog slugs carry hyphens; anything long with digits is treated as an id
    segment.len() > 24 && segment.chars().any(|c| c.is_ascii_digit())
}
