use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Ensures each request has an X-Request-Id and mirrors it on the response.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static(REQUEST_ID_HEADER);

    // Preserve a well-formed incoming id, otherwise generate one
    let req_id_value = req
        .headers()
        .get(&header_name)
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(new_request_id);

    // Downstream spans read the id from the extensions
    req.extensions_mut().insert(req_id_value.clone());

    let mut res = next.run(req).await;
    res.headers_mut().insert(header_name, req_id_value);
    res
}

fn new_request_id() -> HeaderValue {
    // A hyphenated UUID is always a valid header value
    HeaderValue::from_str(&Uuid::new_v4().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}
