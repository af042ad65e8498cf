//! API utilities for frontend-backend communication

/// Port the backend listens on when the page is served by a dev server
const BACKEND_PORT: &str = "3000";

/// Get the base URL for API requests
///
/// Same origin when the page is served by the backend itself,
/// otherwise the current host on the backend port.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let port = location.port().unwrap_or_default();
    if port == BACKEND_PORT {
        return String::new();
    }
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}", protocol, hostname, BACKEND_PORT)
}

/// Build a full API URL from a path starting with "/api/"
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}
