//! Console line per request: time, duration, body size, status, method, path.

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;

use crate::shared::format::format_thousands;

/// Only API responses are buffered to measure their size; static files
/// (the wasm bundle included) stream through untouched.
pub fn measures_body(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/") || path == "/health"
}

/// Size column for a response that was not buffered
fn declared_size(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(format_thousands)
        .unwrap_or_else(|| "-".to_string())
}

fn print_line(color_code: &str, millis: u128, size: &str, status: u16, method: &str, path: &str) {
    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        color_code,
        Local::now().format("%H:%M:%S"),
        millis,
        size,
        status,
        method,
        path
    );
}

// Голубой для 200, коричневый для остальных
fn status_color(status: u16) -> &'static str {
    if status == 200 {
        "36"
    } else {
        "33"
    }
}

/// Middleware для логирования запросов
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let status = response.status().as_u16();

    if !measures_body(&path) {
        let size = declared_size(response.headers());
        print_line(
            status_color(status),
            start.elapsed().as_millis(),
            &size,
            status,
            method.as_str(),
            &path,
        );
        return response;
    }

    let (parts, body) = response.into_parts();

    // Читаем тело ответа, чтобы узнать реальный размер
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(_) => {
            print_line("33", start.elapsed().as_millis(), "error", status, method.as_str(), &path);
            return Response::from_parts(parts, Body::default());
        }
    };

    print_line(
        status_color(status),
        start.elapsed().as_millis(),
        &format_thousands(bytes.len() as u64),
        status,
        method.as_str(),
        &path,
    );

    Response::from_parts(parts, Body::from(bytes))
}
