use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect as RedirectResponse, Response};
use serde::Serialize;
use serde_json::json;

use storefront_catalog::{Redirect, RedirectKind};
use storefront_client::PageOutcome;

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "not found")
}

/// 308 for permanent redirects, 307 otherwise.
pub fn redirect(redirect: &Redirect) -> Response {
    match redirect.kind {
        RedirectKind::Permanent => RedirectResponse::permanent(&redirect.location).into_response(),
        RedirectKind::Temporary => RedirectResponse::temporary(&redirect.location).into_response(),
    }
}

pub fn page_response<T: Serialize>(outcome: PageOutcome<T>) -> Response {
    match outcome {
        PageOutcome::Render(page) => axum::Json(page).into_response(),
        PageOutcome::Redirect(r) => redirect(&r),
        PageOutcome::NotFound => not_found(),
    }
}
