//! Defines the route handler for the 404 Not Found page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// Render the 404 Not Found page.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// Get the response for the 404 Not Found page.
pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        error_view(
            "Not Found",
            "404",
            "Sorry, this page does not exist.",
            "Check the address for typos or head back home.",
        ),
    )
        .into_response()
}
