//! Alert fragments for surfacing mutation failures to the client.
//!
//! Mutation endpoints respond to htmx requests, so failure responses are small
//! HTML fragments swapped into the `#alert-container` element of the page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

const ALERT_CONTAINER_STYLE: &str = "p-4 text-sm rounded border \
    text-red-800 bg-red-50 border-red-300 \
    dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

/// Renders an error alert for htmx swaps.
pub struct AlertTemplate;

impl AlertTemplate {
    /// Render an error alert with a `title` and a `details` line.
    pub fn error(status_code: StatusCode, title: &str, details: &str) -> Response {
        (status_code, error_alert_view(title, details)).into_response()
    }
}

fn error_alert_view(title: &str, details: &str) -> Markup {
    html! {
        div class=(ALERT_CONTAINER_STYLE) role="alert"
        {
            p class="font-medium" { (title) }

            @if !details.is_empty() {
                p { (details) }
            }
        }
    }
}

#[cfg(test)]
mod alert_tests {
    use axum::http::StatusCode;

    use crate::test_utils::{assert_valid_html, parse_html_fragment};

    use super::AlertTemplate;

    #[tokio::test]
    async fn renders_title_and_details() {
        let response = AlertTemplate::error(
            StatusCode::BAD_REQUEST,
            "Could not save budget",
            "A budget for this category already exists",
        );

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Could not save budget"));
        assert!(text.contains("A budget for this category already exists"));
    }
}
