//! Category deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::db::{count_transactions_with_category, delete_category},
    change_notifier::{CATEGORY_STALE_VIEWS, mutation_success},
    database_id::CategoryId,
    endpoints,
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for deleting a category.
#[derive(Debug, Deserialize)]
pub struct DeleteCategoryFormData {
    /// The ID of the category to delete.
    pub id: CategoryId,
}

/// Handle category deletion.
///
/// Deletion is refused while any transaction still references the category.
pub async fn delete_category_endpoint(
    State(state): State<DeleteCategoryEndpointState>,
    Form(form_data): Form<DeleteCategoryFormData>,
) -> Response {
    let category_id = form_data.id;

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match count_transactions_with_category(category_id, &connection) {
        Ok(0) => {}
        Ok(_) => return Error::CategoryInUse.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while checking category {category_id} usage: {error}"
            );
            return error.into_alert_response();
        }
    }

    match delete_category(category_id, &connection) {
        Ok(_) => mutation_success(endpoints::CATEGORIES_VIEW, CATEGORY_STALE_VIEWS),
        Err(Error::DeleteMissingCategory) => Error::DeleteMissingCategory.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;
    use scraper::Html;

    use crate::{
        Error,
        category::{
            CategoryColor, CategoryName, create_category, delete_category_endpoint, get_category,
        },
        database_id::CategoryId,
        endpoints, initialize_db,
        test_utils::{assert_hx_redirect, assert_valid_html, parse_html_fragment},
        transaction::{TransactionBuilder, TransactionDescription, create_transaction},
    };

    use super::{DeleteCategoryEndpointState, DeleteCategoryFormData};

    fn get_delete_category_state() -> DeleteCategoryEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialize database");

        DeleteCategoryEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn test_category(state: &DeleteCategoryEndpointState) -> crate::category::Category {
        create_category(
            CategoryName::new_unchecked("Test Category"),
            CategoryColor::new_unchecked("#00ff00"),
            None,
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test category")
    }

    #[tokio::test]
    async fn delete_category_endpoint_succeeds() {
        let state = get_delete_category_state();
        let category = test_category(&state);
        let form = DeleteCategoryFormData { id: category.id };

        let response = delete_category_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);
        assert_eq!(
            get_category(category.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn delete_category_endpoint_refuses_category_in_use() {
        let state = get_delete_category_state();
        let category = test_category(&state);
        create_transaction(
            TransactionBuilder {
                description: TransactionDescription::new_unchecked("weekly shop"),
                amount: -42.0,
                date: time::OffsetDateTime::now_utc().date(),
                category_id: Some(category.id),
                notes: None,
            },
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test transaction");

        let form = DeleteCategoryFormData { id: category.id };

        let response = delete_category_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert_error_content(
            &html,
            "Cannot delete a category with associated transactions. \
            Please reassign or delete those transactions first.",
        );

        // The category must survive the refused delete.
        assert!(get_category(category.id, &state.db_connection.lock().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn delete_category_endpoint_with_invalid_id_returns_error_html() {
        let state = get_delete_category_state();
        let form = DeleteCategoryFormData {
            id: CategoryId::new(999999),
        };

        let response = delete_category_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
    }

    #[track_caller]
    fn assert_error_content(html: &Html, want_error_message: &str) {
        let p = scraper::Selector::parse("p").unwrap();
        let found = html.select(&p).any(|element| {
            element.text().collect::<Vec<_>>().join("").trim() == want_error_message
        });

        assert!(
            found,
            "no <p> with the text {want_error_message:?} found in {}",
            html.html()
        );
    }
}
