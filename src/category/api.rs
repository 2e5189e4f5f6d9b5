//! JSON category list endpoint used by client-side pickers.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{AppState, Error, category::get_all_categories, database_id::CategoryId};

/// The state needed for the category list API.
#[derive(Debug, Clone)]
pub struct CategoriesApiState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON shape of a category record.
#[derive(Debug, Serialize)]
pub struct CategoryRecord {
    /// The category's ID.
    pub id: CategoryId,
    /// The category's display name.
    pub name: String,
    /// The category's display color as a hex string.
    pub color: String,
    /// An optional free-text description.
    pub description: Option<String>,
}

/// Return all categories as JSON, sorted by name.
pub async fn get_categories_api(State(state): State<CategoriesApiState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let records = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?
        .into_iter()
        .map(|category| CategoryRecord {
            id: category.id,
            name: category.name.to_string(),
            color: category.color.to_string(),
            description: category.description,
        })
        .collect::<Vec<_>>();

    Ok(Json(records).into_response())
}

#[cfg(test)]
mod categories_api_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;

    use crate::{
        category::{CategoryColor, CategoryName, create_category},
        initialize_db,
        test_utils::assert_content_type,
    };

    use super::{CategoriesApiState, get_categories_api};

    fn get_categories_api_state() -> CategoriesApiState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialize database");

        CategoriesApiState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn returns_categories_as_json() {
        let state = get_categories_api_state();
        create_category(
            CategoryName::new_unchecked("Groceries"),
            CategoryColor::new_unchecked("#00ff00"),
            Some("Weekly shop".to_string()),
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test category");

        let response = get_categories_api(State(state))
            .await
            .expect("Could not get categories API response");

        assert_content_type(&response, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let records: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(records[0]["name"], "Groceries");
        assert_eq!(records[0]["color"], "#00ff00");
        assert_eq!(records[0]["description"], "Weekly shop");
        assert_eq!(records[0]["id"], 1);
    }

    #[tokio::test]
    async fn returns_empty_array_when_no_categories() {
        let state = get_categories_api_state();

        let response = get_categories_api(State(state))
            .await
            .expect("Could not get categories API response");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let records: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(records, serde_json::json!([]));
    }
}
