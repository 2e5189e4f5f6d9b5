//! Category editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{CategoryColor, CategoryName, domain::CategoryFormData, get_category, update_category},
    change_notifier::{CATEGORY_STALE_VIEWS, mutation_success},
    database_id::CategoryId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_COLOR_INPUT_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for the edit category page.
#[derive(Debug, Clone)]
pub struct EditCategoryPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for updating a category.
#[derive(Debug, Clone)]
pub struct UpdateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category editing page.
pub async fn get_edit_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let edit_endpoint =
        endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category_id.as_i64());
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CATEGORY, category_id.as_i64());

    match get_category(category_id, &connection) {
        Ok(category) => {
            let form_data = CategoryFormData {
                name: category.name.to_string(),
                color: category.color.to_string(),
                description: category.description,
            };

            Ok(edit_category_view(&edit_endpoint, &update_endpoint, &form_data, "").into_response())
        }
        Err(error) => {
            let error_message = match error {
                Error::NotFound => "Category not found",
                _ => {
                    tracing::error!("Failed to retrieve category {category_id}: {error}");
                    "Failed to load category"
                }
            };

            let form_data = CategoryFormData {
                name: String::new(),
                color: "#6366f1".to_string(),
                description: None,
            };

            Ok(
                edit_category_view(&edit_endpoint, &update_endpoint, &form_data, error_message)
                    .into_response(),
            )
        }
    }
}

/// Handle category update form submission.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<UpdateCategoryEndpointState>,
    Form(form_data): Form<CategoryFormData>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CATEGORY, category_id.as_i64());

    let name = match CategoryName::new(&form_data.name) {
        Ok(name) => name,
        Err(error) => {
            return edit_category_form_view(
                &update_endpoint,
                &form_data,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let color = match CategoryColor::new(&form_data.color) {
        Ok(color) => color,
        Err(error) => {
            return edit_category_form_view(
                &update_endpoint,
                &form_data,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_category(category_id, name, color, form_data.description.clone(), &connection) {
        Ok(_) => mutation_success(endpoints::CATEGORIES_VIEW, CATEGORY_STALE_VIEWS),
        Err(Error::UpdateMissingCategory) => Error::UpdateMissingCategory.into_alert_response(),
        Err(error @ Error::DuplicateCategoryName(_)) => {
            edit_category_form_view(&update_endpoint, &form_data, &format!("Error: {error}"))
                .into_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_category_view(
    edit_endpoint: &str,
    update_endpoint: &str,
    form_data: &CategoryFormData,
    error_message: &str,
) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint).into_html();
    let form = edit_category_form_view(update_endpoint, form_data, error_message);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Category", None, &content)
}

fn edit_category_form_view(
    update_endpoint: &str,
    form_data: &CategoryFormData,
    error_message: &str,
) -> Markup {
    html! {
        form
            hx-put=(update_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    "Category Name"
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Category Name"
                    value=(form_data.name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="color"
                    class=(FORM_LABEL_STYLE)
                {
                    "Display Color"
                }

                input
                    id="color"
                    type="color"
                    name="color"
                    value=(form_data.color)
                    class=(FORM_COLOR_INPUT_STYLE);
            }

            div
            {
                label
                    for="description"
                    class=(FORM_LABEL_STYLE)
                {
                    "Description (optional)"
                }

                input
                    id="description"
                    type="text"
                    name="description"
                    value=[form_data.description.as_ref()]
                    placeholder="What this category covers"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Category" }
        }
    }
}
