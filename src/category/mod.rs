//! Spending categories that transactions and budgets are assigned to.

mod api;
mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use api::get_categories_api;
pub use create::{create_category_endpoint, get_new_category_page};
pub use db::{
    count_transactions_with_category, create_category, create_category_table, delete_category,
    get_all_categories, get_category, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryColor, CategoryName};
pub use edit::{get_edit_category_page, update_category_endpoint};
pub use list::get_categories_page;
