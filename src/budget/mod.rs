//! Monthly spending budgets, at most one per category.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{create_budget_endpoint, get_new_budget_page};
pub use db::{
    BudgetWithCategory, create_budget, create_budget_table, delete_budget, get_all_budgets,
    get_budget, get_budget_by_category, update_budget,
};
pub use delete::delete_budget_endpoint;
pub use domain::{Budget, BudgetAmount};
pub use edit::{get_edit_budget_page, update_budget_endpoint};
pub use list::get_budgets_page;
