//! Income and expense transactions, optionally assigned to a category.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{create_transaction_endpoint, get_new_transaction_page};
pub use db::{
    TransactionWithCategory, create_transaction, create_transaction_table, delete_transaction,
    get_all_transactions, get_transaction, update_transaction,
};
pub use delete::delete_transaction_endpoint;
pub use domain::{Transaction, TransactionBuilder, TransactionDescription};
pub use edit::{get_edit_transaction_page, update_transaction_endpoint};
pub use list::get_transactions_page;
