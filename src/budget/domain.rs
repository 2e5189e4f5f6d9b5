//! Domain types for budgets.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{BudgetId, CategoryId},
};

/// A strictly positive monthly budget amount.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetAmount(f64);

impl BudgetAmount {
    /// Create a budget amount.
    ///
    /// # Errors
    /// Returns [Error::NonPositiveAmount] if `amount` is zero or negative.
    pub fn new(amount: f64) -> Result<Self, Error> {
        if amount > 0.0 {
            Ok(Self(amount))
        } else {
            Err(Error::NonPositiveAmount(amount))
        }
    }

    /// Create a budget amount without validation.
    ///
    /// Intended for values loaded from the database, which were validated on
    /// the way in.
    pub fn new_unchecked(amount: f64) -> Self {
        Self(amount)
    }

    /// The amount as a float.
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl Display for BudgetAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A monthly spending limit for a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The budget's ID.
    pub id: BudgetId,
    /// The category this budget limits. Unique across all budgets.
    pub category_id: CategoryId,
    /// The monthly limit.
    pub amount: BudgetAmount,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// When the budget was created.
    pub created_at: OffsetDateTime,
    /// When the budget was last updated, if ever.
    pub updated_at: Option<OffsetDateTime>,
}

/// The data submitted by the budget create and edit forms.
#[derive(Debug, Serialize, Deserialize)]
pub struct BudgetFormData {
    /// The category the budget applies to.
    pub category_id: CategoryId,
    /// The monthly limit. Validated into a [BudgetAmount] by the endpoint.
    pub amount: f64,
    /// Optional free-text notes. An empty field parses as `None`.
    pub notes: Option<String>,
}
