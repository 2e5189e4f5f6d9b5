//! Domain types for transactions.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    database_id::{CategoryId, TransactionId},
};

/// A transaction description of at least two characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDescription(String);

impl TransactionDescription {
    /// Create a transaction description.
    ///
    /// Leading and trailing whitespace is trimmed before validation.
    ///
    /// # Errors
    /// Returns [Error::DescriptionTooShort] if the trimmed description is
    /// shorter than two characters.
    pub fn new(description: &str) -> Result<Self, Error> {
        let description = description.trim();

        if description.chars().count() < 2 {
            Err(Error::DescriptionTooShort)
        } else {
            Ok(Self(description.to_string()))
        }
    }

    /// Create a transaction description without validation.
    ///
    /// Intended for values loaded from the database, which were validated on
    /// the way in.
    pub fn new_unchecked(description: &str) -> Self {
        Self(description.to_string())
    }
}

impl AsRef<str> for TransactionDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single income or expense entry.
///
/// Negative amounts are expenses, positive amounts income. The category
/// reference is a soft one: it may be absent, and the referenced category's
/// deletion is blocked elsewhere while transactions still point at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The transaction's ID.
    pub id: TransactionId,
    /// What the transaction was for.
    pub description: TransactionDescription,
    /// The amount in dollars. Negative for expenses, positive for income.
    pub amount: f64,
    /// The date the transaction occurred.
    pub date: Date,
    /// The category this transaction is assigned to, if any.
    pub category_id: Option<CategoryId>,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// When the transaction was created.
    pub created_at: OffsetDateTime,
    /// When the transaction was last updated, if ever.
    pub updated_at: Option<OffsetDateTime>,
}

/// The fields needed to create a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// What the transaction was for.
    pub description: TransactionDescription,
    /// The amount in dollars. Negative for expenses, positive for income.
    pub amount: f64,
    /// The date the transaction occurred.
    pub date: Date,
    /// The category this transaction is assigned to, if any.
    pub category_id: Option<CategoryId>,
    /// Optional free-text notes.
    pub notes: Option<String>,
}

/// The data submitted by the transaction create and edit forms.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionFormData {
    /// What the transaction was for.
    pub description: String,
    /// The amount in dollars.
    pub amount: f64,
    /// The date the transaction occurred.
    pub date: Date,
    /// The selected category. An empty selection parses as `None` and is
    /// stored as NULL.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Optional free-text notes.
    pub notes: Option<String>,
}
