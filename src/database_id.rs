//! Strongly-typed database identifiers.
//!
//! Each entity gets its own id type so that a [CategoryId] cannot be passed
//! where a [BudgetId] is expected. The wrapped value is the SQLite rowid.

use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

macro_rules! database_id {
    ($(#[$docs:meta])* $name:ident) => {
        $(#[$docs])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw row id.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// The underlying row id.
            pub fn as_i64(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                self.0.to_sql()
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map(Self)
            }
        }
    };
}

database_id!(
    /// The id of a spending category.
    CategoryId
);

database_id!(
    /// The id of a per-category budget.
    BudgetId
);

database_id!(
    /// The id of a transaction.
    TransactionId
);

#[cfg(test)]
mod database_id_tests {
    use super::{BudgetId, CategoryId};

    #[test]
    fn round_trips_raw_id() {
        let id = CategoryId::new(42);

        assert_eq!(id.as_i64(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn serializes_as_plain_integer() {
        let id = BudgetId::new(7);

        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
