//! Signals that cached renderings of listing/detail views are stale.
//!
//! Every successful mutation answers with an `HX-Redirect` to the relevant
//! listing page plus `HX-Trigger` refresh events naming each affected view.
//! Any page listening for its refresh event re-fetches its content, so no
//! view keeps rendering data that a mutation has just changed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::{HxRedirect, HxResponseTrigger};

/// A view whose cached rendering is invalidated by a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleView {
    /// The dashboard summary page.
    Dashboard,
    /// The budgets listing page.
    Budgets,
    /// The categories listing page.
    Categories,
    /// The transactions listing page.
    Transactions,
}

impl StaleView {
    /// The htmx event name broadcast to consumers of this view.
    pub fn refresh_event(self) -> &'static str {
        match self {
            StaleView::Dashboard => "refresh-dashboard",
            StaleView::Budgets => "refresh-budgets",
            StaleView::Categories => "refresh-categories",
            StaleView::Transactions => "refresh-transactions",
        }
    }
}

/// The views invalidated by budget mutations.
pub const BUDGET_STALE_VIEWS: &[StaleView] = &[StaleView::Budgets, StaleView::Dashboard];

/// The views invalidated by category mutations.
///
/// Categories are displayed on budget and transaction rows, so those
/// listings go stale along with the categories page itself.
pub const CATEGORY_STALE_VIEWS: &[StaleView] = &[
    StaleView::Categories,
    StaleView::Budgets,
    StaleView::Dashboard,
    StaleView::Transactions,
];

/// The views invalidated by transaction mutations.
pub const TRANSACTION_STALE_VIEWS: &[StaleView] = &[StaleView::Transactions, StaleView::Dashboard];

/// Build the response for a successful mutation.
///
/// Redirects the client to `redirect_to` and broadcasts a refresh event for
/// each view in `stale_views`.
pub fn mutation_success(redirect_to: &str, stale_views: &[StaleView]) -> Response {
    let events = stale_views.iter().map(|view| view.refresh_event());

    (
        HxResponseTrigger::normal(events),
        HxRedirect(redirect_to.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod change_notifier_tests {
    use crate::{
        endpoints,
        test_utils::{assert_hx_redirect, get_header},
    };

    use super::{BUDGET_STALE_VIEWS, CATEGORY_STALE_VIEWS, mutation_success};

    #[test]
    fn redirects_to_listing_view() {
        let response = mutation_success(endpoints::BUDGETS_VIEW, BUDGET_STALE_VIEWS);

        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::BUDGETS_VIEW);
    }

    #[test]
    fn triggers_refresh_event_for_each_stale_view() {
        let response = mutation_success(endpoints::CATEGORIES_VIEW, CATEGORY_STALE_VIEWS);

        let trigger_header = get_header(&response, "hx-trigger");

        for view in CATEGORY_STALE_VIEWS {
            assert!(
                trigger_header.contains(view.refresh_event()),
                "want {} in HX-Trigger header, got {trigger_header:?}",
                view.refresh_event()
            );
        }
    }
}
