//! Leptos router integration for the navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! The app shell wraps its `<Routes>` in [`RouteGuard`] inside `<Router>`.
//! Every location change, including programmatic `navigate` calls, re-runs
//! the guard against the session as it is at that instant. The guarded view
//! only mounts once the decision is `Allow`; a redirect replaces the history
//! entry without the protected view ever rendering.

#[cfg(test)]
#[path = "nav_guard_test.rs"]
mod nav_guard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::router::guard::{self, Decision, SessionSnapshot};
use crate::router::routes::RouteTable;
use crate::state::auth::AuthStore;

/// Render `children` only for locations the current session may enter.
#[component]
pub fn RouteGuard(store: AuthStore, table: RouteTable, children: ChildrenFn) -> impl IntoView {
    let location = use_location();
    let pathname = location.pathname;
    let search = location.search;
    let navigate = use_navigate();
    let store = StoredValue::new_local(store);
    let table = StoredValue::new(table);

    let pending = Memo::new(move |_| {
        let pathname = pathname.get();
        let search = search.get();
        let session = store.with_value(AuthStore::snapshot);
        table.with_value(|table| redirect_href(table, &pathname, &search, &session))
    });

    Effect::new(move || {
        if let Some(href) = pending.get() {
            log::debug!("guard redirected {} to {href}", pathname.get_untracked());
            navigate(&href, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    view! {
        <Show when=move || pending.with(Option::is_none)>
            {children()}
        </Show>
    }
}

/// Location to redirect to, or `None` when the transition is allowed.
pub fn redirect_href(table: &RouteTable, pathname: &str, search: &str, session: &SessionSnapshot) -> Option<String> {
    let full_path = full_path(pathname, search);
    match guard::check(table, &full_path, session) {
        Decision::Allow => None,
        Decision::Redirect(redirect) => Some(redirect.href(table)),
    }
}

fn full_path(pathname: &str, search: &str) -> String {
    let search = search.trim_start_matches('?');
    if search.is_empty() {
        pathname.to_owned()
    } else {
        format!("{pathname}?{search}")
    }
}
