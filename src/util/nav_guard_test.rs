use super::*;
use crate::net::types::Role;

fn teacher() -> SessionSnapshot {
    SessionSnapshot { logged_in: true, role: Some(Role::Teacher), password_change_required: false }
}

#[test]
fn allowed_location_has_no_redirect() {
    let table = RouteTable::diary();
    assert_eq!(redirect_href(&table, "/students", "", &teacher()), None);
}

#[test]
fn anonymous_location_redirects_with_search_in_hint() {
    let table = RouteTable::diary();
    let href = redirect_href(&table, "/grades", "?term=2", &SessionSnapshot::default());
    assert_eq!(href.as_deref(), Some("/login?redirect=%2Fgrades%3Fterm%3D2"));
}

#[test]
fn search_without_question_mark_is_accepted() {
    assert_eq!(full_path("/grades", "term=2"), "/grades?term=2");
    assert_eq!(full_path("/grades", "?"), "/grades");
}

#[test]
fn teacher_on_admin_location_redirects_to_dashboard() {
    let table = RouteTable::diary();
    assert_eq!(redirect_href(&table, "/admin/users", "", &teacher()).as_deref(), Some("/"));
}

#[test]
fn redirect_targets_are_themselves_allowed() {
    let table = RouteTable::diary();
    let locked = SessionSnapshot { password_change_required: true, ..teacher() };
    for session in [SessionSnapshot::default(), teacher(), locked] {
        for path in ["/", "/students", "/admin/users", "/change-password", "/unknown"] {
            if let Some(href) = redirect_href(&table, path, "", &session) {
                let (target_path, target_search) = href.split_once('?').unwrap_or((href.as_str(), ""));
                assert_eq!(redirect_href(&table, target_path, target_search, &session), None, "{path} -> {href}");
            }
        }
    }
}

#[test]
fn locked_session_renders_only_change_password() {
    let table = RouteTable::diary();
    let locked = SessionSnapshot { password_change_required: true, ..teacher() };
    for path in ["/", "/students", "/grades", "/admin/users", "/unknown"] {
        assert_eq!(redirect_href(&table, path, "", &locked).as_deref(), Some("/change-password"), "{path}");
    }
    assert_eq!(redirect_href(&table, "/change-password", "", &locked), None);
}

#[test]
fn public_locations_render_for_anyone() {
    let table = RouteTable::diary();
    for path in ["/login", "/signup", "/pending-approval"] {
        assert_eq!(redirect_href(&table, path, "", &SessionSnapshot::default()), None, "{path}");
    }
}
