use super::*;

#[test]
fn diary_table_marks_entry_routes_public() {
    let table = RouteTable::diary();
    for name in [LOGIN, SIGNUP, PENDING_APPROVAL] {
        assert!(table.by_name(name).unwrap().access.is_public(), "{name}");
    }
}

#[test]
fn diary_table_leaves_dashboard_and_change_password_unrestricted() {
    let table = RouteTable::diary();
    assert_eq!(table.by_name(DASHBOARD).unwrap().access, Access::Authenticated);
    assert_eq!(table.by_name(CHANGE_PASSWORD).unwrap().access, Access::Authenticated);
}

#[test]
fn diary_table_restricts_record_views_to_staff() {
    let table = RouteTable::diary();
    for name in [STUDENTS, ATTENDANCE, COUNSEL, GRADES] {
        let roles = table.by_name(name).unwrap().access.roles().unwrap();
        assert_eq!(roles, &[Role::Teacher, Role::Admin], "{name}");
    }
    assert_eq!(table.by_name(ADMIN_USERS).unwrap().access.roles(), Some(&[Role::Admin][..]));
}

#[test]
fn resolve_ignores_query_fragment_and_trailing_slash() {
    let table = RouteTable::diary();
    assert_eq!(table.resolve("/attendance?date=2024-03-01").unwrap().name, ATTENDANCE);
    assert_eq!(table.resolve("/students/#top").unwrap().name, STUDENTS);
    assert_eq!(table.resolve("/").unwrap().name, DASHBOARD);
    assert_eq!(table.resolve("").unwrap().name, DASHBOARD);
}

#[test]
fn resolve_ignores_ascii_case() {
    let table = RouteTable::diary();
    assert_eq!(table.resolve("/Admin/Users").unwrap().name, ADMIN_USERS);
    assert_eq!(table.resolve("/STUDENTS/?page=2").unwrap().name, STUDENTS);
}

#[test]
fn resolve_unknown_path_is_none() {
    assert!(RouteTable::diary().resolve("/nope").is_none());
}

#[test]
fn path_of_named_route() {
    let table = RouteTable::diary();
    assert_eq!(table.path_of(ADMIN_USERS), "/admin/users");
    assert_eq!(table.path_of("missing"), "/");
}

#[test]
fn path_of_location_strips_suffixes() {
    assert_eq!(path_of("/grades?term=1"), "/grades");
    assert_eq!(path_of("/admin/users/"), "/admin/users");
    assert_eq!(path_of("///"), "/");
}
