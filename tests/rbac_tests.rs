use hospital_cms::{
    models::{Profile, Role},
    rbac::{AccessDecision, ROUTE_PERMISSIONS, authorize, login_redirect, required_roles},
};
use uuid::Uuid;

fn profile(role: &str, is_active: bool) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        email: format!("{role}@hospital.test"),
        role: role.to_string(),
        is_active,
        ..Profile::default()
    }
}

#[test]
fn test_unlisted_paths_are_open() {
    assert!(required_roles("/departments").is_none());
    assert!(required_roles("/blogs/some-post").is_none());
    assert_eq!(authorize("/health", None), AccessDecision::Allow);
}

#[test]
fn test_prefix_must_end_on_segment_boundary() {
    // "/administrator" is not under "/admin".
    assert!(required_roles("/administrator").is_none());
    // "/admin/usersettings" falls back to the "/admin" rule, not "/admin/users".
    assert_eq!(
        required_roles("/admin/usersettings"),
        Some(&[Role::Editor, Role::Admin, Role::SuperAdmin][..])
    );
}

#[test]
fn test_longest_prefix_wins() {
    assert_eq!(required_roles("/admin/users/123"), Some(&[Role::SuperAdmin][..]));
    assert_eq!(
        required_roles("/admin/departments/abc/status"),
        Some(&[Role::Admin, Role::SuperAdmin][..])
    );
    assert_eq!(
        required_roles("/admin"),
        Some(&[Role::Editor, Role::Admin, Role::SuperAdmin][..])
    );
}

#[test]
fn test_editor_reaches_content_but_not_structure() {
    let editor = profile("editor", true);

    assert_eq!(authorize("/admin/dashboard", Some(&editor)), AccessDecision::Allow);
    assert_eq!(authorize("/admin/blogs", Some(&editor)), AccessDecision::Allow);
    assert_eq!(authorize("/admin/videos/1", Some(&editor)), AccessDecision::Allow);
    assert_eq!(
        authorize("/admin/departments", Some(&editor)),
        AccessDecision::Forbidden
    );
    assert_eq!(
        authorize("/admin/appointments", Some(&editor)),
        AccessDecision::Forbidden
    );
}

#[test]
fn test_admin_cannot_manage_users_or_maintenance() {
    let admin = profile("admin", true);

    assert_eq!(authorize("/admin/treatments", Some(&admin)), AccessDecision::Allow);
    assert_eq!(authorize("/admin/appointments/1/status", Some(&admin)), AccessDecision::Allow);
    assert_eq!(authorize("/admin/users", Some(&admin)), AccessDecision::Forbidden);
    assert_eq!(
        authorize("/admin/maintenance/treatment-departments", Some(&admin)),
        AccessDecision::Forbidden
    );
}

#[test]
fn test_super_admin_reaches_every_rule() {
    let root = profile("super_admin", true);
    for (prefix, _) in ROUTE_PERMISSIONS {
        assert_eq!(authorize(prefix, Some(&root)), AccessDecision::Allow, "{prefix}");
    }
}

#[test]
fn test_missing_session_is_unauthenticated() {
    assert_eq!(authorize("/admin/blogs", None), AccessDecision::Unauthenticated);
}

#[test]
fn test_disabled_account_checked_before_role() {
    let disabled_root = profile("super_admin", false);
    assert_eq!(authorize("/admin/users", Some(&disabled_root)), AccessDecision::Disabled);
}

#[test]
fn test_unknown_role_is_forbidden() {
    let stranger = profile("patient", true);
    assert_eq!(authorize("/admin", Some(&stranger)), AccessDecision::Forbidden);
}

#[test]
fn test_login_redirect_encodes_path() {
    assert_eq!(
        login_redirect("/login", "/admin/users"),
        "/login?redirect=%2Fadmin%2Fusers"
    );

    // Query delimiters in the path cannot smuggle extra parameters.
    let target = login_redirect("/login", "/admin/blogs/a&error=x#frag");
    assert_eq!(target, "/login?redirect=%2Fadmin%2Fblogs%2Fa%26error%3Dx%23frag");
}
