use hospital_cms::{
    error::AppError,
    models::{
        AppointmentStatus, BlogPost, BlogStatus, CreateAppointmentRequest, CreateDepartmentRequest,
        CreateVideoRequest, InviteUserRequest, Role, UpdateTreatmentRequest,
    },
    slug::{normalize_update_slug, resolve_slug, slugify},
};
use validator::Validate;

// --- Slugs ---

#[test]
fn test_slugify_collapses_separators() {
    assert_eq!(slugify("Cardiology & Heart Care"), "cardiology-heart-care");
    assert_eq!(slugify("  --Knee   Replacement--  "), "knee-replacement");
    assert_eq!(slugify("Covid-19 FAQ"), "covid-19-faq");
}

#[test]
fn test_slugify_drops_non_ascii() {
    assert_eq!(slugify("Café Médical"), "caf-m-dical");
    assert_eq!(slugify("ऑर्थो"), "");
}

#[test]
fn test_resolve_slug_prefers_explicit() {
    assert_eq!(resolve_slug(Some("My Slug"), "Title").unwrap(), "my-slug");
    assert_eq!(resolve_slug(Some("   "), "Fallback Title").unwrap(), "fallback-title");
    assert_eq!(resolve_slug(None, "Fallback Title").unwrap(), "fallback-title");
}

#[test]
fn test_resolve_slug_rejects_empty_result() {
    assert!(matches!(resolve_slug(None, "???"), Err(AppError::Validation(_))));
}

#[test]
fn test_normalize_update_slug() {
    let mut slug = Some("New Slug!".to_string());
    normalize_update_slug(&mut slug).unwrap();
    assert_eq!(slug.as_deref(), Some("new-slug"));

    let mut untouched = None;
    normalize_update_slug(&mut untouched).unwrap();
    assert!(untouched.is_none());

    let mut invalid = Some("***".to_string());
    assert!(normalize_update_slug(&mut invalid).is_err());
}

// --- Enums ---

#[test]
fn test_role_round_trips_through_str() {
    for role in [Role::Editor, Role::Admin, Role::SuperAdmin] {
        assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
    }
    assert!("owner".parse::<Role>().is_err());
    assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), r#""super_admin""#);
}

#[test]
fn test_status_enums_serialize_snake_case() {
    assert_eq!(serde_json::to_string(&BlogStatus::Published).unwrap(), r#""published""#);
    assert_eq!(
        serde_json::from_str::<AppointmentStatus>(r#""cancelled""#).unwrap(),
        AppointmentStatus::Cancelled
    );
    assert_eq!(BlogStatus::default(), BlogStatus::Draft);
    assert_eq!(AppointmentStatus::default(), AppointmentStatus::Pending);
}

#[test]
fn test_blog_post_is_published() {
    let post = BlogPost {
        status: "published".to_string(),
        ..BlogPost::default()
    };
    assert!(post.is_published());
    assert!(!BlogPost::default().is_published());
}

// --- Validation rules ---

#[test]
fn test_department_name_required() {
    let request = CreateDepartmentRequest::default();
    assert!(request.validate().is_err());
}

#[test]
fn test_appointment_rules() {
    let valid = CreateAppointmentRequest {
        patient_name: "Asha".to_string(),
        email: "asha@example.com".to_string(),
        phone: "98450".to_string(),
        ..CreateAppointmentRequest::default()
    };
    assert!(valid.validate().is_ok());

    let short_phone = CreateAppointmentRequest {
        phone: "123".to_string(),
        ..valid.clone()
    };
    assert!(short_phone.validate().is_err());

    let bad_email = CreateAppointmentRequest {
        email: "asha.example.com".to_string(),
        ..valid
    };
    assert!(bad_email.validate().is_err());
}

#[test]
fn test_video_url_must_be_url() {
    let request = CreateVideoRequest {
        title: "Tour".to_string(),
        youtube_url: "not a url".to_string(),
        ..CreateVideoRequest::default()
    };
    assert!(request.validate().is_err());
}

#[test]
fn test_invite_password_length() {
    let request = InviteUserRequest {
        email: "staff@hospital.test".to_string(),
        password: "short".to_string(),
        full_name: None,
        role: Role::Editor,
    };
    assert!(request.validate().is_err());
}

#[test]
fn test_update_request_omits_unset_fields() {
    let partial = UpdateTreatmentRequest {
        title: Some("New Title Only".to_string()),
        ..UpdateTreatmentRequest::default()
    };

    assert!(partial.validate().is_ok());
    let json_output = serde_json::to_string(&partial).unwrap();
    assert!(json_output.contains(r#""title":"New Title Only""#));
    assert!(!json_output.contains("department_id"));
}

#[test]
fn test_validation_errors_map_to_app_error() {
    let errors = CreateDepartmentRequest::default().validate().unwrap_err();
    let app_error: AppError = errors.into();
    assert!(matches!(app_error, AppError::Validation(_)));
}
