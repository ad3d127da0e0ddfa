use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use hospital_cms::{
    AppState, MemoryRepository, MockIdentity, MockNotifier, NotificationDispatcher,
    auth::AuthUser,
    config::AppConfig,
    error::AppError,
    handlers::{
        ContentScope, DepartmentScope, appointments, blogs, departments,
        maintenance::{self, BackfillQuery},
        public::{self, PublicBlogQuery},
        treatments, users, videos,
    },
    models::{
        AppointmentStatus, BlogStatus, CreateAppointmentRequest, CreateBlogPostRequest,
        CreateDepartmentRequest, CreateTreatmentRequest, CreateVideoRequest, InviteUserRequest,
        Profile, ReorderRequest, Role, UpdateProfileRequest, UpdateVideoRequest,
    },
    notify::AppointmentNotifier,
};
use std::sync::Arc;
use uuid::Uuid;

// --- Test State ---

const ROOT_ID: Uuid = Uuid::from_u128(0xA);

fn create_test_state(notifier: NotificationDispatcher, identity: MockIdentity) -> AppState {
    AppState {
        repo: Arc::new(MemoryRepository::new()),
        identity: Arc::new(identity),
        notifier: Arc::new(notifier),
        config: AppConfig::default(),
    }
}

fn default_state() -> AppState {
    create_test_state(NotificationDispatcher::default(), MockIdentity::new())
}

fn super_admin() -> AuthUser {
    AuthUser {
        id: ROOT_ID,
        email: "root@hospital.test".to_string(),
        role: Role::SuperAdmin,
    }
}

fn editor() -> AuthUser {
    AuthUser {
        id: Uuid::from_u128(0xE),
        email: "editor@hospital.test".to_string(),
        role: Role::Editor,
    }
}

async fn seed_department(state: &AppState, name: &str) -> hospital_cms::models::Department {
    let (_, Json(department)) = departments::create_department(
        super_admin(),
        State(state.clone()),
        Json(CreateDepartmentRequest {
            name: name.to_string(),
            ..CreateDepartmentRequest::default()
        }),
    )
    .await
    .unwrap();
    department
}

fn appointment_request() -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        patient_name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "+91 98450 00000".to_string(),
        ..CreateAppointmentRequest::default()
    }
}

// --- Departments ---

#[tokio::test]
async fn test_create_department_derives_slug_and_is_public() {
    let state = default_state();

    let department = seed_department(&state, "Cardiology & Heart Care").await;
    assert_eq!(department.slug, "cardiology-heart-care");

    let Json(detail) = public::get_department_page(
        State(state.clone()),
        Path("cardiology-heart-care".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(detail.department.id, department.id);
}

#[tokio::test]
async fn test_disabled_department_hidden_from_public() {
    let state = default_state();
    let department = seed_department(&state, "Oncology").await;

    departments::set_department_status(
        super_admin(),
        State(state.clone()),
        Path(department.id),
        Json(false),
    )
    .await
    .unwrap();

    let Json(listed) = public::list_departments(State(state.clone())).await.unwrap();
    assert!(listed.iter().all(|d| d.id != department.id));

    let result =
        public::get_department_page(State(state.clone()), Path(department.slug.clone())).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    // Still visible in the backoffice.
    let Json(all) = departments::admin_list_departments(super_admin(), State(state))
        .await
        .unwrap();
    assert!(all.iter().any(|d| d.id == department.id));
}

#[tokio::test]
async fn test_duplicate_department_slug_is_conflict() {
    let state = default_state();
    seed_department(&state, "Neurology").await;

    let result = departments::create_department(
        super_admin(),
        State(state),
        Json(CreateDepartmentRequest {
            name: "Neuro".to_string(),
            slug: Some("neurology".to_string()),
            ..CreateDepartmentRequest::default()
        }),
    )
    .await;

    let response = result.unwrap_err().into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unsluggable_name_is_validation_error() {
    let state = default_state();

    let result = departments::create_department(
        super_admin(),
        State(state),
        Json(CreateDepartmentRequest {
            name: "!!!".to_string(),
            ..CreateDepartmentRequest::default()
        }),
    )
    .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_reorder_departments() {
    let state = default_state();
    let a = seed_department(&state, "Alpha").await;
    let b = seed_department(&state, "Beta").await;

    let status = departments::reorder_departments(
        super_admin(),
        State(state.clone()),
        Json(ReorderRequest { ids: vec![b.id, a.id] }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let Json(listed) = public::list_departments(State(state)).await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
}

// --- Treatments ---

#[tokio::test]
async fn test_treatment_with_unknown_department_is_rejected() {
    let state = default_state();

    let result = treatments::create_treatment(
        super_admin(),
        State(state),
        Json(CreateTreatmentRequest {
            title: "Angioplasty".to_string(),
            department_id: Some(Uuid::new_v4()),
            ..CreateTreatmentRequest::default()
        }),
    )
    .await;

    let response = result.unwrap_err().into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleting_department_unassigns_treatments() {
    let state = default_state();
    let department = seed_department(&state, "Orthopaedics").await;
    let (_, Json(treatment)) = treatments::create_treatment(
        super_admin(),
        State(state.clone()),
        Json(CreateTreatmentRequest {
            title: "Knee Replacement".to_string(),
            department_id: Some(department.id),
            ..CreateTreatmentRequest::default()
        }),
    )
    .await
    .unwrap();

    let status = departments::delete_department(super_admin(), State(state.clone()), Path(department.id))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let Json(kept) = treatments::admin_get_treatment(super_admin(), State(state.clone()), Path(treatment.id))
        .await
        .unwrap();
    assert_eq!(kept.department_id, None);

    let Json(listed) = public::list_treatments(
        State(state),
        Query(DepartmentScope::default()),
    )
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_treatment_page_includes_department_and_posts() {
    let state = default_state();
    let department = seed_department(&state, "Dermatology").await;
    let (_, Json(treatment)) = treatments::create_treatment(
        super_admin(),
        State(state.clone()),
        Json(CreateTreatmentRequest {
            title: "Laser Therapy".to_string(),
            department_id: Some(department.id),
            ..CreateTreatmentRequest::default()
        }),
    )
    .await
    .unwrap();
    blogs::create_blog(
        editor(),
        State(state.clone()),
        Json(CreateBlogPostRequest {
            title: "What to expect from laser therapy".to_string(),
            treatment_id: Some(treatment.id),
            status: Some(BlogStatus::Published),
            ..CreateBlogPostRequest::default()
        }),
    )
    .await
    .unwrap();

    let Json(detail) =
        public::get_treatment_page(State(state), Path("laser-therapy".to_string()))
            .await
            .unwrap();

    assert_eq!(detail.department.map(|d| d.id), Some(department.id));
    assert_eq!(detail.posts.len(), 1);
}

// --- Blogs ---

#[tokio::test]
async fn test_blog_publish_flow() {
    let state = default_state();
    let author = editor();

    let (status, Json(draft)) = blogs::create_blog(
        author.clone(),
        State(state.clone()),
        Json(CreateBlogPostRequest {
            title: "Monsoon Health Tips".to_string(),
            content: "Drink boiled water.".to_string(),
            ..CreateBlogPostRequest::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(draft.status, "draft");
    assert_eq!(draft.author_id, Some(author.id));
    assert!(draft.published_at.is_none());

    let hidden = public::get_blog(State(state.clone()), Path(draft.slug.clone())).await;
    assert!(matches!(hidden, Err(AppError::NotFound(_))));

    let Json(published) = blogs::set_blog_status(
        author.clone(),
        State(state.clone()),
        Path(draft.id),
        Json(BlogStatus::Published),
    )
    .await
    .unwrap();
    let first_published_at = published.published_at.expect("publishing stamps the date");

    let Json(visible) = public::get_blog(State(state.clone()), Path(draft.slug.clone()))
        .await
        .unwrap();
    assert_eq!(visible.id, draft.id);

    // Unpublish and republish: the original date survives.
    blogs::set_blog_status(author.clone(), State(state.clone()), Path(draft.id), Json(BlogStatus::Draft))
        .await
        .unwrap();
    let Json(republished) = blogs::set_blog_status(
        author,
        State(state),
        Path(draft.id),
        Json(BlogStatus::Published),
    )
    .await
    .unwrap();
    assert_eq!(republished.published_at, Some(first_published_at));
}

#[tokio::test]
async fn test_public_blog_listing_filters_by_category() {
    let state = default_state();
    for (title, category) in [("Heart Health", "cardio"), ("Skin Care", "derma")] {
        blogs::create_blog(
            editor(),
            State(state.clone()),
            Json(CreateBlogPostRequest {
                title: title.to_string(),
                category: Some(category.to_string()),
                status: Some(BlogStatus::Published),
                ..CreateBlogPostRequest::default()
            }),
        )
        .await
        .unwrap();
    }

    let Json(posts) = public::list_blogs(
        State(state.clone()),
        Query(PublicBlogQuery {
            category: Some("CARDIO".to_string()),
            ..PublicBlogQuery::default()
        }),
    )
    .await
    .unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Heart Health");

    // Wildcard characters are matched literally.
    let Json(wildcard) = public::list_blogs(
        State(state),
        Query(PublicBlogQuery {
            category: Some("%".to_string()),
            ..PublicBlogQuery::default()
        }),
    )
    .await
    .unwrap();
    assert!(wildcard.is_empty());
}

// --- Videos ---

#[tokio::test]
async fn test_public_videos_global_vs_scoped() {
    let state = default_state();
    let department = seed_department(&state, "Pediatrics").await;

    let (_, Json(global)) = videos::create_video(
        editor(),
        State(state.clone()),
        Json(CreateVideoRequest {
            title: "Hospital tour".to_string(),
            youtube_url: "https://www.youtube.com/watch?v=tour".to_string(),
            show_global: Some(true),
            ..CreateVideoRequest::default()
        }),
    )
    .await
    .unwrap();
    let (_, Json(scoped)) = videos::create_video(
        editor(),
        State(state.clone()),
        Json(CreateVideoRequest {
            title: "Vaccination schedule".to_string(),
            youtube_url: "https://www.youtube.com/watch?v=vax".to_string(),
            department_ids: vec![department.id],
            ..CreateVideoRequest::default()
        }),
    )
    .await
    .unwrap();

    let Json(unscoped) = public::list_videos(State(state.clone()), Query(ContentScope::default()))
        .await
        .unwrap();
    assert_eq!(unscoped.iter().map(|v| v.id).collect::<Vec<_>>(), vec![global.id]);

    let Json(by_department) = public::list_videos(
        State(state),
        Query(ContentScope {
            department_id: Some(department.id),
            treatment_id: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(by_department.iter().map(|v| v.id).collect::<Vec<_>>(), vec![scoped.id]);
}

#[tokio::test]
async fn test_video_with_unknown_link_is_rejected() {
    let state = default_state();

    let result = videos::create_video(
        editor(),
        State(state),
        Json(CreateVideoRequest {
            title: "Orphan".to_string(),
            youtube_url: "https://www.youtube.com/watch?v=x".to_string(),
            treatment_ids: vec![Uuid::new_v4()],
            ..CreateVideoRequest::default()
        }),
    )
    .await;

    let response = result.unwrap_err().into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_video_update_deduplicates_links() {
    let state = default_state();
    let department = seed_department(&state, "Dermatology").await;

    let (_, Json(video)) = videos::create_video(
        editor(),
        State(state.clone()),
        Json(CreateVideoRequest {
            title: "Skin care basics".to_string(),
            youtube_url: "https://www.youtube.com/watch?v=skin".to_string(),
            department_ids: vec![department.id, department.id],
            ..CreateVideoRequest::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(video.department_ids, vec![department.id]);

    let Json(updated) = videos::update_video(
        editor(),
        State(state),
        Path(video.id),
        Json(UpdateVideoRequest {
            department_ids: Some(vec![department.id, department.id]),
            ..UpdateVideoRequest::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(updated.department_ids, vec![department.id]);
}

// --- Appointments ---

#[tokio::test]
async fn test_appointment_notifies_email_channel() {
    let email = Arc::new(MockNotifier::new());
    let state = create_test_state(
        NotificationDispatcher::new(Some(email.clone() as Arc<dyn AppointmentNotifier>), None),
        MockIdentity::new(),
    );

    let (status, Json(appointment)) =
        appointments::create_appointment(State(state), Json(appointment_request()))
            .await
            .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(appointment.status, AppointmentStatus::Pending.as_str());
    assert_eq!(email.sent().await, vec![appointment.id]);
}

#[tokio::test]
async fn test_appointment_email_failure_is_500_but_row_kept() {
    let state = create_test_state(
        NotificationDispatcher::new(
            Some(Arc::new(MockNotifier::new_failing()) as Arc<dyn AppointmentNotifier>),
            None,
        ),
        MockIdentity::new(),
    );

    let result =
        appointments::create_appointment(State(state.clone()), Json(appointment_request())).await;
    let response = result.unwrap_err().into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let Json(stored) = appointments::list_appointments(
        super_admin(),
        State(state),
        Query(appointments::AppointmentQuery::default()),
    )
    .await
    .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_appointment_messaging_failure_is_ignored() {
    let email = Arc::new(MockNotifier::new());
    let state = create_test_state(
        NotificationDispatcher::new(
            Some(email.clone() as Arc<dyn AppointmentNotifier>),
            Some(Arc::new(MockNotifier::new_failing()) as Arc<dyn AppointmentNotifier>),
        ),
        MockIdentity::new(),
    );

    let result = appointments::create_appointment(State(state), Json(appointment_request())).await;

    assert!(result.is_ok());
    assert_eq!(email.sent().await.len(), 1);
}

#[tokio::test]
async fn test_appointment_without_smtp_still_succeeds() {
    let state = default_state();

    let result = appointments::create_appointment(State(state), Json(appointment_request())).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_appointment_invalid_email_rejected() {
    let state = default_state();
    let mut request = appointment_request();
    request.email = "not-an-email".to_string();

    let result = appointments::create_appointment(State(state), Json(request)).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_appointment_status_update() {
    let state = default_state();
    let (_, Json(appointment)) =
        appointments::create_appointment(State(state.clone()), Json(appointment_request()))
            .await
            .unwrap();

    let Json(updated) = appointments::set_appointment_status(
        super_admin(),
        State(state.clone()),
        Path(appointment.id),
        Json(AppointmentStatus::Confirmed),
    )
    .await
    .unwrap();
    assert_eq!(updated.status, "confirmed");

    let Json(pending) = appointments::list_appointments(
        super_admin(),
        State(state),
        Query(appointments::AppointmentQuery {
            status: Some(AppointmentStatus::Pending),
        }),
    )
    .await
    .unwrap();
    assert!(pending.is_empty());
}

// --- Users ---

async fn seed_root(state: &AppState) {
    state
        .repo
        .create_profile(Profile {
            id: ROOT_ID,
            email: "root@hospital.test".to_string(),
            role: "super_admin".to_string(),
            is_active: true,
            ..Profile::default()
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_invite_user_creates_profile() {
    let state = default_state();

    let (status, Json(profile)) = users::invite_user(
        super_admin(),
        State(state.clone()),
        Json(InviteUserRequest {
            email: "new.editor@hospital.test".to_string(),
            password: "correct-horse".to_string(),
            full_name: Some("New Editor".to_string()),
            role: Role::Editor,
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(profile.role, "editor");
    assert!(profile.is_active);

    let Json(listed) = users::list_users(super_admin(), State(state)).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_invite_user_identity_failure() {
    let state = create_test_state(
        NotificationDispatcher::default(),
        MockIdentity { should_fail: true },
    );

    let result = users::invite_user(
        super_admin(),
        State(state.clone()),
        Json(InviteUserRequest {
            email: "x@hospital.test".to_string(),
            password: "long-enough".to_string(),
            full_name: None,
            role: Role::Admin,
        }),
    )
    .await;

    assert!(result.is_err());
    assert!(state.repo.list_profiles().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_super_admin_cannot_demote_or_disable_self() {
    let state = default_state();
    seed_root(&state).await;

    let demote = users::update_user(
        super_admin(),
        State(state.clone()),
        Path(ROOT_ID),
        Json(UpdateProfileRequest {
            role: Some(Role::Editor),
            ..UpdateProfileRequest::default()
        }),
    )
    .await;
    assert!(matches!(demote, Err(AppError::Forbidden(_))));

    let disable = users::update_user(
        super_admin(),
        State(state.clone()),
        Path(ROOT_ID),
        Json(UpdateProfileRequest {
            is_active: Some(false),
            ..UpdateProfileRequest::default()
        }),
    )
    .await;
    assert!(matches!(disable, Err(AppError::Forbidden(_))));

    // Renaming yourself is fine.
    let Json(renamed) = users::update_user(
        super_admin(),
        State(state),
        Path(ROOT_ID),
        Json(UpdateProfileRequest {
            full_name: Some("Chief".to_string()),
            ..UpdateProfileRequest::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(renamed.full_name.as_deref(), Some("Chief"));
}

#[tokio::test]
async fn test_super_admin_cannot_delete_self() {
    let state = default_state();
    seed_root(&state).await;

    let result = users::delete_user(super_admin(), State(state.clone()), Path(ROOT_ID)).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(state.repo.get_profile(ROOT_ID).await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_other_user() {
    let state = default_state();
    let (_, Json(profile)) = users::invite_user(
        super_admin(),
        State(state.clone()),
        Json(InviteUserRequest {
            email: "leaving@hospital.test".to_string(),
            password: "long-enough".to_string(),
            full_name: None,
            role: Role::Editor,
        }),
    )
    .await
    .unwrap();

    let status = users::delete_user(super_admin(), State(state.clone()), Path(profile.id))
        .await
        .unwrap();

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(state.repo.get_profile(profile.id).await.unwrap().is_none());
}

// --- Maintenance ---

#[tokio::test]
async fn test_backfill_dry_run_then_apply() {
    let state = default_state();
    let department = seed_department(&state, "Cardiology").await;
    let (_, Json(treatment)) = treatments::create_treatment(
        super_admin(),
        State(state.clone()),
        Json(CreateTreatmentRequest {
            title: "Bypass Surgery".to_string(),
            category: Some(" cardiology ".to_string()),
            ..CreateTreatmentRequest::default()
        }),
    )
    .await
    .unwrap();

    let Json(plan) = maintenance::backfill_treatment_departments(
        super_admin(),
        State(state.clone()),
        Query(BackfillQuery { apply: false }),
    )
    .await
    .unwrap();
    assert!(!plan.applied);
    assert_eq!(plan.assignments.len(), 1);
    let Json(untouched) =
        treatments::admin_get_treatment(super_admin(), State(state.clone()), Path(treatment.id))
            .await
            .unwrap();
    assert_eq!(untouched.department_id, None);

    let Json(applied) = maintenance::backfill_treatment_departments(
        super_admin(),
        State(state.clone()),
        Query(BackfillQuery { apply: true }),
    )
    .await
    .unwrap();
    assert!(applied.applied);
    let Json(assigned) =
        treatments::admin_get_treatment(super_admin(), State(state), Path(treatment.id))
            .await
            .unwrap();
    assert_eq!(assigned.department_id, Some(department.id));
}

// --- Me ---

#[tokio::test]
async fn test_get_me_returns_own_profile() {
    let state = default_state();
    seed_root(&state).await;

    let Json(me) = public::get_me(super_admin(), State(state)).await.unwrap();

    assert_eq!(me.id, ROOT_ID);
    assert_eq!(me.role, "super_admin");
}
