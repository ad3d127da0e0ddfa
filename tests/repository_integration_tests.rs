use hospital_cms::{
    error::RepoError,
    models::{
        BlogStatus, CreateBlogPostRequest, CreateDepartmentRequest, CreateTreatmentRequest,
        CreateVideoRequest, Profile, UpdateDepartmentRequest, UpdateVideoRequest,
    },
    repository::{BlogFilter, PostgresRepository, Repository, VideoFilter},
};
use sqlx::PgPool;
use uuid::Uuid;

// --- Test Context and Setup ---

/// Holds the pool for tests that run against a live Postgres.
struct DbTestContext {
    pool: PgPool,
}

impl DbTestContext {
    /// Connects and migrates, or returns `None` when `DATABASE_URL` is not set so the
    /// suite is skipped on machines without a database.
    async fn setup() -> Option<Self> {
        dotenv::dotenv().ok();

        let Ok(db_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping Postgres repository tests");
            return None;
        };

        let pool = PgPool::connect(&db_url)
            .await
            .expect("Failed to connect to database for integration tests.");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations.");

        Some(DbTestContext { pool })
    }

    fn repository(&self) -> PostgresRepository {
        PostgresRepository::new(self.pool.clone())
    }
}

// --- Test Data Helpers ---

/// Unique suffix so slugs and emails never collide across runs on a shared database.
fn tag() -> String {
    Uuid::new_v4().simple().to_string()
}

async fn create_department(repo: &PostgresRepository, name: &str) -> hospital_cms::models::Department {
    let slug = format!("{}-{}", name.to_lowercase(), tag());
    repo.create_department(
        slug,
        CreateDepartmentRequest {
            name: name.to_string(),
            ..CreateDepartmentRequest::default()
        },
    )
    .await
    .expect("department insert")
}

async fn create_author(repo: &PostgresRepository) -> Profile {
    let id = Uuid::new_v4();
    repo.create_profile(Profile {
        id,
        email: format!("{id}@hospital.test"),
        role: "editor".to_string(),
        is_active: true,
        ..Profile::default()
    })
    .await
    .expect("profile insert")
}

// --- Departments ---

#[tokio::test]
async fn test_department_slug_round_trip_and_partial_update() {
    let Some(ctx) = DbTestContext::setup().await else {
        return;
    };
    let repo = ctx.repository();
    let department = create_department(&repo, "Cardiology").await;

    let found = repo
        .get_department_by_slug(&department.slug, false)
        .await
        .unwrap()
        .expect("department by slug");
    assert_eq!(found.id, department.id);
    assert!(found.is_active);

    // Only the provided field changes.
    let updated = repo
        .update_department(
            department.id,
            UpdateDepartmentRequest {
                description: Some("Heart care".to_string()),
                ..UpdateDepartmentRequest::default()
            },
        )
        .await
        .unwrap()
        .expect("department exists");
    assert_eq!(updated.name, "Cardiology");
    assert_eq!(updated.slug, department.slug);
    assert_eq!(updated.description.as_deref(), Some("Heart care"));

    assert!(repo.delete_department(department.id).await.unwrap());
    assert!(repo.get_department(department.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_disabled_department_hidden_from_public_reads() {
    let Some(ctx) = DbTestContext::setup().await else {
        return;
    };
    let repo = ctx.repository();
    let department = create_department(&repo, "Oncology").await;

    repo.set_department_active(department.id, false)
        .await
        .unwrap()
        .expect("department exists");

    let public = repo.list_departments(false).await.unwrap();
    assert!(public.iter().all(|d| d.id != department.id));
    assert!(
        repo.get_department_by_slug(&department.slug, false)
            .await
            .unwrap()
            .is_none()
    );

    let all = repo.list_departments(true).await.unwrap();
    assert!(all.iter().any(|d| d.id == department.id));
    assert!(
        repo.get_department_by_slug(&department.slug, true)
            .await
            .unwrap()
            .is_some()
    );
}

// --- Constraint Mapping ---

#[tokio::test]
async fn test_duplicate_slug_maps_to_conflict() {
    let Some(ctx) = DbTestContext::setup().await else {
        return;
    };
    let repo = ctx.repository();
    let department = create_department(&repo, "Neurology").await;

    let result = repo
        .create_department(
            department.slug.clone(),
            CreateDepartmentRequest {
                name: "Neurology Again".to_string(),
                ..CreateDepartmentRequest::default()
            },
        )
        .await;

    assert!(matches!(result, Err(RepoError::Conflict(_))));
}

#[tokio::test]
async fn test_unknown_department_maps_to_invalid_reference() {
    let Some(ctx) = DbTestContext::setup().await else {
        return;
    };
    let repo = ctx.repository();

    let result = repo
        .create_treatment(
            format!("orphan-{}", tag()),
            CreateTreatmentRequest {
                title: "Orphan".to_string(),
                department_id: Some(Uuid::new_v4()),
                ..CreateTreatmentRequest::default()
            },
        )
        .await;

    assert!(matches!(result, Err(RepoError::InvalidReference(_))));
}

// --- Blog Posts ---

#[tokio::test]
async fn test_publishing_stamps_published_at_once() {
    let Some(ctx) = DbTestContext::setup().await else {
        return;
    };
    let repo = ctx.repository();
    let author = create_author(&repo).await;

    let draft = repo
        .create_blog_post(
            format!("flu-season-{}", tag()),
            author.id,
            CreateBlogPostRequest {
                title: "Flu season".to_string(),
                content: "Get vaccinated.".to_string(),
                ..CreateBlogPostRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(draft.status, "draft");
    assert!(draft.published_at.is_none());

    let published = repo
        .set_blog_status(draft.id, BlogStatus::Published)
        .await
        .unwrap()
        .expect("post exists");
    let first_stamp = published.published_at.expect("stamped on publish");

    repo.set_blog_status(draft.id, BlogStatus::Draft)
        .await
        .unwrap();
    let republished = repo
        .set_blog_status(draft.id, BlogStatus::Published)
        .await
        .unwrap()
        .expect("post exists");
    assert_eq!(republished.published_at, Some(first_stamp));
}

#[tokio::test]
async fn test_blog_category_filter_is_exact_and_case_insensitive() {
    let Some(ctx) = DbTestContext::setup().await else {
        return;
    };
    let repo = ctx.repository();
    let author = create_author(&repo).await;
    let category = format!("cardio-{}", tag());

    let post = repo
        .create_blog_post(
            format!("heart-health-{}", tag()),
            author.id,
            CreateBlogPostRequest {
                title: "Heart health".to_string(),
                content: "Walk daily.".to_string(),
                category: Some(category.clone()),
                status: Some(BlogStatus::Published),
                ..CreateBlogPostRequest::default()
            },
        )
        .await
        .unwrap();
    assert!(post.published_at.is_some());

    let matched = repo
        .list_blog_posts(BlogFilter {
            category: Some(category.to_uppercase()),
            ..BlogFilter::published()
        })
        .await
        .unwrap();
    assert_eq!(matched.iter().map(|p| p.id).collect::<Vec<_>>(), vec![post.id]);

    // Pattern characters are compared literally.
    for pattern in ["%", "cardio-%", "_ardio%"] {
        let listed = repo
            .list_blog_posts(BlogFilter {
                category: Some(pattern.to_string()),
                ..BlogFilter::published()
            })
            .await
            .unwrap();
        assert!(listed.iter().all(|p| p.id != post.id), "{pattern}");
    }
}

// --- Videos ---

#[tokio::test]
async fn test_video_links_are_replaced_on_update() {
    let Some(ctx) = DbTestContext::setup().await else {
        return;
    };
    let repo = ctx.repository();
    let first = create_department(&repo, "Pediatrics").await;
    let second = create_department(&repo, "Orthopaedics").await;

    let video = repo
        .create_video(CreateVideoRequest {
            title: "Ward tour".to_string(),
            youtube_url: "https://www.youtube.com/watch?v=ward".to_string(),
            department_ids: vec![first.id, first.id],
            ..CreateVideoRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(video.department_ids, vec![first.id]);
    assert!(video.treatment_ids.is_empty());

    let replaced = repo
        .update_video(
            video.id,
            UpdateVideoRequest {
                department_ids: Some(vec![second.id]),
                ..UpdateVideoRequest::default()
            },
        )
        .await
        .unwrap()
        .expect("video exists");
    assert_eq!(replaced.department_ids, vec![second.id]);

    // Omitted link lists are left alone.
    let renamed = repo
        .update_video(
            video.id,
            UpdateVideoRequest {
                title: Some("Ward tour 2".to_string()),
                ..UpdateVideoRequest::default()
            },
        )
        .await
        .unwrap()
        .expect("video exists");
    assert_eq!(renamed.department_ids, vec![second.id]);

    let by_first = repo
        .list_videos(VideoFilter {
            department_id: Some(first.id),
            ..VideoFilter::default()
        })
        .await
        .unwrap();
    assert!(by_first.iter().all(|v| v.id != video.id));

    let unknown_link = repo
        .update_video(
            video.id,
            UpdateVideoRequest {
                treatment_ids: Some(vec![Uuid::new_v4()]),
                ..UpdateVideoRequest::default()
            },
        )
        .await;
    assert!(matches!(unknown_link, Err(RepoError::InvalidReference(_))));
}
