use super::{BlogFilter, Repository, TreatmentFilter, VideoFilter};
use crate::error::{RepoError, RepoResult};
use crate::models::{
    Appointment, AppointmentStatus, BlogPost, BlogStatus, CreateAppointmentRequest,
    CreateBlogPostRequest, CreateDepartmentRequest, CreateTreatmentRequest, CreateVideoRequest,
    DashboardStats, Department, Profile, Treatment, UpdateBlogPostRequest,
    UpdateDepartmentRequest, UpdateProfileRequest, UpdateTreatmentRequest, UpdateVideoRequest,
    Video,
};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction, query_builder::QueryBuilder};
use uuid::Uuid;

const DEPARTMENT_COLUMNS: &str =
    "id, name, slug, description, icon, image_url, is_active, display_order, created_at, updated_at";

const TREATMENT_COLUMNS: &str = "id, title, slug, summary, content, category, department_id, \
     youtube_url, is_active, display_order, meta_title, meta_description, created_at, updated_at";

const BLOG_COLUMNS: &str = "id, title, slug, content, excerpt, image_url, author_id, category, \
     department_id, treatment_id, published_at, status, created_at, updated_at";

const PROFILE_COLUMNS: &str =
    "id, email, full_name, role, is_active, avatar_url, created_at, updated_at";

const APPOINTMENT_COLUMNS: &str = "id, patient_name, email, phone, department_id, treatment_id, \
     preferred_date, message, status, created_at, updated_at";

// Link tables are folded into arrays so a `Video` maps from a single row.
const VIDEO_SELECT: &str = r#"
    SELECT
        v.id, v.title, v.youtube_url, v.thumbnail_url, v.is_active, v.show_global, v.display_order,
        COALESCE((SELECT array_agg(vd.department_id) FROM video_departments vd WHERE vd.video_id = v.id), '{}') AS department_ids,
        COALESCE((SELECT array_agg(vt.treatment_id) FROM video_treatments vt WHERE vt.video_id = v.id), '{}') AS treatment_ids,
        v.created_at, v.updated_at
    FROM videos v
"#;

/// PostgresRepository
///
/// The `Repository` implementation backed by PostgreSQL. Queries are bound at runtime
/// (`query_as::<_, T>`), so the crate builds without a live database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn reorder(&self, table: &'static str, ids: &[Uuid]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from_sqlx)?;
        let sql = format!("UPDATE {table} SET display_order = $1, updated_at = NOW() WHERE id = $2");
        for (position, id) in ids.iter().enumerate() {
            sqlx::query(&sql)
                .bind(position as i32)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(RepoError::from_sqlx)?;
        }
        tx.commit().await.map_err(RepoError::from_sqlx)
    }

    async fn delete_by_id(&self, table: &'static str, id: Uuid) -> RepoResult<bool> {
        let sql = format!("DELETE FROM {table} WHERE id = $1");
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }
}

/// Replaces a video's department and treatment links inside an open transaction.
async fn write_video_links(
    tx: &mut Transaction<'_, Postgres>,
    video_id: Uuid,
    department_ids: Option<&[Uuid]>,
    treatment_ids: Option<&[Uuid]>,
) -> RepoResult<()> {
    if let Some(ids) = department_ids {
        sqlx::query("DELETE FROM video_departments WHERE video_id = $1")
            .bind(video_id)
            .execute(&mut **tx)
            .await
            .map_err(RepoError::from_sqlx)?;
        sqlx::query(
            "INSERT INTO video_departments (video_id, department_id) \
             SELECT $1, UNNEST($2::uuid[]) ON CONFLICT DO NOTHING",
        )
        .bind(video_id)
        .bind(ids)
        .execute(&mut **tx)
        .await
        .map_err(RepoError::from_sqlx)?;
    }
    if let Some(ids) = treatment_ids {
        sqlx::query("DELETE FROM video_treatments WHERE video_id = $1")
            .bind(video_id)
            .execute(&mut **tx)
            .await
            .map_err(RepoError::from_sqlx)?;
        sqlx::query(
            "INSERT INTO video_treatments (video_id, treatment_id) \
             SELECT $1, UNNEST($2::uuid[]) ON CONFLICT DO NOTHING",
        )
        .bind(video_id)
        .bind(ids)
        .execute(&mut **tx)
        .await
        .map_err(RepoError::from_sqlx)?;
    }
    Ok(())
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- DEPARTMENTS ---

    async fn list_departments(&self, include_inactive: bool) -> RepoResult<Vec<Department>> {
        let sql = format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments \
             WHERE ($1 OR is_active = true) ORDER BY display_order ASC, name ASC"
        );
        sqlx::query_as::<_, Department>(&sql)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn get_department(&self, id: Uuid) -> RepoResult<Option<Department>> {
        let sql = format!("SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = $1");
        sqlx::query_as::<_, Department>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn get_department_by_slug(
        &self,
        slug: &str,
        include_inactive: bool,
    ) -> RepoResult<Option<Department>> {
        let sql = format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments \
             WHERE slug = $1 AND ($2 OR is_active = true)"
        );
        sqlx::query_as::<_, Department>(&sql)
            .bind(slug)
            .bind(include_inactive)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn create_department(
        &self,
        slug: String,
        req: CreateDepartmentRequest,
    ) -> RepoResult<Department> {
        let sql = format!(
            r#"
            INSERT INTO departments (id, name, slug, description, icon, image_url, is_active, display_order, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7,
                    COALESCE($8, (SELECT COALESCE(MAX(display_order), -1) + 1 FROM departments)),
                    NOW(), NOW())
            RETURNING {DEPARTMENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Department>(&sql)
            .bind(Uuid::new_v4())
            .bind(req.name)
            .bind(slug)
            .bind(req.description)
            .bind(req.icon)
            .bind(req.image_url)
            .bind(req.is_active.unwrap_or(true))
            .bind(req.display_order)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn update_department(
        &self,
        id: Uuid,
        req: UpdateDepartmentRequest,
    ) -> RepoResult<Option<Department>> {
        let sql = format!(
            r#"
            UPDATE departments
            SET name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                icon = COALESCE($5, icon),
                image_url = COALESCE($6, image_url),
                display_order = COALESCE($7, display_order),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {DEPARTMENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Department>(&sql)
            .bind(id)
            .bind(req.name)
            .bind(req.slug)
            .bind(req.description)
            .bind(req.icon)
            .bind(req.image_url)
            .bind(req.display_order)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn set_department_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> RepoResult<Option<Department>> {
        let sql = format!(
            "UPDATE departments SET is_active = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {DEPARTMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&sql)
            .bind(id)
            .bind(is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn delete_department(&self, id: Uuid) -> RepoResult<bool> {
        self.delete_by_id("departments", id).await
    }

    async fn reorder_departments(&self, ids: &[Uuid]) -> RepoResult<()> {
        self.reorder("departments", ids).await
    }

    // --- TREATMENTS ---

    async fn list_treatments(&self, filter: TreatmentFilter) -> RepoResult<Vec<Treatment>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {TREATMENT_COLUMNS} FROM treatments WHERE 1 = 1"));

        if !filter.include_inactive {
            builder.push(" AND is_active = true");
        }
        if let Some(department_id) = filter.department_id {
            builder.push(" AND department_id = ");
            builder.push_bind(department_id);
        }
        builder.push(" ORDER BY display_order ASC, title ASC");

        builder
            .build_query_as::<Treatment>()
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn get_treatment(&self, id: Uuid) -> RepoResult<Option<Treatment>> {
        let sql = format!("SELECT {TREATMENT_COLUMNS} FROM treatments WHERE id = $1");
        sqlx::query_as::<_, Treatment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn get_treatment_by_slug(
        &self,
        slug: &str,
        include_inactive: bool,
    ) -> RepoResult<Option<Treatment>> {
        let sql = format!(
            "SELECT {TREATMENT_COLUMNS} FROM treatments \
             WHERE slug = $1 AND ($2 OR is_active = true)"
        );
        sqlx::query_as::<_, Treatment>(&sql)
            .bind(slug)
            .bind(include_inactive)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn create_treatment(
        &self,
        slug: String,
        req: CreateTreatmentRequest,
    ) -> RepoResult<Treatment> {
        let sql = format!(
            r#"
            INSERT INTO treatments (id, title, slug, summary, content, category, department_id, youtube_url,
                                    is_active, display_order, meta_title, meta_description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9,
                    COALESCE($10, (SELECT COALESCE(MAX(display_order), -1) + 1 FROM treatments)),
                    $11, $12, NOW(), NOW())
            RETURNING {TREATMENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Treatment>(&sql)
            .bind(Uuid::new_v4())
            .bind(req.title)
            .bind(slug)
            .bind(req.summary)
            .bind(req.content)
            .bind(req.category)
            .bind(req.department_id)
            .bind(req.youtube_url)
            .bind(req.is_active.unwrap_or(true))
            .bind(req.display_order)
            .bind(req.meta_title)
            .bind(req.meta_description)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn update_treatment(
        &self,
        id: Uuid,
        req: UpdateTreatmentRequest,
    ) -> RepoResult<Option<Treatment>> {
        let sql = format!(
            r#"
            UPDATE treatments
            SET title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                summary = COALESCE($4, summary),
                content = COALESCE($5, content),
                category = COALESCE($6, category),
                department_id = COALESCE($7, department_id),
                youtube_url = COALESCE($8, youtube_url),
                display_order = COALESCE($9, display_order),
                meta_title = COALESCE($10, meta_title),
                meta_description = COALESCE($11, meta_description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TREATMENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Treatment>(&sql)
            .bind(id)
            .bind(req.title)
            .bind(req.slug)
            .bind(req.summary)
            .bind(req.content)
            .bind(req.category)
            .bind(req.department_id)
            .bind(req.youtube_url)
            .bind(req.display_order)
            .bind(req.meta_title)
            .bind(req.meta_description)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn set_treatment_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> RepoResult<Option<Treatment>> {
        let sql = format!(
            "UPDATE treatments SET is_active = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {TREATMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Treatment>(&sql)
            .bind(id)
            .bind(is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn delete_treatment(&self, id: Uuid) -> RepoResult<bool> {
        self.delete_by_id("treatments", id).await
    }

    async fn reorder_treatments(&self, ids: &[Uuid]) -> RepoResult<()> {
        self.reorder("treatments", ids).await
    }

    // --- BLOG POSTS ---

    async fn list_blog_posts(&self, filter: BlogFilter) -> RepoResult<Vec<BlogPost>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {BLOG_COLUMNS} FROM blog_posts WHERE 1 = 1"));

        if let Some(status) = filter.status {
            builder.push(" AND status = ");
            builder.push_bind(status.as_str());
        }
        if let Some(category) = filter.category {
            // Case-insensitive equality; the value is not a LIKE pattern.
            builder.push(" AND lower(category) = lower(");
            builder.push_bind(category);
            builder.push(")");
        }
        if let Some(department_id) = filter.department_id {
            builder.push(" AND department_id = ");
            builder.push_bind(department_id);
        }
        if let Some(treatment_id) = filter.treatment_id {
            builder.push(" AND treatment_id = ");
            builder.push_bind(treatment_id);
        }
        builder.push(" ORDER BY published_at DESC NULLS LAST, created_at DESC");
        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit);
        }

        builder
            .build_query_as::<BlogPost>()
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn get_blog_post(&self, id: Uuid) -> RepoResult<Option<BlogPost>> {
        let sql = format!("SELECT {BLOG_COLUMNS} FROM blog_posts WHERE id = $1");
        sqlx::query_as::<_, BlogPost>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn get_blog_post_by_slug(
        &self,
        slug: &str,
        published_only: bool,
    ) -> RepoResult<Option<BlogPost>> {
        let sql = format!(
            "SELECT {BLOG_COLUMNS} FROM blog_posts \
             WHERE slug = $1 AND (NOT $2 OR status = 'published')"
        );
        sqlx::query_as::<_, BlogPost>(&sql)
            .bind(slug)
            .bind(published_only)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn create_blog_post(
        &self,
        slug: String,
        author_id: Uuid,
        req: CreateBlogPostRequest,
    ) -> RepoResult<BlogPost> {
        let status = req.status.unwrap_or_default();
        let sql = format!(
            r#"
            INSERT INTO blog_posts (id, title, slug, content, excerpt, image_url, author_id, category,
                                    department_id, treatment_id, status, published_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                    CASE WHEN $11 = 'published' THEN NOW() ELSE NULL END,
                    NOW(), NOW())
            RETURNING {BLOG_COLUMNS}
            "#
        );
        sqlx::query_as::<_, BlogPost>(&sql)
            .bind(Uuid::new_v4())
            .bind(req.title)
            .bind(slug)
            .bind(req.content)
            .bind(req.excerpt)
            .bind(req.image_url)
            .bind(author_id)
            .bind(req.category)
            .bind(req.department_id)
            .bind(req.treatment_id)
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn update_blog_post(
        &self,
        id: Uuid,
        req: UpdateBlogPostRequest,
    ) -> RepoResult<Option<BlogPost>> {
        let sql = format!(
            r#"
            UPDATE blog_posts
            SET title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                content = COALESCE($4, content),
                excerpt = COALESCE($5, excerpt),
                image_url = COALESCE($6, image_url),
                category = COALESCE($7, category),
                department_id = COALESCE($8, department_id),
                treatment_id = COALESCE($9, treatment_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BLOG_COLUMNS}
            "#
        );
        sqlx::query_as::<_, BlogPost>(&sql)
            .bind(id)
            .bind(req.title)
            .bind(req.slug)
            .bind(req.content)
            .bind(req.excerpt)
            .bind(req.image_url)
            .bind(req.category)
            .bind(req.department_id)
            .bind(req.treatment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn set_blog_status(
        &self,
        id: Uuid,
        status: BlogStatus,
    ) -> RepoResult<Option<BlogPost>> {
        let sql = format!(
            r#"
            UPDATE blog_posts
            SET status = $2,
                published_at = CASE WHEN $2 = 'published' THEN COALESCE(published_at, NOW()) ELSE published_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BLOG_COLUMNS}
            "#
        );
        sqlx::query_as::<_, BlogPost>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn delete_blog_post(&self, id: Uuid) -> RepoResult<bool> {
        self.delete_by_id("blog_posts", id).await
    }

    // --- VIDEOS ---

    async fn list_videos(&self, filter: VideoFilter) -> RepoResult<Vec<Video>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(VIDEO_SELECT);
        builder.push(" WHERE 1 = 1");

        if !filter.include_inactive {
            builder.push(" AND v.is_active = true");
        }
        if filter.global_only {
            builder.push(" AND v.show_global = true");
        }
        match (filter.department_id, filter.treatment_id) {
            (Some(department_id), Some(treatment_id)) => {
                builder.push(
                    " AND (EXISTS (SELECT 1 FROM video_departments vd WHERE vd.video_id = v.id AND vd.department_id = ",
                );
                builder.push_bind(department_id);
                builder.push(
                    ") OR EXISTS (SELECT 1 FROM video_treatments vt WHERE vt.video_id = v.id AND vt.treatment_id = ",
                );
                builder.push_bind(treatment_id);
                builder.push("))");
            }
            (Some(department_id), None) => {
                builder.push(
                    " AND EXISTS (SELECT 1 FROM video_departments vd WHERE vd.video_id = v.id AND vd.department_id = ",
                );
                builder.push_bind(department_id);
                builder.push(")");
            }
            (None, Some(treatment_id)) => {
                builder.push(
                    " AND EXISTS (SELECT 1 FROM video_treatments vt WHERE vt.video_id = v.id AND vt.treatment_id = ",
                );
                builder.push_bind(treatment_id);
                builder.push(")");
            }
            (None, None) => {}
        }
        builder.push(" ORDER BY v.display_order ASC, v.created_at DESC");

        builder
            .build_query_as::<Video>()
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn get_video(&self, id: Uuid) -> RepoResult<Option<Video>> {
        let sql = format!("{VIDEO_SELECT} WHERE v.id = $1");
        sqlx::query_as::<_, Video>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn create_video(&self, req: CreateVideoRequest) -> RepoResult<Video> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await.map_err(RepoError::from_sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO videos (id, title, youtube_url, thumbnail_url, is_active, show_global, display_order, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6,
                    COALESCE($7, (SELECT COALESCE(MAX(display_order), -1) + 1 FROM videos)),
                    NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.youtube_url)
        .bind(&req.thumbnail_url)
        .bind(req.is_active.unwrap_or(true))
        .bind(req.show_global.unwrap_or(false))
        .bind(req.display_order)
        .execute(&mut *tx)
        .await
        .map_err(RepoError::from_sqlx)?;

        write_video_links(
            &mut tx,
            id,
            Some(req.department_ids.as_slice()),
            Some(req.treatment_ids.as_slice()),
        )
        .await?;
        tx.commit().await.map_err(RepoError::from_sqlx)?;

        self.get_video(id)
            .await?
            .ok_or(RepoError::Database(sqlx::Error::RowNotFound))
    }

    async fn update_video(&self, id: Uuid, req: UpdateVideoRequest) -> RepoResult<Option<Video>> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from_sqlx)?;

        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE videos
            SET title = COALESCE($2, title),
                youtube_url = COALESCE($3, youtube_url),
                thumbnail_url = COALESCE($4, thumbnail_url),
                show_global = COALESCE($5, show_global),
                display_order = COALESCE($6, display_order),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.youtube_url)
        .bind(&req.thumbnail_url)
        .bind(req.show_global)
        .bind(req.display_order)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepoError::from_sqlx)?;

        if updated.is_none() {
            tx.rollback().await.map_err(RepoError::from_sqlx)?;
            return Ok(None);
        }

        write_video_links(
            &mut tx,
            id,
            req.department_ids.as_deref(),
            req.treatment_ids.as_deref(),
        )
        .await?;
        tx.commit().await.map_err(RepoError::from_sqlx)?;

        self.get_video(id).await
    }

    async fn set_video_active(&self, id: Uuid, is_active: bool) -> RepoResult<Option<Video>> {
        let result = sqlx::query("UPDATE videos SET is_active = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(is_active)
            .execute(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_video(id).await
    }

    async fn delete_video(&self, id: Uuid) -> RepoResult<bool> {
        self.delete_by_id("videos", id).await
    }

    async fn reorder_videos(&self, ids: &[Uuid]) -> RepoResult<()> {
        self.reorder("videos", ids).await
    }

    // --- PROFILES ---

    async fn get_profile(&self, id: Uuid) -> RepoResult<Option<Profile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn list_profiles(&self) -> RepoResult<Vec<Profile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at ASC");
        sqlx::query_as::<_, Profile>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn create_profile(&self, profile: Profile) -> RepoResult<Profile> {
        let sql = format!(
            "INSERT INTO profiles (id, email, full_name, role, is_active, avatar_url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) RETURNING {PROFILE_COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(profile.id)
            .bind(profile.email)
            .bind(profile.full_name)
            .bind(profile.role)
            .bind(profile.is_active)
            .bind(profile.avatar_url)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        req: UpdateProfileRequest,
    ) -> RepoResult<Option<Profile>> {
        let sql = format!(
            r#"
            UPDATE profiles
            SET full_name = COALESCE($2, full_name),
                role = COALESCE($3, role),
                is_active = COALESCE($4, is_active),
                avatar_url = COALESCE($5, avatar_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .bind(req.full_name)
            .bind(req.role.map(|r| r.as_str()))
            .bind(req.is_active)
            .bind(req.avatar_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn delete_profile(&self, id: Uuid) -> RepoResult<bool> {
        self.delete_by_id("profiles", id).await
    }

    // --- APPOINTMENTS ---

    async fn create_appointment(&self, req: CreateAppointmentRequest) -> RepoResult<Appointment> {
        let sql = format!(
            r#"
            INSERT INTO appointments (id, patient_name, email, phone, department_id, treatment_id,
                                      preferred_date, message, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', NOW(), NOW())
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Appointment>(&sql)
            .bind(Uuid::new_v4())
            .bind(req.patient_name)
            .bind(req.email)
            .bind(req.phone)
            .bind(req.department_id)
            .bind(req.treatment_id)
            .bind(req.preferred_date)
            .bind(req.message)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn list_appointments(
        &self,
        status: Option<AppointmentStatus>,
    ) -> RepoResult<Vec<Appointment>> {
        let sql = format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments \
             WHERE ($1::text IS NULL OR status = $1) ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Appointment>(&sql)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn set_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> RepoResult<Option<Appointment>> {
        let sql = format!(
            "UPDATE appointments SET status = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {APPOINTMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn delete_appointment(&self, id: Uuid) -> RepoResult<bool> {
        self.delete_by_id("appointments", id).await
    }

    // --- DASHBOARD ---

    async fn get_dashboard_stats(&self) -> RepoResult<DashboardStats> {
        sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM departments) AS total_departments,
                (SELECT COUNT(*) FROM departments WHERE is_active = true) AS active_departments,
                (SELECT COUNT(*) FROM treatments) AS total_treatments,
                (SELECT COUNT(*) FROM blog_posts WHERE status = 'published') AS published_posts,
                (SELECT COUNT(*) FROM blog_posts WHERE status = 'draft') AS draft_posts,
                (SELECT COUNT(*) FROM videos) AS total_videos,
                (SELECT COUNT(*) FROM appointments WHERE status = 'pending') AS pending_appointments
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)
    }
}
