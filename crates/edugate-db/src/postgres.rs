//! PostgreSQL store.
//!
//! Queries are checked at runtime (`query_as` + `bind`) so the workspace
//! builds without a live database. Uniqueness is enforced by the schema and
//! surfaced as [`StoreError::Duplicate`].

use async_trait::async_trait;
use edugate_auth::{OtpPurpose, OtpRecord};
use edugate_models::{
    Course, CourseEnrollee, EnrolledCourse, Enrollment, NewCourse, NewUser, UpdateCourseDto,
    UpdateProfileDto, UserRecord,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::store::{CourseStore, EnrollmentStore, OtpStore, StoreError, UserStore};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, password_hash, role, is_verified, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.is_verified)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(e, "User"))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_users(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<UserRecord>, i64), StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let users = sqlx::query_as::<_, UserRecord>(
            "SELECT * FROM users ORDER BY created_at, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((users, total))
    }

    async fn mark_user_verified(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET is_verified = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &UpdateProfileDto,
    ) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                bio = COALESCE($4, bio),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.bio)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Courses and enrollments cascade through foreign keys. Passcodes are
        // keyed by email, so they are removed explicitly.
        let email =
            sqlx::query_scalar::<_, String>("DELETE FROM users WHERE id = $1 RETURNING email")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(email) = email else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM otp_codes WHERE email = $1")
            .bind(&email)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}

#[async_trait]
impl OtpStore for PgStore {
    async fn upsert_otp(&self, record: OtpRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO otp_codes (email, purpose, code_hash, expires_at, created_at, attempts)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email, purpose)
            DO UPDATE SET code_hash = EXCLUDED.code_hash,
                          expires_at = EXCLUDED.expires_at,
                          created_at = EXCLUDED.created_at,
                          attempts = EXCLUDED.attempts
            "#,
        )
        .bind(&record.email)
        .bind(record.purpose)
        .bind(&record.code_hash)
        .bind(record.expires_at)
        .bind(record.created_at)
        .bind(record.attempts)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_otp(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, StoreError> {
        let record = sqlx::query_as::<_, OtpRecord>(
            r#"
            SELECT email, purpose, code_hash, expires_at, created_at, attempts
            FROM otp_codes
            WHERE email = $1 AND purpose = $2
            "#,
        )
        .bind(email)
        .bind(purpose)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn delete_otp(&self, email: &str, purpose: OtpPurpose) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM otp_codes WHERE email = $1 AND purpose = $2")
            .bind(email)
            .bind(purpose)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn record_otp_failure(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<i32>, StoreError> {
        let attempts = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE otp_codes SET attempts = attempts + 1
            WHERE email = $1 AND purpose = $2
            RETURNING attempts
            "#,
        )
        .bind(email)
        .bind(purpose)
        .fetch_optional(&self.pool)
        .await?;
        Ok(attempts)
    }
}

#[async_trait]
impl CourseStore for PgStore {
    async fn create_course(&self, course: NewCourse) -> Result<Course, StoreError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (title, description, instructor_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.instructor_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(course)
    }

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>, StoreError> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(course)
    }

    async fn list_courses(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Course>, i64), StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.pool)
            .await?;

        let courses = sqlx::query_as::<_, Course>(
            "SELECT * FROM courses ORDER BY created_at, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((courses, total))
    }

    async fn update_course(
        &self,
        id: Uuid,
        changes: &UpdateCourseDto,
    ) -> Result<Option<Course>, StoreError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(course)
    }

    async fn delete_course(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl EnrollmentStore for PgStore {
    async fn enroll(&self, user_id: Uuid, course_id: Uuid) -> Result<Enrollment, StoreError> {
        sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (user_id, course_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(e, "Enrollment"))
    }

    async fn unenroll(&self, user_id: Uuid, course_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM enrollments WHERE user_id = $1 AND course_id = $2")
            .bind(user_id)
            .bind(course_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_enrolled_courses(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<EnrolledCourse>, StoreError> {
        let courses = sqlx::query_as::<_, EnrolledCourse>(
            r#"
            SELECT c.id AS course_id, c.title, c.description, c.instructor_id, e.enrolled_at
            FROM enrollments e
            JOIN courses c ON c.id = e.course_id
            WHERE e.user_id = $1
            ORDER BY e.enrolled_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    async fn list_course_enrollees(
        &self,
        course_id: Uuid,
    ) -> Result<Vec<CourseEnrollee>, StoreError> {
        let enrollees = sqlx::query_as::<_, CourseEnrollee>(
            r#"
            SELECT u.id AS user_id, u.email, u.first_name, u.last_name, e.enrolled_at
            FROM enrollments e
            JOIN users u ON u.id = e.user_id
            WHERE e.course_id = $1
            ORDER BY e.enrolled_at
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(enrollees)
    }
}
