//! Store traits.
//!
//! Each aggregate gets its own trait; [`Database`] bundles them so the
//! application state can hold a single `Arc<dyn Database>`.

use async_trait::async_trait;
use edugate_auth::{OtpPurpose, OtpRecord};
use edugate_core::AppError;
use edugate_models::{
    Course, CourseEnrollee, EnrolledCourse, Enrollment, NewCourse, NewUser, UpdateCourseDto,
    UpdateProfileDto, UserRecord,
};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("{0} already exists")]
    Duplicate(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Maps unique violations to [`StoreError::Duplicate`] and keeps every
    /// other failure as-is.
    pub(crate) fn from_write(err: sqlx::Error, entity: &'static str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::Duplicate(entity),
            _ => Self::Database(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        if matches!(err, StoreError::Duplicate(_)) {
            AppError::duplicate(err.to_string())
        } else {
            AppError::persistence(err)
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    /// Returns one page ordered by creation time, plus the total count.
    async fn list_users(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<UserRecord>, i64), StoreError>;

    async fn mark_user_verified(&self, id: Uuid) -> Result<(), StoreError>;

    /// Applies the fields that are `Some`. Returns `None` if the user is gone.
    async fn update_profile(
        &self,
        id: Uuid,
        changes: &UpdateProfileDto,
    ) -> Result<Option<UserRecord>, StoreError>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, StoreError>;

    /// Removes the user along with owned courses, enrollments and passcodes.
    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Inserts or replaces the record for `(email, purpose)`.
    async fn upsert_otp(&self, record: OtpRecord) -> Result<(), StoreError>;

    async fn find_otp(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, StoreError>;

    async fn delete_otp(&self, email: &str, purpose: OtpPurpose) -> Result<(), StoreError>;

    /// Counts one wrong guess and returns the new total, or `None` when no
    /// record exists.
    async fn record_otp_failure(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<i32>, StoreError>;
}

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn create_course(&self, course: NewCourse) -> Result<Course, StoreError>;

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>, StoreError>;

    async fn list_courses(&self, limit: i64, offset: i64)
    -> Result<(Vec<Course>, i64), StoreError>;

    async fn update_course(
        &self,
        id: Uuid,
        changes: &UpdateCourseDto,
    ) -> Result<Option<Course>, StoreError>;

    async fn delete_course(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] when already enrolled.
    async fn enroll(&self, user_id: Uuid, course_id: Uuid) -> Result<Enrollment, StoreError>;

    async fn unenroll(&self, user_id: Uuid, course_id: Uuid) -> Result<bool, StoreError>;

    async fn list_enrolled_courses(&self, user_id: Uuid)
    -> Result<Vec<EnrolledCourse>, StoreError>;

    async fn list_course_enrollees(
        &self,
        course_id: Uuid,
    ) -> Result<Vec<CourseEnrollee>, StoreError>;
}

pub trait Database: UserStore + OtpStore + CourseStore + EnrollmentStore {}

impl<T> Database for T where T: UserStore + OtpStore + CourseStore + EnrollmentStore {}
