use edugate_core::AppError;
use edugate_db::Database;
use edugate_models::{CourseEnrollee, EnrolledCourse, Enrollment};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::courses::service::CourseService;

pub struct EnrollmentService;

impl EnrollmentService {
    /// Fails with 409 when the student is already enrolled.
    #[instrument(skip(db))]
    pub async fn enroll(
        db: &dyn Database,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<Enrollment, AppError> {
        CourseService::get_course(db, course_id).await?;
        let enrollment = db.enroll(student_id, course_id).await?;

        tracing::info!(enrollment_id = %enrollment.id, "student enrolled");
        Ok(enrollment)
    }

    #[instrument(skip(db))]
    pub async fn unenroll(
        db: &dyn Database,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<(), AppError> {
        if !db.unenroll(student_id, course_id).await? {
            return Err(AppError::not_found("Enrollment not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn my_courses(
        db: &dyn Database,
        student_id: Uuid,
    ) -> Result<Vec<EnrolledCourse>, AppError> {
        Ok(db.list_enrolled_courses(student_id).await?)
    }

    /// Roster for a course; same ownership rule as editing the course.
    #[instrument(skip(db, auth_user), fields(user_id = %auth_user.user_id()))]
    pub async fn roster(
        db: &dyn Database,
        auth_user: &AuthUser,
        course_id: Uuid,
    ) -> Result<Vec<CourseEnrollee>, AppError> {
        let course = CourseService::get_course(db, course_id).await?;
        CourseService::ensure_can_manage(auth_user, &course)?;
        Ok(db.list_course_enrollees(course_id).await?)
    }
}
