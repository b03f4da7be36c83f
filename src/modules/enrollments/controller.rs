use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use edugate_core::AppError;
use edugate_models::{CourseEnrollee, EnrolledCourse, Enrollment};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

use super::service::EnrollmentService;

/// Enroll in a course (student)
#[utoipa::path(
    post,
    path = "/api/courses/{id}/enroll",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 201, description = "Enrolled", body = Enrollment),
        (status = 403, description = "Caller is not a student", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Already enrolled", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id()))]
pub async fn enroll(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = EnrollmentService::enroll(state.db.as_ref(), auth_user.user_id(), id).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// Leave a course (student)
#[utoipa::path(
    delete,
    path = "/api/courses/{id}/enroll",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Unenrolled"),
        (status = 404, description = "Not enrolled", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id()))]
pub async fn unenroll(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    EnrollmentService::unenroll(state.db.as_ref(), auth_user.user_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Courses the caller is enrolled in (student)
#[utoipa::path(
    get,
    path = "/api/enrollments/me",
    responses(
        (status = 200, description = "Enrolled courses", body = Vec<EnrolledCourse>),
        (status = 403, description = "Caller is not a student", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
#[instrument(skip_all, fields(user_id = %auth_user.user_id()))]
pub async fn my_enrollments(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<EnrolledCourse>>, AppError> {
    Ok(Json(
        EnrollmentService::my_courses(state.db.as_ref(), auth_user.user_id()).await?,
    ))
}

/// Students enrolled in a course (admin or owning instructor)
#[utoipa::path(
    get,
    path = "/api/courses/{id}/enrollments",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course roster", body = Vec<CourseEnrollee>),
        (status = 403, description = "Caller does not manage this course", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state, auth_user))]
pub async fn course_enrollments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CourseEnrollee>>, AppError> {
    Ok(Json(
        EnrollmentService::roster(state.db.as_ref(), &auth_user, id).await?,
    ))
}
