use anyhow::anyhow;
use edugate_auth::Role;
use edugate_core::{AppError, ErrorKind, PaginationParams};
use edugate_db::Database;
use edugate_models::{Course, CreateCourseDto, NewCourse, PaginatedCoursesResponse, UpdateCourseDto};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn list_courses(
        db: &dyn Database,
        params: PaginationParams,
    ) -> Result<PaginatedCoursesResponse, AppError> {
        let (courses, total) = db.list_courses(params.limit(), params.offset()).await?;
        Ok(PaginatedCoursesResponse {
            data: courses,
            meta: params.meta(total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_course(db: &dyn Database, course_id: Uuid) -> Result<Course, AppError> {
        db.find_course(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found".to_string()))
    }

    /// Instructors always own what they create. Admins may hand the course to
    /// an instructor through `instructor_id`, otherwise they own it.
    #[instrument(skip(db, auth_user, dto), fields(user_id = %auth_user.user_id()))]
    pub async fn create_course(
        db: &dyn Database,
        auth_user: &AuthUser,
        dto: CreateCourseDto,
    ) -> Result<Course, AppError> {
        let instructor_id = match (auth_user.role(), dto.instructor_id) {
            (Role::Admin, Some(instructor_id)) => {
                Self::ensure_instructor(db, instructor_id).await?;
                instructor_id
            }
            _ => auth_user.user_id(),
        };

        let course = db
            .create_course(NewCourse {
                title: dto.title,
                description: dto.description,
                instructor_id,
            })
            .await?;

        tracing::info!(course_id = %course.id, instructor_id = %instructor_id, "course created");
        Ok(course)
    }

    #[instrument(skip(db, auth_user, dto), fields(user_id = %auth_user.user_id()))]
    pub async fn update_course(
        db: &dyn Database,
        auth_user: &AuthUser,
        course_id: Uuid,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let course = Self::get_course(db, course_id).await?;
        Self::ensure_can_manage(auth_user, &course)?;

        db.update_course(course_id, &dto)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found".to_string()))
    }

    #[instrument(skip(db, auth_user), fields(user_id = %auth_user.user_id()))]
    pub async fn delete_course(
        db: &dyn Database,
        auth_user: &AuthUser,
        course_id: Uuid,
    ) -> Result<(), AppError> {
        let course = Self::get_course(db, course_id).await?;
        Self::ensure_can_manage(auth_user, &course)?;

        if !db.delete_course(course_id).await? {
            return Err(AppError::not_found("Course not found".to_string()));
        }

        tracing::info!(course_id = %course_id, "course deleted");
        Ok(())
    }

    /// Admins manage every course; instructors only their own.
    pub fn ensure_can_manage(auth_user: &AuthUser, course: &Course) -> Result<(), AppError> {
        match auth_user.role() {
            Role::Admin => Ok(()),
            Role::Instructor if course.is_owned_by(auth_user.user_id()) => Ok(()),
            _ => Err(AppError::forbidden()),
        }
    }

    async fn ensure_instructor(db: &dyn Database, user_id: Uuid) -> Result<(), AppError> {
        match db.find_user_by_id(user_id).await? {
            Some(user) if user.role == Role::Instructor => Ok(()),
            _ => Err(AppError::new(
                ErrorKind::Validation,
                anyhow!("instructor_id must reference an instructor"),
            )),
        }
    }
}
