//! Course models and DTOs.

use chrono::{DateTime, Utc};
use edugate_core::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Owning instructor. Only this user (or an admin) may modify the course.
    pub instructor_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.instructor_id == user_id
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 200))]
    #[schema(example = "Introduction to Rust")]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    /// Admins may assign the course to an instructor. Ignored for instructors,
    /// who always own the courses they create.
    pub instructor_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: Option<String>,
    pub instructor_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedCoursesResponse {
    pub data: Vec<Course>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_course_validation() {
        let dto = CreateCourseDto {
            title: String::new(),
            description: None,
            instructor_id: None,
        };
        assert!(dto.validate().is_err());

        let dto = CreateCourseDto {
            title: "Ownership and Borrowing".to_string(),
            description: Some("Week one".to_string()),
            instructor_id: None,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_is_owned_by() {
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let course = Course {
            id: Uuid::new_v4(),
            title: "Traits".to_string(),
            description: None,
            instructor_id: owner,
            created_at: now,
            updated_at: now,
        };
        assert!(course.is_owned_by(owner));
        assert!(!course.is_owned_by(Uuid::new_v4()));
    }
}
