//! # EduGate Models
//!
//! Domain models and DTOs for the EduGate API.
//!
//! - [`auth`]: Registration, login, OTP and password reset payloads
//! - [`users`]: User entities and profile DTOs
//! - [`courses`]: Course entities and DTOs
//! - [`enrollments`]: Enrollment entities and joined views
//!
//! Request DTOs derive [`validator::Validate`] and are extracted through the
//! server's `ValidatedJson`. Row types derive [`sqlx::FromRow`].

pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod users;

pub use auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    ResendOtpRequest, ResetPasswordRequest, VerifyOtpRequest,
};
pub use courses::{Course, CreateCourseDto, NewCourse, PaginatedCoursesResponse, UpdateCourseDto};
pub use enrollments::{CourseEnrollee, EnrolledCourse, Enrollment};
pub use users::{
    ChangePasswordDto, NewUser, PaginatedUsersResponse, UpdateProfileDto, User, UserRecord,
    normalize_email,
};
