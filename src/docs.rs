use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use edugate_auth::Role;
use edugate_core::{PaginationMeta, PaginationParams};
use edugate_models::{
    ChangePasswordDto, Course, CourseEnrollee, CreateCourseDto, EnrolledCourse, Enrollment,
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, PaginatedCoursesResponse,
    PaginatedUsersResponse, RegisterRequest, ResendOtpRequest, ResetPasswordRequest,
    UpdateCourseDto, UpdateProfileDto, User, VerifyOtpRequest,
};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::health::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::health,
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::verify_otp,
        crate::modules::auth::controller::resend_otp,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
        crate::modules::users::controller::change_password,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::delete_user,
        crate::modules::courses::controller::list_courses,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::enrollments::controller::enroll,
        crate::modules::enrollments::controller::unenroll,
        crate::modules::enrollments::controller::my_enrollments,
        crate::modules::enrollments::controller::course_enrollments,
    ),
    components(
        schemas(
            Role,
            User,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            VerifyOtpRequest,
            ResendOtpRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            MessageResponse,
            UpdateProfileDto,
            ChangePasswordDto,
            PaginatedUsersResponse,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            PaginatedCoursesResponse,
            Enrollment,
            EnrolledCourse,
            CourseEnrollee,
            PaginationMeta,
            PaginationParams,
            HealthResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Authentication", description = "Registration, email verification, login and password reset"),
        (name = "Users", description = "Profile and user administration"),
        (name = "Courses", description = "Course catalogue management"),
        (name = "Enrollments", description = "Student enrollments and course rosters")
    ),
    info(
        title = "EduGate API",
        version = "0.1.0",
        description = "Authentication and role-based access control for an e-learning backend.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
