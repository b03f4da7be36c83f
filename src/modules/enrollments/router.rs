use crate::policy::{PolicyRouter, RouteTableError, Verb};

use super::controller::{course_enrollments, enroll, my_enrollments, unenroll};

pub fn mount_enrollments_routes(router: PolicyRouter) -> Result<PolicyRouter, RouteTableError> {
    router
        .route(Verb::Get, "/api/courses/{id}/enrollments", course_enrollments)?
        .route(Verb::Post, "/api/courses/{id}/enroll", enroll)?
        .route(Verb::Delete, "/api/courses/{id}/enroll", unenroll)?
        .route(Verb::Get, "/api/enrollments/me", my_enrollments)
}
