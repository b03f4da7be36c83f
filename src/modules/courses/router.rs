use crate::policy::{PolicyRouter, RouteTableError, Verb};

use super::controller::{create_course, delete_course, get_course, list_courses, update_course};

pub fn mount_courses_routes(router: PolicyRouter) -> Result<PolicyRouter, RouteTableError> {
    router
        .route(Verb::Get, "/api/courses", list_courses)?
        .route(Verb::Post, "/api/courses", create_course)?
        .route(Verb::Get, "/api/courses/{id}", get_course)?
        .route(Verb::Put, "/api/courses/{id}", update_course)?
        .route(Verb::Delete, "/api/courses/{id}", delete_course)
}
