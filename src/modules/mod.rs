//! Feature modules. Each has a `controller` (HTTP handlers with OpenAPI
//! annotations), a `service` (business rules) and a `router` that mounts the
//! handlers through the policy table. Request and response types live in the
//! `edugate-models` crate.

pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod health;
pub mod users;
