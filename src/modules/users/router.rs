use crate::policy::{PolicyRouter, RouteTableError, Verb};

use super::controller::{
    change_password, delete_user, get_profile, get_user, list_users, update_profile,
};

pub fn mount_users_routes(router: PolicyRouter) -> Result<PolicyRouter, RouteTableError> {
    router
        .route(Verb::Get, "/api/users/me", get_profile)?
        .route(Verb::Put, "/api/users/me", update_profile)?
        .route(Verb::Post, "/api/users/me/password", change_password)?
        .route(Verb::Get, "/api/users", list_users)?
        .route(Verb::Get, "/api/users/{id}", get_user)?
        .route(Verb::Delete, "/api/users/{id}", delete_user)
}
