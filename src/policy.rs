//! Declarative route access table.
//!
//! Every API route is declared once in [`ROUTE_POLICIES`] together with who
//! may call it. Routes are mounted through [`PolicyRouter`], which looks up
//! the declared [`Access`] and layers the matching gates. Mounting a route
//! with no declaration, mounting one twice, or leaving a declaration
//! unmounted fails router construction.

use std::collections::HashSet;
use std::fmt;

use axum::{
    Router,
    handler::Handler,
    middleware::from_fn_with_state,
    routing::{MethodFilter, on},
};
use edugate_auth::Role;

use crate::middleware::auth::authenticate;
use crate::middleware::role::{RoleGate, authorize};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    fn filter(self) -> MethodFilter {
        match self {
            Verb::Get => MethodFilter::GET,
            Verb::Post => MethodFilter::POST,
            Verb::Put => MethodFilter::PUT,
            Verb::Patch => MethodFilter::PATCH,
            Verb::Delete => MethodFilter::DELETE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any valid token, whatever the role.
    Authenticated,
    Roles(&'static [Role]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePolicy {
    pub verb: Verb,
    pub path: &'static str,
    pub access: Access,
}

const fn policy(verb: Verb, path: &'static str, access: Access) -> RoutePolicy {
    RoutePolicy { verb, path, access }
}

const ADMIN: &[Role] = &[Role::Admin];
const STAFF: &[Role] = &[Role::Admin, Role::Instructor];
const STUDENT: &[Role] = &[Role::Student];

pub const ROUTE_POLICIES: &[RoutePolicy] = &[
    policy(Verb::Get, "/health", Access::Public),
    // auth
    policy(Verb::Post, "/api/auth/register", Access::Public),
    policy(Verb::Post, "/api/auth/login", Access::Public),
    policy(Verb::Post, "/api/auth/verify-otp", Access::Public),
    policy(Verb::Post, "/api/auth/resend-otp", Access::Public),
    policy(Verb::Post, "/api/auth/forgot-password", Access::Public),
    policy(Verb::Post, "/api/auth/reset-password", Access::Public),
    // users
    policy(Verb::Get, "/api/users/me", Access::Authenticated),
    policy(Verb::Put, "/api/users/me", Access::Authenticated),
    policy(Verb::Post, "/api/users/me/password", Access::Authenticated),
    policy(Verb::Get, "/api/users", Access::Roles(ADMIN)),
    policy(Verb::Get, "/api/users/{id}", Access::Roles(ADMIN)),
    policy(Verb::Delete, "/api/users/{id}", Access::Roles(ADMIN)),
    // courses; ownership is checked in the handler
    policy(Verb::Get, "/api/courses", Access::Authenticated),
    policy(Verb::Post, "/api/courses", Access::Roles(STAFF)),
    policy(Verb::Get, "/api/courses/{id}", Access::Authenticated),
    policy(Verb::Put, "/api/courses/{id}", Access::Roles(STAFF)),
    policy(Verb::Delete, "/api/courses/{id}", Access::Roles(STAFF)),
    // enrollments
    policy(Verb::Get, "/api/courses/{id}/enrollments", Access::Roles(STAFF)),
    policy(Verb::Post, "/api/courses/{id}/enroll", Access::Roles(STUDENT)),
    policy(Verb::Delete, "/api/courses/{id}/enroll", Access::Roles(STUDENT)),
    policy(Verb::Get, "/api/enrollments/me", Access::Roles(STUDENT)),
];

pub fn policy_for(verb: Verb, path: &str) -> Option<&'static RoutePolicy> {
    ROUTE_POLICIES
        .iter()
        .find(|p| p.verb == verb && p.path == path)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteTableError {
    #[error("no access policy declared for {verb} {path}")]
    Undeclared { verb: Verb, path: String },

    #[error("{verb} {path} mounted more than once")]
    AlreadyMounted { verb: Verb, path: &'static str },

    #[error("declared routes never mounted: {}", .0.join(", "))]
    Unmounted(Vec<String>),
}

/// Router builder that only accepts routes declared in [`ROUTE_POLICIES`].
pub struct PolicyRouter {
    router: Router<AppState>,
    state: AppState,
    mounted: HashSet<(Verb, &'static str)>,
}

impl PolicyRouter {
    pub fn new(state: AppState) -> Self {
        Self {
            router: Router::new(),
            state,
            mounted: HashSet::new(),
        }
    }

    pub fn route<H, T>(mut self, verb: Verb, path: &str, handler: H) -> Result<Self, RouteTableError>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        let policy = policy_for(verb, path).ok_or_else(|| RouteTableError::Undeclared {
            verb,
            path: path.to_string(),
        })?;

        if !self.mounted.insert((verb, policy.path)) {
            return Err(RouteTableError::AlreadyMounted {
                verb,
                path: policy.path,
            });
        }

        let method_router = on(verb.filter(), handler);
        // Layers added later run first: authenticate wraps authorize.
        let method_router = match policy.access {
            Access::Public => method_router,
            Access::Authenticated => method_router
                .route_layer(from_fn_with_state(self.state.clone(), authenticate)),
            Access::Roles(roles) => method_router
                .route_layer(from_fn_with_state(RoleGate::new(roles), authorize))
                .route_layer(from_fn_with_state(self.state.clone(), authenticate)),
        };

        self.router = self.router.route(policy.path, method_router);
        Ok(self)
    }

    /// Fails if any declared policy was never mounted.
    pub fn finish(self) -> Result<Router<AppState>, RouteTableError> {
        let missing: Vec<String> = ROUTE_POLICIES
            .iter()
            .filter(|p| !self.mounted.contains(&(p.verb, p.path)))
            .map(|p| format!("{} {}", p.verb, p.path))
            .collect();

        if !missing.is_empty() {
            return Err(RouteTableError::Unmounted(missing));
        }

        Ok(self.router)
    }
}
