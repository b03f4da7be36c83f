//! Role gate.
//!
//! A [`RoleGate`] is fixed when the route is registered and tests plain set
//! membership; there is no role hierarchy. It must run after
//! [`authenticate`](crate::middleware::auth::authenticate), which is how the
//! policy router layers it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use edugate_auth::Role;
use edugate_core::AppError;

use crate::middleware::auth::AuthUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGate {
    allowed: &'static [Role],
}

impl RoleGate {
    pub const fn new(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    pub fn allowed(&self) -> &'static [Role] {
        self.allowed
    }

    /// 401 without an identity, 403 when the role is outside the set.
    pub fn check(&self, user: Option<&AuthUser>) -> Result<(), AppError> {
        let user = user.ok_or_else(AppError::unauthorized)?;
        if self.allowed.contains(&user.role()) {
            Ok(())
        } else {
            Err(AppError::forbidden())
        }
    }
}

pub async fn authorize(State(gate): State<RoleGate>, req: Request, next: Next) -> Response {
    let user = req.extensions().get::<AuthUser>();

    if let Err(err) = gate.check(user) {
        tracing::debug!(
            role = ?user.map(AuthUser::role),
            allowed = ?gate.allowed(),
            status = err.status().as_u16(),
            "role gate rejected request"
        );
        return err.into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use edugate_auth::Claims;
    use edugate_core::ErrorKind;
    use uuid::Uuid;

    fn user(role: Role) -> AuthUser {
        AuthUser(Claims {
            sub: Uuid::new_v4(),
            role,
            iat: 0,
            exp: i64::MAX,
        })
    }

    #[test]
    fn test_admin_gate() {
        let gate = RoleGate::new(&[Role::Admin]);

        assert!(gate.check(Some(&user(Role::Admin))).is_ok());

        let err = gate.check(Some(&user(Role::Student))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        let err = gate.check(Some(&user(Role::Instructor))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[test]
    fn test_missing_identity_is_unauthenticated() {
        let gate = RoleGate::new(&[Role::Admin, Role::Instructor, Role::Student]);
        let err = gate.check(None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_empty_gate_rejects_everyone() {
        let gate = RoleGate::new(&[]);
        for role in Role::ALL {
            assert!(gate.check(Some(&user(role))).is_err());
        }
    }
}
