use crate::policy::{PolicyRouter, RouteTableError, Verb};

use super::controller::{forgot_password, login, register, resend_otp, reset_password, verify_otp};

pub fn mount_auth_routes(router: PolicyRouter) -> Result<PolicyRouter, RouteTableError> {
    router
        .route(Verb::Post, "/api/auth/register", register)?
        .route(Verb::Post, "/api/auth/login", login)?
        .route(Verb::Post, "/api/auth/verify-otp", verify_otp)?
        .route(Verb::Post, "/api/auth/resend-otp", resend_otp)?
        .route(Verb::Post, "/api/auth/forgot-password", forgot_password)?
        .route(Verb::Post, "/api/auth/reset-password", reset_password)
}
