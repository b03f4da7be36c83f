//! Request gates.
//!
//! - [`auth`]: Bearer token verification and the [`auth::AuthUser`] identity
//! - [`role`]: Role membership check parameterized per route
//!
//! # Order
//!
//! The policy router layers `authenticate` outside `authorize`, so a request
//! moves through `Unauthenticated -> Authenticated -> Authorized -> handler`
//! and stops at the first gate that rejects it:
//!
//! ```text
//! no/invalid token      -> 401 {"error":"Unauthorized","code":"unauthorized"}
//! role not in route set -> 403 {"error":"Forbidden","code":"forbidden"}
//! ```
//!
//! Handlers read the identity with the `AuthUser` extractor:
//!
//! ```ignore
//! async fn get_profile(auth_user: AuthUser) -> Result<Json<User>, AppError> {
//!     let user_id = auth_user.user_id();
//!     // ...
//! }
//! ```

pub mod auth;
pub mod role;
