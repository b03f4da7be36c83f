//! Registration, login, email verification and password reset.

pub mod controller;
pub mod router;
pub mod service;
