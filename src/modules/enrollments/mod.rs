//! Student enrollments and course rosters.

pub mod controller;
pub mod router;
pub mod service;
