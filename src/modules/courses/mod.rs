//! Course catalogue. Instructors manage the courses they own; admins manage
//! all of them.

pub mod controller;
pub mod router;
pub mod service;
