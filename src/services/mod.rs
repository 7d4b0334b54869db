pub mod enrollment_service;

pub use enrollment_service::{EnrollmentService, LIST_LIMIT};
