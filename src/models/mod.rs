pub mod enrollment;
pub mod request;

pub use enrollment::{Enrollment, EnrollmentStatus};
pub use request::{EnrollmentRequest, FieldViolation};
