use crate::handler::EnrollmentHandler;

#[derive(Clone)]
pub struct AppState {
    pub handler: EnrollmentHandler,
}
