pub mod form_controller;

pub use form_controller::{FormController, FormView, Operation, RequestStatus};
