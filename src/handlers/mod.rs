pub mod form_handler;
pub mod response_handler;

pub use form_handler::{get_form, health_check};
pub use response_handler::{
    delete_response, export_responses, get_response, list_responses, submit_response,
};
