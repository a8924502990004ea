pub mod app_state;
pub mod boundary;
pub mod errors;
pub mod extract;
pub mod response;
