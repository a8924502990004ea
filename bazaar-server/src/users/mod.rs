pub mod account_handlers;
pub mod auth;
pub mod requests;
