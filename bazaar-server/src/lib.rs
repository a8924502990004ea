//! # Bazaar Server
//!
//! HTTP front of the Bazaar account service.
//!
//! ## Overview
//!
//! - **Signup / login**: account creation with validated payloads and
//!   short-lived HS256 bearer tokens
//! - **Account mutations**: email, phone, country and password updates plus
//!   soft delete, all behind the bearer-token gate
//! - **Countries**: read-only listing of the reference data
//!
//! Every response body is `{"Data": ...}` or `{"Error": "..."}`. A panic in
//! any handler is caught at the outermost layer and answered with a generic
//! 500 while the server keeps serving.

pub mod countries;
pub mod infra;
pub mod routes;
pub mod users;
