//! Store ports and the implementations behind them.
//!
//! Application code only ever sees [`ports::AccountStore`] and
//! [`ports::CountryStore`]; the PostgreSQL and in-memory implementations in
//! [`infrastructure`] are interchangeable behind `Arc<dyn ...>`.

pub mod infrastructure;
pub mod ports;
