pub mod account;
pub mod country;
pub mod ledger;

pub use account::Account;
pub use country::Country;
pub use ledger::{Ledger, LifecycleState};
