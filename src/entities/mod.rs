// Entity Models
//
// Each entity has:
// - A `Base` (stable id, created_at, updated_at) embedded by composition
// - An ordered rule table, re-run after construction and every mutation
// - Shared `Arc` references to the entities it points at

pub mod bank;
pub mod account;
pub mod pix_key;
pub mod transaction;

pub use bank::Bank;
pub use account::Account;
pub use pix_key::{PixKey, PixKeyKind, PixKeyStatus};
pub use transaction::{Transaction, TransactionStatus};
