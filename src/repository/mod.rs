// 🗄️ Repository Contracts
//
// The domain defines the contracts, storage adapters implement them.
// `memory` ships an in-process implementation of both.

pub mod memory;

use crate::entities::{Account, Bank, PixKey, PixKeyKind, Transaction};
use std::sync::Arc;
use thiserror::Error;

pub use memory::{InMemoryPixKeyRepository, InMemoryTransactionRepository};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {id}")]
    Duplicate { entity: &'static str, id: String },

    /// The stored record exists but disagrees with what the caller expected
    #[error("{entity} conflict on {id}: {detail}")]
    Conflict { entity: &'static str, id: String, detail: String },

    #[error("repository lock poisoned")]
    Poisoned,
}

impl RepositoryError {
    pub fn code(&self) -> &'static str {
        match self {
            RepositoryError::NotFound { .. } => "not_found",
            RepositoryError::Duplicate { .. } => "duplicate",
            RepositoryError::Conflict { .. } => "conflict",
            RepositoryError::Poisoned => "poisoned",
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage for keys and the banks/accounts they resolve to
pub trait PixKeyRepository: Send + Sync {
    /// Store a new key. A `(kind, key)` pair is unique.
    fn register(&self, pix_key: PixKey) -> RepositoryResult<Arc<PixKey>>;

    fn find_by_kind_and_key(&self, kind: PixKeyKind, key: &str) -> RepositoryResult<Arc<PixKey>>;

    fn add_bank(&self, bank: Arc<Bank>) -> RepositoryResult<()>;

    fn add_account(&self, account: Arc<Account>) -> RepositoryResult<()>;

    fn find_account(&self, id: &str) -> RepositoryResult<Arc<Account>>;
}

/// Storage for transfers
pub trait TransactionRepository: Send + Sync {
    /// Insert a transaction that does not exist yet
    fn register(&self, transaction: &Transaction) -> RepositoryResult<()>;

    /// Overwrite an existing transaction
    fn save(&self, transaction: &Transaction) -> RepositoryResult<()>;

    fn find(&self, id: &str) -> RepositoryResult<Transaction>;
}
