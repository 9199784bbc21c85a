// In-memory repositories
//
// Same shape as an entity registry: shared state behind `Arc<RwLock<..>>`,
// cloned handles see the same data. Nothing is written to disk.

use super::{PixKeyRepository, RepositoryError, RepositoryResult, TransactionRepository};
use crate::entities::{Account, Bank, PixKey, PixKeyKind, Transaction};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

fn read<T>(lock: &RwLock<T>) -> RepositoryResult<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| RepositoryError::Poisoned)
}

fn write<T>(lock: &RwLock<T>) -> RepositoryResult<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| RepositoryError::Poisoned)
}

// ============================================================================
// PIX KEY REPOSITORY
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryPixKeyRepository {
    banks: Arc<RwLock<HashMap<String, Arc<Bank>>>>,
    accounts: Arc<RwLock<HashMap<String, Arc<Account>>>>,
    /// Keyed by (kind, key value)
    keys: Arc<RwLock<HashMap<(PixKeyKind, String), Arc<PixKey>>>>,
}

impl InMemoryPixKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_count(&self) -> RepositoryResult<usize> {
        Ok(read(&self.keys)?.len())
    }

    pub fn account_count(&self) -> RepositoryResult<usize> {
        Ok(read(&self.accounts)?.len())
    }

    /// Find an account by bank and account number
    pub fn find_account_by_number(&self, bank_id: &str, number: &str) -> RepositoryResult<Arc<Account>> {
        read(&self.accounts)?
            .values()
            .find(|a| a.bank_id == bank_id && a.number == number)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "account",
                id: format!("{}/{}", bank_id, number),
            })
    }
}

impl PixKeyRepository for InMemoryPixKeyRepository {
    fn register(&self, pix_key: PixKey) -> RepositoryResult<Arc<PixKey>> {
        if !read(&self.accounts)?.contains_key(&pix_key.account_id) {
            return Err(RepositoryError::NotFound {
                entity: "account",
                id: pix_key.account_id.clone(),
            });
        }

        let mut keys = write(&self.keys)?;
        let lookup = (pix_key.kind, pix_key.key.clone());
        if keys.contains_key(&lookup) {
            return Err(RepositoryError::Duplicate {
                entity: "pix key",
                id: format!("{}:{}", pix_key.kind, pix_key.key),
            });
        }

        debug!(id = %pix_key.id(), kind = %pix_key.kind, "pix key stored");
        let pix_key = Arc::new(pix_key);
        keys.insert(lookup, pix_key.clone());
        Ok(pix_key)
    }

    fn find_by_kind_and_key(&self, kind: PixKeyKind, key: &str) -> RepositoryResult<Arc<PixKey>> {
        read(&self.keys)?
            .get(&(kind, key.to_string()))
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "pix key",
                id: format!("{}:{}", kind, key),
            })
    }

    fn add_bank(&self, bank: Arc<Bank>) -> RepositoryResult<()> {
        let mut banks = write(&self.banks)?;
        if banks.contains_key(bank.id()) {
            return Err(RepositoryError::Duplicate {
                entity: "bank",
                id: bank.id().to_string(),
            });
        }

        debug!(id = %bank.id(), code = %bank.code, "bank stored");
        banks.insert(bank.id().to_string(), bank);
        Ok(())
    }

    fn add_account(&self, account: Arc<Account>) -> RepositoryResult<()> {
        if !read(&self.banks)?.contains_key(&account.bank_id) {
            return Err(RepositoryError::NotFound {
                entity: "bank",
                id: account.bank_id.clone(),
            });
        }

        let mut accounts = write(&self.accounts)?;
        if accounts.contains_key(account.id()) {
            return Err(RepositoryError::Duplicate {
                entity: "account",
                id: account.id().to_string(),
            });
        }

        debug!(id = %account.id(), bank_id = %account.bank_id, "account stored");
        accounts.insert(account.id().to_string(), account);
        Ok(())
    }

    fn find_account(&self, id: &str) -> RepositoryResult<Arc<Account>> {
        read(&self.accounts)?
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "account",
                id: id.to_string(),
            })
    }
}

// ============================================================================
// TRANSACTION REPOSITORY
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryTransactionRepository {
    transactions: Arc<RwLock<HashMap<String, Transaction>>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        Ok(read(&self.transactions)?.len())
    }
}

impl TransactionRepository for InMemoryTransactionRepository {
    fn register(&self, transaction: &Transaction) -> RepositoryResult<()> {
        let mut transactions = write(&self.transactions)?;
        if transactions.contains_key(transaction.id()) {
            return Err(RepositoryError::Duplicate {
                entity: "transaction",
                id: transaction.id().to_string(),
            });
        }

        debug!(id = %transaction.id(), status = %transaction.status, "transaction stored");
        transactions.insert(transaction.id().to_string(), transaction.clone());
        Ok(())
    }

    fn save(&self, transaction: &Transaction) -> RepositoryResult<()> {
        let mut transactions = write(&self.transactions)?;
        match transactions.get_mut(transaction.id()) {
            Some(slot) => {
                debug!(id = %transaction.id(), status = %transaction.status, "transaction saved");
                *slot = transaction.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound {
                entity: "transaction",
                id: transaction.id().to_string(),
            }),
        }
    }

    fn find(&self, id: &str) -> RepositoryResult<Transaction> {
        read(&self.transactions)?
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "transaction",
                id: id.to_string(),
            })
    }
}

// ============================================================================
// TESTS
// ============================================================================
