// 🧭 Use Cases - Entities + repositories wired into application operations
//
// Entities validate, repositories store, this layer orders the two and
// logs what happened. Transition operations persist the mutated state even
// when re-validation fails, because the entity does not roll back.

use crate::base::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::entities::{PixKey, PixKeyKind, Transaction, TransactionStatus};
use crate::repository::{PixKeyRepository, RepositoryError, TransactionRepository};
use crate::validation::{ValidationError, ValidationResult};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UseCaseError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl UseCaseError {
    /// Stable snake_case code for reports
    pub fn code(&self) -> &'static str {
        match self {
            UseCaseError::Validation(e) => e.code(),
            UseCaseError::Repository(e) => e.code(),
        }
    }
}

pub type UseCaseResult<T> = Result<T, UseCaseError>;

pub type SharedIds = Arc<dyn IdGenerator + Send + Sync>;
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// Result of a status transition: the stored transaction and whatever the
/// post-mutation validation said
#[derive(Debug, Clone)]
pub struct Transition {
    pub transaction: Transaction,
    pub validation: ValidationResult,
}

impl Transition {
    pub fn is_valid(&self) -> bool {
        self.validation.is_ok()
    }
}

// ============================================================================
// PIX KEY USE CASE
// ============================================================================

#[derive(Clone)]
pub struct PixKeyUseCase {
    keys: Arc<dyn PixKeyRepository>,
    ids: SharedIds,
    clock: SharedClock,
}

impl PixKeyUseCase {
    pub fn new(keys: Arc<dyn PixKeyRepository>) -> Self {
        Self::with_capabilities(keys, Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    pub fn with_capabilities(keys: Arc<dyn PixKeyRepository>, ids: SharedIds, clock: SharedClock) -> Self {
        PixKeyUseCase { keys, ids, clock }
    }

    /// Bind `key` of `kind` to an already-stored account
    pub fn register_key(&self, kind: &str, key: &str, account_id: &str) -> UseCaseResult<Arc<PixKey>> {
        let account = self.keys.find_account(account_id)?;
        let pix_key = PixKey::new_with(&*self.ids, &*self.clock, kind, account, key)?;
        let stored = self.keys.register(pix_key)?;

        info!(id = %stored.id(), kind = %stored.kind, account_id = %stored.account_id, "pix key registered");
        Ok(stored)
    }

    pub fn find_key(&self, kind: &str, key: &str) -> UseCaseResult<Arc<PixKey>> {
        let kind = kind.parse::<PixKeyKind>()?;
        Ok(self.keys.find_by_kind_and_key(kind, key)?)
    }
}

// ============================================================================
// TRANSACTION USE CASE
// ============================================================================

#[derive(Clone)]
pub struct TransactionUseCase {
    transactions: Arc<dyn TransactionRepository>,
    keys: Arc<dyn PixKeyRepository>,
    ids: SharedIds,
    clock: SharedClock,
}

impl TransactionUseCase {
    pub fn new(transactions: Arc<dyn TransactionRepository>, keys: Arc<dyn PixKeyRepository>) -> Self {
        Self::with_capabilities(transactions, keys, Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    pub fn with_capabilities(
        transactions: Arc<dyn TransactionRepository>,
        keys: Arc<dyn PixKeyRepository>,
        ids: SharedIds,
        clock: SharedClock,
    ) -> Self {
        TransactionUseCase { transactions, keys, ids, clock }
    }

    /// Create and store a pending transfer to the account behind
    /// `(pix_key_kind_to, pix_key_to)`
    pub fn register(
        &self,
        account_from_id: &str,
        amount: f64,
        pix_key_to: &str,
        pix_key_kind_to: &str,
        description: &str,
    ) -> UseCaseResult<Transaction> {
        let account_from = self.keys.find_account(account_from_id)?;
        let kind = pix_key_kind_to.parse::<PixKeyKind>()?;
        let pix_key = self.keys.find_by_kind_and_key(kind, pix_key_to)?;

        let transaction = Transaction::new_with(
            &*self.ids,
            &*self.clock,
            account_from,
            amount,
            pix_key,
            description,
        )?;
        self.transactions.register(&transaction)?;

        info!(id = %transaction.id(), amount, to = %pix_key_to, "transaction registered");
        Ok(transaction)
    }

    pub fn complete(&self, id: &str) -> UseCaseResult<Transition> {
        self.transition(id, |tx, clock| tx.complete_with(clock))
    }

    pub fn confirm(&self, id: &str) -> UseCaseResult<Transition> {
        self.transition(id, |tx, clock| tx.confirm_with(clock))
    }

    pub fn cancel(&self, id: &str, description: &str) -> UseCaseResult<Transition> {
        self.transition(id, |tx, clock| tx.cancel_with(clock, description))
    }

    /// Settlement failure: the one place the `error` status is assigned
    pub fn fail(&self, id: &str, reason: &str) -> UseCaseResult<Transition> {
        self.transition(id, |tx, clock| {
            tx.status = TransactionStatus::Error;
            tx.cancel_description = reason.to_string();
            tx.base.touch(clock);
            tx.validate()
        })
    }

    pub fn find(&self, id: &str) -> UseCaseResult<Transaction> {
        Ok(self.transactions.find(id)?)
    }

    fn transition<F>(&self, id: &str, apply: F) -> UseCaseResult<Transition>
    where
        F: FnOnce(&mut Transaction, &dyn Clock) -> ValidationResult,
    {
        let mut transaction = self.transactions.find(id)?;
        let validation = apply(&mut transaction, &*self.clock);
        self.transactions.save(&transaction)?;

        let terminal = transaction.status.is_terminal();
        match &validation {
            Ok(()) => info!(id = %id, status = %transaction.status, terminal, "transaction updated"),
            Err(e) => warn!(
                id = %id,
                status = %transaction.status,
                terminal,
                error = %e,
                "transaction updated with validation error"
            ),
        }

        Ok(Transition { transaction, validation })
    }
}

// ============================================================================
// TESTS
// ============================================================================
