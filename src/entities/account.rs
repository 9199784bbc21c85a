// 💳 Account Entity - Stable identity with Bank relationship
//
// "Owner name is a VALUE, Account UUID is IDENTITY"
//
// - Foreign key to Bank (bank_id) plus a shared in-memory reference
// - Source of funds for transfers, target of pix keys

use crate::base::{Base, Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::entities::bank::Bank;
use crate::validation::{required, Rule, RuleSet, ValidationError, ValidationResult};
use serde::Serialize;
use std::sync::Arc;

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

/// Account Entity
///
/// Identity: UUID (never changes)
/// Values: owner_name, number
/// Relationship: bank_id → Bank entity (foreign key)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    #[serde(flatten)]
    pub base: Base,

    /// Account holder (e.g. "Maria Silva")
    pub owner_name: String,

    /// Account number inside the bank (e.g. "1234-5")
    pub number: String,

    /// Bank ID (foreign key to Bank entity)
    pub bank_id: String,

    #[serde(skip)]
    pub bank: Arc<Bank>,
}

const ACCOUNT_RULES: RuleSet<Account> = RuleSet::new(&[
    Rule { name: "id_required", check: |a: &Account| required("id", &a.base.id) },
    Rule { name: "owner_name_required", check: |a: &Account| required("owner_name", &a.owner_name) },
    Rule { name: "number_required", check: |a: &Account| required("number", &a.number) },
    Rule { name: "bank_id_required", check: |a: &Account| required("bank_id", &a.bank_id) },
]);

impl Account {
    /// Create new account entity with UUID
    pub fn new(bank: Arc<Bank>, owner_name: &str, number: &str) -> Result<Self, ValidationError> {
        Self::new_with(&UuidGenerator, &SystemClock, bank, owner_name, number)
    }

    pub fn new_with(
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
        bank: Arc<Bank>,
        owner_name: &str,
        number: &str,
    ) -> Result<Self, ValidationError> {
        let account = Account {
            base: Base::new(ids, clock),
            owner_name: owner_name.to_string(),
            number: number.to_string(),
            bank_id: bank.id().to_string(),
            bank,
        };

        account.validate()?;
        Ok(account)
    }

    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn validate(&self) -> ValidationResult {
        ACCOUNT_RULES.validate(self)
    }
}

// ============================================================================
// TESTS
// ============================================================================
