// 🏦 Bank Entity - Participant institution in the instant-payment network
//
// "Bank code is how the network addresses it, Bank UUID is IDENTITY"
//
// Accounts hold a shared reference to their bank; the bank itself never
// points back to its accounts (lookups go through the repository).

use crate::base::{Base, Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::validation::{required, Rule, RuleSet, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};

// ============================================================================
// BANK ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    #[serde(flatten)]
    pub base: Base,

    /// Participant code assigned by the network (e.g. "001")
    pub code: String,

    /// Display name
    pub name: String,
}

const BANK_RULES: RuleSet<Bank> = RuleSet::new(&[
    Rule { name: "id_required", check: |b: &Bank| required("id", &b.base.id) },
    Rule { name: "code_required", check: |b: &Bank| required("code", &b.code) },
    Rule { name: "name_required", check: |b: &Bank| required("name", &b.name) },
]);

impl Bank {
    /// Create new bank with a UUID identity
    pub fn new(code: &str, name: &str) -> Result<Self, ValidationError> {
        Self::new_with(&UuidGenerator, &SystemClock, code, name)
    }

    pub fn new_with(
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
        code: &str,
        name: &str,
    ) -> Result<Self, ValidationError> {
        let bank = Bank {
            base: Base::new(ids, clock),
            code: code.to_string(),
            name: name.to_string(),
        };

        bank.validate()?;
        Ok(bank)
    }

    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn validate(&self) -> ValidationResult {
        BANK_RULES.validate(self)
    }
}

// ============================================================================
// TESTS
// ============================================================================
