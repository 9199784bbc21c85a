// 🔑 PixKey Entity - Binding from a lookup key to an account
//
// A transfer is addressed to a key (email or CPF), never to an account
// number. The key resolves to exactly one account.

use crate::base::{Base, Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::entities::account::Account;
use crate::validation::{required, Rule, RuleSet, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// KEY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixKeyKind {
    /// E-mail address
    Email,

    /// Brazilian individual tax id
    Cpf,
}

impl PixKeyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PixKeyKind::Email => "email",
            PixKeyKind::Cpf => "cpf",
        }
    }
}

impl FromStr for PixKeyKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(PixKeyKind::Email),
            "cpf" => Ok(PixKeyKind::Cpf),
            other => Err(ValidationError::InvalidKind(other.to_string())),
        }
    }
}

impl fmt::Display for PixKeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// KEY STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixKeyStatus {
    Active,
    Inactive,
}

impl PixKeyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PixKeyStatus::Active => "active",
            PixKeyStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for PixKeyStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PixKeyStatus::Active),
            "inactive" => Ok(PixKeyStatus::Inactive),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for PixKeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PIX KEY ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixKey {
    #[serde(flatten)]
    pub base: Base,

    pub kind: PixKeyKind,

    /// The key value itself (e.g. "maria@example.com", "12345678900")
    pub key: String,

    /// Owning account (foreign key)
    pub account_id: String,

    /// Shared reference to the owning account
    #[serde(skip)]
    pub account: Arc<Account>,

    pub status: PixKeyStatus,
}

// Kind and status are enforced when the literals are parsed; the table
// covers the required fields.
const PIX_KEY_RULES: RuleSet<PixKey> = RuleSet::new(&[
    Rule { name: "id_required", check: |k: &PixKey| required("id", &k.base.id) },
    Rule { name: "key_required", check: |k: &PixKey| required("key", &k.key) },
    Rule { name: "account_id_required", check: |k: &PixKey| required("account_id", &k.account_id) },
]);

impl PixKey {
    /// Bind `key` to `account`. `kind` must be "email" or "cpf".
    pub fn new(kind: &str, account: Arc<Account>, key: &str) -> Result<Self, ValidationError> {
        Self::new_with(&UuidGenerator, &SystemClock, kind, account, key)
    }

    pub fn new_with(
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
        kind: &str,
        account: Arc<Account>,
        key: &str,
    ) -> Result<Self, ValidationError> {
        let kind = kind.parse::<PixKeyKind>()?;

        let pix_key = PixKey {
            base: Base::new(ids, clock),
            kind,
            key: key.to_string(),
            account_id: account.id().to_string(),
            account,
            status: PixKeyStatus::Active,
        };

        pix_key.validate()?;
        Ok(pix_key)
    }

    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn is_active(&self) -> bool {
        self.status == PixKeyStatus::Active
    }

    pub fn activate(&mut self) -> ValidationResult {
        self.activate_with(&SystemClock)
    }

    pub fn activate_with(&mut self, clock: &dyn Clock) -> ValidationResult {
        self.set_status(PixKeyStatus::Active, clock)
    }

    pub fn deactivate(&mut self) -> ValidationResult {
        self.deactivate_with(&SystemClock)
    }

    pub fn deactivate_with(&mut self, clock: &dyn Clock) -> ValidationResult {
        self.set_status(PixKeyStatus::Inactive, clock)
    }

    fn set_status(&mut self, status: PixKeyStatus, clock: &dyn Clock) -> ValidationResult {
        self.status = status;
        self.base.touch(clock);
        self.validate()
    }

    /// Re-run the full rule set
    pub fn validate(&self) -> ValidationResult {
        PIX_KEY_RULES.validate(self)
    }
}

// ============================================================================
// TESTS
// ============================================================================
