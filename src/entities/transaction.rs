// 💸 Transaction Entity - One transfer attempt from an account to a pix key
//
// Lifecycle:
//
//     pending ──complete()──► completed
//        ├────confirm()─────► confirmed
//        └────cancel()──────► confirmed (+ cancel_description)
//
// `error` is a legal status but nothing in this module assigns it; the
// settlement side does (see `usecase::TransactionUseCase::fail`).
//
// NOTE: confirm() and cancel() land on `confirmed`, which the rule table
// does not accept. Both therefore return InvalidTransactionStatus while the
// status change stays applied. Open product question, kept as observed.

use crate::base::{Base, Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::entities::account::Account;
use crate::entities::pix_key::PixKey;
use crate::validation::{positive_amount, required, Rule, RuleSet, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// TRANSACTION STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Registered, not yet settled
    Pending,

    /// Funds delivered to the destination account
    Completed,

    /// Settlement failed
    Error,

    /// Acknowledged by the destination side
    Confirmed,
}

impl TransactionStatus {
    /// Statuses the rule table accepts
    pub const ACCEPTED: [TransactionStatus; 3] = [
        TransactionStatus::Pending,
        TransactionStatus::Completed,
        TransactionStatus::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Error => "error",
            TransactionStatus::Confirmed => "confirmed",
        }
    }

    /// End states of the lifecycle. Transitions do not guard against leaving them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Completed | TransactionStatus::Confirmed)
    }
}

impl FromStr for TransactionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "error" => Ok(TransactionStatus::Error),
            "confirmed" => Ok(TransactionStatus::Confirmed),
            other => Err(ValidationError::InvalidTransactionStatus(other.to_string())),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TRANSACTION ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    #[serde(flatten)]
    pub base: Base,

    /// Source of funds
    #[serde(skip)]
    pub account_from: Arc<Account>,

    pub amount: f64,

    /// Destination handle; only its account id is read here
    #[serde(skip)]
    pub pix_key_to: Arc<PixKey>,

    pub status: TransactionStatus,

    pub description: String,

    /// Set by cancel() or by a settlement failure
    pub cancel_description: String,
}

fn amount_positive(t: &Transaction) -> ValidationResult {
    positive_amount(t.amount)
}

fn status_accepted(t: &Transaction) -> ValidationResult {
    if !TransactionStatus::ACCEPTED.contains(&t.status) {
        return Err(ValidationError::InvalidTransactionStatus(t.status.to_string()));
    }
    Ok(())
}

fn distinct_accounts(t: &Transaction) -> ValidationResult {
    if t.pix_key_to.account.id() == t.account_from.id() {
        return Err(ValidationError::SameAccount);
    }
    Ok(())
}

const TRANSACTION_RULES: RuleSet<Transaction> = RuleSet::new(&[
    Rule { name: "id_required", check: |t: &Transaction| required("id", &t.base.id) },
    Rule { name: "account_from_required", check: |t: &Transaction| required("account_from", t.account_from.id()) },
    Rule { name: "amount_positive", check: amount_positive },
    Rule { name: "status_accepted", check: status_accepted },
    Rule { name: "distinct_accounts", check: distinct_accounts },
]);

impl Transaction {
    /// Register a pending transfer of `amount` from `account_from` to the
    /// account behind `pix_key_to`
    pub fn new(
        account_from: Arc<Account>,
        amount: f64,
        pix_key_to: Arc<PixKey>,
        description: &str,
    ) -> Result<Self, ValidationError> {
        Self::new_with(&UuidGenerator, &SystemClock, account_from, amount, pix_key_to, description)
    }

    pub fn new_with(
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
        account_from: Arc<Account>,
        amount: f64,
        pix_key_to: Arc<PixKey>,
        description: &str,
    ) -> Result<Self, ValidationError> {
        let transaction = Transaction {
            base: Base::new(ids, clock),
            account_from,
            amount,
            pix_key_to,
            status: TransactionStatus::Pending,
            description: description.to_string(),
            cancel_description: String::new(),
        };

        transaction.validate()?;
        Ok(transaction)
    }

    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn complete(&mut self) -> ValidationResult {
        self.complete_with(&SystemClock)
    }

    pub fn complete_with(&mut self, clock: &dyn Clock) -> ValidationResult {
        self.status = TransactionStatus::Completed;
        self.base.touch(clock);
        self.validate()
    }

    pub fn confirm(&mut self) -> ValidationResult {
        self.confirm_with(&SystemClock)
    }

    pub fn confirm_with(&mut self, clock: &dyn Clock) -> ValidationResult {
        self.status = TransactionStatus::Confirmed;
        self.base.touch(clock);
        self.validate()
    }

    pub fn cancel(&mut self, description: &str) -> ValidationResult {
        self.cancel_with(&SystemClock, description)
    }

    pub fn cancel_with(&mut self, clock: &dyn Clock, description: &str) -> ValidationResult {
        self.status = TransactionStatus::Confirmed;
        self.cancel_description = description.to_string();
        self.base.touch(clock);
        self.validate()
    }

    /// Re-run the full rule set. Mutations are never rolled back on failure.
    pub fn validate(&self) -> ValidationResult {
        TRANSACTION_RULES.validate(self)
    }

    /// Every rule the transaction currently breaks, by rule name
    pub fn violations(&self) -> Vec<(&'static str, ValidationError)> {
        TRANSACTION_RULES.violations(self)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{FixedClock, SequentialIds};
    use crate::entities::bank::Bank;
    use chrono::{TimeZone, Utc};

    struct Fixture {
        account_a: Arc<Account>,
        account_b: Arc<Account>,
        key_b: Arc<PixKey>,
    }

    fn fixture() -> Fixture {
        let bank = Arc::new(Bank::new("001", "Test Bank").unwrap());
        let account_a = Arc::new(Account::new(bank.clone(), "Alice", "0001").unwrap());
        let account_b = Arc::new(Account::new(bank, "Bob", "0002").unwrap());
        let key_b = Arc::new(PixKey::new("email", account_b.clone(), "bob@pix.dev").unwrap());
        Fixture { account_a, account_b, key_b }
    }

    fn pending(f: &Fixture) -> Transaction {
        Transaction::new(f.account_a.clone(), 100.0, f.key_b.clone(), "rent").unwrap()
    }

    #[test]
    fn test_transaction_creation() {
        let f = fixture();
        let tx = pending(&f);

        assert!(!tx.id().is_empty());
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.amount, 100.0);
        assert_eq!(tx.description, "rent");
        assert!(tx.cancel_description.is_empty());
        assert!(tx.base.updated_at.is_none());
        assert_eq!(tx.pix_key_to.account.id(), f.account_b.id());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let f = fixture();
        let err = Transaction::new(f.account_a.clone(), -5.0, f.key_b.clone(), "").unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveAmount(-5.0));
        assert_eq!(err.to_string(), "amount must be higher than 0");
    }

    #[test]
    fn test_zero_and_nan_amount_rejected() {
        let f = fixture();
        assert!(matches!(
            Transaction::new(f.account_a.clone(), 0.0, f.key_b.clone(), ""),
            Err(ValidationError::NonPositiveAmount(_))
        ));
        assert!(matches!(
            Transaction::new(f.account_a.clone(), f64::NAN, f.key_b.clone(), ""),
            Err(ValidationError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_self_transfer_rejected() {
        let f = fixture();
        let err = Transaction::new(f.account_b.clone(), 10.0, f.key_b.clone(), "").unwrap_err();
        assert_eq!(err, ValidationError::SameAccount);
        assert_eq!(err.to_string(), "source and destination cannot be the same");
    }

    #[test]
    fn test_inactive_destination_key_is_not_rechecked() {
        let f = fixture();
        let mut key = (*f.key_b).clone();
        key.deactivate().unwrap();

        let tx = Transaction::new(f.account_a.clone(), 1.0, Arc::new(key), "");
        assert!(tx.is_ok());
    }

    #[test]
    fn test_complete() {
        let f = fixture();
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        let mut tx = pending(&f);

        tx.complete_with(&FixedClock(at)).unwrap();
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.base.updated_at, Some(at));
        assert!(tx.status.is_terminal());
    }

    #[test]
    fn test_complete_is_idempotent() {
        let f = fixture();
        let mut tx = pending(&f);

        tx.complete().unwrap();
        tx.complete().unwrap();
        assert_eq!(tx.status, TransactionStatus::Completed);
    }

    #[test]
    fn test_confirm_fails_its_own_validation() {
        let f = fixture();
        let mut tx = pending(&f);

        let err = tx.confirm().unwrap_err();
        assert_eq!(err, ValidationError::InvalidTransactionStatus("confirmed".to_string()));
        assert_eq!(err.to_string(), "invalid status for the transaction");

        // Mutation is not rolled back
        assert_eq!(tx.status, TransactionStatus::Confirmed);
        assert!(tx.base.updated_at.is_some());
    }

    #[test]
    fn test_cancel_sets_description_and_confirmed() {
        let f = fixture();
        let mut tx = pending(&f);

        let err = tx.cancel("customer gave up").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTransactionStatus(_)));
        assert_eq!(tx.status, TransactionStatus::Confirmed);
        assert_eq!(tx.cancel_description, "customer gave up");
        assert!(tx.base.updated_at.is_some());
    }

    #[test]
    fn test_externally_assigned_error_status_is_valid() {
        let f = fixture();
        let mut tx = pending(&f);

        tx.status = TransactionStatus::Error;
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_violations_report_every_broken_rule() {
        let f = fixture();
        let mut tx = pending(&f);
        tx.amount = -1.0;
        tx.status = TransactionStatus::Confirmed;
        tx.account_from = f.account_b.clone();

        let names: Vec<_> = tx.violations().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["amount_positive", "status_accepted", "distinct_accounts"]);

        // validate() stops at the first
        assert!(matches!(tx.validate(), Err(ValidationError::NonPositiveAmount(_))));
    }

    #[test]
    fn test_deterministic_identity() {
        let f = fixture();
        let ids = SequentialIds::new("tx");
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let tx = Transaction::new_with(&ids, &FixedClock(at), f.account_a.clone(), 5.0, f.key_b.clone(), "")
            .unwrap();
        assert_eq!(tx.id(), "tx-1");
        assert_eq!(tx.base.created_at, at);
    }

    #[test]
    fn test_status_literals() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Error,
            TransactionStatus::Confirmed,
        ] {
            assert_eq!(status.as_str().parse::<TransactionStatus>().unwrap(), status);
        }
        assert!("cancelled".parse::<TransactionStatus>().is_err());
    }
}
