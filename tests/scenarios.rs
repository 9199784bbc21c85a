//! End-to-end scenarios for key binding and the transfer lifecycle.

use chrono::{TimeZone, Utc};
use pix_core::{
    Account, Bank, FixedClock, PixKey, PixKeyStatus, SequentialIds, Transaction, TransactionStatus,
    ValidationError,
};
use rstest::{fixture, rstest};
use std::sync::Arc;

struct World {
    account_a: Arc<Account>,
    account_b: Arc<Account>,
    key_b: Arc<PixKey>,
}

#[fixture]
fn world() -> World {
    let bank = Arc::new(Bank::new("001", "Banco Teste").unwrap());
    let account_a = Arc::new(Account::new(bank.clone(), "Ana", "1000-1").unwrap());
    let account_b = Arc::new(Account::new(bank, "Bruno", "2000-2").unwrap());
    let key_b = Arc::new(PixKey::new("email", account_b.clone(), "bruno@pix.dev").unwrap());
    World { account_a, account_b, key_b }
}

#[rstest]
fn scenario_a_email_key_is_active(world: World) {
    let key = PixKey::new("email", world.account_a.clone(), "a@b.com").unwrap();
    assert_eq!(key.status, PixKeyStatus::Active);
    assert_eq!(key.status.as_str(), "active");
}

#[rstest]
fn scenario_b_empty_cpf_key_fails(world: World) {
    let err = PixKey::new("cpf", world.account_a.clone(), "").unwrap_err();
    assert_eq!(err, ValidationError::MissingField { field: "key" });
}

#[rstest]
fn scenario_c_negative_amount(world: World) {
    let err = Transaction::new(world.account_a.clone(), -5.0, world.key_b.clone(), "").unwrap_err();
    assert_eq!(err.to_string(), "amount must be higher than 0");
}

#[rstest]
fn scenario_d_same_account(world: World) {
    let err = Transaction::new(world.account_b.clone(), 5.0, world.key_b.clone(), "").unwrap_err();
    assert_eq!(err.to_string(), "source and destination cannot be the same");
}

#[rstest]
fn scenario_e_complete(world: World) {
    let at = Utc.with_ymd_and_hms(2024, 8, 15, 14, 0, 0).unwrap();
    let mut tx = Transaction::new(world.account_a.clone(), 42.0, world.key_b.clone(), "dinner").unwrap();

    assert!(tx.complete_with(&FixedClock(at)).is_ok());
    assert_eq!(tx.status.as_str(), "completed");
    assert_eq!(tx.base.updated_at, Some(at));
}

#[rstest]
fn scenario_f_confirm_breaks_own_validation(world: World) {
    let mut tx = Transaction::new(world.account_a.clone(), 42.0, world.key_b.clone(), "").unwrap();

    let result = tx.confirm();
    assert_eq!(tx.status.as_str(), "confirmed");
    assert_eq!(
        result,
        Err(ValidationError::InvalidTransactionStatus("confirmed".to_string()))
    );
    // Re-running validation keeps failing: the state is stuck outside the accepted set
    assert!(tx.validate().is_err());
}

#[rstest]
#[case("email", "ana@pix.dev")]
#[case("cpf", "12345678900")]
fn valid_kinds_construct(world: World, #[case] kind: &str, #[case] key: &str) {
    let ids = SequentialIds::new("k");
    let pix_key = PixKey::new_with(&ids, &FixedClock(Utc::now()), kind, world.account_a.clone(), key).unwrap();
    assert_eq!(pix_key.id(), "k-1");
    assert_eq!(pix_key.kind.as_str(), kind);
}

#[rstest]
#[case("phone")]
#[case("Email")]
#[case("")]
#[case("taxid")]
fn invalid_kinds_fail(world: World, #[case] kind: &str) {
    let err = PixKey::new(kind, world.account_a.clone(), "value").unwrap_err();
    assert_eq!(err.to_string(), "invalid type of key");
}

#[rstest]
fn complete_after_amount_tampering_keeps_mutation(world: World) {
    let mut tx = Transaction::new(world.account_a.clone(), 1.0, world.key_b.clone(), "").unwrap();
    tx.amount = 0.0;

    assert!(matches!(tx.complete(), Err(ValidationError::NonPositiveAmount(_))));
    assert_eq!(tx.status, TransactionStatus::Completed);
    assert!(tx.base.updated_at.is_some());
}
