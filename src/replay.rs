// 🔁 Replay - Drive a CSV batch of transfer requests through the use cases
//
// CSV columns:
//   from_owner,from_number,to_owner,to_number,to_kind,to_key,amount,description,action
//
// Accounts are opened on first sight (in the configured bank), destination
// keys are registered on first sight. A bad row is reported, never fatal.
//
// Amount and key kind are checked before anything is opened. Rules that need
// stored state (owner match, key binding, self-transfer) run after, so a row
// rejected there keeps the accounts and keys it opened, and later rows reuse
// them.

use crate::config::Config;
use crate::entities::{Account, Bank, PixKey, PixKeyKind, Transaction, TransactionStatus};
use crate::repository::{
    InMemoryPixKeyRepository, InMemoryTransactionRepository, PixKeyRepository, RepositoryError,
    TransactionRepository,
};
use crate::usecase::{PixKeyUseCase, TransactionUseCase, UseCaseError, UseCaseResult};
use crate::validation::positive_amount;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// INPUT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Complete,
    Confirm,
    Cancel,
    Fail,
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferRequest {
    pub from_owner: String,
    pub from_number: String,
    pub to_owner: String,
    pub to_number: String,
    pub to_kind: String,
    pub to_key: String,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    pub action: Action,
}

pub fn load_requests(csv_path: &Path) -> Result<Vec<TransferRequest>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file: {:?}", csv_path))?;
    load_requests_from_reader(file)
}

pub fn load_requests_from_reader<R: Read>(reader: R) -> Result<Vec<TransferRequest>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut requests = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        let request: TransferRequest =
            result.with_context(|| format!("Failed to deserialize request on row {}", index + 1))?;
        requests.push(request);
    }

    Ok(requests)
}

// ============================================================================
// OUTPUT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// 1-based data row
    pub row: usize,
    pub transaction_id: Option<String>,
    pub status: Option<TransactionStatus>,
    pub error: Option<String>,
    /// Machine-readable category of `error`
    pub error_code: Option<&'static str>,
}

impl Outcome {
    fn rejected(row: usize, error: &UseCaseError) -> Self {
        Outcome {
            row,
            transaction_id: None,
            status: None,
            error: Some(error.to_string()),
            error_code: Some(error.code()),
        }
    }

    fn stored(row: usize, transaction: &Transaction) -> Self {
        Outcome {
            row,
            transaction_id: Some(transaction.id().to_string()),
            status: Some(transaction.status),
            error: None,
            error_code: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub registered: usize,
    pub rejected: usize,
    pub pending: usize,
    pub completed: usize,
    pub confirmed: usize,
    pub errored: usize,
    /// Transitions whose re-validation failed
    pub validation_warnings: usize,
}

impl Summary {
    fn record(&mut self, outcome: &Outcome) {
        self.rows += 1;
        match outcome.status {
            None => self.rejected += 1,
            Some(status) => {
                self.registered += 1;
                if outcome.error.is_some() {
                    self.validation_warnings += 1;
                }
                match status {
                    TransactionStatus::Pending => self.pending += 1,
                    TransactionStatus::Completed => self.completed += 1,
                    TransactionStatus::Confirmed => self.confirmed += 1,
                    TransactionStatus::Error => self.errored += 1,
                }
            }
        }
    }
}

// ============================================================================
// REPLAYER
// ============================================================================

pub struct Replayer {
    bank: Arc<Bank>,
    store: InMemoryPixKeyRepository,
    transactions: InMemoryTransactionRepository,
    pix: PixKeyUseCase,
    tx: TransactionUseCase,
}

impl Replayer {
    pub fn new(config: &Config) -> Result<Self> {
        let bank = Arc::new(Bank::new(&config.bank_code, &config.bank_name).context("Invalid bank config")?);

        let store = InMemoryPixKeyRepository::new();
        store.add_bank(bank.clone())?;
        let transactions = InMemoryTransactionRepository::new();

        let keys: Arc<dyn PixKeyRepository> = Arc::new(store.clone());
        let tx_repo: Arc<dyn TransactionRepository> = Arc::new(transactions.clone());

        Ok(Replayer {
            bank,
            pix: PixKeyUseCase::new(keys.clone()),
            tx: TransactionUseCase::new(tx_repo, keys),
            store,
            transactions,
        })
    }

    pub fn run(&self, requests: &[TransferRequest]) -> (Vec<Outcome>, Summary) {
        let mut summary = Summary::default();
        let outcomes: Vec<Outcome> = requests
            .iter()
            .enumerate()
            .map(|(index, request)| {
                let outcome = self.process(index + 1, request);
                summary.record(&outcome);
                outcome
            })
            .collect();

        (outcomes, summary)
    }

    pub fn transaction_count(&self) -> Result<usize> {
        Ok(self.transactions.count()?)
    }

    fn process(&self, row: usize, request: &TransferRequest) -> Outcome {
        match self.try_process(row, request) {
            Ok(outcome) => outcome,
            Err(e) => Outcome::rejected(row, &e),
        }
    }

    fn try_process(&self, row: usize, request: &TransferRequest) -> UseCaseResult<Outcome> {
        positive_amount(request.amount)?;
        request.to_kind.parse::<PixKeyKind>()?;

        let from = self.ensure_account(&request.from_owner, &request.from_number)?;
        let to = self.ensure_account(&request.to_owner, &request.to_number)?;
        self.ensure_key(&request.to_kind, &request.to_key, &to)?;

        let transaction = self.tx.register(
            from.id(),
            request.amount,
            &request.to_key,
            &request.to_kind,
            &request.description,
        )?;

        let transition = match request.action {
            Action::Complete => self.tx.complete(transaction.id()),
            Action::Confirm => self.tx.confirm(transaction.id()),
            Action::Cancel => self.tx.cancel(transaction.id(), &request.description),
            Action::Fail => self.tx.fail(transaction.id(), &request.description),
            Action::None => return Ok(Outcome::stored(row, &transaction)),
        };

        // Once registered the row is never rejected; errors ride along
        let outcome = match transition {
            Ok(t) => Outcome {
                error: t.validation.as_ref().err().map(|e| e.to_string()),
                error_code: t.validation.as_ref().err().map(|e| e.code()),
                ..Outcome::stored(row, &t.transaction)
            },
            Err(e) => Outcome {
                error: Some(e.to_string()),
                error_code: Some(e.code()),
                ..Outcome::stored(row, &transaction)
            },
        };
        Ok(outcome)
    }

    /// Reuse the account at `number`, or open it for `owner`
    fn ensure_account(&self, owner: &str, number: &str) -> UseCaseResult<Arc<Account>> {
        match self.store.find_account_by_number(self.bank.id(), number) {
            Ok(account) if account.owner_name == owner => Ok(account),
            Ok(account) => Err(RepositoryError::Conflict {
                entity: "account",
                id: number.to_string(),
                detail: format!("owned by {}", account.owner_name),
            }
            .into()),
            Err(RepositoryError::NotFound { .. }) => {
                let account = Arc::new(Account::new(self.bank.clone(), owner, number)?);
                self.store.add_account(account.clone())?;
                debug!(id = %account.id(), number = %number, "account opened");
                Ok(account)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reuse the key if it already points at `account`, or register it
    fn ensure_key(&self, kind: &str, key: &str, account: &Account) -> UseCaseResult<Arc<PixKey>> {
        match self.pix.find_key(kind, key) {
            Ok(found) if found.account_id == account.id() => Ok(found),
            Ok(found) => Err(RepositoryError::Conflict {
                entity: "pix key",
                id: format!("{}:{}", found.kind, key),
                detail: format!("bound to account {}", found.account.number),
            }
            .into()),
            Err(UseCaseError::Repository(RepositoryError::NotFound { .. })) => {
                self.pix.register_key(kind, key, account.id())
            }
            Err(e) => Err(e),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
