// Pix Core - Domain Library
// Entities, validation rules, repository contracts and use cases for
// instant-payment transfers

pub mod base;
pub mod validation;
pub mod entities;
pub mod repository;
pub mod usecase;
pub mod config;
pub mod logging;
pub mod replay;

// Re-export commonly used types
pub use base::{Base, Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidGenerator};
pub use validation::{Rule, RuleSet, ValidationError, ValidationResult};
pub use entities::{
    Account, Bank,
    PixKey, PixKeyKind, PixKeyStatus,
    Transaction, TransactionStatus,
};
pub use repository::{
    PixKeyRepository, TransactionRepository, RepositoryError,
    InMemoryPixKeyRepository, InMemoryTransactionRepository,
};
pub use usecase::{PixKeyUseCase, TransactionUseCase, Transition, UseCaseError};
pub use config::{Config, LogFormat};
