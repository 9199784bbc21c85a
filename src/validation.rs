// 📐 Validation Rules - Rules as Data
// Each entity owns an ordered table of named predicates, run in one pass

use thiserror::Error;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    // === Required fields ===
    #[error("{field} is required")]
    MissingField { field: &'static str },

    // === Enumerated values ===
    #[error("invalid type of key")]
    InvalidKind(String),

    #[error("invalid status")]
    InvalidStatus(String),

    #[error("invalid status for the transaction")]
    InvalidTransactionStatus(String),

    // === Domain rules ===
    #[error("amount must be higher than 0")]
    NonPositiveAmount(f64),

    #[error("source and destination cannot be the same")]
    SameAccount,
}

impl ValidationError {
    /// Stable snake_case code for reports
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingField { .. } => "missing_field",
            ValidationError::InvalidKind(_) => "invalid_kind",
            ValidationError::InvalidStatus(_) => "invalid_status",
            ValidationError::InvalidTransactionStatus(_) => "invalid_transaction_status",
            ValidationError::NonPositiveAmount(_) => "non_positive_amount",
            ValidationError::SameAccount => "same_account",
        }
    }
}

pub type ValidationResult = Result<(), ValidationError>;

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// A named check over an entity
pub struct Rule<T> {
    /// Rule name for diagnostics
    pub name: &'static str,

    pub check: fn(&T) -> ValidationResult,
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Rule<T> {}

impl<T> std::fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Fails with `MissingField` when `value` is empty. Whitespace counts as a value.
pub fn required(field: &'static str, value: &str) -> ValidationResult {
    if value.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

/// Fails with `NonPositiveAmount` unless `amount > 0`
pub fn positive_amount(amount: f64) -> ValidationResult {
    // `!(x > 0)` also rejects NaN
    if !(amount > 0.0) {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    Ok(())
}

// ============================================================================
// RULE SET
// ============================================================================

/// Ordered rule table. Order is evaluation order.
#[derive(Debug)]
pub struct RuleSet<T: 'static> {
    rules: &'static [Rule<T>],
}

impl<T: 'static> Clone for RuleSet<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for RuleSet<T> {}

impl<T: 'static> RuleSet<T> {
    pub const fn new(rules: &'static [Rule<T>]) -> Self {
        RuleSet { rules }
    }

    /// Run every rule in order, stop at the first failure
    pub fn validate(&self, target: &T) -> ValidationResult {
        for rule in self.rules {
            (rule.check)(target)?;
        }
        Ok(())
    }

    /// Every failing rule, in order, paired with its name
    pub fn violations(&self, target: &T) -> Vec<(&'static str, ValidationError)> {
        self.rules
            .iter()
            .filter_map(|rule| (rule.check)(target).err().map(|e| (rule.name, e)))
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        name: String,
        size: i32,
    }

    fn name_required(s: &Sample) -> ValidationResult {
        required("name", &s.name)
    }

    fn size_positive(s: &Sample) -> ValidationResult {
        if s.size <= 0 {
            return Err(ValidationError::NonPositiveAmount(s.size as f64));
        }
        Ok(())
    }

    const SAMPLE_RULES: RuleSet<Sample> = RuleSet::new(&[
        Rule { name: "name_required", check: name_required },
        Rule { name: "size_positive", check: size_positive },
    ]);

    #[test]
    fn test_required_rejects_only_empty() {
        assert!(required("key", "value").is_ok());
        assert_eq!(
            required("key", ""),
            Err(ValidationError::MissingField { field: "key" })
        );
        // length check, not a trim
        assert!(required("key", "   ").is_ok());
    }

    #[test]
    fn test_positive_amount() {
        assert!(positive_amount(0.01).is_ok());
        assert_eq!(positive_amount(0.0), Err(ValidationError::NonPositiveAmount(0.0)));
        assert!(matches!(positive_amount(-3.0), Err(ValidationError::NonPositiveAmount(_))));
        assert!(positive_amount(f64::NAN).is_err());
    }

    #[test]
    fn test_first_failure_wins() {
        let sample = Sample { name: String::new(), size: -1 };
        let err = SAMPLE_RULES.validate(&sample).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "name" });
    }

    #[test]
    fn test_violations_collects_all() {
        let sample = Sample { name: String::new(), size: -1 };
        let found = SAMPLE_RULES.violations(&sample);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "name_required");
        assert_eq!(found[1].0, "size_positive");
    }

    #[test]
    fn test_valid_target_passes() {
        let sample = Sample { name: "ok".to_string(), size: 3 };
        assert!(SAMPLE_RULES.validate(&sample).is_ok());
        assert!(SAMPLE_RULES.violations(&sample).is_empty());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::MissingField { field: "key" }.to_string(),
            "key is required"
        );
        assert_eq!(ValidationError::InvalidKind("x".into()).to_string(), "invalid type of key");
        assert_eq!(ValidationError::NonPositiveAmount(-5.0).to_string(), "amount must be higher than 0");
        assert_eq!(
            ValidationError::SameAccount.to_string(),
            "source and destination cannot be the same"
        );
        assert_eq!(ValidationError::SameAccount.code(), "same_account");
    }
}
