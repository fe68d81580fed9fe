//! CMS page inclusion rules.
//!
//! A page may carry a rule expression deciding whether it is shown for the
//! current request. [`PageRuleMatcher`] evaluates it against a variable
//! context through an injected [`RuleEvaluator`]. Pages without a rule
//! always match; pages whose rule cannot be evaluated never do.

pub mod evaluator;
pub mod expression;
pub mod matcher;
pub mod page;

use thiserror::Error;

pub use evaluator::{DisabledRuleEvaluator, ExpressionRuleEvaluator, RuleEvaluator};
pub use expression::Expr;
pub use matcher::{PageRuleMatcher, RuleOutcome};
pub use page::PageDto;

/// Variables a rule expression is evaluated against
pub type RuleVars = serde_json::Map<String, serde_json::Value>;

/// Errors raised while evaluating a rule expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// No evaluator is wired in; every rule fails closed
    #[error("rule evaluation is disabled")]
    EvaluationDisabled,

    #[error("parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// The expression produced a non-boolean value
    #[error("rule produced {0}, expected a boolean")]
    NotBoolean(String),
}

impl RuleError {
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }
}
