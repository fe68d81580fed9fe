use super::expression::Expr;
use super::{RuleError, RuleVars};
use crate::config_file::RulesConfig;
use crate::types::RuleEvaluation;

/// Evaluates a rule expression against a variable context.
pub trait RuleEvaluator: Send + Sync {
    fn evaluate(&self, expression: &str, vars: &RuleVars) -> Result<bool, RuleError>;
}

/// Evaluator used when no expression engine is connected.
///
/// Every expression is rejected, so any page carrying a rule is excluded.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRuleEvaluator;

impl RuleEvaluator for DisabledRuleEvaluator {
    fn evaluate(&self, _expression: &str, _vars: &RuleVars) -> Result<bool, RuleError> {
        Err(RuleError::EvaluationDisabled)
    }
}

/// Evaluator backed by the built-in expression language.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionRuleEvaluator;

impl RuleEvaluator for ExpressionRuleEvaluator {
    fn evaluate(&self, expression: &str, vars: &RuleVars) -> Result<bool, RuleError> {
        Expr::parse(expression)?.evaluate(vars)
    }
}

/// Evaluator selected by configuration.
pub fn evaluator_for(config: &RulesConfig) -> Box<dyn RuleEvaluator> {
    match config.evaluation {
        RuleEvaluation::Disabled => Box::new(DisabledRuleEvaluator),
        RuleEvaluation::Expression => Box::new(ExpressionRuleEvaluator),
    }
}
