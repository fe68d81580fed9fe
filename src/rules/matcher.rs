//! Page rule matching.
//!
//! # Outcomes
//!
//! | Page rule | Evaluator result | `evaluate` | `check_for_match` |
//! |-----------|------------------|------------|-------------------|
//! | none      | not called       | `NoRule`   | `true` |
//! | present   | `Ok(true)`       | `Matched`  | `true` |
//! | present   | `Ok(false)`      | `Rejected` | `false` |
//! | present   | `Err(_)`         | `Failed`   | `false` |
//!
//! With the default [`DisabledRuleEvaluator`] every page carrying a rule ends
//! up `Failed` and is excluded.

use super::evaluator::{evaluator_for, DisabledRuleEvaluator, RuleEvaluator};
use super::page::PageDto;
use super::{RuleError, RuleVars};
use crate::config_file::RulesConfig;
use crate::logging::{sanitize, Logger};

/// Result of evaluating a page's rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    NoRule,
    Matched,
    Rejected,
    Failed(RuleError),
}

impl RuleOutcome {
    /// Whether the page should be included. Fails closed.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::NoRule | Self::Matched)
    }
}

pub struct PageRuleMatcher {
    evaluator: Box<dyn RuleEvaluator>,
    logger: Logger,
}

impl Default for PageRuleMatcher {
    fn default() -> Self {
        Self::new(Box::new(DisabledRuleEvaluator))
    }
}

impl std::fmt::Debug for PageRuleMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRuleMatcher")
            .field("logger", &self.logger)
            .finish_non_exhaustive()
    }
}

impl PageRuleMatcher {
    pub fn new(evaluator: Box<dyn RuleEvaluator>) -> Self {
        Self {
            evaluator,
            logger: Logger::ambient(),
        }
    }

    pub fn from_config(config: &RulesConfig) -> Self {
        Self::new(evaluator_for(config))
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// True if the page has no rule or its rule matches `vars`.
    pub fn check_for_match(&self, page: &PageDto, vars: &RuleVars) -> bool {
        self.evaluate(page, vars).is_match()
    }

    /// Evaluate the page's rule, keeping failures distinguishable from
    /// deliberate mismatches.
    pub fn evaluate(&self, page: &PageDto, vars: &RuleVars) -> RuleOutcome {
        let Some(expression) = page.rule_expression.as_deref() else {
            return RuleOutcome::NoRule;
        };

        self.logger.in_scope(|| {
            tracing::trace!(
                page_id = page.id,
                rule = %sanitize(expression),
                "processing content rule for page"
            );

            let outcome = match self.evaluator.evaluate(expression, vars) {
                Ok(true) => RuleOutcome::Matched,
                Ok(false) => RuleOutcome::Rejected,
                Err(err) => RuleOutcome::Failed(err),
            };

            match &outcome {
                RuleOutcome::Rejected => tracing::debug!(
                    page_id = page.id,
                    rule = %sanitize(expression),
                    "page failed to pass rule and will not be included"
                ),
                RuleOutcome::Failed(err) => tracing::debug!(
                    page_id = page.id,
                    rule = %sanitize(expression),
                    error = %err,
                    "page rule could not be evaluated; page will not be included"
                ),
                RuleOutcome::Matched | RuleOutcome::NoRule => {}
            }

            outcome
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RuleEvaluation;

    struct Fixed(Result<bool, RuleError>);

    impl RuleEvaluator for Fixed {
        fn evaluate(&self, _expression: &str, _vars: &RuleVars) -> Result<bool, RuleError> {
            self.0.clone()
        }
    }

    #[test]
    fn test_no_rule_matches_without_calling_evaluator() {
        let matcher = PageRuleMatcher::new(Box::new(Fixed(Ok(false))));
        let page = PageDto::new(1, "/about");
        assert_eq!(matcher.evaluate(&page, &RuleVars::new()), RuleOutcome::NoRule);
        assert!(matcher.check_for_match(&page, &RuleVars::new()));
    }

    #[test]
    fn test_outcomes_follow_evaluator() {
        let page = PageDto::new(7, "/promo").with_rule_expression("anything");
        let vars = RuleVars::new();

        let matcher = PageRuleMatcher::new(Box::new(Fixed(Ok(true))));
        assert_eq!(matcher.evaluate(&page, &vars), RuleOutcome::Matched);

        let matcher = PageRuleMatcher::new(Box::new(Fixed(Ok(false))));
        assert_eq!(matcher.evaluate(&page, &vars), RuleOutcome::Rejected);
        assert!(!matcher.check_for_match(&page, &vars));

        let matcher =
            PageRuleMatcher::new(Box::new(Fixed(Err(RuleError::TypeMismatch("x".into())))));
        assert!(matches!(matcher.evaluate(&page, &vars), RuleOutcome::Failed(_)));
        assert!(!matcher.check_for_match(&page, &vars));
    }

    #[test]
    fn test_default_matcher_fails_closed() {
        let matcher = PageRuleMatcher::default();
        let page = PageDto::new(3, "/sale").with_rule_expression("true");
        assert_eq!(
            matcher.evaluate(&page, &RuleVars::new()),
            RuleOutcome::Failed(RuleError::EvaluationDisabled)
        );
    }

    #[test]
    fn test_from_config_expression() {
        let matcher = PageRuleMatcher::from_config(&RulesConfig {
            evaluation: RuleEvaluation::Expression,
        });
        let page = PageDto::new(3, "/sale").with_rule_expression("true && !false");
        assert!(matcher.check_for_match(&page, &RuleVars::new()));
    }
}
