use serde::{Deserialize, Serialize};

/// The slice of a CMS page the rule matcher looks at.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageDto {
    pub id: u64,
    pub url: String,
    pub locale_code: Option<String>,
    /// Higher priority pages win when several match the same URL
    pub priority: Option<i32>,
    /// Inclusion rule; `None` means the page always matches
    pub rule_expression: Option<String>,
}

impl PageDto {
    pub fn new(id: u64, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_rule_expression(mut self, expression: impl Into<String>) -> Self {
        self.rule_expression = Some(expression.into());
        self
    }
}
