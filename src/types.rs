//! Type-safe enums shared across admin-kit
//!
//! These replace the stringly-typed discriminators an admin framework passes
//! around (operation kinds, perspective item slots, sort directions) with
//! proper Rust enums that provide exhaustive matching.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Kind of persistence package a request seeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum RequestType {
    /// Plain entity collection (including basic collections via foreign key)
    #[default]
    Standard,
    /// Collection mediated by a join entity carrying extra fields
    Adorned,
    /// Collection modeled as a key/value map
    Map,
}

/// Strategy the persistence pipeline uses for one CRUD verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum OperationType {
    #[default]
    Basic,
    /// Removal detaches the association instead of deleting the row
    NonDestructiveRemove,
    AdornedTargetList,
    Map,
}

/// Sort direction on a filter/sort criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// How a foreign key restricts the fetched collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ForeignKeyRestrictionType {
    #[default]
    IdEq,
    CollectionSizeEq,
}

/// Slot in a persistence perspective's item table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum PersistencePerspectiveItemType {
    ForeignKey,
    AdornedTargetList,
    MapStructure,
}

/// Value of the `as` attribute on a preload link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PreloadAs {
    Script,
    Style,
}

impl PreloadAs {
    /// Guess the preload destination from a file name.
    ///
    /// Only the exact, case-sensitive suffixes `.js` and `.css` are recognized;
    /// anything else yields `None` and the attribute is omitted.
    pub fn from_file_name(file: &str) -> Option<Self> {
        if file.ends_with(".js") {
            Some(Self::Script)
        } else if file.ends_with(".css") {
            Some(Self::Style)
        } else {
            None
        }
    }
}

/// Which evaluator backs the page rule matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RuleEvaluation {
    /// Any page carrying a rule expression is excluded
    #[default]
    Disabled,
    /// Rule expressions are parsed and evaluated against the variable context
    Expression,
}
