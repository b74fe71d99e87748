//! Normalized token set types.
//!
//! These are the output shapes of [`normalize`](super::normalize). Every map
//! is an [`IndexMap`] so that serialized artifacts keep the order in which
//! tokens were first encountered during the walk.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Number, Value};

/// A literal design value: a string (hex color, `"16px"`) or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// String value, emitted verbatim.
    String(String),
    /// Numeric value, emitted with its original JSON representation.
    Number(Number),
}

impl Scalar {
    /// Extracts a scalar from a JSON value.
    ///
    /// Returns `None` for booleans, nulls, arrays, and objects.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Number(n) => Some(Self::Number(n.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One normalized design token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenLeaf {
    /// The literal design value.
    pub value: Scalar,

    /// Canonical type of the section this token landed in.
    #[serde(rename = "type")]
    pub token_type: String,

    /// Optional human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Insertion-ordered map from token name to token.
pub type TokenMap = IndexMap<String, TokenLeaf>;

/// Typography tokens, split by property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    /// Font sizes.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub font_size: TokenMap,

    /// Font weights.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub font_weight: TokenMap,

    /// Line heights.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub line_height: TokenMap,
}

impl Typography {
    /// Returns `true` when no typography subsection holds a token.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.font_size.is_empty() && self.font_weight.is_empty() && self.line_height.is_empty()
    }

    /// Total number of typography tokens across all subsections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.font_size.len() + self.font_weight.len() + self.line_height.len()
    }
}

/// The flat, categorized result of normalizing one token source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTokenSet {
    /// Palette name → shade key → color token.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub colors: IndexMap<String, TokenMap>,

    /// Spacing tokens.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub spacing: TokenMap,

    /// Typography tokens.
    #[serde(skip_serializing_if = "Typography::is_empty")]
    pub typography: Typography,

    /// Border-radius tokens.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub border_radius: TokenMap,
}

impl NormalizedTokenSet {
    /// Returns `true` when every section is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.spacing.is_empty()
            && self.typography.is_empty()
            && self.border_radius.is_empty()
    }

    /// Number of individual color shades across all palettes.
    #[must_use]
    pub fn color_count(&self) -> usize {
        self.colors.values().map(IndexMap::len).sum()
    }

    /// Number of emitted tokens across every section.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.color_count() + self.spacing.len() + self.typography.len() + self.border_radius.len()
    }
}
