//! Depth-first token tree normalizer.
//!
//! Walks a token source, recognizes leaves in either the legacy
//! (`value`/`type`) or the standard (`$value`/`$type`) dialect, and routes
//! each one into a [`NormalizedTokenSet`]. Nothing here fails: nodes that do
//! not fit a recognized shape are recursed into or ignored.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::classify::Category;
use super::model::{NormalizedTokenSet, Scalar, TokenLeaf};

/// Top-level keys that hold a single theme mode and are unwrapped directly.
pub const MODE_KEYS: &[&str] = &[
    "Primitives/Light",
    "Primitives/Mode 1",
    "Light",
    "light",
    "Mode 1",
];

/// Root keys written by theme exports alongside their token sets.
const THEME_SET_KEYS: &[&str] = &["$themes", "$metadata"];

/// Why a leaf produced no output entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The leaf's type and path match no category.
    UnrecognizedType,
    /// A color leaf sits at a depth where no palette name can be derived.
    NoPalette,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedType => f.write_str("unrecognized type"),
            Self::NoPalette => f.write_str("no palette for color depth"),
        }
    }
}

/// A leaf that was recognized but not emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedLeaf {
    /// Slash-joined path including the leaf key.
    pub path: String,
    /// Declared type.
    pub token_type: String,
    /// Why it was dropped.
    pub reason: DropReason,
}

/// Normalized token set plus bookkeeping from the walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// The categorized tokens.
    pub tokens: NormalizedTokenSet,
    /// Leaves that were recognized but matched no section.
    pub dropped: Vec<DroppedLeaf>,
}

/// Normalizes a token source tree into a flat, categorized token set.
///
/// A non-object root yields an empty set.
#[must_use]
pub fn normalize(source: &Value) -> NormalizedTokenSet {
    normalize_with_report(source).tokens
}

/// Like [`normalize`], but also returns the leaves that were dropped.
#[must_use]
pub fn normalize_with_report(source: &Value) -> Normalized {
    let mut walker = Walker::default();
    if let Value::Object(root) = source {
        let mut path = Vec::new();
        walker.walk_group(unwrap_theme(root), &mut path);
    }

    for dropped in &walker.out.dropped {
        debug!(
            path = %dropped.path,
            token_type = %dropped.token_type,
            reason = %dropped.reason,
            "dropped token"
        );
    }

    walker.out
}

/// Strips a theme envelope from the root, if there is one.
///
/// A known mode key is preferred. Otherwise, when the root carries a theme
/// export's `$themes` or `$metadata` key, the first non-`$` key holding an
/// object is used. Other `$` keys such as `$schema` or `$description` are
/// document metadata and leave the root as it is.
#[must_use]
pub fn unwrap_theme(root: &Map<String, Value>) -> &Map<String, Value> {
    for key in MODE_KEYS {
        if let Some(Value::Object(inner)) = root.get(*key) {
            debug!(key, "unwrapping theme mode");
            return inner;
        }
    }

    if THEME_SET_KEYS.iter().any(|key| root.contains_key(*key)) {
        let first = root.iter().find_map(|(key, value)| match value {
            Value::Object(inner) if !is_metadata_key(key) => Some((key, inner)),
            _ => None,
        });
        if let Some((key, inner)) = first {
            debug!(key = %key, "unwrapping theme set");
            return inner;
        }
    }

    root
}

fn is_metadata_key(key: &str) -> bool {
    key.starts_with('$')
}

/// Derives a palette name from the group path above a color leaf.
///
/// Only one or two levels of grouping are meaningful: the palette is the
/// innermost group, lower-cased, with whitespace runs replaced by `-`.
#[must_use]
pub fn palette_name<S: AsRef<str>>(path: &[S]) -> Option<String> {
    let group = match path {
        [only] | [_, only] => only.as_ref(),
        _ => return None,
    };

    let mut name = String::with_capacity(group.len());
    let mut in_whitespace = false;
    for c in group.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                name.push('-');
            }
            in_whitespace = true;
        } else {
            name.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }
    Some(name)
}

/// Leaf fields borrowed from a source object.
#[derive(Debug)]
struct RawLeaf<'a> {
    value: Scalar,
    token_type: &'a str,
    description: Option<&'a str>,
}

impl<'a> RawLeaf<'a> {
    /// Reads a leaf out of an object, preferring `$`-prefixed fields.
    ///
    /// Returns `None` unless both a scalar value and a string type exist.
    fn from_object(object: &'a Map<String, Value>) -> Option<Self> {
        let value = object.get("$value").or_else(|| object.get("value"))?;
        let token_type = object.get("$type").or_else(|| object.get("type"))?;
        let description = object
            .get("$description")
            .or_else(|| object.get("description"))
            .and_then(Value::as_str);

        Some(Self {
            value: Scalar::from_json(value)?,
            token_type: token_type.as_str()?,
            description,
        })
    }
}

#[derive(Debug, Default)]
struct Walker {
    out: Normalized,
}

impl Walker {
    fn walk_group(&mut self, group: &Map<String, Value>, path: &mut Vec<String>) {
        for (key, value) in group {
            let Value::Object(object) = value else {
                continue;
            };

            if let Some(leaf) = RawLeaf::from_object(object) {
                self.place(key, leaf, path);
            } else {
                path.push(key.clone());
                self.walk_group(object, path);
                path.pop();
            }
        }
    }

    fn place(&mut self, key: &str, leaf: RawLeaf<'_>, path: &[String]) {
        let Some(category) = Category::classify(leaf.token_type, path) else {
            self.drop_leaf(key, &leaf, path, DropReason::UnrecognizedType);
            return;
        };

        let palette = if category == Category::Color {
            let Some(palette) = palette_name(path) else {
                self.drop_leaf(key, &leaf, path, DropReason::NoPalette);
                return;
            };
            Some(palette)
        } else {
            None
        };

        let token = TokenLeaf {
            value: leaf.value,
            token_type: category.canonical_type().to_string(),
            description: leaf.description.map(str::to_string),
        };
        let tokens = &mut self.out.tokens;

        if let Some(palette) = palette {
            trace!(palette = %palette, shade = key, "color token");
            tokens
                .colors
                .entry(palette)
                .or_default()
                .insert(key.to_string(), token);
            return;
        }

        let section = match category {
            Category::Color => return,
            Category::Spacing => &mut tokens.spacing,
            Category::FontSize => &mut tokens.typography.font_size,
            Category::FontWeight => &mut tokens.typography.font_weight,
            Category::LineHeight => &mut tokens.typography.line_height,
            Category::BorderRadius => &mut tokens.border_radius,
        };

        trace!(category = %category, name = key, "token");
        section.insert(key.to_lowercase(), token);
    }

    fn drop_leaf(&mut self, key: &str, leaf: &RawLeaf<'_>, path: &[String], reason: DropReason) {
        let mut full = path.join("/");
        if !full.is_empty() {
            full.push('/');
        }
        full.push_str(key);
        self.out.dropped.push(DroppedLeaf {
            path: full,
            token_type: leaf.token_type.to_string(),
            reason,
        });
    }
}
