//! Section artifact rendering.
//!
//! Each non-empty section of a [`NormalizedTokenSet`] becomes one JSON file
//! in the shape the utility-class generator reads.

use indexmap::IndexMap;
use serde::Serialize;

use crate::tokens::{NormalizedTokenSet, TokenMap};

/// One output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// `colors.json`
    Colors,
    /// `spacing.json`
    Spacing,
    /// `typography.json`
    Typography,
    /// `border-radius.json`
    BorderRadius,
}

impl Section {
    /// All sections, in write order.
    pub const ALL: [Self; 4] = [
        Self::Colors,
        Self::Spacing,
        Self::Typography,
        Self::BorderRadius,
    ];

    /// File name of this section's artifact.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Colors => "colors.json",
            Self::Spacing => "spacing.json",
            Self::Typography => "typography.json",
            Self::BorderRadius => "border-radius.json",
        }
    }

    /// Short name used in logs and summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Colors => "colors",
            Self::Spacing => "spacing",
            Self::Typography => "typography",
            Self::BorderRadius => "borderRadius",
        }
    }

    /// Returns `true` when the section has nothing to write.
    #[must_use]
    pub fn is_empty_in(self, set: &NormalizedTokenSet) -> bool {
        match self {
            Self::Colors => set.colors.is_empty(),
            Self::Spacing => set.spacing.is_empty(),
            Self::Typography => set.typography.is_empty(),
            Self::BorderRadius => set.border_radius.is_empty(),
        }
    }

    /// Renders the section as pretty-printed JSON with a trailing newline.
    ///
    /// Returns `None` for an empty section.
    ///
    /// # Errors
    ///
    /// Returns a serialization error (not expected for these types).
    pub fn render(self, set: &NormalizedTokenSet) -> Option<Result<Vec<u8>, serde_json::Error>> {
        if self.is_empty_in(set) {
            return None;
        }
        let rendered = match self {
            Self::Colors => to_file(&ColorsFile { color: &set.colors }),
            Self::Spacing => to_file(&SpacingFile {
                spacing: &set.spacing,
            }),
            Self::Typography => to_file(&set.typography),
            Self::BorderRadius => to_file(&BorderRadiusFile {
                border_radius: &set.border_radius,
            }),
        };
        Some(rendered)
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct ColorsFile<'a> {
    color: &'a IndexMap<String, TokenMap>,
}

#[derive(Serialize)]
struct SpacingFile<'a> {
    spacing: &'a TokenMap,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BorderRadiusFile<'a> {
    border_radius: &'a TokenMap,
}

fn to_file<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}
