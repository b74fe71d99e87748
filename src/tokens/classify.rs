//! Token category classification.
//!
//! A leaf's category is decided from its declared `type` and the path of
//! group names above it. Predicates are evaluated in [`Category::PRECEDENCE`]
//! order and the first match wins.

/// Token types routed to the spacing section.
pub const SPACING_TYPES: &[&str] = &["dimension", "sizing", "spacing"];

/// Output section a leaf is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `colors[palette][shade]`
    Color,
    /// `spacing[name]`
    Spacing,
    /// `typography.fontSize[name]`
    FontSize,
    /// `typography.fontWeight[name]`
    FontWeight,
    /// `typography.lineHeight[name]`
    LineHeight,
    /// `borderRadius[name]`
    BorderRadius,
}

impl Category {
    /// Evaluation order of the classification predicates.
    pub const PRECEDENCE: [Self; 6] = [
        Self::Color,
        Self::Spacing,
        Self::FontSize,
        Self::FontWeight,
        Self::LineHeight,
        Self::BorderRadius,
    ];

    /// Classifies a leaf by its declared type and the group path above it.
    ///
    /// Returns `None` when no predicate matches; such leaves are dropped.
    #[must_use]
    pub fn classify<S: AsRef<str>>(token_type: &str, path: &[S]) -> Option<Self> {
        Self::PRECEDENCE
            .into_iter()
            .find(|category| category.matches(token_type, path))
    }

    /// Tests this category's predicate against a leaf.
    ///
    /// Spacing-family types only land in spacing when the path does not name
    /// a more specific group, so a `dimension` under `fontSize` is a font
    /// size and a `dimension` under `borderRadius` is a radius.
    #[must_use]
    pub fn matches<S: AsRef<str>>(self, token_type: &str, path: &[S]) -> bool {
        match self {
            Self::Color => token_type == "color",
            Self::Spacing => {
                SPACING_TYPES.contains(&token_type) && !names_specific_group(path)
            }
            Self::FontSize => {
                token_type == "fontSizes" || has_segment(path, &["fontsize", "font-size"])
            }
            Self::FontWeight => {
                token_type == "fontWeights" || has_segment(path, &["fontweight", "font-weight"])
            }
            Self::LineHeight => {
                token_type == "lineHeights" || has_segment(path, &["lineheight", "line-height"])
            }
            Self::BorderRadius => token_type == "borderRadius" || mentions_radius(path),
        }
    }

    /// The `type` written on tokens emitted into this category.
    #[must_use]
    pub const fn canonical_type(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Spacing | Self::BorderRadius => "dimension",
            Self::FontSize => "fontSizes",
            Self::FontWeight => "fontWeights",
            Self::LineHeight => "lineHeights",
        }
    }

    /// Short name used in logs and summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Spacing => "spacing",
            Self::FontSize => "fontSize",
            Self::FontWeight => "fontWeight",
            Self::LineHeight => "lineHeight",
            Self::BorderRadius => "borderRadius",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True if any path segment equals one of `names`, ignoring ASCII case.
fn has_segment<S: AsRef<str>>(path: &[S], names: &[&str]) -> bool {
    path.iter().any(|segment| {
        names
            .iter()
            .any(|name| segment.as_ref().eq_ignore_ascii_case(name))
    })
}

fn mentions_radius<S: AsRef<str>>(path: &[S]) -> bool {
    path.iter()
        .any(|segment| segment.as_ref().to_ascii_lowercase().contains("radius"))
}

fn names_specific_group<S: AsRef<str>>(path: &[S]) -> bool {
    has_segment(
        path,
        &[
            "fontsize",
            "font-size",
            "fontweight",
            "font-weight",
            "lineheight",
            "line-height",
        ],
    ) || mentions_radius(path)
}
