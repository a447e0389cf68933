//! Highlighting grammar selection
//!
//! A [`LanguageTag`] names the grammar a code block is tokenized with. It is
//! either supplied explicitly or inferred from the block's filename. Inference
//! never fails: anything unrecognized is shown as plain text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grammar used to tokenize a code block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    /// TypeScript with embedded JSX markup (used for both `.ts` and `.tsx`)
    Tsx,
    JavaScript,
    Jsx,
    Json,
    Css,
    /// HTML and similar tag-based markup
    Markup,
    Plain,
}

impl LanguageTag {
    /// Every tag, in declaration order
    pub const ALL: [LanguageTag; 7] = [
        Self::Tsx,
        Self::JavaScript,
        Self::Jsx,
        Self::Json,
        Self::Css,
        Self::Markup,
        Self::Plain,
    ];

    /// Tag used when nothing better is known
    pub const FALLBACK: LanguageTag = LanguageTag::Plain;

    /// Map a file extension (without the dot) to a tag. Case-insensitive.
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "ts" | "tsx" => Self::Tsx,
            "js" => Self::JavaScript,
            "jsx" => Self::Jsx,
            "json" => Self::Json,
            "css" => Self::Css,
            "html" | "htm" => Self::Markup,
            _ => Self::FALLBACK,
        }
    }

    /// Canonical lower-case name, also used in `language-*` class names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tsx => "tsx",
            Self::JavaScript => "javascript",
            Self::Jsx => "jsx",
            Self::Json => "json",
            Self::Css => "css",
            Self::Markup => "markup",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageTag {
    type Err = String;

    /// Parse a tag name. Accepts the canonical names plus a few common aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tsx" | "ts" | "typescript" => Ok(Self::Tsx),
            "javascript" | "js" => Ok(Self::JavaScript),
            "jsx" => Ok(Self::Jsx),
            "json" => Ok(Self::Json),
            "css" => Ok(Self::Css),
            "markup" | "html" | "htm" => Ok(Self::Markup),
            "plain" | "text" | "txt" => Ok(Self::Plain),
            other => Err(format!(
                "unknown language '{other}' (expected one of: {})",
                LanguageTag::ALL.map(|tag| tag.as_str()).join(", ")
            )),
        }
    }
}

/// Infer the grammar for a filename.
///
/// The extension is whatever follows the last `.`; a name without a dot is
/// treated as an extension in its own right, so `"json"` infers JSON while
/// `"Makefile"` falls back to plain text. A missing filename is plain text.
pub fn infer_language(filename: Option<&str>) -> LanguageTag {
    let Some(filename) = filename else {
        return LanguageTag::FALLBACK;
    };

    match filename.rsplit('.').next() {
        Some(extension) => LanguageTag::from_extension(extension),
        None => LanguageTag::FALLBACK,
    }
}

/// Resolve the language for a block: an explicit tag wins, otherwise infer
/// from the filename.
pub fn resolve_language(explicit: Option<LanguageTag>, filename: Option<&str>) -> LanguageTag {
    explicit.unwrap_or_else(|| infer_language(filename))
}
