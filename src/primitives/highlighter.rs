//! Syntax tokenization with tree-sitter
//!
//! # Design
//! - **Injected**: renderers depend on the [`Tokenizer`] trait, never on a grammar
//!   directly, so they can be exercised with a deterministic stand-in.
//! - **Line-oriented output**: highlight events are split at `\n` into
//!   [`TokenLine`]s, so a multi-line comment becomes one span per line.
//! - **Never fails**: an unsupported language, a grammar that refuses to load,
//!   or a highlight error all degrade to plain, unclassified text.
//! - **Lazy grammars**: highlight configurations are built on first use and
//!   cached per language for the lifetime of the tokenizer.

use crate::primitives::language::LanguageTag;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tree_sitter_highlight::{HighlightConfiguration, HighlightEvent, Highlighter as TSHighlighter};

/// Inputs larger than this are shown as plain text rather than parsed
const MAX_TOKENIZE_BYTES: usize = 1024 * 1024;

/// Classification applied to a highlighted span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightCategory {
    Attribute,
    Comment,
    Constant,
    Function,
    Keyword,
    Number,
    Operator,
    Property,
    Punctuation,
    String,
    Tag,
    Type,
    Variable,
}

impl HighlightCategory {
    /// Class name used when the category is rendered as markup
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Attribute => "attribute",
            Self::Comment => "comment",
            Self::Constant => "constant",
            Self::Function => "function",
            Self::Keyword => "keyword",
            Self::Number => "number",
            Self::Operator => "operator",
            Self::Property => "property",
            Self::Punctuation => "punctuation",
            Self::String => "string",
            Self::Tag => "tag",
            Self::Type => "type",
            Self::Variable => "variable",
        }
    }
}

/// Capture names recognized across all grammars, with the category each maps to.
///
/// tree-sitter-highlight resolves a capture such as `punctuation.bracket` to the
/// longest matching entry here, so the position of an entry is its highlight index.
const HIGHLIGHT_NAMES: &[(&str, HighlightCategory)] = &[
    ("attribute", HighlightCategory::Attribute),
    ("comment", HighlightCategory::Comment),
    ("constant", HighlightCategory::Constant),
    ("constant.builtin", HighlightCategory::Constant),
    ("constructor", HighlightCategory::Type),
    ("embedded", HighlightCategory::Variable), // template substitutions
    ("escape", HighlightCategory::String),
    ("function", HighlightCategory::Function),
    ("function.builtin", HighlightCategory::Function),
    ("function.method", HighlightCategory::Function),
    ("keyword", HighlightCategory::Keyword),
    ("number", HighlightCategory::Number),
    ("operator", HighlightCategory::Operator),
    ("property", HighlightCategory::Property),
    ("punctuation", HighlightCategory::Punctuation),
    ("punctuation.bracket", HighlightCategory::Punctuation),
    ("punctuation.delimiter", HighlightCategory::Punctuation),
    ("punctuation.special", HighlightCategory::Punctuation), // template ${}
    ("string", HighlightCategory::String),
    ("string.special", HighlightCategory::String), // regex
    ("string.special.key", HighlightCategory::Property), // JSON object keys
    ("tag", HighlightCategory::Tag),
    ("type", HighlightCategory::Type),
    ("type.builtin", HighlightCategory::Type),
    ("variable", HighlightCategory::Variable),
    ("variable.builtin", HighlightCategory::Constant), // this, super, arguments
    ("variable.parameter", HighlightCategory::Variable),
];

fn category_for_index(index: usize) -> Option<HighlightCategory> {
    HIGHLIGHT_NAMES.get(index).map(|(_, category)| *category)
}

/// One classified fragment of a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub text: String,
    /// `None` for text no grammar rule classified
    pub category: Option<HighlightCategory>,
}

impl TokenSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: None,
        }
    }

    pub fn classified(text: impl Into<String>, category: HighlightCategory) -> Self {
        Self {
            text: text.into(),
            category: Some(category),
        }
    }
}

/// One line of tokenizer output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenLine {
    pub spans: Vec<TokenSpan>,
}

impl TokenLine {
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|span| span.text.is_empty())
    }

    /// The line's text with classification dropped
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Complete tokenizer output for one block of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    pub lines: Vec<TokenLine>,
    /// Class describing the whole container, e.g. `language-tsx`
    pub container_class: String,
}

impl Tokenized {
    /// Split `text` into unclassified lines
    pub fn plain(text: &str, language: LanguageTag) -> Self {
        let lines = text
            .split('\n')
            .map(|line| TokenLine {
                spans: if line.is_empty() {
                    Vec::new()
                } else {
                    vec![TokenSpan::plain(line)]
                },
            })
            .collect();

        Self {
            lines,
            container_class: container_class(language),
        }
    }
}

/// Class name describing a container tokenized as `language`
pub fn container_class(language: LanguageTag) -> String {
    format!("language-{language}")
}

/// Turns normalized source text into classified lines.
///
/// Implementations must be deterministic for a given `(text, language)` pair
/// and must not panic for any input.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str, language: LanguageTag) -> Tokenized;
}

/// Tokenizer that never classifies anything
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTokenizer;

impl Tokenizer for PlainTokenizer {
    fn tokenize(&self, text: &str, language: LanguageTag) -> Tokenized {
        Tokenized::plain(text, language)
    }
}

/// Where a language's grammar and queries come from
struct GrammarSource {
    language: tree_sitter::Language,
    name: &'static str,
    highlights: String,
    locals: &'static str,
}

impl GrammarSource {
    fn for_language(language: LanguageTag) -> Option<Self> {
        match language {
            LanguageTag::Tsx => Some(Self {
                language: tree_sitter_typescript::LANGUAGE_TSX.into(),
                name: "tsx",
                // TypeScript-specific highlights come first (higher priority),
                // followed by the JSX and JavaScript base highlights
                highlights: [
                    tree_sitter_typescript::HIGHLIGHTS_QUERY,
                    tree_sitter_javascript::JSX_HIGHLIGHT_QUERY,
                    tree_sitter_javascript::HIGHLIGHT_QUERY,
                ]
                .join("\n"),
                locals: tree_sitter_typescript::LOCALS_QUERY,
            }),
            LanguageTag::JavaScript => Some(Self {
                language: tree_sitter_javascript::LANGUAGE.into(),
                name: "javascript",
                highlights: tree_sitter_javascript::HIGHLIGHT_QUERY.to_string(),
                locals: "",
            }),
            LanguageTag::Jsx => Some(Self {
                language: tree_sitter_javascript::LANGUAGE.into(),
                name: "jsx",
                highlights: [
                    tree_sitter_javascript::JSX_HIGHLIGHT_QUERY,
                    tree_sitter_javascript::HIGHLIGHT_QUERY,
                ]
                .join("\n"),
                locals: "",
            }),
            LanguageTag::Json => Some(Self {
                language: tree_sitter_json::LANGUAGE.into(),
                name: "json",
                highlights: tree_sitter_json::HIGHLIGHTS_QUERY.to_string(),
                locals: "",
            }),
            LanguageTag::Css => Some(Self {
                language: tree_sitter_css::LANGUAGE.into(),
                name: "css",
                highlights: tree_sitter_css::HIGHLIGHTS_QUERY.to_string(),
                locals: "",
            }),
            LanguageTag::Markup => Some(Self {
                language: tree_sitter_html::LANGUAGE.into(),
                name: "html",
                highlights: tree_sitter_html::HIGHLIGHTS_QUERY.to_string(),
                locals: "",
            }),
            LanguageTag::Plain => None,
        }
    }

    fn build(self) -> Result<HighlightConfiguration, String> {
        let mut config = HighlightConfiguration::new(
            self.language,
            self.name,
            &self.highlights,
            "", // injections query
            self.locals,
        )
        .map_err(|e| format!("Failed to create {} highlight config: {e}", self.name))?;

        let names: Vec<&str> = HIGHLIGHT_NAMES.iter().map(|(name, _)| *name).collect();
        config.configure(&names);

        Ok(config)
    }
}

/// Accumulates highlight output into lines, splitting fragments at `\n`
#[derive(Default)]
struct LineBuilder {
    finished: Vec<TokenLine>,
    current: TokenLine,
}

impl LineBuilder {
    fn push(&mut self, fragment: &str, category: Option<HighlightCategory>) {
        let mut pieces = fragment.split('\n');
        if let Some(first) = pieces.next() {
            self.push_piece(first, category);
        }
        for piece in pieces {
            self.finished.push(std::mem::take(&mut self.current));
            self.push_piece(piece, category);
        }
    }

    fn push_piece(&mut self, piece: &str, category: Option<HighlightCategory>) {
        if !piece.is_empty() {
            self.current.spans.push(TokenSpan {
                text: piece.to_string(),
                category,
            });
        }
    }

    fn finish(mut self) -> Vec<TokenLine> {
        self.finished.push(self.current);
        self.finished
    }
}

/// Tokenizer backed by tree-sitter grammars
pub struct TreeSitterTokenizer {
    /// Built configurations; `None` records a grammar that failed to load
    configs: Mutex<HashMap<LanguageTag, Option<Arc<HighlightConfiguration>>>>,
}

impl Default for TreeSitterTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeSitterTokenizer {
    pub fn new() -> Self {
        Self {
            configs: Mutex::new(HashMap::new()),
        }
    }

    fn config(&self, language: LanguageTag) -> Option<Arc<HighlightConfiguration>> {
        let mut configs = self.configs.lock().unwrap_or_else(PoisonError::into_inner);
        configs
            .entry(language)
            .or_insert_with(|| {
                let source = GrammarSource::for_language(language)?;
                match source.build() {
                    Ok(config) => Some(Arc::new(config)),
                    Err(e) => {
                        tracing::warn!("{}", e);
                        None
                    }
                }
            })
            .clone()
    }

    fn highlight(config: &HighlightConfiguration, text: &str) -> Result<Vec<TokenLine>, String> {
        let source = text.as_bytes();
        let mut ts_highlighter = TSHighlighter::new();
        let events = ts_highlighter
            .highlight(
                config,
                source,
                None,     // cancellation flag
                |_| None, // injection callback
            )
            .map_err(|e| format!("Failed to highlight: {e}"))?;

        let mut builder = LineBuilder::default();
        let mut active: Vec<Option<HighlightCategory>> = Vec::new();

        for event in events {
            match event.map_err(|e| format!("Highlight error: {e}"))? {
                HighlightEvent::Source { start, end } => {
                    let fragment = String::from_utf8_lossy(&source[start..end]);
                    builder.push(&fragment, active.last().copied().flatten());
                }
                HighlightEvent::HighlightStart(highlight) => {
                    active.push(category_for_index(highlight.0));
                }
                HighlightEvent::HighlightEnd => {
                    active.pop();
                }
            }
        }

        Ok(builder.finish())
    }
}

impl Tokenizer for TreeSitterTokenizer {
    fn tokenize(&self, text: &str, language: LanguageTag) -> Tokenized {
        if text.len() > MAX_TOKENIZE_BYTES {
            tracing::warn!(
                "Code block too large to highlight: {} bytes (limit {}), showing plain text",
                text.len(),
                MAX_TOKENIZE_BYTES
            );
            return Tokenized::plain(text, language);
        }

        let Some(config) = self.config(language) else {
            return Tokenized::plain(text, language);
        };

        match Self::highlight(&config, text) {
            Ok(lines) => Tokenized {
                lines,
                container_class: container_class(language),
            },
            Err(e) => {
                tracing::warn!("{} ({} grammar), showing plain text", e, language);
                Tokenized::plain(text, language)
            }
        }
    }
}
