//! Code block renderer
//!
//! [`CodeBlock`] is one displayed code block. Each call to [`CodeBlock::render`]
//! takes the current [`CodeBlockProps`] and produces a [`RenderedCodeBlock`]
//! view model that the HTML and terminal surfaces draw from.
//!
//! # Design
//! - **Per-instance memoization**: normalization, language inference and
//!   tokenization are cached against the `(code, language, filename)` of the
//!   last render. Re-rendering with the same inputs never calls the tokenizer.
//! - **Index-derived keys**: lines and spans are keyed by position only, since
//!   identical text legitimately repeats.
//! - **Copy feedback is the only state**: everything else is a pure function of
//!   the props. The copy handler writes the caller's original text, not the
//!   normalized text.

use crate::config::Config;
use crate::primitives::highlighter::{
    HighlightCategory, PlainTokenizer, Tokenized, Tokenizer, TreeSitterTokenizer,
};
use crate::primitives::language::{resolve_language, LanguageTag};
use crate::primitives::normalize::{format_line_number, line_count, line_number_width, normalize_source};
use crate::services::clipboard::Clipboard;
use crate::services::copy_feedback::{CopyFeedback, CopyState, DEFAULT_RESET_DELAY};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Base class of the container; BEM-style element classes derive from it
pub const BLOCK_CLASS: &str = "code-block";

/// Caller-supplied inputs for one render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockProps {
    /// Source text exactly as the caller has it (any line endings)
    pub code: String,
    /// Explicit grammar; inferred from `filename` when absent
    pub language: Option<LanguageTag>,
    /// Shown in the header and used for language inference
    pub filename: Option<String>,
    pub show_line_numbers: bool,
    /// Extra container classes, passed through untouched
    pub class_name: Option<String>,
}

impl CodeBlockProps {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: None,
            filename: None,
            show_line_numbers: true,
            class_name: None,
        }
    }

    pub fn with_language(mut self, language: LanguageTag) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_line_numbers(mut self, show: bool) -> Self {
        self.show_line_numbers = show;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Filename to display; an empty name counts as none
    fn display_filename(&self) -> Option<&str> {
        self.filename.as_deref().filter(|name| !name.is_empty())
    }
}

/// View model produced by one render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCodeBlock {
    /// Container class list: [`BLOCK_CLASS`] plus any caller classes
    pub class_name: String,
    /// Present when there is a filename or a copy button to show
    pub header: Option<Header>,
    pub language: LanguageTag,
    /// Tokenizer-provided container class, e.g. `language-tsx`
    pub language_class: String,
    pub normalized_code: String,
    /// Width shared by every line-number label
    pub line_number_width: usize,
    pub lines: Vec<RenderedLine>,
}

impl RenderedCodeBlock {
    /// Number of line-number labels rendered
    pub fn line_number_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| line.number_label.is_some())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub filename: Option<String>,
    pub copy_button: Option<CopyButton>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyButton {
    pub label: String,
    pub copied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// `line-{index}`
    pub key: String,
    /// Left-padded 1-based line number, when line numbers are shown
    pub number_label: Option<String>,
    pub spans: Vec<RenderedSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSpan {
    /// `token-{line}-{index}`
    pub key: String,
    pub text: String,
    pub category: Option<HighlightCategory>,
}

impl RenderedSpan {
    /// Presentational class list, e.g. `token keyword` or `token plain`
    pub fn class_name(&self) -> String {
        match self.category {
            Some(category) => format!("token {}", category.class_name()),
            None => "token plain".to_string(),
        }
    }
}

/// Result of a copy request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Text written and the confirmation armed
    Copied,
    /// The clipboard refused the write; state unchanged
    Failed,
    /// No clipboard, or nothing rendered yet
    Unavailable,
    /// The write finished after the block went away; state untouched
    Dismissed,
}

/// Inputs the memoized values were derived from
#[derive(Debug, PartialEq, Eq)]
struct MemoKey {
    code: String,
    language: Option<LanguageTag>,
    filename: Option<String>,
}

impl MemoKey {
    fn matches(&self, props: &CodeBlockProps) -> bool {
        self.code == props.code && self.language == props.language && self.filename == props.filename
    }
}

#[derive(Debug)]
struct Derived {
    normalized: String,
    language: LanguageTag,
    line_number_width: usize,
    tokenized: Tokenized,
}

/// One displayed code block
pub struct CodeBlock {
    tokenizer: Arc<dyn Tokenizer>,
    clipboard: Option<Arc<dyn Clipboard>>,
    feedback: CopyFeedback,
    copy_label: String,
    copied_label: String,
    memo: Option<(MemoKey, Arc<Derived>)>,
}

impl CodeBlock {
    /// Block with the default reset delay and labels
    pub fn new(tokenizer: Arc<dyn Tokenizer>, clipboard: Option<Arc<dyn Clipboard>>) -> Self {
        Self {
            tokenizer,
            clipboard,
            feedback: CopyFeedback::new(DEFAULT_RESET_DELAY),
            copy_label: "Copy".to_string(),
            copied_label: "Copied".to_string(),
            memo: None,
        }
    }

    /// Block configured from `config`, with the tree-sitter tokenizer unless
    /// highlighting is disabled
    pub fn from_config(config: &Config, clipboard: Option<Arc<dyn Clipboard>>) -> Self {
        let tokenizer: Arc<dyn Tokenizer> = if config.code_block.syntax_highlighting {
            Arc::new(TreeSitterTokenizer::new())
        } else {
            Arc::new(PlainTokenizer)
        };

        Self::new(tokenizer, clipboard)
            .with_copy_reset_delay(config.code_block.copy_reset_delay())
            .with_labels(&config.code_block.copy_label, &config.code_block.copied_label)
    }

    pub fn with_copy_reset_delay(mut self, delay: Duration) -> Self {
        self.feedback = CopyFeedback::new(delay);
        self
    }

    pub fn with_labels(mut self, copy_label: &str, copied_label: &str) -> Self {
        self.copy_label = copy_label.to_string();
        self.copied_label = copied_label.to_string();
        self
    }

    /// How long the "copied" confirmation stays up
    pub fn copy_reset_delay(&self) -> Duration {
        self.feedback.reset_after()
    }

    pub fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    pub fn copy_state(&self) -> CopyState {
        self.feedback.state()
    }

    /// Copy state transitions, for scheduling redraws
    pub fn subscribe_copy_state(&self) -> watch::Receiver<CopyState> {
        self.feedback.subscribe()
    }

    /// Produce the view model for `props`.
    pub fn render(&mut self, props: &CodeBlockProps) -> RenderedCodeBlock {
        let derived = self.derive(props);

        let show_numbers = props.show_line_numbers && !derived.tokenized.lines.is_empty();
        let lines = derived
            .tokenized
            .lines
            .iter()
            .enumerate()
            .map(|(line_index, line)| RenderedLine {
                key: format!("line-{line_index}"),
                number_label: show_numbers
                    .then(|| format_line_number(line_index, derived.line_number_width)),
                spans: line
                    .spans
                    .iter()
                    .enumerate()
                    .map(|(span_index, span)| RenderedSpan {
                        key: format!("token-{line_index}-{span_index}"),
                        text: span.text.clone(),
                        category: span.category,
                    })
                    .collect(),
            })
            .collect();

        RenderedCodeBlock {
            class_name: container_class_name(props.class_name.as_deref()),
            header: self.header(props),
            language: derived.language,
            language_class: derived.tokenized.container_class.clone(),
            normalized_code: derived.normalized.clone(),
            line_number_width: derived.line_number_width,
            lines,
        }
    }

    fn header(&self, props: &CodeBlockProps) -> Option<Header> {
        let filename = props.display_filename().map(str::to_string);
        let copy_button = self.clipboard.as_ref().map(|_| {
            let copied = self.feedback.state() == CopyState::Copied;
            CopyButton {
                label: if copied {
                    self.copied_label.clone()
                } else {
                    self.copy_label.clone()
                },
                copied,
            }
        });

        if filename.is_none() && copy_button.is_none() {
            return None;
        }
        Some(Header {
            filename,
            copy_button,
        })
    }

    /// Memoized normalization, inference and tokenization
    fn derive(&mut self, props: &CodeBlockProps) -> Arc<Derived> {
        if let Some((key, derived)) = &self.memo {
            if key.matches(props) {
                return Arc::clone(derived);
            }
        }

        let normalized = normalize_source(&props.code);
        let language = resolve_language(props.language, props.filename.as_deref());
        let width = line_number_width(line_count(&normalized));

        tracing::debug!(
            "Tokenizing code block: {} bytes as {}",
            normalized.len(),
            language
        );
        let tokenized = self.tokenizer.tokenize(&normalized, language);

        let derived = Arc::new(Derived {
            normalized,
            language,
            line_number_width: width,
            tokenized,
        });
        self.memo = Some((
            MemoKey {
                code: props.code.clone(),
                language: props.language,
                filename: props.filename.clone(),
            },
            Arc::clone(&derived),
        ));
        derived
    }

    /// Copy handler for the copy button.
    ///
    /// Writes the original text of the last render. The returned future owns
    /// everything it needs, so it may be spawned and may outlive the block;
    /// a write that completes after disposal leaves the state alone. Failures
    /// are logged at debug level and otherwise ignored.
    pub fn copy(&self) -> impl Future<Output = CopyOutcome> + Send + 'static {
        let clipboard = self.clipboard.clone();
        let code = self.memo.as_ref().map(|(key, _)| key.code.clone());
        let feedback = self.feedback.handle();

        async move {
            let (Some(clipboard), Some(code)) = (clipboard, code) else {
                return CopyOutcome::Unavailable;
            };

            match clipboard.write_text(&code).await {
                Ok(()) => {
                    if feedback.mark_copied() {
                        CopyOutcome::Copied
                    } else {
                        CopyOutcome::Dismissed
                    }
                }
                Err(e) => {
                    // Clipboard access is often blocked by the platform; nothing to surface
                    tracing::debug!("Clipboard write failed: {:#}", e);
                    CopyOutcome::Failed
                }
            }
        }
    }

    /// Remove the block from display: cancels any pending reset.
    pub fn dispose(&self) {
        self.feedback.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.feedback.is_disposed()
    }
}

impl std::fmt::Debug for CodeBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeBlock")
            .field("has_clipboard", &self.has_clipboard())
            .field("feedback", &self.feedback)
            .field("memoized", &self.memo.is_some())
            .finish()
    }
}

fn container_class_name(extra: Option<&str>) -> String {
    match extra.map(str::trim).filter(|extra| !extra.is_empty()) {
        Some(extra) => format!("{BLOCK_CLASS} {extra}"),
        None => BLOCK_CLASS.to_string(),
    }
}
