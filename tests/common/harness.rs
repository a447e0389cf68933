// CodeBlockHarness - Virtual terminal environment for code block tests

use async_trait::async_trait;
use codeblock::primitives::highlighter::{PlainTokenizer, Tokenizer};
use codeblock::services::clipboard::Clipboard;
use codeblock::services::copy_feedback::CopyState;
use codeblock::view::code_block::{CodeBlock, CodeBlockProps, CopyOutcome, RenderedCodeBlock};
use codeblock::view::theme::Theme;
use codeblock::view::widget::CodeBlockWidget;
use ratatui::{backend::TestBackend, Terminal};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Clipboard that records every write and can be told to reject them
#[derive(Debug, Default)]
pub struct ScriptedClipboard {
    writes: Mutex<Vec<String>>,
    reject: AtomicBool,
}

impl ScriptedClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard whose writes are all denied, like a browser without permission
    pub fn rejecting() -> Self {
        let clipboard = Self::default();
        clipboard.set_rejecting(true);
        clipboard
    }

    pub fn set_rejecting(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clipboard for ScriptedClipboard {
    async fn write_text(&self, text: &str) -> anyhow::Result<()> {
        if self.reject.load(Ordering::SeqCst) {
            anyhow::bail!("clipboard write denied");
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Clipboard whose writes hang until released
#[derive(Debug, Default)]
pub struct GatedClipboard {
    release: Notify,
    written: Mutex<Option<String>>,
}

impl GatedClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let the pending write complete
    pub fn release(&self) {
        self.release.notify_one();
    }

    pub fn written(&self) -> Option<String> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clipboard for GatedClipboard {
    async fn write_text(&self, text: &str) -> anyhow::Result<()> {
        self.release.notified().await;
        *self.written.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

/// Advance the paused clock and let woken tasks run
pub async fn advance_ms(ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// One code block drawn into a virtual terminal
pub struct CodeBlockHarness {
    block: CodeBlock,

    /// Props used by the next render
    props: CodeBlockProps,

    /// Virtual terminal backend
    terminal: Terminal<TestBackend>,

    theme: Theme,

    /// View model from the most recent render
    last: Option<RenderedCodeBlock>,
}

impl CodeBlockHarness {
    /// Harness with the plain tokenizer and no clipboard
    pub fn new(width: u16, height: u16) -> io::Result<Self> {
        Self::with_parts(width, height, Arc::new(PlainTokenizer), None)
    }

    pub fn with_clipboard(
        width: u16,
        height: u16,
        clipboard: Arc<dyn Clipboard>,
    ) -> io::Result<Self> {
        Self::with_parts(width, height, Arc::new(PlainTokenizer), Some(clipboard))
    }

    pub fn with_parts(
        width: u16,
        height: u16,
        tokenizer: Arc<dyn Tokenizer>,
        clipboard: Option<Arc<dyn Clipboard>>,
    ) -> io::Result<Self> {
        let terminal = Terminal::new(TestBackend::new(width, height))?;
        Ok(Self {
            block: CodeBlock::new(tokenizer, clipboard),
            props: CodeBlockProps::new(""),
            terminal,
            theme: Theme::night_owl(),
            last: None,
        })
    }

    pub fn set_props(&mut self, props: CodeBlockProps) {
        self.props = props;
    }

    /// Render the block and draw it into the virtual terminal
    pub fn render(&mut self) -> io::Result<&RenderedCodeBlock> {
        let rendered = self.block.render(&self.props);
        let theme = &self.theme;
        self.terminal.draw(|frame| {
            frame.render_widget(CodeBlockWidget::new(&rendered, theme), frame.area());
        })?;
        Ok(self.last.insert(rendered))
    }

    /// View model from the last render
    pub fn rendered(&self) -> &RenderedCodeBlock {
        self.last.as_ref().expect("render() has not been called")
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn block(&self) -> &CodeBlock {
        &self.block
    }

    /// Take the block out of the harness, e.g. to drop it
    pub fn into_block(self) -> CodeBlock {
        self.block
    }

    /// Press the copy button
    pub async fn copy(&self) -> CopyOutcome {
        self.block.copy().await
    }

    pub fn copy_state(&self) -> CopyState {
        self.block.copy_state()
    }

    pub fn dispose(&self) {
        self.block.dispose();
    }

    pub fn buffer(&self) -> &ratatui::buffer::Buffer {
        self.terminal.backend().buffer()
    }

    /// Get a single row of the screen with trailing blanks removed
    pub fn get_row_text(&self, y: u16) -> String {
        let buffer = self.buffer();
        let mut row = String::new();
        for x in 0..buffer.area.width {
            row.push_str(buffer[(x, y)].symbol());
        }
        row.trim_end().to_string()
    }

    /// Get entire screen as string
    pub fn screen_to_string(&self) -> String {
        let height = self.buffer().area.height;
        (0..height)
            .map(|y| self.get_row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Verify text appears on screen
    pub fn assert_screen_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            screen.contains(text),
            "Expected screen to contain '{text}'\nScreen content:\n{screen}"
        );
    }

    /// Verify text does not appear on screen
    pub fn assert_screen_not_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            !screen.contains(text),
            "Expected screen to not contain '{text}'\nScreen content:\n{screen}"
        );
    }
}
