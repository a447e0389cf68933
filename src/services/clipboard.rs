//! Clipboard capability
//!
//! Code blocks only offer a copy button when a clipboard is available. The
//! capability is modelled as an injected trait object so that a block can be
//! built with the system clipboard, with nothing at all, or with a test double.

use async_trait::async_trait;

/// Asynchronous text clipboard
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    ///
    /// May fail at call time even when the clipboard was detected, e.g. when the
    /// platform denies access.
    async fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

/// The platform clipboard, accessed through arboard
#[cfg(feature = "system-clipboard")]
#[derive(Debug, Clone, Copy)]
pub struct SystemClipboard {
    _detected: (),
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    /// Probe for a usable system clipboard.
    ///
    /// Returns `None` on headless systems (no display server, no pasteboard).
    pub fn detect() -> Option<Self> {
        match arboard::Clipboard::new() {
            Ok(_) => Some(Self { _detected: () }),
            Err(e) => {
                tracing::debug!("System clipboard unavailable: {}", e);
                None
            }
        }
    }
}

#[cfg(feature = "system-clipboard")]
#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> anyhow::Result<()> {
        let text = text.to_string();
        // arboard blocks while the platform clipboard owner responds
        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            let mut clipboard = arboard::Clipboard::new()?;
            clipboard.set_text(text)?;
            Ok(())
        })
        .await?
    }
}

/// Detect the clipboard available to this process, if any.
pub fn detect_system_clipboard() -> Option<std::sync::Arc<dyn Clipboard>> {
    #[cfg(feature = "system-clipboard")]
    {
        SystemClipboard::detect().map(|clipboard| std::sync::Arc::new(clipboard) as _)
    }
    #[cfg(not(feature = "system-clipboard"))]
    {
        None
    }
}

/// Clipboard held in process memory.
///
/// Used when a real clipboard is not wanted, e.g. for previews and tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: std::sync::Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text written, if any
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> anyhow::Result<()> {
        *self
            .contents
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}
