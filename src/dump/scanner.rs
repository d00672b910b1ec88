//! Page scanner state machine.
//!
//! Walks the `page` elements of one segment and captures the `text` body of
//! the page whose direct `id` child equals the target. Only an `id` or a
//! matching `text` is ever buffered, so memory stays bounded by one of those
//! regardless of segment size.

/// Where the scanner is relative to the pages of the segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Before the first page or between pages
    Outside,
    /// Inside a page that has not matched (yet)
    InPage,
    /// Buffering an `id` element
    InId,
    /// Skipping the body of a non-matching page
    InText,
    /// The current page's id matched; waiting for its `text`
    FoundId,
    /// Buffering the body of the matching page
    InMatchText,
}

/// Per-extraction scanner state. Never shared between extractions.
#[derive(Debug)]
pub struct PageScanner<'a> {
    target: &'a str,
    depth: usize,
    page_depth: usize,
    state: ScanState,
    buffer: String,
}

impl<'a> PageScanner<'a> {
    pub fn new(target: &'a str) -> Self {
        Self {
            target,
            depth: 0,
            page_depth: 0,
            state: ScanState::Outside,
            buffer: String::new(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Text accumulated so far for the element being captured
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Handle an element start tag by local name.
    pub fn on_start(&mut self, name: &[u8]) {
        self.depth += 1;
        match name {
            b"page" => {
                self.page_depth = self.depth;
                self.state = ScanState::InPage;
            }
            b"id" if self.state != ScanState::FoundId => {
                self.state = ScanState::InId;
            }
            b"text" => {
                self.state = if self.state == ScanState::FoundId {
                    ScanState::InMatchText
                } else {
                    ScanState::InText
                };
            }
            _ => {}
        }
    }

    /// Handle an element end tag by local name.
    ///
    /// Returns the article body once the matching page's `text` closes.
    pub fn on_end(&mut self, name: &[u8]) -> Option<String> {
        self.depth = self.depth.saturating_sub(1);
        match name {
            b"page" => {
                self.state = ScanState::Outside;
            }
            b"id" if self.state != ScanState::FoundId => {
                self.state = ScanState::InPage;
                // Only the page's direct child is its id; revision and
                // contributor ids sit deeper.
                if self.depth == self.page_depth && self.buffer.trim() == self.target {
                    self.state = ScanState::FoundId;
                }
                self.buffer.clear();
            }
            b"text" => {
                if self.state == ScanState::InMatchText {
                    return Some(std::mem::take(&mut self.buffer));
                }
                self.state = ScanState::InPage;
            }
            _ => {}
        }
        None
    }

    /// Handle character data. Ignored unless an id or the matching body is
    /// being captured.
    pub fn on_text(&mut self, text: &str) {
        if matches!(self.state, ScanState::InId | ScanState::InMatchText) {
            self.buffer.push_str(text);
        }
    }
}
