// Table pagination domain model
use serde::Deserialize;

/// Window reported by the server alongside a table page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageWindow {
    pub page: u32,
    #[serde(default)]
    pub per_page: Option<u32>,
    pub total: u64,
    pub pages: u32,
}

impl PageWindow {
    pub fn prev_enabled(&self) -> bool {
        self.page > 1
    }

    pub fn next_enabled(&self) -> bool {
        self.page < self.pages
    }

    pub fn last_page(&self) -> u32 {
        self.pages.max(1)
    }
}

/// Locally held table cursor.
///
/// The cursor decides which page is requested next; the last server window
/// decides whether navigation is allowed at all. The cursor never leaves
/// `[1, max(1, pages)]` of the last window it has seen.
#[derive(Debug, Clone)]
pub struct PageCursor {
    page: u32,
    per_page: u32,
    window: Option<PageWindow>,
}

impl PageCursor {
    pub fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            window: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn can_retreat(&self) -> bool {
        self.page > 1
    }

    /// Before the first window arrives there is no known upper bound.
    pub fn can_advance(&self) -> bool {
        self.window.map(|w| w.next_enabled()).unwrap_or(true)
    }

    /// Moves one page forward. Returns false when "next" is disabled.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.page = self.clamp(self.page.saturating_add(1));
        true
    }

    /// Moves one page back. Returns false at page 1.
    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Records the window of a successful fetch and pulls the cursor back in range.
    pub fn observe(&mut self, window: PageWindow) {
        self.window = Some(window);
        self.page = self.clamp(self.page);
    }

    fn clamp(&self, page: u32) -> u32 {
        let last = self.window.map(|w| w.last_page()).unwrap_or(u32::MAX);
        page.clamp(1, last)
    }
}
