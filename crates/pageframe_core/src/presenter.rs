pub const WARNING_GLYPH: &str = "\u{26A0}\u{FE0F}";

/// Single-slot error banner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorBanner {
    text: Option<String>,
    visible: bool,
}

impl ErrorBanner {
    pub fn show(&mut self, message: &str) {
        self.text = Some(format!("{WARNING_GLYPH} {message}"));
        self.visible = true;
    }

    /// Hides the banner and reports whether it was showing.
    pub fn clear(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Banner text while visible.
    pub fn visible_text(&self) -> Option<&str> {
        if self.visible {
            self.text.as_deref()
        } else {
            None
        }
    }
}
