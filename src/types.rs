//! Core types for surface-host.
//!
//! These types define the foundation that everything builds on.
//! They flow between the remote commit stream and the native controls,
//! and define what the reconciliation protocol understands.

// =============================================================================
// Selection
// =============================================================================

/// An ordered selection range in character offsets.
///
/// Invariant: `start <= end`. A collapsed selection (`start == end`) is a
/// caret. Offsets count characters, not bytes, so they survive multi-byte
/// text unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Create a selection, swapping the ends if given in reverse order.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// A collapsed selection (caret) at `offset`.
    pub const fn caret(offset: usize) -> Self {
        Self { start: offset, end: offset }
    }

    /// Check if the selection is collapsed (no range, just a caret).
    pub const fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Number of characters covered.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the selection covers zero characters.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clamp both ends into `[0, len]`, preserving order.
    pub fn clamped(&self, len: usize) -> Self {
        let start = self.start.min(len);
        let end = self.end.min(len).max(start);
        Self { start, end }
    }

    /// Check that the selection is valid for text of `len` characters.
    pub fn is_valid_for(&self, len: usize) -> bool {
        self.start <= self.end && self.end <= len
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Rendered content size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub const ZERO: Self = Self { width: 0, height: 0 };
}

/// Scroll position of a control's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollOffset {
    pub x: u16,
    pub y: u16,
}

impl ScrollOffset {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Insets on the four edges of a control, in cells.
///
/// Used for both padding insets (content inset from the control edge) and
/// border insets (border thickness per edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeInsets {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl EdgeInsets {
    pub const fn new(top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self { top, right, bottom, left }
    }

    /// Uniform insets on all four edges.
    pub const fn uniform(value: u16) -> Self {
        Self { top: value, right: value, bottom: value, left: value }
    }

    pub const ZERO: Self = Self { top: 0, right: 0, bottom: 0, left: 0 };

    /// Total horizontal inset (left + right).
    pub const fn horizontal(&self) -> u16 {
        self.left + self.right
    }

    /// Total vertical inset (top + bottom).
    pub const fn vertical(&self) -> u16 {
        self.top + self.bottom
    }

    /// Shrink a size by these insets (saturating).
    pub fn inset(&self, size: Size) -> Size {
        Size {
            width: size.width.saturating_sub(self.horizontal()),
            height: size.height.saturating_sub(self.vertical()),
        }
    }
}

// =============================================================================
// Text Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `TextAttr::BOLD | TextAttr::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextAttr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const STRIKETHROUGH = 1 << 4;
    }
}

// =============================================================================
// Styled Text
// =============================================================================

/// A contiguous run of characters sharing one attribute set.
///
/// `start` and `len` are character offsets into the owning text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRun {
    pub start: usize,
    pub len: usize,
    pub attrs: TextAttr,
}

impl StyleRun {
    pub const fn new(start: usize, len: usize, attrs: TextAttr) -> Self {
        Self { start, len, attrs }
    }
}

/// Text content with style runs - the unit the commit stream carries and
/// the backing control displays.
///
/// Runs are clamped to the text length on construction so a `StyledText`
/// is always internally consistent. Plain (unstyled) text has no runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    text: String,
    runs: Vec<StyleRun>,
}

impl StyledText {
    /// Plain text with no style runs.
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), runs: Vec::new() }
    }

    /// Styled text. Runs that start past the end are discarded; runs that
    /// overhang the end are shortened.
    pub fn with_runs(text: impl Into<String>, runs: Vec<StyleRun>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        let runs = runs
            .into_iter()
            .filter(|run| run.start < len && run.len > 0)
            .map(|run| StyleRun {
                start: run.start,
                len: run.len.min(len - run.start),
                attrs: run.attrs,
            })
            .collect();
        Self { text, runs }
    }

    /// The raw text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The style runs.
    pub fn runs(&self) -> &[StyleRun] {
        &self.runs
    }

    /// Length in characters (not bytes).
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Rendered size: widest line in characters x line count.
    ///
    /// Empty text still occupies one line (the caret line).
    pub fn content_size(&self) -> Size {
        let mut width = 0usize;
        let mut height = 0u16;
        for line in self.text.split('\n') {
            width = width.max(line.chars().count());
            height += 1;
        }
        Size {
            width: width.min(u16::MAX as usize) as u16,
            height: height.max(1),
        }
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        Self::plain(text)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_ordering() {
        let sel = Selection::new(7, 3);
        assert_eq!(sel.start, 3);
        assert_eq!(sel.end, 7);
        assert_eq!(sel.len(), 4);
    }

    #[test]
    fn test_selection_caret() {
        let sel = Selection::caret(5);
        assert!(sel.is_collapsed());
        assert!(sel.is_empty());
        assert_eq!(sel.start, 5);
        assert_eq!(sel.end, 5);
    }

    #[test]
    fn test_selection_clamp() {
        // Both ends beyond length
        assert_eq!(Selection::new(8, 12).clamped(5), Selection::new(5, 5));

        // Only end beyond length
        assert_eq!(Selection::new(2, 12).clamped(5), Selection::new(2, 5));

        // Already valid - unchanged
        assert_eq!(Selection::new(1, 3).clamped(5), Selection::new(1, 3));
    }

    #[test]
    fn test_selection_validity() {
        assert!(Selection::new(0, 3).is_valid_for(3));
        assert!(Selection::caret(0).is_valid_for(0));
        assert!(!Selection { start: 0, end: 4 }.is_valid_for(3));
        assert!(!Selection { start: 3, end: 1 }.is_valid_for(5));
    }

    #[test]
    fn test_edge_insets() {
        let insets = EdgeInsets::new(1, 2, 3, 4);
        assert_eq!(insets.horizontal(), 6);
        assert_eq!(insets.vertical(), 4);

        let inner = insets.inset(Size::new(10, 10));
        assert_eq!(inner, Size::new(4, 6));

        // Saturates instead of underflowing
        let tiny = insets.inset(Size::new(2, 2));
        assert_eq!(tiny, Size::ZERO);
    }

    #[test]
    fn test_edge_insets_uniform() {
        let insets = EdgeInsets::uniform(2);
        assert_eq!(insets, EdgeInsets::new(2, 2, 2, 2));
    }

    #[test]
    fn test_styled_text_plain() {
        let text = StyledText::plain("hello");
        assert_eq!(text.text(), "hello");
        assert_eq!(text.char_count(), 5);
        assert!(text.runs().is_empty());
    }

    #[test]
    fn test_styled_text_run_clamping() {
        let text = StyledText::with_runs(
            "hello",
            vec![
                StyleRun::new(0, 3, TextAttr::BOLD),
                StyleRun::new(3, 10, TextAttr::ITALIC), // overhangs
                StyleRun::new(9, 2, TextAttr::DIM),     // starts past end
                StyleRun::new(1, 0, TextAttr::DIM),     // zero length
            ],
        );
        assert_eq!(
            text.runs(),
            &[
                StyleRun::new(0, 3, TextAttr::BOLD),
                StyleRun::new(3, 2, TextAttr::ITALIC),
            ]
        );
    }

    #[test]
    fn test_styled_text_char_count_unicode() {
        let text = StyledText::plain("héllo 世界");
        assert_eq!(text.char_count(), 8);
    }

    #[test]
    fn test_content_size_single_line() {
        assert_eq!(StyledText::plain("hello").content_size(), Size::new(5, 1));
        assert_eq!(StyledText::plain("").content_size(), Size::new(0, 1));
    }

    #[test]
    fn test_content_size_multiline() {
        let text = StyledText::plain("one\nlonger line\nxy");
        assert_eq!(text.content_size(), Size::new(11, 3));
    }

    #[test]
    fn test_text_attr_flags() {
        let attrs = TextAttr::BOLD | TextAttr::UNDERLINE;
        assert!(attrs.contains(TextAttr::BOLD));
        assert!(!attrs.contains(TextAttr::ITALIC));
    }
}
