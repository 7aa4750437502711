//! Page splitting and menu navigation state.
//!
//! The Discord menu view renders whatever [`PageCursor`] points at and maps its buttons
//! to [`MenuControl`] values.

use crate::errors::{Error, Result};

/// Splits `text` into pages of `per_page` parts separated by `sep`.
///
/// Leading and trailing whitespace is trimmed first. A `per_page` of zero is treated as one.
/// Page length limits are not enforced.
#[must_use]
pub fn pagify(text: &str, per_page: usize, sep: &str) -> Vec<String> {
    let per_page = per_page.max(1);
    let parts: Vec<&str> = text.trim().split(sep).collect();

    parts
        .chunks(per_page)
        .map(|chunk| chunk.join(sep))
        .collect()
}

/// Footer text for page `index` (zero-based) of `total`.
#[must_use]
pub fn page_footer(index: usize, total: usize) -> String {
    format!("Page {}/{total}", index + 1)
}

/// Position within a non-empty list of pages. Previous and next wrap around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: usize,
    len: usize,
}

impl PageCursor {
    /// Creates a cursor on the first of `len` pages.
    pub fn new(len: usize) -> Result<Self> {
        if len < 1 {
            return Err(Error::InvalidArgument {
                message: "Must provide at least 1 page.".to_string(),
            });
        }
        Ok(Self { page: 0, len })
    }

    /// Index of the current page.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.page
    }

    /// Number of pages.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false; a cursor cannot be built over zero pages.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Applies a navigation control and returns the new page index.
    ///
    /// [`MenuControl::Close`] leaves the cursor where it is.
    pub fn apply(&mut self, control: MenuControl) -> usize {
        self.page = match control {
            MenuControl::First => 0,
            MenuControl::Previous => (self.page + self.len - 1) % self.len,
            MenuControl::Next => (self.page + 1) % self.len,
            MenuControl::Last => self.len - 1,
            MenuControl::Close => self.page,
        };
        self.page
    }
}

/// Buttons shown under a paginated menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuControl {
    /// Jump to the first page
    First,
    /// Go back one page
    Previous,
    /// Close the menu
    Close,
    /// Go forward one page
    Next,
    /// Jump to the last page
    Last,
}

impl MenuControl {
    /// The controls to show for a menu with `pages` pages, in display order.
    ///
    /// A single page only gets the close button.
    #[must_use]
    pub fn for_pages(pages: usize) -> Vec<Self> {
        if pages > 1 {
            vec![Self::First, Self::Previous, Self::Close, Self::Next, Self::Last]
        } else {
            vec![Self::Close]
        }
    }

    /// Component id used for this control's button.
    #[must_use]
    pub const fn custom_id(self) -> &'static str {
        match self {
            Self::First => "menu_first",
            Self::Previous => "menu_previous",
            Self::Close => "menu_close",
            Self::Next => "menu_next",
            Self::Last => "menu_last",
        }
    }

    /// Parses a component id produced by [`MenuControl::custom_id`].
    #[must_use]
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        match custom_id {
            "menu_first" => Some(Self::First),
            "menu_previous" => Some(Self::Previous),
            "menu_close" => Some(Self::Close),
            "menu_next" => Some(Self::Next),
            "menu_last" => Some(Self::Last),
            _ => None,
        }
    }

    /// Emoji shown on the button.
    #[must_use]
    pub const fn emoji(self) -> char {
        match self {
            Self::First => '\u{23EA}',
            Self::Previous => '\u{25C0}',
            Self::Close => '\u{2716}',
            Self::Next => '\u{25B6}',
            Self::Last => '\u{23E9}',
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_pagify_groups_lines() {
        let text = (1..=7).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");

        let pages = pagify(&text, 3, "\n");
        assert_eq!(
            pages,
            vec![
                "line 1\nline 2\nline 3",
                "line 4\nline 5\nline 6",
                "line 7",
            ]
        );
    }

    #[test]
    fn test_pagify_trims_and_handles_custom_separator() {
        let pages = pagify("  a, b, c  \n", 2, ", ");
        assert_eq!(pages, vec!["a, b", "c"]);
    }

    #[test]
    fn test_pagify_empty_text_yields_one_empty_page() {
        assert_eq!(pagify("   ", 15, "\n"), vec![String::new()]);
    }

    #[test]
    fn test_pagify_zero_per_page() {
        assert_eq!(pagify("a\nb", 0, "\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_page_footer() {
        assert_eq!(page_footer(0, 3), "Page 1/3");
        assert_eq!(page_footer(2, 3), "Page 3/3");
    }

    #[test]
    fn test_cursor_requires_pages() {
        assert!(matches!(
            PageCursor::new(0),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_cursor_navigation_wraps() {
        let mut cursor = PageCursor::new(3).unwrap();
        assert_eq!(cursor.apply(MenuControl::Previous), 2);
        assert_eq!(cursor.apply(MenuControl::Next), 0);
        assert_eq!(cursor.apply(MenuControl::Next), 1);
        assert_eq!(cursor.apply(MenuControl::Last), 2);
        assert_eq!(cursor.apply(MenuControl::Next), 0);
        assert_eq!(cursor.apply(MenuControl::Close), 0);
        cursor.apply(MenuControl::Last);
        assert_eq!(cursor.apply(MenuControl::First), 0);
    }

    #[test]
    fn test_controls_for_single_page() {
        assert_eq!(MenuControl::for_pages(1), vec![MenuControl::Close]);
        assert_eq!(MenuControl::for_pages(2).len(), 5);
    }

    #[test]
    fn test_custom_ids_round_trip() {
        for control in MenuControl::for_pages(2) {
            assert_eq!(MenuControl::from_custom_id(control.custom_id()), Some(control));
        }
        assert_eq!(MenuControl::from_custom_id("confirm"), None);
    }
}
