//! CLI command implementations

pub mod complete;
pub mod definition;
pub mod list;

pub use definition::{Cli, Commands};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shortens `s` to at most `max` terminal columns, ending in `...` when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        s.to_string()
    } else if max <= 3 {
        take_columns(s, max)
    } else {
        format!("{}...", take_columns(s, max - 3))
    }
}

fn take_columns(s: &str, max: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max {
            break;
        }
        width += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_shorter_than_max() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_equal_to_max() {
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_longer_than_max() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_with_small_max() {
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("hello", 1), "h");
    }

    #[test]
    fn test_truncate_empty_string() {
        assert_eq!(truncate("", 5), "");
    }

    #[test]
    fn test_truncate_zero_max() {
        assert_eq!(truncate("hello", 0), "");
    }

    #[test]
    fn test_truncate_counts_columns_not_bytes() {
        assert_eq!(truncate("café au lait", 12), "café au lait");
        assert_eq!(truncate("café au lait", 7), "café...");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK character takes two columns.
        assert_eq!(truncate("日本語のタスク", 7), "日本...");
        assert_eq!(truncate("日本語", 3), "日");
    }
}
