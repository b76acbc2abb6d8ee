//! Position translation between line:column coordinates and byte offsets.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Byte offsets are **0-indexed** into the UTF-8 content
//! - Columns count **UTF-16 code units**, matching what editors and
//!   language servers report for caret positions
//!
//! ## Line Separators
//!
//! `\n` separates lines. A `\r\n` pair is a single separator of width two:
//! the `\r` is never addressable as a column and never contributes to a
//! line's length. A file with a trailing separator has an addressable empty
//! final line, so a caret just past the last newline is valid.
//!
//! Out-of-range coordinates are rejected rather than clamped; a caret the
//! caller got wrong must never silently target a different symbol.

use crate::error::{CoreError, CoreResult};

// ============================================================================
// Line/Column -> Byte Offset
// ============================================================================

/// Convert a 1-indexed (line, column) caret position to a byte offset.
///
/// The column counts UTF-16 code units; a column of `line length + 1`
/// addresses the end-of-line insertion point. Returns `CoreError::Position`
/// when the line or column does not exist in `content`.
pub fn line_column_to_offset(content: &str, line: u32, column: u32) -> CoreResult<usize> {
    if line == 0 || column == 0 {
        return Err(CoreError::position("line and column are 1-based"));
    }

    let (start, end) = line_content_range(content, line).ok_or_else(|| {
        CoreError::position(format!(
            "line {} out of range (file has {} lines)",
            line,
            line_count(content)
        ))
    })?;

    let slice = &content[start..end];
    let target = column - 1;
    let mut units = 0u32;
    for (i, ch) in slice.char_indices() {
        if units == target {
            return Ok(start + i);
        }
        units += ch.len_utf16() as u32;
        if units > target {
            return Err(CoreError::position(format!(
                "column {} on line {} falls inside a surrogate pair",
                column, line
            )));
        }
    }
    if units == target {
        // End-of-line insertion point.
        return Ok(end);
    }
    Err(CoreError::position(format!(
        "column {} out of range on line {} (line has {} UTF-16 units)",
        column, line, units
    )))
}

// ============================================================================
// Byte Offset -> Line/Column
// ============================================================================

/// Convert a byte offset to a 1-indexed (line, column) position.
///
/// The inverse of [`line_column_to_offset`]; columns count UTF-16 code
/// units. Offsets past the end of content map to the final position.
pub fn offset_to_line_column(content: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(content.len());
    let mut line = 1u32;
    let mut column = 1u32;
    let mut chars = content.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if i >= offset {
            break;
        }
        match ch {
            '\n' => {
                line += 1;
                column = 1;
            }
            // Part of a \r\n separator: width two, no column of its own.
            '\r' if matches!(chars.peek(), Some((_, '\n'))) => {}
            _ => column += ch.len_utf16() as u32,
        }
    }
    (line, column)
}

// ============================================================================
// Line Utilities
// ============================================================================

/// Count the addressable lines in `content`.
///
/// Separator-split semantics: an empty file has one line, and a trailing
/// separator opens an empty final line.
pub fn line_count(content: &str) -> u32 {
    content.bytes().filter(|&b| b == b'\n').count() as u32 + 1
}

/// Byte range of the content of the given 1-indexed line, excluding its
/// separator. `None` when the line does not exist.
fn line_content_range(content: &str, line: u32) -> Option<(usize, usize)> {
    let mut current = 1u32;
    let mut start = 0usize;
    while current < line {
        match content[start..].find('\n') {
            Some(pos) => {
                start += pos + 1;
                current += 1;
            }
            None => return None,
        }
    }
    let end = match content[start..].find('\n') {
        Some(pos) => {
            let mut end = start + pos;
            if end > start && content.as_bytes()[end - 1] == b'\r' {
                end -= 1;
            }
            end
        }
        None => content.len(),
    };
    Some((start, end))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod line_column_to_offset_tests {
        use super::*;

        #[test]
        fn simple_positions() {
            let content = "fn add() {}\nfn main() {}\n";
            assert_eq!(line_column_to_offset(content, 1, 1).unwrap(), 0);
            assert_eq!(line_column_to_offset(content, 1, 4).unwrap(), 3);
            assert_eq!(line_column_to_offset(content, 2, 1).unwrap(), 12);
            assert_eq!(line_column_to_offset(content, 2, 4).unwrap(), 15);
        }

        #[test]
        fn end_of_line_insertion_point() {
            let content = "short\nlines\n";
            assert_eq!(line_column_to_offset(content, 1, 6).unwrap(), 5);
        }

        #[test]
        fn trailing_separator_opens_empty_final_line() {
            let content = "a\n";
            assert_eq!(line_column_to_offset(content, 2, 1).unwrap(), 2);
        }

        #[test]
        fn empty_content_has_one_line() {
            assert_eq!(line_column_to_offset("", 1, 1).unwrap(), 0);
            assert!(line_column_to_offset("", 2, 1).is_err());
        }

        #[test]
        fn line_out_of_range_is_error() {
            let content = "one\ntwo\n";
            let err = line_column_to_offset(content, 99, 1).unwrap_err();
            assert!(err.to_string().contains("line 99 out of range"));
            assert!(err.to_string().contains("3 lines"));
        }

        #[test]
        fn column_out_of_range_is_error() {
            let content = "short\n";
            let err = line_column_to_offset(content, 1, 7).unwrap_err();
            assert!(err.to_string().contains("column 7 out of range"));
        }

        #[test]
        fn zero_line_or_column_is_error() {
            let content = "text";
            assert!(line_column_to_offset(content, 0, 1).is_err());
            assert!(line_column_to_offset(content, 1, 0).is_err());
        }

        #[test]
        fn crlf_is_one_separator_of_width_two() {
            let content = "ab\r\ncd";
            assert_eq!(line_column_to_offset(content, 1, 3).unwrap(), 2);
            assert_eq!(line_column_to_offset(content, 2, 1).unwrap(), 4);
            assert_eq!(line_column_to_offset(content, 2, 3).unwrap(), 6);
            // The \r is not part of the line's length.
            assert!(line_column_to_offset(content, 1, 4).is_err());
        }

        #[test]
        fn columns_count_utf16_units() {
            // 'é' is one UTF-16 unit but two bytes.
            let content = "é = 1\n";
            assert_eq!(line_column_to_offset(content, 1, 2).unwrap(), 2);
            // '🦀' is two UTF-16 units and four bytes.
            let content = "🦀x";
            assert_eq!(line_column_to_offset(content, 1, 3).unwrap(), 4);
        }

        #[test]
        fn column_inside_surrogate_pair_is_error() {
            let content = "🦀x";
            let err = line_column_to_offset(content, 1, 2).unwrap_err();
            assert!(err.to_string().contains("surrogate"));
        }
    }

    mod offset_to_line_column_tests {
        use super::*;

        #[test]
        fn simple_offsets() {
            let content = "fn add() {}\nfn main() {}\n";
            assert_eq!(offset_to_line_column(content, 0), (1, 1));
            assert_eq!(offset_to_line_column(content, 3), (1, 4));
            assert_eq!(offset_to_line_column(content, 12), (2, 1));
        }

        #[test]
        fn offset_beyond_content_maps_to_end() {
            let content = "short";
            assert_eq!(offset_to_line_column(content, 100), (1, 6));
        }

        #[test]
        fn crlf_counts_as_one_separator() {
            let content = "ab\r\ncd";
            assert_eq!(offset_to_line_column(content, 2), (1, 3));
            assert_eq!(offset_to_line_column(content, 4), (2, 1));
            assert_eq!(offset_to_line_column(content, 6), (2, 3));
        }

        #[test]
        fn multibyte_columns_count_utf16_units() {
            let content = "é = 🦀\n";
            assert_eq!(offset_to_line_column(content, 2), (1, 2));
            // Offset of the byte after the crab: 1 (é) + 3 (" = ") + 2 (🦀) = col 7.
            assert_eq!(offset_to_line_column(content, 8), (1, 7));
        }
    }

    mod round_trip {
        use super::*;

        fn assert_round_trips(content: &str) {
            for line in 1..=line_count(content) {
                let mut column = 1u32;
                loop {
                    let offset = match line_column_to_offset(content, line, column) {
                        Ok(offset) => offset,
                        Err(_) => break,
                    };
                    assert_eq!(
                        offset_to_line_column(content, offset),
                        (line, column),
                        "round trip failed at {}:{} (offset {})",
                        line,
                        column,
                        offset
                    );
                    column += 1;
                }
            }
        }

        #[test]
        fn ascii_content() {
            assert_round_trips("fn add(a, b) {\n    a + b\n}\n");
        }

        #[test]
        fn crlf_content() {
            assert_round_trips("first\r\nsecond\r\nthird");
        }

        #[test]
        fn multibyte_content() {
            assert_round_trips("let café = \"π\";\nlet x = café;\n");
        }
    }

    mod line_count_tests {
        use super::*;

        #[test]
        fn separator_split_semantics() {
            assert_eq!(line_count(""), 1);
            assert_eq!(line_count("one"), 1);
            assert_eq!(line_count("one\n"), 2);
            assert_eq!(line_count("one\ntwo"), 2);
            assert_eq!(line_count("a\r\nb\r\n"), 3);
        }
    }
}
