//! Deterministic word wrapping against real font metrics
//!
//! Wrapping drives the layout cursor, so the same input must always produce
//! the same line breaks and the widths must match what the viewer lays out.
//! A word is never split mid-token; a token wider than the column gets a
//! line of its own and overflows it.

use crate::font::TextMeasurer;

/// One wrapped line with its measured width
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub width: f64,
}

/// Greedy line breaker for a fixed column width
pub struct LineBreaker {
    max_width: f64,
}

impl LineBreaker {
    pub fn new(max_width: f64) -> Self {
        Self { max_width }
    }

    /// Break `text` into lines that fit the column.
    ///
    /// A value with no renderable words (including the empty string) still
    /// occupies one empty line, matching the original's cell behavior: the
    /// cursor advances one line height for it.
    pub fn break_text<M: TextMeasurer>(&self, text: &str, font: &M, size: f64) -> Vec<Line> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return vec![Line {
                text: String::new(),
                width: 0.0,
            }];
        }

        let space_width = font.measure_text(" ", size);
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in words {
            let word_width = font.measure_text(word, size);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + space_width + word_width <= self.max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space_width + word_width;
            } else {
                lines.push(Line {
                    text: std::mem::take(&mut current),
                    width: current_width,
                });
                current.push_str(word);
                current_width = word_width;
            }
        }
        lines.push(Line {
            text: current,
            width: current_width,
        });

        lines
    }
}
