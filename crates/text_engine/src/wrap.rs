//! Line wrapping
//!
//! Three strategies are needed, one per consumer:
//!
//! - [`wrap_break_all`] reproduces the editor's live text box
//!   (`white-space: pre-wrap; word-break: break-all`). Autosize uses it.
//! - [`split_text_to_size`] breaks at Unicode line break opportunities and
//!   cuts words that are wider than the line. The canvas PDF backend uses it.
//! - [`wrap_words_greedy`] packs space separated words and never splits a
//!   word. The stream PDF backend uses it.
//!
//! All widths are in the unit of `FontSpec::size`.

use crate::{FontSpec, TextMeasurer};
use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

/// Wrap like a `pre-wrap`, `break-all` text box.
///
/// Newlines start new lines, spaces are preserved and hang past the right
/// edge, and any two non-space graphemes may be split. A single trailing
/// newline does not open an empty last line. Empty text has no lines.
pub fn wrap_break_all(
    text: &str,
    max_width: f64,
    font: &FontSpec,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let body = text.strip_suffix('\n').unwrap_or(text);
    let mut lines = Vec::new();

    for paragraph in body.split('\n') {
        let mut line = String::new();
        let mut width = 0.0;

        for g in paragraph.graphemes(true) {
            let advance = measurer.text_width(g, font);
            if is_space(g) {
                line.push_str(g);
                width += advance;
                continue;
            }
            if !line.is_empty() && width + advance > max_width {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
            }
            line.push_str(g);
            width += advance;
        }
        lines.push(line);
    }
    lines
}

/// Split text to fit `max_width`, breaking at line break opportunities.
///
/// Runs that do not fit on a line of their own are cut between graphemes.
/// Trailing spaces are trimmed from every line.
pub fn split_text_to_size(
    text: &str,
    max_width: f64,
    font: &FontSpec,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut start = 0;

    for (pos, opportunity) in linebreaks(text) {
        let segment = &text[start..pos];
        start = pos;
        let mandatory = opportunity == BreakOpportunity::Mandatory;
        let segment = if mandatory {
            segment.trim_end_matches(['\n', '\r'])
        } else {
            segment
        };

        let candidate = format!("{line}{segment}");
        if line.is_empty() || measurer.text_width(candidate.trim_end(), font) <= max_width {
            line = candidate;
        } else {
            lines.push(line.trim_end().to_string());
            line = segment.to_string();
        }

        // A single run can still be wider than the line
        let ink = line.trim_end();
        if measurer.text_width(ink, font) > max_width {
            let trailing = line[ink.len()..].to_string();
            let mut pieces = split_graphemes(ink, max_width, font, measurer);
            line = pieces.pop().unwrap_or_default() + &trailing;
            lines.extend(pieces);
        }

        if mandatory {
            lines.push(line.trim_end().to_string());
            line.clear();
        }
    }
    if !line.is_empty() {
        lines.push(line.trim_end().to_string());
    }
    lines
}

/// Greedily pack space separated words while the line fits `max_width`.
///
/// Words are never split, so a long word overflows its line. Newlines are
/// honored before packing.
pub fn wrap_words_greedy(
    text: &str,
    max_width: f64,
    font: &FontSpec,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split(' ') {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{line} {word}");
            if measurer.text_width(&candidate, font) <= max_width {
                line = candidate;
            } else {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            }
        }
        lines.push(line);
    }
    lines
}

fn split_graphemes(
    text: &str,
    max_width: f64,
    font: &FontSpec,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0;
    for g in text.graphemes(true) {
        let advance = measurer.text_width(g, font);
        if !piece.is_empty() && width + advance > max_width {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push_str(g);
        width += advance;
    }
    pieces.push(piece);
    pieces
}

fn is_space(g: &str) -> bool {
    g.chars().all(|c| c == ' ' || c == '\t')
}
