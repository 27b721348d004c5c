//! Column layout helpers shared by the text reports.

use std::fmt::Write as _;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of section rules
pub const RULE_WIDTH: usize = 78;

/// Truncate to a display width, marking the cut with `~`
pub fn truncate(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('~');
    out
}

/// Left-align in a column of `width` display cells
pub fn pad(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let fill = width.saturating_sub(UnicodeWidthStr::width(text.as_str()));
    format!("{text}{}", " ".repeat(fill))
}

/// Right-align in a column of `width` display cells
pub fn pad_left(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let fill = width.saturating_sub(UnicodeWidthStr::width(text.as_str()));
    format!("{}{text}", " ".repeat(fill))
}

pub fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

/// Section heading followed by a rule
pub fn heading(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

/// Aligned `label  value` line
pub fn field(out: &mut String, label: &str, value: impl std::fmt::Display) -> std::fmt::Result {
    writeln!(out, "  {} {value}", pad(label, 30))
}

/// Rows of cells padded to the widest cell of each column.
///
/// Columns listed in `numeric` are right-aligned.
pub fn table(out: &mut String, header: &[&str], rows: &[Vec<String>], numeric: &[usize]) -> std::fmt::Result {
    let mut widths: Vec<usize> = header.iter().map(|h| UnicodeWidthStr::width(*h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(UnicodeWidthStr::width(cell.as_str())).min(48);
            }
        }
    }

    writeln!(out, "  {}", render_row(header, &widths, numeric))?;
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    writeln!(out, "  {}", "-".repeat(total))?;
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        writeln!(out, "  {}", render_row(&cells, &widths, numeric))?;
    }
    Ok(())
}

fn render_row(cells: &[&str], widths: &[usize], numeric: &[usize]) -> String {
    let line = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let width = widths.get(i).copied().unwrap_or(0);
            if numeric.contains(&i) {
                pad_left(cell, width)
            } else {
                pad(cell, width)
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}
