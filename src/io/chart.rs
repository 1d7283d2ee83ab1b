use std::fmt::Write as _;

use crate::application::CategoryBreakdown;
use crate::domain::{Cents, format_cents};

const SVG_BAR_HEIGHT: usize = 28;
const SVG_BAR_GAP: usize = 10;
const SVG_LABEL_WIDTH: usize = 170;
const SVG_PLOT_WIDTH: usize = 460;
const SVG_VALUE_WIDTH: usize = 150;
const SVG_TOP: usize = 50;

/// Bar chart of expenses per category. Bar lengths are relative to the largest category.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub amount_cents: Cents,
    /// Fraction of the largest bar, in `0.0..=1.0`.
    pub ratio: f64,
    /// Share of the total, in percent.
    pub share: f64,
}

impl Chart {
    pub fn from_breakdown(breakdown: &CategoryBreakdown) -> Self {
        let max = breakdown
            .categories
            .iter()
            .map(|c| c.total)
            .max()
            .unwrap_or(0);

        let bars = breakdown
            .categories
            .iter()
            .map(|c| Bar {
                label: c.category.clone(),
                amount_cents: c.total,
                ratio: if max > 0 {
                    c.total as f64 / max as f64
                } else {
                    0.0
                },
                share: c.percentage,
            })
            .collect();

        Self {
            title: format!("Category-wise Expense Breakdown ({})", breakdown.month),
            bars,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Length in cells of each bar when the longest is `width` cells.
    /// Any non-zero amount gets at least one cell.
    pub fn bar_lengths(&self, width: usize) -> Vec<usize> {
        self.bars
            .iter()
            .map(|bar| {
                let cells = (bar.ratio * width as f64).round() as usize;
                if bar.amount_cents > 0 { cells.max(1) } else { 0 }
            })
            .collect()
    }

    /// Text rows: label, a bar drawn with `glyph`, amount and share.
    pub fn render_text(&self, width: usize, glyph: char) -> Vec<String> {
        let label_width = self
            .bars
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(0)
            .min(20);

        self.bars
            .iter()
            .zip(self.bar_lengths(width))
            .map(|(bar, cells)| {
                format!(
                    "{:<label_width$} {:<width$} {:>12} ({:.1}%)",
                    truncate(&bar.label, label_width),
                    glyph.to_string().repeat(cells),
                    format_cents(bar.amount_cents),
                    bar.share,
                )
            })
            .collect()
    }

    /// Standalone SVG document with one horizontal bar per category.
    pub fn render_svg(&self) -> String {
        let width = SVG_LABEL_WIDTH + SVG_PLOT_WIDTH + SVG_VALUE_WIDTH;
        let height = SVG_TOP + self.bars.len() * (SVG_BAR_HEIGHT + SVG_BAR_GAP) + 20;
        let lengths = self.bar_lengths(SVG_PLOT_WIDTH);

        let mut svg = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif" font-size="13">"#
        );
        let _ = writeln!(
            svg,
            r#"  <rect width="{width}" height="{height}" fill="white"/>"#
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="28" text-anchor="middle" font-size="16" font-weight="bold">{}</text>"#,
            width / 2,
            escape_xml(&self.title)
        );

        for (index, (bar, length)) in self.bars.iter().zip(lengths).enumerate() {
            let y = SVG_TOP + index * (SVG_BAR_HEIGHT + SVG_BAR_GAP);
            let text_y = y + SVG_BAR_HEIGHT / 2 + 5;
            let _ = writeln!(
                svg,
                r#"  <text x="{}" y="{text_y}" text-anchor="end">{}</text>"#,
                SVG_LABEL_WIDTH - 10,
                escape_xml(&bar.label)
            );
            let _ = writeln!(
                svg,
                r##"  <rect x="{SVG_LABEL_WIDTH}" y="{y}" width="{length}" height="{SVG_BAR_HEIGHT}" fill="#4c72b0"/>"##
            );
            let _ = writeln!(
                svg,
                r#"  <text x="{}" y="{text_y}">{} ({:.1}%)</text>"#,
                SVG_LABEL_WIDTH + length + 8,
                format_cents(bar.amount_cents),
                bar.share
            );
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}~")
    }
}

fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
