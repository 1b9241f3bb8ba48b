//! Table formatting utilities for CLI list commands
//!
//! Every list command builds [`TableRow`]s of typed [`CellValue`]s and hands
//! them to a [`TableFormatter`], which renders TSV (aligned, colored), CSV,
//! Markdown or bare ids.
//!
//! # Text Wrapping
//!
//! - Use `TableConfig::with_wrap(width)` to enable word-wrapped multi-line rows
//! - CSV and ID formats remain single-line for pipability

use chrono::{DateTime, Local, Utc};
use console::style;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::core::lifecycle::Action;
use crate::entities::{Priority, WorkOrderStatus};

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Maximum width for text columns before wrapping (None = truncate instead)
    pub wrap_width: Option<usize>,
    /// Show summary line after table (e.g., "5 work order(s) found")
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            wrap_width: None,
            show_summary: true,
        }
    }
}

impl TableConfig {
    /// Create config with text wrapping enabled at the specified width
    pub fn with_wrap(width: usize) -> Self {
        Self {
            wrap_width: Some(width),
            show_summary: true,
        }
    }

    /// Create config optimized for piping (no wrapping, no summary)
    pub fn for_pipe() -> Self {
        Self {
            wrap_width: None,
            show_summary: false,
        }
    }
}

/// Wrap text to fit within a maximum width, breaking at word boundaries
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if text.chars().count() <= max_width || max_width < 5 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();
        if !current.is_empty() && current_len + 1 + word_len <= max_width {
            current.push(' ');
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        // Force-break words longer than the line
        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(max_width).peekable();
        while let Some(chunk) = chunks.next() {
            let piece: String = chunk.iter().collect();
            if chunks.peek().is_some() {
                lines.push(piece);
            } else {
                current = piece;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Record number (cyan)
    Id(String),
    /// Plain text, truncated to the column
    Text(String),
    /// Work order status with color coding
    Status(WorkOrderStatus),
    /// Priority badge with color coding
    Priority(Priority),
    /// Lifecycle actions offered for the row
    Actions(Vec<Action>),
    /// DateTime displayed with time
    DateTime(Option<DateTime<Utc>>),
    /// Integer, right-aligned
    Number(i64),
    /// Currency amount, right-aligned
    Money(Option<f64>),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format!("{:<width$}", style(id).cyan(), width = width),
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                pad(&truncated, width)
            }
            CellValue::Status(status) => {
                let s = status.to_string();
                let styled = match status {
                    WorkOrderStatus::Pending => style(&s).yellow(),
                    WorkOrderStatus::InProgress => style(&s).cyan(),
                    WorkOrderStatus::OnHold => style(&s).magenta(),
                    WorkOrderStatus::Completed => style(&s).green(),
                    WorkOrderStatus::Canceled => style(&s).red().dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Priority(priority) => {
                let s = priority.to_string();
                let styled = match priority {
                    Priority::Low => style(&s).dim(),
                    Priority::Medium => style(&s).white(),
                    Priority::High => style(&s).yellow(),
                    Priority::Critical => style(&s).red().bold(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Actions(actions) if actions.is_empty() => {
                format!("{:<width$}", style("-").dim(), width = width)
            }
            CellValue::Actions(_) => {
                format!("{:<width$}", style(self.raw()).green(), width = width)
            }
            CellValue::DateTime(_) => pad(&self.raw_or_dash(), width),
            CellValue::Number(n) => format!("{:>width$}", n, width = width),
            CellValue::Money(_) => format!("{:>width$}", self.raw_or_dash(), width = width),
            CellValue::Empty => pad("-", width),
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        escape_csv(&self.raw())
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        self.raw_or_dash().replace('|', "\\|")
    }

    /// Get raw string value (no formatting)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(id) => id.clone(),
            CellValue::Text(s) => s.clone(),
            CellValue::Status(status) => status.to_string(),
            CellValue::Priority(priority) => priority.to_string(),
            CellValue::Actions(actions) => actions
                .iter()
                .map(|a| a.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            CellValue::DateTime(dt) => dt
                .map(|dt| {
                    let local: DateTime<Local> = dt.with_timezone(&Local);
                    local.format("%Y-%m-%d %H:%M").to_string()
                })
                .unwrap_or_default(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Money(amount) => amount.map(|a| format!("${:.2}", a)).unwrap_or_default(),
            CellValue::Empty => String::new(),
        }
    }

    fn raw_or_dash(&self) -> String {
        let raw = self.raw();
        if raw.is_empty() {
            "-".to_string()
        } else {
            raw
        }
    }

    /// Get the display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        self.raw_or_dash().chars().count()
    }
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

/// Column definition with header label and width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
pub struct TableRow {
    pub id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    id_header: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str, id_header: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            id_header,
            config: TableConfig::default(),
        }
    }

    /// Configure the formatter with custom settings
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Output rows in the specified format
    pub fn output<I>(&self, rows: I, format: OutputFormat)
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();
        for line in self.render(&rows, format) {
            println!("{}", line);
        }
    }

    /// Render rows to lines without printing
    pub fn render(&self, rows: &[TableRow], format: OutputFormat) -> Vec<String> {
        match format {
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Md => self.render_md(rows),
            OutputFormat::Id => rows.iter().map(|r| r.id.clone()).collect(),
            _ => self.render_tsv(rows),
        }
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        let id_width = rows
            .iter()
            .map(|r| r.id.chars().count())
            .max()
            .unwrap_or(0)
            .max(self.id_header.len());
        let mut widths = vec![id_width];

        for col in self.columns {
            let max_content = rows
                .iter()
                .filter_map(|r| r.get(col.key))
                .map(|v| v.display_width())
                .max()
                .unwrap_or(0);
            // +2 so truncate_str (width-2) never clips content that fits
            let natural = col.header.len().max(max_content.saturating_add(2));
            widths.push(natural.min(col.width));
        }
        widths
    }

    fn render_tsv(&self, rows: &[TableRow]) -> Vec<String> {
        let widths = self.calculate_widths(rows);
        let mut lines = Vec::new();

        let mut header = vec![format!(
            "{:<width$}",
            style(self.id_header).bold(),
            width = widths[0]
        )];
        for (col, width) in self.columns.iter().zip(&widths[1..]) {
            header.push(format!("{:<width$}", style(col.header).bold(), width = width));
        }
        lines.push(header.join(" "));

        let total_width: usize = widths.iter().sum::<usize>() + widths.len() - 1;
        lines.push("-".repeat(total_width));

        for row in rows {
            match self.config.wrap_width {
                Some(wrap) => lines.extend(self.tsv_row_wrapped(row, &widths, wrap)),
                None => lines.push(self.tsv_row(row, &widths)),
            }
        }

        if self.config.show_summary {
            lines.push(String::new());
            lines.push(format!(
                "{} {}(s) found.",
                style(rows.len()).cyan(),
                self.entity_name
            ));
        }
        lines
    }

    fn tsv_row(&self, row: &TableRow, widths: &[usize]) -> String {
        let mut parts = vec![CellValue::Id(row.id.clone()).format_tsv(widths[0])];
        for (col, width) in self.columns.iter().zip(&widths[1..]) {
            match row.get(col.key) {
                Some(value) => parts.push(value.format_tsv(*width)),
                None => parts.push(pad("-", *width)),
            }
        }
        parts.join(" ")
    }

    fn tsv_row_wrapped(&self, row: &TableRow, widths: &[usize], wrap: usize) -> Vec<String> {
        let mut cells: Vec<Vec<String>> = vec![vec![row.id.clone()]];
        for col in self.columns {
            let lines = match row.get(col.key) {
                Some(value) if matches!(value, CellValue::Text(_)) => wrap_text(&value.raw(), wrap),
                Some(value) => vec![value.raw_or_dash()],
                None => vec!["-".to_string()],
            };
            cells.push(lines);
        }

        let max_lines = cells.iter().map(|c| c.len()).max().unwrap_or(1);
        let mut out = Vec::with_capacity(max_lines + 1);
        for line_idx in 0..max_lines {
            let parts: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(col_idx, lines)| {
                    let width = widths.get(col_idx).copied().unwrap_or(10);
                    let content = lines.get(line_idx).map(String::as_str).unwrap_or("");
                    if col_idx == 0 {
                        format!("{:<width$}", style(content).cyan(), width = width)
                    } else {
                        pad(content, width)
                    }
                })
                .collect();
            out.push(parts.join(" "));
        }
        if max_lines > 1 {
            out.push(String::new());
        }
        out
    }

    fn render_csv(&self, rows: &[TableRow]) -> Vec<String> {
        let mut headers = vec!["id".to_string()];
        headers.extend(self.columns.iter().map(|c| c.key.to_string()));
        let mut lines = vec![headers.join(",")];

        for row in rows {
            let mut values = vec![escape_csv(&row.id)];
            for col in self.columns {
                values.push(row.get(col.key).map(CellValue::format_csv).unwrap_or_default());
            }
            lines.push(values.join(","));
        }
        lines
    }

    fn render_md(&self, rows: &[TableRow]) -> Vec<String> {
        let mut headers = vec![self.id_header.to_string()];
        headers.extend(self.columns.iter().map(|c| c.header.to_string()));
        let mut lines = vec![format!("| {} |", headers.join(" | "))];

        let separators: Vec<&str> = headers.iter().map(|_| "---").collect();
        lines.push(format!("|{}|", separators.join("|")));

        for row in rows {
            let mut values = vec![row.id.clone()];
            for col in self.columns {
                values.push(
                    row.get(col.key)
                        .map(CellValue::format_md)
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
            lines.push(format!("| {} |", values.join(" | ")));
        }
        lines
    }
}
