//! Output formatting for product records (JSON, table, markdown).

use crate::config::OutputFormat;
use crate::pricehistory::ProductRecord;

/// Formats records for CLI output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single record.
    pub fn format_record(&self, record: &ProductRecord) -> String {
        match self.format {
            OutputFormat::Json => self.json(record),
            OutputFormat::Table => self.table(record),
            OutputFormat::Markdown => self.markdown(record),
        }
    }

    fn json(&self, record: &ProductRecord) -> String {
        serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string())
    }

    fn table(&self, record: &ProductRecord) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Slug:     {}", record.slug));
        lines.push(format!("Title:    {}", or_na(&record.title)));
        lines.push(format!("Image:    {}", or_na(&record.image)));
        lines.push(format!("Price:    {}", or_na(&record.price)));
        lines.push(format!("MRP:      {}", or_na(&record.mrp)));
        lines.push(format!("Discount: {}", or_na(&record.discount)));

        if !record.price_history.is_empty() {
            let type_width =
                record.price_history.iter().map(|e| e.kind.len()).max().unwrap_or(4).max(4);
            let value_width =
                record.price_history.iter().map(|e| e.value.len()).max().unwrap_or(5).max(5);

            lines.push(String::new());
            lines.push(format!("{:<type_width$}  {:<value_width$}  {}", "Type", "Value", "Date"));
            lines.push(format!("{:-<type_width$}  {:-<value_width$}  {:-<4}", "", "", ""));
            for entry in &record.price_history {
                lines.push(format!(
                    "{:<type_width$}  {:<value_width$}  {}",
                    entry.kind, entry.value, entry.date
                ));
            }
        }

        if !record.product_info.is_empty() {
            lines.push(String::new());
            for (key, value) in &record.product_info {
                lines.push(format!("{}: {}", key, value));
            }
        }

        lines.join("\n")
    }

    fn markdown(&self, record: &ProductRecord) -> String {
        let mut lines = Vec::new();

        let heading = if record.title.is_empty() { &record.slug } else { &record.title };
        lines.push(format!("## {}", heading));
        lines.push(String::new());
        lines.push(format!("- **Slug:** {}", record.slug));
        if !record.image.is_empty() {
            lines.push(format!("- **Image:** ![image]({})", record.image));
        }
        if record.has_pricing() {
            lines.push(format!(
                "- **Price:** {} (MRP {}, {})",
                or_na(&record.price),
                or_na(&record.mrp),
                or_na(&record.discount)
            ));
        }

        if !record.price_history.is_empty() {
            lines.push(String::new());
            lines.push("| Type | Value | Date |".to_string());
            lines.push("|------|-------|------|".to_string());
            for entry in &record.price_history {
                lines.push(format!(
                    "| {} | {} | {} |",
                    escape_cell(&entry.kind),
                    escape_cell(&entry.value),
                    escape_cell(&entry.date)
                ));
            }
        }

        if !record.product_info.is_empty() {
            lines.push(String::new());
            for (key, value) in &record.product_info {
                lines.push(format!("- **{}:** {}", key, value));
            }
        }

        lines.join("\n")
    }
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
