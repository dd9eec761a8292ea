//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled)]
    struct InboxRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "SUMMARY")]
        summary: String,
        #[tabled(rename = "STATUS")]
        status: String,
    }

    fn row(id: &str, summary: &str, status: &str) -> InboxRow {
        InboxRow {
            id: id.to_string(),
            summary: summary.to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_format_table_empty() {
        let items: Vec<InboxRow> = vec![];
        assert_eq!(format_table(&items), "No results found.");
    }

    #[test]
    fn test_format_table_headers_and_values() {
        let items = vec![row("req-1", "Jamie requested to join Acme", "pending")];
        let result = format_table(&items);

        assert!(result.contains("ID"));
        assert!(result.contains("SUMMARY"));
        assert!(result.contains("req-1"));
        assert!(result.contains("pending"));
    }

    #[test]
    fn test_format_table_multiple_rows() {
        let items = vec![
            row("req-1", "First", "pending"),
            row("n-1", "Second", "unread"),
        ];
        let result = format_table(&items);

        assert!(result.contains("First"));
        assert!(result.contains("Second"));
    }

    #[test]
    fn test_format_table_uses_rounded_style() {
        let items = vec![row("req-1", "Only", "pending")];
        let result = format_table(&items);

        // Rounded style uses ╭ for top-left corner
        assert!(result.contains("╭"));
        assert!(result.contains("╰"));
    }
}
