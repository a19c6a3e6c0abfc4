//! Indent letter generation
//!
//! Renders a fulfilled order into a plain-text letter addressable by its
//! indent number. The letter is the retrievable artifact attached to the
//! fulfillment notification; converting it to PDF is left to an external
//! print pipeline.

use chrono::{DateTime, Utc};
use shared::models::IndentNumber;

use crate::error::{AppError, AppResult};

/// Data rendered into an indent letter
#[derive(Debug, Clone)]
pub struct IndentLetter {
    pub indent_no: IndentNumber,
    pub staff_name: String,
    pub issued_at: DateTime<Utc>,
    pub items: Vec<LetterItem>,
}

/// One product line on the letter
#[derive(Debug, Clone)]
pub struct LetterItem {
    pub product_name: String,
    pub quantity: i32,
}

/// Capability for producing a retrievable artifact from a fulfilled order
#[async_trait::async_trait]
pub trait DocumentGenerator: Send + Sync {
    /// Produce the artifact and return its location
    async fn generate(&self, letter: &IndentLetter) -> AppResult<String>;
}

/// Writes indent letters to a directory on local disk
#[derive(Clone)]
pub struct IndentLetterWriter {
    output_dir: String,
    institution: String,
}

impl IndentLetterWriter {
    pub fn new(output_dir: String, institution: String) -> Self {
        Self {
            output_dir,
            institution,
        }
    }

    /// Render the letter body
    pub fn render(&self, letter: &IndentLetter) -> String {
        let mut out = String::new();

        out.push_str(&format!("{:^72}\n", self.institution));
        out.push_str(&format!("{:^72}\n", "INVENTORY INDENT LETTER"));
        out.push('\n');

        out.push_str(&format!("Indent No : {}\n", letter.indent_no));
        out.push_str(&format!("Staff Name : {}\n", letter.staff_name));
        out.push_str(&format!(
            "Issued On : {}\n",
            letter.issued_at.format("%d/%m/%Y, %H:%M:%S")
        ));
        out.push('\n');

        out.push_str(&format!("{:<50}{}\n", "Product", "Quantity"));
        out.push_str(&format!("{}\n", "-".repeat(72)));
        for (index, item) in letter.items.iter().enumerate() {
            out.push_str(&format!(
                "{:<50}{}\n",
                format!("{}. {}", index + 1, item.product_name),
                item.quantity
            ));
        }
        out.push('\n');

        out.push_str("Inventory Admin\n");
        out.push_str("Inventory Department\n");
        out.push_str(&format!("{}\n", self.institution));
        out.push('\n');
        out.push_str(&format!(
            "{:^72}\n",
            "This is a system-generated indent letter and is valid only with official signature and stamp."
        ));

        out
    }

    /// Filename for a letter, derived from the indent number with the
    /// path separator replaced
    pub fn file_name(letter: &IndentLetter) -> String {
        format!("{}.txt", letter.indent_no.file_stem())
    }
}

#[async_trait::async_trait]
impl DocumentGenerator for IndentLetterWriter {
    async fn generate(&self, letter: &IndentLetter) -> AppResult<String> {
        let body = self.render(letter);

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| {
                AppError::Internal(format!("Failed to create indent directory: {}", e))
            })?;

        let path = std::path::Path::new(&self.output_dir).join(Self::file_name(letter));
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write indent letter: {}", e)))?;

        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_letter() -> IndentLetter {
        IndentLetter {
            indent_no: IndentNumber::new(
                "KIET",
                chrono::NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                3,
            )
            .unwrap(),
            staff_name: "Asha Verma".to_string(),
            issued_at: Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap(),
            items: vec![
                LetterItem {
                    product_name: "Whiteboard Marker".to_string(),
                    quantity: 12,
                },
                LetterItem {
                    product_name: "A4 Paper Ream".to_string(),
                    quantity: 3,
                },
            ],
        }
    }

    #[test]
    fn test_render_contains_header_and_fields() {
        let writer = IndentLetterWriter::new(
            "indents".to_string(),
            "KIET GROUP OF INSTITUTIONS".to_string(),
        );
        let body = writer.render(&sample_letter());

        assert!(body.contains("KIET GROUP OF INSTITUTIONS"));
        assert!(body.contains("INVENTORY INDENT LETTER"));
        assert!(body.contains("Indent No : KIET20250115/3"));
        assert!(body.contains("Staff Name : Asha Verma"));
        assert!(body.contains("Issued On : 15/01/2025"));
    }

    #[test]
    fn test_render_numbers_item_rows() {
        let writer = IndentLetterWriter::new(
            "indents".to_string(),
            "KIET GROUP OF INSTITUTIONS".to_string(),
        );
        let body = writer.render(&sample_letter());

        assert!(body.contains("1. Whiteboard Marker"));
        assert!(body.contains("2. A4 Paper Ream"));
        assert!(body.contains("12"));
    }

    #[test]
    fn test_file_name_is_filesystem_safe() {
        let name = IndentLetterWriter::file_name(&sample_letter());
        assert_eq!(name, "KIET20250115-3.txt");
        assert!(!name.contains('/'));
    }
}
