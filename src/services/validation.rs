use crate::errors::{CoreError, CoreResult};

/// Write-time checks shared by the admin request schema and the repository
pub struct ValidationService;

impl ValidationService {
    /// Chart names are trimmed and must not be empty.
    pub fn validate_chart_name(name: &str) -> CoreResult<String> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(CoreError::invalid_field("name", "Name is required"));
        }

        Ok(trimmed.to_string())
    }

    /// Blank descriptions are stored as null.
    pub fn normalize_description(description: Option<&str>) -> Option<String> {
        description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    }

    /// The table must have at least one column and every row must have
    /// exactly one cell per column. Ragged rows are rejected, never padded.
    pub fn validate_chart_grid(columns: &[String], rows: &[Vec<String>]) -> CoreResult<()> {
        if columns.is_empty() {
            return Err(CoreError::invalid_field(
                "columns",
                "At least one column is required",
            ));
        }

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(CoreError::invalid_field(
                "rows",
                format!(
                    "Row {} has {} cells but the chart has {} columns",
                    index + 1,
                    row.len(),
                    columns.len()
                ),
            ));
        }

        Ok(())
    }
}
