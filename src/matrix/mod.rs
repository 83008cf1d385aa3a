//! License compatibility matrix.
//!
//! The matrix is a comma-separated table. Row 0 holds the column license
//! labels (its first cell labels the row-label column), every later row starts
//! with a row license label followed by one indicator per column.
//!
//! ```text
//! License,MIT,Apache-2.0,GPL-3.0
//! MIT,Same,Yes,Yes
//! Apache-2.0,Yes,Same,No
//! ```

use crate::error::{AuditError, ParseErrorKind, Result};
use crate::model::{Indicator, License, PotentialConflicts};
use std::path::Path;

/// Loaded compatibility table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityMatrix {
    columns: Vec<String>,
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MatrixRow {
    label: String,
    cells: Vec<String>,
}

fn split_line(line: &str) -> Vec<String> {
    line.split(',').map(|cell| cell.trim().to_string()).collect()
}

impl CompatibilityMatrix {
    /// Read a matrix file.
    ///
    /// An unreadable file is an error; no partial matrix is ever returned.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AuditError::io(path, e))?;
        let matrix = Self::parse(&content).map_err(|err| match err {
            AuditError::Parse { source, .. } => {
                AuditError::parse(format!("compatibility matrix {}", path.display()), source)
            }
            other => other,
        })?;
        tracing::debug!(
            "Loaded compatibility matrix {} ({} columns, {} rows)",
            path.display(),
            matrix.columns.len(),
            matrix.rows.len()
        );
        Ok(matrix)
    }

    /// Parse matrix content. Blank lines are skipped; cells are trimmed.
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content.lines().filter(|line| !line.trim().is_empty());

        let header = lines.next().ok_or_else(|| {
            AuditError::parse(
                "compatibility matrix",
                ParseErrorKind::InvalidMatrix("missing header row".to_string()),
            )
        })?;
        // Cell 0 of the header labels the row-label column.
        let columns = split_line(header).into_iter().skip(1).collect();

        let rows = lines
            .map(|line| {
                let mut cells = split_line(line);
                let label = if cells.is_empty() {
                    String::new()
                } else {
                    cells.remove(0)
                };
                MatrixRow { label, cells }
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Column license labels
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Indicators of the own license's row for every candidate with a matching column.
    ///
    /// Uses the first row whose label equals `own_license`'s type exactly.
    /// Without such a row the mapping is empty. Candidates sharing a type
    /// collapse into one entry; a row too short to reach a column yields no
    /// entry for it.
    #[must_use]
    pub fn lookup(&self, own_license: &License, candidates: &[License]) -> PotentialConflicts {
        let mut conflicts = PotentialConflicts::new();

        let Some(row) = self
            .rows
            .iter()
            .find(|row| row.label == own_license.license_type())
        else {
            tracing::warn!(
                "License {:?} has no row in the compatibility matrix, no conflicts checked",
                own_license.license_type()
            );
            return conflicts;
        };

        for candidate in candidates {
            for (column, label) in self.columns.iter().enumerate() {
                if label != candidate.license_type() {
                    continue;
                }
                if let Some(cell) = row.cells.get(column) {
                    conflicts.insert(candidate.clone(), Indicator::parse(cell));
                }
            }
        }

        tracing::debug!(
            "Matrix lookup for {}: {} of {} candidates matched",
            own_license,
            conflicts.len(),
            candidates.len()
        );
        conflicts
    }
}
