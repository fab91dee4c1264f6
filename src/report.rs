//! Report rendering
//!
//! Receives the final aggregate plus domain/endpoint metadata and renders
//! it: a JSON report on disk and a console summary table. The engine itself
//! performs no file I/O and knows nothing about output layout.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::common_types::{Finding, FindingCategory};

/// Per-category found count, reported for all six categories in catalog
/// order, zeros included.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub category: FindingCategory,
    pub count: usize,
}

/// The complete scan report handed to renderers.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub domain: String,
    pub domain_controller: String,
    pub generated_at: DateTime<Utc>,
    pub categories: Vec<CategoryCount>,
    pub findings: Vec<Finding>,
}

impl ScanReport {
    pub fn build(domain: &str, domain_controller: &str, findings: Vec<Finding>) -> Self {
        let categories = FindingCategory::ALL
            .iter()
            .map(|&category| CategoryCount {
                category,
                count: findings.iter().filter(|f| f.category == category).count(),
            })
            .collect();

        Self {
            domain: domain.to_string(),
            domain_controller: domain_controller.to_string(),
            generated_at: Utc::now(),
            categories,
            findings,
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Console summary: one line per category with its count.
    pub fn summary(&self) -> String {
        let width = self
            .categories
            .iter()
            .map(|c| c.category.label().len())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for entry in &self.categories {
            out.push_str(&format!(
                "  {:<width$}  {}\n",
                entry.category.label(),
                entry.count,
                width = width
            ));
        }
        out
    }
}
