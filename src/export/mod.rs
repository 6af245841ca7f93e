use anyhow::{bail, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::embed::EmbedSummary;

/// Report format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReportFormat::Json => "JSON",
            ReportFormat::Csv => "CSV",
        }
    }

    /// Pick the format from the report file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        for format in [ReportFormat::Json, ReportFormat::Csv] {
            if ext == format.extension() {
                return Ok(format);
            }
        }
        bail!(
            "Unsupported report extension {:?} for {}, expected .json or .csv",
            ext,
            path.display()
        )
    }
}

/// Write the run summary to a file. Returns the number of diagnostics
/// exported.
pub fn export_report(summary: &EmbedSummary, output_path: &Path, format: ReportFormat) -> Result<usize> {
    match format {
        ReportFormat::Json => export_json(summary, output_path)?,
        ReportFormat::Csv => export_csv(summary, output_path)?,
    }

    Ok(summary.diagnostics.len())
}

fn export_json(summary: &EmbedSummary, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// One row per diagnostic; the totals are only in the JSON form.
fn export_csv(summary: &EmbedSummary, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["severity", "kind", "message"])?;

    for diagnostic in &summary.diagnostics {
        let severity = match diagnostic.severity() {
            crate::diagnostics::Severity::Warning => "warning",
            crate::diagnostics::Severity::Info => "info",
        };
        wtr.write_record([severity, diagnostic.kind(), diagnostic.to_string().as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;
    use std::path::PathBuf;

    fn summary() -> EmbedSummary {
        EmbedSummary {
            directories: 1,
            images: 2,
            tagged: 1,
            untagged: 1,
            diagnostics: vec![
                Diagnostic::MissingImage { path: PathBuf::from("album/gone.jpg") },
                Diagnostic::NoIndexEntry { path: PathBuf::from("album/new, edited.jpg") },
            ],
            ..EmbedSummary::default()
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ReportFormat::from_path(Path::new("r.json")).unwrap(), ReportFormat::Json);
        assert_eq!(ReportFormat::from_path(Path::new("r.CSV")).unwrap(), ReportFormat::Csv);
        assert!(ReportFormat::from_path(Path::new("r.html")).is_err());
        assert!(ReportFormat::from_path(Path::new("report")).is_err());
    }

    #[test]
    fn test_export_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        assert_eq!(export_report(&summary(), &path, ReportFormat::Json).unwrap(), 2);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["tagged"], 1);
        assert_eq!(value["diagnostics"][0]["kind"], "missing_image");
        assert_eq!(value["diagnostics"][1]["path"], "album/new, edited.jpg");
    }

    #[test]
    fn test_export_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        export_report(&summary(), &path, ReportFormat::Csv).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "warning");
        assert_eq!(&rows[0][1], "missing_image");
        assert_eq!(&rows[1][0], "info");
        assert!(rows[1][2].contains("new, edited.jpg"));
    }
}
