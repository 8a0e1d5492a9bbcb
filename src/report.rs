//! Ranking output: console table and file export

use crate::error::Result;
use crate::pipeline::{CurrencyOutcome, Ranking};
use crate::types::{Band, ScoreResult};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Export format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Csv,
}

impl ReportFormat {
    /// `csv` selects CSV; anything else falls back to JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => ReportFormat::Csv,
            _ => ReportFormat::Json,
        }
    }
}

/// Flat CSV row; every record carries the same columns
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    country_code: &'a str,
    currency_code: &'a str,
    ppi_score: f64,
    trend_factor_pct: f64,
    lsb_local: f64,
    exchange_rate: f64,
    band: Band,
    invalid_reason: &'a str,
}

impl<'a> From<&'a ScoreResult> for CsvRow<'a> {
    fn from(result: &'a ScoreResult) -> Self {
        Self {
            country_code: &result.country_code,
            currency_code: &result.currency_code,
            ppi_score: result.ppi_score,
            trend_factor_pct: result.trend_factor_pct,
            lsb_local: result.lsb_local,
            exchange_rate: result.exchange_rate,
            band: result.band,
            invalid_reason: result.invalid_reason.as_deref().unwrap_or(""),
        }
    }
}

/// Column header of the ranking table
pub fn table_header() -> String {
    format!(
        "{:>4}  {:<24} {:<8} {:>8}  {:<7} {:>8}",
        "Rank", "Country", "Currency", "Score", "Band", "Trend%"
    )
}

/// One ranking table row; `rank` starts at 1
pub fn format_row(rank: usize, result: &ScoreResult) -> String {
    format!(
        "{:>4}  {:<24} {:<8} {:>8.2}  {:<7} {:>+8.2}",
        rank,
        result.country_code,
        result.currency_code,
        result.ppi_score,
        result.band.label(),
        result.trend_factor_pct
    )
}

/// Plain-text ranking table
pub fn render_table(results: &[ScoreResult]) -> String {
    let mut out = String::new();
    let header = table_header();
    let _ = writeln!(out, "{}", header);
    let _ = writeln!(out, "{}", "-".repeat(header.len()));

    for (idx, result) in results.iter().enumerate() {
        let _ = writeln!(out, "{}", format_row(idx + 1, result));
    }
    out
}

/// Skipped destinations and currency problems, one per line
pub fn render_notes(ranking: &Ranking) -> Vec<String> {
    let mut notes = Vec::new();

    for skipped in &ranking.skipped {
        notes.push(format!(
            "{} ({}): {}",
            skipped.country_code, skipped.currency_code, skipped.reason
        ));
    }
    for result in &ranking.results {
        if let Some(reason) = &result.invalid_reason {
            notes.push(format!("{}: {}", result.country_code, reason));
        }
    }
    for currency in &ranking.currencies {
        match &currency.outcome {
            CurrencyOutcome::Ready { .. } => {}
            CurrencyOutcome::Insufficient {
                available,
                required,
            } => notes.push(format!(
                "{}: {} of {} records needed for a moving average",
                currency.currency_code, available, required
            )),
            CurrencyOutcome::FetchStopped { reason, .. } => {
                notes.push(format!("{}: {}", currency.currency_code, reason))
            }
        }
        for warning in &currency.warnings {
            notes.push(format!("{}: {}", currency.currency_code, warning));
        }
    }
    notes
}

/// Write the ranking to `path` as JSON or CSV
pub fn save_ranking(path: &Path, ranking: &Ranking) -> Result<ReportFormat> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let format = ReportFormat::from_path(path);
    match format {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(ranking)?;
            fs::write(path, json)?;
        }
        ReportFormat::Csv => {
            let mut wtr = csv::Writer::from_path(path)?;
            for result in &ranking.results {
                wtr.serialize(CsvRow::from(result))?;
            }
            wtr.flush()?;
        }
    }

    log::info!("Saved ranking to {}", path.display());
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{CurrencyReport, Skipped};
    use tempfile::TempDir;

    fn ranking() -> Ranking {
        Ranking {
            results: vec![
                ScoreResult {
                    country_code: "Japan".to_string(),
                    currency_code: "JPY".to_string(),
                    ppi_score: 2.47,
                    trend_factor_pct: -10.0,
                    lsb_local: 8966.67,
                    exchange_rate: 9.0,
                    band: Band::Plenty,
                    invalid_reason: None,
                },
                ScoreResult {
                    country_code: "Atlantis".to_string(),
                    currency_code: "USD".to_string(),
                    ppi_score: 0.0,
                    trend_factor_pct: 0.0,
                    lsb_local: 0.0,
                    exchange_rate: 1400.0,
                    band: Band::Short,
                    invalid_reason: Some("Invalid duration or cost".to_string()),
                },
            ],
            skipped: vec![Skipped {
                country_code: "Australia".to_string(),
                currency_code: "AUD".to_string(),
                reason: "No exchange rate data".to_string(),
            }],
            currencies: vec![CurrencyReport {
                currency_code: "AUD".to_string(),
                records: 2,
                fetched: 0,
                warnings: Vec::new(),
                outcome: CurrencyOutcome::Insufficient {
                    available: 2,
                    required: 5,
                },
            }],
        }
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ReportFormat::from_path(Path::new("out.csv")), ReportFormat::Csv);
        assert_eq!(ReportFormat::from_path(Path::new("out.CSV")), ReportFormat::Csv);
        assert_eq!(ReportFormat::from_path(Path::new("out.json")), ReportFormat::Json);
        assert_eq!(ReportFormat::from_path(Path::new("out")), ReportFormat::Json);
    }

    #[test]
    fn test_table_rows() {
        let table = render_table(&ranking().results);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("Japan"));
        assert!(lines[2].contains("2.47"));
        assert!(lines[2].contains("plenty"));
        assert!(lines[3].trim_start().starts_with('2'));
    }

    #[test]
    fn test_notes() {
        let notes = render_notes(&ranking());
        assert_eq!(notes.len(), 3);
        assert!(notes[0].contains("Australia"));
        assert!(notes[1].contains("Invalid duration or cost"));
        assert!(notes[2].contains("2 of 5"));
    }

    #[test]
    fn test_save_json_and_csv() {
        let dir = TempDir::new().unwrap();

        let json_path = dir.path().join("ranking.json");
        assert_eq!(save_ranking(&json_path, &ranking()).unwrap(), ReportFormat::Json);
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["results"][0]["band"], "plenty");
        assert_eq!(value["currencies"][0]["outcome"]["status"], "insufficient");

        let csv_path = dir.path().join("ranking.csv");
        assert_eq!(save_ranking(&csv_path, &ranking()).unwrap(), ReportFormat::Csv);
        let contents = fs::read_to_string(&csv_path).unwrap();
        assert!(contents.starts_with("country_code,currency_code,ppi_score"));
        assert_eq!(contents.lines().count(), 3);
    }
}
