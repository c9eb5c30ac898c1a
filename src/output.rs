//! Persistence of the aggregated survey results

use crate::{summary::AggregateResult, Result};
use anyhow::Context;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::Path;

/// Save aggregated results as JSON, keyed by year
///
/// The document has the shape
/// `{"<year>": {"count": {"<lang>": n}, "percent": {"<lang>": x}}}`.
pub async fn save(path: &Path, aggregate: &AggregateResult) -> Result<()> {
    let json = to_json(aggregate).context("converting survey results to JSON")?;
    tokio::fs::write(path, &json)
        .await
        .with_context(|| format!("saving survey results to {}", path.display()))?;
    log::info!(
        "Saved results of {} surveys to {}",
        aggregate.len(),
        path.display()
    );
    Ok(())
}

/// Pretty-print aggregated results with four-space indentation
fn to_json(aggregate: &AggregateResult) -> serde_json::Result<Vec<u8>> {
    let mut json = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut json, PrettyFormatter::with_indent(b"    "));
    aggregate.serialize(&mut serializer)?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::SummaryBuilder;

    #[tokio::test]
    async fn results_are_keyed_by_year() -> Result<()> {
        let mut aggregate = AggregateResult::new();
        let surveys = [
            (2019, vec![vec!["Go"], vec!["Go", "Rust"]]),
            (2020, vec![vec!["Rust"]]),
        ];
        for (year, respondents) in surveys {
            let mut builder = SummaryBuilder::new();
            for selections in respondents {
                builder.add_respondent(selections);
            }
            aggregate.insert(year, builder.finish());
        }

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.json");
        save(&path, &aggregate).await?;

        let text = std::fs::read_to_string(&path)?;
        assert!(text.starts_with("{\n    \"2019\": {"));
        let json: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(
            json,
            serde_json::json!({
                "2019": {
                    "count": {"Go": 2, "Rust": 1},
                    "percent": {"Go": 100.0, "Rust": 50.0},
                },
                "2020": {
                    "count": {"Rust": 1},
                    "percent": {"Rust": 100.0},
                },
            })
        );
        Ok(())
    }
}
