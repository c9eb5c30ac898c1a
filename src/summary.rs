//! Per-year language usage statistics

use crate::{
    layout::{self, ColumnSelection, Layout, LayoutError},
    table::RawSurveyTable,
    Year,
};
use serde::{ser::SerializeStruct, Serialize, Serializer};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    ops::Range,
};

/// Programming language or technology name, trimmed of surrounding whitespace
pub type Language = Box<str>;

/// Language statistics for every processed survey edition
pub type AggregateResult = BTreeMap<Year, LanguageSummary>;

/// Usage of one language in one survey edition
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LanguageShare {
    /// Number of respondents who selected the language
    pub count: u64,

    /// Percentage of the respondents who answered the language question
    pub percent: f64,
}

/// Language usage across the respondents of one survey edition
///
/// Languages which nobody selected are absent.
#[derive(Clone, Debug, PartialEq)]
pub struct LanguageSummary {
    /// Number of respondents who answered the language question
    respondent_total: u64,

    /// Per-language usage, sorted by language name
    languages: BTreeMap<Language, LanguageShare>,
}
//
impl LanguageSummary {
    /// Number of respondents who answered the language question
    pub fn respondent_total(&self) -> u64 {
        self.respondent_total
    }

    /// Usage of a specific language, if anyone selected it
    pub fn get(&self, language: &str) -> Option<&LanguageShare> {
        self.languages.get(language)
    }

    /// Usage of each selected language, sorted by language name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LanguageShare)> + '_ {
        self.languages.iter().map(|(name, share)| (&**name, share))
    }

    /// Number of distinct languages that were selected
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Truth that no language was selected
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
//
/// Serialized as `{"count": {lang: n}, "percent": {lang: x}}`, which is the
/// format that downstream consumers of the output file expect
impl Serialize for LanguageSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let counts = self
            .iter()
            .map(|(name, share)| (name, share.count))
            .collect::<BTreeMap<_, _>>();
        let percents = self
            .iter()
            .map(|(name, share)| (name, share.percent))
            .collect::<BTreeMap<_, _>>();
        let mut summary = serializer.serialize_struct("LanguageSummary", 2)?;
        summary.serialize_field("count", &counts)?;
        summary.serialize_field("percent", &percents)?;
        summary.end()
    }
}

/// Accumulator of language selections, one respondent at a time
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    /// Number of respondents seen so far
    respondent_total: u64,

    /// Number of respondents who selected each language so far
    counts: HashMap<Language, u64>,
}
//
impl SummaryBuilder {
    /// Set up the accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a respondent who answered the language question
    ///
    /// Selections are trimmed and deduplicated, so that a language is counted
    /// at most once per respondent. Blank selections are ignored, but the
    /// respondent still counts as having answered.
    pub fn add_respondent<'a>(&mut self, selections: impl IntoIterator<Item = &'a str>) {
        self.respondent_total += 1;
        let selections = selections
            .into_iter()
            .map(str::trim)
            .filter(|language| !language.is_empty())
            .collect::<BTreeSet<_>>();
        for language in selections {
            if let Some(count) = self.counts.get_mut(language) {
                *count += 1;
            } else {
                self.counts.insert(language.into(), 1);
            }
        }
    }

    /// Compute the final per-language percentages
    pub fn finish(self) -> LanguageSummary {
        let total = self.respondent_total;
        let languages = self
            .counts
            .into_iter()
            .map(|(language, count)| {
                let percent = count as f64 / total as f64 * 100.0;
                (language, LanguageShare { count, percent })
            })
            .collect();
        LanguageSummary {
            respondent_total: total,
            languages,
        }
    }
}

/// Compute the language usage of one survey edition
pub fn summarize(layout: &Layout, table: &RawSurveyTable) -> Result<LanguageSummary, LayoutError> {
    let summary = match layout.resolve(table.headers())? {
        ColumnSelection::Delimited(column) => summarize_delimited(table, column),
        ColumnSelection::IndicatorRun(run) => summarize_indicators(table, run),
    };
    log::debug!(
        "{} respondents answered the language question, selecting {} distinct languages",
        summary.respondent_total(),
        summary.len()
    );
    Ok(summary)
}

/// Split a delimited-list cell into its (untrimmed) languages
pub fn split_languages(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(';')
}

/// Summarize a single column of `;`-separated language lists
fn summarize_delimited(table: &RawSurveyTable, column: usize) -> LanguageSummary {
    let mut builder = SummaryBuilder::new();
    for row in table.rows() {
        if let Some(answer) = table.cell(row, column) {
            builder.add_respondent(split_languages(answer));
        }
    }
    builder.finish()
}

/// Summarize a run of per-language indicator columns
///
/// The first data row of these exports repeats the column labels, i.e. the
/// language names, since the header only labels the question. It is used to
/// name the languages and otherwise ignored. Columns which are labeled
/// neither there nor in the header are named by their cell values.
fn summarize_indicators(table: &RawSurveyTable, run: Range<usize>) -> LanguageSummary {
    let mut builder = SummaryBuilder::new();
    let Some((label_row, rows)) = table.rows().split_first() else {
        return builder.finish();
    };
    let labels = run
        .clone()
        .map(|column| {
            let header = &*table.headers()[column];
            table
                .cell(label_row, column)
                .or((!layout::is_placeholder(header)).then_some(header))
                .map(str::trim)
        })
        .collect::<Vec<_>>();
    log::trace!("Indicator columns are labeled {labels:?}");

    for row in rows {
        let selections = run
            .clone()
            .zip(&labels)
            .filter_map(|(column, label)| {
                let value = table.cell(row, column)?;
                Some(label.unwrap_or(value))
            })
            .collect::<Vec<_>>();
        if !selections.is_empty() {
            builder.add_respondent(selections);
        }
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{layout::RunEnd, table::Row};

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawSurveyTable {
        let headers = headers.iter().map(|&h| h.into()).collect::<Vec<Box<str>>>();
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&cell| (!cell.is_empty()).then(|| cell.into()))
                    .collect::<Row>()
            })
            .collect();
        RawSurveyTable::new(headers, rows)
    }

    fn assert_share(summary: &LanguageSummary, language: &str, count: u64, percent: f64) {
        let share = summary
            .get(language)
            .unwrap_or_else(|| panic!("{language} should be in the summary"));
        assert_eq!(share.count, count, "count of {language}");
        assert!(
            (share.percent - percent).abs() < 1e-9,
            "percent of {language} is {} instead of {percent}",
            share.percent
        );
    }

    const DELIMITED: Layout = Layout::DelimitedColumn {
        name: "LanguageWorkedWith",
    };

    #[test]
    fn delimited_tokens_are_trimmed() {
        let tokens = split_languages("Java;Python; C++")
            .map(str::trim)
            .collect::<BTreeSet<_>>();
        assert_eq!(tokens, BTreeSet::from(["Java", "Python", "C++"]));
    }

    #[test]
    fn delimited_percentages_use_answering_respondents() {
        let table = table(
            &["Respondent", "LanguageWorkedWith"],
            &[&["1", "Python;SQL"], &["2", ""], &["3", "Python"]],
        );
        let summary = summarize(&DELIMITED, &table).unwrap();
        assert_eq!(summary.respondent_total(), 2);
        assert_eq!(summary.len(), 2);
        assert_share(&summary, "Python", 2, 100.0);
        assert_share(&summary, "SQL", 1, 50.0);
    }

    #[test]
    fn delimited_duplicates_merge_once_per_respondent() {
        let table = table(
            &["LanguageWorkedWith"],
            &[&[" Java;Java ;Go"], &["Java"], &["Rust"], &["Go; Rust"]],
        );
        let summary = summarize(&DELIMITED, &table).unwrap();
        assert_eq!(summary.respondent_total(), 4);
        assert_share(&summary, "Java", 2, 50.0);
        assert_share(&summary, "Go", 2, 50.0);
        assert_share(&summary, "Rust", 2, 50.0);
        assert!(summary.get(" Java").is_none());
    }

    #[test]
    fn indicator_run_skips_label_row_and_other_column() {
        let layout = Layout::IndicatorColumnRun {
            start: "Which languages are you proficient in?",
            end: RunEnd::Placeholders,
        };
        let table = table(
            &["Age", "Which languages are you proficient in?", "", ""],
            &[
                &["Response", "C", "C++", "Other"],
                &["25", "1", "", "1"],
                &["30", "", "", ""],
                &["35", "C", "C++", ""],
                &["40", "", "", "Fortran"],
            ],
        );
        let summary = summarize(&layout, &table).unwrap();
        // Respondents who only picked "other" did not pick a language
        assert_eq!(summary.respondent_total(), 2);
        assert_eq!(summary.len(), 2);
        assert_share(&summary, "C", 2, 100.0);
        assert_share(&summary, "C++", 1, 50.0);
        assert!(summary.get("Other").is_none());
        assert!(summary.get("1").is_none());
    }

    #[test]
    fn indicator_labels_are_trimmed_and_merged() {
        let layout = Layout::IndicatorColumnRun {
            start: "Q",
            end: RunEnd::Count(3),
        };
        let table = table(
            &["Q", "", "", "Other"],
            &[
                &["Java", " Java", "SQL", "Other"],
                &["Java", "Java", "", ""],
                &["", "Java", "SQL", ""],
            ],
        );
        let summary = summarize(&layout, &table).unwrap();
        assert_eq!(summary.respondent_total(), 2);
        assert_share(&summary, "Java", 2, 100.0);
        assert_share(&summary, "SQL", 1, 50.0);
    }

    #[test]
    fn indicator_without_label_uses_header() {
        let layout = Layout::IndicatorColumnRun {
            start: "Go",
            end: RunEnd::StopBefore("Other"),
        };
        let table = table(
            &["Go", "Rust ", "Other"],
            &[&["", "", ""], &["x", "x", ""]],
        );
        let summary = summarize(&layout, &table).unwrap();
        assert_share(&summary, "Go", 1, 100.0);
        assert_share(&summary, "Rust", 1, 100.0);
    }

    #[test]
    fn unlabeled_placeholder_column_is_named_by_its_values() {
        let layout = Layout::IndicatorColumnRun {
            start: "Q",
            end: RunEnd::Placeholders,
        };
        let table = table(
            &["Q", "Unnamed: 7", "", "Age"],
            &[
                &["Java", "", "Other", "Response"],
                &["Java", " Go", "", "30"],
                &["", "Go", "Cobol", "40"],
            ],
        );
        let summary = summarize(&layout, &table).unwrap();
        assert_eq!(summary.respondent_total(), 2);
        assert_share(&summary, "Java", 1, 50.0);
        assert_share(&summary, "Go", 2, 100.0);
        assert!(summary.get("Unnamed: 7").is_none());
        assert!(summary.get("Cobol").is_none());
    }

    #[test]
    fn percentages_stay_in_range() {
        let table = table(
            &["LanguageWorkedWith"],
            &[&["A;B;C"], &["A"], &["B;A"], &["C;C;C"], &[";"]],
        );
        let summary = summarize(&DELIMITED, &table).unwrap();
        let total_count = summary.iter().map(|(_, share)| share.count).sum::<u64>();
        assert!(total_count <= summary.respondent_total() * 3);
        for (language, share) in summary.iter() {
            assert!(
                (0.0..=100.0).contains(&share.percent),
                "{language} has {}%",
                share.percent
            );
        }
    }

    #[test]
    fn empty_survey_has_empty_summary() {
        let table = table(&["LanguageWorkedWith"], &[]);
        let summary = summarize(&DELIMITED, &table).unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.respondent_total(), 0);
    }

    #[test]
    fn summary_serializes_counts_and_percents() {
        let mut builder = SummaryBuilder::new();
        builder.add_respondent(["Python", "SQL"]);
        builder.add_respondent(["Python"]);
        let json = serde_json::to_value(builder.finish()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "count": {"Python": 2, "SQL": 1},
                "percent": {"Python": 100.0, "SQL": 50.0},
            })
        );
    }
}
