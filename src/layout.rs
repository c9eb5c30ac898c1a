//! Declarative description of where the language question lives in a survey
//!
//! Each survey edition stores the "which languages do you use?" question in
//! its own way. Later editions use a single column holding a semicolon
//! separated list of languages, while older ones spread the question over a
//! run of indicator columns, one per language, whose header only labels the
//! first column of the run. A [`Layout`] says which of these shapes applies,
//! and [`Layout::resolve()`] locates the matching columns in a CSV header.

use std::ops::Range;

/// Storage shape of the language question in one survey edition
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Layout {
    /// Single column whose cells are `;`-separated lists of languages
    DelimitedColumn {
        /// Header of the question column
        name: &'static str,
    },

    /// Run of indicator columns, one per language
    IndicatorColumnRun {
        /// Header of the first column of the run, i.e. the question label
        start: &'static str,

        /// Where the run stops
        end: RunEnd,
    },
}
//
impl Layout {
    /// Header that carries the question label
    pub fn question(&self) -> &'static str {
        match self {
            Self::DelimitedColumn { name } => name,
            Self::IndicatorColumnRun { start, .. } => start,
        }
    }

    /// Locate the columns of the language question in a CSV header
    pub fn resolve(&self, headers: &[Box<str>]) -> Result<ColumnSelection, LayoutError> {
        let question = self.question();
        let start = headers
            .iter()
            .position(|header| header.trim() == question)
            .ok_or_else(|| LayoutError::MissingColumn(question.into()))?;
        let Self::IndicatorColumnRun { end, .. } = self else {
            return Ok(ColumnSelection::Delimited(start));
        };
        let run = match *end {
            RunEnd::Count(count) => {
                let available = headers.len() - start;
                if count > available {
                    return Err(LayoutError::ShortRun {
                        start: question.into(),
                        needed: count,
                        available,
                    });
                }
                start..start + count
            }
            RunEnd::StopBefore(stop) => {
                let stop_idx = headers[start + 1..]
                    .iter()
                    .position(|header| header.trim() == stop)
                    .map(|offset| start + 1 + offset)
                    .ok_or_else(|| LayoutError::MissingStop {
                        start: question.into(),
                        stop: stop.into(),
                    })?;
                start..stop_idx
            }
            RunEnd::Placeholders => {
                // The last placeholder column of the run is "other"
                let mut last = start;
                while headers.get(last + 1).is_some_and(|h| is_placeholder(h)) {
                    last += 1;
                }
                start..last
            }
        };
        if run.is_empty() {
            return Err(LayoutError::EmptyRun(question.into()));
        }
        log::debug!(
            "Language question {question:?} spans columns {run:?} ({} languages)",
            run.len()
        );
        Ok(ColumnSelection::IndicatorRun(run))
    }
}

/// End of an indicator column run
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum RunEnd {
    /// Run has exactly this many columns, including the first one
    Count(usize),

    /// Run stops right before the column with this header, which is usually
    /// the catch-all "other" column
    StopBefore(&'static str),

    /// Run continues over the placeholder-headed columns that follow its first
    /// column, except for the last one which is the catch-all "other" column
    ///
    /// This is how the legacy survey exports are laid out.
    Placeholders,
}

/// Columns of a CSV file that hold the language question
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ColumnSelection {
    /// Index of the delimited-list column
    Delimited(usize),

    /// Indices of the indicator columns, "other" excluded
    IndicatorRun(Range<usize>),
}
//
impl ColumnSelection {
    /// Range of the selected columns
    pub fn columns(&self) -> Range<usize> {
        match self {
            Self::Delimited(column) => *column..*column + 1,
            Self::IndicatorRun(run) => run.clone(),
        }
    }
}

/// Truth that a CSV header was left unlabeled by the survey export
///
/// Such headers are either empty or carry an auto-generated `Unnamed: N`
/// name if the file went through a dataframe library.
pub fn is_placeholder(header: &str) -> bool {
    let header = header.trim();
    header.is_empty() || header.starts_with("Unnamed:")
}

/// Mismatch between a configured [`Layout`] and an actual CSV header
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("language question column {0:?} is not in the CSV header, the survey configuration is stale")]
    MissingColumn(Box<str>),

    #[error("indicator run {start:?} needs {needed} columns but the header only has {available} left")]
    ShortRun {
        start: Box<str>,
        needed: usize,
        available: usize,
    },

    #[error("indicator run {start:?} is not followed by a {stop:?} column")]
    MissingStop { start: Box<str>, stop: Box<str> },

    #[error("indicator run {0:?} does not contain any language column")]
    EmptyRun(Box<str>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<Box<str>> {
        names.iter().map(|&name| name.into()).collect()
    }

    #[test]
    fn delimited_column_is_found_by_name() {
        let layout = Layout::DelimitedColumn {
            name: "LanguageWorkedWith",
        };
        let headers = headers(&["Respondent", "Hobby", "LanguageWorkedWith", "Age"]);
        assert_eq!(layout.resolve(&headers), Ok(ColumnSelection::Delimited(2)));
    }

    #[test]
    fn missing_question_is_a_stale_configuration() {
        let layout = Layout::DelimitedColumn { name: "tech_do" };
        let headers = headers(&["Respondent", "LanguageWorkedWith"]);
        assert_eq!(
            layout.resolve(&headers),
            Err(LayoutError::MissingColumn("tech_do".into()))
        );
    }

    #[test]
    fn placeholder_run_excludes_trailing_other_column() {
        let layout = Layout::IndicatorColumnRun {
            start: "Which languages are you proficient in?",
            end: RunEnd::Placeholders,
        };
        let headers = headers(&[
            "What country do you live in?",
            "Which languages are you proficient in?",
            "",
            "Unnamed: 3",
            " ",
            "How old are you?",
        ]);
        // Columns 1..=3 are languages, column 4 is "other"
        assert_eq!(
            layout.resolve(&headers),
            Ok(ColumnSelection::IndicatorRun(1..4))
        );
    }

    #[test]
    fn placeholder_run_may_end_the_header() {
        let layout = Layout::IndicatorColumnRun {
            start: "Q",
            end: RunEnd::Placeholders,
        };
        let headers = headers(&["Id", "Q", "", ""]);
        assert_eq!(
            layout.resolve(&headers),
            Ok(ColumnSelection::IndicatorRun(1..3))
        );
    }

    #[test]
    fn run_without_language_columns_is_rejected() {
        let layout = Layout::IndicatorColumnRun {
            start: "Q",
            end: RunEnd::Placeholders,
        };
        let headers = headers(&["Id", "Q", "Age"]);
        assert_eq!(
            layout.resolve(&headers),
            Err(LayoutError::EmptyRun("Q".into()))
        );
    }

    #[test]
    fn stop_before_excludes_the_stop_column() {
        let layout = Layout::IndicatorColumnRun {
            start: "C",
            end: RunEnd::StopBefore("Other"),
        };
        let with_stop = headers(&["Id", "C", "C++", "Other", "Age"]);
        assert_eq!(
            layout.resolve(&with_stop),
            Ok(ColumnSelection::IndicatorRun(1..3))
        );

        let without_stop = headers(&["Id", "C", "C++", "Age"]);
        assert_eq!(
            layout.resolve(&without_stop),
            Err(LayoutError::MissingStop {
                start: "C".into(),
                stop: "Other".into(),
            })
        );
    }

    #[test]
    fn counted_run_must_fit_in_header() {
        let layout = Layout::IndicatorColumnRun {
            start: "Q",
            end: RunEnd::Count(2),
        };
        let fits = headers(&["Id", "Q", "", "Other"]);
        assert_eq!(
            layout.resolve(&fits),
            Ok(ColumnSelection::IndicatorRun(1..3))
        );

        let short = headers(&["Id", "Q"]);
        assert_eq!(
            layout.resolve(&short),
            Err(LayoutError::ShortRun {
                start: "Q".into(),
                needed: 2,
                available: 1,
            })
        );
    }

    #[test]
    fn selections_cover_their_columns() {
        assert_eq!(ColumnSelection::Delimited(4).columns(), 4..5);
        assert_eq!(ColumnSelection::IndicatorRun(1..6).columns(), 1..6);
    }

    #[test]
    fn placeholders_are_recognized() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("  "));
        assert!(is_placeholder("Unnamed: 12"));
        assert!(!is_placeholder("Other (please specify)"));
    }
}
