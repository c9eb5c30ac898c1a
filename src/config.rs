//! Processing pipeline configuration

use crate::{
    editions::{self, Edition},
    report::ReportConfig,
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// Languages whose popularity trend is plotted, in legend order
const TREND_LANGUAGES: [&str; 9] = [
    "C",
    "C#",
    "C++",
    "Java",
    "JavaScript",
    "PHP",
    "Python",
    "SQL",
    "Ruby",
];

/// Final process configuration
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Directory where survey files, results and the chart are stored
    pub work_dir: Box<Path>,

    /// Survey editions to be processed, in chronological order
    pub editions: Box<[Edition]>,

    /// Languages whose popularity trend is plotted
    ///
    /// Each of them must have been selected by someone in every edition.
    pub trend_languages: Box<[Box<str>]>,

    /// Thresholds of the language appearance reports
    pub report: ReportConfig,
}
//
impl Config {
    /// Process every supported survey edition inside of a work directory
    pub fn new(work_dir: impl Into<Box<Path>>) -> Arc<Self> {
        Arc::new(Self {
            work_dir: work_dir.into(),
            editions: editions::supported_editions().into(),
            trend_languages: TREND_LANGUAGES.iter().map(|&lang| lang.into()).collect(),
            report: ReportConfig::default(),
        })
    }

    /// Location of the aggregated JSON results
    pub fn output_path(&self) -> PathBuf {
        self.work_dir.join("data.json")
    }

    /// Location of the trend chart
    pub fn chart_path(&self) -> PathBuf {
        self.work_dir.join("languages.svg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_land_in_work_dir() {
        let config = Config::new(Path::new("/tmp/surveys"));
        assert_eq!(config.output_path(), Path::new("/tmp/surveys/data.json"));
        assert_eq!(config.chart_path(), Path::new("/tmp/surveys/languages.svg"));
        assert_eq!(config.editions.len(), 10);
        assert_eq!(config.trend_languages.len(), TREND_LANGUAGES.len());
    }
}
