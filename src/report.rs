//! Reports on which languages appear across survey editions

use crate::summary::AggregateResult;
use std::{
    cmp::Reverse,
    collections::BTreeMap,
    fmt::{self, Display},
    ops::RangeInclusive,
};

/// Thresholds of the language appearance reports
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ReportConfig {
    /// Minimal number of editions in which a language must appear to be
    /// listed as appearing in every survey
    pub every_survey: usize,

    /// Number of editions in which a language must appear to be listed as
    /// recurring, but not appearing in every survey
    pub recurring: RangeInclusive<usize>,
}
//
impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            every_survey: 10,
            recurring: 4..=9,
        }
    }
}

/// Number of survey editions in which each language was selected at least once
///
/// A language that is absent from an edition's summary simply does not
/// appear in that edition.
pub fn appearances(aggregate: &AggregateResult) -> BTreeMap<&str, usize> {
    let mut appearances = BTreeMap::new();
    for summary in aggregate.values() {
        for (language, share) in summary.iter() {
            if share.count > 0 {
                *appearances.entry(language).or_insert(0) += 1;
            }
        }
    }
    appearances
}

/// Language appearance reports
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reports<'aggregate> {
    /// Thresholds used to build the reports
    config: ReportConfig,

    /// Languages that appear in every survey, by ascending name
    pub every_survey: Vec<(&'aggregate str, usize)>,

    /// Languages that appear in several surveys, by decreasing number of
    /// appearances then ascending name
    pub recurring: Vec<(&'aggregate str, usize)>,
}
//
impl<'aggregate> Reports<'aggregate> {
    /// Build the reports from aggregated survey results
    pub fn new(config: &ReportConfig, aggregate: &'aggregate AggregateResult) -> Self {
        let appearances = appearances(aggregate);

        // BTreeMap iteration already sorts by name
        let every_survey = appearances
            .iter()
            .filter(|&(_, &years)| years >= config.every_survey)
            .map(|(&language, &years)| (language, years))
            .collect();

        // Stable sort keeps name order among equal appearance counts
        let mut recurring = appearances
            .into_iter()
            .filter(|(_, years)| config.recurring.contains(years))
            .collect::<Vec<_>>();
        recurring.sort_by_key(|&(_, years)| Reverse(years));

        Self {
            config: config.clone(),
            every_survey,
            recurring,
        }
    }
}
//
impl Display for Reports<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nLanguages appearing in all surveys:\n")?;
        for (language, years) in &self.every_survey {
            writeln!(f, "{language} {years}")?;
        }
        writeln!(
            f,
            "\nLanguages appearing in {}-{} surveys:\n",
            self.config.recurring.start(),
            self.config.recurring.end()
        )?;
        for (language, years) in &self.recurring {
            writeln!(f, "{language} {years}")?;
        }
        Ok(())
    }
}
