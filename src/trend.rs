//! Popularity trends of selected languages over survey editions

use crate::{summary::AggregateResult, Year};

/// Popularity of one language in every survey edition
#[derive(Clone, Debug, PartialEq)]
pub struct TrendSeries {
    /// Language being tracked
    pub language: Box<str>,

    /// Percentage of respondents who selected the language, by increasing year
    pub points: Vec<(Year, f64)>,
}

/// Build the popularity series of a set of languages
///
/// Every language must have been selected in every edition. A language that
/// is missing from an edition may mean that nobody selected it or that the
/// survey did not offer it, and plotting it as 0% would hide the difference,
/// so this is reported as an error instead.
pub fn build_series(
    languages: &[Box<str>],
    aggregate: &AggregateResult,
) -> Result<Vec<TrendSeries>, TrendError> {
    languages
        .iter()
        .map(|language| {
            let points = aggregate
                .iter()
                .map(|(&year, summary)| {
                    summary
                        .get(language)
                        .map(|share| (year, share.percent))
                        .ok_or_else(|| TrendError::MissingLanguage {
                            language: language.clone(),
                            year,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TrendSeries {
                language: language.clone(),
                points,
            })
        })
        .collect()
}

/// Failure to build a popularity series
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TrendError {
    #[error("nobody selected {language} in the {year} survey, its trend can't be plotted")]
    MissingLanguage { language: Box<str>, year: Year },
}
