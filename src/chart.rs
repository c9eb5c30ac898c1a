//! Line chart of language popularity trends

use crate::{trend::TrendSeries, Result};
use anyhow::Context;
use plotters::prelude::*;
use std::path::Path;

/// Chart title
const TITLE: &str = "Stack Exchange Language Survey";

/// Chart dimensions in pixels
const SIZE: (u32, u32) = (1024, 768);

/// Render popularity trends as an SVG line chart, one line per language
pub fn render(path: &Path, series: &[TrendSeries]) -> Result<()> {
    let years = series
        .iter()
        .flat_map(|s| s.points.iter().map(|&(year, _)| i32::from(year)));
    let (Some(first_year), Some(last_year)) = (years.clone().min(), years.max()) else {
        anyhow::bail!("there is no popularity data to plot");
    };
    let max_percent = series
        .iter()
        .flat_map(|s| s.points.iter().map(|&(_, percent)| percent))
        .fold(0.0, f64::max);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).context("clearing the chart")?;
    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            first_year..last_year.max(first_year + 1),
            0.0..(max_percent * 1.1).max(1.0),
        )
        .context("setting up the chart axes")?;
    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("% Responses")
        .x_labels((last_year - first_year + 1) as usize)
        .x_label_formatter(&|year| year.to_string())
        .draw()
        .context("drawing the chart mesh")?;

    for (idx, trend) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(
                trend
                    .points
                    .iter()
                    .map(|&(year, percent)| (i32::from(year), percent)),
                color.stroke_width(2),
            ))
            .with_context(|| format!("drawing the {} trend", trend.language))?
            .label(trend.language.to_string())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .context("drawing the chart legend")?;

    root.present()
        .with_context(|| format!("saving the chart to {}", path.display()))?;
    log::info!("Saved language trends chart to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_is_saved_as_svg() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("languages.svg");
        let series = [
            TrendSeries {
                language: "C#".into(),
                points: vec![(2011, 30.0), (2012, 32.5), (2013, 31.0)],
            },
            TrendSeries {
                language: "Python".into(),
                points: vec![(2011, 20.0), (2012, 24.0), (2013, 27.5)],
            },
        ];
        render(&path, &series)?;

        let svg = std::fs::read_to_string(&path)?;
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Python"));
        Ok(())
    }

    #[test]
    fn empty_chart_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("languages.svg");
        assert!(render(&path, &[]).is_err());
        assert!(!path.exists());
    }
}
