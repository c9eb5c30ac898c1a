//! Decoding of survey CSV files

use crate::{layout::Layout, Result};
use anyhow::Context;
use csv_async::AsyncReaderBuilder;
use encoding_rs::WINDOWS_1252;
use futures::StreamExt;
use std::{borrow::Cow, ops::Range, path::Path};
use tokio::{fs::File, io::BufReader};

/// One decoded row of a survey, with missing cells set to `None`
///
/// Only the cells of the table's retained columns are stored.
pub type Row = Box<[Option<Box<str>>]>;

/// Decoded contents of one survey CSV file
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawSurveyTable {
    /// Column headers, as found in the file
    headers: Box<[Box<str>]>,

    /// Columns whose cells were kept in memory
    ///
    /// Survey files have dozens of columns, of which only the language
    /// question is of interest. Other cells read as missing.
    retained: Range<usize>,

    /// Data rows, in file order
    ///
    /// Rows may be shorter than the retained column range: some survey
    /// exports are ragged.
    rows: Vec<Row>,
}
//
impl RawSurveyTable {
    /// Build a table from already decoded data, keeping every column
    pub fn new(headers: impl Into<Box<[Box<str>]>>, rows: Vec<Row>) -> Self {
        let headers = headers.into();
        Self {
            retained: 0..headers.len(),
            headers,
            rows,
        }
    }

    /// Column headers
    pub fn headers(&self) -> &[Box<str>] {
        &self.headers
    }

    /// Data rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Cell of a row, or `None` if it is missing or was not retained
    pub fn cell<'row>(
        &self,
        row: &'row [Option<Box<str>>],
        column: usize,
    ) -> Option<&'row str> {
        if !self.retained.contains(&column) {
            return None;
        }
        row.get(column - self.retained.start)
            .and_then(|cell| cell.as_deref())
    }
}

/// Load the language question of a survey CSV file into memory
///
/// The layout is resolved against the CSV header, and only the cells of the
/// resolved columns are kept.
///
/// The historical survey exports are not valid UTF-8, so their bytes are
/// decoded as Latin-1 (in its windows-1252 superset).
pub async fn read_survey(path: &Path, layout: &Layout) -> Result<RawSurveyTable> {
    let context = || format!("reading survey file {}", path.display());
    let file = File::open(path).await.with_context(context)?;
    let mut reader = AsyncReaderBuilder::new()
        .flexible(true)
        .create_reader(BufReader::new(file));

    let headers = reader
        .byte_headers()
        .await
        .with_context(context)?
        .iter()
        .map(|header| Box::<str>::from(decode(header)))
        .collect::<Box<[_]>>();
    let retained = layout.resolve(&headers).with_context(context)?.columns();

    let mut records = reader.into_byte_records();
    let mut rows = Vec::new();
    while let Some(record) = records.next().await {
        let record = record.with_context(context)?;
        let row = retained
            .clone()
            .map(|column| record.get(column).and_then(decode_cell))
            .collect::<Row>();
        rows.push(row);
    }
    log::debug!(
        "Loaded {} rows x {} of {} columns from {}",
        rows.len(),
        retained.len(),
        headers.len(),
        path.display()
    );
    Ok(RawSurveyTable {
        headers,
        retained,
        rows,
    })
}

/// Decode Latin-1 bytes
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    WINDOWS_1252.decode_without_bom_handling(bytes).0
}

/// Decode a data cell, mapping missing answers to `None`
///
/// A cell is missing when it is blank or holds the `NA` marker that the later
/// survey exports use for unanswered questions.
fn decode_cell(bytes: &[u8]) -> Option<Box<str>> {
    let text = decode(bytes);
    let trimmed = text.trim();
    (!trimmed.is_empty() && trimmed != "NA").then(|| text.into())
}
