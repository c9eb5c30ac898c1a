//! Acquisition of survey CSV files
//!
//! Survey results are published as zip archives. Each archive is downloaded
//! once, the survey CSV is extracted from it and kept in the work directory
//! under a name that only depends on the survey year. Later runs reuse that
//! file and never touch the network again.

use crate::{
    editions::Edition,
    progress::{ProgressConfig, ProgressReport, Work},
    Year,
};
use futures::StreamExt;
use reqwest::Response;
use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;
use zip::{result::ZipError, ZipArchive};

/// Name of the local copy of a survey's results
pub fn survey_csv_name(year: Year) -> String {
    format!("survey{year}.csv")
}

/// Make sure that a survey's results are available in the work directory,
/// downloading them if needed, and return their location
pub async fn ensure_local_survey(
    client: &reqwest::Client,
    edition: &Edition,
    work_dir: &Path,
    report: &ProgressReport,
) -> Result<PathBuf, AcquisitionError> {
    let year = edition.year;
    let destination = work_dir.join(survey_csv_name(year));
    let exists = tokio::fs::try_exists(&destination)
        .await
        .map_err(|source| AcquisitionError::io(year, "looking for a cached survey", source))?;
    if exists {
        log::debug!("Reusing {} survey from {}", year, destination.display());
        return Ok(destination);
    }

    // Both temporary locations are deleted on drop, whatever happens
    let archive = tempfile::Builder::new()
        .prefix(".survey-archive")
        .suffix(".zip")
        .tempfile_in(work_dir)
        .map_err(|source| AcquisitionError::io(year, "creating a temporary archive", source))?;
    download_archive(client, edition, archive.path(), report).await?;

    let archive_path = archive.path().to_owned();
    let member = edition.archive_path;
    let scratch_dir = work_dir.to_owned();
    let extracted_to = destination.clone();
    tokio::task::spawn_blocking(move || {
        extract_member(year, &archive_path, member, &scratch_dir, &extracted_to)
    })
    .await
    .map_err(|source| AcquisitionError::Interrupted { year, source })??;
    drop(archive);

    log::info!("Saved {} survey to {}", year, destination.display());
    Ok(destination)
}

/// Download a survey archive into an existing file
async fn download_archive(
    client: &reqwest::Client,
    edition: &Edition,
    archive: &Path,
    report: &ProgressReport,
) -> Result<(), AcquisitionError> {
    // Start the download
    let year = edition.year;
    log::info!("Downloading {year} survey from {}", edition.url);
    let response = client
        .get(edition.url)
        .send()
        .await
        .and_then(Response::error_for_status)
        .map_err(|source| AcquisitionError::Download {
            year,
            url: edition.url,
            source,
        })?;

    // Some hosts do not announce the archive size, in which case the amount
    // of work grows as bytes come in
    let known_length = response.content_length();
    let bytes = report.add(
        format!("Downloading {year} survey"),
        ProgressConfig::new(Work::Bytes(known_length.unwrap_or(0))),
    );
    let tracker = bytes.clone();
    let mut body = StreamReader::new(Box::pin(response.bytes_stream().map(move |res| {
        res
            // Track how many bytes have been downloaded so far
            .inspect(|bytes_block| {
                let len = bytes_block.len() as u64;
                if known_length.is_none() {
                    tracker.add_work(len);
                }
                tracker.make_progress(len);
            })
            // Translate reqwest errors into I/O errors
            .map_err(|e| io::Error::new(ErrorKind::Other, e))
    })));

    // Save the archive to disk
    let transfer = async {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(archive)
            .await?;
        let len = tokio::io::copy(&mut body, &mut file).await?;
        file.flush().await?;
        Ok::<_, io::Error>(len)
    };
    let result = transfer.await;
    bytes.finish();
    let len = result.map_err(|source| AcquisitionError::Transfer { year, source })?;
    log::debug!("Downloaded {len} bytes for the {year} survey");
    Ok(())
}

/// Extract one member of a zip archive to a destination path
///
/// The whole archive is unpacked into a temporary directory created inside
/// `scratch_dir`, which keeps the final move a same-filesystem rename. The
/// temporary directory is removed on the way out, on a best-effort basis.
fn extract_member(
    year: Year,
    archive: &Path,
    member: &'static str,
    scratch_dir: &Path,
    destination: &Path,
) -> Result<(), AcquisitionError> {
    let file = fs::File::open(archive)
        .map_err(|source| AcquisitionError::io(year, "opening the downloaded archive", source))?;
    let mut zip =
        ZipArchive::new(file).map_err(|source| AcquisitionError::Archive { year, source })?;
    let extract_dir = tempfile::Builder::new()
        .prefix(".survey-extract")
        .tempdir_in(scratch_dir)
        .map_err(|source| AcquisitionError::io(year, "creating an extraction directory", source))?;
    zip.extract(extract_dir.path())
        .map_err(|source| AcquisitionError::Archive { year, source })?;
    log::debug!(
        "Extracted {} entries of the {year} survey archive",
        zip.len()
    );

    let extracted = extract_dir.path().join(member);
    if !extracted.is_file() {
        return Err(AcquisitionError::MissingMember { year, member });
    }
    fs::rename(&extracted, destination)
        .map_err(|source| AcquisitionError::io(year, "moving the survey results in place", source))
}

/// Failure to obtain a local copy of a survey's results
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("failed to download the {year} survey from {url}")]
    Download {
        year: Year,
        url: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("transfer of the {year} survey archive failed")]
    Transfer {
        year: Year,
        #[source]
        source: io::Error,
    },

    #[error("the {year} survey archive is corrupt")]
    Archive {
        year: Year,
        #[source]
        source: ZipError,
    },

    #[error("the {year} survey archive does not contain {member:?}")]
    MissingMember { year: Year, member: &'static str },

    #[error("I/O error while {action} for the {year} survey")]
    Io {
        year: Year,
        action: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("extraction of the {year} survey archive was interrupted")]
    Interrupted {
        year: Year,
        #[source]
        source: tokio::task::JoinError,
    },
}
//
impl AcquisitionError {
    /// Shorthand for local I/O errors
    fn io(year: Year, action: &'static str, source: io::Error) -> Self {
        Self::Io {
            year,
            action,
            source,
        }
    }
}
