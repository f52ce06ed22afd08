//! Multi-step mutations that keep a project's denormalized counters in step with
//! the images and reports that belong to it.
//!
//! Counter updates are read-modify-write against the backend (fetch the project,
//! write the new count). They are not atomic: two consoles editing the same
//! project at once can lose an update.

use crate::{
    endpoints::{
        images::UploadImage,
        projects::{Project, ProjectUpdate},
        reports::NewReport,
        ImageId, ProjectId, ReportId,
    },
    ApiError, Gateway,
};
use futures::future::join_all;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("project {project_id} {counter} could not be updated: {source}")]
    CounterSync {
        project_id: ProjectId,
        counter: Counter,
        source: ApiError,
    },

    #[error("report {report_id} could not be rolled back after a failed counter update: {source}")]
    Orphaned { report_id: ReportId, source: ApiError },

    /// Some files failed. `counter_error` is set when the image count could not be
    /// raised for the files that did persist.
    #[error(
        "{} of {} uploads failed{}",
        .failed.len(),
        .failed.len() + .uploaded,
        counter_suffix(.counter_error)
    )]
    PartialBatchFailure {
        uploaded: usize,
        failed: Vec<FailedUpload>,
        counter_error: Option<ApiError>,
    },
}

fn counter_suffix(counter_error: &Option<ApiError>) -> String {
    match counter_error {
        Some(e) => format!("; image count not updated: {e}"),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Images,
    Reports,
}

impl Counter {
    fn read(self, project: &Project) -> u32 {
        match self {
            Counter::Images => project.image_count,
            Counter::Reports => project.report_count,
        }
    }

    fn update(self, value: u32) -> ProjectUpdate {
        match self {
            Counter::Images => ProjectUpdate {
                image_count: Some(value),
                ..Default::default()
            },
            Counter::Reports => ProjectUpdate {
                report_count: Some(value),
                ..Default::default()
            },
        }
    }
}

impl std::fmt::Display for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Counter::Images => f.write_str("image count"),
            Counter::Reports => f.write_str("report count"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUpload {
    pub file_name: String,
    pub error: ApiError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedBatch {
    pub files: Vec<UploadedFile>,
    pub image_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Deleted; the parent counter now has this value.
    Deleted { remaining: u32 },
    /// The backend no longer had the entity. Counters were left untouched.
    AlreadyGone,
}

/// Applies `delta` to one of the project's counters. Never goes below zero.
pub async fn adjust_counter<G: Gateway>(
    gateway: &G,
    project_id: ProjectId,
    counter: Counter,
    delta: i64,
) -> Result<u32, ApiError> {
    let project = gateway.get_project(project_id).await?;
    let current = counter.read(&project);
    let next = (i64::from(current) + delta).clamp(0, i64::from(u32::MAX)) as u32;

    gateway.update_project(project_id, counter.update(next)).await?;
    info!("Project {} {}: {} -> {}", project_id, counter, current, next);
    Ok(next)
}

/// Creates a report and bumps the parent's report count. If the count cannot be
/// written the report is deleted again so the two stay consistent.
pub async fn create_report<G: Gateway>(
    gateway: &G,
    report: NewReport,
) -> Result<ReportId, WorkflowError> {
    let project_id = report.project_id;
    let report_id = gateway.create_report(report).await?;
    info!("Created report {} for project {}", report_id, project_id);

    if let Err(counter_err) = adjust_counter(gateway, project_id, Counter::Reports, 1).await {
        warn!(
            "Report count update failed for project {}, removing report {}: {}",
            project_id, report_id, counter_err
        );
        return match gateway.delete_report(report_id).await {
            Ok(()) => Err(WorkflowError::Api(counter_err)),
            Err(source) => {
                error!("Could not remove report {}: {}", report_id, source);
                Err(WorkflowError::Orphaned { report_id, source })
            }
        };
    }

    Ok(report_id)
}

/// Deletes a report and decrements the parent's report count.
///
/// A report the backend no longer knows is treated as already deleted.
pub async fn delete_report<G: Gateway>(
    gateway: &G,
    report_id: ReportId,
    project_id: ProjectId,
) -> Result<DeleteOutcome, WorkflowError> {
    match gateway.delete_report(report_id).await {
        Ok(()) => info!("Deleted report {}", report_id),
        Err(e) if e.is_not_found() => {
            info!("Report {} already gone", report_id);
            return Ok(DeleteOutcome::AlreadyGone);
        }
        Err(e) => return Err(e.into()),
    }

    adjust_counter(gateway, project_id, Counter::Reports, -1)
        .await
        .map(|remaining| DeleteOutcome::Deleted { remaining })
        .map_err(|source| WorkflowError::CounterSync {
            project_id,
            counter: Counter::Reports,
            source,
        })
}

/// Deletes an image and decrements the parent's image count.
pub async fn delete_image<G: Gateway>(
    gateway: &G,
    image_id: ImageId,
    project_id: ProjectId,
) -> Result<DeleteOutcome, WorkflowError> {
    match gateway.delete_image(image_id.clone()).await {
        Ok(()) => info!("Deleted image {}", image_id),
        Err(e) if e.is_not_found() => {
            info!("Image {} already gone", image_id);
            return Ok(DeleteOutcome::AlreadyGone);
        }
        Err(e) => return Err(e.into()),
    }

    adjust_counter(gateway, project_id, Counter::Images, -1)
        .await
        .map(|remaining| DeleteOutcome::Deleted { remaining })
        .map_err(|source| WorkflowError::CounterSync {
            project_id,
            counter: Counter::Images,
            source,
        })
}

/// Uploads every file concurrently, then adds the number that persisted to the
/// project's image count.
///
/// Any failed file fails the batch, even though the successful uploads stay stored
/// and are counted.
pub async fn upload_batch<G: Gateway>(
    gateway: &G,
    project_id: ProjectId,
    uploads: Vec<UploadImage>,
) -> Result<UploadedBatch, WorkflowError> {
    let total = uploads.len();
    info!("Uploading {} file(s) to project {}", total, project_id);

    let results = join_all(uploads.into_iter().map(|upload| async move {
        let file_name = upload.file_name().to_string();
        let result = gateway.upload_image(upload).await;
        (file_name, result)
    }))
    .await;

    let mut files = Vec::new();
    let mut failed = Vec::new();
    for (file_name, result) in results {
        match result {
            Ok(url) => files.push(UploadedFile { file_name, url }),
            Err(error) => {
                warn!("Upload of {} failed: {}", file_name, error);
                failed.push(FailedUpload { file_name, error });
            }
        }
    }

    let counted = if files.is_empty() {
        Ok(0)
    } else {
        adjust_counter(gateway, project_id, Counter::Images, files.len() as i64).await
    };

    // Per-file failures take precedence so the caller can offer them for retry
    if !failed.is_empty() {
        return Err(WorkflowError::PartialBatchFailure {
            uploaded: files.len(),
            failed,
            counter_error: counted.err(),
        });
    }

    let image_count = counted.map_err(|source| WorkflowError::CounterSync {
        project_id,
        counter: Counter::Images,
        source,
    })?;

    info!("Uploaded {} of {} file(s)", files.len(), total);
    Ok(UploadedBatch { files, image_count })
}
