use crate::analysis::{self, AngleDetector};
use crate::events::{DataEvent, Job, RequestId};
use crate::uploads::UploadCandidate;
use radiolab_api::{
    endpoints::{images::UploadImage, ProjectId},
    workflows::{self, WorkflowError},
    ApiError, Client, Request,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs jobs against the backend and reports each outcome as a DataEvent
#[derive(Clone)]
pub struct DataLoader {
    pub api_client: Arc<Client>,
    pub detector: Arc<dyn AngleDetector>,
    pub analysis_delay: Duration,
    pub data_tx: mpsc::UnboundedSender<DataEvent>,
}

impl DataLoader {
    pub fn new(
        api_client: Arc<Client>,
        detector: Arc<dyn AngleDetector>,
        analysis_delay: Duration,
        data_tx: mpsc::UnboundedSender<DataEvent>,
    ) -> Self {
        Self {
            api_client,
            detector,
            analysis_delay,
            data_tx,
        }
    }

    pub async fn run(&self, job: Job) {
        let event = match job {
            Job::LoadProjects { request } => self.load_projects(request).await,
            Job::LoadReports { request } => self.load_reports(request).await,
            Job::LoadProject {
                project_id,
                request,
            } => self.load_project(project_id, request).await,
            Job::LoadProjectImages {
                project_id,
                request,
            } => {
                tracing::info!("Loading images of project {}", project_id);
                match self
                    .api_client
                    .send(Request::images().by_project(project_id))
                    .await
                {
                    Ok(images) => {
                        let images = images.into_vec();
                        tracing::info!("Loaded {} image(s)", images.len());
                        DataEvent::ProjectImagesLoaded { request, images }
                    }
                    Err(error) => load_failed(request, "project images", error),
                }
            }
            Job::LoadProjectReports {
                project_id,
                request,
            } => {
                tracing::info!("Loading reports of project {}", project_id);
                match self
                    .api_client
                    .send(Request::reports().by_project(project_id))
                    .await
                {
                    Ok(reports) => {
                        let reports = reports.into_vec();
                        tracing::info!("Loaded {} report(s)", reports.len());
                        DataEvent::ProjectReportsLoaded { request, reports }
                    }
                    Err(error) => load_failed(request, "project reports", error),
                }
            }
            Job::LoadReport { report_id, request } => {
                tracing::info!("Loading report {}", report_id);
                match self.api_client.send(Request::reports().get(report_id)).await {
                    Ok(report) => DataEvent::ReportLoaded { request, report },
                    Err(error) => load_failed(request, "report", error),
                }
            }

            Job::CreateProject { project } => {
                tracing::info!("Creating project {:?}", project.project().name);
                match self.api_client.send(project).await {
                    Ok(created) => {
                        let project_id = created.into_id();
                        tracing::info!("Created project {}", project_id);
                        DataEvent::ProjectCreated { project_id }
                    }
                    Err(error) => {
                        tracing::error!("Failed to create project: {}", error);
                        DataEvent::ProjectCreateFailed {
                            error: error.to_string(),
                        }
                    }
                }
            }
            Job::UpdateProject { project_id, update } => {
                tracing::info!("Updating project {}", project_id);
                let request = Request::projects().update(project_id).with_update(update);
                match self.api_client.execute(request).await {
                    Ok(()) => DataEvent::ProjectUpdated { project_id },
                    Err(error) => {
                        tracing::error!("Failed to update project {}: {}", project_id, error);
                        DataEvent::ProjectUpdateFailed {
                            project_id,
                            error: error.to_string(),
                        }
                    }
                }
            }
            Job::DeleteProject { project_id } => self.delete_project(project_id).await,

            Job::UpdateReport { report_id, update } => {
                tracing::info!("Updating report {}", report_id);
                let mut request = Request::reports().update(report_id);
                if let Some(name) = update.name.clone() {
                    request = request.name(name);
                }
                if let Some(notes) = update.notes.clone() {
                    request = request.notes(notes);
                }
                match self.api_client.execute(request).await {
                    Ok(()) => DataEvent::ReportUpdated { report_id, update },
                    Err(error) => {
                        tracing::error!("Failed to update report {}: {}", report_id, error);
                        DataEvent::ReportUpdateFailed {
                            report_id,
                            error: error.to_string(),
                        }
                    }
                }
            }
            Job::DeleteReport {
                report_id,
                project_id,
            } => match workflows::delete_report(&*self.api_client, report_id, project_id).await {
                Ok(outcome) => DataEvent::ReportDeleted {
                    report_id,
                    project_id,
                    outcome,
                },
                Err(error) => {
                    tracing::error!("Failed to delete report {}: {}", report_id, error);
                    DataEvent::ReportDeleteFailed { report_id, error }
                }
            },
            Job::DeleteImage {
                image_id,
                project_id,
            } => match workflows::delete_image(&*self.api_client, image_id.clone(), project_id)
                .await
            {
                Ok(outcome) => DataEvent::ImageDeleted {
                    image_id,
                    project_id,
                    outcome,
                },
                Err(error) => {
                    tracing::error!("Failed to delete image {}: {}", image_id, error);
                    DataEvent::ImageDeleteFailed { image_id, error }
                }
            },
            Job::UploadFiles { project_id, files } => self.upload_files(project_id, files).await,

            Job::Analyze { request, targets } => {
                tracing::info!("Analyzing {} radiograph(s)", targets.len());
                tokio::time::sleep(self.analysis_delay).await;
                let results = analysis::analyze_all(self.detector.as_ref(), &targets);
                DataEvent::AnalysisCompleted { request, results }
            }
            Job::CreateReport { report } => {
                let project_id = report.project_id;
                match workflows::create_report(&*self.api_client, report).await {
                    Ok(report_id) => DataEvent::ReportCreated {
                        report_id,
                        project_id,
                    },
                    Err(error) => {
                        tracing::error!("Failed to save report: {}", error);
                        DataEvent::ReportCreateFailed {
                            error: error.to_string(),
                        }
                    }
                }
            }
        };

        let _ = self.data_tx.send(event);
    }

    async fn load_projects(&self, request: RequestId) -> DataEvent {
        tracing::info!("Loading projects");
        match self.api_client.send(Request::projects().list()).await {
            Ok(projects) => {
                let projects = projects.into_vec();
                tracing::info!("Loaded {} project(s)", projects.len());
                DataEvent::ProjectsLoaded { request, projects }
            }
            Err(error) => load_failed(request, "projects", error),
        }
    }

    async fn load_reports(&self, request: RequestId) -> DataEvent {
        tracing::info!("Loading reports");
        match self.api_client.send(Request::reports().list()).await {
            Ok(reports) => {
                let reports = reports.into_vec();
                tracing::info!("Loaded {} report(s)", reports.len());
                DataEvent::ReportsLoaded { request, reports }
            }
            Err(error) => load_failed(request, "reports", error),
        }
    }

    async fn load_project(&self, project_id: ProjectId, request: RequestId) -> DataEvent {
        tracing::info!("Loading project {}", project_id);
        match self.api_client.send(Request::projects().get(project_id)).await {
            Ok(project) => DataEvent::ProjectLoaded { request, project },
            Err(error) => load_failed(request, "project", error),
        }
    }

    /// A project that is already gone counts as deleted.
    async fn delete_project(&self, project_id: ProjectId) -> DataEvent {
        tracing::info!("Deleting project {}", project_id);
        match self
            .api_client
            .execute(Request::projects().delete(project_id))
            .await
        {
            Ok(()) => DataEvent::ProjectDeleted {
                project_id,
                already_gone: false,
            },
            Err(error) if error.is_not_found() => {
                tracing::info!("Project {} already gone", project_id);
                DataEvent::ProjectDeleted {
                    project_id,
                    already_gone: true,
                }
            }
            Err(error) => {
                tracing::error!("Failed to delete project {}: {}", project_id, error);
                DataEvent::ProjectDeleteFailed {
                    project_id,
                    error: error.to_string(),
                }
            }
        }
    }

    async fn upload_files(&self, project_id: ProjectId, files: Vec<UploadCandidate>) -> DataEvent {
        let mut uploads = Vec::with_capacity(files.len());
        let mut unreadable = Vec::new();
        for file in files {
            match tokio::fs::read(&file.path).await {
                Ok(bytes) => uploads.push(UploadImage::new(
                    project_id,
                    file.file_name,
                    file.content_type,
                    bytes,
                )),
                Err(error) => {
                    tracing::warn!("Could not read {}: {}", file.path.display(), error);
                    unreadable.push(file.file_name);
                }
            }
        }

        if uploads.is_empty() {
            return DataEvent::UploadFailed {
                project_id,
                error: "none of the selected files could be read".to_string(),
                failed_files: unreadable,
            };
        }

        match workflows::upload_batch(&*self.api_client, project_id, uploads).await {
            Ok(batch) if unreadable.is_empty() => DataEvent::UploadCompleted {
                project_id,
                uploaded: batch.files.len(),
            },
            Ok(batch) => DataEvent::UploadFailed {
                project_id,
                error: format!(
                    "uploaded {} file(s), {} could not be read",
                    batch.files.len(),
                    unreadable.len()
                ),
                failed_files: unreadable,
            },
            Err(error) => {
                tracing::error!("Upload to project {} failed: {}", project_id, error);
                let mut failed_files = failed_file_names(&error);
                failed_files.extend(unreadable);
                DataEvent::UploadFailed {
                    project_id,
                    error: error.to_string(),
                    failed_files,
                }
            }
        }
    }
}

fn load_failed(request: RequestId, what: &str, error: ApiError) -> DataEvent {
    tracing::error!("Failed to load {}: {}", what, error);
    DataEvent::LoadFailed { request, error }
}

/// Files that still need uploading after a failed batch. Any other batch error
/// means every file was stored and only the project's count is behind.
fn failed_file_names(error: &WorkflowError) -> Vec<String> {
    match error {
        WorkflowError::PartialBatchFailure { failed, .. } => failed
            .iter()
            .map(|failure| failure.file_name.clone())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiolab_api::workflows::{Counter, FailedUpload};

    fn server_error() -> ApiError {
        ApiError::from_status(500, "boom")
    }

    #[test]
    fn test_partial_batch_keeps_failed_files_when_counter_also_failed() {
        let error = WorkflowError::PartialBatchFailure {
            uploaded: 1,
            failed: vec![FailedUpload {
                file_name: "bad.png".to_string(),
                error: server_error(),
            }],
            counter_error: Some(server_error()),
        };

        assert_eq!(failed_file_names(&error), vec!["bad.png".to_string()]);
    }

    #[test]
    fn test_counter_sync_leaves_nothing_to_retry() {
        let error = WorkflowError::CounterSync {
            project_id: ProjectId::new(1),
            counter: Counter::Images,
            source: server_error(),
        };

        assert!(failed_file_names(&error).is_empty());
    }
}
