use crate::analysis::AnalysisTarget;
use crate::routes::Route;
use crate::uploads::UploadCandidate;
use radiolab_api::{
    endpoints::{
        images::Image,
        projects::{CreateProject, Project, ProjectUpdate},
        reports::{NewReport, Report, ReportUpdate},
        AngleMeasurement, ImageId, ProjectId, ReportId,
    },
    workflows::{DeleteOutcome, WorkflowError},
    ApiError,
};
use std::fmt::Display;
use std::time::Instant;

/// Identifies one issued load. Screens remember the latest id they issued and ignore
/// results carrying any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Commands to execute (user actions → state changes and background jobs)
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    SelectNext,
    SelectPrevious,
    NavigateToTop,
    NavigateToBottom,
    NextPage,
    PreviousPage,

    // Navigation
    NavigateBack,
    Navigate(Route),
    /// Replace the current screen instead of stacking a new one.
    Redirect(Route),
    Reload,

    // Clock
    Tick(Instant),

    // Search mode
    EnterSearchMode,
    ExitSearchMode,
    AppendSearchChar(char),
    DeleteSearchChar,
    ClearSearch,

    // Project detail
    SwitchTab,

    // Text input (forms, dialogs, upload path)
    NextField,
    PreviousField,
    AppendInputChar(char),
    DeleteInputChar,
    ClearInput,
    Submit,
    Cancel,

    // Dialogs
    OpenDeleteProject,
    OpenDeleteSelected,
    OpenEditReport,
    OpenSaveReport,

    // Upload
    StartUpload,
    RemoveLastFile,

    // Analysis
    RunAnalysis,

    DownloadPdf,
    DismissNotification,
    ToggleHelp,

    // Log screen
    NavigateToLogs,
    ScrollLogsUp,
    ScrollLogsDown,
    ScrollLogsPageUp,
    ScrollLogsPageDown,
    ScrollLogsToTop,
    ScrollLogsToBottom,

    // Key sequence state
    SetPendingKey(char),
    ClearPendingKey,

    // System
    Quit,
}

/// Background work requested by a command (state → data loader)
#[derive(Debug, Clone)]
pub enum Job {
    LoadProjects {
        request: RequestId,
    },
    LoadReports {
        request: RequestId,
    },
    LoadProject {
        project_id: ProjectId,
        request: RequestId,
    },
    LoadProjectImages {
        project_id: ProjectId,
        request: RequestId,
    },
    LoadProjectReports {
        project_id: ProjectId,
        request: RequestId,
    },
    LoadReport {
        report_id: ReportId,
        request: RequestId,
    },
    CreateProject {
        project: CreateProject,
    },
    UpdateProject {
        project_id: ProjectId,
        update: ProjectUpdate,
    },
    DeleteProject {
        project_id: ProjectId,
    },
    UpdateReport {
        report_id: ReportId,
        update: ReportUpdate,
    },
    DeleteReport {
        report_id: ReportId,
        project_id: ProjectId,
    },
    DeleteImage {
        image_id: ImageId,
        project_id: ProjectId,
    },
    UploadFiles {
        project_id: ProjectId,
        files: Vec<UploadCandidate>,
    },
    Analyze {
        request: RequestId,
        targets: Vec<AnalysisTarget>,
    },
    CreateReport {
        report: NewReport,
    },
}

impl Job {
    /// Task key for the background task manager. Loads of the same kind share a key so
    /// a newer load aborts the older one.
    pub fn task_id(&self) -> String {
        match self {
            Job::LoadProjects { .. } => "load_projects".to_string(),
            Job::LoadReports { .. } => "load_reports".to_string(),
            Job::LoadProject { .. } => "load_project".to_string(),
            Job::LoadProjectImages { .. } => "load_project_images".to_string(),
            Job::LoadProjectReports { .. } => "load_project_reports".to_string(),
            Job::LoadReport { .. } => "load_report".to_string(),
            Job::CreateProject { .. } => "create_project".to_string(),
            Job::UpdateProject { project_id, .. } => format!("update_project_{project_id}"),
            Job::DeleteProject { project_id } => format!("delete_project_{project_id}"),
            Job::UpdateReport { report_id, .. } => format!("update_report_{report_id}"),
            Job::DeleteReport { report_id, .. } => format!("delete_report_{report_id}"),
            Job::DeleteImage { image_id, .. } => format!("delete_image_{image_id}"),
            Job::UploadFiles { project_id, .. } => format!("upload_{project_id}"),
            Job::Analyze { .. } => "analyze".to_string(),
            Job::CreateReport { .. } => "create_report".to_string(),
        }
    }
}

/// Events from background tasks (responses to jobs)
#[derive(Debug, Clone)]
pub enum DataEvent {
    // Loads
    ProjectsLoaded {
        request: RequestId,
        projects: Vec<Project>,
    },
    ReportsLoaded {
        request: RequestId,
        reports: Vec<Report>,
    },
    ProjectLoaded {
        request: RequestId,
        project: Project,
    },
    ProjectImagesLoaded {
        request: RequestId,
        images: Vec<Image>,
    },
    ProjectReportsLoaded {
        request: RequestId,
        reports: Vec<Report>,
    },
    ReportLoaded {
        request: RequestId,
        report: Report,
    },
    LoadFailed {
        request: RequestId,
        error: ApiError,
    },

    // Projects
    ProjectCreated {
        project_id: ProjectId,
    },
    ProjectCreateFailed {
        error: String,
    },
    ProjectUpdated {
        project_id: ProjectId,
    },
    ProjectUpdateFailed {
        project_id: ProjectId,
        error: String,
    },
    ProjectDeleted {
        project_id: ProjectId,
        already_gone: bool,
    },
    ProjectDeleteFailed {
        project_id: ProjectId,
        error: String,
    },

    // Reports
    ReportUpdated {
        report_id: ReportId,
        update: ReportUpdate,
    },
    ReportUpdateFailed {
        report_id: ReportId,
        error: String,
    },
    ReportDeleted {
        report_id: ReportId,
        project_id: ProjectId,
        outcome: DeleteOutcome,
    },
    ReportDeleteFailed {
        report_id: ReportId,
        error: WorkflowError,
    },
    ReportCreated {
        report_id: ReportId,
        project_id: ProjectId,
    },
    ReportCreateFailed {
        error: String,
    },

    // Images
    ImageDeleted {
        image_id: ImageId,
        project_id: ProjectId,
        outcome: DeleteOutcome,
    },
    ImageDeleteFailed {
        image_id: ImageId,
        error: WorkflowError,
    },
    UploadCompleted {
        project_id: ProjectId,
        uploaded: usize,
    },
    UploadFailed {
        project_id: ProjectId,
        error: String,
        /// Files that did not persist and stay selected for another attempt.
        failed_files: Vec<String>,
    },

    // Analysis
    AnalysisCompleted {
        request: RequestId,
        results: Vec<Vec<AngleMeasurement>>,
    },
}
