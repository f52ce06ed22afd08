pub mod analyze_screen;
pub mod home_screen;
pub mod logs_screen;
pub mod project_detail_screen;
pub mod project_form_screen;
pub mod projects_screen;
pub mod report_detail_screen;
pub mod reports_screen;
pub mod upload_screen;

use crate::state::{
    AnalyzeState, HomeState, LogsState, ProjectDetailState, ProjectFormState, ProjectsState,
    ReportDetailState, ReportsState, UploadState,
};

#[derive(Debug, Clone)]
pub enum Screen {
    Home(HomeState),
    Projects(ProjectsState),
    ProjectForm(Box<ProjectFormState>),
    ProjectDetail(Box<ProjectDetailState>),
    Upload(Box<UploadState>),
    Analyze(Box<AnalyzeState>),
    Reports(ReportsState),
    ReportDetail(Box<ReportDetailState>),
    Logs(LogsState),
}

impl Screen {
    /// Short name used in logs and the help popup.
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Home(_) => "Home",
            Screen::Projects(_) => "Projects",
            Screen::ProjectForm(_) => "Project form",
            Screen::ProjectDetail(_) => "Project",
            Screen::Upload(_) => "Upload",
            Screen::Analyze(_) => "Analyze",
            Screen::Reports(_) => "Reports",
            Screen::ReportDetail(_) => "Report",
            Screen::Logs(_) => "Logs",
        }
    }
}
