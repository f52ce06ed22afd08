use crate::endpoints::{
    images::{DeleteImage, ListProjectImages, UploadImage},
    projects::{CreateProject, DeleteProject, GetProject, ListProjects, UpdateProject},
    reports::{
        CreateReport, DeleteReport, GetReport, ListProjectReports, ListReports, NewReport,
        UpdateReport,
    },
    ImageId, ProjectId, ReportId,
};

#[derive(Default)]
pub struct ProjectRepository;

impl ProjectRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn list(&self) -> ListProjects {
        ListProjects
    }

    pub fn get(&self, project_id: ProjectId) -> GetProject {
        GetProject::new(project_id)
    }

    pub fn create(&self, name: impl Into<String>, patient_id: impl Into<String>) -> CreateProject {
        CreateProject::new(name, patient_id)
    }

    pub fn update(&self, project_id: ProjectId) -> UpdateProject {
        UpdateProject::new(project_id)
    }

    pub fn delete(&self, project_id: ProjectId) -> DeleteProject {
        DeleteProject::new(project_id)
    }
}

#[derive(Default)]
pub struct ReportRepository;

impl ReportRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn list(&self) -> ListReports {
        ListReports
    }

    pub fn by_project(&self, project_id: ProjectId) -> ListProjectReports {
        ListProjectReports::new(project_id)
    }

    pub fn get(&self, report_id: ReportId) -> GetReport {
        GetReport::new(report_id)
    }

    pub fn create(&self, report: NewReport) -> CreateReport {
        CreateReport::new(report)
    }

    pub fn update(&self, report_id: ReportId) -> UpdateReport {
        UpdateReport::new(report_id)
    }

    pub fn delete(&self, report_id: ReportId) -> DeleteReport {
        DeleteReport::new(report_id)
    }
}

#[derive(Default)]
pub struct ImageRepository;

impl ImageRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn by_project(&self, project_id: ProjectId) -> ListProjectImages {
        ListProjectImages::new(project_id)
    }

    pub fn upload(
        &self,
        project_id: ProjectId,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> UploadImage {
        UploadImage::new(project_id, file_name, content_type, bytes)
    }

    pub fn delete(&self, image_id: ImageId) -> DeleteImage {
        DeleteImage::new(image_id)
    }
}
