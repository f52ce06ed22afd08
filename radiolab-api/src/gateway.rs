use crate::{
    endpoints::{
        images::UploadImage,
        projects::{Project, ProjectUpdate},
        reports::NewReport,
        ImageId, ProjectId, ReportId,
    },
    ApiError, Client, Request,
};
use std::future::Future;

/// The backend operations the multi-step workflows are built from.
///
/// `Client` is the production implementation; tests substitute an in-memory one.
pub trait Gateway: Send + Sync {
    fn get_project(
        &self,
        project_id: ProjectId,
    ) -> impl Future<Output = Result<Project, ApiError>> + Send;

    fn update_project(
        &self,
        project_id: ProjectId,
        update: ProjectUpdate,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn create_report(
        &self,
        report: NewReport,
    ) -> impl Future<Output = Result<ReportId, ApiError>> + Send;

    fn delete_report(&self, report_id: ReportId)
        -> impl Future<Output = Result<(), ApiError>> + Send;

    fn upload_image(
        &self,
        upload: UploadImage,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    fn delete_image(&self, image_id: ImageId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl Gateway for Client {
    async fn get_project(&self, project_id: ProjectId) -> Result<Project, ApiError> {
        self.send(Request::projects().get(project_id)).await
    }

    async fn update_project(
        &self,
        project_id: ProjectId,
        update: ProjectUpdate,
    ) -> Result<(), ApiError> {
        let request = Request::projects().update(project_id).with_update(update);
        self.execute(request).await
    }

    async fn create_report(&self, report: NewReport) -> Result<ReportId, ApiError> {
        let created = self.send(Request::reports().create(report)).await?;
        Ok(created.into_id())
    }

    async fn delete_report(&self, report_id: ReportId) -> Result<(), ApiError> {
        self.execute(Request::reports().delete(report_id)).await
    }

    async fn upload_image(&self, upload: UploadImage) -> Result<String, ApiError> {
        self.upload(upload).await
    }

    async fn delete_image(&self, image_id: ImageId) -> Result<(), ApiError> {
        self.execute(Request::images().delete(image_id)).await
    }
}
