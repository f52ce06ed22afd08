use super::{projects::Project, AngleMeasurement, Created, Lenient, ProjectId, ReportId};
use crate::macros::setter;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{EmptyResponse, Method, Request, RequestData};

// Common

/// Persisted result of an analysis run. Project name and patient id are copied
/// from the project when the report is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    #[serde(alias = "project_id")]
    pub project_id: ProjectId,
    #[serde(default, alias = "project_name")]
    pub project_name: String,
    #[serde(default, alias = "patient_id")]
    pub patient_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "image_count")]
    pub image_count: u32,
    #[serde(default)]
    pub angles: Vec<AngleMeasurement>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Report {
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Report #{}", self.id),
        }
    }

    pub fn notes_or_empty(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

// Requests

#[derive(Debug, Default, Clone)]
pub struct ListReports;

impl Request for ListReports {
    type Data = ();
    type Response = Lenient<Report>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/reports".into()
    }
}

#[derive(Debug, Clone)]
pub struct ListProjectReports {
    project_id: ProjectId,
}

impl ListProjectReports {
    pub fn new(project_id: ProjectId) -> Self {
        Self { project_id }
    }
}

impl Request for ListProjectReports {
    type Data = ();
    type Response = Lenient<Report>;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/reports/by_project/{}", self.project_id).into()
    }
}

#[derive(Debug, Clone)]
pub struct GetReport {
    report_id: ReportId,
}

impl GetReport {
    pub fn new(report_id: ReportId) -> Self {
        Self { report_id }
    }
}

impl Request for GetReport {
    type Data = ();
    type Response = Report;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/reports/{}", self.report_id).into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub project_id: ProjectId,
    pub project_name: String,
    pub patient_id: String,
    pub name: String,
    pub date: String,
    pub image_count: u32,
    pub angles: Vec<AngleMeasurement>,
    pub notes: String,
}

impl NewReport {
    /// Starts a report for `project`, copying the fields reports keep denormalized.
    pub fn for_project(project: &Project, name: impl Into<String>) -> Self {
        Self {
            project_id: project.id,
            project_name: project.name.clone(),
            patient_id: project.patient_id.clone(),
            name: name.into(),
            date: String::new(),
            image_count: project.image_count,
            angles: Vec::new(),
            notes: String::new(),
        }
    }

    setter!(date: String);
    setter!(notes: String);
    setter!(image_count: u32);
    setter!(angles: Vec<AngleMeasurement>);
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateReport {
    #[serde(flatten)]
    report: NewReport,
}

impl CreateReport {
    pub fn new(report: NewReport) -> Self {
        Self { report }
    }

    pub fn report(&self) -> &NewReport {
        &self.report
    }
}

impl Request for CreateReport {
    type Data = Self;
    type Response = Created<ReportId>;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/reports".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    #[serde(skip)]
    report_id: ReportId,
    #[serde(flatten)]
    update: ReportUpdate,
}

impl UpdateReport {
    pub fn new(report_id: ReportId) -> Self {
        Self {
            report_id,
            update: ReportUpdate::default(),
        }
    }

    setter!(opt update.name: String);
    setter!(opt update.notes: String);

    pub fn update(&self) -> &ReportUpdate {
        &self.update
    }
}

impl Request for UpdateReport {
    type Data = Self;
    type Response = EmptyResponse;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/reports/{}", self.report_id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteReport {
    report_id: ReportId,
}

impl DeleteReport {
    pub fn new(report_id: ReportId) -> Self {
        Self { report_id }
    }
}

impl Request for DeleteReport {
    type Data = ();
    type Response = EmptyResponse;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/reports/{}", self.report_id).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_json() -> &'static str {
        r#"{
            "id": 1,
            "name": "",
            "projectName": "Patient A",
            "patientId": "PAC-001",
            "date": "15/04/2025",
            "imageCount": 3,
            "projectId": "1",
            "angles": [
                {"name": "Hallux Valgus angle", "value": "23°"},
                {"name": "Intermetatarsal angle", "value": "12°"}
            ],
            "notes": "Moderate hallux valgus."
        }"#
    }

    #[test]
    fn test_report_decodes_and_keeps_angle_order() {
        let report: Report = serde_json::from_str(report_json()).unwrap();
        assert_eq!(report.project_id, ProjectId::new(1));
        assert_eq!(report.angles.len(), 2);
        assert_eq!(report.angles[0].label, "Hallux Valgus angle");
        assert_eq!(report.angles[1].value, "12°");
    }

    #[test]
    fn test_display_name_defaults_to_report_number() {
        let mut report: Report = serde_json::from_str(report_json()).unwrap();
        assert_eq!(report.display_name(), "Report #1");
        report.name = Some("Follow-up".to_string());
        assert_eq!(report.display_name(), "Follow-up");
    }

    #[test]
    fn test_new_report_copies_project_fields() {
        let project = Project {
            id: ProjectId::new(2),
            name: "Patient B".to_string(),
            patient_id: "PAC-002".to_string(),
            description: None,
            date: "10/04/2025".to_string(),
            image_count: 2,
            report_count: 1,
        };
        let report = NewReport::for_project(&project, "Baseline")
            .angles(vec![AngleMeasurement::new("PASA angle", "6°")]);
        let body = serde_json::to_value(CreateReport::new(report)).unwrap();
        assert_eq!(body["projectId"], 2);
        assert_eq!(body["projectName"], "Patient B");
        assert_eq!(body["patientId"], "PAC-002");
        assert_eq!(body["imageCount"], 2);
        assert_eq!(body["angles"][0]["name"], "PASA angle");
    }

    #[test]
    fn test_update_report_endpoint_and_body() {
        let request = UpdateReport::new(ReportId::new(8)).name("Renamed");
        assert_eq!(request.endpoint(), "/reports/8");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"name": "Renamed"})
        );
    }

    #[test]
    fn test_by_project_endpoint() {
        assert_eq!(
            ListProjectReports::new(ProjectId::new(5)).endpoint(),
            "/reports/by_project/5"
        );
    }
}
