use super::{Created, Lenient, ProjectId};
use crate::macros::setter;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{EmptyResponse, Method, Request, RequestData};

// Common

/// A patient case grouping radiographs and the reports derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(alias = "patient_id")]
    pub patient_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "image_count")]
    pub image_count: u32,
    #[serde(default, alias = "report_count")]
    pub report_count: u32,
}

impl Project {
    /// `imageCount` is authoritative: images that happen to be loaded do not count.
    pub fn can_analyze(&self) -> bool {
        self.image_count > 0
    }

    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("No description")
    }
}

// Requests

#[derive(Debug, Default, Clone)]
pub struct ListProjects;

impl Request for ListProjects {
    type Data = ();
    type Response = Lenient<Project>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/projects".into()
    }
}

#[derive(Debug, Clone)]
pub struct GetProject {
    project_id: ProjectId,
}

impl GetProject {
    pub fn new(project_id: ProjectId) -> Self {
        Self { project_id }
    }
}

impl Request for GetProject {
    type Data = ();
    type Response = Project;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/projects/{}", self.project_id).into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub image_count: u32,
    pub report_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateProject {
    #[serde(flatten)]
    project: NewProject,
}

impl CreateProject {
    pub fn new(name: impl Into<String>, patient_id: impl Into<String>) -> Self {
        Self {
            project: NewProject {
                name: name.into(),
                patient_id: patient_id.into(),
                description: None,
                date: None,
                image_count: 0,
                report_count: 0,
            },
        }
    }

    setter!(opt project.description: String);
    setter!(opt project.date: String);

    pub fn project(&self) -> &NewProject {
        &self.project
    }
}

impl Request for CreateProject {
    type Data = Self;
    type Response = Created<ProjectId>;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/projects".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

/// Partial project update. Only fields that were set are sent.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_count: Option<u32>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProject {
    #[serde(skip)]
    project_id: ProjectId,
    #[serde(flatten)]
    update: ProjectUpdate,
}

impl UpdateProject {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            update: ProjectUpdate::default(),
        }
    }

    setter!(opt update.name: String);
    setter!(opt update.patient_id: String);
    setter!(opt update.description: String);
    setter!(opt update.image_count: u32);
    setter!(opt update.report_count: u32);

    pub fn with_update(mut self, update: ProjectUpdate) -> Self {
        self.update = update;
        self
    }

    pub fn update(&self) -> &ProjectUpdate {
        &self.update
    }
}

impl Request for UpdateProject {
    type Data = Self;
    type Response = EmptyResponse;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/projects/{}", self.project_id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteProject {
    project_id: ProjectId,
}

impl DeleteProject {
    pub fn new(project_id: ProjectId) -> Self {
        Self { project_id }
    }
}

impl Request for DeleteProject {
    type Data = ();
    type Response = EmptyResponse;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/projects/{}", self.project_id).into()
    }
}
