use super::{ImageId, Lenient, ProjectId};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use tower_api_client::{EmptyResponse, Method, Request};

// Common

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ImageId,
    #[serde(alias = "project_id")]
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default)]
    pub content_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, alias = "uploaded_at")]
    pub uploaded_at: String,
}

// Requests

#[derive(Debug, Clone)]
pub struct ListProjectImages {
    project_id: ProjectId,
}

impl ListProjectImages {
    pub fn new(project_id: ProjectId) -> Self {
        Self { project_id }
    }
}

impl Request for ListProjectImages {
    type Data = ();
    type Response = Lenient<Image>;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/images/project/{}", self.project_id).into()
    }
}

/// Multipart upload of one file. Sent through `Client::upload` rather than the
/// JSON request pipeline.
#[derive(Debug, Clone)]
pub struct UploadImage {
    project_id: ProjectId,
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl UploadImage {
    pub const ENDPOINT: &'static str = "/images/upload";

    pub fn new(
        project_id: ProjectId,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            project_id,
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_form(self) -> Result<Form, reqwest::Error> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)?;
        Ok(Form::new()
            .part("file", part)
            .text("projectId", self.project_id.to_string()))
    }
}

/// Extracts the stored image URL from an upload response: a JSON string,
/// `{"url": ..}`, or plain text.
pub fn parse_upload_response(body: &str) -> String {
    let body = body.trim();
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(url)) => url,
        Ok(Value::Object(map)) => match map.get("url") {
            Some(Value::String(url)) => url.clone(),
            _ => body.to_string(),
        },
        _ => body.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct DeleteImage {
    image_id: ImageId,
}

impl DeleteImage {
    pub fn new(image_id: ImageId) -> Self {
        Self { image_id }
    }
}

impl Request for DeleteImage {
    type Data = ();
    type Response = EmptyResponse;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/images/{}", self.image_id).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_decodes_type_field() {
        let json = r#"{
            "id": 17,
            "projectId": "3",
            "name": "left-foot.png",
            "url": "/static/left-foot.png",
            "type": "image/png",
            "size": 2048,
            "uploadedAt": "2025-04-15T10:00:00Z"
        }"#;
        let image: Image = serde_json::from_str(json).unwrap();
        assert_eq!(image.id, ImageId::new("17"));
        assert_eq!(image.project_id, ProjectId::new(3));
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.size, 2048);
    }

    #[test]
    fn test_parse_upload_response_shapes() {
        assert_eq!(parse_upload_response(r#""/static/a.png""#), "/static/a.png");
        assert_eq!(
            parse_upload_response(r#"{"url": "/static/b.png"}"#),
            "/static/b.png"
        );
        assert_eq!(parse_upload_response("/static/c.png\n"), "/static/c.png");
    }

    #[test]
    fn test_upload_image_form_builds() {
        let upload = UploadImage::new(ProjectId::new(1), "scan.dcm", "application/dicom", vec![1, 2]);
        assert_eq!(upload.len(), 2);
        assert!(upload.into_form().is_ok());
    }

    #[test]
    fn test_delete_image_endpoint() {
        assert_eq!(DeleteImage::new(ImageId::new("abc")).endpoint(), "/images/abc");
    }
}
