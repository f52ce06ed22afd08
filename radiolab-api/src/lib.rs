pub mod endpoints;
mod error;
pub mod gateway;
mod macros;
pub mod repositories;
pub mod workflows;

pub use crate::error::ApiError;
pub use crate::gateway::Gateway;
use endpoints::images::{parse_upload_response, UploadImage};
use repositories::*;
use tower_api_client::{Client as ApiClient, EmptyResponse, Request as ApiRequest, RequestData};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

pub struct Client {
    inner: ApiClient,
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            inner: ApiClient::new(base_url.as_str()),
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a request whose success body decodes into `R::Response`.
    ///
    /// Requests answered with `EmptyResponse` go through [`Client::execute`] instead.
    pub async fn send<R>(&self, request: R) -> Result<R::Response, ApiError>
    where
        R: ApiRequest,
    {
        self.inner.send(request).await.map_err(From::from)
    }

    /// Sends an update or delete and checks only the status. The backend answers these
    /// with a JSON message, an empty body, or `204`, and none of them carry data.
    pub async fn execute<R>(&self, request: R) -> Result<(), ApiError>
    where
        R: ApiRequest<Response = EmptyResponse>,
    {
        let url = format!("{}/{}", self.base_url, request.endpoint().trim_matches('/'));
        let method = reqwest::Method::from_bytes(R::METHOD.as_str().as_bytes())
            .map_err(|e| ApiError::transport(e.to_string()))?;

        let builder = match request.data() {
            RequestData::Empty => self.http.request(method.clone(), &url),
            RequestData::Json(data) => self.http.request(method.clone(), &url).json(data),
            RequestData::Form(_) | RequestData::Query(_) => {
                return Err(ApiError::transport(format!(
                    "{method} {url}: only JSON bodies are supported"
                )));
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        tracing::debug!("{} {} -> {}", method, url, status);
        Ok(())
    }

    /// Uploads one file as `multipart/form-data` and returns the stored image URL.
    pub async fn upload(&self, upload: UploadImage) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, UploadImage::ENDPOINT);
        let form = upload.into_form()?;

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        Ok(parse_upload_response(&body))
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

pub struct Request;

impl Request {
    pub fn projects() -> ProjectRepository {
        ProjectRepository::new()
    }

    pub fn reports() -> ReportRepository {
        ReportRepository::new()
    }

    pub fn images() -> ImageRepository {
        ImageRepository::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = Client::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(Client::default().base_url(), DEFAULT_BASE_URL);
    }
}
