/// REST client for the boards backend

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::image_data::{
    Board, FilteredImagesResponse, ImageDescriptor, NewBoard, SaveImagesRequest,
    SaveImagesResponse, UserProfile, demo_boards,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw response
///
/// Implementations only fail with `AppError::Network`; a non-2xx status is a
/// successful send.
#[allow(async_fn_in_trait)]
pub trait HttpBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// `reqwest` backend; uses `fetch` when compiled to wasm32
#[derive(Debug, Clone, Default)]
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl HttpBackend for ReqwestBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        let builder = builder.header("Content-Type", "application/json");
        let builder = match &request.bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

pub struct BoardClient<H = ReqwestBackend> {
    config: Config,
    backend: H,
}

impl BoardClient<ReqwestBackend> {
    pub fn new(config: Config) -> Self {
        BoardClient {
            config,
            backend: ReqwestBackend::default(),
        }
    }
}

impl<H: HttpBackend> BoardClient<H> {
    pub fn with_backend(backend_url: &str, backend: H) -> Self {
        BoardClient {
            config: Config::with_backend_url(backend_url),
            backend,
        }
    }

    pub fn backend(&self) -> &H {
        &self.backend
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let context = format!("{} {}", method.as_str(), path_of(&url));
        log::debug!("{}", context);

        let response = self
            .backend
            .send(HttpRequest {
                method,
                url,
                bearer: token.map(str::to_string),
                body,
            })
            .await?;

        if !response.is_success() {
            return Err(AppError::Http {
                status: response.status,
                context,
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn fetch_profile(&self, token: &str) -> Result<UserProfile> {
        self.call(Method::Get, self.config.endpoint("/api/user/profile"), Some(token), None)
            .await
    }

    /// `POST /api/images/filter`; see `filter::filter_with_fallback`
    pub async fn filter_images_remote(&self, images: &[ImageDescriptor]) -> Result<Vec<ImageDescriptor>> {
        let response: FilteredImagesResponse = self
            .call(
                Method::Post,
                self.config.endpoint("/api/images/filter"),
                None,
                Some(serde_json::to_value(images)?),
            )
            .await?;
        Ok(response.images)
    }

    /// Images the backend finds on `page_url` (`GET /api/images/extract`), unfiltered
    pub async fn extract_from_url(&self, page_url: &str) -> Result<Vec<ImageDescriptor>> {
        let mut url = Url::parse(&self.config.endpoint("/api/images/extract"))
            .map_err(|e| AppError::Validation(format!("Invalid backend URL: {}", e)))?;
        url.query_pairs_mut().append_pair("url", page_url);

        let response: FilteredImagesResponse = self.call(Method::Get, url.to_string(), None, None).await?;
        Ok(response.images)
    }

    /// The user's boards, or the two demo boards when the backend refuses
    pub async fn list_boards(&self, token: &str) -> Result<Vec<Board>> {
        match self
            .call(Method::Get, self.config.endpoint("/api/boards"), Some(token), None)
            .await
        {
            Err(AppError::Http { status, .. }) => {
                log::warn!("Board list returned HTTP {}, showing demo boards", status);
                Ok(demo_boards())
            }
            other => other,
        }
    }

    pub async fn create_board(&self, token: &str, form: &NewBoard) -> Result<Board> {
        form.validate()?;
        self.call(
            Method::Post,
            self.config.endpoint("/api/boards"),
            Some(token),
            Some(serde_json::to_value(form)?),
        )
        .await
    }

    pub async fn save_images(
        &self,
        token: &str,
        board_id: &str,
        images: &[ImageDescriptor],
    ) -> Result<SaveImagesResponse> {
        let request = SaveImagesRequest {
            board_id: board_id.to_string(),
            images: images.to_vec(),
        };
        self.call(
            Method::Post,
            self.save_images_url(board_id)?,
            Some(token),
            Some(serde_json::to_value(&request)?),
        )
        .await
    }

    /// True when `GET /api/health` answers 2xx
    pub async fn health(&self) -> bool {
        let request = HttpRequest {
            method: Method::Get,
            url: self.config.endpoint("/api/health"),
            bearer: None,
            body: None,
        };
        matches!(self.backend.send(request).await, Ok(r) if r.is_success())
    }

    fn save_images_url(&self, board_id: &str) -> Result<String> {
        let mut url = Url::parse(&self.config.backend_url)
            .map_err(|e| AppError::Validation(format!("Invalid backend URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Validation("Backend URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(&["api", "boards", board_id, "save-images"]);
        Ok(url.to_string())
    }
}

fn path_of(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string())
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeBackend, json_response};
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    fn client(backend: FakeBackend) -> BoardClient<FakeBackend> {
        BoardClient::with_backend("http://backend", backend)
    }

    #[test]
    fn test_list_boards_server_error_yields_demo_boards() {
        let backend = FakeBackend::new();
        backend.respond("GET", "/api/boards", 500, "Internal Server Error");

        let boards = block_on(client(backend).list_boards("token")).unwrap();
        let names: Vec<&str> = boards.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Home Interior", "Travel Photos"]);
    }

    #[test]
    fn test_list_boards_network_failure_is_an_error() {
        let backend = FakeBackend::new();
        backend.fail("GET", "/api/boards");

        let result = block_on(client(backend).list_boards("token"));
        assert!(matches!(result, Err(AppError::Network(_))));
    }

    #[test]
    fn test_list_boards_sends_bearer_token() {
        let backend = FakeBackend::new();
        backend.respond(
            "GET",
            "/api/boards",
            200,
            &json_response(&json!([{ "id": "b1", "name": "Recipes", "description": "", "image_count": 2 }])),
        );
        let client = client(backend);

        let boards = block_on(client.list_boards("secret")).unwrap();
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].id, "b1");

        let requests = client.backend().requests();
        assert_eq!(requests[0].bearer.as_deref(), Some("secret"));
        assert_eq!(requests[0].url, "http://backend/api/boards");
    }

    #[test]
    fn test_create_board_rejects_blank_name_without_request() {
        let client = client(FakeBackend::new());
        let form = NewBoard {
            name: "  ".to_string(),
            ..Default::default()
        };

        let result = block_on(client.create_board("token", &form));
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(client.backend().requests().is_empty());
    }

    #[test]
    fn test_create_board_posts_form() {
        let backend = FakeBackend::new();
        backend.respond(
            "POST",
            "/api/boards",
            200,
            &json_response(&json!({ "id": "new-1", "name": "Kitchens", "description": "Ideas", "image_count": 0 })),
        );
        let client = client(backend);
        let form = NewBoard {
            name: "Kitchens".to_string(),
            description: "Ideas".to_string(),
            is_private: true,
        };

        let board = block_on(client.create_board("token", &form)).unwrap();
        assert_eq!(board.id, "new-1");

        let body = client.backend().requests()[0].body.clone().unwrap();
        assert_eq!(body, json!({ "name": "Kitchens", "description": "Ideas", "is_private": true }));
    }

    #[test]
    fn test_save_images_request_shape() {
        let backend = FakeBackend::new();
        backend.respond("POST", "/api/boards/b%201/save-images", 200, r#"{"saved_count":1}"#);
        let client = client(backend);
        let images = vec![ImageDescriptor::new("https://a.com/1.jpg", 200, 200, "One", "")];

        let result = block_on(client.save_images("token", "b 1", &images)).unwrap();
        assert_eq!(result.saved_count, 1);

        let request = &client.backend().requests()[0];
        assert_eq!(request.url, "http://backend/api/boards/b%201/save-images");
        let body = request.body.clone().unwrap();
        assert_eq!(body["board_id"], "b 1");
        assert_eq!(body["images"][0]["url"], "https://a.com/1.jpg");
    }

    #[test]
    fn test_save_images_http_error() {
        let backend = FakeBackend::new();
        backend.respond("POST", "/api/boards/b1/save-images", 401, "{}");

        let result = block_on(client(backend).save_images("token", "b1", &[]));
        assert!(matches!(result, Err(AppError::Http { status: 401, .. })));
    }

    #[test]
    fn test_fetch_profile() {
        let backend = FakeBackend::new();
        backend.respond(
            "GET",
            "/api/user/profile",
            200,
            r#"{"username":"ana","profile_image":null,"account_type":"BUSINESS"}"#,
        );

        let profile = block_on(client(backend).fetch_profile("token")).unwrap();
        assert_eq!(profile.username, "ana");
        assert_eq!(profile.avatar(), crate::image_data::PLACEHOLDER_AVATAR);
    }

    #[test]
    fn test_extract_from_url_encodes_page() {
        let backend = FakeBackend::new();
        backend.respond(
            "GET",
            "/api/images/extract",
            200,
            &json_response(&json!({
                "images": [{ "url": "https://i.example.com/1.jpg", "width": 564, "height": 752, "title": "T", "description": "D" }],
                "source_url": "https://blog.example.com/a b"
            })),
        );
        let client = client(backend);

        let images = block_on(client.extract_from_url("https://blog.example.com/a b")).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(
            client.backend().requests()[0].url,
            "http://backend/api/images/extract?url=https%3A%2F%2Fblog.example.com%2Fa+b"
        );
    }

    #[test]
    fn test_health() {
        let backend = FakeBackend::new();
        backend.respond("GET", "/api/health", 200, r#"{"status":"healthy"}"#);
        assert!(block_on(client(backend).health()));

        assert!(!block_on(client(FakeBackend::new()).health()));
    }
}
