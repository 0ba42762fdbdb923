use crate::models::{ChildrenData, Page};
use crate::storage::TOKEN_KEY;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
    /// Caller passed an argument the endpoint cannot accept (e.g. empty node id).
    Input,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    pub(crate) fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }

    pub(crate) fn input(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Input,
            message: message.into(),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "http://localhost:3000".to_string();

        // We support BOTH `window.ENV.API_URL` (documented in README) and
        // `window.ENV.api_url` (legacy/implementation detail) for compatibility.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    // 1) Prefer README style: API_URL
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"API_URL".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }

                    // 2) Fallback: api_url
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"api_url".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn get_api_url() -> String {
    EnvConfig::new().api_url
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct CreatePageRequest {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct RenamePageRequest {
    #[serde(rename = "pageId")]
    pub page_id: String,
    #[serde(rename = "newPagePath")]
    pub new_page_path: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct DeletePageRequest {
    #[serde(rename = "pageId")]
    pub page_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct PageResponse {
    pub page: Page,
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    #[allow(dead_code)]
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    pub fn load_from_storage() -> Self {
        let base_url = get_api_url();
        let token = leptos::web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten());

        Self { base_url, token }
    }

    #[allow(dead_code)]
    pub fn save_to_storage(&self) {
        if let Some(storage) =
            leptos::web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        {
            if let Some(token) = &self.token {
                let _ = storage.set_item(TOKEN_KEY, token);
            }
        }
    }

    #[allow(dead_code)]
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    fn get_auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    async fn handle_json<T: for<'de> Deserialize<'de>>(
        res: reqwest::Response,
        ctx: &str,
    ) -> ApiResult<T> {
        let status = res.status();
        if status.is_success() {
            res.json::<T>().await.map_err(ApiError::parse)
        } else if status.as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, ctx))
        }
    }

    /// Children listing endpoint. `node_id` is a page id or path.
    pub async fn get_page_children(&self, node_id: &str) -> ApiResult<ChildrenData> {
        let client = reqwest::Client::new();
        let url = format!(
            "{}/_api/v3/page-listing/children?id={}",
            self.base_url,
            urlencoding::encode(node_id)
        );

        let mut req = client.get(url);
        if let Some(header) = self.get_auth_header() {
            req = req.header("Authorization", header);
        }

        let res = req.send().await.map_err(ApiError::network)?;
        Self::handle_json(res, "get page children").await
    }

    pub async fn create_page(&self, req_body: CreatePageRequest) -> ApiResult<PageResponse> {
        self.post_json("/_api/v3/pages/create", &req_body, "create page")
            .await
    }

    pub async fn rename_page(&self, req_body: RenamePageRequest) -> ApiResult<PageResponse> {
        self.post_json("/_api/v3/pages/rename", &req_body, "rename page")
            .await
    }

    pub async fn delete_page(&self, req_body: DeletePageRequest) -> ApiResult<serde_json::Value> {
        self.post_json("/_api/v3/pages/delete", &req_body, "delete page")
            .await
    }

    async fn post_json<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
        ctx: &str,
    ) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let mut req = client.post(format!("{}{}", self.base_url, path));
        if let Some(header) = self.get_auth_header() {
            req = req.header("Authorization", header);
        }

        let res = req.json(body).send().await.map_err(ApiError::network)?;
        Self::handle_json(res, ctx).await
    }
}
