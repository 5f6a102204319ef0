//! Story Protocol API client

use crate::paginate::{parse_page, Page, PageOptions, PageRequest, Paginator};
use crate::transport::{ApiRequest, HttpTransport, StoryTransport};
use crate::{RetryPolicy, StoryConfig, StoryError};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

/// Read-only client for the Story Protocol REST API
///
/// Cheap to clone; the transport is shared.
#[derive(Clone)]
pub struct StoryClient {
    transport: Arc<dyn StoryTransport>,
    retry: RetryPolicy,
    pages: PageOptions,
    family_expansion: usize,
}

impl StoryClient {
    /// Client over HTTP
    pub fn new(config: &StoryConfig, retry: RetryPolicy) -> Result<Self, StoryError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), config, retry))
    }

    /// Client over any transport
    pub fn with_transport(
        transport: Arc<dyn StoryTransport>,
        config: &StoryConfig,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            retry,
            pages: config.page_options(),
            family_expansion: config.family_expansion,
        }
    }

    /// Retry policy applied to reads
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Page size and cap for list calls
    pub fn page_options(&self) -> PageOptions {
        self.pages
    }

    /// Parents/children expanded when building a family tree
    pub fn family_expansion(&self) -> usize {
        self.family_expansion
    }

    /// Send once and map non-2xx statuses to [`StoryError::Status`]
    pub(crate) async fn send_checked(&self, request: &ApiRequest) -> Result<Value, StoryError> {
        let response = self.transport.send(request).await?;
        if response.is_success() {
            return Ok(response.body);
        }
        let body = match response.body {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Err(StoryError::Status {
            status: response.status,
            body,
        })
    }

    /// Send with the retry policy
    pub(crate) async fn request_json(&self, request: &ApiRequest) -> Result<Value, StoryError> {
        self.retry.run(move |_| self.send_checked(request)).await
    }

    /// Fetch and decode a single object, `None` on 404
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        path: String,
    ) -> Result<Option<T>, StoryError> {
        match self.request_json(&ApiRequest::get(path)).await {
            Ok(body) => Ok(Some(serde_json::from_value(unwrap_data(body))?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// POST one page of a list endpoint, with retries
    pub(crate) async fn post_page<T: DeserializeOwned>(
        &self,
        path: &str,
        filter: Option<&Value>,
        page: &PageRequest,
    ) -> Result<Page<T>, StoryError> {
        let request = ApiRequest::post(path, list_body(filter, page));
        let body = self.request_json(&request).await?;
        parse_page(body)
    }

    /// Walk a list endpoint up to the cap
    pub(crate) async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        filter: Option<Value>,
    ) -> Result<Vec<T>, StoryError> {
        let filter = filter.as_ref();
        let paginator = Paginator::new(
            |page: PageRequest| async move { self.post_page::<T>(path, filter, &page).await },
            self.pages,
        );
        paginator.collect().await
    }
}

/// Body shared by the list endpoints, newest block first
pub(crate) fn list_body(filter: Option<&Value>, page: &PageRequest) -> Value {
    let mut pagination = json!({ "limit": page.limit });
    if let Some(after) = &page.after {
        pagination["after"] = Value::String(after.clone());
    }
    let mut options = json!({
        "orderBy": "blockNumber",
        "orderDirection": "desc",
        "pagination": pagination,
    });
    if let Some(filter) = filter {
        options["where"] = filter.clone();
    }
    json!({ "options": options })
}

/// Single-object endpoints wrap the payload in `data`; accept both shapes
fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ApiResponse;
    use crate::MockTransport;

    fn client(transport: MockTransport) -> StoryClient {
        StoryClient::with_transport(
            Arc::new(transport),
            &StoryConfig::default(),
            RetryPolicy::immediate(3),
        )
    }

    #[test]
    fn test_list_body_shape() {
        let body = list_body(None, &PageRequest::first(50));
        assert_eq!(
            body,
            json!({"options": {
                "orderBy": "blockNumber",
                "orderDirection": "desc",
                "pagination": {"limit": 50}
            }})
        );

        let filter = json!({"ipId": "0xabc"});
        let page = PageRequest { limit: 50, after: Some("cur".to_string()) };
        let body = list_body(Some(&filter), &page);
        assert_eq!(body["options"]["pagination"]["after"], "cur");
        assert_eq!(body["options"]["where"]["ipId"], "0xabc");
    }

    #[test]
    fn test_unwrap_data() {
        assert_eq!(unwrap_data(json!({"data": {"id": 1}})), json!({"id": 1}));
        assert_eq!(unwrap_data(json!({"id": 1})), json!({"id": 1}));
    }

    #[tokio::test]
    async fn test_send_checked_maps_status() {
        let transport = MockTransport::new(|_| {
            Ok(ApiResponse {
                status: 403,
                body: json!({"message": "forbidden"}),
            })
        });
        let err = client(transport)
            .send_checked(&ApiRequest::get("/x"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("forbidden"));
    }

    #[tokio::test]
    async fn test_get_optional_not_found() {
        let transport = MockTransport::always_status(404);
        let result: Option<Value> = client(transport.clone())
            .get_optional("/assets/0x1".to_string())
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_request_json_retries_server_errors() {
        let transport = MockTransport::sequence(vec![
            Ok(ApiResponse::status(502)),
            Ok(ApiResponse::ok(json!({"ok": true}))),
        ]);
        let body = client(transport.clone())
            .request_json(&ApiRequest::get("/x"))
            .await
            .unwrap();
        assert_eq!(body, json!({"ok": true}));
        assert_eq!(transport.call_count(), 2);
    }
}
