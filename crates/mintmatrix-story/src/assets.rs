//! Asset and license lookups
//!
//! Thin pass-throughs. Payloads are returned as JSON since the router only
//! proxies them; single-object lookups return `None` on 404.

use crate::transport::ApiRequest;
use crate::{StoryClient, StoryError};
use serde_json::{json, Value};

impl StoryClient {
    /// `GET /assets/{ip_id}`
    pub async fn get_asset(&self, ip_id: &str) -> Result<Option<Value>, StoryError> {
        self.get_optional(format!("/assets/{}", ip_id)).await
    }

    /// `GET /assets/{ip_id}/metadata`
    pub async fn get_asset_metadata(&self, ip_id: &str) -> Result<Option<Value>, StoryError> {
        self.get_optional(format!("/assets/{}/metadata", ip_id)).await
    }

    /// `POST /assets`, paginated
    pub async fn list_assets(&self, filter: Option<Value>) -> Result<Vec<Value>, StoryError> {
        self.list_all("/assets", filter).await
    }

    /// `GET /licenses/ip/terms/{ip_id}`: terms attached to an asset
    ///
    /// An asset the API does not know has no terms.
    pub async fn ip_license_terms(&self, ip_id: &str) -> Result<Vec<Value>, StoryError> {
        let body = self
            .get_optional::<Value>(format!("/licenses/ip/terms/{}", ip_id))
            .await?;
        into_list(body.unwrap_or(Value::Null), "license terms")
    }

    /// `GET /licenses/terms/{terms_id}`
    pub async fn license_terms(&self, terms_id: &str) -> Result<Option<Value>, StoryError> {
        self.get_optional(format!("/licenses/terms/{}", terms_id)).await
    }

    /// `GET /licenses/tokens/{token_id}`
    pub async fn license_token(&self, token_id: &str) -> Result<Option<Value>, StoryError> {
        self.get_optional(format!("/licenses/tokens/{}", token_id)).await
    }

    /// `POST /licenses/tokens`, paginated
    pub async fn list_license_tokens(&self, filter: Option<Value>) -> Result<Vec<Value>, StoryError> {
        self.list_all("/licenses/tokens", filter).await
    }

    /// Terms with their attached licensing config for several assets at once
    pub async fn detailed_ip_license_terms(&self, ip_ids: &[String]) -> Result<Vec<Value>, StoryError> {
        if ip_ids.is_empty() {
            return Ok(Vec::new());
        }
        let request = ApiRequest::post("/detailed-ip-license-terms", json!({ "ipIds": ip_ids }));
        let body = self.request_json(&request).await?;
        into_list(body.get("data").cloned().unwrap_or(body), "license terms")
    }
}

fn into_list(body: Value, what: &str) -> Result<Vec<Value>, StoryError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(StoryError::InvalidResponse(format!(
            "expected array of {}, got {}",
            what, other
        ))),
    }
}
