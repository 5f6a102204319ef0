//! Dispute lookups

use crate::{StoryClient, StoryError};
use mintmatrix_domain::{Dispute, DisputeSummary};
use serde_json::json;

/// Disputes endpoint
pub const DISPUTES_PATH: &str = "/disputes";

impl StoryClient {
    /// Disputes raised against `target_ip_id`, up to the page cap
    pub async fn fetch_disputes(&self, target_ip_id: &str) -> Result<Vec<Dispute>, StoryError> {
        let filter = json!({ "targetIpId": target_ip_id });
        match self.list_all(DISPUTES_PATH, Some(filter)).await {
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            other => other,
        }
    }

    /// Disputes against `target_ip_id` with their status counts
    pub async fn dispute_summary(
        &self,
        target_ip_id: &str,
    ) -> Result<(DisputeSummary, Vec<Dispute>), StoryError> {
        let disputes = self.fetch_disputes(target_ip_id).await?;
        Ok((DisputeSummary::from_disputes(&disputes), disputes))
    }
}
