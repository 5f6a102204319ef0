//! Edge Fetcher
//!
//! Retrieves IP edges matching a sparse filter from `POST /assets/edges`.
//!
//! - Pages are requested one at a time until the API stops returning a
//!   cursor or the cap is reached.
//! - A 404 means there are no edges.
//! - A 400 on the first page of a filtered query falls back to one
//!   unfiltered page, filtered locally. The fallback does not paginate, so
//!   matches beyond that first page are not seen.
//! - A 400 on a later page is an error like any other: the server already
//!   accepted the filter, so the edges gathered so far are not swapped for a
//!   fallback page.

use crate::client::list_body;
use crate::paginate::{parse_page, Page, PageRequest, Paginator};
use crate::transport::ApiRequest;
use crate::{StoryClient, StoryError};
use mintmatrix_domain::{EdgeFilter, IpEdge};
use std::sync::atomic::{AtomicBool, Ordering};

/// Edges endpoint
pub const EDGES_PATH: &str = "/assets/edges";

impl StoryClient {
    /// Fetch edges matching `filter`, surfacing failures
    ///
    /// Returns `Ok(vec![])` only when the API reports no edges (or a 404).
    /// Exhausted retries and failed fallbacks come back as errors.
    pub async fn try_fetch_edges(&self, filter: &EdgeFilter) -> Result<Vec<IpEdge>, StoryError> {
        let filter = filter.cleaned();
        let clause = filter.to_where();
        let first_page_rejected = AtomicBool::new(false);

        let paginator = Paginator::new(
            |page: PageRequest| {
                let clause = clause.as_ref();
                let first_page_rejected = &first_page_rejected;
                async move {
                    let first = page.after.is_none();
                    match self.post_page::<IpEdge>(EDGES_PATH, clause, &page).await {
                        Err(e) if e.is_not_found() => Ok(Page::empty()),
                        Err(e) if first && e.is_bad_request() => {
                            first_page_rejected.store(true, Ordering::Relaxed);
                            Err(e)
                        }
                        other => other,
                    }
                }
            },
            self.page_options(),
        );

        match paginator.collect().await {
            Ok(edges) => {
                tracing::debug!(count = edges.len(), "Fetched edges");
                Ok(edges)
            }
            Err(e) if clause.is_some() && first_page_rejected.load(Ordering::Relaxed) => {
                tracing::warn!(error = %e, "Filtered edge query rejected, falling back to local filtering");
                self.fetch_edges_unfiltered(&filter).await
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch edges matching `filter`; any failure yields an empty list
    ///
    /// An empty result is therefore ambiguous. Use [`Self::try_fetch_edges`]
    /// when the caller must tell "no edges" apart from "gave up".
    pub async fn fetch_edges(&self, filter: &EdgeFilter) -> Vec<IpEdge> {
        match self.try_fetch_edges(filter).await {
            Ok(edges) => edges,
            Err(e) => {
                tracing::error!(error = %e, "Edge fetch failed, returning no edges");
                Vec::new()
            }
        }
    }

    /// One unfiltered page, one attempt, filtered client-side
    async fn fetch_edges_unfiltered(&self, filter: &EdgeFilter) -> Result<Vec<IpEdge>, StoryError> {
        let first = PageRequest::first(self.page_options().page_size.max(1));
        let request = ApiRequest::post(EDGES_PATH, list_body(None, &first));

        let page: Page<IpEdge> = match self.send_checked(&request).await {
            Ok(body) => parse_page(body)?,
            Err(e) if e.is_not_found() => Page::empty(),
            Err(e) => return Err(e),
        };

        let edges: Vec<IpEdge> = page.items.into_iter().filter(|e| filter.matches(e)).collect();
        tracing::debug!(count = edges.len(), "Fallback edge fetch matched");
        Ok(edges)
    }
}
