//! Cursor pagination shared by every list endpoint
//!
//! The API pages with an opaque `after` cursor and reports the next cursor
//! in each response. [`Paginator`] walks those pages one at a time and stops
//! when the API runs out of pages or the accumulated item count reaches the
//! cap. The page that crosses the cap is kept whole.

use crate::StoryError;
use futures::stream::{self, Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::marker::PhantomData;

/// Default page size
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Default cap on accumulated items
pub const DEFAULT_MAX_TOTAL: usize = 100;

/// Page size and accumulation cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    /// Items requested per page
    pub page_size: usize,
    /// Stop requesting once this many items have been gathered
    pub max_total: usize,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_total: DEFAULT_MAX_TOTAL,
        }
    }
}

/// Parameters for one page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Page size
    pub limit: usize,
    /// Cursor from the previous page; `None` for the first page
    pub after: Option<String>,
}

impl PageRequest {
    /// First page of the given size
    pub fn first(limit: usize) -> Self {
        Self { limit, after: None }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Cursor for the next page, `None` on the last page
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// Final page with no items
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next: None,
        }
    }
}

#[derive(Deserialize)]
struct ListEnvelope {
    data: Option<Vec<Value>>,
    next: Option<Value>,
}

/// Parse a `{data: [...], next: cursor}` response body
///
/// A missing, null or empty `next` marks the last page. Numeric cursors are
/// accepted and turned into strings. Rows that do not decode as `T` are
/// logged and skipped so one bad row does not sink the page.
pub fn parse_page<T: DeserializeOwned>(body: Value) -> Result<Page<T>, StoryError> {
    let envelope: ListEnvelope = serde_json::from_value(body)?;
    let next = match envelope.next {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let rows = envelope.data.unwrap_or_default();
    let mut items = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value(row) {
            Ok(item) => items.push(item),
            Err(e) => tracing::warn!(index, error = %e, "Skipping malformed list row"),
        }
    }
    Ok(Page { items, next })
}

enum Cursor {
    Start,
    After { cursor: String, gathered: usize },
    Done,
}

/// Lazy, finite, restartable walk over a paged endpoint
///
/// `fetch` is called once per page, strictly in sequence. Each call to
/// [`Paginator::stream`] starts again from the first page.
pub struct Paginator<T, F> {
    fetch: F,
    options: PageOptions,
    _item: PhantomData<fn() -> T>,
}

impl<T, F, Fut> Paginator<T, F>
where
    F: Fn(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, StoryError>>,
{
    /// Wrap a page-fetching function
    pub fn new(fetch: F, options: PageOptions) -> Self {
        Self {
            fetch,
            options,
            _item: PhantomData,
        }
    }

    /// Stream of pages; an error ends the stream after being yielded
    pub fn stream(&self) -> impl Stream<Item = Result<Page<T>, StoryError>> + '_ {
        let limit = self.options.page_size.max(1);
        let max_total = self.options.max_total;

        stream::unfold(Cursor::Start, move |cursor| async move {
            let (request, gathered) = match cursor {
                Cursor::Start => (PageRequest::first(limit), 0),
                Cursor::After { cursor, gathered } => (
                    PageRequest {
                        limit,
                        after: Some(cursor),
                    },
                    gathered,
                ),
                Cursor::Done => return None,
            };

            match (self.fetch)(request).await {
                Ok(page) => {
                    let gathered = gathered + page.items.len();
                    let next = match &page.next {
                        Some(cursor) if gathered < max_total => Cursor::After {
                            cursor: cursor.clone(),
                            gathered,
                        },
                        _ => Cursor::Done,
                    };
                    Some((Ok(page), next))
                }
                Err(e) => Some((Err(e), Cursor::Done)),
            }
        })
    }

    /// Gather items from every page the cap allows
    ///
    /// The first error aborts the walk and is returned.
    pub async fn collect(&self) -> Result<Vec<T>, StoryError> {
        let mut items = Vec::new();
        let pages = self.stream();
        futures::pin_mut!(pages);
        while let Some(page) = pages.next().await {
            items.extend(page?.items);
        }
        Ok(items)
    }
}
