//! Walks paginated listings to the end

use serde_json::Value;
use tracing::debug;
use tunewire_core::{PageError, PageState};
use tunewire_domain::{Endpoints, RequestDescriptor};

use super::errors::ApiError;
use super::executor::Execute;

/// Follows `next` links from a first page and aggregates every item.
///
/// Follow-up pages are fetched through `fetcher`, normally the retry
/// orchestrator, so a rate limit halfway through is waited out.
pub struct Pager<'a, X: ?Sized> {
    fetcher: &'a X,
    endpoints: &'a Endpoints,
}

impl<'a, X: Execute + ?Sized> Pager<'a, X> {
    /// Pager fetching through `fetcher`; absolute `next` links are made
    /// relative to `endpoints`.
    pub fn new(fetcher: &'a X, endpoints: &'a Endpoints) -> Self {
        Self { fetcher, endpoints }
    }

    /// Collect the items of `first_page` and every page after it, in order.
    ///
    /// # Errors
    /// [`ApiError::Pagination`] if a page has an unexpected shape, or any
    /// error from fetching a follow-up page.
    pub async fn collect(&self, first_page: Value) -> Result<Vec<Value>, ApiError> {
        let mut state = PageState::from_first_page(first_page).map_err(pagination_error)?;

        while let Some(link) = state.next_link() {
            let endpoint = self.endpoints.relative_endpoint(link).to_string();
            debug!(page = state.pages() + 1, %endpoint, "Fetching next page");

            let body = self.fetcher.execute(&RequestDescriptor::get(endpoint)).await?.into_value();
            state.absorb(body).map_err(pagination_error)?;
        }

        debug!(pages = state.pages(), items = state.items().len(), "Paged listing complete");
        Ok(state.into_items())
    }
}

fn pagination_error(err: PageError) -> ApiError {
    ApiError::Pagination(err.to_string())
}
