use crate::error::GatewayError;
use crate::gateway::PostGateway;
use crate::models::{page_count, Page, PageRequest, Post};
use crate::pagination::{has_next, has_previous, page_window, PageItem};

use super::{RequestSequence, RequestToken};

pub const LOAD_ERROR: &str = "Failed to load blogs. Please try again later.";

/// Paginated list of post summaries.
#[derive(Debug, Clone)]
pub struct ListView {
    page: u32,
    page_size: u32,
    posts: Vec<Post>,
    total: u64,
    loading: bool,
    error: Option<String>,
    requests: RequestSequence,
}

impl ListView {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            posts: Vec::new(),
            total: 0,
            loading: true,
            error: None,
            requests: RequestSequence::default(),
        }
    }

    /// Starts on `page` instead of the first one, e.g. from a link.
    pub fn starting_at(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn page_count(&self) -> u32 {
        page_count(self.total, self.page_size)
    }

    pub fn window(&self) -> Vec<PageItem> {
        page_window(self.page, self.page_count())
    }

    pub fn show_pagination(&self) -> bool {
        self.page_count() > 1
    }

    pub fn has_previous(&self) -> bool {
        has_previous(self.page)
    }

    pub fn has_next(&self) -> bool {
        has_next(self.page, self.page_count())
    }

    pub fn is_empty(&self) -> bool {
        !self.loading && self.posts.is_empty()
    }

    pub fn begin_load(&mut self) -> (RequestToken, PageRequest) {
        self.loading = true;
        (
            self.requests.next(),
            PageRequest::new(self.page, self.page_size),
        )
    }

    /// Returns `false` when the result belongs to a superseded request.
    pub fn finish_load(
        &mut self,
        token: RequestToken,
        result: Result<Page<Post>, GatewayError>,
    ) -> bool {
        if !self.requests.is_current(token) {
            tracing::debug!("Dropping stale page load");
            return false;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.posts = page.items;
                self.total = page.total;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("Error fetching blogs: {}", e);
                self.error = Some(LOAD_ERROR.to_string());
            }
        }
        true
    }

    /// Moves to `page` and starts its load. `None` when the page is the
    /// current one or out of range. The caller scrolls to the top.
    pub fn change_page(&mut self, page: u32) -> Option<(RequestToken, PageRequest)> {
        if page == self.page || page == 0 || page > self.page_count().max(1) {
            return None;
        }
        self.page = page;
        Some(self.begin_load())
    }

    pub async fn load<G: PostGateway + ?Sized>(&mut self, gateway: &G) -> bool {
        let (token, request) = self.begin_load();
        let result = gateway.list_posts(request).await;
        self.finish_load(token, result)
    }
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(crate::models::DEFAULT_PAGE_SIZE)
    }
}
