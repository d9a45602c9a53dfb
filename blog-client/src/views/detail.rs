use crate::error::GatewayError;
use crate::gateway::PostGateway;
use crate::models::{Identity, Post, PostId};

use super::{RequestSequence, RequestToken};

pub const LOAD_ERROR: &str = "Failed to load the blog. It may have been deleted or does not exist.";
pub const DELETE_ERROR: &str = "Failed to delete the blog. Please try again.";
pub const MISSING: &str = "Blog not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStage {
    Idle,
    Confirming,
    Deleting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Leave the page, the post is gone.
    Deleted,
    Failed,
}

/// One post, with the author's edit and delete controls.
#[derive(Debug, Clone)]
pub struct DetailView {
    id: PostId,
    post: Option<Post>,
    loading: bool,
    error: Option<String>,
    delete: DeleteStage,
    requests: RequestSequence,
}

impl DetailView {
    pub fn new(id: PostId) -> Self {
        Self {
            id,
            post: None,
            loading: true,
            error: None,
            delete: DeleteStage::Idle,
            requests: RequestSequence::default(),
        }
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message for the error panel, if the page has nothing else to show.
    pub fn error(&self) -> Option<&str> {
        match (&self.error, &self.post) {
            (Some(error), _) => Some(error),
            (None, None) if !self.loading => Some(MISSING),
            _ => None,
        }
    }

    pub fn delete_stage(&self) -> DeleteStage {
        self.delete
    }

    pub fn is_author(&self, viewer: Option<&Identity>) -> bool {
        self.post
            .as_ref()
            .is_some_and(|post| post.is_authored_by(viewer))
    }

    pub fn begin_load(&mut self) -> RequestToken {
        self.loading = true;
        self.requests.next()
    }

    pub fn finish_load(&mut self, token: RequestToken, result: Result<Post, GatewayError>) -> bool {
        if !self.requests.is_current(token) {
            return false;
        }

        self.loading = false;
        match result {
            Ok(post) => {
                self.post = Some(post);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("Error fetching blog {}: {}", self.id, e);
                self.error = Some(LOAD_ERROR.to_string());
            }
        }
        true
    }

    /// Opens the confirmation step. Only the author gets one.
    pub fn request_delete(&mut self, viewer: Option<&Identity>) -> bool {
        if self.delete != DeleteStage::Idle || !self.is_author(viewer) {
            return false;
        }
        self.delete = DeleteStage::Confirming;
        true
    }

    pub fn cancel_delete(&mut self) {
        if self.delete == DeleteStage::Confirming {
            self.delete = DeleteStage::Idle;
        }
    }

    /// Moves a confirmed delete into the busy state. `None` unless the
    /// confirmation step is open.
    pub fn confirm_delete(&mut self) -> Option<PostId> {
        if self.delete != DeleteStage::Confirming {
            return None;
        }
        self.delete = DeleteStage::Deleting;
        Some(self.id)
    }

    pub fn finish_delete(&mut self, result: Result<(), GatewayError>) -> DeleteOutcome {
        match result {
            Ok(()) => {
                self.delete = DeleteStage::Idle;
                DeleteOutcome::Deleted
            }
            Err(e) => {
                tracing::warn!("Error deleting blog {}: {}", self.id, e);
                self.error = Some(DELETE_ERROR.to_string());
                self.delete = DeleteStage::Idle;
                DeleteOutcome::Failed
            }
        }
    }

    /// Shows a freshly saved version without refetching.
    pub fn apply_update(&mut self, mut updated: Post) {
        if updated.id != self.id {
            return;
        }
        if let Some(current) = &self.post {
            if updated.author_email.is_none() {
                updated.author_email = current.author_email.clone();
            }
        }
        self.post = Some(updated);
        self.error = None;
    }

    pub async fn load<G: PostGateway + ?Sized>(&mut self, gateway: &G) -> bool {
        let token = self.begin_load();
        let result = gateway.get_post(self.id).await;
        self.finish_load(token, result)
    }

    /// Runs a confirmed delete. Without an open confirmation nothing is sent.
    pub async fn delete<G: PostGateway + ?Sized>(&mut self, gateway: &G) -> Option<DeleteOutcome> {
        let id = self.confirm_delete()?;
        let result = gateway.delete_post(id).await;
        Some(self.finish_delete(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostDraft;
    use crate::testing::MemoryBackend;

    #[tokio::test]
    async fn controls_only_for_author() {
        let backend = MemoryBackend::new();
        let ann = backend.add_user("ann@example.com", "pw");
        let bob = backend.add_user("bob@example.com", "pw");
        let post = backend.seed_posts(&ann, 1).remove(0);

        let mut view = DetailView::new(post.id);
        view.load(&backend).await;

        assert!(view.is_author(Some(&ann)));
        assert!(!view.is_author(Some(&bob)));
        assert!(!view.is_author(None));
        assert!(!view.request_delete(Some(&bob)));
        assert_eq!(view.delete_stage(), DeleteStage::Idle);
    }

    #[tokio::test]
    async fn delete_needs_confirmation() {
        let backend = MemoryBackend::new();
        let ann = backend.add_user("ann@example.com", "pw");
        backend.sign_in_as(&ann);
        let post = backend.seed_posts(&ann, 1).remove(0);

        let mut view = DetailView::new(post.id);
        view.load(&backend).await;
        let calls = backend.calls();

        assert_eq!(view.delete(&backend).await, None);
        assert_eq!(backend.calls(), calls);

        assert!(view.request_delete(Some(&ann)));
        view.cancel_delete();
        assert_eq!(view.delete(&backend).await, None);
        assert_eq!(backend.calls(), calls);
        assert!(backend.stored(post.id).is_some());

        assert!(view.request_delete(Some(&ann)));
        assert_eq!(view.delete(&backend).await, Some(DeleteOutcome::Deleted));
        assert_eq!(backend.calls(), calls + 1);
        assert!(backend.stored(post.id).is_none());
    }

    #[tokio::test]
    async fn busy_state_blocks_second_confirm() {
        let backend = MemoryBackend::new();
        let ann = backend.add_user("ann@example.com", "pw");
        let post = backend.seed_posts(&ann, 1).remove(0);

        let mut view = DetailView::new(post.id);
        view.load(&backend).await;
        view.request_delete(Some(&ann));

        assert_eq!(view.confirm_delete(), Some(post.id));
        assert_eq!(view.delete_stage(), DeleteStage::Deleting);
        assert_eq!(view.confirm_delete(), None);
        view.cancel_delete();
        assert_eq!(view.delete_stage(), DeleteStage::Deleting);
    }

    #[tokio::test]
    async fn failed_delete_reports_and_resets() {
        let backend = MemoryBackend::new();
        let ann = backend.add_user("ann@example.com", "pw");
        backend.sign_in_as(&ann);
        let post = backend.seed_posts(&ann, 1).remove(0);

        let mut view = DetailView::new(post.id);
        view.load(&backend).await;
        view.request_delete(Some(&ann));
        backend.fail_next("timeout");

        assert_eq!(view.delete(&backend).await, Some(DeleteOutcome::Failed));
        assert_eq!(view.error(), Some(DELETE_ERROR));
        assert_eq!(view.delete_stage(), DeleteStage::Idle);
    }

    #[tokio::test]
    async fn missing_post_shows_load_error() {
        let backend = MemoryBackend::new();
        let mut view = DetailView::new(uuid::Uuid::new_v4());
        view.load(&backend).await;

        assert!(view.post().is_none());
        assert_eq!(view.error(), Some(LOAD_ERROR));
    }

    #[tokio::test]
    async fn update_is_reflected_without_reload() {
        let backend = MemoryBackend::new();
        let ann = backend.add_user("ann@example.com", "pw");
        backend.sign_in_as(&ann);
        let post = backend.seed_posts(&ann, 1).remove(0);

        let mut view = DetailView::new(post.id);
        view.load(&backend).await;
        let calls = backend.calls();

        let updated = backend
            .update_post(post.id, PostDraft::new("New title", "New body"))
            .await
            .unwrap();
        view.apply_update(updated);

        let shown = view.post().unwrap();
        assert_eq!(shown.title, "New title");
        assert_eq!(shown.content, "New body");
        assert!(shown.updated_at.is_some());
        assert_eq!(shown.author_email.as_deref(), Some("ann@example.com"));
        assert_eq!(backend.calls(), calls + 1);
    }
}
