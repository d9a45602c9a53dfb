//! Seams between the front ends and the hosted backend.
//!
//! Browser futures are not `Send`, so the traits drop the bound on wasm32.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::GatewayError;
use crate::models::{
    AuthEvent, Credentials, Identity, Page, PageRequest, Post, PostDraft, PostId, Session,
    SignUpOutcome,
};

/// Data access for the `blogs` table.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PostGateway {
    /// Newest posts first. `total` counts every row, not only this page.
    async fn list_posts(&self, request: PageRequest) -> Result<Page<Post>, GatewayError>;

    async fn get_post(&self, id: PostId) -> Result<Post, GatewayError>;

    /// Validates the draft before any network call and attaches the signed in
    /// identity as author.
    async fn create_post(&self, draft: PostDraft) -> Result<Post, GatewayError>;

    async fn update_post(&self, id: PostId, draft: PostDraft) -> Result<Post, GatewayError>;

    async fn delete_post(&self, id: PostId) -> Result<(), GatewayError>;

    async fn current_identity(&self) -> Result<Option<Identity>, GatewayError>;
}

/// Session management delegated to the auth service.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AuthBackend {
    async fn get_session(&self) -> Result<Option<Session>, GatewayError>;

    async fn sign_in(&self, credentials: Credentials) -> Result<Session, GatewayError>;

    async fn sign_up(&self, credentials: Credentials) -> Result<SignUpOutcome, GatewayError>;

    async fn sign_out(&self) -> Result<(), GatewayError>;

    async fn refresh_session(&self) -> Result<Session, GatewayError>;

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}
