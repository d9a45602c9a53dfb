use crate::config::BackendConfig;
use crate::error::GatewayError;
use crate::gateway::{AuthBackend, PostGateway};
use crate::models::{
    AuthEvent, Credentials, Identity, InsertPostRow, Page, PageRequest, Post, PostDraft, PostId,
    PostRow, Session, SignUpOutcome, UpdatePostRow,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::header::{HeaderValue, CONTENT_RANGE, RANGE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

const POSTS_PATH: &str = "rest/v1/blogs";
const POST_SELECT: &str = "*,profiles:author_id(email)";
const EVENT_CAPACITY: usize = 16;
// Запас, чтобы токен не истёк по дороге к серверу
const EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(Session),
    User(Identity),
}

/// Client for the hosted REST and auth services.
///
/// Clones share the session slot and the event channel.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: BackendConfig,
    session: Arc<Mutex<Option<Session>>>,
    events: broadcast::Sender<AuthEvent>,
}

impl HttpClient {
    pub fn new(config: BackendConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            client: build_client(),
            config,
            session: Arc::new(Mutex::new(None)),
            events,
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Puts a previously persisted session back without contacting the server.
    pub async fn restore_session(&self, session: Session) {
        tracing::debug!("Restoring session for user {}", session.user.id);
        *self.session.lock().await = Some(session);
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.lock().await.clone()
    }

    async fn store_session(&self, mut session: Session) -> Session {
        if session.expires_at.is_none() {
            session.expires_at = Some(Utc::now().timestamp() + session.expires_in);
        }
        *self.session.lock().await = Some(session.clone());
        session
    }

    /// The stored session, refreshed first when its access token is about
    /// to expire. A refresh token the backend refuses ends the session; any
    /// other refresh failure keeps it for a later retry.
    async fn active_session(&self) -> Result<Option<Session>, GatewayError> {
        let Some(session) = self.session().await else {
            return Ok(None);
        };
        let deadline = Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS);
        if !session.is_expired(deadline) {
            return Ok(Some(session));
        }

        tracing::debug!("Access token expired for user {}, refreshing", session.user.id);
        match self.refresh_session().await {
            Ok(session) => Ok(Some(session)),
            Err(e) if e.is_rejection() => {
                tracing::warn!("Refresh token rejected, signing out: {}", e);
                *self.session.lock().await = None;
                self.emit(AuthEvent::SignedOut);
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Session refresh failed, keeping it: {}", e);
                Err(e)
            }
        }
    }

    async fn require_session(&self, action: &str) -> Result<Session, GatewayError> {
        self.active_session()
            .await?
            .ok_or_else(|| GatewayError::Unauthorized(format!("sign in to {}", action)))
    }

    fn emit(&self, event: AuthEvent) {
        // Ошибка означает только отсутствие подписчиков
        let _ = self.events.send(event);
    }

    fn with_keys(&self, request: RequestBuilder, bearer: &str) -> RequestBuilder {
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    async fn bearer(&self) -> Result<String, GatewayError> {
        Ok(match self.active_session().await? {
            Some(session) => session.access_token,
            None => self.config.anon_key.clone(),
        })
    }

    fn id_filter(id: PostId) -> [(&'static str, String); 2] {
        [
            ("select", POST_SELECT.to_string()),
            ("id", format!("eq.{}", id)),
        ]
    }

    async fn token_grant<B: Serialize + ?Sized>(
        &self,
        grant_type: &str,
        body: &B,
    ) -> Result<Session, GatewayError> {
        let url = self.config.endpoint("auth/v1/token");
        let response = self
            .with_keys(self.client.post(&url), &self.config.anon_key)
            .query(&[("grant_type", grant_type)])
            .json(body)
            .send()
            .await?;

        read_json(response).await
    }

    async fn revoke(&self, access_token: &str) -> Result<(), GatewayError> {
        let url = self.config.endpoint("auth/v1/logout");
        let response = self
            .with_keys(self.client.post(&url), access_token)
            .send()
            .await?;

        let status = response.status();
        // 401: токен уже недействителен
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        let text = response.text().await?;
        Err(GatewayError::from_status(status, &text))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client() -> Client {
    use std::time::Duration;

    Client::builder()
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[cfg(target_arch = "wasm32")]
fn build_client() -> Client {
    Client::new()
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        Ok(serde_json::from_str(&text)?)
    } else {
        tracing::debug!("Backend responded {}: {}", status, text);
        Err(GatewayError::from_status(status, &text))
    }
}

/// Total from a `Content-Range: 0-5/42` header. `*` means the count was not requested.
fn content_range_total(value: Option<&HeaderValue>) -> Option<u64> {
    let value = value?.to_str().ok()?;
    let (_, total) = value.split_once('/')?;
    total.trim().parse().ok()
}

fn single_row(rows: Vec<PostRow>) -> Result<Post, GatewayError> {
    rows.into_iter()
        .next()
        .map(Post::from)
        .ok_or(GatewayError::NotFound)
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PostGateway for HttpClient {
    async fn list_posts(&self, request: PageRequest) -> Result<Page<Post>, GatewayError> {
        let (from, to) = request.range();
        let url = self.config.endpoint(POSTS_PATH);
        let bearer = self.bearer().await?;

        tracing::debug!("Listing posts, rows {}-{}", from, to);

        let response = self
            .with_keys(self.client.get(&url), &bearer)
            .query(&[("select", POST_SELECT), ("order", "created_at.desc")])
            .header("Range-Unit", "items")
            .header(RANGE, format!("{}-{}", from, to))
            .header("Prefer", "count=exact")
            .send()
            .await?;

        let total = content_range_total(response.headers().get(CONTENT_RANGE));

        // Страница за пределами таблицы
        if response.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok(Page {
                items: Vec::new(),
                total: total.unwrap_or(0),
            });
        }

        let rows: Vec<PostRow> = read_json(response).await?;
        let total = total.ok_or_else(|| {
            GatewayError::SerializationError("response has no Content-Range total".into())
        })?;

        Ok(Page {
            items: rows.into_iter().map(Post::from).collect(),
            total,
        })
    }

    async fn get_post(&self, id: PostId) -> Result<Post, GatewayError> {
        let url = self.config.endpoint(POSTS_PATH);
        let bearer = self.bearer().await?;

        tracing::debug!("Fetching post {}", id);

        let response = self
            .with_keys(self.client.get(&url), &bearer)
            .query(&Self::id_filter(id))
            .send()
            .await?;

        single_row(read_json(response).await?)
    }

    async fn create_post(&self, draft: PostDraft) -> Result<Post, GatewayError> {
        draft.validate()?;
        let session = self.require_session("create posts").await?;

        let url = self.config.endpoint(POSTS_PATH);
        let row = InsertPostRow {
            title: &draft.title,
            content: &draft.content,
            author_id: session.user.id,
        };

        let response = self
            .with_keys(self.client.post(&url), &session.access_token)
            .query(&[("select", POST_SELECT)])
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;

        let post = single_row(read_json(response).await?).map_err(|_| {
            GatewayError::SerializationError("insert returned no row".into())
        })?;

        tracing::info!("Post created: id={}, author_id={}", post.id, post.author_id);

        Ok(post)
    }

    async fn update_post(&self, id: PostId, draft: PostDraft) -> Result<Post, GatewayError> {
        draft.validate()?;
        let session = self.require_session("edit posts").await?;

        let url = self.config.endpoint(POSTS_PATH);
        let row = UpdatePostRow {
            title: &draft.title,
            content: &draft.content,
            updated_at: Utc::now(),
        };

        let response = self
            .with_keys(self.client.patch(&url), &session.access_token)
            .query(&Self::id_filter(id))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;

        // Row level security hides rows of other authors, so nothing matches
        let post = single_row(read_json(response).await?)?;

        tracing::info!("Post updated: id={}, author_id={}", post.id, session.user.id);

        Ok(post)
    }

    async fn delete_post(&self, id: PostId) -> Result<(), GatewayError> {
        let session = self.require_session("delete posts").await?;
        let url = self.config.endpoint(POSTS_PATH);

        let response = self
            .with_keys(self.client.delete(&url), &session.access_token)
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(GatewayError::from_status(status, &text));
        }

        tracing::info!("Post deleted: id={}, author_id={}", id, session.user.id);

        Ok(())
    }

    async fn current_identity(&self) -> Result<Option<Identity>, GatewayError> {
        let Some(session) = self.active_session().await? else {
            return Ok(None);
        };

        let url = self.config.endpoint("auth/v1/user");
        let response = self
            .with_keys(self.client.get(&url), &session.access_token)
            .send()
            .await?;

        match read_json::<Identity>(response).await {
            Ok(identity) => Ok(Some(identity)),
            Err(GatewayError::Unauthorized(message)) => {
                tracing::warn!("Stored session rejected: {}", message);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AuthBackend for HttpClient {
    async fn get_session(&self) -> Result<Option<Session>, GatewayError> {
        let session = self.active_session().await?;

        self.emit(AuthEvent::InitialSession(
            session.as_ref().map(|s| s.user.clone()),
        ));

        Ok(session)
    }

    async fn sign_in(&self, credentials: Credentials) -> Result<Session, GatewayError> {
        tracing::debug!("Sign in requested for {}", credentials.email);

        let session = self.token_grant("password", &credentials).await?;
        let session = self.store_session(session).await;

        tracing::info!("Signed in: user_id={}", session.user.id);
        self.emit(AuthEvent::SignedIn(session.user.clone()));

        Ok(session)
    }

    async fn sign_up(&self, credentials: Credentials) -> Result<SignUpOutcome, GatewayError> {
        tracing::debug!("Sign up requested for {}", credentials.email);

        let url = self.config.endpoint("auth/v1/signup");
        let response = self
            .with_keys(self.client.post(&url), &self.config.anon_key)
            .json(&credentials)
            .send()
            .await?;

        match read_json::<SignUpResponse>(response).await? {
            SignUpResponse::Session(session) => {
                let session = self.store_session(session).await;
                tracing::info!("Signed up: user_id={}", session.user.id);
                self.emit(AuthEvent::SignedIn(session.user.clone()));
                Ok(SignUpOutcome::SignedIn(session))
            }
            SignUpResponse::User(identity) => {
                tracing::info!("Signed up, confirmation pending: user_id={}", identity.id);
                Ok(SignUpOutcome::ConfirmationRequired(identity))
            }
        }
    }

    async fn sign_out(&self) -> Result<(), GatewayError> {
        let taken = self.session.lock().await.take();
        let Some(session) = taken else {
            self.emit(AuthEvent::SignedOut);
            return Ok(());
        };

        // Локальная сессия уже удалена, даже если отзыв токена не удался
        let result = self.revoke(&session.access_token).await;

        tracing::info!("Signed out: user_id={}", session.user.id);
        self.emit(AuthEvent::SignedOut);

        result
    }

    async fn refresh_session(&self) -> Result<Session, GatewayError> {
        let current = self
            .session()
            .await
            .ok_or_else(|| GatewayError::Unauthorized("no session to refresh".into()))?;

        let session = self
            .token_grant(
                "refresh_token",
                &RefreshRequest {
                    refresh_token: &current.refresh_token,
                },
            )
            .await?;
        let session = self.store_session(session).await;

        tracing::debug!("Token refreshed for user {}", session.user.id);
        self.emit(AuthEvent::TokenRefreshed(session.user.clone()));

        Ok(session)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_content_range_total() {
        let header = HeaderValue::from_static("0-5/42");
        assert_eq!(content_range_total(Some(&header)), Some(42));

        let empty = HeaderValue::from_static("*/0");
        assert_eq!(content_range_total(Some(&empty)), Some(0));

        let uncounted = HeaderValue::from_static("0-5/*");
        assert_eq!(content_range_total(Some(&uncounted)), None);
        assert_eq!(content_range_total(None), None);
    }

    #[test]
    fn single_row_maps_empty_to_not_found() {
        assert!(single_row(Vec::new()).unwrap_err().is_not_found());
    }
}
