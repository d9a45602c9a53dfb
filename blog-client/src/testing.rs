//! In-process backend used by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::GatewayError;
use crate::gateway::{AuthBackend, PostGateway};
use crate::models::{
    AuthEvent, Credentials, Identity, Page, PageRequest, Post, PostDraft, PostId, Session,
    SignUpOutcome,
};

#[derive(Default)]
struct Inner {
    posts: Vec<Post>,
    users: Vec<(Identity, String)>,
    session: Option<Session>,
    fail_next: Option<String>,
}

pub(crate) struct MemoryBackend {
    inner: Mutex<Inner>,
    events: broadcast::Sender<AuthEvent>,
    calls: AtomicUsize,
}

pub(crate) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

pub(crate) fn identity(email: &str) -> Identity {
    Identity {
        id: Uuid::new_v4(),
        email: email.to_string(),
        created_at: epoch(),
    }
}

pub(crate) fn post_by(author: &Identity, title: &str) -> Post {
    Post {
        id: Uuid::new_v4(),
        title: title.to_string(),
        content: format!("{} body", title),
        created_at: epoch(),
        updated_at: None,
        author_id: author.id,
        author_email: Some(author.email.clone()),
    }
}

fn session_for(user: &Identity) -> Session {
    Session {
        access_token: format!("access-{}", user.id),
        refresh_token: format!("refresh-{}", user.id),
        token_type: "bearer".into(),
        expires_in: 3600,
        expires_at: None,
        user: user.clone(),
    }
}

impl MemoryBackend {
    pub(crate) fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            inner: Mutex::new(Inner::default()),
            events,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn add_user(&self, email: &str, password: &str) -> Identity {
        let user = identity(email);
        self.inner
            .lock()
            .unwrap()
            .users
            .push((user.clone(), password.to_string()));
        user
    }

    pub(crate) fn sign_in_as(&self, user: &Identity) {
        self.inner.lock().unwrap().session = Some(session_for(user));
    }

    /// Inserts `count` posts, one minute apart, oldest first.
    pub(crate) fn seed_posts(&self, author: &Identity, count: usize) -> Vec<Post> {
        let mut inner = self.inner.lock().unwrap();
        let mut created = Vec::with_capacity(count);
        for i in 0..count {
            let mut post = post_by(author, &format!("Post {}", i + 1));
            post.created_at = epoch() + Duration::minutes(i as i64);
            inner.posts.push(post.clone());
            created.push(post);
        }
        created
    }

    pub(crate) fn fail_next(&self, message: &str) {
        self.inner.lock().unwrap().fail_next = Some(message.to_string());
    }

    /// Number of post gateway calls that reached the backend.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn stored(&self, id: PostId) -> Option<Post> {
        self.inner
            .lock()
            .unwrap()
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    fn enter(&self) -> Result<std::sync::MutexGuard<'_, Inner>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.lock().unwrap();
        match inner.fail_next.take() {
            Some(message) => Err(GatewayError::Backend {
                status: 500,
                message,
            }),
            None => Ok(inner),
        }
    }

    fn owner(inner: &Inner) -> Result<Identity, GatewayError> {
        inner
            .session
            .as_ref()
            .map(|s| s.user.clone())
            .ok_or_else(|| GatewayError::Unauthorized("sign in first".into()))
    }
}

#[async_trait]
impl PostGateway for MemoryBackend {
    async fn list_posts(&self, request: PageRequest) -> Result<Page<Post>, GatewayError> {
        let inner = self.enter()?;
        let mut posts = inner.posts.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = posts.len() as u64;
        let items = posts
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.page_size as usize)
            .collect();
        Ok(Page { items, total })
    }

    async fn get_post(&self, id: PostId) -> Result<Post, GatewayError> {
        let inner = self.enter()?;
        inner
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(GatewayError::NotFound)
    }

    async fn create_post(&self, draft: PostDraft) -> Result<Post, GatewayError> {
        draft.validate()?;
        let mut inner = self.enter()?;
        let author = Self::owner(&inner)?;
        let post = Post {
            id: Uuid::new_v4(),
            title: draft.title,
            content: draft.content,
            created_at: Utc::now(),
            updated_at: None,
            author_id: author.id,
            author_email: Some(author.email),
        };
        inner.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: PostId, draft: PostDraft) -> Result<Post, GatewayError> {
        draft.validate()?;
        let mut inner = self.enter()?;
        let author = Self::owner(&inner)?;
        let post = inner
            .posts
            .iter_mut()
            .find(|p| p.id == id && p.author_id == author.id)
            .ok_or(GatewayError::NotFound)?;
        post.title = draft.title;
        post.content = draft.content;
        post.updated_at = Some(Utc::now());

        // Как и REST-ответ без встроенного профиля
        let mut returned = post.clone();
        returned.author_email = None;
        Ok(returned)
    }

    async fn delete_post(&self, id: PostId) -> Result<(), GatewayError> {
        let mut inner = self.enter()?;
        let author = Self::owner(&inner)?;
        inner.posts.retain(|p| !(p.id == id && p.author_id == author.id));
        Ok(())
    }

    async fn current_identity(&self) -> Result<Option<Identity>, GatewayError> {
        Ok(self.inner.lock().unwrap().session.as_ref().map(|s| s.user.clone()))
    }
}

#[async_trait]
impl AuthBackend for MemoryBackend {
    async fn get_session(&self) -> Result<Option<Session>, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(message) = inner.fail_next.take() {
            return Err(GatewayError::Backend {
                status: 503,
                message,
            });
        }
        let session = inner.session.clone();
        let _ = self.events.send(AuthEvent::InitialSession(
            session.as_ref().map(|s| s.user.clone()),
        ));
        Ok(session)
    }

    async fn sign_in(&self, credentials: Credentials) -> Result<Session, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .iter()
            .find(|(u, p)| u.email == credentials.email && *p == credentials.password)
            .map(|(u, _)| u.clone())
            .ok_or_else(|| GatewayError::InvalidRequest("Invalid login credentials".into()))?;
        let session = session_for(&user);
        inner.session = Some(session.clone());
        let _ = self.events.send(AuthEvent::SignedIn(user));
        Ok(session)
    }

    async fn sign_up(&self, credentials: Credentials) -> Result<SignUpOutcome, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|(u, _)| u.email == credentials.email) {
            return Err(GatewayError::InvalidRequest("User already registered".into()));
        }
        let user = identity(&credentials.email);
        inner.users.push((user.clone(), credentials.password));
        let session = session_for(&user);
        inner.session = Some(session.clone());
        let _ = self.events.send(AuthEvent::SignedIn(user));
        Ok(SignUpOutcome::SignedIn(session))
    }

    async fn sign_out(&self) -> Result<(), GatewayError> {
        self.inner.lock().unwrap().session = None;
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }

    async fn refresh_session(&self) -> Result<Session, GatewayError> {
        let inner = self.inner.lock().unwrap();
        let session = inner
            .session
            .clone()
            .ok_or_else(|| GatewayError::Unauthorized("no session".into()))?;
        let _ = self.events.send(AuthEvent::TokenRefreshed(session.user.clone()));
        Ok(session)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
