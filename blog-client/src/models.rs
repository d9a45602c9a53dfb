use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GatewayError;

pub type PostId = Uuid;

/// Размер страницы на главной по умолчанию
pub const DEFAULT_PAGE_SIZE: u32 = 6;

// ==================== Модели пользователей ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    #[serde(default)]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: i64,
    /// Unix seconds. Older auth servers omit it, then `expires_in` is all we have.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: Identity,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) => now.timestamp() >= at,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Result of a sign-up. Projects with email confirmation enabled return the
/// new user without a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    SignedIn(Session),
    ConfirmationRequired(Identity),
}

/// Notifications emitted by the auth backend.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    InitialSession(Option<Identity>),
    SignedIn(Identity),
    SignedOut,
    TokenRefreshed(Identity),
}

// ==================== Модели постов ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author_id: Uuid,
    pub author_email: Option<String>,
}

impl Post {
    pub fn is_authored_by(&self, identity: Option<&Identity>) -> bool {
        identity.is_some_and(|user| user.id == self.author_id)
    }
}

/// Row shape of the `blogs` table with the embedded `profiles` relation.
#[derive(Debug, Deserialize)]
pub(crate) struct PostRow {
    id: PostId,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    author_id: Uuid,
    #[serde(default)]
    profiles: Option<ProfileEmbed>,
}

#[derive(Debug, Deserialize)]
struct ProfileEmbed {
    #[serde(default)]
    email: Option<String>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author_id: row.author_id,
            author_email: row.profiles.and_then(|p| p.email),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InsertPostRow<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub author_id: Uuid,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdatePostRow<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Title and body as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    pub title: Option<&'static str>,
    pub content: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

impl PostDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn field_errors(&self) -> FieldErrors {
        FieldErrors {
            title: self.title.trim().is_empty().then_some("Title is required"),
            content: self.content.trim().is_empty().then_some("Content is required"),
        }
    }

    pub fn validate(&self) -> Result<(), GatewayError> {
        let errors = self.field_errors();
        if let Some(message) = errors.title.or(errors.content) {
            return Err(GatewayError::InvalidRequest(message.to_string()));
        }
        Ok(())
    }
}

// ==================== Пагинация ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Page numbers are 1-based; zero values are clamped to 1.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Inclusive row range `(from, to)`.
    pub fn range(&self) -> (u64, u64) {
        let from = self.offset();
        (from, from + u64::from(self.page_size) - 1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

pub fn page_count(total: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    u32::try_from(total.div_ceil(size)).unwrap_or(u32::MAX)
}
