use crate::models::{Identity, Post};
use crate::session::AuthStatus;

/// What a protected view should do for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session not resolved yet.
    Placeholder,
    RedirectToLogin,
    Render,
}

pub fn guard(status: &AuthStatus) -> GuardOutcome {
    match status {
        AuthStatus::Loading => GuardOutcome::Placeholder,
        AuthStatus::Anonymous => GuardOutcome::RedirectToLogin,
        AuthStatus::Authenticated(_) => GuardOutcome::Render,
    }
}

/// Access to the edit view of one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAccess {
    Allowed,
    /// Someone else's post: send the viewer back to its detail page.
    RedirectToDetail,
}

pub fn edit_access(viewer: Option<&Identity>, post: &Post) -> EditAccess {
    if post.is_authored_by(viewer) {
        EditAccess::Allowed
    } else {
        EditAccess::RedirectToDetail
    }
}
