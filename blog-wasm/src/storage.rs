use blog_client::Session;
use gloo_storage::{LocalStorage, Storage};

const SESSION_KEY: &str = "blog_session";

pub fn load_session() -> Option<Session> {
    LocalStorage::get(SESSION_KEY).ok()
}

/// Mirrors the client's session slot into local storage.
pub fn save_session(session: Option<&Session>) {
    match session {
        Some(session) => {
            if let Err(e) = LocalStorage::set(SESSION_KEY, session) {
                log::warn!("Failed to save session: {:?}", e);
            }
        }
        None => LocalStorage::delete(SESSION_KEY),
    }
}
