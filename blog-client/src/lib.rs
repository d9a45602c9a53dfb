//! Client side of the Insightful Blogs application.
//!
//! Everything here is shared by the browser app (`blog-wasm`) and the
//! terminal client (`blog-cli`): the typed gateway to the hosted backend,
//! the session provider, the route guard and the state of each view.

pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod http_client;
pub mod models;
pub mod pagination;
pub mod present;
pub mod session;
pub mod views;

#[cfg(test)]
mod testing;

pub use config::BackendConfig;
pub use error::GatewayError;
pub use gateway::{AuthBackend, PostGateway};
pub use http_client::HttpClient;
pub use models::{
    AuthEvent, Credentials, Identity, Page, PageRequest, Post, PostDraft, PostId, Session,
    SignUpOutcome,
};
pub use session::{AuthStatus, SessionProvider, SessionState};
