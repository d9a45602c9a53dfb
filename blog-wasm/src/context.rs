use std::rc::Rc;
use std::sync::Arc;

use blog_client::{
    AuthStatus, BackendConfig, HttpClient, Identity, SessionProvider, SessionState,
};
use yew::html::Scope;
use yew::prelude::*;

/// Gateway and session provider shared by every page.
#[derive(Clone)]
pub struct Services {
    pub client: Arc<HttpClient>,
    pub provider: Rc<SessionProvider<HttpClient>>,
}

impl Services {
    pub fn new(config: BackendConfig) -> Self {
        let client = Arc::new(HttpClient::new(config));
        let provider = Rc::new(SessionProvider::new(client.clone()));
        Self { client, provider }
    }
}

/// Session state as handed down from the root component.
#[derive(Clone)]
pub struct SessionContext {
    pub state: SessionState,
    pub services: Services,
}

impl PartialEq for SessionContext {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && Arc::ptr_eq(&self.services.client, &other.services.client)
    }
}

impl SessionContext {
    pub fn identity(&self) -> Option<&Identity> {
        self.state.identity()
    }

    pub fn status(&self) -> AuthStatus {
        self.state.status()
    }

    pub fn client(&self) -> Arc<HttpClient> {
        self.services.client.clone()
    }
}

/// Reads the context for a struct component and keeps it informed of
/// session changes while the returned handle lives.
pub fn watch<C, F>(link: &Scope<C>, on_change: F) -> Option<(SessionContext, ContextHandle<SessionContext>)>
where
    C: Component,
    F: Fn(SessionContext) -> C::Message + 'static,
{
    link.context::<SessionContext>(link.callback(on_change))
}

/// The gateway alone, for components that do not care who is signed in.
pub fn client<C: Component>(link: &Scope<C>) -> Option<Arc<HttpClient>> {
    link.context::<SessionContext>(Callback::from(|_| ()))
        .map(|(context, _)| context.client())
}
