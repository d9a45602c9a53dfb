use blog_client::{BackendConfig, GatewayError, SessionState};
use wasm_bindgen_futures::spawn_local;
use yew::html::Scope;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::footer::Footer;
use crate::components::header::Header;
use crate::context::{Services, SessionContext};
use crate::route::{switch, Route};
use crate::storage;

pub enum Msg {
    SessionChanged(SessionState),
}

pub struct App {
    services: Result<Services, GatewayError>,
    session: SessionState,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        // Адрес и ключ задаются при сборке
        let services = BackendConfig::new(
            option_env!("SUPABASE_URL").unwrap_or_default(),
            option_env!("SUPABASE_ANON_KEY").unwrap_or_default(),
        )
        .map(Services::new);

        match &services {
            Ok(services) => Self::watch_session(services.clone(), ctx.link().clone()),
            Err(e) => log::error!("{}", e),
        }

        Self {
            services,
            session: SessionState::loading(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SessionChanged(state) => {
                if self.session == state {
                    return false;
                }
                self.session = state;
                true
            }
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        let services = match &self.services {
            Ok(services) => services.clone(),
            Err(e) => {
                return html! {
                    <div class="container">
                        <div class="error">{ format!("Error: {}", e) }</div>
                    </div>
                }
            }
        };

        let context = SessionContext {
            state: self.session.clone(),
            services,
        };

        html! {
            <ContextProvider<SessionContext> {context}>
                <BrowserRouter>
                    <div class="layout">
                        <Header />
                        <main class="container">
                            <Switch<Route> render={switch} />
                        </main>
                        <Footer />
                    </div>
                </BrowserRouter>
            </ContextProvider<SessionContext>>
        }
    }
}

impl App {
    /// Restores the stored session, resolves the loading state and then
    /// follows auth notifications for the lifetime of the page.
    fn watch_session(services: Services, link: Scope<Self>) {
        spawn_local(async move {
            if let Some(session) = storage::load_session() {
                services.client.restore_session(session).await;
            }

            let mut events = services.provider.subscribe();
            let state = services.provider.init().await;
            storage::save_session(services.client.session().await.as_ref());
            link.send_message(Msg::SessionChanged(state));

            while let Some(state) = services.provider.next_state(&mut events).await {
                storage::save_session(services.client.session().await.as_ref());
                link.send_message(Msg::SessionChanged(state));
            }
        });
    }
}
