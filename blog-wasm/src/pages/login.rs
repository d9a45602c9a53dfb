use blog_client::{GatewayError, Identity};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::view_error;
use crate::context::{self, SessionContext};
use crate::route::Route;

pub enum Msg {
    UpdateEmail(String),
    UpdatePassword(String),
    Login,
    LoggedIn(Result<Identity, GatewayError>),
    SessionChanged(SessionContext),
}

pub struct LoginPage {
    email: String,
    password: String,
    loading: bool,
    error: Option<String>,
    session: Option<SessionContext>,
    _session_handle: Option<ContextHandle<SessionContext>>,
}

impl Component for LoginPage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let (session, handle) = context::watch(ctx.link(), Msg::SessionChanged).unzip();

        Self {
            email: String::new(),
            password: String::new(),
            loading: false,
            error: None,
            session,
            _session_handle: handle,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::UpdateEmail(val) => {
                self.email = val;
                true
            }
            Msg::UpdatePassword(val) => {
                self.password = val;
                true
            }

            Msg::Login => {
                if self.email.trim().is_empty() || self.password.is_empty() {
                    self.error = Some("Email and password are required".to_string());
                    return true;
                }
                let Some(session) = self.session.clone() else {
                    return false;
                };

                self.loading = true;
                self.error = None;

                let email = self.email.trim().to_string();
                let password = self.password.clone();
                let link = ctx.link().clone();

                spawn_local(async move {
                    let result = session.services.provider.sign_in(email, password).await;
                    link.send_message(Msg::LoggedIn(result));
                });

                true
            }

            Msg::LoggedIn(result) => {
                self.loading = false;
                match result {
                    Ok(identity) => {
                        log::info!("Signed in as {}", identity.email);
                        self.password.clear();
                        if let Some(navigator) = ctx.link().navigator() {
                            navigator.push(&Route::Home);
                        }
                    }
                    Err(e) => self.error = Some(e.user_message()),
                }
                true
            }

            Msg::SessionChanged(session) => {
                self.session = Some(session);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Login
        });

        html! {
            <div class="auth-card">
                <h1>{ "Welcome back" }</h1>
                <p class="muted">{ "Sign in to your account" }</p>

                if let Some(error) = &self.error {
                    { view_error(error) }
                }

                <form {onsubmit}>
                    <div class="field">
                        <label for="email">{ "Email" }</label>
                        <input
                            id="email"
                            type="email"
                            placeholder="you@example.com"
                            value={self.email.clone()}
                            oninput={ctx.link().callback(|e: InputEvent| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                Msg::UpdateEmail(input.value())
                            })}
                        />
                    </div>
                    <div class="field">
                        <label for="password">{ "Password" }</label>
                        <input
                            id="password"
                            type="password"
                            value={self.password.clone()}
                            oninput={ctx.link().callback(|e: InputEvent| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                Msg::UpdatePassword(input.value())
                            })}
                        />
                    </div>
                    <button type="submit" class="button wide" disabled={self.loading}>
                        { if self.loading { "Signing in..." } else { "Sign In" } }
                    </button>
                </form>

                <p class="switch">
                    { "Don't have an account? " }
                    <Link<Route> to={Route::Signup}>{ "Sign up" }</Link<Route>>
                </p>
            </div>
        }
    }
}
