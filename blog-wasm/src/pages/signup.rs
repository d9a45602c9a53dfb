use blog_client::{GatewayError, SignUpOutcome};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::view_error;
use crate::context::{self, SessionContext};
use crate::route::Route;

const MIN_PASSWORD: usize = 6;

pub enum Msg {
    UpdateEmail(String),
    UpdatePassword(String),
    UpdateConfirm(String),
    Register,
    Registered(Result<SignUpOutcome, GatewayError>),
    SessionChanged(SessionContext),
}

pub struct SignupPage {
    email: String,
    password: String,
    confirm: String,
    loading: bool,
    error: Option<String>,
    // Адрес, на который ушло письмо подтверждения
    pending: Option<String>,
    session: Option<SessionContext>,
    _session_handle: Option<ContextHandle<SessionContext>>,
}

impl SignupPage {
    fn validate(&self) -> Result<(), &'static str> {
        if self.email.trim().is_empty() || self.password.is_empty() || self.confirm.is_empty() {
            return Err("All fields are required");
        }
        if self.password.chars().count() < MIN_PASSWORD {
            return Err("Password must be at least 6 characters");
        }
        if self.password != self.confirm {
            return Err("Passwords do not match");
        }
        Ok(())
    }
}

impl Component for SignupPage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let (session, handle) = context::watch(ctx.link(), Msg::SessionChanged).unzip();

        Self {
            email: String::new(),
            password: String::new(),
            confirm: String::new(),
            loading: false,
            error: None,
            pending: None,
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
            Msg::UpdateConfirm(val) => {
                self.confirm = val;
                true
            }

            Msg::Register => {
                if let Err(message) = self.validate() {
                    self.error = Some(message.to_string());
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
                    let result = session.services.provider.sign_up(email, password).await;
                    link.send_message(Msg::Registered(result));
                });

                true
            }

            Msg::Registered(result) => {
                self.loading = false;
                self.password.clear();
                self.confirm.clear();
                match result {
                    Ok(SignUpOutcome::SignedIn(_)) => {
                        if let Some(navigator) = ctx.link().navigator() {
                            navigator.push(&Route::Home);
                        }
                    }
                    Ok(SignUpOutcome::ConfirmationRequired(user)) => {
                        self.pending = Some(user.email);
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
        if let Some(email) = &self.pending {
            return html! {
                <div class="auth-card">
                    <h1>{ "Check your inbox" }</h1>
                    <p>{ format!("We sent a confirmation link to {}. Follow it, then sign in.", email) }</p>
                    <Link<Route> to={Route::Login} classes={classes!("button")}>{ "Go to Login" }</Link<Route>>
                </div>
            };
        }

        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Register
        });

        html! {
            <div class="auth-card">
                <h1>{ "Create an account" }</h1>
                <p class="muted">{ "Join the community and start writing" }</p>

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
                    <div class="field">
                        <label for="confirm">{ "Confirm Password" }</label>
                        <input
                            id="confirm"
                            type="password"
                            value={self.confirm.clone()}
                            oninput={ctx.link().callback(|e: InputEvent| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                Msg::UpdateConfirm(input.value())
                            })}
                        />
                    </div>
                    <button type="submit" class="button wide" disabled={self.loading}>
                        { if self.loading { "Creating account..." } else { "Sign Up" } }
                    </button>
                </form>

                <p class="switch">
                    { "Already have an account? " }
                    <Link<Route> to={Route::Login}>{ "Log in" }</Link<Route>>
                </p>
            </div>
        }
    }
}
