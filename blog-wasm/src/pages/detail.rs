use blog_client::present::{author_label, long_date, paragraphs};
use blog_client::views::detail::{DeleteOutcome, DeleteStage, DetailView};
use blog_client::views::RequestToken;
use blog_client::{GatewayError, Post, PostGateway, PostId};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::{view_error, view_loading};
use crate::context::{self, SessionContext};
use crate::route::Route;

pub enum Msg {
    Loaded(RequestToken, Result<Post, GatewayError>),
    SessionChanged(SessionContext),
    RequestDelete,
    CancelDelete,
    ConfirmDelete,
    Deleted(Result<(), GatewayError>),
}

#[derive(Properties, PartialEq)]
pub struct DetailProps {
    pub id: PostId,
}

pub struct DetailPage {
    view: DetailView,
    session: Option<SessionContext>,
    _session_handle: Option<ContextHandle<SessionContext>>,
}

impl Component for DetailPage {
    type Message = Msg;
    type Properties = DetailProps;

    fn create(ctx: &Context<Self>) -> Self {
        let (session, handle) = context::watch(ctx.link(), Msg::SessionChanged).unzip();
        let mut page = Self {
            view: DetailView::new(ctx.props().id),
            session,
            _session_handle: handle,
        };
        page.load(ctx);
        page
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        if ctx.props().id != self.view.id() {
            self.view = DetailView::new(ctx.props().id);
            self.load(ctx);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Loaded(token, result) => self.view.finish_load(token, result),

            Msg::SessionChanged(session) => {
                self.session = Some(session);
                true
            }

            Msg::RequestDelete => {
                let viewer = self.session.as_ref().and_then(|s| s.identity());
                self.view.request_delete(viewer)
            }

            Msg::CancelDelete => {
                self.view.cancel_delete();
                true
            }

            Msg::ConfirmDelete => {
                let Some(client) = self.session.as_ref().map(|s| s.client()) else {
                    return false;
                };
                let Some(id) = self.view.confirm_delete() else {
                    return false;
                };
                let link = ctx.link().clone();

                spawn_local(async move {
                    let result = client.delete_post(id).await;
                    link.send_message(Msg::Deleted(result));
                });

                true
            }

            Msg::Deleted(result) => {
                if self.view.finish_delete(result) == DeleteOutcome::Deleted {
                    if let Some(navigator) = ctx.link().navigator() {
                        navigator.push(&Route::Home);
                    }
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if self.view.is_loading() {
            return view_loading();
        }

        let Some(post) = self.view.post() else {
            return html! {
                <div class="error">
                    <p>{ self.view.error().unwrap_or_default() }</p>
                    <Link<Route> to={Route::Home}>{ "← Return to homepage" }</Link<Route>>
                </div>
            };
        };

        let viewer = self.session.as_ref().and_then(|s| s.identity());

        html! {
            <div class="narrow">
                if let Some(error) = self.view.error() {
                    { view_error(error) }
                }

                <article class="post">
                    <h1>{ post.title.clone() }</h1>

                    <div class="post-meta">
                        <span>{ author_label(post) }</span>
                        <span class="dot">{ "•" }</span>
                        <time datetime={post.created_at.to_rfc3339()}>
                            { long_date(post.created_at) }
                        </time>
                        if let Some(updated) = post.updated_at {
                            <span class="dot">{ "•" }</span>
                            <span>{ format!("Updated {}", long_date(updated)) }</span>
                        }
                    </div>

                    <div class="post-body">
                        { for paragraphs(&post.content).map(|paragraph| html! {
                            <p>{ paragraph.to_string() }</p>
                        }) }
                    </div>

                    if self.view.is_author(viewer) {
                        <div class="post-actions">
                            <Link<Route> to={Route::Edit { id: post.id }} classes={classes!("button")}>
                                { "Edit" }
                            </Link<Route>>
                            <button class="button danger" onclick={ctx.link().callback(|_| Msg::RequestDelete)}>
                                { "Delete" }
                            </button>
                        </div>
                    }
                </article>

                <div class="back">
                    <Link<Route> to={Route::Home}>{ "← Back to all blogs" }</Link<Route>>
                </div>

                { self.view_confirm(ctx) }
            </div>
        }
    }
}

impl DetailPage {
    fn load(&mut self, ctx: &Context<Self>) {
        let token = self.view.begin_load();
        let Some(client) = self.session.as_ref().map(|s| s.client()) else {
            return;
        };
        let id = self.view.id();
        let link = ctx.link().clone();

        spawn_local(async move {
            let result = client.get_post(id).await;
            link.send_message(Msg::Loaded(token, result));
        });
    }

    fn view_confirm(&self, ctx: &Context<Self>) -> Html {
        let deleting = match self.view.delete_stage() {
            DeleteStage::Idle => return html! {},
            DeleteStage::Confirming => false,
            DeleteStage::Deleting => true,
        };

        html! {
            <div class="modal-backdrop">
                <div class="modal">
                    <h3>{ "Delete Blog Post" }</h3>
                    <p>{ "Are you sure you want to delete this blog post? This action cannot be undone." }</p>
                    <div class="modal-actions">
                        <button
                            class="button secondary"
                            disabled={deleting}
                            onclick={ctx.link().callback(|_| Msg::CancelDelete)}
                        >
                            { "Cancel" }
                        </button>
                        <button
                            class="button danger"
                            disabled={deleting}
                            onclick={ctx.link().callback(|_| Msg::ConfirmDelete)}
                        >
                            { if deleting { "Deleting..." } else { "Delete" } }
                        </button>
                    </div>
                </div>
            </div>
        }
    }
}
