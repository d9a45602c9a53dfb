use blog_client::guard::{edit_access, EditAccess};
use blog_client::views::detail::DetailView;
use blog_client::views::form::PostForm;
use blog_client::views::RequestToken;
use blog_client::{GatewayError, Post, PostGateway, PostId};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::post_form::PostFormView;
use crate::components::{view_error, view_loading};
use crate::context::{self, SessionContext};
use crate::route::Route;

pub enum Msg {
    Loaded(RequestToken, Result<Post, GatewayError>),
    SessionChanged(SessionContext),
    Saved(Post),
}

#[derive(Properties, PartialEq)]
pub struct EditProps {
    pub id: PostId,
}

/// Edit page. Rendered behind the route guard, so a viewer is signed in.
pub struct EditPage {
    view: DetailView,
    session: Option<SessionContext>,
    _session_handle: Option<ContextHandle<SessionContext>>,
}

impl Component for EditPage {
    type Message = Msg;
    type Properties = EditProps;

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
            Msg::Loaded(token, result) => {
                if !self.view.finish_load(token, result) {
                    return false;
                }
                self.check_author(ctx);
                true
            }

            Msg::SessionChanged(session) => {
                self.session = Some(session);
                self.check_author(ctx);
                true
            }

            // Страница поста загрузит сохранённую версию сама
            Msg::Saved(post) => {
                if let Some(navigator) = ctx.link().navigator() {
                    navigator.push(&Route::Detail { id: post.id });
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if self.view.is_loading() {
            return view_loading();
        }

        let Some(post) = self.view.post() else {
            return view_error(self.view.error().unwrap_or_default());
        };

        html! {
            <div class="narrow">
                <div class="page-heading">
                    <h1>{ "Edit Blog Post" }</h1>
                    <p>{ "Update your blog post content." }</p>
                </div>

                <div class="card">
                    <PostFormView
                        form={PostForm::edit(post)}
                        on_saved={ctx.link().callback(Msg::Saved)}
                    />
                </div>
            </div>
        }
    }
}

impl EditPage {
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

    /// Someone else's post sends the viewer back to its detail page.
    fn check_author(&self, ctx: &Context<Self>) {
        let Some(post) = self.view.post() else {
            return;
        };
        let viewer = self.session.as_ref().and_then(|s| s.identity());

        if edit_access(viewer, post) == EditAccess::RedirectToDetail {
            if let Some(navigator) = ctx.link().navigator() {
                navigator.push(&Route::Detail { id: post.id });
            }
        }
    }
}
