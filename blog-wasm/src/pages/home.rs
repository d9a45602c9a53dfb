use std::sync::Arc;

use blog_client::views::list::ListView;
use blog_client::views::RequestToken;
use blog_client::{GatewayError, HttpClient, Page, PageRequest, Post, PostGateway};
use chrono::Utc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{ScrollBehavior, ScrollToOptions};
use yew::prelude::*;

use crate::components::pagination::Pagination;
use crate::components::post_card::PostCard;
use crate::components::{view_error, view_loading};
use crate::context;

pub enum Msg {
    Loaded(RequestToken, Result<Page<Post>, GatewayError>),
    ChangePage(u32),
}

pub struct HomePage {
    view: ListView,
    client: Option<Arc<HttpClient>>,
}

impl Component for HomePage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut page = Self {
            view: ListView::default(),
            client: context::client(ctx.link()),
        };
        let (token, request) = page.view.begin_load();
        page.fetch(ctx, token, request);
        page
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Loaded(token, result) => self.view.finish_load(token, result),

            Msg::ChangePage(page) => match self.view.change_page(page) {
                Some((token, request)) => {
                    scroll_to_top();
                    self.fetch(ctx, token, request);
                    true
                }
                None => false,
            },
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let now = Utc::now();

        html! {
            <div class="home">
                <div class="intro">
                    <h1>{ "Welcome to InsightfulBlogs" }</h1>
                    <p>
                        { "Discover thoughtful articles on various topics from writers around the world. \
                           Create an account to share your own insights with our community." }
                    </p>
                </div>

                if self.view.is_loading() {
                    { view_loading() }
                }

                if let Some(error) = self.view.error() {
                    { view_error(error) }
                }

                if self.view.is_empty() {
                    <div class="empty">
                        <h3>{ "No blogs yet" }</h3>
                        <p>{ "Be the first to create a blog post!" }</p>
                    </div>
                }

                <div class="post-grid">
                    { for self.view.posts().iter().map(|post| html! {
                        <PostCard key={post.id.to_string()} post={post.clone()} {now} />
                    }) }
                </div>

                if self.view.show_pagination() {
                    <Pagination
                        current={self.view.page()}
                        total_pages={self.view.page_count()}
                        on_change={ctx.link().callback(Msg::ChangePage)}
                    />
                }
            </div>
        }
    }
}

impl HomePage {
    fn fetch(&self, ctx: &Context<Self>, token: RequestToken, request: PageRequest) {
        let Some(client) = self.client.clone() else {
            return;
        };
        let link = ctx.link().clone();

        spawn_local(async move {
            let result = client.list_posts(request).await;
            link.send_message(Msg::Loaded(token, result));
        });
    }
}

fn scroll_to_top() {
    let options = ScrollToOptions::new();
    options.set_top(0.0);
    options.set_behavior(ScrollBehavior::Smooth);
    gloo_utils::window().scroll_to_with_scroll_to_options(&options);
}
