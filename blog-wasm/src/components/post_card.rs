use blog_client::present::{author_label, excerpt, time_ago};
use blog_client::Post;
use chrono::{DateTime, Utc};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::route::Route;

#[derive(Properties, PartialEq)]
pub struct PostCardProps {
    pub post: Post,
    pub now: DateTime<Utc>,
}

#[function_component(PostCard)]
pub fn post_card(props: &PostCardProps) -> Html {
    let post = &props.post;
    let route = Route::Detail { id: post.id };

    html! {
        <div class="post-card">
            <Link<Route> to={route.clone()}>
                <h2>{ post.title.clone() }</h2>
            </Link<Route>>

            <p class="excerpt">{ excerpt(&post.content) }</p>

            <div class="post-meta">
                <span>{ author_label(post) }</span>
                <span class="muted">{ time_ago(post.created_at, props.now) }</span>
            </div>

            <Link<Route> to={route} classes={classes!("read-more")}>
                { "Read more" }
            </Link<Route>>
        </div>
    }
}
