use blog_client::views::form::PostForm;
use blog_client::Post;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::post_form::PostFormView;
use crate::route::Route;

#[function_component(CreatePage)]
pub fn create_page() -> Html {
    let navigator = use_navigator();

    let on_saved = Callback::from(move |post: Post| {
        if let Some(navigator) = &navigator {
            navigator.push(&Route::Detail { id: post.id });
        }
    });

    html! {
        <div class="narrow">
            <div class="page-heading">
                <h1>{ "Create a New Blog Post" }</h1>
                <p>{ "Share your thoughts, ideas, and insights with the community." }</p>
            </div>

            <div class="card">
                <PostFormView form={PostForm::create()} {on_saved} />
            </div>
        </div>
    }
}
