use blog_client::PostId;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::protected::Protected;
use crate::pages::create::CreatePage;
use crate::pages::detail::DetailPage;
use crate::pages::edit::EditPage;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::not_found::NotFoundPage;
use crate::pages::signup::SignupPage;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/signup")]
    Signup,
    #[at("/blogs/create")]
    Create,
    #[at("/blogs/:id")]
    Detail { id: PostId },
    #[at("/blogs/:id/edit")]
    Edit { id: PostId },
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <HomePage /> },
        Route::Login => html! { <LoginPage /> },
        Route::Signup => html! { <SignupPage /> },
        Route::Create => html! {
            <Protected>
                <CreatePage />
            </Protected>
        },
        Route::Detail { id } => html! { <DetailPage {id} /> },
        Route::Edit { id } => html! {
            <Protected>
                <EditPage {id} />
            </Protected>
        },
        Route::NotFound => html! { <NotFoundPage /> },
    }
}
