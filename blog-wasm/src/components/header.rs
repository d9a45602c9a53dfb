use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::context::SessionContext;
use crate::route::Route;

#[function_component(Header)]
pub fn header() -> Html {
    let session = use_context::<SessionContext>();
    let navigator = use_navigator();
    let signed_in = session
        .as_ref()
        .is_some_and(|session| session.identity().is_some());

    let on_logout = {
        let session = session.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(session) = session.clone() else {
                return;
            };
            let navigator = navigator.clone();

            spawn_local(async move {
                match session.services.provider.sign_out().await {
                    Ok(()) => {
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Home);
                        }
                    }
                    Err(e) => log::error!("Error signing out: {}", e),
                }
            });
        })
    };

    html! {
        <header class="header">
            <div class="container header-inner">
                <Link<Route> to={Route::Home} classes={classes!("brand")}>
                    { "InsightfulBlogs" }
                </Link<Route>>

                <nav>
                    <ul class="nav">
                        <li>
                            <Link<Route> to={Route::Home}>{ "Home" }</Link<Route>>
                        </li>
                        if signed_in {
                            <>
                                <li>
                                    <Link<Route> to={Route::Create} classes={classes!("button")}>
                                        { "New Post" }
                                    </Link<Route>>
                                </li>
                                <li>
                                    <button class="link-button" onclick={on_logout}>
                                        { "Logout" }
                                    </button>
                                </li>
                            </>
                        } else {
                            <>
                                <li>
                                    <Link<Route> to={Route::Login}>{ "Login" }</Link<Route>>
                                </li>
                                <li>
                                    <Link<Route> to={Route::Signup} classes={classes!("button")}>
                                        { "Sign Up" }
                                    </Link<Route>>
                                </li>
                            </>
                        }
                    </ul>
                </nav>
            </div>
        </header>
    }
}
