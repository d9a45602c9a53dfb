use yew::prelude::*;
use yew_router::prelude::*;

use crate::route::Route;

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
    html! {
        <div class="not-found">
            <h1>{ "Page Not Found" }</h1>
            <p>{ "The page you are looking for doesn't exist or has been moved." }</p>
            <Link<Route> to={Route::Home} classes={classes!("button")}>
                { "Return to Homepage" }
            </Link<Route>>
        </div>
    }
}
