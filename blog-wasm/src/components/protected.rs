use blog_client::guard::{guard, GuardOutcome};
use blog_client::AuthStatus;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::view_loading;
use crate::context::SessionContext;
use crate::route::Route;

#[derive(Properties, PartialEq)]
pub struct ProtectedProps {
    #[prop_or_default]
    pub children: Children,
}

/// Renders its children for signed-in users only.
#[function_component(Protected)]
pub fn protected(props: &ProtectedProps) -> Html {
    let status = use_context::<SessionContext>()
        .map(|session| session.status())
        .unwrap_or(AuthStatus::Loading);

    match guard(&status) {
        GuardOutcome::Placeholder => view_loading(),
        GuardOutcome::RedirectToLogin => html! { <Redirect<Route> to={Route::Login} /> },
        GuardOutcome::Render => html! { <>{ for props.children.iter() }</> },
    }
}
