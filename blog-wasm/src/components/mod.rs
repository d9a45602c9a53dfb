pub mod footer;
pub mod header;
pub mod pagination;
pub mod post_card;
pub mod post_form;
pub mod protected;

use yew::prelude::*;

pub fn view_loading() -> Html {
    html! {
        <div class="loading">
            <div class="spinner"></div>
        </div>
    }
}

pub fn view_error(message: &str) -> Html {
    html! {
        <div class="error">
            <p>{ message.to_string() }</p>
        </div>
    }
}
