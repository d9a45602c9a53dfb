use chrono::{Datelike, Utc};
use yew::prelude::*;

#[function_component(Footer)]
pub fn footer() -> Html {
    let year = Utc::now().year();

    html! {
        <footer class="footer">
            <div class="container">
                <h2>{ "InsightfulBlogs" }</h2>
                <p class="muted">{ "Share your thoughts with the world." }</p>
                <p class="copyright">
                    { format!("© {} InsightfulBlogs. All rights reserved.", year) }
                </p>
            </div>
        </footer>
    }
}
