use blog_client::pagination::{has_next, has_previous, page_window, PageItem};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
    pub current: u32,
    pub total_pages: u32,
    pub on_change: Callback<u32>,
}

#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    let current = props.current;

    let go_to = |page: u32| {
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| on_change.emit(page))
    };

    let items = page_window(current, props.total_pages)
        .into_iter()
        .map(|item| match item {
            PageItem::Ellipsis => html! {
                <span class="page-ellipsis">{ item.to_string() }</span>
            },
            PageItem::Page(page) => {
                let active = page == current;
                html! {
                    <button
                        class={classes!("page", active.then_some("active"))}
                        aria-current={active.then_some("page")}
                        onclick={go_to(page)}
                    >
                        { page.to_string() }
                    </button>
                }
            }
        })
        .collect::<Html>();

    html! {
        <nav class="pagination" aria-label="Pagination">
            <button
                class="page-step"
                disabled={!has_previous(current)}
                onclick={go_to(current.saturating_sub(1))}
            >
                { "‹" }
            </button>
            { items }
            <button
                class="page-step"
                disabled={!has_next(current, props.total_pages)}
                onclick={go_to(current + 1)}
            >
                { "›" }
            </button>
        </nav>
    }
}
