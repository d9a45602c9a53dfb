use std::sync::Arc;

use blog_client::views::form::{save_draft, PostForm};
use blog_client::{GatewayError, HttpClient, Post};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::components::view_error;
use crate::context;

pub enum Msg {
    UpdateTitle(String),
    UpdateContent(String),
    Submit,
    Saved(Result<Post, GatewayError>),
}

#[derive(Properties, PartialEq)]
pub struct PostFormProps {
    /// Initial state, an empty form or a post being edited.
    pub form: PostForm,
    pub on_saved: Callback<Post>,
}

pub struct PostFormView {
    form: PostForm,
    client: Option<Arc<HttpClient>>,
}

impl Component for PostFormView {
    type Message = Msg;
    type Properties = PostFormProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            form: ctx.props().form.clone(),
            client: context::client(ctx.link()),
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().form != old_props.form {
            self.form = ctx.props().form.clone();
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::UpdateTitle(val) => {
                self.form.set_title(val);
                true
            }
            Msg::UpdateContent(val) => {
                self.form.set_content(val);
                true
            }

            Msg::Submit => {
                let Some(client) = self.client.clone() else {
                    log::error!("Post form rendered outside the session context");
                    return false;
                };
                // Пустые поля подсвечиваются без запроса
                let Some(draft) = self.form.begin_submit() else {
                    return true;
                };

                let mode = self.form.mode();
                let link = ctx.link().clone();

                spawn_local(async move {
                    let result = save_draft(client.as_ref(), mode, draft).await;
                    link.send_message(Msg::Saved(result));
                });

                true
            }

            Msg::Saved(result) => {
                if let Some(post) = self.form.finish_submit(result) {
                    ctx.props().on_saved.emit(post);
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let draft = self.form.draft();
        let errors = self.form.field_errors();
        let submitting = self.form.is_submitting();

        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });

        html! {
            <form class="post-form" {onsubmit}>
                if let Some(error) = self.form.submit_error() {
                    { view_error(error) }
                }

                <div class="field">
                    <label for="title">{ "Blog Title" }</label>
                    <input
                        id="title"
                        type="text"
                        class={classes!(errors.title.is_some().then_some("invalid"))}
                        placeholder="Enter your blog title"
                        value={draft.title.clone()}
                        oninput={ctx.link().callback(|e: InputEvent| {
                            let input: HtmlInputElement = e.target_unchecked_into();
                            Msg::UpdateTitle(input.value())
                        })}
                    />
                    if let Some(message) = errors.title {
                        <p class="field-error">{ message }</p>
                    }
                </div>

                <div class="field">
                    <label for="content">{ "Blog Content" }</label>
                    <textarea
                        id="content"
                        rows="12"
                        class={classes!(errors.content.is_some().then_some("invalid"))}
                        placeholder="Write your blog content here..."
                        value={draft.content.clone()}
                        oninput={ctx.link().callback(|e: InputEvent| {
                            let input: HtmlTextAreaElement = e.target_unchecked_into();
                            Msg::UpdateContent(input.value())
                        })}
                    />
                    if let Some(message) = errors.content {
                        <p class="field-error">{ message }</p>
                    }
                </div>

                <button type="submit" class="button wide" disabled={submitting}>
                    { self.form.submit_label() }
                </button>
            </form>
        }
    }
}
