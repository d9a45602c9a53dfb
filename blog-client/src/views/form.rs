use crate::error::GatewayError;
use crate::gateway::PostGateway;
use crate::models::{FieldErrors, Post, PostDraft, PostId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(PostId),
}

/// Shared create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct PostForm {
    mode: FormMode,
    draft: PostDraft,
    errors: FieldErrors,
    submit_error: Option<String>,
    submitting: bool,
}

impl PostForm {
    pub fn new(mode: FormMode, initial: PostDraft) -> Self {
        Self {
            mode,
            draft: initial,
            errors: FieldErrors::default(),
            submit_error: None,
            submitting: false,
        }
    }

    pub fn create() -> Self {
        Self::new(FormMode::Create, PostDraft::default())
    }

    pub fn edit(post: &Post) -> Self {
        Self::new(
            FormMode::Edit(post.id),
            PostDraft::new(post.title.clone(), post.content.clone()),
        )
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &PostDraft {
        &self.draft
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_title(&mut self, title: String) {
        self.draft.title = title;
        if self.errors.title.is_some() {
            self.errors.title = self.draft.field_errors().title;
        }
    }

    pub fn set_content(&mut self, content: String) {
        self.draft.content = content;
        if self.errors.content.is_some() {
            self.errors.content = self.draft.field_errors().content;
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.mode, self.submitting) {
            (FormMode::Create, false) => "Create Blog",
            (FormMode::Create, true) => "Creating...",
            (FormMode::Edit(_), false) => "Update Blog",
            (FormMode::Edit(_), true) => "Updating...",
        }
    }

    /// Validates and, if the draft is complete, enters the busy state and
    /// returns what to send. Nothing is returned while a submit is running.
    pub fn begin_submit(&mut self) -> Option<PostDraft> {
        if self.submitting {
            return None;
        }

        self.errors = self.draft.field_errors();
        if !self.errors.is_empty() {
            return None;
        }

        self.submit_error = None;
        self.submitting = true;
        Some(self.draft.clone())
    }

    /// On success returns the saved post, whose detail view comes next.
    /// On failure the message is kept inline and the fields stay filled in.
    pub fn finish_submit(&mut self, result: Result<Post, GatewayError>) -> Option<Post> {
        self.submitting = false;
        match result {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::warn!("Error saving blog: {}", e);
                self.submit_error = Some(e.user_message());
                None
            }
        }
    }

    pub async fn submit<G: PostGateway + ?Sized>(&mut self, gateway: &G) -> Option<Post> {
        let draft = self.begin_submit()?;
        let result = save_draft(gateway, self.mode, draft).await;
        self.finish_submit(result)
    }
}

/// Sends a draft as an insert or an update depending on the form mode.
pub async fn save_draft<G: PostGateway + ?Sized>(
    gateway: &G,
    mode: FormMode,
    draft: PostDraft,
) -> Result<Post, GatewayError> {
    match mode {
        FormMode::Create => gateway.create_post(draft).await,
        FormMode::Edit(id) => gateway.update_post(id, draft).await,
    }
}
