mod logging;
mod session_file;

use anyhow::{bail, Context, Result};
use blog_client::guard::{edit_access, guard, EditAccess, GuardOutcome};
use blog_client::models::DEFAULT_PAGE_SIZE;
use blog_client::pagination::PageItem;
use blog_client::present::{author_label, excerpt, long_date, paragraphs, time_ago};
use blog_client::views::detail::{DeleteOutcome, DetailView};
use blog_client::views::form::PostForm;
use blog_client::views::list::ListView;
use blog_client::{
    AuthStatus, BackendConfig, HttpClient, PostGateway, SessionProvider, SessionState,
    SignUpOutcome,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use session_file::SessionFile;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project URL of the hosted backend
    #[arg(long, env = "SUPABASE_URL")]
    url: Option<String>,

    /// Public (anon) API key
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    anon_key: Option<String>,

    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Log requests and session changes to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Signup {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    Logout,

    Status,

    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(short = 's', long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },

    Get {
        #[arg(short, long)]
        id: Uuid,
    },

    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        content: String,
    },

    Update {
        #[arg(short, long)]
        id: Uuid,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,
    },

    Delete {
        #[arg(short, long)]
        id: Uuid,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

struct App {
    client: Arc<HttpClient>,
    provider: SessionProvider<HttpClient>,
    state: SessionState,
    store: SessionFile,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "❌".red(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = BackendConfig::new(
        cli.url.as_deref().unwrap_or_default(),
        cli.anon_key.unwrap_or_default(),
    )
    .context("Backend is not configured")?;

    tracing::debug!("Using backend {}", config.url);

    let client = Arc::new(HttpClient::new(config));
    let store = SessionFile::new(cli.session_file)?;
    if let Some(session) = store.load()? {
        client.restore_session(session).await;
    }

    let provider = SessionProvider::new(client.clone());
    let state = provider.init().await;

    let mut app = App {
        client,
        provider,
        state,
        store,
    };

    let result = app.dispatch(cli.command).await;

    // Сессия могла обновиться или завершиться
    app.store.sync(app.client.session().await.as_ref())?;

    result
}

impl App {
    async fn dispatch(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Signup { email, password } => self.signup(email, password).await,
            Commands::Login { email, password } => self.login(email, password).await,
            Commands::Logout => self.logout().await,
            Commands::Status => self.status().await,
            Commands::List { page, page_size } => self.list(page, page_size).await,
            Commands::Get { id } => self.get(id).await,
            Commands::Create { title, content } => self.create(title, content).await,
            Commands::Update { id, title, content } => self.update(id, title, content).await,
            Commands::Delete { id, yes } => self.delete(id, yes).await,
        }
    }

    async fn signup(&mut self, email: String, password: String) -> Result<()> {
        println!("📝 Signing up: {}", email);

        match self.provider.sign_up(email, password).await? {
            SignUpOutcome::SignedIn(session) => {
                println!("{}", "✅ Sign up successful!".green());
                println!("   User ID: {}", session.user.id);
                println!("   Email: {}", session.user.email);
            }
            SignUpOutcome::ConfirmationRequired(user) => {
                println!("{}", "✅ Account created.".green());
                println!("   Confirm {} via the link in your inbox, then log in.", user.email);
            }
        }
        Ok(())
    }

    async fn login(&mut self, email: String, password: String) -> Result<()> {
        println!("🔑 Logging in as: {}", email);

        let user = self
            .provider
            .sign_in(email, password)
            .await
            .context("Login failed")?;

        println!("{}", "✅ Login successful!".green());
        println!("   User ID: {}", user.id);
        println!("   Email: {}", user.email);
        println!("   Session saved to {:?}", self.store.path());
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        self.provider.sign_out().await.context("Logout failed")?;
        println!("{}", "✅ Logged out".green());
        Ok(())
    }

    async fn status(&mut self) -> Result<()> {
        match self.state.status() {
            AuthStatus::Authenticated(_) => match self.client.current_identity().await? {
                Some(user) => {
                    println!("🔑 Signed in as {}", user.email);
                    println!("   User ID: {}", user.id);
                    println!("   Member since: {}", long_date(user.created_at));
                }
                None => println!("❌ Saved session was rejected, please login again"),
            },
            AuthStatus::Anonymous | AuthStatus::Loading => {
                println!("❌ Not signed in");
                println!("   Please login first: blog-cli login --email <email> --password <password>");
            }
        }
        Ok(())
    }

    async fn list(&mut self, page: u32, page_size: u32) -> Result<()> {
        let mut view = ListView::new(page_size).starting_at(page);
        view.load(self.client.as_ref()).await;

        if let Some(error) = view.error() {
            bail!("{}", error);
        }

        if view.is_empty() && view.total() > 0 {
            println!(
                "   Page {} is past the last page ({})",
                view.page(),
                view.page_count()
            );
            return Ok(());
        }

        if view.is_empty() {
            println!("   No blogs yet");
            println!("   Be the first to create a blog post: blog-cli create --title \"My Post\" --content \"Hello\"");
            return Ok(());
        }

        let now = chrono::Utc::now();
        for post in view.posts() {
            println!("{} [{}]", post.title.bold(), post.id);
            println!("   {} · {}", author_label(post), time_ago(post.created_at, now));
            println!("   {}", excerpt(&post.content).replace('\n', " "));
            println!();
        }

        if view.show_pagination() {
            println!(
                "Page {} of {} ({} posts): {}",
                view.page(),
                view.page_count(),
                view.total(),
                render_window(&view)
            );
        }
        Ok(())
    }

    async fn load_detail(&self, id: Uuid) -> Result<DetailView> {
        let mut view = DetailView::new(id);
        view.load(self.client.as_ref()).await;
        if let Some(error) = view.error() {
            bail!("{}", error);
        }
        Ok(view)
    }

    async fn get(&mut self, id: Uuid) -> Result<()> {
        let view = self.load_detail(id).await?;
        let Some(post) = view.post() else {
            bail!("Post #{} not found", id);
        };

        println!("{}", post.title.bold());
        let mut byline = format!("{} · {}", author_label(post), long_date(post.created_at));
        if let Some(updated) = post.updated_at {
            byline.push_str(&format!(" · Updated {}", long_date(updated)));
        }
        println!("{}", byline.dimmed());
        println!();
        for paragraph in paragraphs(&post.content) {
            println!("{}", paragraph);
        }

        if view.is_author(self.state.identity()) {
            println!();
            println!("   You wrote this post: blog-cli update --id {} / blog-cli delete --id {}", id, id);
        }
        Ok(())
    }

    fn require_login(&self) -> Result<()> {
        match guard(&self.state.status()) {
            GuardOutcome::Render => Ok(()),
            GuardOutcome::RedirectToLogin | GuardOutcome::Placeholder => {
                bail!("Unauthorized. Please login first: blog-cli login --email <email> --password <password>")
            }
        }
    }

    async fn create(&mut self, title: String, content: String) -> Result<()> {
        let mut form = PostForm::create();
        form.set_title(title);
        form.set_content(content);

        // Проверка полей до любого сетевого запроса
        let errors = form.draft().field_errors();
        if let Some(message) = errors.title.or(errors.content) {
            bail!("{}", message);
        }
        self.require_login()?;

        println!("📝 Creating new post...");
        let Some(post) = form.submit(self.client.as_ref()).await else {
            bail!("Failed to create post: {}", form.submit_error().unwrap_or("unknown error"));
        };

        println!("{}", "✅ Post created successfully!".green());
        println!("   ID: {}", post.id);
        println!("   Title: {}", post.title);
        Ok(())
    }

    async fn update(
        &mut self,
        id: Uuid,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<()> {
        self.require_login()?;

        let mut view = self.load_detail(id).await?;
        let Some(post) = view.post() else {
            bail!("Post #{} not found", id);
        };
        if edit_access(self.state.identity(), post) == EditAccess::RedirectToDetail {
            bail!("You can only edit your own posts");
        }

        let mut form = PostForm::edit(post);
        if let Some(title) = title {
            form.set_title(title);
        }
        if let Some(content) = content {
            form.set_content(content);
        }

        println!("✏️ Updating post #{}", id);
        let Some(saved) = form.submit(self.client.as_ref()).await else {
            let errors = form.field_errors();
            let reason = errors
                .title
                .or(errors.content)
                .or(form.submit_error())
                .unwrap_or("unknown error");
            bail!("Failed to update post: {}", reason);
        };
        view.apply_update(saved);

        if let Some(post) = view.post() {
            println!("{}", "✅ Post updated successfully!".green());
            println!("   Title: {}", post.title);
            println!("   By: {}", author_label(post));
        }
        Ok(())
    }

    async fn delete(&mut self, id: Uuid, yes: bool) -> Result<()> {
        self.require_login()?;

        let mut view = self.load_detail(id).await?;
        if !view.request_delete(self.state.identity()) {
            bail!("You can only delete your own posts");
        }

        let title = view.post().map(|p| p.title.clone()).unwrap_or_default();
        if !yes && !confirm(&title).await? {
            view.cancel_delete();
            println!("Cancelled, nothing was deleted");
            return Ok(());
        }

        println!("🗑️ Deleting post #{}", id);
        match view.delete(self.client.as_ref()).await {
            Some(DeleteOutcome::Deleted) => {
                println!("{}", "✅ Post deleted successfully!".green());
                Ok(())
            }
            Some(DeleteOutcome::Failed) => bail!("{}", view.error().unwrap_or("Delete failed")),
            None => bail!("Delete was not confirmed"),
        }
    }
}

async fn confirm(title: &str) -> Result<bool> {
    println!("Delete \"{}\"? This action cannot be undone. [y/N]", title);

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn render_window(view: &ListView) -> String {
    view.window()
        .into_iter()
        .map(|item| match item {
            PageItem::Page(n) if n == view.page() => format!("[{}]", n),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
