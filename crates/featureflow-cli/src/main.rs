use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use featureflow_core::{Category, IdeaStatus};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use strum::IntoEnumIterator;

mod app;
mod commands;
mod logging;
mod render;

use app::App;

#[derive(Parser)]
#[command(name = "featureflow")]
#[command(about = "Feature Flow CLI - submit ideas, vote, discuss and follow the roadmap", long_about = None)]
struct Cli {
    /// API base URL, e.g. https://feedback.example.com/api/v1
    #[arg(long, global = true, env = "FEATUREFLOW_API_URL")]
    api_url: Option<String>,

    /// Path to config.toml (the session token is stored beside it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FEATUREFLOW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, env = "FEATUREFLOW_PASSWORD", hide_env_values = true)]
        password: String,
        /// Repeat the password to catch typos
        #[arg(long)]
        password_confirmation: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// List ideas on the board
    Board {
        #[arg(long, value_enum, default_value_t = Sort::Trending)]
        sort: Sort,
        /// Filter by status (implies --sort list)
        #[arg(long, value_parser = parse_status)]
        status: Option<IdeaStatus>,
        /// Filter by category (implies --sort list)
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,
        /// Case-insensitive match on title or description
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one idea with its comments
    Show { id: String },
    /// Submit a new idea
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, value_parser = parse_category, default_value = "feature")]
        category: Category,
    },
    /// Vote for an idea
    Vote { id: String },
    /// Withdraw your vote
    Unvote { id: String },
    /// Comment on an idea
    Comment { id: String, text: String },
    /// Delete one of your comments (admins may delete any)
    DeleteComment { id: String, comment_id: String },
    /// Show the public roadmap
    Roadmap {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Moderation commands (admin only)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List ideas in the moderation queue
    Ideas {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Set the status of an idea
    Status {
        id: String,
        #[arg(value_parser = parse_status)]
        status: IdeaStatus,
    },
    /// Permanently delete an idea and its comments
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Sort {
    Trending,
    Recent,
    List,
}

fn parse_status(value: &str) -> Result<IdeaStatus, String> {
    IdeaStatus::from_str(value).map_err(|_| {
        let options: Vec<String> = IdeaStatus::iter().map(|s| s.to_string()).collect();
        format!("expected one of: {}", options.join(", "))
    })
}

fn parse_category(value: &str) -> Result<Category, String> {
    Category::from_str(value).map_err(|_| {
        let options: Vec<String> = Category::iter().map(|c| c.to_string()).collect();
        format!("expected one of: {}", options.join(", "))
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            render::failure(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let app = App::bootstrap(cli.api_url, cli.config)?;
    app.session.restore().await;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&app, &email, &password).await?,
        Commands::Signup {
            email,
            name,
            password,
            password_confirmation,
        } => {
            commands::auth::signup(&app, email, name, password, password_confirmation).await?
        }
        Commands::Logout => commands::auth::logout(&app),
        Commands::Whoami => commands::auth::whoami(&app),
        Commands::Board {
            sort,
            status,
            category,
            search,
            page,
        } => {
            let listing = if status.is_some() || category.is_some() {
                commands::board::Listing::Filtered { status, category, page }
            } else {
                match sort {
                    Sort::Trending => commands::board::Listing::Trending(page),
                    Sort::Recent => commands::board::Listing::Recent(page),
                    Sort::List => commands::board::Listing::Filtered {
                        status,
                        category,
                        page,
                    },
                }
            };
            commands::board::list(&app, listing, search.as_deref()).await?
        }
        Commands::Show { id } => commands::board::show(&app, &id).await?,
        Commands::Submit {
            title,
            description,
            category,
        } => commands::board::submit(&app, &title, &description, category).await?,
        Commands::Vote { id } => commands::engage::vote(&app, &id).await?,
        Commands::Unvote { id } => commands::engage::unvote(&app, &id).await?,
        Commands::Comment { id, text } => commands::engage::comment(&app, &id, &text).await?,
        Commands::DeleteComment { id, comment_id } => {
            commands::engage::delete_comment(&app, &id, &comment_id).await?
        }
        Commands::Roadmap { page } => commands::roadmap::show(&app, page).await?,
        Commands::Admin { action } => match action {
            AdminAction::Ideas { page } => commands::admin::ideas(&app, page).await?,
            AdminAction::Status { id, status } => {
                commands::admin::change_status(&app, &id, status).await?
            }
            AdminAction::Delete { id, yes } => commands::admin::delete(&app, &id, yes).await?,
        },
    }

    Ok(())
}
