use std::path::PathBuf;

use clap::{Parser, Subcommand};
use onlearn::app::App;
use onlearn::config::{ClientConfig, ConfigError};
use onlearn::design::doc::DesignDoc;
use onlearn::design::export::{DesignError, write_export};
use onlearn::design::tool::DesignTool;
use onlearn::net::error::ApiError;
use onlearn::net::types::User;
use onlearn::services::catalog::CourseFilter;
use onlearn::services::learning::LearningSummary;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("request failed: {0}")]
    Api(#[from] ApiError),
    #[error("missing credentials; pass --email/--password or set ONLEARN_EMAIL/ONLEARN_PASSWORD")]
    MissingCredentials,
    #[error("course {0} not found")]
    CourseNotFound(i64),
    #[error("design export failed: {0}")]
    Design(#[from] DesignError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "onlearn", about = "Onlearn course marketplace client")]
struct Cli {
    /// Overrides `ONLEARN_API_URL`.
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, env = "ONLEARN_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "ONLEARN_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List courses, optionally filtered.
    Courses {
        #[arg(long)]
        published_only: Option<bool>,
        /// Case-insensitive title/description match (published courses only).
        #[arg(long)]
        search: Option<String>,
        /// Accepted level; repeat for several.
        #[arg(long)]
        level: Vec<String>,
    },
    Course {
        course_id: i64,
    },
    /// Show the signed-in user.
    Me,
    Enroll {
        course_id: i64,
    },
    MyCourses,
    Progress {
        enrollment_id: i64,
        #[arg(allow_negative_numbers = true)]
        percent: i64,
    },
    Comments {
        course_id: i64,
    },
    Comment {
        course_id: i64,
        #[arg(long)]
        text: String,
    },
    DeleteComment {
        comment_id: i64,
        /// Course the comment belongs to, so its thread is refreshed.
        #[arg(long)]
        course_id: i64,
    },
    /// Build a design from preset tools and write it as JSON.
    DesignExport {
        #[arg(long = "tool", required = true)]
        tools: Vec<DesignTool>,
        /// File or directory; a directory receives `design-export.json`.
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    if let Err(err) = dotenv {
        if !err.not_found() {
            tracing::warn!(error = %err, "failed to load .env");
        }
    }

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }

    if let Command::DesignExport { tools, output } = &cli.command {
        return run_design_export(tools, output).await;
    }

    let app = App::new(&config)?;
    app.start().await;
    let result = run(&app, &cli).await;
    app.shutdown();
    result
}

async fn run(app: &App, cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Courses { published_only, search, level } => {
            if search.is_some() || !level.is_empty() {
                let filter = CourseFilter { text: search.clone().unwrap_or_default(), levels: level.clone() };
                print_json(&app.catalog.search(&filter).await?)
            } else {
                print_json(&*app.catalog.courses(*published_only).await?)
            }
        }
        Command::Course { course_id } => match app.catalog.course(*course_id).await? {
            Some(course) => print_json(&*course),
            None => Err(CliError::CourseNotFound(*course_id)),
        },
        Command::Me => print_json(&authenticate(app, cli).await?),
        Command::Enroll { course_id } => {
            authenticate(app, cli).await?;
            print_json(&app.learning.enroll(*course_id).await?)
        }
        Command::MyCourses => {
            authenticate(app, cli).await?;
            let rows = app.learning.my_enrollments().await?.unwrap_or_default();
            let summary = LearningSummary::from_rows(&rows);
            print_json(&json!({ "enrollments": &*rows, "summary": summary }))
        }
        Command::Progress { enrollment_id, percent } => {
            authenticate(app, cli).await?;
            print_json(&app.learning.update_progress(*enrollment_id, *percent).await?)
        }
        Command::Comments { course_id } => print_json(&*app.community.comments(*course_id).await?),
        Command::Comment { course_id, text } => {
            authenticate(app, cli).await?;
            print_json(&app.community.post_comment(*course_id, text).await?)
        }
        Command::DeleteComment { comment_id, course_id } => {
            authenticate(app, cli).await?;
            app.community.delete_comment(*course_id, *comment_id).await?;
            print_json(&json!({ "deleted": comment_id }))
        }
        Command::DesignExport { tools, output } => run_design_export(tools, output).await,
    }
}

/// Log in with the given credentials, or reuse a session the probe found.
async fn authenticate(app: &App, cli: &Cli) -> Result<User, CliError> {
    if let (Some(email), Some(password)) = (&cli.email, &cli.password) {
        return Ok(app.session.login(email, password).await?);
    }
    app.session.wait_until_ready().await.user.ok_or(CliError::MissingCredentials)
}

async fn run_design_export(tools: &[DesignTool], output: &std::path::Path) -> Result<(), CliError> {
    let mut doc = DesignDoc::new();
    for tool in tools {
        doc.apply_tool(*tool);
    }
    let path = write_export(&doc, output).await?;
    print_json(&json!({ "path": path.display().to_string(), "layers": doc.layer_count_label() }))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
