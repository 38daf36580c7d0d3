//! coderefine: terminal client for the CodeRefine AI code-review service.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use coderefine::api::HttpBackend;
use coderefine::config::Config;
use coderefine::constants;
use coderefine::env::Env;
use coderefine::logging;
use coderefine::orchestrator::{App, Outcome};
use coderefine::render::Animations;
use coderefine::state::{CodeRegion, Tab};
use coderefine::storage::FileTokenStore;
use coderefine::view::TerminalView;

use std::path::Path;
use std::process::{self, ExitCode};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use cli::args::{ChatArgs, Cli, Command, GithubAction, PrArgs};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let env = Env::real();
    logging::init(&env, cli.verbose);

    if let Command::Version = cli.command {
        run_version();
        return Ok(ExitCode::SUCCESS);
    }

    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    let mut config = Config::load(Some(&cwd), &env).context("failed to load configuration")?;
    cli.apply_to(&mut config);
    tracing::debug!(base_url = %config.api.base_url, "configuration loaded");

    let view = Arc::new(TerminalView::new());
    let backend =
        HttpBackend::new(&config.api.base_url).context("failed to build the HTTP client")?;
    let app = App::new(
        Arc::new(backend),
        view.clone(),
        Arc::new(FileTokenStore::new()),
        Animations::from_enabled(config.ui.animations),
    );
    app.set_language(config.review.language.clone());
    app.set_focus_areas(config.review.focus_areas.clone());

    let outcome = match cli.command {
        Command::Review(args) => {
            load_source(&app, &cli.language, &args.file).await?;
            let outcome = app.review().await;
            show_panel(&app, &view, Tab::Review).await;
            outcome
        }
        Command::Rewrite(args) => {
            load_source(&app, &cli.language, &args.source.file).await?;
            let outcome = app.rewrite().await;
            show_panel(&app, &view, Tab::Rewrite).await;
            if args.copy && outcome.is_completed() {
                app.copy_code(CodeRegion::Rewritten);
            }
            outcome
        }
        Command::Chat(args) => run_chat(&app, &view, &cli.language, args).await?,
        Command::Github { action } => run_github(&app, &config, action).await,
        Command::Bumble => app.launch_bumble().await,
        Command::Version => unreachable!("handled before configuration is loaded"),
    };

    Ok(exit_code(&outcome))
}

/// Print detailed version and build information.
fn run_version() {
    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    println!("{}     {}", "target:".dimmed(), constants::TARGET);
}

/// Put a source file into the editor state, inferring its language.
async fn load_source(app: &App, language_flag: &Option<String>, path: &Path) -> Result<()> {
    let code = cli::read_source(path).await?;
    if language_flag.is_none() {
        if let Some(language) = cli::language_for_path(path) {
            app.set_language(language);
        }
    }
    app.set_code(code);
    Ok(())
}

/// Print a panel once its score animations have settled.
async fn show_panel(app: &App, view: &TerminalView, tab: Tab) {
    app.settle_animations().await;
    view.print_panel(tab);
}

/// Interactive chat loop. `/clear` clears the transcript, `/quit` or EOF exits.
async fn run_chat(
    app: &App,
    view: &TerminalView,
    language_flag: &Option<String>,
    args: ChatArgs,
) -> Result<Outcome> {
    if let Some(ref path) = args.code {
        load_source(app, language_flag, path).await?;
        if args.review {
            app.review().await;
            show_panel(app, view, Tab::Review).await;
        }
    }

    app.show_tab(Tab::Chat);
    app.render_transcript();
    eprintln!(
        "  {}",
        "Type a message and press enter. /clear clears the chat, /quit exits.".dimmed()
    );

    let mut last = Outcome::Ignored;
    while let Some(line) = cli::read_line().await? {
        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                app.clear_chat();
            }
            _ => {
                app.set_chat_input(line);
                last = app.send_chat().await;
            }
        }
    }
    Ok(match last {
        // A failed reply was already answered with an apology; the session itself succeeded.
        Outcome::Failed(_) => Outcome::Completed,
        other => other,
    })
}

async fn run_github(app: &App, config: &Config, action: GithubAction) -> Outcome {
    match action {
        GithubAction::Token { token: Some(token) } => app.validate_token(&token).await,
        GithubAction::Token { token: None } => {
            let outcome = app.restore_token().await;
            if outcome == Outcome::Ignored {
                eprintln!("  {}", "No saved GitHub token.".yellow());
            }
            outcome
        }
        GithubAction::Status => app.activate_tab(Tab::Github).await,
        GithubAction::Analyze { pr, comment } => {
            prepare_pr(app, &pr).await;
            app.analyze_pr(comment || config.github.post_comment).await
        }
        GithubAction::Autofix { pr, commit } => {
            prepare_pr(app, &pr).await;
            app.autofix_pr(commit || config.github.auto_commit).await
        }
    }
}

/// Load the token (explicit or saved) and the PR URL into state.
async fn prepare_pr(app: &App, pr: &PrArgs) {
    app.show_tab(Tab::Github);
    match pr.token {
        Some(ref token) => {
            app.validate_token(token).await;
        }
        None => {
            app.restore_token().await;
        }
    }
    app.set_pr_url(pr.url.clone());
}

fn exit_code(outcome: &Outcome) -> ExitCode {
    match outcome {
        Outcome::Completed | Outcome::Ignored | Outcome::Superseded => ExitCode::SUCCESS,
        Outcome::Rejected(_) | Outcome::Failed(_) => ExitCode::FAILURE,
    }
}
