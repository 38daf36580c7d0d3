//! Clap argument types and flag resolution.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use coderefine::config::Config;

/// AI code review, rewrite and chat from the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "coderefine",
    version = coderefine::constants::VERSION,
    about = "AI code review, rewrite and chat from the terminal.",
)]
pub struct Cli {
    /// Backend base URL (overrides config and CODEREFINE_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Source language (default: inferred from the file extension, then config).
    #[arg(long, short = 'l', global = true)]
    pub language: Option<String>,

    /// Focus area to emphasise. Repeat for several.
    #[arg(long = "focus", global = true, value_enum)]
    pub focus: Vec<FocusArea>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Review a source file and print the score card and findings.
    Review(SourceArgs),

    /// Rewrite a source file with improvements applied.
    Rewrite(RewriteArgs),

    /// Chat with the assistant about your code.
    Chat(ChatArgs),

    /// GitHub integration: token, app connection and pull requests.
    Github {
        #[command(subcommand)]
        action: GithubAction,
    },

    /// Launch the Bumble desktop assistant.
    Bumble,

    /// Print version and build information.
    Version,
}

/// Review focus areas understood by the backend.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusArea {
    Bugs,
    Security,
    Performance,
    #[value(alias = "best_practices")]
    BestPractices,
}

impl FocusArea {
    /// Wire name sent in `focus_areas`.
    pub fn as_str(self) -> &'static str {
        match self {
            FocusArea::Bugs => "bugs",
            FocusArea::Security => "security",
            FocusArea::Performance => "performance",
            FocusArea::BestPractices => "best_practices",
        }
    }
}

/// A source file to send.
#[derive(Parser, Debug)]
pub struct SourceArgs {
    /// Path to the source file, or `-` to read from stdin.
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct RewriteArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Copy the rewritten code to the clipboard.
    #[arg(long)]
    pub copy: bool,
}

#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Source file the conversation is about.
    #[arg(long, value_name = "FILE")]
    pub code: Option<PathBuf>,

    /// Review the code first so answers can refer to the findings.
    #[arg(long, requires = "code")]
    pub review: bool,
}

/// GitHub subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum GithubAction {
    /// Validate and save a personal access token (re-checks the saved one if omitted).
    Token {
        token: Option<String>,
    },

    /// Show whether the GitHub App is installed.
    Status,

    /// Review a pull request.
    Analyze {
        #[command(flatten)]
        pr: PrArgs,

        /// Post the review as a PR comment.
        #[arg(long)]
        comment: bool,
    },

    /// Fix security issues in a pull request.
    Autofix {
        #[command(flatten)]
        pr: PrArgs,

        /// Commit the fixes to the PR branch.
        #[arg(long)]
        commit: bool,
    },
}

#[derive(Parser, Debug)]
pub struct PrArgs {
    /// Pull request URL, e.g. https://github.com/owner/repo/pull/12
    pub url: String,

    /// Token to use instead of the saved one. A valid token replaces the saved one.
    #[arg(long)]
    pub token: Option<String>,
}

impl Cli {
    /// Apply flag overrides on top of the loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref url) = self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(ref language) = self.language {
            config.review.language = language.to_lowercase();
        }
        if !self.focus.is_empty() {
            config.review.focus_areas = self.focus.iter().map(|f| f.as_str().to_string()).collect();
        }
    }
}
