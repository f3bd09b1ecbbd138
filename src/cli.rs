//! CLI - Command Line Interface for catalognav
//!
//! Drives the navigator from a terminal. Every screen the host shell would
//! render is printed instead; output is JSON when `--json` is given or stdout
//! is not a terminal.
//!
//! # Examples
//!
//! ```bash
//! # Top-level menu
//! catalognav root
//!
//! # Second page of drama movies
//! catalognav browse movies --genre 4 --page 2
//!
//! # Follow a link printed by an earlier screen
//! catalognav open "plugin://plugin.video.videoaz/?action=list_videos&cat=tvseries"
//!
//! # Universal search, no prompts
//! catalognav search "kitab" --universal --json
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use catalognav::models::{Category, DisplayItem, NavigationState, Notice, RenderHint};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments or link
    InvalidArgs = 2,
    /// Catalog unreachable or failing
    NetworkError = 3,
    /// Search returned nothing
    NothingFound = 4,
    /// A prompt was dismissed
    Cancelled = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// catalognav - browse a remote video catalog as a tree of listings
#[derive(Parser, Debug)]
#[command(
    name = "catalognav",
    version,
    about = "Browse a remote video catalog from the terminal",
    long_about = "Turns the paginated video catalog into browsable listing screens: \
                  movies, TV series, seasons, episodes and videos, with keyword \
                  search, category/genre/language filters and search history.",
    after_help = "EXAMPLES:\n\
                  catalognav root                         Top-level menu\n\
                  catalognav browse movies --page 2       Second page of movies\n\
                  catalognav search \"kitab\"               Search every category\n\
                  catalognav open \"<link>\"                Follow a printed link"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Activate a navigation link
    #[command(visible_alias = "o")]
    Open(OpenCmd),

    /// Show the top-level menu
    Root,

    /// List a catalog category
    #[command(visible_alias = "b")]
    Browse(BrowseCmd),

    /// Search the catalog
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Show past searches
    History,
}

/// Activate a link printed by an earlier screen
#[derive(Args, Debug)]
pub struct OpenCmd {
    /// Link URL (or bare `action=..&..` query)
    #[arg(required = true)]
    pub link: String,
}

// =============================================================================
// Browse Command
// =============================================================================

/// List one category, optionally filtered
#[derive(Args, Debug)]
pub struct BrowseCmd {
    /// movies, tvseries, seasons, episodes, videos or movie_related
    #[arg(required = true)]
    pub category: String,

    /// Page number
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,

    /// Category filter id
    #[arg(long = "category", id = "category_filter")]
    pub category_filter: Option<String>,

    /// Genre filter id
    #[arg(long, short = 'g')]
    pub genre: Option<String>,

    /// Audio language filter (az, ru, en, tr)
    #[arg(long, short = 'l')]
    pub lang: Option<String>,

    /// Keyword within the category
    #[arg(long, short = 'k')]
    pub keyword: Option<String>,

    /// Series id (seasons, episodes)
    #[arg(long)]
    pub series: Option<String>,

    /// Season number (episodes)
    #[arg(long)]
    pub season: Option<String>,

    /// Movie id (movie_related)
    #[arg(long)]
    pub id: Option<String>,
}

impl BrowseCmd {
    /// Navigation state the arguments describe
    pub fn state(&self) -> Result<NavigationState, catalognav::NavError> {
        let category: Category = self.category.parse()?;
        Ok(NavigationState {
            keyword: self.keyword.clone(),
            category_filter: self.category_filter.clone(),
            genre_filter: self.genre.clone(),
            lang_filter: self.lang.clone(),
            series_id: self.series.clone(),
            season: self.season.clone(),
            item_id: self.id.clone(),
            ..NavigationState::new(category).with_page(self.page)
        })
    }
}

// =============================================================================
// Search Command
// =============================================================================

/// Search every enabled category
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Keyword (prompted for when omitted)
    pub keyword: Option<String>,

    /// Universal search: no prompts, no "nothing found" notice
    #[arg(long, short = 'u')]
    pub universal: bool,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// A rendered listing screen
#[derive(Debug, Serialize)]
pub struct ScreenOutput {
    pub hint: RenderHint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    pub items: Vec<DisplayItem>,
    #[serde(skip_serializing_if = "is_zero_usize")]
    pub skipped: usize,
}

fn is_zero_usize(n: &usize) -> bool {
    *n == 0
}

/// A resolved stream
#[derive(Debug, Serialize)]
pub struct PlayOutput {
    pub url: String,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print a listing screen
    pub fn screen(&self, screen: &ScreenOutput) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&JsonOutput::success(screen))?);
            return Ok(());
        }

        if let Some(title) = &screen.hint.title {
            println!("== {} ==", title);
        }
        for (index, item) in screen.items.iter().enumerate() {
            println!("{:>3}. {}", index + 1, item);
            if !self.quiet {
                println!("     {}", item.target);
            }
        }
        if screen.skipped > 0 {
            self.info(format!("({} unsupported records skipped)", screen.skipped));
        }
        Ok(())
    }

    /// Print a resolved stream URL
    pub fn play(&self, url: &str) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(PlayOutput { url: url.to_string() });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", url);
        }
        Ok(())
    }

    /// Show a notice from the navigator
    pub fn notice(&self, notice: &Notice) {
        if !self.quiet && !self.json {
            eprintln!("[{:?}] {}", notice.level, notice.message);
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
