//! CLI Command Handlers
//!
//! Each handler turns its arguments into a link, runs it through the
//! navigator (following redirects), prints the outcome and returns ExitCode.

use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;

use catalognav::api::CatalogClient;
use catalognav::cache::TtlCache;
use catalognav::codec::{Action, Link, SearchQuery};
use catalognav::config::Config;
use catalognav::history::FileHistory;
use catalognav::models::{NoticeLevel, RenderHint, SearchMode};
use catalognav::navigator::{Navigator, Outcome, Shell};
use catalognav::{NavError, Notice};

use crate::cli::{BrowseCmd, ExitCode, OpenCmd, Output, ScreenOutput, SearchCmd};

/// Redirect chains longer than this are treated as a loop
const MAX_REDIRECTS: usize = 8;

/// Wire the navigator from the config file
pub fn build_navigator(config_path: Option<&Path>) -> Navigator {
    let config = match config_path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let api = Arc::new(CatalogClient::new(config.base_url()));
    Navigator::new(
        config,
        api,
        Arc::new(TtlCache::new()),
        Arc::new(FileHistory::default()),
        Arc::new(TerminalShell::new()),
    )
}

// =============================================================================
// Commands
// =============================================================================

pub async fn open_cmd(cmd: OpenCmd, nav: &Navigator, output: &Output) -> ExitCode {
    match Link::parse(&cmd.link) {
        Ok(link) => run(nav, link, output).await,
        Err(e) => output.error(e.to_string(), ExitCode::InvalidArgs),
    }
}

pub async fn root_cmd(nav: &Navigator, output: &Output) -> ExitCode {
    run(nav, Link::bare(Action::Root), output).await
}

pub async fn browse_cmd(cmd: BrowseCmd, nav: &Navigator, output: &Output) -> ExitCode {
    match cmd.state() {
        Ok(state) => run(nav, Link::listing(&state), output).await,
        Err(e) => output.error(e.to_string(), ExitCode::InvalidArgs),
    }
}

pub async fn search_cmd(cmd: SearchCmd, nav: &Navigator, output: &Output) -> ExitCode {
    let query = SearchQuery {
        keyword: cmd.keyword.filter(|k| !k.is_empty()),
        mode: if cmd.universal {
            SearchMode::Alternate
        } else {
            SearchMode::Normal
        },
    };
    if let Some(keyword) = &query.keyword {
        output.info(format!("Searching for: {}", keyword));
    }
    run(nav, query.link(), output).await
}

pub async fn history_cmd(nav: &Navigator, output: &Output) -> ExitCode {
    run(nav, Link::bare(Action::SearchHistory), output).await
}

// =============================================================================
// Outcome Rendering
// =============================================================================

/// Activate `link`, follow redirects, print what comes out
async fn run(nav: &Navigator, mut link: Link, output: &Output) -> ExitCode {
    for _ in 0..=MAX_REDIRECTS {
        let outcome = match nav.activate(&link).await {
            Ok(outcome) => outcome,
            Err(e) => return output.error(e.to_string(), exit_code_for(&e)),
        };

        match outcome {
            Outcome::Redirect(next) => {
                output.info(format!("-> {}", nav.url(&next)));
                link = next;
            }
            Outcome::Listing {
                listing,
                hint,
                notice,
            } => {
                if let Some(notice) = &notice {
                    output.notice(notice);
                }
                let code = listing_code(&hint, notice.as_ref());
                let (items, skipped) = listing.collect_all();
                let screen = ScreenOutput {
                    hint,
                    notice,
                    items,
                    skipped,
                };
                if let Err(e) = output.screen(&screen) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
                return code;
            }
            Outcome::Play { url } => {
                if let Err(e) = output.play(&url) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
                return ExitCode::Success;
            }
            Outcome::PlayFailed(notice) => {
                return output.error(notice.message, ExitCode::NetworkError);
            }
            Outcome::Cancelled => {
                output.info("Cancelled");
                return ExitCode::Cancelled;
            }
        }
    }
    output.error("Too many redirects", ExitCode::Error)
}

/// Exit code of a rendered listing: failed screens carry the reason as
/// their notice level (info for "nothing found", error for API failures)
fn listing_code(hint: &RenderHint, notice: Option<&Notice>) -> ExitCode {
    if hint.succeeded {
        return ExitCode::Success;
    }
    match notice.map(|n| n.level) {
        Some(NoticeLevel::Error) => ExitCode::NetworkError,
        Some(NoticeLevel::Info) | None => ExitCode::NothingFound,
    }
}

fn exit_code_for(error: &NavError) -> ExitCode {
    match error {
        NavError::Api(_) => ExitCode::NetworkError,
        NavError::InvalidCategory(_) | NavError::MissingParameter(_) | NavError::UnknownAction(_) => {
            ExitCode::InvalidArgs
        }
        NavError::UnsupportedKind(_) | NavError::History(_) => ExitCode::Error,
    }
}

// =============================================================================
// Terminal Shell
// =============================================================================

/// Prompts on stderr, answers from stdin. Without a terminal on stdin every
/// dialog counts as dismissed.
pub struct TerminalShell {
    interactive: bool,
}

impl TerminalShell {
    pub fn new() -> Self {
        Self {
            interactive: std::io::stdin().is_terminal(),
        }
    }
}

impl Default for TerminalShell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell for TerminalShell {
    fn select(&self, heading: &str, options: &[String]) -> Option<usize> {
        if !self.interactive {
            return None;
        }
        eprintln!("{}", heading);
        for (index, option) in options.iter().enumerate() {
            eprintln!("{:>3}. {}", index + 1, option);
        }
        let answer = read_answer("Choice: ")?;
        parse_choice(&answer, options.len())
    }

    fn input(&self, heading: &str, default: &str) -> Option<String> {
        if !self.interactive {
            return None;
        }
        let prompt = if default.is_empty() {
            format!("{}: ", heading)
        } else {
            format!("{} [{}]: ", heading, default)
        };
        let answer = read_answer(&prompt)?;
        if answer.is_empty() {
            Some(default.to_string())
        } else {
            Some(answer)
        }
    }
}

/// One line from stdin without its line ending; `None` on EOF
fn read_answer(prompt: &str) -> Option<String> {
    eprint!("{}", prompt);
    std::io::stderr().flush().ok()?;
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

/// 1-based menu answer to a 0-based index
fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
}

// =============================================================================
// Tests
// =============================================================================
