//! eventdesk - registration import and roster review for event staff.
//!
//! Pulls the registration form responses, rebuilds participants and
//! families from them and keeps the result in the local cache for the
//! check-in, lodging and transportation screens.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use eventdesk_core::api::{SheetsClient, ValueRange};
use eventdesk_core::cache::CacheManager;
use eventdesk_core::models::{build_households, AgeGroup, Roster, RosterStats};
use eventdesk_core::parser::{parse_registrations, SETUP_CREW_ROLE};
use eventdesk_core::utils::truncate_string;
use eventdesk_core::Config;

// ============================================================================
// Constants
// ============================================================================

/// Log file prefix inside the cache directory
const LOG_FILE_PREFIX: &str = "eventdesk";

/// Width of the name column in listings
const NAME_WIDTH: usize = 28;

const USAGE: &str = "\
Usage: eventdesk <command>

Commands:
  import <file.json>   Parse a saved sheet export (ValueRange or string[][])
  sync                 Fetch registrations from the configured spreadsheet
  set-sheet <id> [tab] Store the registration spreadsheet (and tab) in the config
  families             List families and their members
  stats                Show roster totals
  help                 Show this message

Environment:
  SHEETS_API_KEY       API key used by `sync`
  EVENTDESK_CACHE_DIR  Override the cache location
  RUST_LOG             Log filter (default: warn)";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Import(PathBuf),
    Sync,
    SetSheet {
        spreadsheet_id: String,
        range: Option<String>,
    },
    Families,
    Stats,
    Help,
}

fn parse_command(args: &[String]) -> Result<Command> {
    match args.get(1).map(String::as_str) {
        None | Some("help") | Some("--help") | Some("-h") => Ok(Command::Help),
        Some("import") => match args.get(2) {
            Some(path) => Ok(Command::Import(PathBuf::from(path))),
            None => bail!("import needs a file path\n\n{}", USAGE),
        },
        Some("sync") => Ok(Command::Sync),
        Some("set-sheet") => match args.get(2) {
            Some(id) => Ok(Command::SetSheet {
                spreadsheet_id: id.clone(),
                range: args.get(3).cloned(),
            }),
            None => bail!("set-sheet needs a spreadsheet id\n\n{}", USAGE),
        },
        Some("families") => Ok(Command::Families),
        Some("stats") => Ok(Command::Stats),
        Some(other) => bail!("Unknown command: {}\n\n{}", other, USAGE),
    }
}

fn file_appender(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(dir)
}

/// Initialize the tracing subscriber for logging.
/// The returned guard flushes the log file on drop.
fn init_tracing(log_dir: Result<PathBuf>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_writer = log_dir.and_then(|dir| {
        file_appender(&dir).with_context(|| format!("Cannot open log file in {}", dir.display()))
    });
    let (file_layer, guard, file_error) = match file_writer {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    if let Some(e) = file_error {
        warn!(error = %format!("{:#}", e), "File logging disabled, logging to stderr only");
    }

    guard
}

/// Read a saved sheet export: either the raw API response or a bare grid
fn load_grid_json(contents: &str) -> Result<Vec<Vec<String>>> {
    let value: serde_json::Value =
        serde_json::from_str(contents).context("Sheet export is not valid JSON")?;
    if value.is_array() {
        serde_json::from_value(value).context("Sheet export must be an array of string rows")
    } else {
        let range: ValueRange =
            serde_json::from_value(value).context("Sheet export is not a ValueRange object")?;
        Ok(range.values)
    }
}

fn import_grid(cache: &CacheManager, config: &Config, grid: &[Vec<String>]) -> Result<Roster> {
    let roster = parse_registrations(grid, &config.labels)?;
    cache.save_roster(&roster)?;
    info!(
        participants = roster.participants.len(),
        families = roster.families.len(),
        "Stored registrations"
    );
    println!(
        "Imported {} participants in {} families",
        roster.participants.len(),
        roster.families.len()
    );
    Ok(roster)
}

async fn sync(cache: &CacheManager, config: &Config) -> Result<()> {
    let spreadsheet_id = config.require_spreadsheet_id()?;
    let api_key = Config::api_key()?;

    let client = SheetsClient::new()?;
    let grid = client
        .fetch_values(spreadsheet_id, &config.range, &api_key)
        .await?;
    import_grid(cache, config, &grid)?;
    Ok(())
}

fn print_families(roster: &Roster) {
    let (households, orphans) = build_households(&roster.participants, &roster.families);

    for household in &households {
        let family = household.family;
        let contact = family.contact_line().unwrap_or_else(|| "-".to_string());
        let shuttle = if household.needs_transportation() { "  (shuttle)" } else { "" };
        println!("#{:<4} {}  {}{}", family.id, family.name, contact, shuttle);

        for p in &household.members {
            let mut flags = Vec::new();
            if p.is_primary_contact {
                flags.push("primary");
            }
            if p.needs_transportation {
                flags.push("shuttle");
            }
            if p.has_role(SETUP_CREW_ROLE) {
                flags.push(SETUP_CREW_ROLE);
            }
            println!(
                "      [{}] {:<width$} {:<14} {}",
                if p.checked_in { "x" } else { " " },
                truncate_string(&p.name, NAME_WIDTH),
                p.age_group.to_string(),
                flags.join(", "),
                width = NAME_WIDTH,
            );
        }
    }

    if !orphans.is_empty() {
        println!();
        println!("Participants without a family record:");
        for p in orphans {
            println!("      {} (family #{})", p.name, p.family_id);
        }
    }
}

fn print_stats(roster: &Roster, last_updated: &str, event_name: Option<&str>) {
    let stats = RosterStats::compute(roster);

    if let Some(name) = event_name {
        println!("{}", name);
    }
    println!("Last import:          {}", last_updated);
    println!("Families:             {}", stats.families);
    println!("Participants:         {}", stats.participants);
    for group in AgeGroup::ALL {
        println!("  {:<20} {}", group.to_string(), stats.count_for(group));
    }
    println!("Need transportation:  {}", stats.needs_transportation);
    println!("Setup crew:           {}", stats.setup_crew);
    println!("Checked in:           {}", stats.checked_in);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    let command = parse_command(&args)?;
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let _log_guard = init_tracing(Config::log_dir());
    info!(command = ?command, "eventdesk starting");

    let mut config = Config::load()?;

    if let Command::SetSheet { spreadsheet_id, range } = &command {
        config.set_sheet(spreadsheet_id, range.as_deref())?;
        let path = config.save()?;
        info!(path = %path.display(), "Saved config");
        println!("Registrations will be read from {} ({})", spreadsheet_id, config.range);
        return Ok(());
    }

    let cache = CacheManager::new(config.cache_dir()?)?;

    match command {
        Command::Import(path) => {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let grid = load_grid_json(&contents)?;
            import_grid(&cache, &config, &grid)?;
        }
        Command::Sync => sync(&cache, &config).await?,
        Command::Families => print_families(&cache.load_roster()?),
        Command::Stats => {
            let roster = cache.load_roster()?;
            let ages = cache.cache_ages();
            print_stats(&roster, &ages.last_updated(), config.event_name.as_deref());
        }
        Command::Help | Command::SetSheet { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("eventdesk")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command(&args(&[])).unwrap(), Command::Help);
        assert_eq!(parse_command(&args(&["sync"])).unwrap(), Command::Sync);
        assert_eq!(parse_command(&args(&["stats"])).unwrap(), Command::Stats);
        assert_eq!(
            parse_command(&args(&["import", "values.json"])).unwrap(),
            Command::Import(PathBuf::from("values.json"))
        );
        assert!(parse_command(&args(&["import"])).is_err());
        assert_eq!(
            parse_command(&args(&["set-sheet", "1AbC", "Responses"])).unwrap(),
            Command::SetSheet {
                spreadsheet_id: "1AbC".to_string(),
                range: Some("Responses".to_string()),
            }
        );
        assert!(parse_command(&args(&["set-sheet"])).is_err());
        assert!(parse_command(&args(&["checkout"])).is_err());
    }

    #[test]
    fn test_load_grid_json_accepts_both_shapes() {
        let bare = r#"[["How many people are in your party"], ["1"]]"#;
        assert_eq!(load_grid_json(bare).unwrap().len(), 2);

        let range = r#"{"range": "A1:B2", "values": [["h"], ["1"]]}"#;
        assert_eq!(load_grid_json(range).unwrap().len(), 2);

        let empty = r#"{"range": "A1:B2"}"#;
        assert!(load_grid_json(empty).unwrap().is_empty());

        assert!(load_grid_json("[[1, 2]]").is_err());
        assert!(load_grid_json("nope").is_err());
    }

    #[test]
    fn test_file_appender_reports_unusable_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(file_appender(&dir.path().join("logs")).is_ok());

        // A regular file where the log directory should be
        let blocked = dir.path().join("not-a-dir");
        std::fs::write(&blocked, "x").unwrap();
        assert!(file_appender(&blocked).is_err());
    }

    #[test]
    fn test_import_grid_stores_roster() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().join("cache")).unwrap();
        let grid = load_grid_json(
            r#"[["How many people are in your party",
                 "Primary Contact: First Name\n(Prénom)\n(Party of 1)",
                 "Primary Contact: Last Name\n(Nom de famille)\n(Party of 1)"],
                ["1", "Jane", "Doe"]]"#,
        )
        .unwrap();

        let roster = import_grid(&cache, &Config::default(), &grid).unwrap();
        assert_eq!(roster.participants.len(), 1);
        assert_eq!(cache.load_roster().unwrap(), roster);
    }
}
