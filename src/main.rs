/*!
# Moodjournal command-line front end

Thin dispatcher over the library's service layer. Command output goes to
stdout (plain text, or JSON with `--json`); logs go to stderr.

## Configuration

- `MOODJOURNAL_DIR`: App-data directory (defaults to `~/.moodjournal`)
- `MOODJOURNAL_EDITOR` or `EDITOR`: Editor used by `entry add --edit`
- `MOODJOURNAL_LOG_FORMAT`: `text` (default) or `json`
- `RUST_LOG`: Log filter (defaults to `info`, `debug` with `--verbose`)
*/

use chrono::{Local, NaiveDate};
use clap::Parser;
use moodjournal::avatar::to_data_url;
use moodjournal::cli::{
    AvatarCommand, AvatarSetArgs, CliArgs, Commands, EntryCommand, EntryFields, ProfileCommand,
    RenderArgs, SecurityCommand, TagCommand,
};
use moodjournal::config::{ensure_data_dir, Config};
use moodjournal::constants::{
    DATE_FORMAT_ISO, DEFAULT_AVATAR_SIZE, DEFAULT_LOG_LEVEL, DEFAULT_STICKER_SIZE,
    DEFAULT_SUGGESTED_TAGS,
    ENV_VAR_LOG_FORMAT, LOG_FORMAT_JSON, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME,
};
use moodjournal::db::avatars::AvatarConfiguration;
use moodjournal::db::entries::JournalEntry;
use moodjournal::db::Database;
use moodjournal::editor::{compose, ExternalEditor};
use moodjournal::errors::{AppError, AppResult};
use moodjournal::journal_core::{all_moods, parse_entry_date};
use moodjournal::moods::Mood;
use moodjournal::ops::{journal, profile, security, stats, stickers, tags};
use serde::Serialize;
use std::io;
use std::process::ExitCode;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;
use zeroize::Zeroizing;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let json = std::env::var(ENV_VAR_LOG_FORMAT)
        .map(|f| f.trim().eq_ignore_ascii_case(LOG_FORMAT_JSON))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).compact().with_writer(io::stderr))
            .try_init()
    };
    if result.is_err() {
        eprintln!("Logging was already initialized");
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service = TRACING_SERVICE_NAME,
        correlation_id = %Uuid::new_v4()
    );
    let _guard = span.enter();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> AppResult<ExitCode> {
    debug!("CLI arguments: {:?}", args);

    let config = Config::load()?;
    config.validate()?;
    ensure_data_dir(&config.data_dir)?;
    let db = Database::open(&config.database_path())?;

    let out = Output { json: args.json };
    let today = Local::now().date_naive();

    match args.command {
        Commands::Init => {
            db.initialize()?;
            info!("Database ready at {:?}", config.database_path());
            out.message("Journal initialized")?;
        }
        Commands::Entry { action } => return run_entry(&db, &config, &out, today, action),
        Commands::Tag { action } => {
            let found = match action {
                TagCommand::List => tags::all_tags(&db)?,
                TagCommand::Search { term } => tags::search(&db, &term)?,
                TagCommand::Top { limit } => tags::most_used(&db, limit)?,
                TagCommand::Suggest => tags::suggested_tags(&db, DEFAULT_SUGGESTED_TAGS)?,
            };
            out.print(&found, || {
                found
                    .iter()
                    .map(|t| format!("{} ({})", t.name, t.usage_count))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Commands::Stats { today: reference } => {
            let reference = match reference {
                Some(date) => parse_entry_date(&date)?,
                None => today,
            };
            let dashboard = stats::dashboard(&db, reference);
            out.print(&dashboard, || {
                let mood = dashboard
                    .most_frequent_mood
                    .map_or_else(|| "-".to_string(), |m| format!("{} {}", m.emoji(), m.label()));
                format!(
                    "Entries: {}\nWords: {} (avg {})\nThis month: {}\nTop mood: {}\nTop tag: {}",
                    dashboard.total_entries,
                    dashboard.total_words,
                    dashboard.average_words,
                    dashboard.entries_this_month,
                    mood,
                    dashboard.most_used_tag.as_deref().unwrap_or("-"),
                )
            })?;
        }
        Commands::Security { action } => return run_security(&db, &out, action),
        Commands::Profile { action } => match action {
            ProfileCommand::SetName { name } => {
                let saved = profile::save_profile_name(&db, &name)?;
                out.message(&format!("Profile name set to {}", saved.name))?;
            }
            ProfileCommand::Show => match profile::user_profile(&db)? {
                Some(p) => out.message(&p.name)?,
                None => return Ok(missing("No profile yet")),
            },
        },
        Commands::Avatar { action } => match action {
            AvatarCommand::Set(set) => {
                let saved = profile::save_avatar(&db, &avatar_from_args(set))?;
                out.message(&format!("Avatar saved ({})", saved.id))?;
            }
            AvatarCommand::Render { render } => {
                let (w, h) = render.size(DEFAULT_AVATAR_SIZE);
                let Some(svg) = stickers::avatar_svg(&db, w, h)? else {
                    return Ok(missing("No avatar configured"));
                };
                print_markup(&svg, &render);
            }
        },
        Commands::Sticker { mood, render } => {
            let (w, h) = render.size(DEFAULT_STICKER_SIZE);
            let Some(svg) = stickers::mood_sticker_svg(&db, &mood, w, h)? else {
                return Ok(missing("No avatar configured"));
            };
            print_markup(&svg, &render);
        }
        Commands::Moods => {
            out.print(&Mood::ALL, || {
                Mood::ALL
                    .iter()
                    .map(|m| format!("{} {:<9} {}", m.emoji(), m.key(), m.label()))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_entry(
    db: &Database,
    config: &Config,
    out: &Output,
    today: NaiveDate,
    action: EntryCommand,
) -> AppResult<ExitCode> {
    match action {
        EntryCommand::Add { date, fields, tags } => {
            let date = date.unwrap_or_else(|| today.format(DATE_FORMAT_ISO).to_string());
            let input = entry_input(config, fields, None)?;
            let entry = journal::create_entry(db, &date, &input)?;
            if !tags.is_empty() {
                journal::add_tags(db, entry.id, &tags)?;
            }
            out.print(&entry, || format!("Saved entry for {}", entry.entry_date))?;
        }
        EntryCommand::Show { date } => {
            let entry = entry_for(db, &date)?;
            let entry_tags = journal::tags_for_entry(db, entry.id)?;
            out.print(&entry, || {
                let names: Vec<&str> = entry_tags.iter().map(|t| t.name.as_str()).collect();
                format_entry(&entry, &names)
            })?;
        }
        EntryCommand::List {
            from,
            to,
            mood,
            search,
        } => {
            let mut entries = match (from, to, search) {
                (Some(from), Some(to), _) => journal::entries_in_range(db, &from, &to)?,
                (_, _, Some(term)) => journal::search_entries(db, &term)?,
                _ => journal::list_entries(db)?,
            };
            if let Some(key) = mood {
                let mood = key.parse::<Mood>()?;
                entries.retain(|e| e.primary_mood == mood);
            }
            out.print(&entries, || {
                entries
                    .iter()
                    .map(|e| {
                        format!(
                            "{} {} {}",
                            e.entry_date,
                            e.primary_mood.emoji(),
                            e.title.as_deref().unwrap_or("(untitled)")
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        EntryCommand::Update { date, fields } => {
            let existing = entry_for(db, &date)?;
            let input = entry_input(config, fields, Some(&existing))?;
            journal::update_entry(db, existing.id, &input)?;
            out.message(&format!("Updated entry for {}", date))?;
        }
        EntryCommand::Delete { date } => {
            let entry = entry_for(db, &date)?;
            journal::delete_entry(db, entry.id)?;
            out.message(&format!("Deleted entry for {}", date))?;
        }
        EntryCommand::Tags { date, tags } => {
            let entry = entry_for(db, &date)?;
            journal::set_tags(db, entry.id, &tags)?;
            let names: Vec<String> = journal::tags_for_entry(db, entry.id)?
                .into_iter()
                .map(|t| t.name)
                .collect();
            out.print(&names, || format!("Tags: {}", names.join(", ")))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_security(db: &Database, out: &Output, action: SecurityCommand) -> AppResult<ExitCode> {
    match action {
        SecurityCommand::Setup { kind, credential } => {
            let credential = read_credential(credential, &format!("New {}: ", kind))?;
            security::setup(db, &kind, &credential)?;
            out.message(&format!("Security enabled with a {}", kind))?;
        }
        SecurityCommand::Verify { credential } => {
            let credential = read_credential(credential, "Credential: ")?;
            if !security::verify(db, &credential)? {
                out.message("Credential rejected")?;
                return Ok(ExitCode::FAILURE);
            }
            out.message("Credential accepted")?;
        }
        SecurityCommand::Disable => {
            security::disable(db)?;
            out.message("Security disabled")?;
        }
        SecurityCommand::Status => {
            let enabled = security::is_security_enabled(db)?;
            let kind = security::credential_type(db)?;
            let status = serde_json::json!({
                "enabled": enabled,
                "credential_type": kind.map(|k| k.as_str()),
            });
            out.print(&status, || match (enabled, kind) {
                (true, Some(kind)) => format!("Security enabled ({})", kind),
                _ => "Security disabled".to_string(),
            })?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn read_credential(given: Option<String>, prompt: &str) -> AppResult<Zeroizing<String>> {
    match given {
        Some(value) => Ok(Zeroizing::new(value)),
        None => Ok(Zeroizing::new(rpassword::prompt_password(prompt)?)),
    }
}

fn entry_for(db: &Database, date: &str) -> AppResult<JournalEntry> {
    journal::get_entry_by_date(db, date)?
        .ok_or_else(|| AppError::NotFound(format!("no entry for {}", date)))
}

/// Builds service input from flags, keeping `existing` values for omitted ones.
fn entry_input(
    config: &Config,
    fields: EntryFields,
    existing: Option<&JournalEntry>,
) -> AppResult<journal::EntryInput> {
    let current_content = existing.map(|e| e.content.as_str()).unwrap_or_default();
    let content = if fields.edit {
        let mut editor = ExternalEditor::new(config.editor.clone());
        compose(&mut editor, current_content)?
    } else {
        fields
            .content
            .unwrap_or_else(|| current_content.to_string())
    };

    let primary_mood = fields
        .mood
        .or_else(|| existing.map(|e| e.primary_mood.key().to_string()))
        .unwrap_or_default();

    let secondary_moods = match existing {
        Some(e) if fields.secondary.is_empty() => {
            e.secondary_moods.iter().map(|m| m.key().to_string()).collect()
        }
        _ => fields.secondary,
    };

    Ok(journal::EntryInput {
        title: fields.title.or_else(|| existing.and_then(|e| e.title.clone())),
        content,
        primary_mood,
        secondary_moods,
    })
}

fn avatar_from_args(set: AvatarSetArgs) -> AvatarConfiguration {
    AvatarConfiguration {
        gender: set.gender,
        base_index: set.base,
        eyes_index: set.eyes,
        nose_index: set.nose,
        mouth_index: set.mouth,
        hair_style: set.hair,
        hair_color: set.hair_color,
        clothes_style: set.clothes,
        clothes_color: set.clothes_color,
        facial_hair_style: set.facial_hair,
        glasses_style: set.glasses,
        headwear_style: set.headwear,
        headwear_color: set.headwear_color,
        neckwear_style: set.neckwear,
        neckwear_color: set.neckwear_color,
        extras_style: set.extras,
        extras_color: set.extras_color,
        ..Default::default()
    }
}

fn format_entry(entry: &JournalEntry, tags: &[&str]) -> String {
    let moods: Vec<String> = all_moods(entry.primary_mood, &entry.secondary_moods)
        .iter()
        .map(|m| format!("{} {}", m.emoji(), m.label()))
        .collect();

    let mut text = format!("{}  {}\n", entry.entry_date, moods.join(", "));
    if let Some(title) = &entry.title {
        text.push_str(&format!("{}\n", title));
    }
    text.push_str(&format!("{}\n", entry.content));
    text.push_str(&format!(
        "{} words, {} characters",
        entry.word_count, entry.character_count
    ));
    if !tags.is_empty() {
        text.push_str(&format!("\nTags: {}", tags.join(", ")));
    }
    text
}

fn print_markup(svg: &str, render: &RenderArgs) {
    if render.data_url {
        println!("{}", to_data_url(svg));
    } else {
        print!("{}", svg);
    }
}

fn missing(message: &str) -> ExitCode {
    eprintln!("{}", message);
    ExitCode::FAILURE
}

struct Output {
    json: bool,
}

impl Output {
    fn print<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> AppResult<()> {
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(value).map_err(io::Error::from)?
            );
        } else {
            println!("{}", text());
        }
        Ok(())
    }

    fn message(&self, message: &str) -> AppResult<()> {
        self.print(&serde_json::json!({ "message": message }), || {
            message.to_string()
        })
    }
}
