use crate::constants::{APP_DESCRIPTION, APP_NAME, DEFAULT_TOP_TAGS};
use clap::{Args, Parser, Subcommand};

/// A personal mood journal: one entry per day, tags, moods and avatar stickers
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION, author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory and database
    Init,

    /// Create, read and change journal entries
    Entry {
        #[command(subcommand)]
        action: EntryCommand,
    },

    /// Browse tags
    Tag {
        #[command(subcommand)]
        action: TagCommand,
    },

    /// Show dashboard statistics
    Stats {
        /// Reference date for "this month" (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Manage the PIN/password gate
    Security {
        #[command(subcommand)]
        action: SecurityCommand,
    },

    /// Manage the user profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Configure and render the avatar
    Avatar {
        #[command(subcommand)]
        action: AvatarCommand,
    },

    /// Render a mood sticker from the configured avatar
    Sticker {
        /// Mood key, e.g. happy
        mood: String,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// List the canonical moods
    Moods,
}

/// Fields shared by entry creation and update.
#[derive(Args, Debug, Clone, Default)]
pub struct EntryFields {
    /// Primary mood key
    #[arg(short = 'm', long)]
    pub mood: Option<String>,

    /// Secondary mood key (repeatable, at most 2)
    #[arg(short = 's', long = "secondary")]
    pub secondary: Vec<String>,

    /// Entry title
    #[arg(short = 't', long)]
    pub title: Option<String>,

    /// Entry content as HTML
    #[arg(short = 'c', long, conflicts_with = "edit")]
    pub content: Option<String>,

    /// Write the content in the configured editor
    #[arg(short = 'e', long)]
    pub edit: bool,
}

#[derive(Subcommand, Debug)]
pub enum EntryCommand {
    /// Write the entry for a day
    Add {
        /// Entry date (YYYY-MM-DD, defaults to today)
        #[arg(short = 'd', long)]
        date: Option<String>,

        #[command(flatten)]
        fields: EntryFields,

        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Show the entry for a day
    Show { date: String },

    /// List entries, newest first
    List {
        /// First date to include
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Last date to include
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Only entries with this primary mood
        #[arg(long, conflicts_with = "search")]
        mood: Option<String>,

        /// Only entries whose title or content contains this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Change the entry for a day; omitted fields keep their value
    Update {
        date: String,

        #[command(flatten)]
        fields: EntryFields,
    },

    /// Delete the entry for a day
    Delete { date: String },

    /// Replace the tags on the entry for a day
    Tags {
        date: String,

        /// Tag names
        tags: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagCommand {
    /// All tags, most used first
    List,

    /// Tags whose name contains the term
    Search { term: String },

    /// Most used tags
    Top {
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_TAGS)]
        limit: usize,
    },

    /// Tags to offer when writing an entry
    Suggest,
}

#[derive(Subcommand, Debug)]
pub enum SecurityCommand {
    /// Protect the journal with a PIN or password
    Setup {
        #[arg(value_parser = ["pin", "password"])]
        kind: String,

        /// Credential; prompted for when omitted
        #[arg(long)]
        credential: Option<String>,
    },

    /// Check a credential
    Verify {
        /// Credential; prompted for when omitted
        #[arg(long)]
        credential: Option<String>,
    },

    /// Remove the credential
    Disable,

    /// Show whether the gate is on
    Status,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Set the profile name
    SetName { name: String },

    /// Show the profile
    Show,
}

#[derive(Subcommand, Debug)]
pub enum AvatarCommand {
    /// Save the avatar configuration
    Set(AvatarSetArgs),

    /// Render the full avatar
    Render {
        #[command(flatten)]
        render: RenderArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AvatarSetArgs {
    /// male or female
    #[arg(long)]
    pub gender: String,

    #[arg(long, default_value_t = 1)]
    pub base: u32,
    #[arg(long, default_value_t = 1)]
    pub eyes: u32,
    #[arg(long, default_value_t = 1)]
    pub nose: u32,
    #[arg(long, default_value_t = 1)]
    pub mouth: u32,

    #[arg(long)]
    pub hair: Option<String>,
    #[arg(long)]
    pub hair_color: Option<String>,
    #[arg(long)]
    pub clothes: Option<String>,
    #[arg(long)]
    pub clothes_color: Option<String>,
    #[arg(long)]
    pub facial_hair: Option<String>,
    #[arg(long)]
    pub glasses: Option<String>,
    #[arg(long)]
    pub headwear: Option<String>,
    #[arg(long)]
    pub headwear_color: Option<String>,
    #[arg(long)]
    pub neckwear: Option<String>,
    #[arg(long)]
    pub neckwear_color: Option<String>,
    #[arg(long)]
    pub extras: Option<String>,
    #[arg(long)]
    pub extras_color: Option<String>,
}

/// Output size and encoding for rendered markup.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Print a base64 data URI instead of SVG markup
    #[arg(long)]
    pub data_url: bool,
}

impl RenderArgs {
    /// Requested size, falling back to a square of `default` pixels.
    pub fn size(&self, default: u32) -> (u32, u32) {
        (
            self.width.unwrap_or(default),
            self.height.unwrap_or(default),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_global_flags() {
        let args = parse(&["moodjournal", "moods", "--json", "-v"]);
        assert!(args.verbose);
        assert!(args.json);
        assert!(matches!(args.command, Commands::Moods));
    }

    #[test]
    fn test_entry_add() {
        let args = parse(&[
            "moodjournal", "entry", "add", "--date", "2024-01-15", "--mood", "happy",
            "--secondary", "calm", "-s", "grateful", "--content", "<p>Great day!</p>",
            "--tag", "work", "--tag", "gym",
        ]);
        match args.command {
            Commands::Entry {
                action: EntryCommand::Add { date, fields, tags },
            } => {
                assert_eq!(date.as_deref(), Some("2024-01-15"));
                assert_eq!(fields.mood.as_deref(), Some("happy"));
                assert_eq!(fields.secondary, vec!["calm", "grateful"]);
                assert_eq!(fields.content.as_deref(), Some("<p>Great day!</p>"));
                assert!(!fields.edit);
                assert_eq!(tags, vec!["work", "gym"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_content_conflicts_with_edit() {
        let result = CliArgs::try_parse_from([
            "moodjournal", "entry", "add", "--mood", "happy", "--content", "x", "--edit",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_range_requires_both_ends() {
        assert!(CliArgs::try_parse_from(["moodjournal", "entry", "list", "--from", "2024-01-01"]).is_err());
        let args = parse(&[
            "moodjournal", "entry", "list", "--from", "2024-01-01", "--to", "2024-01-31",
        ]);
        assert!(matches!(
            args.command,
            Commands::Entry { action: EntryCommand::List { from: Some(_), to: Some(_), .. } }
        ));
    }

    #[test]
    fn test_security_kind_is_restricted() {
        assert!(CliArgs::try_parse_from(["moodjournal", "security", "setup", "token"]).is_err());
        let args = parse(&["moodjournal", "security", "setup", "pin", "--credential", "123456"]);
        match args.command {
            Commands::Security {
                action: SecurityCommand::Setup { kind, credential },
            } => {
                assert_eq!(kind, "pin");
                assert_eq!(credential.as_deref(), Some("123456"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_sticker_and_render_sizes() {
        let args = parse(&["moodjournal", "sticker", "sad", "--width", "120", "--data-url"]);
        match args.command {
            Commands::Sticker { mood, render } => {
                assert_eq!(mood, "sad");
                assert!(render.data_url);
                assert_eq!(render.size(80), (120, 80));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_avatar_set_defaults() {
        let args = parse(&["moodjournal", "avatar", "set", "--gender", "male", "--hair", "short"]);
        match args.command {
            Commands::Avatar {
                action: AvatarCommand::Set(set),
            } => {
                assert_eq!(set.gender, "male");
                assert_eq!(set.base, 1);
                assert_eq!(set.hair.as_deref(), Some("short"));
                assert!(set.hair_color.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_tag_top_default_limit() {
        let args = parse(&["moodjournal", "tag", "top"]);
        assert!(matches!(
            args.command,
            Commands::Tag { action: TagCommand::Top { limit: DEFAULT_TOP_TAGS } }
        ));
    }

    #[test]
    fn test_tag_suggest() {
        let args = parse(&["moodjournal", "tag", "suggest"]);
        assert!(matches!(args.command, Commands::Tag { action: TagCommand::Suggest }));
    }
}
