use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including the git hash for non-release builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "fluffcook", bin_name = "fluffcook", version = get_version())]
#[command(about = "No-fluff recipe manager: scrape, generate and keep recipes offline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List recipes, favorites first
    #[command(alias = "ls")]
    List,

    /// Show one or more recipes
    #[command(alias = "v")]
    View {
        /// Indexes of the recipes (e.g. 1 3 2-4)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,

        /// Plain text, ready to paste or share
        #[arg(long)]
        plain: bool,
    },

    /// Create a recipe by hand (opens $EDITOR unless --title is given)
    #[command(alias = "n")]
    Create {
        #[arg(short, long)]
        title: Option<String>,

        /// Ingredient line (repeatable)
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,

        /// Step line (repeatable)
        #[arg(short, long = "step")]
        steps: Vec<String>,
    },

    /// Edit a recipe in $EDITOR
    #[command(alias = "e")]
    Edit {
        /// Index of the recipe
        index: String,
    },

    /// Permanently delete recipes
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Toggle the favorite flag
    #[command(alias = "f")]
    Fav {
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Extract a recipe from a URL or pasted text
    Cook {
        /// URL or recipe text (words are joined with spaces)
        #[arg(num_args = 0..)]
        input: Vec<String>,
    },

    /// Invent a recipe from a description
    #[command(alias = "gen")]
    Generate {
        #[arg(num_args = 0..)]
        description: Vec<String>,
    },

    /// Write all recipes to a dated JSON backup
    Export {
        /// Target directory
        #[arg(long, short, default_value = ".")]
        out: PathBuf,
    },

    /// Replace all recipes with the contents of a backup
    Import {
        path: PathBuf,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show, save or clear the generation-service API key
    Key {
        key: Option<String>,

        #[arg(long, conflicts_with = "key")]
        clear: bool,
    },

    /// Show, save or clear custom generation rules
    Rules {
        #[arg(num_args = 0..)]
        rules: Vec<String>,

        #[arg(long, conflicts_with = "rules")]
        clear: bool,
    },

    /// Get or set configuration values
    Config {
        /// Configuration key (e.g., model, clean-html)
        key: Option<String>,

        /// Value to set
        value: Option<String>,
    },

    /// Manage the offline asset cache
    #[command(subcommand)]
    Cache(CacheCommands),
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Install the current cache version from an asset directory and drop old versions
    Install {
        #[arg(long, default_value = ".")]
        origin: PathBuf,
    },

    /// Show cached versions and paths
    Status,

    /// Resolve one request the way the offline worker would
    Fetch {
        path: String,

        #[arg(long, default_value = "GET")]
        method: String,

        #[arg(long, default_value = ".")]
        origin: PathBuf,
    },
}
