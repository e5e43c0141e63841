use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "vidmark")]
#[command(about = "Vidmark - save YouTube videos with AI categorization")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  vidmark add https://youtu.be/dQw4w9WgXcQ   Save a single video
  vidmark import links.txt                   Import one link per line
  vidmark list                               Show the collection
  vidmark stats                              Collection statistics
  vidmark export                             Write a JSON backup

\x1b[1;36mConfiguration (environment):\x1b[0m
  YOUTUBE_API_KEY                            YouTube Data API v3 key
  GROQ_API_KEY, GROQ_MODEL                   Groq classification (model optional)
  APPWRITE_ENDPOINT, APPWRITE_PROJECT_ID,
  APPWRITE_API_KEY, APPWRITE_DATABASE_ID,
  APPWRITE_COLLECTION_ID                     Appwrite storage backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Storage backend
    #[arg(long, global = true, value_enum, default_value_t = StoreBackend::Appwrite)]
    pub store: StoreBackend,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save a single YouTube link to the collection
    Add {
        /// Any supported YouTube URL shape (watch, youtu.be, embed, ...)
        url: String,
    },

    /// Import many links at once, one per line
    ///
    /// Reads from the given file, or from stdin when no file is given.
    /// Failed lines are reported at the end; they never abort the batch.
    Import {
        /// File with one link per line (omit to read stdin)
        file: Option<PathBuf>,
    },

    /// Show the collection, newest first
    #[command(alias = "ls")]
    List {
        /// Maximum number of records to show
        #[arg(short, long, default_value_t = 100)]
        limit: usize,
    },

    /// Collection statistics: categories, tags, confidence, recency
    Stats,

    /// Write the collection to a JSON file
    Export {
        /// Output path (defaults to youtube_collection_<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove a record by its id
    Delete {
        /// Record id as shown by `vidmark list`
        id: String,
    },
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Appwrite database collection (requires APPWRITE_* variables)
    Appwrite,
    /// In-process store; contents are lost on exit
    Memory,
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}
