//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jimeng_application::Tool;
use jimeng_domain::{GenerationType, Region};

/// Control panel for the Jimeng image and video generation API.
#[derive(Debug, Parser)]
#[command(name = "jimeng", version, about)]
pub struct Cli {
    /// Store file holding settings and history.
    #[arg(long, env = "JIMENG_STORE", global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show or change endpoint settings.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate images or videos.
    #[command(subcommand)]
    Generate(GenerateCommand),

    /// Token and catalogue tools.
    Tools {
        /// check, points or models.
        tool: Tool,
    },

    /// Browse past generations.
    #[command(subcommand)]
    History(HistoryCommand),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the active region and both endpoint configurations.
    Show,
    /// Switch the active region.
    Region {
        /// CN or International.
        region: Region,
    },
    /// Set the base URL of the active region.
    BaseUrl {
        /// API base URL.
        url: String,
    },
    /// Set the token of the active region.
    Token {
        /// Session token.
        token: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum GenerateCommand {
    /// Generate images from a prompt.
    TextToImage(TextToImageArgs),
    /// Generate images from reference images.
    ImageToImage(ImageToImageArgs),
    /// Generate a video.
    Video(VideoArgs),
}

/// Options shared by every generate command.
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Print the equivalent curl command instead of sending.
    #[arg(long)]
    pub preview: bool,

    /// Path shown for file parts in the curl preview.
    #[arg(long, requires = "preview")]
    pub file_path: Option<String>,
}

#[derive(Debug, Args)]
pub struct TextToImageArgs {
    /// Prompt text.
    #[arg(long, short)]
    pub prompt: String,
    /// Model id; falls back to the first model offered in the region.
    #[arg(long, short)]
    pub model: Option<String>,
    /// Negative prompt.
    #[arg(long)]
    pub negative_prompt: Option<String>,
    /// Aspect ratio.
    #[arg(long, default_value = "1:1")]
    pub ratio: String,
    /// Output resolution.
    #[arg(long, default_value = "1k")]
    pub resolution: String,
    /// Sample strength between 0 and 1.
    #[arg(long, default_value_t = 0.5)]
    pub sample_strength: f64,
    #[command(flatten)]
    pub submit: SubmitArgs,
}

#[derive(Debug, Args)]
pub struct ImageToImageArgs {
    /// Prompt text.
    #[arg(long, short)]
    pub prompt: String,
    /// Model id; falls back to the first model offered in the region.
    #[arg(long, short)]
    pub model: Option<String>,
    /// Negative prompt.
    #[arg(long)]
    pub negative_prompt: Option<String>,
    /// Reference image: an http(s) URL or a local file. Repeatable.
    #[arg(long = "image", short, required = true)]
    pub images: Vec<String>,
    /// Aspect ratio.
    #[arg(long, default_value = "1:1")]
    pub ratio: String,
    /// Output resolution.
    #[arg(long, default_value = "1k")]
    pub resolution: String,
    /// Sample strength between 0 and 1.
    #[arg(long, default_value_t = 0.5)]
    pub sample_strength: f64,
    /// Let the server pick the ratio from the references.
    #[arg(long)]
    pub intelligent_ratio: bool,
    #[command(flatten)]
    pub submit: SubmitArgs,
}

#[derive(Debug, Args)]
pub struct VideoArgs {
    /// Prompt text.
    #[arg(long, short, default_value = "")]
    pub prompt: String,
    /// Model id; falls back to the first model offered in the region.
    #[arg(long, short)]
    pub model: Option<String>,
    /// Aspect ratio.
    #[arg(long, default_value = "16:9")]
    pub ratio: String,
    /// Output resolution.
    #[arg(long, default_value = "720p")]
    pub resolution: String,
    /// Duration in seconds.
    #[arg(long, default_value_t = 5)]
    pub duration: u32,
    /// First/last frame image: an http(s) URL or a local file. Repeatable.
    #[arg(long = "image", short)]
    pub images: Vec<String>,
    #[command(flatten)]
    pub submit: SubmitArgs,
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List records, newest first.
    List {
        /// Only show one generation type.
        #[arg(long = "type", short)]
        kind: Option<GenerationType>,
    },
    /// Print one record as JSON.
    Show {
        /// Record id.
        id: String,
    },
    /// Delete records.
    Delete {
        /// Record ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete every record.
    Clear,
}
