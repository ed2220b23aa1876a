use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Load variable files recursively from a directory and merge them"
)]
pub struct Cli {
    /// Directory to load variable files from
    #[arg(long)]
    pub dir: Option<String>,

    /// Nest the merged variables under this name
    #[arg(long)]
    pub name: Option<String>,

    /// Number of directories to visit in sorted order (0 = unlimited)
    #[arg(long)]
    pub depth: Option<u64>,

    /// Only load files whose name matches this regular expression
    #[arg(long)]
    pub files_matching: Option<String>,

    /// Filename patterns to skip, on top of the built-in ones
    #[arg(long, num_args = 1..)]
    pub ignore_files: Option<Vec<String>>,

    /// Run as a task of the role at this path
    #[arg(long)]
    pub role_path: Option<PathBuf>,

    /// YAML file holding raw task arguments
    #[arg(long)]
    pub args_file: Option<PathBuf>,

    /// Use a predefined set of arguments from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}
