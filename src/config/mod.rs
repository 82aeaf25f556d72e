pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_positive_number,
    Validate,
};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "small-lms")]
#[command(about = "A small library catalog and lending manager")]
pub struct CliConfig {
    /// TOML 配置檔路徑；未提供時使用命令列參數
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, default_value = "./library.json")]
    pub data_path: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Add a catalog item
    AddItem {
        id: String,
        title: String,
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long, default_value = "")]
        code: String,
        #[arg(long, default_value = "1")]
        capacity: u32,
    },
    /// Remove an item with no outstanding loans
    RemoveItem { id: String },
    /// Register a patron
    RegisterPatron {
        id: String,
        name: String,
        #[arg(long, default_value = "")]
        contact: String,
    },
    /// Remove a patron with no holdings
    RemovePatron { id: String },
    /// Lend an item to a patron
    Lend { patron_id: String, item_id: String },
    /// Return a held item
    Return { patron_id: String, item_id: String },
    /// Search titles, authors and codes
    Search { query: String },
    /// Print catalog statistics
    Stats,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn data_path(&self) -> &str {
        &self.data_path
    }

    fn pretty_output(&self) -> bool {
        true
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("data_path", &self.data_path)?;
        validate_file_extension("data_path", &self.data_path, &["json"])?;

        match &self.command {
            Command::AddItem {
                id,
                title,
                capacity,
                ..
            } => {
                validate_non_empty_string("id", id)?;
                validate_non_empty_string("title", title)?;
                validate_positive_number("capacity", *capacity as usize, 1)?;
            }
            Command::RegisterPatron { id, name, .. } => {
                validate_non_empty_string("id", id)?;
                validate_non_empty_string("name", name)?;
            }
            Command::Search { query } => {
                validate_non_empty_string("query", query)?;
            }
            _ => {}
        }
        Ok(())
    }
}
