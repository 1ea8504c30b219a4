use clap::{Parser, Subcommand};
use handlebox::config::HandleConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "handlebox")]
#[command(about = "Create, update and delete handles via the SURFsara Handle API", long_about = None)]
pub struct Cli {
    /// TOML configuration file (default: $HANDLEBOX_CONFIG or config/handlebox.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or update a handle
    Set(HandleArgs),
    /// Delete a handle
    Delete(HandleArgs),
    /// Check the configuration without contacting the API
    Validate(HandleArgs),
}

impl Commands {
    pub fn args(&self) -> &HandleArgs {
        match self {
            Commands::Set(args) | Commands::Delete(args) | Commands::Validate(args) => args,
        }
    }
}

/// Per-invocation overrides applied on top of the loaded configuration
#[derive(clap::Args, Debug)]
pub struct HandleArgs {
    /// Local handle identifier
    #[arg(long)]
    pub handle_name: Option<String>,

    /// Target URL the handle resolves to
    #[arg(long)]
    pub handle_url: Option<String>,

    /// "true", "false" or "" to omit the overwrite parameter
    #[arg(long)]
    pub overwrite: Option<String>,

    /// Verify the API server certificate
    #[arg(long)]
    pub verify_tls: bool,
}

impl HandleArgs {
    pub fn apply(&self, config: &mut HandleConfig) {
        if let Some(handle_name) = &self.handle_name {
            config.handle_name = handle_name.clone();
        }
        if let Some(handle_url) = &self.handle_url {
            config.handle_url = handle_url.clone();
        }
        if let Some(overwrite) = &self.overwrite {
            config.overwrite = overwrite.clone();
        }
        if self.verify_tls {
            config.verify_tls = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_with_overrides() {
        let cli = Cli::parse_from([
            "handlebox",
            "--config",
            "prod.toml",
            "set",
            "--handle-name",
            "42",
            "--overwrite",
            "false",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("prod.toml")));
        assert!(matches!(cli.command, Commands::Set(_)));

        let mut config = HandleConfig::default();
        cli.command.args().apply(&mut config);
        assert_eq!(config.handle_name, "42");
        assert_eq!(config.overwrite, "false");
        assert!(!config.verify_tls);
    }

    #[test]
    fn test_overrides_leave_unset_fields_alone() {
        let cli = Cli::parse_from(["handlebox", "delete"]);

        let mut config = HandleConfig::default();
        config.handle_name = "123".to_string();
        cli.command.args().apply(&mut config);

        assert_eq!(config.handle_name, "123");
        assert_eq!(config.overwrite, "true");
    }
}
