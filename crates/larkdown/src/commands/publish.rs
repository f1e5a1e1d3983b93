//! `larkdown publish` command implementation.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use larkdown_config::{CliSettings, Config};
use larkdown_feishu::{
    DocumentPublisher, FeishuClient, PublishConfig, PublishOutcome, PublishTarget, StaticToken,
};
use larkdown_parser::parse;

use crate::error::CliError;
use crate::output::Output;

/// Destination kind for a publish.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum Target {
    /// The caller's own docs space.
    Space,
    /// A drive folder (requires a folder token).
    Folder,
    /// A wiki space.
    Wiki,
}

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Path to the markdown file.
    markdown_file: PathBuf,

    /// Destination kind.
    #[arg(long, value_enum, default_value_t = Target::Space)]
    target: Target,

    /// Destination folder token (with `--target folder`; also the folder
    /// consulted by the duplicate check).
    #[arg(long)]
    folder_token: Option<String>,

    /// Wiki space id (with `--target wiki`; overrides config).
    #[arg(long)]
    space_id: Option<String>,

    /// Parent wiki node token (with `--target wiki`; overrides config).
    #[arg(long)]
    wiki_token: Option<String>,

    /// Skip the duplicate check in the destination folder.
    #[arg(long)]
    no_check_duplicate: bool,

    /// Parse and report what would be written, without remote calls.
    #[arg(long)]
    dry_run: bool,

    /// Path to configuration file (default: auto-discover larkdown.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl PublishArgs {
    /// Execute the publish command.
    ///
    /// # Errors
    ///
    /// Returns an error if the publish fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        if self.dry_run {
            return self.dry_run_report(&output);
        }

        // Load config with CLI overrides applied
        let cli_settings = CliSettings {
            folder_token: self.folder_token.clone(),
            wiki_space_id: self.space_id.clone(),
            wiki_node_token: self.wiki_token.clone(),
            check_duplicate: self.no_check_duplicate.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let feishu = config.require_feishu()?;

        let client = FeishuClient::new(
            &feishu.base_url,
            StaticToken::new(feishu.access_token.clone()),
        );

        let target = self.resolve_target(&config)?;
        let publish_config = PublishConfig {
            check_duplicate: config.publish.check_duplicate,
            folder_token: config.publish.folder_token.clone(),
            ..Default::default()
        };
        let publisher = DocumentPublisher::new(&client, publish_config);

        output.info(&format!("Publishing {}...", self.markdown_file.display()));

        match publisher.publish(&self.markdown_file, &target)? {
            PublishOutcome::Published(result) => {
                output.success(&format!("Created document {}", result.document_id));
                if let Some(node) = &result.node_token {
                    output.info(&format!("Wiki node: {node}"));
                }
                output.info(&format!("Images uploaded: {}", result.uploaded_images));
            }
            PublishOutcome::Duplicate { token, title } => {
                output.warning(&format!(
                    "A document named '{title}' already exists ({token})"
                ));
                output.info("Use `larkdown update` to overwrite it.");
            }
        }

        Ok(())
    }

    /// Build the publish target from flags and config.
    fn resolve_target(&self, config: &Config) -> Result<PublishTarget, CliError> {
        match self.target {
            Target::Space => Ok(PublishTarget::Space),
            Target::Folder => {
                let token = config.publish.folder_token.clone().ok_or_else(|| {
                    CliError::Validation(
                        "folder target requires --folder-token or publish.folder_token".to_owned(),
                    )
                })?;
                Ok(PublishTarget::Folder(token))
            }
            Target::Wiki => Ok(PublishTarget::Wiki {
                space_id: config.wiki.space_id.clone(),
                node_token: config.wiki.node_token.clone(),
            }),
        }
    }

    /// Parse the source and report counts without touching the API.
    fn dry_run_report(&self, output: &Output) -> Result<(), CliError> {
        let content = std::fs::read_to_string(&self.markdown_file)?;
        let doc = parse(&content);

        output.info(&format!("Parsed {}:", self.markdown_file.display()));
        output.info(&format!("  blocks: {}", doc.blocks.len()));
        output.info(&format!("  images: {}", doc.pending_images.len()));
        output.info(&format!("  tables: {}", doc.pending_tables.len()));
        output.success("Dry run complete; no remote calls made.");

        Ok(())
    }
}
