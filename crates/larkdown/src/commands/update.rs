//! `larkdown update` command implementation.

use std::path::PathBuf;

use clap::Args;
use larkdown_config::Config;
use larkdown_feishu::{DocumentPublisher, FeishuClient, PublishConfig, StaticToken};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the update command.
#[derive(Args)]
pub(crate) struct UpdateArgs {
    /// Id of the document to overwrite.
    document_id: String,

    /// Path to the markdown file.
    markdown_file: PathBuf,

    /// Path to configuration file (default: auto-discover larkdown.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl UpdateArgs {
    /// Execute the update command.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let feishu = config.require_feishu()?;

        let client = FeishuClient::new(
            &feishu.base_url,
            StaticToken::new(feishu.access_token.clone()),
        );

        let publish_config = PublishConfig {
            check_duplicate: false,
            folder_token: None,
            ..Default::default()
        };
        let publisher = DocumentPublisher::new(&client, publish_config);

        output.info(&format!("Updating document {}...", self.document_id));

        let result = publisher.update(&self.document_id, &self.markdown_file)?;

        output.success(&format!("Updated document {}", result.document_id));
        output.info(&format!("Images uploaded: {}", result.uploaded_images));

        Ok(())
    }
}
