#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
use clap::Parser;

use crate::ui::{Cli, Colors, Commands, ListCommands, MappingCommands, colors};

mod generator;
mod ui;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let colors = Colors::new(colors::colors_enabled(cli.color), colors::detect_theme(cli.theme));

  match cli.command {
    Commands::List { list_command } => match list_command {
      ListCommands::Operations { input, mapping } => {
        ui::commands::list_operations(&input, mapping.as_deref(), &colors).await?;
      }
    },
    Commands::Mapping { mapping_command } => match mapping_command {
      MappingCommands::Update {
        input,
        mapping,
        interactive,
      } => ui::commands::update_mapping(&input, &mapping, interactive, &colors).await?,
    },
    Commands::Generate { generate_command } => {
      let config = ui::commands::GenerateConfig::from_command(generate_command)?;
      ui::commands::generate_code(config, &colors).await?;
    }
  }

  Ok(())
}
