//! Module for the "export" command.

use super::*;

/// Arguments that can be used for the [`Commands::Export`]
#[derive(Args, Clone, Debug)]
pub struct ExportArgs {
  /// Text file holding the paper
  #[arg(long, short)]
  pub input: PathBuf,

  /// Target format: docx, pdf or md
  #[arg(long, short)]
  pub format: Format,

  /// Title used for the filename and document metadata. Defaults to the first line of the input.
  #[arg(long, short)]
  pub title: Option<String>,

  /// Directory the file is written to
  #[arg(long, short, default_value = ".")]
  pub output: PathBuf,
}

/// Function for the [`Commands::Export`] in the CLI.
pub fn export<I: UserInteraction>(interaction: &I, args: ExportArgs) -> Result<()> {
  let ExportArgs { input, format, title, output } = args;

  let content = std::fs::read_to_string(&input)?;
  let mut request = ExportRequest::new(content, format);
  if let Some(title) = title.or_else(|| infer_title(&request.content)) {
    request = request.with_title(title);
  }

  let artifact = export_artifact(&request)?;
  let path = artifact.save(&output)?;
  info!("Exported {} as {format}", input.display());
  interaction.reply(ResponseContent::Saved(&path))
}
