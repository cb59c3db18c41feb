//! Module for the interactive "generate" command.

use super::*;

/// Topic offered when the user does not type one.
pub const DEFAULT_TOPIC: &str = "Dampak Perubahan Iklim terhadap Keanekaragaman Hayati";

/// Menu entry that ends the session.
const DONE: &str = "Selesai";

/// Arguments that can be used for the [`Commands::Generate`]
#[derive(Args, Clone, Debug, Default)]
pub struct GenerateArgs {
  /// Topic of the paper. Prompted for when missing.
  #[arg(long, short)]
  pub topic: Option<String>,

  /// Save in this format and exit instead of showing the format menu
  #[arg(long, short)]
  pub format: Option<Format>,

  /// Directory the files are written to
  #[arg(long, short, default_value = ".")]
  pub output: PathBuf,
}

/// Function for the [`Commands::Generate`] in the CLI.
///
/// Refuses to start without an API key. Once running, generation failures are shown to the user
/// and end the session normally.
pub async fn generate<I: UserInteraction>(
  interaction: &I,
  config: Config,
  args: GenerateArgs,
) -> Result<()> {
  let config = config.require_api_key()?;
  let generator = Generator::from_config(&config)?.with_template(Template::Draft);
  session(interaction, &generator, args).await
}

/// One interactive session: ask for a topic, generate once, then save as often as asked.
async fn session<I: UserInteraction>(
  interaction: &I,
  generator: &Generator,
  args: GenerateArgs,
) -> Result<()> {
  let GenerateArgs { topic, format, output } = args;
  let topic = match topic {
    Some(topic) => topic,
    None => interaction.prompt("Topik Makalah", DEFAULT_TOPIC)?,
  };

  interaction.reply(ResponseContent::Working("Membuat makalah..."))?;
  let paper = match generator.generate(&topic).await {
    Ok(paper) => paper,
    Err(error) => {
      debug!("Generation failed: {error:?}");
      interaction.reply(ResponseContent::Error(&failure_message(&error)))?;
      return Ok(());
    },
  };
  interaction.reply(ResponseContent::Success("Makalah berhasil dibuat!"))?;
  interaction.reply(ResponseContent::Paper(&paper))?;

  if let Some(format) = format {
    return save(interaction, &paper, format, &output);
  }

  let mut items: Vec<&str> = Format::ALL.iter().map(Format::label).collect();
  items.push(DONE);

  let mut default = 0;
  loop {
    let choice = interaction.select("Pilih format file untuk diunduh", &items, default)?;
    let Some(format) = Format::ALL.get(choice).copied() else {
      break;
    };
    save(interaction, &paper, format, &output)?;
    default = Format::ALL.len();
  }
  Ok(())
}

/// Exports `paper` and writes it under `output`.
fn save<I: UserInteraction>(
  interaction: &I,
  paper: &GeneratedPaper,
  format: Format,
  output: &Path,
) -> Result<()> {
  let artifact = paper.export(format)?;
  let path = artifact.save(output)?;
  interaction.reply(ResponseContent::Saved(&path))
}
