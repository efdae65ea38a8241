use crate::cli::CheckArgs;
use crate::page;
use crate::pipeline::{self, Resolution};

/// Runs the filler check for one viewing context: resolve the title, then
/// report a verdict. "No classification" and a failed fetch are distinct
/// outcomes; the former prints and succeeds, the latter propagates.
pub async fn run(args: CheckArgs) -> anyhow::Result<()> {
    let episode = match (args.episode, args.episode_title.as_deref()) {
        (Some(episode), _) => episode,
        (None, Some(heading)) => page::episode_number_from_title(heading).ok_or_else(|| {
            anyhow::anyhow!("could not extract an episode number from {heading:?}")
        })?,
        (None, None) => anyhow::bail!("one of --episode or --episode-title is required"),
    };

    let resolver = pipeline::build_resolver(&args.source)?;
    match resolver.resolve(&args.title).await? {
        Resolution::Resolved { record, .. } => {
            if record.is_filler(episode) {
                println!(
                    "Episode {episode} of {:?} is filler (matched {:?}) - skip it",
                    args.title, record.matched_title
                );
            } else {
                println!(
                    "Episode {episode} of {:?} is not filler (matched {:?})",
                    args.title, record.matched_title
                );
            }
        }
        Resolution::NoMatch => {
            println!("No classification found for {:?}", args.title);
        }
    }

    Ok(())
}
