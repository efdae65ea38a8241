use anyhow::Context as _;

use crate::cli::ResolveArgs;
use crate::pipeline::{self, Resolution};

pub async fn run(args: ResolveArgs) -> anyhow::Result<()> {
    let resolver = pipeline::build_resolver(&args.source)?;

    match resolver.resolve(&args.title).await? {
        Resolution::Resolved { record, from_cache } => {
            tracing::debug!(from_cache, "resolved");
            let json = serde_json::to_string_pretty(&record)
                .context("serialize classification record")?;
            println!("{json}");
        }
        Resolution::NoMatch => {
            println!("No classification found for {:?}", args.title);
        }
    }

    Ok(())
}
