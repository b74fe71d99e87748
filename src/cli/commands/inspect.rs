//! `inspect`: print the normalized token set (or one section artifact).

use crate::cli::args::InspectArgs;
use crate::error::TokenJackError;
use crate::observability::RunSummary;
use crate::output::Section;

use super::{acquire, resolve};

/// Normalize the token source and print it to stdout without writing files.
///
/// # Errors
///
/// Returns a config or source error, or a JSON error if the output cannot be
/// serialized.
pub async fn run(args: &InspectArgs) -> Result<(), TokenJackError> {
    let resolved = resolve(&args.source)?;
    let (origin, normalized) = acquire(&resolved).await?;
    tracing::info!(summary = %RunSummary::new(origin, &normalized), "normalization complete");

    match args.section.map(Section::from) {
        Some(section) => match section.render(&normalized.tokens) {
            Some(bytes) => print!("{}", String::from_utf8_lossy(&bytes?)),
            None => tracing::warn!(section = %section, "section is empty"),
        },
        None => println!("{}", serde_json::to_string_pretty(&normalized.tokens)?),
    }
    Ok(())
}
