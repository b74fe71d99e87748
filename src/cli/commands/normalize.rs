//! `normalize`: source → normalized section files in a local directory.

use crate::cli::args::NormalizeArgs;
use crate::error::TokenJackError;
use crate::observability::RunSummary;
use crate::output::{DirectorySink, write_all};

use super::{acquire, finish, output_dir, resolve};

/// Normalize the token source and write section files.
///
/// # Errors
///
/// Returns a config or source error before anything is written, or
/// `PartialWrite` after writing if any section failed.
pub async fn run(args: &NormalizeArgs) -> Result<(), TokenJackError> {
    let resolved = resolve(&args.source)?;
    let dir = output_dir(args.out.as_ref(), &resolved.config);

    let (origin, normalized) = acquire(&resolved).await?;

    let sink = DirectorySink::new(dir);
    let report = write_all(&normalized.tokens, &sink).await;

    let summary = RunSummary::new(origin, &normalized).with_report(&report);
    finish(&summary, &report, args.format)
}
