mod cli;

use clap::Parser;

fn main() {
    let args = cli::Cli::parse();
    logging::init(args.verbose, args.quiet);

    match engine::sync(args.into_options()) {
        Ok(summary) => {
            tracing::debug!(
                "done: {} copied, {} updated, {} unchanged, {} skipped, {} deleted, {} excluded",
                summary.files_copied(),
                summary.files_updated(),
                summary.files_unchanged(),
                summary.files_skipped() + summary.dirs_skipped(),
                summary.deletions(),
                summary.excluded_sources() + summary.protected_destinations(),
            );
        }
        Err(error) => {
            tracing::error!("{error}");
            std::process::exit(1);
        }
    }
}
