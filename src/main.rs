/*!
 * Command-line interface for batchview
 */

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use batchview::config::{Args, Config};
use batchview::present::{ClipboardPresenter, FilePresenter, MultiPresenter, Presenter, StdoutPresenter};
use batchview::report::{Reporter, RunReport};
use batchview::{BatchViewError, Generator, LocalHost, Result};

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();
    setup_tracing(&args);
    debug!("Parsed CLI arguments: {args:?}");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        // Already shown by the presenter
        Err(BatchViewError::NoSelection) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_tracing(args: &Args) {
    if let Some(level) = args.log_level.to_tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .without_time()
            .compact()
            .init();
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::from_args(args)?;
    config.validate()?;

    let host = LocalHost::new(
        config.workspace_roots.clone(),
        config.selection.clone(),
        config.sort,
    )
    .with_base_dir(config.cwd.clone());

    let mut presenter = MultiPresenter::new();
    if let Some(path) = &config.output_file {
        presenter = presenter.with(FilePresenter::new(path));
    }
    if config.clip {
        presenter = presenter.with(ClipboardPresenter);
    }
    if presenter.is_empty() {
        presenter = presenter.with(StdoutPresenter);
    }

    let progress = if config.progress {
        let progress = ProgressBar::new(0);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%)")
                .map_err(|e| BatchViewError::Unexpected(e.to_string()))?,
        );
        progress.enable_steady_tick(std::time::Duration::from_millis(100));
        progress.set_prefix("📊 Processing");
        progress
    } else {
        ProgressBar::hidden()
    };

    let start_time = Instant::now();

    let generator = Generator::new(&host)
        .with_max_depth(config.max_depth)
        .with_progress(Arc::new(progress.clone()));
    let result = generator.run(&config.invocation(), &presenter);

    progress.finish_and_clear();
    let document = result?;

    let report = RunReport {
        destination: presenter.describe(),
        duration: start_time.elapsed(),
        selected: document.entries.len(),
        statistics: document.statistics,
    };
    Reporter::new(config.report).print_report(&report)
}
