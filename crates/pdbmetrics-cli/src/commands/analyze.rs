use crate::cli::AnalyzeArgs;
use crate::config::{AppConfig, PartialAppConfig};
use crate::error::{CliError, Result};
use crate::fetch::Fetcher;
use crate::report;
use crate::utils::progress::CliProgressHandler;
use pdbmetrics::{
    engine::progress::ProgressReporter,
    workflows::analyze::{self, StructureSource},
};
use std::fs::File;
use std::io::{self, BufWriter};
use tracing::{debug, error, info};

pub async fn run(args: AnalyzeArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = PartialAppConfig::load(&args.config)?.merge_with_analyze(&args)?;
    debug!("Resolved configuration: {:?}", &config);

    let (sources, fetch_failures) = collect_sources(&args, &config).await;
    let total = sources.len() + fetch_failures;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the analysis workflow on {} structure(s)...", sources.len());
    let results = tokio::task::block_in_place(|| {
        analyze::run_batch(&sources, &config.analysis, &reporter)
    });

    let mut reports = Vec::with_capacity(results.len());
    let mut analysis_failures = 0;
    for result in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                error!("{}", e);
                eprintln!("✗ {}", e);
                analysis_failures += 1;
            }
        }
    }

    match &args.output {
        Some(path) => {
            info!("Writing report to {:?}", path);
            let file = BufWriter::new(File::create(path)?);
            report::write_report(file, &reports, config.format, config.analysis.precision)?;
            println!("✓ Report for {} structure(s) written to: {}", reports.len(), path.display());
        }
        None => {
            let stdout = io::stdout().lock();
            report::write_report(stdout, &reports, config.format, config.analysis.precision)?;
        }
    }

    let failed = fetch_failures + analysis_failures;
    if failed > 0 {
        return Err(CliError::Incomplete { failed, total });
    }
    Ok(())
}

/// Local paths first, then downloaded identifiers in the order given.
/// Download failures are logged and counted rather than aborting the batch.
async fn collect_sources(args: &AnalyzeArgs, config: &AppConfig) -> (Vec<StructureSource>, usize) {
    let mut sources: Vec<StructureSource> = args
        .inputs
        .inputs
        .iter()
        .map(StructureSource::from_path)
        .collect();

    if args.inputs.ids.is_empty() {
        return (sources, 0);
    }

    let fetcher = Fetcher::new(config.fetch.clone());
    let mut failures = 0;
    for id in &args.inputs.ids {
        match fetcher.fetch(id).await {
            Ok(path) => sources.push(StructureSource::from_path(path)),
            Err(e) => {
                error!("{}", e);
                eprintln!("✗ {}", e);
                failures += 1;
            }
        }
    }
    (sources, failures)
}
