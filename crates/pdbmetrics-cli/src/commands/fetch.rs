use crate::cli::FetchArgs;
use crate::config::PartialAppConfig;
use crate::error::{CliError, Result};
use crate::fetch::Fetcher;
use tracing::{error, info};

pub async fn run(args: FetchArgs) -> Result<()> {
    let mut partial = PartialAppConfig::load(&args.config)?;
    let fetcher = Fetcher::new(partial.fetch_settings(&args.config)?);

    info!(
        "Fetching {} structure(s) into {:?}",
        args.ids.len(),
        &fetcher.settings().cache_dir
    );

    let mut failed = 0;
    for id in &args.ids {
        match fetcher.fetch(id).await {
            Ok(path) => println!("{}\t{}", id, path.display()),
            Err(e) => {
                error!("{}", e);
                eprintln!("✗ {}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Incomplete {
            failed,
            total: args.ids.len(),
        });
    }
    Ok(())
}
