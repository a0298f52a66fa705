use clap::Parser;
use rescue_map::config::{CliConfig, Command};
use rescue_map::adapters::storage::{write_snapshot, SNAPSHOT_FILE};
use rescue_map::utils::{logger, validation::Validate};
use rescue_map::{
    ConsoleLinks, ConsoleNotifier, EmergencyMap, GeoJsonMap, LocalStorage, MapConfig,
    OsrmClient, OverpassClient, SearchOutcome, Services, StaticLocation,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting rescue-map");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let (config, location) = match prepare(&cli) {
        Ok(prepared) => prepared,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    };

    let map = Arc::new(GeoJsonMap::new());
    let services = Services {
        location: Arc::new(location),
        places: Arc::new(OverpassClient::new(
            config.services.overpass_endpoint.clone(),
        )),
        router: Arc::new(OsrmClient::new(
            config.services.osrm_endpoint.clone(),
            config.services.osrm_profile.clone(),
        )),
        map: map.clone(),
        notifier: Arc::new(ConsoleNotifier::new()),
        links: Arc::new(ConsoleLinks::new()),
    };
    let app = EmergencyMap::new(config, services);

    // A failed start is already shown to the user; every action re-checks the location.
    let _ = app.start().await;

    let outcome = run(&app, &cli.command).await;

    if let Some(dir) = &cli.snapshot {
        let storage = LocalStorage::new(dir);
        if let Err(e) = write_snapshot(&storage, &map).await {
            tracing::error!("❌ Could not save the map snapshot: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
        tracing::info!(
            "📁 Map snapshot saved to {}",
            storage.full_path(SNAPSHOT_FILE).display()
        );
    }

    if let Err(e) = outcome {
        tracing::debug!("Finished with {:?}: {}", e.kind(), e);
        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn prepare(cli: &CliConfig) -> rescue_map::Result<(MapConfig, StaticLocation)> {
    cli.validate()?;

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            MapConfig::from_file(path)?
        }
        None => MapConfig::default(),
    };
    config.validate()?;

    let location = StaticLocation::from_parts(cli.lat, cli.lon)?;
    Ok((config, location))
}

async fn run(app: &EmergencyMap, command: &Command) -> rescue_map::Result<()> {
    match command {
        Command::Alert => {
            let report = app.send_alert().await?;
            tracing::info!(
                "Alert handed to {} link(s) at {}",
                report.links.len(),
                report.sent_at
            );
        }
        Command::Nearby { facility, pick } => {
            let places = match app.find_nearby(&facility.category()).await? {
                SearchOutcome::Listed(places) => places,
                SearchOutcome::Superseded => return Ok(()),
            };

            if let Some(prompt) = app.selector() {
                println!("{}", prompt.title);
                for (i, option) in prompt.options.iter().enumerate() {
                    println!("  {}. {} ({})", i + 1, option.label, option.value);
                }
            }

            let choice = match pick {
                Some(choice) => *choice,
                None => match read_choice(places.len()).await? {
                    Some(choice) => choice,
                    None => return Err(app.cancel_selection()),
                },
            };
            // Options are shown 1-based; 0 maps past the end and is rejected.
            let index = choice.checked_sub(1).unwrap_or(usize::MAX);
            app.confirm_selection(index).await?;
        }
        Command::Route { to } => {
            app.route_to(*to).await?;
        }
    }
    Ok(())
}

/// Reads a 1-based option number from stdin until one is valid, `None` at end of input.
async fn read_choice(available: usize) -> rescue_map::Result<Option<usize>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout
            .write_all(format!("🚗 Navigate to [1-{}]: ", available).as_bytes())
            .await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=available).contains(&choice) => return Ok(Some(choice)),
            _ => eprintln!("Enter a number between 1 and {}", available),
        }
    }
}
