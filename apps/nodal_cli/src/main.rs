use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use nodal::chart::ChartOptions;
use nodal::location::Geocoder;
use nodal::{
    ChartCalculator, ChartRequest, ChartResponse, CoordinateCache, GeocodingStrategy,
    LocationResolver, NatalChartService, NominatimGeocoder, PolygonTimezoneLookup,
    SwissEphemerisAdapter, TimeNormalizer,
};
use nodal_config::NodalSettings;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Birth date, `YYYY-MM-DD`.
    #[arg(long)]
    date: String,

    /// Local birth time, 24-hour `HH:MM` or `HH:MM:SS`.
    #[arg(long, default_value = "12:00")]
    time: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    state: Option<String>,

    #[arg(long)]
    country: String,

    /// Config file (otherwise `configs/nodal.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the lunar node convention (`true` or `mean`).
    #[arg(long)]
    node: Option<String>,

    /// Override the house system (e.g. `placidus`, `whole_sign`).
    #[arg(long)]
    house_system: Option<String>,

    /// Override the geocoding strategy (`cache_first`, `cache_only`, `remote_only`).
    #[arg(long)]
    geocoding: Option<String>,

    /// Print the full chart (longitudes, Julian Day) instead of the sign summary.
    #[arg(long)]
    full: bool,
}

fn apply_overrides(settings: &mut NodalSettings, args: &Args) -> anyhow::Result<()> {
    if let Some(node) = &args.node {
        settings.node_convention = node.parse()?;
    }
    if let Some(system) = &args.house_system {
        settings.house_system = system.parse()?;
    }
    if let Some(strategy) = &args.geocoding {
        settings.geocoding_strategy = strategy.parse().map_err(anyhow::Error::msg)?;
    }
    Ok(())
}

fn build_service(settings: &NodalSettings) -> anyhow::Result<NatalChartService> {
    let cache = match &settings.cities_csv {
        Some(path) => CoordinateCache::from_csv_path(path)
            .with_context(|| format!("Failed to load cities from {}", path.display()))?,
        None => {
            warn!("No cities.csv_path configured; every lookup goes to the geocoder");
            CoordinateCache::new()
        }
    };

    let geocoder: Option<Arc<dyn Geocoder>> = match settings.geocoding_strategy {
        GeocodingStrategy::CacheOnly => None,
        _ => Some(Arc::new(
            NominatimGeocoder::new(
                &settings.geocoding_endpoint,
                &settings.user_agent,
                settings.geocoding_timeout,
            )
            .context("Failed to build geocoding client")?,
        )),
    };

    let resolver = LocationResolver::new(Arc::new(cache), geocoder, settings.geocoding_strategy);
    let normalizer = TimeNormalizer::new(Arc::new(PolygonTimezoneLookup::new()));

    let ephemeris = SwissEphemerisAdapter::new(settings.ephemeris_path.clone())
        .context("Failed to initialize Swiss Ephemeris")?;
    let calculator = ChartCalculator::new(
        Arc::new(ephemeris),
        ChartOptions {
            node_convention: settings.node_convention,
            house_system: settings.house_system,
        },
    );

    Ok(NatalChartService::new(resolver, normalizer, calculator))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut settings = nodal_config::load_settings(args.config.as_deref())?;
    apply_overrides(&mut settings, &args)?;
    info!(
        "Node convention {:?}, house system {}, geocoding {}",
        settings.node_convention,
        settings.house_system.name(),
        settings.geocoding_strategy
    );

    let service = build_service(&settings)?;
    let request = ChartRequest {
        date: args.date.clone(),
        time: args.time.clone(),
        city: args.city.clone(),
        state: args.state.clone(),
        country: args.country.clone(),
    };

    let chart = service.chart(&request).await?;
    let json = if args.full {
        serde_json::to_string_pretty(&chart)?
    } else {
        serde_json::to_string_pretty(&ChartResponse::from(&chart))?
    };
    println!("{json}");
    Ok(())
}
