use anyhow::Context;
use clap::Parser;
use facility_map::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "facility-map")]
#[command(about = "Runs a facility search headlessly and reports where the map camera ends up")]
#[command(version)]
struct Cli {
    /// Route or query string, e.g. `/facilities/US2020001?q=mill` or `countries=BD`
    #[arg(default_value = "/")]
    route: String,

    /// Base URL of the facility API
    #[arg(long)]
    api: Option<String>,

    /// JSON file with a `MapConfig`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Load every page of the results, one request at a time
    #[arg(long)]
    all: bool,

    /// Fit the camera to each new result extent
    #[arg(long)]
    zoom_to_search: bool,

    /// Print the loaded results as GeoJSON
    #[arg(long)]
    geojson: bool,
}

impl Cli {
    fn map_config(&self) -> anyhow::Result<MapConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                MapConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
            }
            None => MapConfig::default(),
        };
        if let Some(api) = &self.api {
            config.search.api_base = api.clone();
        }
        if self.zoom_to_search {
            config.viewport.zoom_to_search = true;
        }
        Ok(config)
    }

    /// Bare query strings are treated as the query of the map route
    fn url(&self) -> String {
        if self.route.starts_with('/') {
            self.route.clone()
        } else {
            format!("/?{}", self.route.trim_start_matches('?'))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.map_config()?;

    let fetcher = HttpFacilityFetcher::new(&config.search.api_base)?;
    let mut viewport = Viewport::new(
        config.viewport.default_center,
        config.viewport.default_zoom,
        Point::new(1200.0, 800.0),
    );
    viewport.set_zoom_limits(config.viewport.min_zoom, config.viewport.max_zoom);
    let mut session = MapSession::new(fetcher, viewport, MemoryHistory::new(&cli.url()), config);

    let outcome = session.mount().await;
    log::info!(
        "mounted with {} filter",
        if outcome.from_url { "URL" } else { "default" }
    );

    if cli.all {
        session
            .download_all()
            .await
            .context("loading all result pages")?;
    }

    let state = session.search_state();
    if let Some(failure) = &state.error {
        anyhow::bail!("search failed: {}", failure.message);
    }

    let location = session.sync().history().location();
    println!("route:    {}", location.href());
    match &state.collection {
        Some(collection) => {
            println!("results:  {} of {} loaded", collection.len(), collection.count);
            if let Some(extent) = collection.extent {
                println!("extent:   {:?}", extent);
            }
            if cli.geojson {
                println!("{}", serde_json::to_string_pretty(collection)?);
            }
        }
        None => println!("results:  none"),
    }

    if let Some(viewport) = session.viewport().surface() {
        println!(
            "camera:   {:.5}, {:.5} @ zoom {}",
            viewport.center.lat, viewport.center.lng, viewport.zoom
        );
    }
    println!("state:    {:?}", session.viewport().state());

    session.teardown();
    Ok(())
}
