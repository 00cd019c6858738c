//! Hotspot CLI - regional hotspot analysis on SGIS statistics

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use hotspot_algorithms::hotspot::{analyze, AnalysisRequest, AnalysisResult, StatisticKind};
use hotspot_algorithms::weights::{ContiguityKind, WeightStrategy};
use hotspot_cloud::blocking::SgisClientBlocking;
use hotspot_cloud::reproject::boundary_to_wgs84;
use hotspot_cloud::{AreaQuery, SgisClient, SgisClientOptions, Variable, AVAILABLE_YEARS};
use hotspot_core::{FeatureCollection, Region};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "hotspot")]
#[command(author, version, about = "Regional hotspot analysis on SGIS statistics", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Nationwide municipality hotspot analysis from live SGIS data
    Hotspot {
        /// Reference year (2015-2023)
        #[arg(short, long, default_value = "2023")]
        year: u16,
        /// Region value: population, density
        #[arg(long, default_value = "population")]
        variable: String,
        #[command(flatten)]
        analysis: AnalysisArgs,
        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Hotspot analysis of a local GeoJSON FeatureCollection (EPSG:5179)
    Analyze {
        /// Input GeoJSON file
        input: PathBuf,
        /// Numeric property holding the region value
        #[arg(long)]
        value_field: String,
        /// Property holding the region code
        #[arg(long, default_value = "adm_cd")]
        code_field: String,
        /// Property holding the region name
        #[arg(long, default_value = "adm_nm")]
        name_field: String,
        #[command(flatten)]
        analysis: AnalysisArgs,
        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Population statistics as returned by SGIS
    Population {
        #[command(flatten)]
        area: AreaArgs,
        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Administrative boundaries as GeoJSON
    Boundary {
        #[command(flatten)]
        area: AreaArgs,
        /// Convert coordinates to WGS84 lon/lat
        #[arg(long)]
        wgs84: bool,
        /// Output GeoJSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a valid SGIS access token
    Token,
    /// List reference years with published data
    Years,
}

#[derive(Args)]
struct AnalysisArgs {
    /// Statistic: gistar, moran
    #[arg(short, long, default_value = "gistar")]
    stat: String,
    /// Neighbor definition: knn, distance, rook, bishop, queen
    #[arg(short, long, default_value = "knn")]
    weights: String,
    /// Number of nearest neighbors (knn)
    #[arg(short, long, default_value = "8")]
    k: usize,
    /// Neighbor radius in metres (distance)
    #[arg(short, long)]
    radius: Option<f64>,
    /// Permutations for the Local Moran significance test
    #[arg(short, long, default_value = "199")]
    permutations: usize,
    /// Seed for the permutation test
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct AreaArgs {
    /// Reference year (2015-2023)
    #[arg(short, long, default_value = "2020")]
    year: u16,
    /// Parent administrative code (whole country when omitted)
    #[arg(short, long)]
    adm_cd: Option<String>,
    /// Return the parent area itself instead of its children
    #[arg(long)]
    no_low_search: bool,
}

/// Analysis output with the acquisition parameters that produced it
#[derive(Serialize)]
struct HotspotReport<'a> {
    #[serde(flatten)]
    result: &'a AnalysisResult,
    variable: Variable,
    year: u16,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn check_year(year: u16) -> Result<()> {
    if !AVAILABLE_YEARS.contains(&year) {
        anyhow::bail!(
            "No data for {}. Available years: {}-{}",
            year,
            AVAILABLE_YEARS.start(),
            AVAILABLE_YEARS.end()
        );
    }
    Ok(())
}

fn parse_statistic(s: &str) -> Result<StatisticKind> {
    match s.to_lowercase().as_str() {
        "gistar" | "gi" | "getis-ord" => Ok(StatisticKind::GetisOrd),
        "moran" | "lisa" => Ok(StatisticKind::LocalMoran),
        _ => anyhow::bail!("Unknown statistic: {}. Use gistar or moran.", s),
    }
}

fn parse_strategy(weights: &str, k: usize, radius: Option<f64>) -> Result<WeightStrategy> {
    let strategy = match weights.to_lowercase().as_str() {
        "knn" => WeightStrategy::Knn { k },
        "distance" | "dist" => {
            let radius = radius.context("--radius is required for distance weights")?;
            WeightStrategy::Distance { radius }
        }
        "rook" => WeightStrategy::Contiguity { kind: ContiguityKind::Rook },
        "bishop" => WeightStrategy::Contiguity { kind: ContiguityKind::Bishop },
        "queen" => WeightStrategy::Contiguity { kind: ContiguityKind::Queen },
        _ => anyhow::bail!(
            "Unknown weights: {}. Use knn, distance, rook, bishop, or queen.",
            weights
        ),
    };
    Ok(strategy)
}

fn build_request(args: &AnalysisArgs) -> Result<AnalysisRequest> {
    let mut request = AnalysisRequest::new(
        parse_strategy(&args.weights, args.k, args.radius)?,
        parse_statistic(&args.stat)?,
    );
    request.local_moran.permutations = args.permutations;
    request.seed = args.seed;
    Ok(request)
}

fn area_query(area: &AreaArgs) -> Result<AreaQuery> {
    check_year(area.year)?;
    Ok(AreaQuery {
        year: area.year,
        adm_cd: area.adm_cd.clone(),
        low_search: !area.no_low_search,
    })
}

fn sgis_client() -> Result<SgisClientBlocking> {
    let client = SgisClient::from_env(SgisClientOptions::default())
        .context("Failed to create SGIS client")?;
    Ok(SgisClientBlocking::new(client)?)
}

/// Regions from a local FeatureCollection.
///
/// The representative point is taken from `x`/`y` properties when present,
/// otherwise the centre of the boundary's bounding box.
fn regions_from_geojson(
    path: &Path,
    value_field: &str,
    code_field: &str,
    name_field: &str,
) -> Result<Vec<Region>> {
    let pb = spinner("Reading GeoJSON...");
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let collection: FeatureCollection =
        serde_json::from_str(&text).context("Failed to parse GeoJSON")?;
    pb.finish_and_clear();

    let mut regions = Vec::with_capacity(collection.len());
    for (idx, feature) in collection.iter().enumerate() {
        let Some(code) = feature.property_str(code_field) else {
            warn!("feature {} has no '{}', skipped", idx, code_field);
            continue;
        };
        let value = feature
            .property_f64(value_field)
            .with_context(|| format!("Region {} has no numeric '{}'", code, value_field))?;
        let name = feature.property_str(name_field).unwrap_or_default();

        let mut region = Region::new(code, name, value, f64::NAN, f64::NAN);
        region.geometry = feature.geometry.as_ref().and_then(|g| g.to_multi_polygon());

        let point = match (feature.property_f64("x"), feature.property_f64("y")) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => region.bounding_box().map(|b| b.center()),
        };
        let (x, y) = point
            .with_context(|| format!("Region {} has neither x/y nor a boundary", region.code))?;
        region.x = x;
        region.y = y;
        regions.push(region);
    }
    info!("Input: {} regions", regions.len());
    Ok(regions)
}

fn run_analysis(regions: Vec<Region>, request: &AnalysisRequest) -> Result<AnalysisResult> {
    let pb = spinner("Computing statistics...");
    let start = Instant::now();
    let result = analyze(regions, request).context("Analysis failed")?;
    pb.finish_and_clear();

    let counts = result
        .class_counts()
        .iter()
        .map(|(label, n)| format!("{}={}", label, n))
        .collect::<Vec<_>>()
        .join(", ");
    info!(
        "{} regions, {} isolated, classes: {}",
        result.metadata.region_count, result.metadata.isolated_count, counts
    );
    if let Some(g) = &result.metadata.global_moran {
        info!("Global Moran's I = {:.4} (z = {:.2}, p = {:.4})", g.i, g.z_score, g.p_value);
    }
    info!("Processing time: {:.2?}", start.elapsed());
    Ok(result)
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Saved to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Hotspot {
            year,
            variable,
            analysis,
            output,
        } => {
            check_year(year)?;
            let variable: Variable = variable.parse()?;
            let request = build_request(&analysis)?;

            let client = sgis_client()?;
            let pb = spinner("Fetching SGIS statistics and boundaries...");
            let regions = client
                .fetch_regions(year, variable)
                .context("Failed to fetch region data")?;
            pb.finish_and_clear();
            info!("Fetched {} municipalities for {}", regions.len(), year);

            let result = run_analysis(regions, &request)?;
            let report = HotspotReport {
                result: &result,
                variable,
                year,
            };
            write_json(&report, output.as_deref())?;
        }

        Commands::Analyze {
            input,
            value_field,
            code_field,
            name_field,
            analysis,
            output,
        } => {
            let request = build_request(&analysis)?;
            let regions = regions_from_geojson(&input, &value_field, &code_field, &name_field)?;
            let result = run_analysis(regions, &request)?;
            write_json(&result, output.as_deref())?;
        }

        Commands::Population { area, output } => {
            let query = area_query(&area)?;
            let client = sgis_client()?;
            let pb = spinner("Fetching population statistics...");
            let items = client.population(&query).context("Population request failed")?;
            pb.finish_and_clear();
            write_json(&items, output.as_deref())?;
        }

        Commands::Boundary {
            area,
            wgs84,
            output,
        } => {
            let query = area_query(&area)?;
            let client = sgis_client()?;
            let pb = spinner("Fetching boundaries...");
            let mut boundary = client.boundary(&query).context("Boundary request failed")?;
            pb.finish_and_clear();
            if wgs84 {
                boundary_to_wgs84(&mut boundary)?;
            }
            info!("{} features", boundary.len());
            write_json(&boundary, output.as_deref())?;
        }

        Commands::Token => {
            let client = sgis_client()?;
            println!("{}", client.access_token()?);
        }

        Commands::Years => {
            for year in AVAILABLE_YEARS {
                println!("{}", year);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy() {
        assert_eq!(parse_strategy("knn", 4, None).unwrap(), WeightStrategy::Knn { k: 4 });
        assert_eq!(
            parse_strategy("Queen", 8, None).unwrap(),
            WeightStrategy::Contiguity { kind: ContiguityKind::Queen }
        );
        assert_eq!(
            parse_strategy("distance", 8, Some(5000.0)).unwrap(),
            WeightStrategy::Distance { radius: 5000.0 }
        );
        assert!(parse_strategy("distance", 8, None).is_err());
        assert!(parse_strategy("hex", 8, None).is_err());
    }

    #[test]
    fn test_parse_statistic() {
        assert_eq!(parse_statistic("gistar").unwrap(), StatisticKind::GetisOrd);
        assert_eq!(parse_statistic("MORAN").unwrap(), StatisticKind::LocalMoran);
        assert!(parse_statistic("geary").is_err());
    }

    #[test]
    fn test_check_year() {
        assert!(check_year(2015).is_ok());
        assert!(check_year(2023).is_ok());
        assert!(check_year(2014).is_err());
        assert!(check_year(2024).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["hotspot", "hotspot"]).unwrap();
        match cli.command {
            Commands::Hotspot {
                year,
                variable,
                analysis,
                ..
            } => {
                assert_eq!(year, 2023);
                assert_eq!(variable, "population");
                assert_eq!(analysis.stat, "gistar");
                assert_eq!(analysis.weights, "knn");
                assert_eq!(analysis.k, 8);
                assert_eq!(analysis.permutations, 199);
            }
            _ => panic!("expected hotspot command"),
        }
    }

    #[test]
    fn test_regions_from_geojson() {
        let dir = std::env::temp_dir().join(format!("hotspot-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("regions.geojson");
        std::fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[
              {"type":"Feature","properties":{"adm_cd":"11010","adm_nm":"a","pop":"12"},
               "geometry":{"type":"Polygon","coordinates":[[[0,0],[2,0],[2,2],[0,2],[0,0]]]}},
              {"type":"Feature","properties":{"adm_cd":"11020","adm_nm":"b","pop":7,"x":10.0,"y":20.0},
               "geometry":null}
            ]}"#,
        )
        .unwrap();

        let regions = regions_from_geojson(&path, "pop", "adm_cd", "adm_nm").unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].value, 12.0);
        assert_eq!(regions[0].coord(), (1.0, 1.0));
        assert!(regions[0].geometry.is_some());
        assert_eq!(regions[1].coord(), (10.0, 20.0));
        assert!(regions_from_geojson(&path, "missing", "adm_cd", "adm_nm").is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
