use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use locate_my_city::config::Settings;
use locate_my_city::geo::{format_decimal, DistanceUnit};
use locate_my_city::location::{
    BuiltinCountries, BuiltinGazetteer, LocationDataset, NamedLocation, Place, RouteReport, RoutePlanner,
};
use locate_my_city::stats::{self, AggregateStats, LocationField};
use locate_my_city::{logging, slug, Result};

/// locate: how far is one place from another?
///
/// Computes great-circle distances and travel estimates between named
/// places, round-trips "how-far-is-X-from-Y" slugs, and summarizes
/// location datasets.
///
/// Examples:
///   locate distance "New York" London
///   locate from-me Paris --lat 51.5074 --lon -0.1278
///   locate route how-far-is-london-from-new-york --unit mi
///   locate slug encode London --from "New York"
///   locate stats --dataset rock --top 4
#[derive(Parser)]
#[command(name = "locate", version, about, long_about = None)]
struct Cli {
    /// JSON settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Distance between two named places.
    Distance {
        from: String,
        to: String,
        /// Display unit: km or mi.
        #[arg(long, default_value = "km")]
        unit: DistanceUnit,
    },

    /// Distance from your position (or the default origin) to a place.
    FromMe {
        dest: String,
        /// Your latitude (-90 to 90).
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,
        /// Your longitude (-180 to 180).
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,
        #[arg(long, default_value = "km")]
        unit: DistanceUnit,
        /// Also show country facts for the destination.
        #[arg(long)]
        details: bool,
    },

    /// Resolve a how-far-is slug.
    Route {
        slug: String,
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,
        #[arg(long, default_value = "km")]
        unit: DistanceUnit,
    },

    /// Build or parse route slugs without geocoding.
    Slug {
        #[command(subcommand)]
        action: SlugAction,
    },

    /// Most common names and regions in a dataset.
    Stats {
        /// "rock", "spring" or a path to a JSON dataset.
        #[arg(long)]
        dataset: Option<String>,
        /// Length of the most-common lists.
        #[arg(long)]
        top: Option<usize>,
        /// Only list locations whose --field equals this value.
        #[arg(long)]
        region: Option<String>,
        /// Include every location grouped by region.
        #[arg(long)]
        group: bool,
        /// Drop records repeating an earlier name, county and position.
        #[arg(long)]
        distinct: bool,
        /// Field the --region filter matches: name, region or county.
        #[arg(long, default_value = "region")]
        field: LocationField,
    },
}

#[derive(Subcommand)]
enum SlugAction {
    Encode {
        dest: String,
        /// Source place; omit for a from-me slug.
        #[arg(long)]
        from: Option<String>,
    },
    Decode {
        slug: String,
    },
}

#[derive(Serialize)]
struct StatsOutput<'a> {
    total: usize,
    top_names: &'a [(String, usize)],
    top_regions: &'a [(String, usize)],
    regions: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    by_region: Option<&'a std::collections::BTreeMap<String, Vec<NamedLocation>>>,
}

#[derive(Serialize)]
struct FilterOutput<'a> {
    field: LocationField,
    value: &'a str,
    count: usize,
    locations: Vec<&'a NamedLocation>,
}

fn main() {
    let cli = Cli::parse();

    let settings = load_settings(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(2);
    });

    logging::init_tracing(&settings.logging);
    debug!(?settings, "settings loaded");

    if let Err(e) = run(cli.command, &settings) {
        debug!(error = %e, "command failed");
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        settings.logging.level = level.to_lowercase();
    }
    if cli.log_json {
        settings.logging.json = true;
    }
    settings.validate()?;
    Ok(settings)
}

fn run(command: Command, settings: &Settings) -> Result<()> {
    let planner = RoutePlanner::new(BuiltinGazetteer::new());

    match command {
        Command::Distance { from, to, unit } => {
            let report = planner.plan_pair(&from, &to)?;
            print_route(&report, unit);
            print_json(&report)
        }
        Command::FromMe { dest, lat, lon, unit, details } => {
            let origin = settings.origin(lat, lon)?;
            let report = planner.plan_from_origin(&dest, origin)?;
            print_route(&report, unit);

            if details {
                let place = Place {
                    coordinate: report.destination.coordinate,
                    display_name: report.destination.display_name.clone(),
                };
                let facts = planner.place_details(&place, &BuiltinCountries, None)?;
                eprintln!(
                    "  Currency: {}  Languages: {}  Time zone: {}",
                    facts.country.currency,
                    facts.country.languages.join(", "),
                    facts.country.timezone
                );
                for route in facts.neighbor_routes.iter().chain(&facts.popular_routes) {
                    eprintln!("  {}  /{}", route.label, route.slug);
                }
                return print_json(&serde_json::json!({ "route": report, "details": facts }));
            }
            print_json(&report)
        }
        Command::Route { slug, lat, lon, unit } => {
            let origin = settings.origin(lat, lon)?;
            let report = planner.plan_slug(&slug, origin)?;
            print_route(&report, unit);
            print_json(&report)
        }
        Command::Slug { action: SlugAction::Encode { dest, from } } => {
            let encoded = match from {
                Some(source) => slug::encode_pair(&source, &dest)?,
                None => slug::encode_single(&dest)?,
            };
            println!("{encoded}");
            Ok(())
        }
        Command::Slug { action: SlugAction::Decode { slug } } => {
            let decoded = slug::decode(&slug)?;
            print_json(&decoded)
        }
        Command::Stats { dataset, top, region, group, distinct, field } => {
            let mut settings = settings.clone();
            if let Some(k) = top {
                settings.top_k = k;
            }
            settings.validate()?;

            let source = settings.dataset_source(dataset.as_deref());
            let mut locations = source.load_location_dataset()?;
            if distinct {
                let before = locations.len();
                locations = stats::distinct_locations(&locations).into_iter().cloned().collect();
                debug!(dropped = before - locations.len(), "removed duplicate records");
            }
            info!(records = locations.len(), "dataset ready");

            if let Some(value) = region {
                let members = stats::filter_by_field(&locations, |l| field.select(l), &value.as_str());
                eprintln!("  {} locations matching {}", members.len(), value);
                return print_json(&FilterOutput { field, value: &value, count: members.len(), locations: members });
            }

            let aggregate = AggregateStats::compute(&locations, settings.top_k);
            print_stats(&aggregate);
            print_json(&StatsOutput {
                total: aggregate.total(),
                top_names: &aggregate.top_names,
                top_regions: &aggregate.top_regions,
                regions: aggregate.regions(),
                by_region: group.then_some(&aggregate.by_region),
            })
        }
    }
}

fn print_route(report: &RouteReport, unit: DistanceUnit) {
    eprintln!("  \u{1F4CD} {} \u{2192} {}", report.source.label, report.destination.label);
    eprintln!("     from {} ({})", report.source.display_name, format_decimal(report.source.coordinate));
    eprintln!("     to   {} ({})", report.destination.display_name, format_decimal(report.destination.coordinate));
    eprintln!("  Distance: {}", report.distance.format(unit));
    for (mode, hours) in report.travel.labels() {
        eprintln!("  {:<8} {}", mode, hours);
    }
    eprintln!("  Share: /{}", report.slug);
}

fn print_stats(aggregate: &AggregateStats) {
    eprintln!("  {} locations in {} regions", aggregate.total(), aggregate.by_region.len());
    for (name, count) in &aggregate.top_names {
        eprintln!("  {:<24} {}", name, count);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
