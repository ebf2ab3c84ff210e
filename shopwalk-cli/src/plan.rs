//! Plan command implementation for the Shopwalk CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use shopwalk_core::{
    Destination, HaversineDistance, PlanResponse, PlanStrategy, Planner, ShoppingRequest,
};
use shopwalk_data::routing::{HttpDistanceProvider, HttpDistanceProviderConfig};
use shopwalk_solver_astar::{AStarPlanner, AStarPlannerConfig, ClosedSetPolicy};
use std::io::{BufReader, Write};
use std::time::Duration;

use crate::fs::{file_is_file, open_utf8_file};
use crate::{
    ARG_DEADLINE_MS, ARG_MAX_EXPANSIONS, ARG_MAX_SEARCH_DESTINATIONS, ARG_OSRM_BASE_URL,
    ARG_OSRM_PROFILE, ARG_PLAN_REQUEST, ARG_STRICT_CLOSED_SET, ARG_TIMEOUT_SECS, CliError,
    ENV_PLAN_REQUEST,
};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan a visiting order for the stores in a JSON shopping \
                 request. Leg distances come from an OSRM routing service when \
                 one is configured and from great-circle distances otherwise. \
                 Options can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Plan a shopping route"
)]
#[ortho_config(prefix = "SHOPWALK")]
pub(crate) struct PlanArgs {
    /// Path to a JSON file containing a shopping request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// OSRM routing profile (defaults to "driving").
    #[arg(long = ARG_OSRM_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) osrm_profile: Option<String>,
    /// Routing-service timeout in seconds (defaults to 10).
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Requests with more stores than this are planned greedily.
    #[arg(long = ARG_MAX_SEARCH_DESTINATIONS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_search_destinations: Option<usize>,
    /// Abandon the search after expanding this many states.
    #[arg(long = ARG_MAX_EXPANSIONS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_expansions: Option<u64>,
    /// Abandon the search after this many milliseconds.
    #[arg(long = ARG_DEADLINE_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) deadline_ms: Option<u64>,
    /// Re-expand search states when a cheaper path reaches them.
    #[arg(
        long = ARG_STRICT_CLOSED_SET,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) strict_closed_set: Option<bool>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// OSRM base URL; `None` prices legs with the haversine distance only.
    pub(crate) osrm_base_url: Option<String>,
    /// OSRM routing profile.
    pub(crate) osrm_profile: String,
    /// Routing-service timeout.
    pub(crate) timeout: Duration,
    /// Planner tuning.
    pub(crate) planner: AStarPlannerConfig,
}

impl PlanConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.request_path, ARG_PLAN_REQUEST)
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn provider_config(&self, base_url: &str) -> HttpDistanceProviderConfig {
        HttpDistanceProviderConfig::new(base_url)
            .with_profile(self.osrm_profile.clone())
            .with_timeout(self.timeout)
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_REQUEST,
            env: ENV_PLAN_REQUEST,
        })?;

        let defaults = HttpDistanceProviderConfig::default();
        let timeout = match args.timeout_secs {
            Some(0) => {
                return Err(CliError::InvalidArgument {
                    field: ARG_TIMEOUT_SECS,
                    reason: "must be at least one second",
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.timeout,
        };

        let mut planner = AStarPlannerConfig::default();
        if let Some(max) = args.max_search_destinations {
            planner = planner.with_max_search_destinations(max);
        }
        if let Some(max) = args.max_expansions {
            planner = planner.with_max_expansions(max);
        }
        if let Some(ms) = args.deadline_ms {
            planner = planner.with_deadline(Duration::from_millis(ms));
        }
        if args.strict_closed_set.unwrap_or(false) {
            planner = planner.with_closed_set_policy(ClosedSetPolicy::CheapestCost);
        }

        Ok(Self {
            request_path,
            osrm_base_url: args.osrm_base_url.filter(|url| !url.trim().is_empty()),
            osrm_profile: args.osrm_profile.unwrap_or(defaults.profile),
            timeout,
            planner,
        })
    }
}

/// Builds a planner instance for the current plan invocation.
pub(crate) trait PlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Box<dyn Planner>, CliError>;
}

pub(crate) struct DefaultPlannerBuilder;

impl PlannerBuilder for DefaultPlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Box<dyn Planner>, CliError> {
        let Some(base_url) = config.osrm_base_url.as_deref() else {
            log::debug!("no routing service configured; using haversine distances");
            return Ok(Box::new(AStarPlanner::with_config(
                HaversineDistance,
                config.planner.clone(),
            )));
        };
        let provider = HttpDistanceProvider::with_config(config.provider_config(base_url))
            .map_err(|source| CliError::BuildDistanceProvider {
                base_url: base_url.to_owned(),
                source,
            })?;
        Ok(Box::new(AStarPlanner::with_config(
            provider,
            config.planner.clone(),
        )))
    }
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultPlannerBuilder;
    run_plan_with(args, &builder, &mut stdout)
}

pub(crate) fn run_plan_with(
    args: PlanArgs,
    builder: &dyn PlannerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let response = execute_plan(args, builder)?;
    write_plan_response(writer, &response)
}

fn execute_plan(args: PlanArgs, builder: &dyn PlannerBuilder) -> Result<PlanResponse, CliError> {
    let config = resolve_plan_config(args)?;
    let shopping = load_shopping_request(&config.request_path)?;
    let request = shopping
        .into_plan_request()
        .map_err(|source| CliError::InvalidRequest {
            path: config.request_path.clone(),
            source,
        })?;
    let planner = builder.build(&config)?;
    let response = planner
        .plan(&request)
        .map_err(|source| CliError::Plan { source })?;
    let diagnostics = &response.diagnostics;
    log::info!(
        "planned {} stops ({:?}) in {:?}: {} states expanded, {} distance fallbacks",
        response.route.len(),
        diagnostics.strategy,
        diagnostics.plan_time,
        diagnostics.states_expanded,
        diagnostics.distance_fallbacks
    );
    Ok(response)
}

fn resolve_plan_config(args: PlanArgs) -> Result<PlanConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Loads a JSON-encoded [`ShoppingRequest`] from disk.
pub(crate) fn load_shopping_request(path: &Utf8Path) -> Result<ShoppingRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

/// JSON shape written to stdout.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlanOutput {
    pub(crate) optimized_route: Vec<Destination>,
    pub(crate) total_miles: f64,
    pub(crate) strategy: PlanStrategy,
}

impl From<&PlanResponse> for PlanOutput {
    fn from(response: &PlanResponse) -> Self {
        Self {
            optimized_route: response.route.destinations.clone(),
            total_miles: response.route.total_miles,
            strategy: response.diagnostics.strategy,
        }
    }
}

fn write_plan_response(writer: &mut dyn Write, response: &PlanResponse) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(&PlanOutput::from(response))
        .map_err(CliError::SerialiseRoute)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
