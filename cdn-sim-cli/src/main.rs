//! Reference CLI for the CDN simulation engine.
//!
//! Reads a JSON request (§6 input schema) from a file or stdin, synthesizes a
//! workload, drives `cdn-sim-core` to completion, and writes the §6 output
//! schema as JSON to a file or stdout. This binary is the "HTTP-style request
//! handler" and "workload synthesis" collaborators the core engine declares
//! out of scope — a runnable example, not part of the engine's contract.

mod input;
mod workload;

use std::path::PathBuf;

use anyhow::{Context, Result};
use cdn_sim_core::{Engine, SimConfig, World};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Time horizon over which synthesized requests are created, matching §6.
const DEFAULT_TIME_HORIZON_MS: u64 = 10_000;
const DEFAULT_SUB_USERS_PER_USER: usize = 100;
const DEFAULT_REQUESTS_PER_SUB_USER: usize = 20;

/// Run a discrete-event CDN simulation from a JSON topology/config request.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON simulation request. Reads stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path to write the JSON simulation output. Writes stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seed for workload synthesis. The engine itself is deterministic; this
    /// seed only controls the reference workload generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of synthetic sub-users generated per input user coordinate.
    #[arg(long, default_value_t = DEFAULT_SUB_USERS_PER_USER)]
    sub_users_per_user: usize,

    /// Number of requests synthesized per sub-user.
    #[arg(long, default_value_t = DEFAULT_REQUESTS_PER_SUB_USER)]
    requests_per_sub_user: usize,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let request = input::read_request(cli.input.as_deref())?;
    let cache_size_for_synthesis = request.cache_size.max(1) as u32;

    let node_coordinates = request.node_coordinates_km();
    let user_coordinates = request.user_coordinates_km();
    let origin_coordinate = request.origin_coordinate();
    let cache_policy = request.cache_policy_tag()?;

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let (synthetic_users, catalog) = workload::synthesize(
        &mut rng,
        &user_coordinates,
        cache_size_for_synthesis,
        cli.sub_users_per_user,
        cli.requests_per_sub_user,
        DEFAULT_TIME_HORIZON_MS,
    );

    let expanded_user_coordinates: Vec<_> = synthetic_users.iter().map(|u| u.coordinate).collect();
    let workloads: Vec<_> = synthetic_users.into_iter().map(|u| u.workload).collect();

    tracing::info!(
        nodes = node_coordinates.len(),
        users = expanded_user_coordinates.len(),
        catalog_size = catalog.len(),
        "building simulation world"
    );

    let world = World::new(
        &node_coordinates,
        &expanded_user_coordinates,
        origin_coordinate,
        cache_policy,
        cache_size_for_synthesis,
    )
    .context("building simulation topology")?;

    let config = SimConfig::try_from(request.raw_config()).context("validating simulation config")?;

    let mut engine = Engine::new(world, config);
    for item in catalog {
        engine.world.origin.publish(item);
    }
    engine.schedule_workloads(&workloads);

    tracing::info!("running simulation");
    engine.run();

    let output = cdn_sim_core::summarize(&engine);
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("serializing simulation output")?;

    match cli.output {
        Some(path) => std::fs::write(&path, rendered)
            .with_context(|| format!("writing output to {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(())
}
