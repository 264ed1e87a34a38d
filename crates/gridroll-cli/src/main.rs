//! gridroll — rolling-maintenance reboot planner.
//!
//! Reads a cluster snapshot, partitions the nodes into reboot groups
//! that never take both hosts of a redundant instance down together,
//! and prints the groups in reboot order (master last). Exits non-zero
//! when no safe plan exists.
//!
//! # Usage
//!
//! ```text
//! gridroll cluster.json
//! gridroll cluster.json --group rack-b --print-moves
//! gridroll cluster.json --ignore-non-redundant --format json
//! ```

use std::path::PathBuf;

use clap::Parser;

use gridroll_cli::{loader, report};
use gridroll_cli::report::RenderOptions;
use gridroll_planner::{build_plan, PlanOptions};

#[derive(Parser)]
#[command(
    name = "gridroll",
    about = "Compute a rolling-maintenance reboot plan for a cluster",
    version,
)]
struct Cli {
    /// Cluster snapshot (JSON).
    snapshot: PathBuf,

    /// Restrict planning to nodes in the named cluster group.
    #[arg(long)]
    group: Option<String>,

    /// Restrict planning to nodes carrying any of the given tags.
    #[arg(long, value_delimiter = ',')]
    node_tags: Vec<String>,

    /// Plan for offline maintenance: stopped instances also keep their
    /// hosts apart.
    #[arg(long)]
    offline_maintenance: bool,

    /// Leave nodes hosting non-redundant instances out of the plan.
    #[arg(long)]
    skip_non_redundant: bool,

    /// Do not evacuate non-redundant instances.
    #[arg(long)]
    ignore_non_redundant: bool,

    /// Emit only the first reboot group.
    #[arg(long)]
    one_step_only: bool,

    /// Include evacuation moves in the output.
    #[arg(long)]
    print_moves: bool,

    /// Suppress the header line.
    #[arg(long)]
    no_headers: bool,

    /// Treat a missing master node as a warning instead of an error.
    #[arg(long)]
    force: bool,

    /// Output format: text or json.
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Increase verbosity (-vv prints coloring statistics, -vvv dumps
    /// the conflict graph to the log).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "warn,gridroll_cluster={level},gridroll_graph={level},gridroll_planner={level}"
                ))
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let data = loader::load_snapshot(&cli.snapshot)?;

    let opts = PlanOptions {
        group: cli.group.clone(),
        node_tags: cli.node_tags.clone(),
        offline_maintenance: cli.offline_maintenance,
        skip_non_redundant: cli.skip_non_redundant,
        ignore_non_redundant: cli.ignore_non_redundant,
        one_step_only: cli.one_step_only,
        force: cli.force,
    };
    let plan = build_plan(&data, &opts)?;

    let named = report::resolve_names(&plan, &data)?;
    match cli.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&named)?),
        _ => {
            let render = RenderOptions {
                print_moves: cli.print_moves,
                no_headers: cli.no_headers,
                verbose: cli.verbose,
            };
            print!("{}", report::format_text(&named, &render));
        }
    }

    Ok(())
}
