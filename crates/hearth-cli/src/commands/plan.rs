use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use hearth_core::{HearthConfig, VillageSnapshot};
use hearth_placement::{
    Plan, SnapshotOracle, config_to_options, plan_batch_assignment, plan_single_newest_assignment,
    snapshot_to_homesteads, snapshot_to_villagers,
};

use super::config::load_config;

pub fn plan(snapshot: &str, config: Option<&str>, newest: bool, format: &str) -> anyhow::Result<()> {
    let snapshot = load_snapshot(snapshot)?;
    let config = load_config(config)?;
    let plan = build_plan(&snapshot, &config, newest);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        _ => {
            print!("{}", format_plan(&plan));
        }
    }

    Ok(())
}

pub fn load_snapshot(path: &str) -> anyhow::Result<VillageSnapshot> {
    VillageSnapshot::from_file(Path::new(path)).with_context(|| format!("failed to load snapshot {path}"))
}

/// Plan against the snapshot without touching it.
pub fn build_plan(snapshot: &VillageSnapshot, config: &HearthConfig, newest: bool) -> Plan {
    let villagers = snapshot_to_villagers(snapshot);
    let homesteads = snapshot_to_homesteads(snapshot, config.housing.include_outposts);
    let options = config_to_options(config);
    let oracle = SnapshotOracle::new(snapshot);

    if newest {
        plan_single_newest_assignment(&villagers, &homesteads, &options, &oracle)
    } else {
        plan_batch_assignment(&villagers, &homesteads, &options, &oracle)
    }
}

pub fn format_plan(plan: &Plan) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Plan: {} assignment(s), {} unplaced, {} bed(s) left",
        plan.assignments.len(),
        plan.unplaced,
        plan.remaining_capacity
    );
    for a in &plan.assignments {
        let _ = writeln!(
            out,
            "  villager {:<6} -> {:<20} occupancy {:<3} score {:.2}",
            a.villager, a.homestead, a.final_occupancy, a.predicted_score
        );
    }
    if !plan.diagnostics.fallbacks.is_empty() {
        let _ = writeln!(out, "  scored by house tier: {}", plan.diagnostics.fallbacks.join(", "));
    }
    out
}
