use std::path::Path;

use hearth_assign::{AssignmentService, SnapshotVillage};
use tracing::info;

use super::config::load_config;
use super::plan::{format_plan, load_snapshot};

pub fn assign(snapshot: &str, config: Option<&str>, newest: bool, out: Option<&str>) -> anyhow::Result<()> {
    let village = SnapshotVillage::new(load_snapshot(snapshot)?);
    let mut service = AssignmentService::new(village, load_config(config)?);

    let outcome = service.assign_homeless(newest)?;
    print!("{}", format_plan(&outcome.plan));
    for failed in &outcome.report.failed {
        eprintln!(
            "  ✗ villager {} -> {}: {}",
            failed.assignment.villager, failed.assignment.homestead, failed.error
        );
    }

    let placed = outcome.report.placed_count();
    if placed == 0 {
        info!(snapshot, "nothing placed, snapshot left unchanged");
        println!("✓ Placed 0 villagers");
        return Ok(());
    }

    let output = Path::new(out.unwrap_or(snapshot));
    service.into_village().into_snapshot().write_to_file(output)?;
    info!(placed, output = %output.display(), "wrote updated snapshot");
    println!("✓ Placed {placed} villager(s), wrote {}", output.display());
    Ok(())
}

pub fn beds(snapshot: &str, config: Option<&str>, format: &str) -> anyhow::Result<()> {
    let village = SnapshotVillage::new(load_snapshot(snapshot)?);
    let service = AssignmentService::new(village, load_config(config)?);
    let stats = service.bed_stats()?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        _ => {
            println!("Beds: {} total, {} used, {} free", stats.total, stats.used, stats.free);
        }
    }
    Ok(())
}

pub fn release(snapshot: &str, config: Option<&str>, out: Option<&str>) -> anyhow::Result<()> {
    let village = SnapshotVillage::new(load_snapshot(snapshot)?);
    let mut service = AssignmentService::new(village, load_config(config)?);

    let released = service.make_all_homeless()?;
    if released == 0 {
        info!(snapshot, "nobody released, snapshot left unchanged");
        println!("✓ Released 0 villagers");
        return Ok(());
    }

    let output = Path::new(out.unwrap_or(snapshot));
    service.into_village().into_snapshot().write_to_file(output)?;
    info!(released, output = %output.display(), "wrote updated snapshot");
    println!("✓ Released {released} villager(s), wrote {}", output.display());
    Ok(())
}
