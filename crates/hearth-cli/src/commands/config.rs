use std::path::Path;

use anyhow::Context;
use hearth_core::HearthConfig;
use tracing::info;

/// File name looked up in the working directory when `--config` is omitted.
pub const CONFIG_FILE: &str = "hearth.toml";

pub fn init(path: &str) -> anyhow::Result<()> {
    let output = Path::new(path).join(CONFIG_FILE);
    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }

    std::fs::write(&output, HearthConfig::scaffold().to_toml_string()?)?;
    info!(path = %output.display(), "wrote config scaffold");
    println!("✓ Generated {}", output.display());
    Ok(())
}

/// Load `--config`, or `./hearth.toml` if present, or defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<HearthConfig> {
    load_config_in(path.map(Path::new), Path::new("."))
}

fn load_config_in(path: Option<&Path>, dir: &Path) -> anyhow::Result<HearthConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = dir.join(CONFIG_FILE);
            if !default.exists() {
                return Ok(HearthConfig::default());
            }
            default
        }
    };
    HearthConfig::from_file(&path).with_context(|| format!("failed to load {}", path.display()))
}
