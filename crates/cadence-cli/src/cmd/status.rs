use anyhow::Context;
use cadence_core::config::Settings;
use cadence_core::status::StatusReport;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let settings = Settings::load(root).context("failed to load settings")?;
    let report = StatusReport::gather(root, &settings);
    println!("{}", report.render());
    Ok(())
}
