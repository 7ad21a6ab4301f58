use cadence_core::context::Invocation;
use cadence_core::render;
use std::path::Path;

pub fn run(root: &Path, command: &str, args: Invocation) -> anyhow::Result<()> {
    let output = render::render(root, command, args)?;
    println!("{output}");
    Ok(())
}
