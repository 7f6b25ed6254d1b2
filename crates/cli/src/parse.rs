use rstnav_core::config::Config;
use rstnav_core::indexer::Indexer;
use rstnav_core::input::IndexInput;
use rstnav_core::storage::IndexStore;
use rstnav_core::RstError;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub fn run(
    config: &Config,
    input: &Path,
    repo: Option<String>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Reading symbol index from {}...", input.display());
    let index = IndexInput::load(input)?;

    let indexer = Indexer::new(IndexStore::new(&config.index_dir)).with_repository(repo);
    let report = indexer.run(index)?;

    for path in &report.written {
        writeln!(out, "Generated RST: {}", path.display())?;
    }
    if !report.is_success() {
        return Err(RstError::Partitions(report.failures).into());
    }
    Ok(())
}
