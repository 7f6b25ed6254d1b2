use rstnav_core::config::Config;
use rstnav_core::storage::IndexStore;
use tracing::info;

pub fn run(config: &Config, repo: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let store = IndexStore::new(&config.index_dir);

    match repo {
        Some(repo) => {
            info!("Clearing RST files of {} in {}...", repo, store.root().display());
            let removed = store.remove(Some(repo))?;
            info!("Removed {} file(s).", removed);
        }
        None => {
            info!("Clearing all RST files in {}...", store.root().display());
            let removed = store.remove(None)?;
            info!("Removed {} file(s).", removed);
        }
    }
    Ok(())
}
