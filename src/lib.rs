pub mod api;
pub mod library;
pub mod models;
pub mod overlay;
pub mod playback;
pub mod selection;
pub mod session;
pub mod settings;
pub mod utils;

#[cfg(test)]
mod testing;

use anyhow::{bail, Context, Result};

use api::{ClipApi, HttpClipApi};
use library::{LibraryAction, LibraryState};
use settings::SettingsStore;

pub use session::{ReviewSession, ViewSnapshot};

const ENABLE_LOGS: bool = true;

/// Headless entry point: loads settings, pulls the clip library from the
/// configured server and logs what the review list would show.
pub fn run() -> Result<()> {
    utils::init_logging();
    log_info!("Garden Eye viewer starting up...");

    let store = SettingsStore::from_env()?;
    let settings = store.viewer();
    let api = HttpClipApi::new(&settings.server_url)
        .with_context(|| format!("invalid server url {}", settings.server_url))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let library = runtime.block_on(async {
        let library = LibraryState::new(settings.default_sort);
        match api.list_clips().await {
            Ok(clips) => library.reduce(LibraryAction::Loaded(clips)),
            Err(err) => library.reduce(LibraryAction::LoadFailed(err.to_string())),
        }
    });

    if let Some(message) = library.load_error() {
        bail!("could not load clips from {}: {message}", api.base_url());
    }

    log_info!(
        "{} of {} clips visible, object classes: {:?}",
        library.visible().len(),
        library.all().len(),
        library.object_classes()
    );
    for clip in library.visible() {
        let modified = clip
            .modified_at()
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".into());
        log_info!(
            "{} | {} | {} | movement {:?}",
            clip.name,
            clip.size_label(),
            modified,
            clip.movement.score()
        );
    }
    Ok(())
}
