use std::{
    fs,
    path::{Path, PathBuf},
    sync::mpsc,
    time::Duration,
};

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};

use crate::{
    entity::{Entity, Folio},
    error::FolioError,
    Feed, FolioEngine, FOLIO_FILE,
};

/// Build the feed of the site at `source` into `dest`, then keep
/// rebuilding on changes if `watch` is true.
pub fn watch_build<P: AsRef<Path>>(
    source: P,
    dest: P,
    watch: bool,
    base_url: Option<String>,
) -> Result<()> {
    let (source, folio) = locate_root_folio_folder(fs::canonicalize(source)?)?;
    // Absolute, so changes of the written feed can be told apart.
    fs::create_dir_all(&dest)?;
    let dest = fs::canonicalize(dest)?;
    let mut engine = FolioEngine::new(source, dest, folio)?.with_base_url(base_url);
    engine.build(false)?;

    if watch {
        tracing::info!("Watching `{}`...", engine.source.display());
        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(Duration::from_millis(500), None, tx)?;
        debouncer
            .watcher()
            .watch(&engine.source, RecursiveMode::Recursive)?;

        loop {
            match rx.recv() {
                Ok(Ok(events)) => {
                    // Writing the feed into a dest dir below the source
                    // dir must not trigger another build.
                    if events.iter().all(|event| event.path.starts_with(&engine.dest)) {
                        continue;
                    }
                    if let Err(err) = engine.build(true) {
                        tracing::error!("Build error: {err:?}");
                    }
                }
                Ok(Err(errors)) => {
                    for err in errors {
                        tracing::error!("Watch error: {err:?}");
                    }
                }
                // The debouncer hung up, nothing more to watch.
                Err(_) => break,
            }
        }
    }
    Ok(())
}

/// Aggregate the feed of the site at `source` without writing anything.
pub fn check<P: AsRef<Path>>(source: P) -> Result<Feed> {
    let (source, mut folio) = locate_root_folio_folder(fs::canonicalize(source)?)?;
    folio.parse(&source)?;
    Ok(folio.feed())
}

/// Locate the folder containing the root `folio.toml`, starting at `path`
/// and walking up the parents. Returns the folder and the parsed config.
pub fn locate_root_folio_folder(path: PathBuf) -> Result<(PathBuf, Folio)> {
    let mut current = Some(path.as_path());
    while let Some(dir) = current {
        if dir.join(FOLIO_FILE).is_file() {
            let folio = Folio::parse_from_toml(dir)?;
            return Ok((dir.to_path_buf(), folio));
        }
        current = dir.parent();
    }
    Err(FolioError::RootNotFound(path).into())
}
