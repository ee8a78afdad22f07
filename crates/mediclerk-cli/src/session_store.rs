//! The signed-in session, persisted beside the config between runs.

use std::path::{Path, PathBuf};

use mediclerk_api::session::Session;

use crate::store::{remove_if_present, write_private};

const SESSION_FILE: &str = "session.json";

pub fn session_path(dir: &Path) -> PathBuf {
    dir.join(SESSION_FILE)
}

/// The saved session, if any. An unreadable file is treated as signed out.
pub fn load_session(dir: &Path) -> eyre::Result<Option<Session>> {
    let path = session_path(dir);
    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(eyre::eyre!("failed to read {}: {e}", path.display())),
    };
    match serde_json::from_str::<Session>(&contents) {
        Ok(session) if !session.access_token.is_empty() => Ok(Some(session)),
        Ok(_) => Ok(None),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
            Ok(None)
        }
    }
}

pub fn save_session(dir: &Path, session: &Session) -> eyre::Result<()> {
    write_private(&session_path(dir), &serde_json::to_string_pretty(session)?)
}

pub fn clear_session(dir: &Path) -> eyre::Result<()> {
    if remove_if_present(&session_path(dir))? {
        tracing::info!("saved session removed");
    }
    Ok(())
}
