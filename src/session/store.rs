use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// Persisted session layout, the desktop counterpart of the original
/// browser key/value store: login flag, bearer token, numeric user id,
/// and the cached first/last name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub logged_in: bool,
    pub auth_token: Option<String>,
    pub user_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Reads and writes the session file under the user's data directory:
/// - Linux: ~/.local/share/flowrspot/session.json
/// - macOS: ~/Library/Application Support/flowrspot/session.json
/// - Windows: %APPDATA%\flowrspot\session.json
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn open() -> Self {
        Self::at(default_path())
    }

    /// Store backed by an explicit file path (tests use a temp location).
    pub fn at(path: PathBuf) -> Self {
        SessionStore { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted session; a missing or unreadable file yields a
    /// logged-out default.
    pub fn load(&self) -> PersistedSession {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return PersistedSession::default(),
        };

        match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(err) => {
                eprintln!("⚠️  Ignoring corrupt session file: {err}");
                PersistedSession::default()
            }
        }
    }

    pub fn save(&self, session: &PersistedSession) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, json)
    }

    /// Remove the session file; clearing an already-missing file is fine.
    pub fn clear(&self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != io::ErrorKind::NotFound {
                eprintln!("⚠️  Could not clear session file: {err}");
            }
        }
    }
}

fn default_path() -> PathBuf {
    let mut path = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir);

    path.push("flowrspot");
    path.push("session.json");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> SessionStore {
        let path = std::env::temp_dir()
            .join(format!("flowrspot-store-{}-{name}", std::process::id()))
            .join("session.json");
        SessionStore::at(path)
    }

    #[test]
    fn round_trips_a_session() {
        let store = temp_store("round-trip");
        let session = PersistedSession {
            logged_in: true,
            auth_token: Some("token-123".into()),
            user_id: Some(9),
            first_name: Some("Mara".into()),
            last_name: Some("K".into()),
        };

        store.save(&session).unwrap();
        assert_eq!(store.load(), session);

        store.clear();
    }

    #[test]
    fn missing_file_loads_logged_out_default() {
        let store = temp_store("missing");
        store.clear();
        assert_eq!(store.load(), PersistedSession::default());
    }

    #[test]
    fn clear_removes_the_file() {
        let store = temp_store("clear");
        store.save(&PersistedSession::default()).unwrap();
        store.clear();
        assert!(!store.path().exists());
        // Clearing twice must not fail either.
        store.clear();
    }

    #[test]
    fn corrupt_file_loads_logged_out_default() {
        let store = temp_store("corrupt");
        if let Some(parent) = store.path().parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.load(), PersistedSession::default());
        store.clear();
    }
}
