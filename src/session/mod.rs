/// Session context: who is logged in, and with what token.
///
/// The original kept this as ambient mutable globals read from browser
/// storage; here it is an explicitly scoped object owned by the
/// application shell. Initialization reads the persisted store once at
/// startup; teardown clears both memory and disk on logout or when the
/// server reports the token expired.

pub mod store;

use crate::api::models::User;
use store::{PersistedSession, SessionStore};

#[derive(Debug)]
pub struct Session {
    store: SessionStore,
    current: PersistedSession,
}

impl Session {
    /// Read the session persisted by a previous run.
    pub fn load() -> Self {
        Self::with_store(SessionStore::open())
    }

    pub fn with_store(store: SessionStore) -> Self {
        let current = store.load();
        if current.logged_in {
            println!(
                "🔑 Restored session for user {}",
                current.user_id.unwrap_or_default()
            );
        }
        Session { store, current }
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.logged_in && self.current.auth_token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        if self.current.logged_in {
            self.current.auth_token.as_deref()
        } else {
            None
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.current.user_id
    }

    pub fn first_name(&self) -> Option<&str> {
        self.current.first_name.as_deref()
    }

    /// Name shown in the header; falls back while the profile fetch is
    /// still in flight.
    pub fn display_name(&self) -> String {
        match (&self.current.first_name, &self.current.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => "there".to_string(),
        }
    }

    /// Start a session from a fresh bearer token. The user id and names
    /// arrive separately via [`Session::attach_user`].
    pub fn begin(&mut self, auth_token: String) {
        self.current = PersistedSession {
            logged_in: true,
            auth_token: Some(auth_token),
            user_id: None,
            first_name: None,
            last_name: None,
        };
        self.persist();
    }

    /// Cache the profile of the authenticated user.
    pub fn attach_user(&mut self, user: &User) {
        self.current.user_id = Some(user.id);
        self.current.first_name = Some(user.first_name.clone());
        self.current.last_name = Some(user.last_name.clone());
        self.persist();
    }

    /// The server answered 401: drop the token so the user is prompted to
    /// log in again.
    pub fn expire(&mut self) {
        println!("🔒 Session expired, clearing stored credentials");
        self.current = PersistedSession::default();
        self.store.clear();
    }

    /// Explicit logout: full teardown of memory and disk state.
    pub fn logout(&mut self) {
        self.current = PersistedSession::default();
        self.store.clear();
        println!("👋 Logged out");
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.current) {
            eprintln!("⚠️  Could not persist session: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_session(name: &str) -> Session {
        let path = std::env::temp_dir()
            .join(format!("flowrspot-session-{}-{name}", std::process::id()))
            .join("session.json");
        let store = SessionStore::at(path);
        store.clear();
        Session::with_store(store)
    }

    fn user() -> User {
        User {
            id: 9,
            first_name: "Mara".into(),
            last_name: "K".into(),
        }
    }

    #[test]
    fn begin_and_attach_then_logout() {
        let mut session = temp_session("lifecycle");
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);

        session.begin("token-123".into());
        assert!(session.is_logged_in());
        assert_eq!(session.token(), Some("token-123"));

        session.attach_user(&user());
        assert_eq!(session.user_id(), Some(9));
        assert_eq!(session.display_name(), "Mara K");

        session.logout();
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn session_survives_a_reload() {
        let path = std::env::temp_dir()
            .join(format!("flowrspot-session-{}-reload", std::process::id()))
            .join("session.json");
        let store = SessionStore::at(path.clone());
        store.clear();

        let mut session = Session::with_store(store);
        session.begin("token-123".into());
        session.attach_user(&user());

        let restored = Session::with_store(SessionStore::at(path));
        assert!(restored.is_logged_in());
        assert_eq!(restored.token(), Some("token-123"));
        assert_eq!(restored.user_id(), Some(9));

        SessionStore::at(restored.store.path().to_path_buf()).clear();
    }

    #[test]
    fn expiry_drops_the_token() {
        let mut session = temp_session("expiry");
        session.begin("token-123".into());
        session.expire();
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);
    }
}
