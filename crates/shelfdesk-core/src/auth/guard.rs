use tracing::debug;

use super::TokenStore;

/// Navigation capability for sending the user to the login entry point.
///
/// Injected rather than called directly so the UI decides what "go to
/// login" means (overlay, screen swap) and tests can assert that a
/// redirect was requested.
pub trait Navigator: Send + Sync {
    fn request_login(&self);
}

/// The startup check that a credential exists before any other work.
///
/// The guard does not validate the token against the server - that
/// would cost a round trip on every launch. An expired-but-present
/// token is allowed through and caught by the first real API call.
pub struct SessionGuard {
    store: TokenStore,
}

impl SessionGuard {
    pub fn new(store: TokenStore) -> Self {
        Self { store }
    }

    /// Returns true when a credential is present and initialization may
    /// proceed. When absent, requests the login redirect and returns
    /// false; callers must not issue any request in that case.
    pub fn check(&self, navigator: &dyn Navigator) -> bool {
        if self.store.get().is_some() {
            true
        } else {
            debug!("No stored credential, requesting login");
            navigator.request_login();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct RecordingNavigator {
        logins: AtomicUsize,
    }

    impl Navigator for RecordingNavigator {
        fn request_login(&self) {
            self.logins.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_absent_credential_requests_login() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());
        let navigator = RecordingNavigator::default();

        let guard = SessionGuard::new(store);
        assert!(!guard.check(&navigator));
        assert_eq!(navigator.logins.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_present_credential_proceeds() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());
        store.store("tok-123", "meg").unwrap();
        let navigator = RecordingNavigator::default();

        let guard = SessionGuard::new(store);
        assert!(guard.check(&navigator));
        assert_eq!(navigator.logins.load(Ordering::SeqCst), 0);
    }
}
