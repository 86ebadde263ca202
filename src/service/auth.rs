/// Credential check used by login. Must be synchronous and free of side
/// effects on failure.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, identity: &str, credential: &str) -> bool;
}

/// Accepts any non-empty credential for an identity containing `@`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockAuthenticator;

impl Authenticator for MockAuthenticator {
    fn authenticate(&self, identity: &str, credential: &str) -> bool {
        !credential.is_empty() && identity.contains('@')
    }
}
