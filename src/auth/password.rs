/// How stored credentials are produced and compared. Swapping in a hashing
/// scheme means implementing this trait; callers stay unchanged.
pub trait CredentialCheck: Send + Sync {
    /// Value to persist for a newly registered password.
    fn encode(&self, password: &str) -> String;

    fn verify(&self, password: &str, stored: &str) -> bool;
}

/// Passwords stored verbatim and compared by exact match.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextCredentials;

impl CredentialCheck for PlaintextCredentials {
    fn encode(&self, password: &str) -> String {
        password.to_owned()
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        password == stored
    }
}
