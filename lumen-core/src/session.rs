use rand::RngCore;
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 32;

/// Opaque bearer token handed to the browser. Only its digest is persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Accept a client-supplied value only if it has the shape of a token we issue.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let well_formed =
            raw.len() == TOKEN_BYTES * 2 && raw.bytes().all(|b| b.is_ascii_hexdigit());
        well_formed.then(|| Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::SessionToken;

    #[test]
    fn generated_tokens_parse_back() {
        let token = SessionToken::generate();
        assert_eq!(token.as_str().len(), 64);
        assert_eq!(SessionToken::parse(token.as_str()), Some(token));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(SessionToken::generate(), SessionToken::generate());
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(SessionToken::parse("").is_none());
        assert!(SessionToken::parse("abc").is_none());
        assert!(SessionToken::parse(&"z".repeat(64)).is_none());
    }

    #[test]
    fn digest_is_stable_and_differs_from_token() {
        let token = SessionToken::parse(&"ab".repeat(32)).unwrap();
        assert_eq!(token.digest(), token.digest());
        assert_ne!(token.digest(), token.as_str());
        assert_eq!(token.digest().len(), 64);
    }

    #[test]
    fn debug_does_not_leak_token() {
        let token = SessionToken::generate();
        assert!(!format!("{token:?}").contains(token.as_str()));
    }
}
