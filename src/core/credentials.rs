//! Remote authentication tokens.
//!
//! Token storage and account linking live outside this crate. A [`CredentialProvider`]
//! only answers "is there a token for this identity right now".

use std::collections::HashMap;
use std::fmt;

/// Remote authentication token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

pub trait CredentialProvider {
    fn get_token(&self, identity: &str) -> Option<Token>;
}

/// Environment variable consulted when no identity-specific token is set
pub const TOKEN_ENV_VAR: &str = "GIT_CONDUCTOR_TOKEN";

/// Reads `GIT_CONDUCTOR_TOKEN_<IDENTITY>`, falling back to `GIT_CONDUCTOR_TOKEN`
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Name of the identity-specific variable, e.g. `octo-cat` → `GIT_CONDUCTOR_TOKEN_OCTO_CAT`
    pub fn variable_for(identity: &str) -> String {
        let suffix: String = identity
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{TOKEN_ENV_VAR}_{suffix}")
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn get_token(&self, identity: &str) -> Option<Token> {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(Token::new)
        };

        read(&Self::variable_for(identity)).or_else(|| read(TOKEN_ENV_VAR))
    }
}

/// Fixed identity → token map
#[derive(Debug, Default, Clone)]
pub struct StaticCredentialProvider {
    tokens: HashMap<String, Token>,
}

impl StaticCredentialProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, identity: impl Into<String>, token: impl Into<String>) -> Self {
        self.tokens.insert(identity.into(), Token::new(token));
        self
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_token(&self, identity: &str) -> Option<Token> {
        self.tokens.get(identity).cloned()
    }
}
