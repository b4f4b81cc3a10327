//! Bearer token source for upstream calls.
//!
//! The upstream catalog does not authenticate yet; the default source hands
//! out a fixed placeholder token.

use crate::infra::config::PLACEHOLDER_TOKEN;

pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_TOKEN)
    }
}

impl TokenSource for StaticToken {
    fn access_token(&self) -> String {
        self.0.clone()
    }
}
