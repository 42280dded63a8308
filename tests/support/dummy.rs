use persist_rust::Identifiable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Identifiable)]
pub struct Dummy {
    pub id: String,
    pub key: String,
    pub content: String,
}

impl Dummy {
    pub fn new(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            key: key.into(),
            content: content.into(),
        }
    }
}

/// Query criteria for dummies; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct DummyFilter {
    pub key: Option<String>,
    pub content: Option<String>,
}

impl DummyFilter {
    pub fn by_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Default::default()
        }
    }

    pub fn matches(&self, dummy: &Dummy) -> bool {
        if let Some(key) = &self.key {
            if &dummy.key != key {
                return false;
            }
        }
        if let Some(content) = &self.content {
            if &dummy.content != content {
                return false;
            }
        }
        true
    }
}

/// Shorter keys first, so "Key 2" sorts before "Key 11".
pub fn key_length_less(a: &Dummy, b: &Dummy) -> bool {
    a.key.len() < b.key.len()
}
