//! Deterministic cache keys for chat responses

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::text::normalize;

/// Bumped whenever the canonical encoding changes, orphaning old entries
const ENCODING_VERSION: &str = "fp-v1";

/// Hex chars of the scope hash kept in the storage key
const SCOPE_TAG_LEN: usize = 16;

/// Everything that influences a chat answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationInputs {
    /// User question as typed
    pub query: String,
    /// Conversation, session, user or topic the answer belongs to
    pub scope: String,
    /// Target model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Any further answer-affecting parameters (sorted for consistency)
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl ConversationInputs {
    pub fn new(query: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            scope: scope.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// Content digest of a set of [`ConversationInputs`], partitioned by scope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    scope_tag: String,
    digest: String,
}

impl Fingerprint {
    /// Full 64-char hex SHA-256 digest
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Short hash of the scope, shared by every fingerprint in that scope
    pub fn scope_tag(&self) -> &str {
        &self.scope_tag
    }

    /// Backend key: `{namespace}:{scope_tag}:{digest}`
    pub fn storage_key(&self, namespace: &str) -> String {
        format!("{}:{}:{}", namespace, self.scope_tag, self.digest)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digest)
    }
}

/// Derives fingerprints from conversation inputs.
///
/// The query is normalized (case, diacritics, whitespace runs) before hashing; the
/// other components are hashed verbatim apart from trimming. Every component is
/// length-prefixed so distinct tuples never share an encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintGenerator;

impl FingerprintGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn fingerprint(&self, inputs: &ConversationInputs) -> Fingerprint {
        let digest = Sha256::digest(Self::canonical(inputs));

        Fingerprint {
            scope_tag: self.scope_tag(&inputs.scope),
            digest: hex::encode(digest),
        }
    }

    /// Scope hash used as the key partition
    pub fn scope_tag(&self, scope: &str) -> String {
        let digest = Sha256::digest(format!("scope:{}", scope.trim()).as_bytes());
        let mut tag = hex::encode(digest);
        tag.truncate(SCOPE_TAG_LEN);
        tag
    }

    /// Glob matching every storage key of `scope`
    pub fn scope_pattern(&self, namespace: &str, scope: &str) -> String {
        format!("{}:{}:*", namespace, self.scope_tag(scope))
    }

    fn canonical(inputs: &ConversationInputs) -> Vec<u8> {
        let query = normalize(&inputs.query)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let mut buffer = Vec::with_capacity(128);
        push_component(&mut buffer, ENCODING_VERSION);
        push_component(&mut buffer, &query);
        push_component(&mut buffer, inputs.scope.trim());

        match &inputs.model {
            Some(model) => {
                push_component(&mut buffer, "model");
                push_component(&mut buffer, model.trim());
            }
            None => push_component(&mut buffer, "no-model"),
        }

        push_component(&mut buffer, &inputs.parameters.len().to_string());
        for (key, value) in &inputs.parameters {
            push_component(&mut buffer, key);
            push_component(&mut buffer, value);
        }

        buffer
    }
}

fn push_component(buffer: &mut Vec<u8>, component: &str) {
    buffer.extend_from_slice(component.len().to_string().as_bytes());
    buffer.push(b':');
    buffer.extend_from_slice(component.as_bytes());
    buffer.push(b';');
}
