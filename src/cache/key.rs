//! Deterministic cache key naming
//!
//! Keys follow the form `scope:entity[:subject]`, e.g.
//! `org_projects:org-123:user-456`. Same inputs always produce the same key,
//! which is what makes targeted invalidation by scope possible.

/// Build a cache key from scope, entity and optional subject.
pub fn scoped_key(scope: &str, entity: &str, subject: Option<&str>) -> String {
    match subject {
        Some(subject) => format!("{}:{}:{}", scope, entity, subject),
        None => format!("{}:{}", scope, entity),
    }
}

/// Check whether a key belongs to the invalidation scope of an entity.
///
/// A key matches when its entity segment equals `entity`, or equals `subject`
/// when one is given (covers subject-keyed entries like membership lists).
/// Keys for a different entity never match.
pub fn key_in_scope(key: &str, entity: &str, subject: Option<&str>) -> bool {
    let mut segments = key.splitn(3, ':');
    let _scope = segments.next();
    match segments.next() {
        Some(key_entity) => key_entity == entity || subject.is_some_and(|s| key_entity == s),
        None => false,
    }
}
