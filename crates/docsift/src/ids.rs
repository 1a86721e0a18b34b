//! Short unique identifiers.

use std::collections::HashSet;

use uuid::Uuid;

/// Longest id a UUID can back: 32 hex digits.
pub const MAX_ID_LENGTH: usize = 32;

/// Hands out short random hex ids that never repeat within one registry.
///
/// Each id is a prefix of a fresh v4 UUID. Short prefixes collide quickly;
/// a collision just draws another UUID. The registry is a plain value owned
/// by the caller, so separate registries may hand out the same id.
///
/// # Examples
///
/// ```
/// use docsift::ShortIdRegistry;
///
/// let mut ids = ShortIdRegistry::new();
/// let id = ids.next_id(8).unwrap();
/// assert_eq!(id.len(), 8);
/// assert!(ids.contains(&id));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShortIdRegistry {
    issued: HashSet<String>,
}

impl ShortIdRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new id of `length` lowercase hex characters and records it.
    ///
    /// `length` is clamped to `1..=32`. Returns `None` once every id of that
    /// length has been handed out (16 ids at length 1, 256 at length 2).
    pub fn next_id(&mut self, length: usize) -> Option<String> {
        let length = length.clamp(1, MAX_ID_LENGTH);
        if self.is_exhausted(length) {
            tracing::debug!(length, "short id space exhausted");
            return None;
        }

        loop {
            let mut candidate = Uuid::new_v4().simple().to_string();
            candidate.truncate(length);
            if self.issued.insert(candidate.clone()) {
                return Some(candidate);
            }
            tracing::trace!(id = %candidate, "short id collision, retrying");
        }
    }

    /// Returns `true` if every id of `length` hex digits was handed out.
    fn is_exhausted(&self, length: usize) -> bool {
        let Some(capacity) = u32::try_from(length)
            .ok()
            .and_then(|exp| 16usize.checked_pow(exp))
        else {
            return false;
        };
        self.issued.iter().filter(|id| id.len() == length).count() >= capacity
    }

    /// Returns `true` if `id` was handed out by this registry.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.issued.contains(id)
    }

    /// Number of ids handed out.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    /// Returns `true` if no id was handed out yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}
