//! Object name generation

use pixstash_core::models::ObjectId;
use uuid::Uuid;

/// Source of fresh object names
pub trait IdGenerator: Send + Sync {
    /// Produce a name no other call has produced. Never fails.
    fn new_id(&self) -> ObjectId;
}

/// Random UUID v4 names; needs no coordination between callers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> ObjectId {
        ObjectId::from(Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_distinct() {
        let generator = UuidGenerator;
        let ids: HashSet<_> = (0..10_000).map(|_| generator.new_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_ids_are_filesystem_safe() {
        let id = UuidGenerator.new_id();
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == '-'));
    }
}
