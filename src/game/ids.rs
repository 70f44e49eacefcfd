//! Typed entity keys.
//!
//! Entities live in per-kind `BTreeMap` tables keyed by these ids. Ids are
//! allocated monotonically and never reused within a match, so map order is
//! spawn order and a stale id simply fails to look up.

use std::fmt;

use serde::Serialize;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Key of an enemy in the active enemy table.
    EnemyId,
    "e"
);
entity_id!(
    /// Key of a tower in the tower table.
    TowerId,
    "t"
);
entity_id!(
    /// Identity of a soldier owned by a barracks.
    SoldierId,
    "s"
);
entity_id!(
    /// Key of an in-flight projectile.
    ProjectileId,
    "p"
);

/// Monotonic id source shared by every entity kind of one match.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    /// Hand out the next unused raw id.
    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }

    /// Allocate an enemy id.
    pub fn enemy(&mut self) -> EnemyId {
        EnemyId(self.allocate())
    }

    /// Allocate a tower id.
    pub fn tower(&mut self) -> TowerId {
        TowerId(self.allocate())
    }

    /// Allocate a soldier id.
    pub fn soldier(&mut self) -> SoldierId {
        SoldierId(self.allocate())
    }

    /// Allocate a projectile id.
    pub fn projectile(&mut self) -> ProjectileId {
        ProjectileId(self.allocate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_across_kinds() {
        let mut ids = IdAllocator::default();
        let e = ids.enemy();
        let t = ids.tower();
        let p = ids.projectile();
        assert_eq!(e, EnemyId(0));
        assert_eq!(t, TowerId(1));
        assert_eq!(p, ProjectileId(2));
    }

    #[test]
    fn test_display_prefix() {
        assert_eq!(EnemyId(7).to_string(), "e7");
        assert_eq!(SoldierId(3).to_string(), "s3");
    }
}
