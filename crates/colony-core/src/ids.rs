//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  `AgentId` doubles as the index into
//! the SoA agent store; the other IDs are registry keys whose liveness is
//! checked by lookup, never assumed.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of an agent (colonist or enemy) in SoA storage.
    pub struct AgentId(u32);
}

typed_id! {
    /// Identity of a floor or held item.  Weapon claims are keyed by this.
    pub struct ItemId(u32);
}

typed_id! {
    /// Identity of a work site (tree, rock, blueprint, bed, table).
    pub struct TargetId(u32);
}

typed_id! {
    /// Identity of a cover obstacle in the obstacle index.
    pub struct ObstacleId(u32);
}

// ── DefName ───────────────────────────────────────────────────────────────────

/// Catalog key of an item definition (e.g. `"rifle"`).
///
/// Two items with the same `DefName` are interchangeable in stats but still
/// have distinct `ItemId`s.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefName(pub String);

impl DefName {
    pub fn new(name: impl Into<String>) -> Self {
        DefName(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DefName {
    fn from(s: &str) -> Self {
        DefName(s.to_owned())
    }
}

impl From<String> for DefName {
    fn from(s: String) -> Self {
        DefName(s)
    }
}

impl fmt::Display for DefName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
