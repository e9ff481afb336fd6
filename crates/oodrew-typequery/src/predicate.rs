use std::fmt;

use serde::{Deserialize, Serialize};

/// The classification-lattice predicates a type query may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypePredicate {
    /// Least upper bound of a set of classes.
    Lub,
    /// Greatest lower bound of a set of classes.
    Glb,
    /// Direct subclass relation.
    Subsumes,
    /// Transitive closure of `Subsumes`.
    SubsumesPlus,
}

impl TypePredicate {
    pub const ALL: [TypePredicate; 4] = [
        TypePredicate::Lub,
        TypePredicate::Glb,
        TypePredicate::Subsumes,
        TypePredicate::SubsumesPlus,
    ];

    /// Canonical POSL spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            TypePredicate::Lub => "lub",
            TypePredicate::Glb => "glb",
            TypePredicate::Subsumes => "subsumes",
            TypePredicate::SubsumesPlus => "subsumesPlus",
        }
    }

    /// Case-insensitive lookup of a predicate symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(symbol))
    }

    pub fn is_subsumes_family(self) -> bool {
        matches!(self, TypePredicate::Subsumes | TypePredicate::SubsumesPlus)
    }

    pub fn is_bound_family(self) -> bool {
        matches!(self, TypePredicate::Lub | TypePredicate::Glb)
    }
}

impl fmt::Display for TypePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        for spelling in ["LUB", "lub", "Lub", "lUb"] {
            assert_eq!(TypePredicate::from_symbol(spelling), Some(TypePredicate::Lub));
        }
        assert_eq!(
            TypePredicate::from_symbol("SUBSUMESPLUS"),
            Some(TypePredicate::SubsumesPlus)
        );
        assert_eq!(TypePredicate::from_symbol("subsume"), None);
        assert_eq!(TypePredicate::from_symbol(""), None);
    }

    #[test]
    fn families_partition_the_predicates() {
        for p in TypePredicate::ALL {
            assert_ne!(p.is_subsumes_family(), p.is_bound_family());
        }
    }
}
