//! Typed identifiers for IR nodes.
//!
//! Dedicated newtypes instead of raw integers keep the session's tables
//! apart: a [`FunctionId`] cannot index the class arena. Identity
//! questions in this layer ("the same symbol", "the same type-parameter
//! node") are answered by id equality.

use std::fmt;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
        pub struct $name(u32);

        impl $name {
            /// Construct an identifier from a raw value.
            ///
            /// Only tests mint ids this way; everything else goes
            /// through an arena.
            #[cfg(test)]
            pub(crate) const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Retrieve the underlying integer value.
            #[inline]
            pub const fn to_raw(self) -> u32 {
                self.0
            }
        }

        impl crate::hir::arena::ArenaKey for $name {
            #[inline]
            fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_id!(
    /// Identifies an IR class node.
    ///
    /// This is the "class symbol": the value the resolver hands out and
    /// caches. It stays valid for the lifetime of the session that
    /// created it; re-resolving the same [`crate::base::ClassId`] in one
    /// session yields the same `ClassSymbolId`.
    ClassSymbolId
);

define_id!(
    /// Identifies an IR type-parameter node.
    ///
    /// Type-parameter identity matters: a nested class referring to an
    /// enclosing class's parameter must resolve to the enclosing node's
    /// id, not a copy.
    TypeParamId
);

define_id!(
    /// Identifies an IR field node.
    FieldId
);

define_id!(
    /// Identifies an IR function node (method or constructor).
    FunctionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_equality() {
        let a = ClassSymbolId::from_raw(0);
        let b = ClassSymbolId::from_raw(0);
        let c = ClassSymbolId::from_raw(1);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_id_size() {
        assert_eq!(std::mem::size_of::<ClassSymbolId>(), 4);
        assert_eq!(std::mem::size_of::<Option<FunctionId>>(), 8);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", TypeParamId::from_raw(3)), "TypeParamId(3)");
    }
}
