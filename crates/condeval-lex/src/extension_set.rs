//! Capability the lexer uses to recognize registered extension names.
//!
//! The lexer only needs case-insensitive membership; the full registration
//! contract (arities, factories) lives in `condeval::extensions` and is
//! deliberately not visible from this crate.

use std::collections::HashSet;

/// Case-insensitive set of extension function names.
pub trait ExtensionNameSet {
    /// Returns true if `name` matches a registered extension, ignoring
    /// case.
    fn contains(&self, name: &str) -> bool;
}

/// An extension set with no members; used when parsing expressions that
/// cannot reference extensions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExtensions;

impl ExtensionNameSet for NoExtensions {
    fn contains(&self, _name: &str) -> bool {
        false
    }
}

impl ExtensionNameSet for HashSet<String> {
    fn contains(&self, name: &str) -> bool {
        self.iter().any(|existing| existing.eq_ignore_ascii_case(name))
    }
}

impl ExtensionNameSet for [String] {
    fn contains(&self, name: &str) -> bool {
        self.iter().any(|existing| existing.eq_ignore_ascii_case(name))
    }
}

impl<T: ExtensionNameSet + ?Sized> ExtensionNameSet for &T {
    fn contains(&self, name: &str) -> bool {
        (**self).contains(name)
    }
}
