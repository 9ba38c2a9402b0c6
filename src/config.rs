//! Module define construction time configuration for [RbTree].
//!
//! [RbTree]: crate::RbTree

/// Node used to reduce the removal of a node with two children into
/// the removal of a node with at most one child.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Substitute {
    /// Leftmost node of the right subtree.
    Successor,
    /// Rightmost node of the left subtree.
    Predecessor,
}

impl Default for Substitute {
    fn default() -> Substitute {
        Substitute::Successor
    }
}

/// Configuration for [RbTree] instance.
///
/// ```
/// use redblack::{Config, Substitute};
///
/// let config = Config::default().set_substitute(Substitute::Predecessor);
/// assert_eq!(config.substitute, Substitute::Predecessor);
/// ```
///
/// [RbTree]: crate::RbTree
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    pub substitute: Substitute,
}

impl Config {
    /// Configure the substitution node for two-child removal.
    pub fn set_substitute(mut self, substitute: Substitute) -> Config {
        self.substitute = substitute;
        self
    }
}
