//! Package implement an ordered container using [red-black][wiki-rb] tree.
//!
//! Following types are exported:
//!
//! * [Tree] implements a pointer-linked binary tree, with rotation and
//!   in-order traversal primitives. It knows nothing about ordering or
//!   balance.
//! * [RbTree] implements a red-black search tree on top of [Tree],
//!   ordered by an injected [Compare] capability.
//!
//! Ordered container for single threaded use case
//! ----------------------------------------------
//!
//! - Parametrised over `value-type` and `comparator-type`.
//! - Duplicate values are allowed, each insert is addressable by its
//!   own [Handle].
//! - add(), find(), remove() in O(log n).
//! - Full table scan, in ascending order, via iter().
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! ```
//! use redblack::RbTree;
//!
//! let mut tree: RbTree<i32> = RbTree::new();
//! for value in [1, 7, 5, 9, 22, 4, 2, 4].iter() {
//!     tree.add(*value);
//! }
//! let values: Vec<i32> = tree.iter().cloned().collect();
//! assert_eq!(values, vec![1, 2, 4, 4, 5, 7, 9, 22]);
//!
//! let handle = tree.find(&7).unwrap();
//! assert_eq!(tree.remove(handle).unwrap(), 7);
//! assert_eq!(tree.len(), 7);
//! assert!(tree.find(&7).is_none());
//! ```
//!
//! [wiki-rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use std::{error, fmt, result};

// Short form to compose Error values.
//
// Here are few possible ways:
//
// ```ignore
// use crate::Error;
// err_at!(InvalidArgument, msg: format!("bad argument"));
// ```
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, some_result());
// ```
//
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                Err(Error::$v(prefix, format!("{}", err)))
            }
        }
    }};
}

mod compare;
mod config;
mod rbtree;
mod tree;

pub use compare::{Compare, Natural};
pub use config::{Config, Substitute};
pub use rbtree::{Color, Handle, Iter, RbTree, Stats};
pub use tree::{Iter as TreeIter, NodeId, Side, Tree};

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    InvalidArgument(String, String),
    InvalidOperation(String, String),
    Fatal(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            InvalidArgument(p, msg) => write!(f, "{} InvalidArgument: {}", p, msg),
            InvalidOperation(p, msg) => write!(f, "{} InvalidOperation: {}", p, msg),
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;
