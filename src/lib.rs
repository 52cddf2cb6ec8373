//! Package implement an in-memory ordered index using [red-black][wiki-rb]
//! tree.
//!
//! [RbTree] is an ephemeral, ordered collection of keys:
//!
//! - Each entry in RbTree instance is a single key.
//! - Parametrised over `key-type` and over the `comparator` that orders keys.
//! - Insert, delete, lookup, min and max in logarithmic time.
//! - Duplicate keys are rejected.
//! - Uses ownership model and borrow semantics to ensure safety.
//! - No Durability guarantee.
//! - Not thread safe, wrap it in a lock for concurrent access.
//!
//! Nodes are held in an arena and linked by handles, which keeps the parent
//! back-link free of reference cycles.
//!
//! Constructing a new [RbTree] instance and basic operations:
//!
//! ```
//! use rbindex::RbTree;
//!
//! let mut index: RbTree<u64> = RbTree::new();
//! assert_eq!(index.len(), 0);
//! assert_eq!(index.is_empty(), true);
//!
//! index.insert(100).unwrap();
//! index.insert(10).unwrap();
//! index.insert(12).unwrap();
//! assert!(index.insert(10).is_err());
//!
//! assert_eq!(index.len(), 3);
//! assert_eq!(index.get(&12).unwrap(), &12);
//! assert_eq!(index.min().unwrap(), &10);
//! assert_eq!(index.max().unwrap(), &100);
//!
//! assert_eq!(index.delete(&10), Some(10));
//! assert_eq!(index.delete(&10), None);
//! ```
//!
//! Ordering keys with a custom comparator:
//!
//! ```
//! use rbindex::RbTree;
//!
//! let mut index: RbTree<u32, _> = RbTree::with_comparator(|a: &u32, b: &u32| a > b);
//! index.extend(vec![1, 2, 3]);
//! assert_eq!(index.min().unwrap(), &3);
//! assert_eq!(index.max().unwrap(), &1);
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
// err_at!(KeyNotFound, msg: format!("missing key"));
// ```
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, validate_tree(root), format!("validate failed"));
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
    ($v:ident, $e:expr, $($arg:expr),+) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                let msg = format!($($arg),+);
                Err(Error::$v(prefix, format!("{} {}", err, msg)))
            }
        }
    }};
}

mod arena;
mod node;
mod order;
mod rbtree;

pub use node::Color;
pub use order::{Comparator, Natural};
pub use rbtree::RbTree;

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    Fatal(String, String),
    KeyNotFound(String, String),
    KeyExists(String, String),
    Empty(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
            KeyNotFound(p, msg) => write!(f, "{} KeyNotFound: {}", p, msg),
            KeyExists(p, msg) => write!(f, "{} KeyExists: {}", p, msg),
            Empty(p, msg) => write!(f, "{} Empty: {}", p, msg),
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
