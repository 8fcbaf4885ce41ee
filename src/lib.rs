//! Rankskip - An ordered, rank-indexable skip list.
//!
//! Values are kept sorted by a less-than relation, duplicates included, and
//! every link records how many elements it skips. That makes positional
//! lookup as cheap as search: both run in O(log n) on average.
//!
//! # Quick Start
//!
//! ```
//! use rankskip::SkipList;
//!
//! let mut list = SkipList::new();
//! for v in [8000, 1000, 4000, 2000] {
//!     list.insert(v).unwrap();
//! }
//!
//! assert_eq!(list.at(0).unwrap(), &1000);
//! assert_eq!(list.at(-1).unwrap(), &8000);
//! assert_eq!(list.index(&4000).unwrap(), 2);
//! assert_eq!(list.at_seq(1, 2).unwrap(), vec![&2000, &4000]);
//! assert_eq!(list.remove(&2000).unwrap(), 2000);
//! assert!(list.lacks_integrity().is_ok());
//! ```
//!
//! # Modules
//!
//! - [`list`]: the single-threaded engine and its self-check
//! - [`shared`]: a mutex-guarded list for use across threads
//! - [`value`]: values whose kind is picked at run time
//! - [`rolling`]: rolling medians built on the list

pub mod compare;
pub mod error;
pub mod height;
pub mod list;
pub mod options;
pub mod rolling;
pub mod shared;
pub mod value;

pub use compare::ByPredicate;
pub use compare::Compare;
pub use compare::Natural;
pub use error::CompareError;
pub use error::Error;
pub use error::Result;
pub use height::HeightGenerator;
pub use list::IntegrityCheck;
pub use list::SkipList;
pub use options::Options;
pub use shared::SharedSkipList;
pub use shared::ValueSkipList;
