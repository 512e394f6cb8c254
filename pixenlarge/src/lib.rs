//! pixenlarge - Integer nearest-neighbor enlargement of Netpbm images
//!
//! Every pixel of the input becomes an `N` x `N` block of the same value in
//! the output.  Monochrome images are enlarged directly on their packed
//! bits; every other image goes through a per-image column map.
//!
//! # Example
//!
//! ```
//! use pixenlarge::transform::{ScaleFactor, enlarge_mem};
//! use pixenlarge::Encoding;
//!
//! let out = enlarge_mem(b"P5\n1 1\n255\n\x2a", ScaleFactor::new(2).unwrap(), Encoding::Raw)
//!     .unwrap();
//! assert_eq!(out, b"P5\n2 2\n255\n\x2a\x2a\x2a\x2a");
//! ```

// Re-export core types (primary data structures used everywhere)
pub use pixenlarge_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use pixenlarge_io as io;
pub use pixenlarge_transform as transform;
