//! # Core Module
//!
//! This module provides the concurrency primitives shared by the streaming engine.
//! Every container that crosses a thread boundary lives here.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//! - `ConcurrentMap`: Hash map with documented per-operation atomicity, built on `MtResource`
//!
//! ## Usage
//! ```rust
//! use voxel_streaming::core::{ConcurrentMap, MtResource};
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//!
//! let map = ConcurrentMap::new();
//! assert!(map.try_insert("chunk", 1).is_ok());
//! assert!(map.try_insert("chunk", 2).is_err());
//! ```

pub mod concurrent_map;
pub mod mt_resource;

pub use concurrent_map::ConcurrentMap;
pub use mt_resource::MtResource;
