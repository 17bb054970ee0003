//! Handles and multi-scope lookup for the [netCDF-4](https://docs.unidata.ucar.edu/netcdf-c/current/) data model.
//!
//! A netCDF-4 dataset is a tree of [groups](group::Group).
//! Each group may hold [dimensions](dimension::Dimension), [variables](variable::Variable) and child groups.
//! All storage work (file format, chunking, compression, value I/O) belongs to an underlying library, which this crate reaches through the [`storage`] capability traits.
//!
//! What this crate adds on top of those traits:
//!  - cheap handles with an explicit null state,
//!  - name lookups that search the current group, its ancestors, its descendants, or any combination ([`Location`](group::Location), [`GroupLocation`](group::GroupLocation)),
//!  - definition operations that resolve types and dimensions by handle or by name.
//!
//! ## Example
//! ```rust
//! # use std::sync::Arc;
//! use netcdf4_hierarchy::{
//!     data_type::Type,
//!     group::{Group, Location},
//!     storage::store::MemoryStore,
//! };
//!
//! let store = Arc::new(MemoryStore::new());
//! let root = Group::open_root(store)?;
//! let usa = root.add_group("USA")?;
//! usa.add_dimension("time", 2)?;
//! let wyoming = usa.add_group("Wyoming")?;
//! wyoming.add_dimension("stations", 4)?;
//!
//! let temperature = wyoming.add_variable("average_temperature", Type::FLOAT, ["time", "stations"])?;
//! assert_eq!(temperature.data_length()?, 8);
//!
//! let time = wyoming.dimension("time", Location::ParentsAndCurrent)?;
//! assert_eq!(time.size()?, 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Storage Call Logging
//! Wrap a store in [`UsageLogStorageAdapter`](storage::storage_adapter::usage_log::UsageLogStorageAdapter) to see every capability call made by a lookup.
//!
//! ## Licence
//! `netcdf4_hierarchy` is licensed under either of
//!  - the Apache License, Version 2.0 or <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license or <http://opensource.org/licenses/MIT>, at your option.

#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod data_type;
pub mod dimension;
pub mod group;
pub mod hierarchy_error;
pub mod multimap;
pub mod storage;
pub mod variable;
