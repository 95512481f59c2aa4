// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The class and field schema of an object store.
//!
//! A [`MetaDataCache`] answers questions about the classes of a model and the fields they
//! declare: names, numeric ids, field types, destination classes of object fields, and the
//! single-inheritance hierarchy. It is loaded once, either from an XML model description with
//! [`MetaDataCache::from_xml`] or through a [`MetaDataCacheBuilder`], and is read-only afterwards
//! except for virtual fields.
//!
//! ## Example
//!
//! ```
//! use metadata_cache::{FieldType, FieldTypeMask, MetaDataCache};
//!
//! let mut bldr = MetaDataCache::builder();
//! bldr.add_class(0, "CmObject", None, true).unwrap();
//! bldr.add_class(7, "CmPossibility", Some(0), false).unwrap();
//! bldr.add_field(7001, 7, "Name", FieldType::MultiUnicode, None).unwrap();
//! bldr.add_field(7002, 7, "SubPossibilities", FieldType::OwningSequence, Some(7)).unwrap();
//! let mdc = bldr.build();
//!
//! assert_eq!(mdc.field_id("CmPossibility", "Name", false), Some(7001));
//! assert_eq!(mdc.fields(7, true, FieldTypeMask::OWNING).unwrap(), [7002]);
//! assert_eq!(mdc.all_subclasses(0).unwrap(), [0, 7]);
//! ```
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod cache;
mod error;
mod field;
mod xml;

pub use cache::{MetaDataCache, MetaDataCacheBuilder};
pub use error::{Error, ErrorKind};
pub use field::{ClassId, FieldId, FieldType, FieldTypeMask};
