// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The check-in details form, without any user interface.
//!
//! A [`CheckinForm`] holds what the user fills in before checking in: user name, date, root,
//! automatic conflict resolution, the changelist and a comment. Finishing the form gives a
//! [`DialogResult`] that carries the accepted [`CheckinInfo`] by value.
//!
//! ## Features
//!
//! - `std` (enabled by default): This is currently unused and is provided for forward compatibility.
//!
//! ## Example
//!
//! ```
//! use checkin_form::{ChangeList, CheckinForm};
//!
//! let mut form = CheckinForm::new("jdoe", "2026-10-19", "/src/fw");
//! form.add_changelist(ChangeList::new(17, "Fix run merging")).unwrap();
//! form.select_changelist(17);
//! assert_eq!(form.comment(), "Fix run merging");
//!
//! let info = form.accept().into_info().unwrap();
//! assert_eq!(info.changelist, 17);
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
#![no_std]

extern crate alloc;

mod error;
mod form;

pub use error::{Error, ErrorKind};
pub use form::{ChangeList, CheckinForm, CheckinInfo, DEFAULT_CHANGELIST, DialogResult};
