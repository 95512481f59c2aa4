// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Writing systems and the factory that owns them.
//!
//! A [`WritingSystem`] ties a locale to the settings needed to render, sort and type text in it:
//! direction, render engine, default fonts, keyboard, word-forming characters and collations.
//! The [`WritingSystemFactory`] hands out numeric [`WsId`]s, finds writing systems by id or by
//! locale, caches one render engine per writing system and saves everything as XML.
//!
//! ## Example
//!
//! ```
//! use writing_system::{FactoryOptions, WritingSystemFactory};
//!
//! let mut factory = WritingSystemFactory::new(FactoryOptions::default());
//! let fr = factory.engine("fr_FR").unwrap().id().unwrap();
//! assert_eq!(factory.ws_from_str("fr-FR"), Some(fr));
//! assert_eq!(factory.str_from_ws(fr).as_deref(), Some("fr-FR"));
//!
//! let renderer = factory.renderer(fr).unwrap();
//! assert_eq!(renderer.kind().name(), "rom");
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

mod error;
mod factory;
mod ws;
mod xml;

pub use error::{Error, ErrorKind};
pub use factory::{FactoryOptions, WritingSystemFactory, global};
pub use ws::{Collation, WritingSystem, WsId};

pub use render_engine::RendererKind;
