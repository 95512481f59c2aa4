// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use core::fmt;

use hashbrown::HashMap;

use crate::{RenderEngine, RomRenderEngine};

/// The kinds of render engine a writing system can ask for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RendererKind {
    /// One glyph per character, no shaping.
    #[default]
    Rom,
    /// Smart-font shaping with Graphite tables.
    Graphite,
    /// Complex-script shaping through the platform shaper.
    Uniscribe,
}

impl RendererKind {
    /// The name used in writing system definitions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rom => "rom",
            Self::Graphite => "graphite",
            Self::Uniscribe => "uniscribe",
        }
    }

    /// Parses a name written by [`name`](Self::name), ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::Rom, Self::Graphite, Self::Uniscribe]
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

/// Writing system settings that shape a render engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineSettings {
    /// The writing system runs right to left.
    pub right_to_left: bool,
}

/// Builds a render engine for a writing system.
pub type EngineConstructor = fn(&EngineSettings) -> Arc<dyn RenderEngine>;

/// Maps renderer kinds to the constructors that are available in this build.
///
/// Only [`RendererKind::Rom`] is registered by default. Asking for another kind that has no
/// constructor logs a warning and yields a Rom engine.
#[derive(Clone)]
pub struct RendererRegistry {
    constructors: HashMap<RendererKind, EngineConstructor>,
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.constructors.keys()).finish()
    }
}

impl RendererRegistry {
    /// Creates a registry with the Rom engine.
    pub fn new() -> Self {
        let mut constructors = HashMap::new();
        constructors.insert(RendererKind::Rom, rom as EngineConstructor);
        Self { constructors }
    }

    /// Registers `constructor` for `kind`, returning the one it replaces.
    pub fn register(
        &mut self,
        kind: RendererKind,
        constructor: EngineConstructor,
    ) -> Option<EngineConstructor> {
        self.constructors.insert(kind, constructor)
    }

    /// Returns `true` if engines of `kind` can be built without falling back.
    pub fn is_available(&self, kind: RendererKind) -> bool {
        self.constructors.contains_key(&kind)
    }

    /// Builds an engine of `kind`, or a Rom engine if `kind` is not available.
    pub fn create(&self, kind: RendererKind, settings: &EngineSettings) -> Arc<dyn RenderEngine> {
        match self.constructors.get(&kind) {
            Some(constructor) => constructor(settings),
            None => {
                log::warn!(
                    "{} renderer is not available, using the rom renderer",
                    kind.name()
                );
                rom(settings)
            }
        }
    }
}

fn rom(settings: &EngineSettings) -> Arc<dyn RenderEngine> {
    Arc::new(RomRenderEngine::with_settings(settings))
}

/// Supplies the render engine for each writing system in a paragraph.
pub trait RendererProvider {
    /// The engine for text in writing system `ws`, or for text with no writing system.
    fn renderer_for(&mut self, ws: Option<u32>) -> Arc<dyn RenderEngine>;
}

impl RendererProvider for Arc<dyn RenderEngine> {
    fn renderer_for(&mut self, _ws: Option<u32>) -> Arc<dyn RenderEngine> {
        Arc::clone(self)
    }
}
