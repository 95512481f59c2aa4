// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{Mutex, OnceLock};

use char_engines::CharacterPropertyEngine;
use hashbrown::HashMap;
use icu_locale_core::{LanguageIdentifier, langid};
use render_engine::{
    EngineSettings, RenderEngine, RendererKind, RendererProvider, RendererRegistry,
};

use crate::{Error, WritingSystem, WsId};

/// Options for a [`WritingSystemFactory`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactoryOptions {
    /// The id given to the first writing system created by locale.
    ///
    /// Default is 1.
    pub first_ws_id: u32,
    /// The locale of the user interface, used for [`WritingSystemFactory::user_ws`] until
    /// another writing system is chosen.
    ///
    /// Default is `en`.
    pub user_locale: LanguageIdentifier,
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self {
            first_ws_id: 1,
            user_locale: langid!("en"),
        }
    }
}

/// The registry of writing systems, keyed by id and by locale.
///
/// Besides the writing systems it caches one render engine per writing system. Those caches are
/// released by [`shutdown`](Self::shutdown) or [`clear`](Self::clear).
#[derive(Debug)]
pub struct WritingSystemFactory {
    options: FactoryOptions,
    systems: HashMap<WsId, WritingSystem>,
    by_locale: HashMap<String, WsId>,
    next_id: u32,
    user_ws: Option<WsId>,
    registry: RendererRegistry,
    renderers: HashMap<WsId, Arc<dyn RenderEngine>>,
    cpe: CharacterPropertyEngine,
    shut_down: bool,
}

impl Default for WritingSystemFactory {
    fn default() -> Self {
        Self::new(FactoryOptions::default())
    }
}

impl WritingSystemFactory {
    /// Creates an empty factory.
    pub fn new(options: FactoryOptions) -> Self {
        Self {
            next_id: options.first_ws_id.max(1),
            options,
            systems: HashMap::new(),
            by_locale: HashMap::new(),
            user_ws: None,
            registry: RendererRegistry::new(),
            renderers: HashMap::new(),
            cpe: CharacterPropertyEngine::new(),
            shut_down: false,
        }
    }

    /// The options this factory was created with.
    pub fn options(&self) -> &FactoryOptions {
        &self.options
    }

    /// Returns the writing system for `locale`, creating it if there is none.
    pub fn engine(&mut self, locale: &str) -> Result<&WritingSystem, Error> {
        let ws = self.ensure(locale)?;
        self.systems.get(&ws).ok_or_else(|| Error::unknown_ws(ws))
    }

    /// Like [`engine`](Self::engine), but for changing the writing system.
    ///
    /// Drops the cached render engine, since the changes may affect it.
    pub fn engine_mut(&mut self, locale: &str) -> Result<&mut WritingSystem, Error> {
        let ws = self.ensure(locale)?;
        self.renderers.remove(&ws);
        self.systems.get_mut(&ws).ok_or_else(|| Error::unknown_ws(ws))
    }

    /// Looks up a writing system by id without creating one.
    pub fn engine_or_null(&self, ws: WsId) -> Option<&WritingSystem> {
        self.systems.get(&ws)
    }

    /// Registers `ws`, giving it the next free id if it has none.
    ///
    /// Fails if the id or the locale is already registered.
    pub fn add_engine(&mut self, mut ws: WritingSystem) -> Result<WsId, Error> {
        self.check_live()?;
        let locale = ws.locale_str();
        if let Some(&existing) = self.by_locale.get(&locale) {
            return Err(Error::duplicate_locale(locale, existing));
        }
        let id = match ws.id {
            Some(id) if self.systems.contains_key(&id) => return Err(Error::duplicate_id(id)),
            Some(id) => id,
            None => self.allocate_id(),
        };
        self.next_id = self.next_id.max(id.get().saturating_add(1));
        ws.id = Some(id);
        log::debug!("registered writing system {id} for {locale}");
        self.by_locale.insert(locale, id);
        self.systems.insert(id, ws);
        Ok(id)
    }

    /// Unregisters and returns a writing system.
    pub fn remove_engine(&mut self, ws: WsId) -> Result<WritingSystem, Error> {
        self.check_live()?;
        let removed = self.systems.remove(&ws).ok_or_else(|| Error::unknown_ws(ws))?;
        self.by_locale.remove(&removed.locale_str());
        self.renderers.remove(&ws);
        if self.user_ws == Some(ws) {
            self.user_ws = None;
        }
        log::debug!("removed writing system {ws}");
        Ok(removed)
    }

    /// The id of the writing system for `locale`, if there is one.
    pub fn ws_from_str(&self, locale: &str) -> Option<WsId> {
        let key = canonical_locale(locale).ok()?.to_string();
        self.by_locale.get(&key).copied()
    }

    /// The canonical locale string of writing system `ws`.
    pub fn str_from_ws(&self, ws: WsId) -> Option<String> {
        self.systems.get(&ws).map(WritingSystem::locale_str)
    }

    /// The number of registered writing systems.
    pub fn ws_count(&self) -> usize {
        self.systems.len()
    }

    /// The ids of all registered writing systems, in increasing order.
    pub fn ws_ids(&self) -> Vec<WsId> {
        let mut ids: Vec<WsId> = self.systems.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// The writing system of the user interface.
    ///
    /// Unless one was chosen with [`set_user_ws`](Self::set_user_ws), this is the writing system
    /// for [`FactoryOptions::user_locale`], created on first use.
    pub fn user_ws(&mut self) -> Result<WsId, Error> {
        match self.user_ws {
            Some(ws) => Ok(ws),
            None => {
                let locale = self.options.user_locale.to_string();
                let ws = self.ensure(&locale)?;
                self.user_ws = Some(ws);
                Ok(ws)
            }
        }
    }

    /// Chooses the writing system of the user interface.
    pub fn set_user_ws(&mut self, ws: WsId) -> Result<(), Error> {
        self.check_live()?;
        if !self.systems.contains_key(&ws) {
            return Err(Error::unknown_ws(ws));
        }
        self.user_ws = Some(ws);
        Ok(())
    }

    /// The render engine for `ws`, built on first use and cached.
    pub fn renderer(&mut self, ws: WsId) -> Result<Arc<dyn RenderEngine>, Error> {
        self.check_live()?;
        if let Some(engine) = self.renderers.get(&ws) {
            return Ok(Arc::clone(engine));
        }
        let system = self.systems.get(&ws).ok_or_else(|| Error::unknown_ws(ws))?;
        let engine = self
            .registry
            .create(system.renderer(), &system.engine_settings());
        log::debug!("created {} renderer for writing system {ws}", engine.kind().name());
        self.renderers.insert(ws, Arc::clone(&engine));
        Ok(engine)
    }

    /// The renderer registry, for making more engine kinds available.
    ///
    /// Cached render engines are dropped so that the next request sees the change.
    pub fn registry_mut(&mut self) -> &mut RendererRegistry {
        self.renderers.clear();
        &mut self.registry
    }

    /// The character property engine shared by text with no writing system specific overrides.
    pub fn character_property_engine(&self) -> &CharacterPropertyEngine {
        &self.cpe
    }

    /// Releases the writing systems and the cached render engines.
    ///
    /// Every later call that would create, change or render fails with
    /// [`ErrorKind::ShutDown`](crate::ErrorKind::ShutDown); lookups find nothing.
    pub fn shutdown(&mut self) {
        self.reset();
        self.shut_down = true;
        log::debug!("writing system factory shut down");
    }

    /// Returns `true` after [`shutdown`](Self::shutdown).
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Drops every writing system and cached render engine. The factory stays usable and ids
    /// start over at [`FactoryOptions::first_ws_id`].
    pub fn clear(&mut self) {
        self.reset();
        log::debug!("writing system factory cleared");
    }

    fn reset(&mut self) {
        self.renderers.clear();
        self.systems.clear();
        self.by_locale.clear();
        self.user_ws = None;
        self.next_id = self.options.first_ws_id.max(1);
    }

    /// Writing systems in id order, for persistence.
    pub(crate) fn sorted_systems(&self) -> impl Iterator<Item = &WritingSystem> {
        let ids = self.ws_ids();
        ids.into_iter().filter_map(|ws| self.systems.get(&ws))
    }

    pub(crate) fn systems_mut(&mut self) -> impl Iterator<Item = &mut WritingSystem> {
        self.systems.values_mut()
    }

    pub(crate) fn check_live(&self) -> Result<(), Error> {
        if self.shut_down {
            Err(Error::shut_down())
        } else {
            Ok(())
        }
    }

    fn ensure(&mut self, locale: &str) -> Result<WsId, Error> {
        self.check_live()?;
        let locale = canonical_locale(locale)?;
        if let Some(&ws) = self.by_locale.get(&locale.to_string()) {
            return Ok(ws);
        }
        self.add_engine(WritingSystem::new(locale))
    }

    fn allocate_id(&self) -> WsId {
        let mut candidate = self.next_id;
        loop {
            if let Some(id) = WsId::new(candidate).filter(|id| !self.systems.contains_key(id)) {
                return id;
            }
            candidate = candidate.wrapping_add(1);
        }
    }
}

fn canonical_locale(locale: &str) -> Result<LanguageIdentifier, Error> {
    LanguageIdentifier::try_from_str(locale.trim()).map_err(|_| Error::invalid_locale(locale))
}

impl RendererProvider for WritingSystemFactory {
    fn renderer_for(&mut self, ws: Option<u32>) -> Arc<dyn RenderEngine> {
        match ws.and_then(WsId::new).map(|ws| self.renderer(ws)) {
            Some(Ok(engine)) => engine,
            Some(Err(err)) => {
                log::warn!("{err}, using the rom renderer");
                self.registry
                    .create(RendererKind::Rom, &EngineSettings::default())
            }
            None => self
                .registry
                .create(RendererKind::Rom, &EngineSettings::default()),
        }
    }
}

/// The process-wide factory.
///
/// ```
/// let ws = writing_system::global().lock().unwrap().engine("fr").unwrap().id();
/// assert!(ws.is_some());
/// ```
pub fn global() -> &'static Mutex<WritingSystemFactory> {
    static GLOBAL: OnceLock<Mutex<WritingSystemFactory>> = OnceLock::new();
    GLOBAL.get_or_init(|| Mutex::new(WritingSystemFactory::default()))
}

#[cfg(test)]
mod tests {
    use super::{FactoryOptions, WritingSystemFactory, global};
    use crate::{ErrorKind, WritingSystem, WsId};
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use icu_locale_core::langid;
    use render_engine::{
        FixedPitchGraphics, ParagraphBreaker, ParagraphOptions, RendererKind, RendererProvider,
    };
    use text_props::TextProps;
    use ts_string::StrBuilder;

    fn ws(raw: u32) -> WsId {
        WsId::new(raw).unwrap()
    }

    #[test]
    fn engine_creates_once_per_locale() {
        let mut factory = WritingSystemFactory::new(FactoryOptions {
            first_ws_id: 100,
            ..FactoryOptions::default()
        });
        let en = factory.engine("en_US").unwrap().id().unwrap();
        assert_eq!(en, ws(100));
        assert_eq!(factory.engine("en-us").unwrap().id(), Some(en));
        let fr = factory.engine("fr").unwrap().id().unwrap();
        assert_eq!(fr, ws(101));
        assert_eq!(factory.ws_count(), 2);
        assert_eq!(factory.ws_ids(), [en, fr]);
        assert_eq!(factory.ws_from_str("EN-US"), Some(en));
        assert_eq!(factory.str_from_ws(fr).as_deref(), Some("fr"));
        assert_eq!(
            factory.engine("not a locale!").unwrap_err().kind(),
            ErrorKind::InvalidLocale
        );
    }

    #[test]
    fn lookup_by_id_never_creates() {
        let mut factory = WritingSystemFactory::default();
        for raw in 1..20 {
            assert!(factory.engine_or_null(ws(raw)).is_none());
        }
        let added = factory
            .add_engine(WritingSystem::new(langid!("de")))
            .unwrap();
        assert!(factory.engine_or_null(added).is_some());
        assert!(factory.engine_or_null(ws(added.get() + 1)).is_none());
        assert_eq!(factory.ws_count(), 1);
    }

    #[test]
    fn add_engine_rejects_duplicates() {
        let mut factory = WritingSystemFactory::default();
        let fixed = factory
            .add_engine(WritingSystem::with_id(ws(40), langid!("grc")))
            .unwrap();
        assert_eq!(fixed, ws(40));
        let err = factory
            .add_engine(WritingSystem::with_id(ws(40), langid!("he")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateId);
        let err = factory
            .add_engine(WritingSystem::new(langid!("grc")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateLocale);
        assert_eq!(err.ws(), Some(fixed));
        // New ids continue after the highest one seen.
        assert_eq!(factory.engine("he").unwrap().id(), Some(ws(41)));
    }

    #[test]
    fn remove_engine_forgets_everything() {
        let mut factory = WritingSystemFactory::default();
        let en = factory.engine("en").unwrap().id().unwrap();
        factory.set_user_ws(en).unwrap();
        let removed = factory.remove_engine(en).unwrap();
        assert_eq!(removed.locale_str(), "en");
        assert!(factory.engine_or_null(en).is_none());
        assert!(factory.ws_from_str("en").is_none());
        assert_eq!(
            factory.remove_engine(en).unwrap_err().kind(),
            ErrorKind::UnknownWs
        );
        assert_eq!(
            factory.set_user_ws(en).unwrap_err().kind(),
            ErrorKind::UnknownWs
        );
    }

    #[test]
    fn user_ws_defaults_to_user_locale() {
        let mut factory = WritingSystemFactory::new(FactoryOptions {
            user_locale: langid!("pt-BR"),
            ..FactoryOptions::default()
        });
        let user = factory.user_ws().unwrap();
        assert_eq!(factory.str_from_ws(user).as_deref(), Some("pt-BR"));
        let es = factory.engine("es").unwrap().id().unwrap();
        factory.set_user_ws(es).unwrap();
        assert_eq!(factory.user_ws().unwrap(), es);
    }

    #[test]
    fn renderers_are_cached_until_changed() {
        let mut factory = WritingSystemFactory::default();
        let he = factory.engine("he").unwrap().id().unwrap();
        let first = factory.renderer(he).unwrap();
        assert!(Arc::ptr_eq(&first, &factory.renderer(he).unwrap()));

        let system = factory.engine_mut("he").unwrap();
        system.set_renderer(RendererKind::Graphite);
        system.set_right_to_left(true);
        let second = factory.renderer(he).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        // Graphite is not available, so the Rom engine stands in.
        assert_eq!(second.kind(), RendererKind::Rom);

        assert_eq!(
            factory.renderer(ws(999)).unwrap_err().kind(),
            ErrorKind::UnknownWs
        );
        assert_eq!(factory.renderer_for(Some(999)).kind(), RendererKind::Rom);
    }

    #[test]
    fn shutdown_and_clear() {
        let mut factory = WritingSystemFactory::default();
        let en = factory.engine("en").unwrap().id().unwrap();
        factory.renderer(en).unwrap();

        factory.clear();
        assert_eq!(factory.ws_count(), 0);
        assert!(!factory.is_shut_down());
        assert_eq!(factory.engine("fr").unwrap().id(), Some(ws(1)));

        factory.shutdown();
        assert!(factory.is_shut_down());
        assert_eq!(factory.ws_count(), 0);
        assert_eq!(factory.engine("fr").unwrap_err().kind(), ErrorKind::ShutDown);
        assert_eq!(factory.renderer(ws(1)).unwrap_err().kind(), ErrorKind::ShutDown);
        assert_eq!(factory.user_ws().unwrap_err().kind(), ErrorKind::ShutDown);
        assert!(factory.engine_or_null(ws(1)).is_none());
    }

    #[test]
    fn factory_provides_renderers_for_paragraphs() {
        let mut factory = WritingSystemFactory::default();
        let en = factory.engine("en").unwrap().id().unwrap().get();
        let he = factory.engine("he").unwrap().id().unwrap().get();
        factory.engine_mut("he").unwrap().set_right_to_left(true);

        let mut bldr = StrBuilder::new(TextProps::with_ws(en));
        bldr.replace(0..0, "abc ", None).unwrap();
        bldr.replace(4..4, "def", Some(&TextProps::with_ws(he)))
            .unwrap();
        let text = bldr.build();
        let gr = FixedPitchGraphics::new();
        let lines = ParagraphBreaker::new(
            &mut factory,
            &gr,
            &text,
            None,
            ParagraphOptions::new(100.0),
        )
        .break_all()
        .unwrap();
        assert_eq!(lines.len(), 1);
        let rtl: Vec<bool> = lines[0].segments.iter().map(|s| s.is_rtl()).collect();
        assert_eq!(rtl, [false, true]);
    }

    #[test]
    fn global_is_shared() {
        let id = global().lock().unwrap().engine("yo").unwrap().id();
        assert!(id.is_some());
        assert_eq!(global().lock().unwrap().ws_from_str("yo"), id);
        assert!(core::ptr::eq(global(), global()));
    }
}
