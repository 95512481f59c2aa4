// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroU32;

use char_engines::{CharacterPropertyEngine, CollatingEngine};
use icu_locale_core::LanguageIdentifier;
use render_engine::{EngineSettings, RendererKind};

/// A writing system identifier. Zero is never a valid id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WsId(NonZeroU32);

impl WsId {
    /// Wraps a raw id, or returns `None` for zero.
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    /// The raw id, as stored in the `ws` text property.
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for WsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named collation of a writing system.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collation {
    /// Display name.
    pub name: String,
    /// ICU tailoring rules, kept for persistence.
    pub icu_rules: String,
    /// Whitespace separated elements that sort first, in this order. See
    /// [`CollatingEngine::with_primary_order`].
    pub primary_order: String,
}

impl Collation {
    /// Creates an untailored collation.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds the engine that sorts by this collation.
    pub fn collating_engine(&self) -> CollatingEngine {
        if self.primary_order.trim().is_empty() {
            CollatingEngine::new()
        } else {
            CollatingEngine::with_primary_order(&self.primary_order)
        }
    }
}

macro_rules! text_settings {
    ($($(#[$meta:meta])* $field:ident, $setter:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $field(&self) -> &str {
                &self.$field
            }

            #[doc = concat!("Sets [`", stringify!($field), "`](Self::", stringify!($field), ").")]
            pub fn $setter(&mut self, value: impl Into<String>) {
                let value = value.into();
                if self.$field != value {
                    self.$field = value;
                    self.dirty = true;
                }
            }
        )*
    };
}

/// A writing system: a locale plus everything needed to render, sort and type text in it.
///
/// Every setter that changes a value marks the writing system dirty, so that
/// [`save_writing_systems`](crate::WritingSystemFactory::save_writing_systems) writes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WritingSystem {
    pub(crate) id: Option<WsId>,
    locale: LanguageIdentifier,
    name: String,
    abbreviation: String,
    right_to_left: bool,
    renderer: RendererKind,
    default_serif: String,
    default_sans_serif: String,
    default_monospace: String,
    font_variation: String,
    keyboard: String,
    input_method: String,
    spell_check_dictionary: String,
    word_forming_overrides: Vec<char>,
    collations: Vec<Collation>,
    pub(crate) dirty: bool,
}

impl WritingSystem {
    /// Creates a new, unsaved writing system for `locale`, named after it.
    pub fn new(locale: LanguageIdentifier) -> Self {
        let name = locale.to_string();
        Self {
            id: None,
            abbreviation: name.clone(),
            name,
            locale,
            right_to_left: false,
            renderer: RendererKind::Rom,
            default_serif: String::new(),
            default_sans_serif: String::new(),
            default_monospace: String::new(),
            font_variation: String::new(),
            keyboard: String::new(),
            input_method: String::new(),
            spell_check_dictionary: String::new(),
            word_forming_overrides: Vec::new(),
            collations: Vec::new(),
            dirty: true,
        }
    }

    /// Creates a writing system with a fixed id, as when restoring saved ones.
    pub fn with_id(id: WsId, locale: LanguageIdentifier) -> Self {
        Self {
            id: Some(id),
            ..Self::new(locale)
        }
    }

    /// The id, once registered with a factory.
    pub fn id(&self) -> Option<WsId> {
        self.id
    }

    /// The locale.
    pub fn locale(&self) -> &LanguageIdentifier {
        &self.locale
    }

    /// The canonical locale string, used as the lookup key.
    pub fn locale_str(&self) -> String {
        self.locale.to_string()
    }

    text_settings! {
        /// Display name.
        name, set_name;
        /// Short name for tight spaces.
        abbreviation, set_abbreviation;
        /// Font family for serif text.
        default_serif, set_default_serif;
        /// Font family for sans-serif text.
        default_sans_serif, set_default_sans_serif;
        /// Font family for monospace text.
        default_monospace, set_default_monospace;
        /// Font feature settings applied to every font.
        font_variation, set_font_variation;
        /// Keyboard layout name.
        keyboard, set_keyboard;
        /// Input method name.
        input_method, set_input_method;
        /// Spelling dictionary id.
        spell_check_dictionary, set_spell_check_dictionary;
    }

    /// Returns `true` if text in this writing system runs right to left.
    pub fn right_to_left(&self) -> bool {
        self.right_to_left
    }

    /// Sets the direction.
    pub fn set_right_to_left(&mut self, rtl: bool) {
        if self.right_to_left != rtl {
            self.right_to_left = rtl;
            self.dirty = true;
        }
    }

    /// Which render engine lays out this writing system.
    pub fn renderer(&self) -> RendererKind {
        self.renderer
    }

    /// Sets the render engine.
    pub fn set_renderer(&mut self, kind: RendererKind) {
        if self.renderer != kind {
            self.renderer = kind;
            self.dirty = true;
        }
    }

    /// Characters that count as word-forming in this writing system, sorted.
    pub fn word_forming_overrides(&self) -> &[char] {
        &self.word_forming_overrides
    }

    /// Replaces the word-forming overrides.
    pub fn set_word_forming_overrides(&mut self, chars: impl IntoIterator<Item = char>) {
        let mut chars: Vec<char> = chars.into_iter().collect();
        chars.sort_unstable();
        chars.dedup();
        if self.word_forming_overrides != chars {
            self.word_forming_overrides = chars;
            self.dirty = true;
        }
    }

    /// The collations, the first being the default.
    pub fn collations(&self) -> &[Collation] {
        &self.collations
    }

    /// Appends a collation.
    pub fn add_collation(&mut self, collation: Collation) {
        self.collations.push(collation);
        self.dirty = true;
    }

    /// Removes and returns the collation at `index`.
    pub fn remove_collation(&mut self, index: usize) -> Option<Collation> {
        if index >= self.collations.len() {
            return None;
        }
        self.dirty = true;
        Some(self.collations.remove(index))
    }

    /// Builds the engine for collation `index`, or `None` if there is no such collation.
    pub fn collating_engine(&self, index: usize) -> Option<CollatingEngine> {
        self.collations.get(index).map(Collation::collating_engine)
    }

    /// Builds a character property engine that honors the word-forming overrides.
    pub fn character_property_engine(&self) -> CharacterPropertyEngine {
        CharacterPropertyEngine::new()
            .with_word_forming_overrides(self.word_forming_overrides.iter().copied())
    }

    /// The settings a render engine for this writing system is built with.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            right_to_left: self.right_to_left,
        }
    }

    /// Returns `true` if the writing system changed since it was last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::{Collation, WritingSystem, WsId};
    use char_engines::CollationOptions;
    use core::cmp::Ordering;
    use icu_locale_core::langid;
    use render_engine::RendererKind;

    #[test]
    fn zero_is_not_an_id() {
        assert!(WsId::new(0).is_none());
        assert_eq!(WsId::new(7).map(WsId::get), Some(7));
    }

    #[test]
    fn setters_mark_dirty_only_on_change() {
        let mut ws = WritingSystem::new(langid!("en-US"));
        assert_eq!(ws.name(), "en-US");
        ws.dirty = false;
        ws.set_name("en-US");
        ws.set_renderer(RendererKind::Rom);
        assert!(!ws.is_dirty());
        ws.set_default_serif("Charis SIL");
        assert!(ws.is_dirty());
        assert_eq!(ws.default_serif(), "Charis SIL");
    }

    #[test]
    fn engines_follow_settings() {
        let mut ws = WritingSystem::new(langid!("es"));
        ws.set_word_forming_overrides(['\'', '-', '\'']);
        assert_eq!(ws.word_forming_overrides(), ['\'', '-']);
        assert!(ws.character_property_engine().is_word_forming('\''));

        let mut trad = Collation::new("Traditional");
        trad.primary_order = "c ch d".into();
        ws.add_collation(Collation::new("Default"));
        ws.add_collation(trad);
        let opts = CollationOptions::default();
        let plain = ws.collating_engine(0).unwrap();
        assert_eq!(plain.compare("chico", "cuna", opts), Ordering::Less);
        let traditional = ws.collating_engine(1).unwrap();
        assert_eq!(traditional.compare("chico", "cuna", opts), Ordering::Greater);
        assert!(ws.collating_engine(2).is_none());

        ws.set_right_to_left(true);
        assert!(ws.engine_settings().right_to_left);
    }
}
