// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Saving and restoring writing systems.
//!
//! ```xml
//! <WritingSystems>
//!   <LgWritingSystem id="1" locale="es" name="Spanish" abbr="Spa" rtl="false" renderer="rom"
//!       serif="Charis SIL" wordForming="'">
//!     <Collation name="Traditional" primaryOrder="c ch d"/>
//!   </LgWritingSystem>
//! </WritingSystems>
//! ```
//!
//! Empty settings are left out.

use alloc::format;
use alloc::string::String;
use core::fmt::Write;

use icu_locale_core::LanguageIdentifier;
use render_engine::RendererKind;
use roxmltree::{Document, Node};
use ts_string::write_escaped_attr;

use crate::{Collation, Error, FactoryOptions, WritingSystem, WritingSystemFactory, WsId};

impl WritingSystemFactory {
    /// Writes every writing system in a `<WritingSystems>` element.
    pub fn serialize(&self, out: &mut impl Write) -> Result<(), Error> {
        self.check_live()?;
        out.write_str("<WritingSystems>")?;
        for ws in self.sorted_systems() {
            write_ws(ws, out)?;
        }
        out.write_str("</WritingSystems>")?;
        Ok(())
    }

    /// Writes the writing systems that changed since they were last saved, then marks them
    /// clean. Returns how many were written.
    pub fn save_writing_systems(&mut self, out: &mut impl Write) -> Result<usize, Error> {
        self.check_live()?;
        out.write_str("<WritingSystems>")?;
        let mut count = 0;
        for ws in self.sorted_systems().filter(|ws| ws.is_dirty()) {
            write_ws(ws, out)?;
            count += 1;
        }
        out.write_str("</WritingSystems>")?;
        for ws in self.systems_mut() {
            ws.dirty = false;
        }
        log::debug!("saved {count} writing systems");
        Ok(count)
    }

    /// Creates a factory holding the writing systems of a `<WritingSystems>` element.
    ///
    /// The restored writing systems are clean. Unknown elements are skipped with a warning.
    pub fn deserialize(xml: &str, options: FactoryOptions) -> Result<Self, Error> {
        let doc = Document::parse(xml).map_err(|err| Error::malformed_xml(format!("{err}")))?;
        let root = doc.root_element();
        if root.tag_name().name() != "WritingSystems" {
            return Err(Error::malformed_xml(format!(
                "expected <WritingSystems>, found <{}>",
                root.tag_name().name()
            )));
        }
        let mut factory = Self::new(options);
        for node in root.children().filter(Node::is_element) {
            if node.tag_name().name() != "LgWritingSystem" {
                log::warn!("skipping unexpected <{}> in <WritingSystems>", node.tag_name().name());
                continue;
            }
            let mut ws = read_ws(node)?;
            ws.dirty = false;
            factory.add_engine(ws)?;
        }
        Ok(factory)
    }
}

fn write_ws(ws: &WritingSystem, out: &mut impl Write) -> Result<(), Error> {
    out.write_str("<LgWritingSystem")?;
    if let Some(id) = ws.id() {
        write!(out, " id=\"{id}\"")?;
    }
    write_attr(out, "locale", &ws.locale_str())?;
    write_attr(out, "name", ws.name())?;
    write_attr(out, "abbr", ws.abbreviation())?;
    write!(out, " rtl=\"{}\"", ws.right_to_left())?;
    write_attr(out, "renderer", ws.renderer().name())?;
    write_attr(out, "serif", ws.default_serif())?;
    write_attr(out, "sansSerif", ws.default_sans_serif())?;
    write_attr(out, "monospace", ws.default_monospace())?;
    write_attr(out, "fontVariation", ws.font_variation())?;
    write_attr(out, "keyboard", ws.keyboard())?;
    write_attr(out, "inputMethod", ws.input_method())?;
    write_attr(out, "spellCheck", ws.spell_check_dictionary())?;
    let word_forming: String = ws.word_forming_overrides().iter().collect();
    write_attr(out, "wordForming", &word_forming)?;
    if ws.collations().is_empty() {
        out.write_str("/>")?;
        return Ok(());
    }
    out.write_char('>')?;
    for coll in ws.collations() {
        out.write_str("<Collation")?;
        write_attr(out, "name", &coll.name)?;
        write_attr(out, "icuRules", &coll.icu_rules)?;
        write_attr(out, "primaryOrder", &coll.primary_order)?;
        out.write_str("/>")?;
    }
    out.write_str("</LgWritingSystem>")?;
    Ok(())
}

/// Writes ` name="value"` unless `value` is empty.
fn write_attr(out: &mut impl Write, name: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Ok(());
    }
    write!(out, " {name}=\"")?;
    write_escaped_attr(value, out)?;
    out.write_char('"')?;
    Ok(())
}

fn read_ws(node: Node<'_, '_>) -> Result<WritingSystem, Error> {
    let locale = node
        .attribute("locale")
        .ok_or_else(|| Error::malformed_xml("<LgWritingSystem> has no locale"))?;
    let locale = LanguageIdentifier::try_from_str(locale)
        .map_err(|_| Error::invalid_locale(locale))?;
    let mut ws = match node.attribute("id") {
        Some(id) => {
            let id = id
                .parse()
                .ok()
                .and_then(WsId::new)
                .ok_or_else(|| Error::malformed_xml(format!("{id:?} is not a writing system id")))?;
            WritingSystem::with_id(id, locale)
        }
        None => WritingSystem::new(locale),
    };
    let attr = |name: &str| node.attribute(name).unwrap_or_default();
    if let Some(name) = node.attribute("name") {
        ws.set_name(name);
    }
    if let Some(abbr) = node.attribute("abbr") {
        ws.set_abbreviation(abbr);
    }
    ws.set_right_to_left(match attr("rtl") {
        "" | "false" | "0" => false,
        "true" | "1" => true,
        other => return Err(Error::malformed_xml(format!("rtl={other:?} is not a boolean"))),
    });
    if let Some(renderer) = node.attribute("renderer") {
        match RendererKind::from_name(renderer) {
            Some(kind) => ws.set_renderer(kind),
            None => log::warn!("unknown renderer {renderer:?}, using rom"),
        }
    }
    ws.set_default_serif(attr("serif"));
    ws.set_default_sans_serif(attr("sansSerif"));
    ws.set_default_monospace(attr("monospace"));
    ws.set_font_variation(attr("fontVariation"));
    ws.set_keyboard(attr("keyboard"));
    ws.set_input_method(attr("inputMethod"));
    ws.set_spell_check_dictionary(attr("spellCheck"));
    ws.set_word_forming_overrides(attr("wordForming").chars());

    for child in node.children().filter(Node::is_element) {
        if child.tag_name().name() != "Collation" {
            log::warn!("skipping unexpected <{}> in <LgWritingSystem>", child.tag_name().name());
            continue;
        }
        ws.add_collation(Collation {
            name: child.attribute("name").unwrap_or_default().into(),
            icu_rules: child.attribute("icuRules").unwrap_or_default().into(),
            primary_order: child.attribute("primaryOrder").unwrap_or_default().into(),
        });
    }
    Ok(ws)
}

#[cfg(test)]
mod tests {
    use crate::{Collation, ErrorKind, FactoryOptions, WritingSystemFactory};
    use alloc::string::String;
    use render_engine::RendererKind;

    fn sample() -> WritingSystemFactory {
        let mut factory = WritingSystemFactory::default();
        factory.engine("en").unwrap();
        let es = factory.engine_mut("es").unwrap();
        es.set_name("Spanish \"traditional\" & <co>");
        es.set_default_serif("Charis SIL");
        es.set_word_forming_overrides(['\'']);
        let mut trad = Collation::new("Traditional");
        trad.primary_order = "c ch d ll".into();
        trad.icu_rules = "&c < ch\n&l < ll".into();
        es.add_collation(Collation::new("Default"));
        es.add_collation(trad);
        let he = factory.engine_mut("he").unwrap();
        he.set_right_to_left(true);
        he.set_renderer(RendererKind::Graphite);
        factory
    }

    #[test]
    fn deserialize_restores_saved_writing_systems() {
        let mut factory = sample();
        let mut xml = String::new();
        assert_eq!(factory.save_writing_systems(&mut xml).unwrap(), 3);

        let restored = WritingSystemFactory::deserialize(&xml, FactoryOptions::default()).unwrap();
        assert_eq!(restored.ws_ids(), factory.ws_ids());
        for ws in factory.ws_ids() {
            assert_eq!(restored.engine_or_null(ws), factory.engine_or_null(ws));
        }

        let mut again = String::new();
        restored.serialize(&mut again).unwrap();
        let mut original = String::new();
        factory.serialize(&mut original).unwrap();
        assert_eq!(again, original);
    }

    #[test]
    fn line_endings_and_tabs_survive_reloading() {
        let mut factory = WritingSystemFactory::default();
        let ws = factory.engine("es").unwrap().id().unwrap();
        let es = factory.engine_mut("es").unwrap();
        es.set_font_variation("wght=700\twdth=80");
        let mut trad = Collation::new("Traditional");
        trad.icu_rules = "&c < ch\r\n&l < ll\r".into();
        es.add_collation(trad);

        let mut xml = String::new();
        factory.serialize(&mut xml).unwrap();
        assert!(xml.contains("&amp;c &lt; ch&#13;&#10;&amp;l &lt; ll&#13;"), "{xml}");
        let restored = WritingSystemFactory::deserialize(&xml, FactoryOptions::default()).unwrap();
        let back = restored.engine_or_null(ws).unwrap();
        assert_eq!(back.collations()[0].icu_rules, "&c < ch\r\n&l < ll\r");
        assert_eq!(back.font_variation(), "wght=700\twdth=80");
    }

    #[test]
    fn save_writes_only_changed_systems() {
        let mut factory = sample();
        let mut sink = String::new();
        factory.save_writing_systems(&mut sink).unwrap();
        sink.clear();
        assert_eq!(factory.save_writing_systems(&mut sink).unwrap(), 0);
        assert_eq!(sink, "<WritingSystems></WritingSystems>");

        factory.engine_mut("en").unwrap().set_keyboard("US");
        sink.clear();
        assert_eq!(factory.save_writing_systems(&mut sink).unwrap(), 1);
        assert!(sink.contains("keyboard=\"US\""));
        assert!(!sink.contains("locale=\"es\""));
    }

    #[test]
    fn malformed_documents_are_rejected() {
        let opts = FactoryOptions::default;
        for xml in [
            "<WritingSystems>",
            "<Other/>",
            "<WritingSystems><LgWritingSystem name=\"x\"/></WritingSystems>",
            "<WritingSystems><LgWritingSystem id=\"0\" locale=\"en\"/></WritingSystems>",
            "<WritingSystems><LgWritingSystem locale=\"en\" rtl=\"maybe\"/></WritingSystems>",
        ] {
            let err = WritingSystemFactory::deserialize(xml, opts()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedXml, "{xml}");
        }
        let dup = "<WritingSystems><LgWritingSystem id=\"1\" locale=\"en\"/>\
                   <LgWritingSystem id=\"1\" locale=\"fr\"/></WritingSystems>";
        assert_eq!(
            WritingSystemFactory::deserialize(dup, opts()).unwrap_err().kind(),
            ErrorKind::DuplicateId
        );
    }

    #[test]
    fn unknown_elements_are_skipped() {
        let xml = "<WritingSystems><Comment/><LgWritingSystem locale=\"fr\" renderer=\"pango\">\
                   <Font/></LgWritingSystem></WritingSystems>";
        let mut factory =
            WritingSystemFactory::deserialize(xml, FactoryOptions::default()).unwrap();
        let fr = factory.engine("fr").unwrap();
        assert_eq!(fr.renderer(), RendererKind::Rom);
        assert!(!fr.is_dirty());
        assert_eq!(factory.ws_count(), 1);
    }
}
