// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! XML form of a structured string.
//!
//! ```xml
//! <Str><Run ws="1">plain </Run><Run ws="2" bold="1:enum" fontFamily="Ezra SIL">text</Run></Str>
//! ```
//!
//! Integer properties are written as `value` when their variation is the default and as
//! `value:variation` otherwise. Codes without a known name are written as `intN`/`strN`.

use alloc::format;
use alloc::string::String;
use core::fmt::{self, Write};

use roxmltree::{Document, Node};
use text_props::{IntPropCode, PropsBuilder, StrPropCode, TextProps, Variation};

use crate::{Error, IncStrBuilder, TsString};

impl TsString {
    /// Writes this string as a `<Str>` element.
    pub fn write_as_xml(&self, out: &mut impl Write) -> fmt::Result {
        out.write_str("<Str>")?;
        for info in self.runs() {
            out.write_str("<Run")?;
            write_props_attrs(&info.props, out)?;
            out.write_char('>')?;
            write_escaped_text(&self.text()[info.range], out)?;
            out.write_str("</Run>")?;
        }
        out.write_str("</Str>")
    }

    /// Returns the XML form as a string.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_as_xml(&mut out)
            .expect("writing to a String cannot fail");
        out
    }

    /// Parses a `<Str>` element written by [`write_as_xml`](Self::write_as_xml).
    ///
    /// Unknown attributes are skipped with a warning.
    pub fn from_xml(xml: &str) -> Result<Self, Error> {
        let doc = Document::parse(xml).map_err(|err| Error::malformed_xml(format!("{err}")))?;
        Self::from_xml_node(doc.root_element())
    }

    /// Parses a `<Str>` element that is part of a larger document.
    pub fn from_xml_node(node: Node<'_, '_>) -> Result<Self, Error> {
        if node.tag_name().name() != "Str" {
            return Err(Error::malformed_xml(format!(
                "expected <Str>, found <{}>",
                node.tag_name().name()
            )));
        }
        let mut bldr = IncStrBuilder::new();
        let mut saw_run = false;
        for run in node.children().filter(Node::is_element) {
            if run.tag_name().name() != "Run" {
                log::warn!("skipping unexpected <{}> in <Str>", run.tag_name().name());
                continue;
            }
            saw_run = true;
            bldr.set_props(&parse_props_attrs(run)?);
            let text: String = run
                .children()
                .filter(Node::is_text)
                .filter_map(|child| child.text())
                .collect();
            bldr.append(&text);
        }
        if !saw_run {
            return Err(Error::malformed_xml("<Str> has no <Run>"));
        }
        Ok(bldr.build())
    }
}

/// Writes the attributes for a property set, each preceded by a space.
pub(crate) fn write_props_attrs(props: &TextProps, out: &mut impl Write) -> fmt::Result {
    for (code, prop) in props.int_props() {
        match code.name() {
            Some(name) => write!(out, " {name}=\"")?,
            None => write!(out, " int{}=\"", code.0)?,
        }
        if prop.var == Variation::Default {
            write!(out, "{}\"", prop.value)?;
        } else {
            write!(out, "{}:{}\"", prop.value, prop.var.name())?;
        }
    }
    for (code, value) in props.str_props() {
        match code.name() {
            Some(name) => write!(out, " {name}=\"")?,
            None => write!(out, " str{}=\"", code.0)?,
        }
        write_escaped_attr(value, out)?;
        out.write_char('"')?;
    }
    Ok(())
}

pub(crate) fn parse_props_attrs(node: Node<'_, '_>) -> Result<TextProps, Error> {
    let mut bldr = PropsBuilder::new();
    for attr in node.attributes() {
        let name = attr.name();
        let value = attr.value();
        let int_code =
            IntPropCode::from_name(name).or_else(|| numbered(name, "int").map(IntPropCode));
        if let Some(code) = int_code {
            let (number, var) = match value.split_once(':') {
                Some((number, var)) => (
                    number,
                    Variation::from_name(var).ok_or_else(|| {
                        Error::malformed_xml(format!("unknown variation {var:?} on {name}"))
                    })?,
                ),
                None => (value, Variation::Default),
            };
            let number = number.parse::<i32>().map_err(|_| {
                Error::malformed_xml(format!("{name}={value:?} is not an integer"))
            })?;
            bldr.set_int_prop(code, var, number);
        } else if let Some(code) =
            StrPropCode::from_name(name).or_else(|| numbered(name, "str").map(StrPropCode))
        {
            bldr.set_str_prop(code, value);
        } else {
            log::warn!("skipping unknown text property attribute {name:?}");
        }
    }
    Ok(bldr.build())
}

fn numbered(name: &str, prefix: &str) -> Option<u16> {
    name.strip_prefix(prefix)?.parse().ok()
}

/// Writes `text` as XML element content.
///
/// Carriage returns are written as character references, since parsers turn a literal `\r` or
/// `\r\n` into `\n`.
pub fn write_escaped_text(text: &str, out: &mut impl Write) -> fmt::Result {
    write_escaped(text, false, out)
}

/// Writes `value` as the inside of a double-quoted XML attribute value.
///
/// Tabs, newlines and carriage returns are written as character references, since parsers
/// replace literal ones with spaces.
pub fn write_escaped_attr(value: &str, out: &mut impl Write) -> fmt::Result {
    write_escaped(value, true, out)
}

fn write_escaped(text: &str, attr: bool, out: &mut impl Write) -> fmt::Result {
    for ch in text.chars() {
        match ch {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' => out.write_str("&quot;")?,
            '\r' => out.write_str("&#13;")?,
            '\n' if attr => out.write_str("&#10;")?,
            '\t' if attr => out.write_str("&#9;")?,
            _ => out.write_char(ch)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{ErrorKind, StrBuilder, TsString, write_escaped_attr, write_escaped_text};
    use alloc::string::String;
    use text_props::{IntPropCode, PropsBuilder, StrPropCode, TextProps, Variation};

    #[test]
    fn writes_runs_and_props() {
        let mut bold = PropsBuilder::new();
        bold.set_int_prop(IntPropCode::WS, Variation::Default, 1)
            .set_int_prop(IntPropCode::BOLD, Variation::Enum, 1);
        let mut bldr = StrBuilder::new(TextProps::with_ws(1));
        bldr.replace(0..0, "a<b", None).unwrap();
        bldr.replace(3..3, "&c", Some(&bold.build())).unwrap();
        assert_eq!(
            bldr.build().to_xml(),
            "<Str><Run ws=\"1\">a&lt;b</Run><Run ws=\"1\" bold=\"1:enum\">&amp;c</Run></Str>"
        );
    }

    #[test]
    fn xml_round_trip() {
        let mut props = PropsBuilder::new();
        props
            .set_int_prop(IntPropCode::WS, Variation::Default, 3)
            .set_int_prop(IntPropCode(500), Variation::MilliPoint, -4)
            .set_str_prop(StrPropCode::FONT_FAMILY, "\"Quoted\" Sans")
            .set_str_prop(StrPropCode(77), "x");
        let mut bldr = StrBuilder::new(TextProps::with_ws(1));
        bldr.replace(0..0, "  leading space", None).unwrap();
        bldr.replace(2..9, "ΑΒΓ", Some(&props.build())).unwrap();
        let s = bldr.build();
        assert_eq!(TsString::from_xml(&s.to_xml()).unwrap(), s);
    }

    #[test]
    fn control_whitespace_round_trip() {
        let mut tagged = PropsBuilder::new();
        tagged
            .set_int_prop(IntPropCode::WS, Variation::Default, 1)
            .set_str_prop(StrPropCode::TAGS, "a\tb\nc\r\nd");
        let mut bldr = StrBuilder::new(TextProps::with_ws(1));
        bldr.replace(0..0, "ab\rcd\r\nef\t", None).unwrap();
        bldr.replace(2..2, "x", Some(&tagged.build())).unwrap();
        let s = bldr.build();
        let xml = s.to_xml();
        assert!(xml.contains("a&#9;b&#10;c&#13;&#10;d"), "{xml}");
        assert!(xml.contains("&#13;cd&#13;\nef\t"), "{xml}");
        let back = TsString::from_xml(&xml).unwrap();
        assert_eq!(back.text(), s.text());
        assert_eq!(back, s);
    }

    #[test]
    fn escaping_helpers() {
        let mut text = String::new();
        write_escaped_text("<a\tb\r\n\"&>", &mut text).unwrap();
        assert_eq!(text, "&lt;a\tb&#13;\n&quot;&amp;&gt;");
        let mut attr = String::new();
        write_escaped_attr("a\tb\r\n", &mut attr).unwrap();
        assert_eq!(attr, "a&#9;b&#13;&#10;");
    }

    #[test]
    fn empty_string_round_trip() {
        let s = TsString::empty(TextProps::with_ws(4));
        assert_eq!(s.to_xml(), "<Str><Run ws=\"4\"></Run></Str>");
        assert_eq!(TsString::from_xml(&s.to_xml()).unwrap(), s);
    }

    #[test]
    fn rejects_malformed() {
        for xml in [
            "<Str>",
            "<Other/>",
            "<Str></Str>",
            "<Str><Run bold=\"x\">a</Run></Str>",
            "<Str><Run bold=\"1:weird\">a</Run></Str>",
        ] {
            let err = TsString::from_xml(xml).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedXml, "{xml}");
        }
    }
}
