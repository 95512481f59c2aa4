// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading a schema from its XML description.
//!
//! ```xml
//! <EntireModel>
//!   <CellarModule id="Cellar" num="0">
//!     <class num="0" id="CmObject" abstract="true"/>
//!     <class num="7" id="CmPossibility" base="CmObject">
//!       <props>
//!         <basic num="1" id="Name" sig="MultiUnicode"/>
//!         <owning num="2" id="SubPossibilities" card="seq" sig="CmPossibility"/>
//!         <rel num="3" id="Confidence" card="atomic" sig="CmPossibility"/>
//!       </props>
//!     </class>
//!   </CellarModule>
//! </EntireModel>
//! ```
//!
//! Class ids are the module number times 1000 plus the class number, and field ids are the
//! class id times 1000 plus the field number. Classes may appear before their base classes.

use alloc::format;
use alloc::vec::Vec;

use roxmltree::{Document, Node};

use crate::{ClassId, Error, ErrorKind, FieldType, MetaDataCache, MetaDataCacheBuilder};

struct ClassDef<'a, 'input> {
    clid: ClassId,
    name: &'a str,
    base: Option<&'a str>,
    is_abstract: bool,
    node: Node<'a, 'input>,
}

impl MetaDataCache {
    /// Loads the schema described by an `<EntireModel>` document.
    ///
    /// Unknown elements are skipped with a warning.
    pub fn from_xml(xml: &str) -> Result<Self, Error> {
        let doc = Document::parse(xml).map_err(|err| Error::malformed_xml(format!("{err}")))?;
        let root = doc.root_element();
        if root.tag_name().name() != "EntireModel" {
            return Err(Error::malformed_xml(format!(
                "expected <EntireModel>, found <{}>",
                root.tag_name().name()
            )));
        }

        let mut defs = Vec::new();
        for module in elements(root, "CellarModule", "EntireModel") {
            let module_num = number(module, "num")?;
            for class in elements(module, "class", "CellarModule") {
                let clid = id_in(module_num, number(class, "num")?)?;
                defs.push(ClassDef {
                    clid,
                    name: required(class, "id")?,
                    base: class.attribute("base"),
                    is_abstract: flag(class, "abstract")?,
                    node: class,
                });
            }
        }

        let mut bldr = MetaDataCache::builder();
        add_classes(&mut bldr, &defs)?;
        for def in &defs {
            for props in elements(def.node, "props", "class") {
                for prop in props.children().filter(Node::is_element) {
                    add_field(&mut bldr, def.clid, prop)?;
                }
            }
        }
        Ok(bldr.build())
    }
}

/// Adds classes so that every base class comes before its subclasses.
fn add_classes(bldr: &mut MetaDataCacheBuilder, defs: &[ClassDef<'_, '_>]) -> Result<(), Error> {
    let mut pending: Vec<&ClassDef<'_, '_>> = defs.iter().collect();
    while !pending.is_empty() {
        let before = pending.len();
        let mut i = 0;
        while i < pending.len() {
            let def = pending[i];
            let base = match def.base {
                None => None,
                Some(name) => match bldr.class_id(name) {
                    Some(base) => Some(base),
                    None => {
                        i += 1;
                        continue;
                    }
                },
            };
            bldr.add_class(def.clid, def.name, base, def.is_abstract)?;
            pending.swap_remove(i);
        }
        if pending.len() == before {
            let def = pending[0];
            let base = def.base.unwrap_or_default();
            let kind = if defs.iter().any(|other| other.name == base) {
                ErrorKind::InheritanceCycle
            } else {
                ErrorKind::UnknownBase
            };
            let name = if kind == ErrorKind::UnknownBase {
                base
            } else {
                def.name
            };
            return Err(Error::new(kind, Some(def.clid), Some(name)));
        }
    }
    Ok(())
}

fn add_field(
    bldr: &mut MetaDataCacheBuilder,
    clid: ClassId,
    prop: Node<'_, '_>,
) -> Result<(), Error> {
    let kind = prop.tag_name().name();
    if !matches!(kind, "basic" | "owning" | "rel") {
        log::warn!("skipping unexpected <{kind}> in <props>");
        return Ok(());
    }
    let flid = id_in(clid, number(prop, "num")?)?;
    let name = required(prop, "id")?;
    let sig = required(prop, "sig")?;
    let (ty, dst) = if kind == "basic" {
        let ty = FieldType::from_name(sig).ok_or_else(|| {
            Error::new(ErrorKind::InvalidSignature, Some(flid), Some(name))
        })?;
        (ty, None)
    } else {
        let card = required(prop, "card")?;
        let ty = FieldType::from_relation(kind == "owning", card).ok_or_else(|| {
            Error::malformed_xml(format!("unknown cardinality {card:?} on {name}"))
        })?;
        let dst = bldr
            .class_id(sig)
            .ok_or_else(|| Error::new(ErrorKind::UnknownClass, Some(flid), Some(sig)))?;
        (ty, Some(dst))
    };
    bldr.add_field(flid, clid, name, ty, dst)?;
    let label = prop.attribute("label").unwrap_or_default();
    let help = prop.attribute("help").unwrap_or_default();
    if !label.is_empty() || !help.is_empty() {
        bldr.set_field_text(flid, label, help)?;
    }
    Ok(())
}

/// Child elements of `node` called `name`; others are skipped with a warning.
fn elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
    parent: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element).filter(move |child| {
        let matched = child.tag_name().name() == name;
        if !matched {
            log::warn!("skipping unexpected <{}> in <{parent}>", child.tag_name().name());
        }
        matched
    })
}

fn required<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, Error> {
    node.attribute(name).ok_or_else(|| {
        Error::malformed_xml(format!(
            "<{}> has no {name} attribute",
            node.tag_name().name()
        ))
    })
}

fn number(node: Node<'_, '_>, name: &str) -> Result<u32, Error> {
    let value = required(node, name)?;
    value
        .parse()
        .map_err(|_| Error::malformed_xml(format!("{name}={value:?} is not a number")))
}

fn flag(node: Node<'_, '_>, name: &str) -> Result<bool, Error> {
    match node.attribute(name) {
        None | Some("false") | Some("0") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some(other) => Err(Error::malformed_xml(format!(
            "{name}={other:?} is not a boolean"
        ))),
    }
}

/// `outer * 1000 + inner`, the numbering of classes within modules and fields within classes.
fn id_in(outer: u32, inner: u32) -> Result<u32, Error> {
    if inner >= 1000 {
        return Err(Error::malformed_xml(format!("number {inner} is out of range")));
    }
    outer
        .checked_mul(1000)
        .and_then(|base| base.checked_add(inner))
        .ok_or_else(|| Error::malformed_xml(format!("{outer} is too large to number")))
}

#[cfg(test)]
mod tests {
    use crate::{ErrorKind, FieldType, FieldTypeMask, MetaDataCache};

    const MODEL: &str = r#"
<EntireModel>
  <CellarModule id="Cellar" num="0">
    <class num="7" id="CmPossibility" abstract="false" base="CmObject">
      <props>
        <basic num="1" id="Name" sig="MultiUnicode" label="Name" help="What the item is called"/>
        <owning num="2" id="SubPossibilities" card="seq" sig="CmPossibility"/>
        <rel num="3" id="Confidence" card="atomic" sig="CmPossibility"/>
      </props>
    </class>
    <class num="0" id="CmObject" abstract="true"/>
    <class num="13" id="CmPerson" base="CmPossibility">
      <props><basic num="1" id="Gender" sig="Integer"/></props>
      <notes/>
    </class>
  </CellarModule>
  <CellarModule id="Ling" num="5">
    <class num="2" id="LexEntry" base="CmObject">
      <props>
        <owning num="5" id="Senses" card="seq" sig="LexSense"/>
      </props>
    </class>
    <class num="16" id="LexSense" base="CmObject"/>
  </CellarModule>
</EntireModel>"#;

    #[test]
    fn loads_classes_and_fields() {
        let mdc = MetaDataCache::from_xml(MODEL).unwrap();
        assert_eq!(mdc.class_ids(), [0, 7, 13, 5002, 5016]);
        assert_eq!(mdc.class_id("LexEntry"), Some(5002));
        assert_eq!(mdc.base_class_name(13).unwrap(), Some("CmPossibility"));
        assert!(mdc.is_abstract(0).unwrap());
        assert!(!mdc.is_abstract(7).unwrap());

        assert_eq!(mdc.field_ids(), [7001, 7002, 7003, 13001, 5002005]);
        assert_eq!(mdc.field_type(7001).unwrap(), FieldType::MultiUnicode);
        assert_eq!(mdc.field_type(7002).unwrap(), FieldType::OwningSequence);
        assert_eq!(mdc.field_type(7003).unwrap(), FieldType::ReferenceAtom);
        assert_eq!(mdc.dst_clid(5002005).unwrap(), Some(5016));
        assert_eq!(mdc.field_help(7001).unwrap(), "What the item is called");
        assert_eq!(mdc.field_id("LexEntry", "Senses", false), Some(5002005));
        assert_eq!(
            mdc.fields(13, true, FieldTypeMask::OBJECT).unwrap(),
            [7002, 7003]
        );
        assert_eq!(mdc.direct_subclasses(0).unwrap(), [7, 5002, 5016]);
        assert_eq!(mdc.all_subclasses(7).unwrap(), [7, 13]);
    }

    #[test]
    fn bad_hierarchies_are_rejected() {
        let unknown = r#"<EntireModel><CellarModule num="0">
            <class num="1" id="A" base="Missing"/>
        </CellarModule></EntireModel>"#;
        let err = MetaDataCache::from_xml(unknown).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownBase);
        assert_eq!(err.name(), Some("Missing"));

        let cycle = r#"<EntireModel><CellarModule num="0">
            <class num="0" id="Root"/>
            <class num="1" id="A" base="B"/>
            <class num="2" id="B" base="A"/>
        </CellarModule></EntireModel>"#;
        let err = MetaDataCache::from_xml(cycle).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InheritanceCycle);
    }

    #[test]
    fn bad_fields_are_rejected() {
        let cases = [
            (r#"<basic num="1" id="X" sig="Nope"/>"#, ErrorKind::InvalidSignature),
            (r#"<rel num="1" id="X" card="atomic" sig="Nope"/>"#, ErrorKind::UnknownClass),
            (r#"<rel num="1" id="X" card="many" sig="A"/>"#, ErrorKind::MalformedXml),
            (r#"<basic num="1000" id="X" sig="Integer"/>"#, ErrorKind::MalformedXml),
            (r#"<basic id="X" sig="Integer"/>"#, ErrorKind::MalformedXml),
            (
                r#"<basic num="1" id="X" sig="Integer"/><basic num="1" id="Y" sig="Integer"/>"#,
                ErrorKind::DuplicateField,
            ),
        ];
        for (props, expected) in cases {
            let xml = alloc::format!(
                r#"<EntireModel><CellarModule num="0"><class num="1" id="A">
                   <props>{props}</props></class></CellarModule></EntireModel>"#
            );
            let err = MetaDataCache::from_xml(&xml).unwrap_err();
            assert_eq!(err.kind(), expected, "{props}");
        }
    }

    #[test]
    fn rejects_other_documents() {
        for xml in ["<Model/>", "<EntireModel>", "<EntireModel><CellarModule/></EntireModel>"] {
            assert_eq!(
                MetaDataCache::from_xml(xml).unwrap_err().kind(),
                ErrorKind::MalformedXml
            );
        }
    }
}
