// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::{ClassId, Error, ErrorKind, FieldId, FieldType, FieldTypeMask};

#[derive(Clone, Debug, PartialEq, Eq)]
struct ClassInfo {
    name: String,
    is_abstract: bool,
    base: Option<ClassId>,
    fields: Vec<FieldId>,
    subclasses: Vec<ClassId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct FieldInfo {
    name: String,
    owner: ClassId,
    dst: Option<ClassId>,
    ty: FieldType,
    label: String,
    help: String,
    is_virtual: bool,
}

/// The class and field schema of an object store.
///
/// Classes form single-inheritance trees. The schema is fixed once built, except that virtual
/// fields can be added with [`add_virtual_prop`](Self::add_virtual_prop).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetaDataCache {
    classes: HashMap<ClassId, ClassInfo>,
    fields: HashMap<FieldId, FieldInfo>,
    class_by_name: HashMap<String, ClassId>,
}

impl MetaDataCache {
    /// Starts building a schema from a live store.
    pub fn builder() -> MetaDataCacheBuilder {
        MetaDataCacheBuilder::default()
    }

    /// The number of fields, virtual ones included.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// All field ids in increasing order.
    pub fn field_ids(&self) -> Vec<FieldId> {
        sorted(self.fields.keys().copied())
    }

    /// The class that declares field `flid`.
    pub fn owner_clid(&self, flid: FieldId) -> Result<ClassId, Error> {
        Ok(self.field(flid)?.owner)
    }

    /// The class of the objects field `flid` holds, for object fields with a known destination.
    pub fn dst_clid(&self, flid: FieldId) -> Result<Option<ClassId>, Error> {
        Ok(self.field(flid)?.dst)
    }

    /// The type of field `flid`.
    pub fn field_type(&self, flid: FieldId) -> Result<FieldType, Error> {
        Ok(self.field(flid)?.ty)
    }

    /// The name of field `flid`, unique within its class.
    pub fn field_name(&self, flid: FieldId) -> Result<&str, Error> {
        Ok(&self.field(flid)?.name)
    }

    /// The user-facing label of field `flid`, or an empty string.
    pub fn field_label(&self, flid: FieldId) -> Result<&str, Error> {
        Ok(&self.field(flid)?.label)
    }

    /// The help text of field `flid`, or an empty string.
    pub fn field_help(&self, flid: FieldId) -> Result<&str, Error> {
        Ok(&self.field(flid)?.help)
    }

    /// Returns `true` if field `flid` was added with
    /// [`add_virtual_prop`](Self::add_virtual_prop).
    pub fn is_virtual(&self, flid: FieldId) -> Result<bool, Error> {
        Ok(self.field(flid)?.is_virtual)
    }

    /// The number of classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// All class ids in increasing order.
    pub fn class_ids(&self) -> Vec<ClassId> {
        sorted(self.classes.keys().copied())
    }

    /// The name of class `clid`.
    pub fn class_name(&self, clid: ClassId) -> Result<&str, Error> {
        Ok(&self.class(clid)?.name)
    }

    /// Returns `true` if class `clid` cannot have instances.
    pub fn is_abstract(&self, clid: ClassId) -> Result<bool, Error> {
        Ok(self.class(clid)?.is_abstract)
    }

    /// The base class of `clid`, or `None` for a root class.
    pub fn base_clid(&self, clid: ClassId) -> Result<Option<ClassId>, Error> {
        Ok(self.class(clid)?.base)
    }

    /// The name of the base class of `clid`, or `None` for a root class.
    pub fn base_class_name(&self, clid: ClassId) -> Result<Option<&str>, Error> {
        match self.class(clid)?.base {
            Some(base) => Ok(Some(self.class_name(base)?)),
            None => Ok(None),
        }
    }

    /// The fields of `clid` whose type is in `mask`.
    ///
    /// With `include_superclasses`, inherited fields are included too, those of the root class
    /// first. Within a class, fields are in declaration order.
    pub fn fields(
        &self,
        clid: ClassId,
        include_superclasses: bool,
        mask: FieldTypeMask,
    ) -> Result<Vec<FieldId>, Error> {
        let mut chain = if include_superclasses {
            self.ancestry(clid)?
        } else {
            self.class(clid)?;
            vec![clid]
        };
        chain.reverse();
        let mut out = Vec::new();
        for class in chain {
            out.extend(
                self.class(class)?
                    .fields
                    .iter()
                    .copied()
                    .filter(|flid| self.fields.get(flid).is_some_and(|f| mask.contains(f.ty))),
            );
        }
        Ok(out)
    }

    /// The id of the class called `name`.
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.class_by_name.get(name).copied()
    }

    /// The id of field `field_name` of class `class_name`, looking in base classes too when
    /// `include_base` is set.
    pub fn field_id(
        &self,
        class_name: &str,
        field_name: &str,
        include_base: bool,
    ) -> Option<FieldId> {
        self.field_id2(self.class_id(class_name)?, field_name, include_base)
    }

    /// Like [`field_id`](Self::field_id), with the class given by id.
    pub fn field_id2(
        &self,
        clid: ClassId,
        field_name: &str,
        include_base: bool,
    ) -> Option<FieldId> {
        let mut class = Some(clid);
        while let Some(current) = class {
            let info = self.classes.get(&current)?;
            let found = info.fields.iter().copied().find(|flid| {
                self.fields
                    .get(flid)
                    .is_some_and(|field| field.name == field_name)
            });
            if found.is_some() || !include_base {
                return found;
            }
            class = info.base;
        }
        None
    }

    /// The classes whose base class is `clid`, in increasing id order.
    pub fn direct_subclasses(&self, clid: ClassId) -> Result<&[ClassId], Error> {
        Ok(&self.class(clid)?.subclasses)
    }

    /// `clid` followed by every class that inherits from it, directly or not, breadth first.
    pub fn all_subclasses(&self, clid: ClassId) -> Result<Vec<ClassId>, Error> {
        self.class(clid)?;
        let mut out = vec![clid];
        let mut queue = VecDeque::from([clid]);
        while let Some(class) = queue.pop_front() {
            for &sub in &self.class(class)?.subclasses {
                out.push(sub);
                queue.push_back(sub);
            }
        }
        Ok(out)
    }

    /// Adds a computed field to class `class_name`.
    ///
    /// Virtual object fields have no destination class.
    pub fn add_virtual_prop(
        &mut self,
        class_name: &str,
        field_name: &str,
        flid: FieldId,
        ty: FieldType,
    ) -> Result<(), Error> {
        let clid = self
            .class_id(class_name)
            .ok_or_else(|| Error::new(ErrorKind::UnknownClass, None, Some(class_name)))?;
        self.insert_field(flid, clid, field_name, ty, None, true)?;
        log::debug!("added virtual field {class_name}.{field_name} ({flid})");
        Ok(())
    }

    fn class(&self, clid: ClassId) -> Result<&ClassInfo, Error> {
        self.classes.get(&clid).ok_or_else(|| Error::unknown_class(clid))
    }

    fn field(&self, flid: FieldId) -> Result<&FieldInfo, Error> {
        self.fields.get(&flid).ok_or_else(|| Error::unknown_field(flid))
    }

    /// `clid` and its base classes, nearest first.
    fn ancestry(&self, clid: ClassId) -> Result<Vec<ClassId>, Error> {
        let mut chain = vec![clid];
        let mut base = self.class(clid)?.base;
        while let Some(class) = base {
            chain.push(class);
            base = self.class(class)?.base;
        }
        Ok(chain)
    }

    fn insert_field(
        &mut self,
        flid: FieldId,
        clid: ClassId,
        name: &str,
        ty: FieldType,
        dst: Option<ClassId>,
        is_virtual: bool,
    ) -> Result<(), Error> {
        let duplicate = || Error::new(ErrorKind::DuplicateField, Some(flid), Some(name));
        if self.fields.contains_key(&flid) {
            return Err(duplicate());
        }
        if self.field_id2(clid, name, false).is_some() {
            return Err(duplicate());
        }
        let class = self.classes.get_mut(&clid).ok_or_else(|| Error::unknown_class(clid))?;
        class.fields.push(flid);
        self.fields.insert(
            flid,
            FieldInfo {
                name: name.into(),
                owner: clid,
                dst,
                ty,
                label: String::new(),
                help: String::new(),
                is_virtual,
            },
        );
        Ok(())
    }
}

/// Builds a [`MetaDataCache`] class by class.
///
/// Base classes and destination classes must be added before the classes and fields that
/// refer to them, so the inheritance graph can never contain a cycle.
#[derive(Clone, Debug, Default)]
pub struct MetaDataCacheBuilder {
    cache: MetaDataCache,
}

impl MetaDataCacheBuilder {
    /// Adds a class.
    pub fn add_class(
        &mut self,
        clid: ClassId,
        name: &str,
        base: Option<ClassId>,
        is_abstract: bool,
    ) -> Result<&mut Self, Error> {
        let cache = &mut self.cache;
        if cache.classes.contains_key(&clid) || cache.class_by_name.contains_key(name) {
            return Err(Error::new(ErrorKind::DuplicateClass, Some(clid), Some(name)));
        }
        if let Some(base) = base {
            if base == clid {
                return Err(Error::new(ErrorKind::InheritanceCycle, Some(clid), Some(name)));
            }
            let base_info = cache.classes.get_mut(&base).ok_or_else(|| {
                Error::new(ErrorKind::UnknownBase, Some(clid), Some(base.to_string().as_str()))
            })?;
            let at = base_info.subclasses.partition_point(|&sub| sub < clid);
            base_info.subclasses.insert(at, clid);
        }
        cache.classes.insert(
            clid,
            ClassInfo {
                name: name.into(),
                is_abstract,
                base,
                fields: Vec::new(),
                subclasses: Vec::new(),
            },
        );
        cache.class_by_name.insert(name.into(), clid);
        Ok(self)
    }

    /// Adds a field to class `clid`. Object fields need a destination class; other fields must
    /// not have one.
    pub fn add_field(
        &mut self,
        flid: FieldId,
        clid: ClassId,
        name: &str,
        ty: FieldType,
        dst: Option<ClassId>,
    ) -> Result<&mut Self, Error> {
        if ty.is_object() != dst.is_some() {
            return Err(Error::new(ErrorKind::InvalidSignature, Some(flid), Some(name)));
        }
        if let Some(dst) = dst {
            self.cache.class(dst)?;
        }
        self.cache.insert_field(flid, clid, name, ty, dst, false)?;
        Ok(self)
    }

    /// Sets the label and help text of field `flid`.
    pub fn set_field_text(
        &mut self,
        flid: FieldId,
        label: &str,
        help: &str,
    ) -> Result<&mut Self, Error> {
        let field = self
            .cache
            .fields
            .get_mut(&flid)
            .ok_or_else(|| Error::unknown_field(flid))?;
        field.label = label.into();
        field.help = help.into();
        Ok(self)
    }

    /// The id of a class added earlier.
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.cache.class_id(name)
    }

    /// Finishes the schema.
    pub fn build(self) -> MetaDataCache {
        log::debug!(
            "built schema with {} classes and {} fields",
            self.cache.class_count(),
            self.cache.field_count()
        );
        self.cache
    }
}

fn sorted(ids: impl Iterator<Item = u32>) -> Vec<u32> {
    let mut ids: Vec<u32> = ids.collect();
    ids.sort_unstable();
    ids
}

#[cfg(test)]
mod tests {
    use super::MetaDataCache;
    use crate::{ErrorKind, FieldType, FieldTypeMask};
    use alloc::vec::Vec;

    /// CmObject <- CmPossibility <- {CmPerson, CmLocation}; CmObject <- LexEntry.
    fn sample() -> MetaDataCache {
        let mut bldr = MetaDataCache::builder();
        bldr.add_class(0, "CmObject", None, true)
            .unwrap()
            .add_class(7, "CmPossibility", Some(0), false)
            .unwrap()
            .add_class(13, "CmPerson", Some(7), false)
            .unwrap()
            .add_class(12, "CmLocation", Some(7), false)
            .unwrap()
            .add_class(5002, "LexEntry", Some(0), false)
            .unwrap();
        bldr.add_field(7001, 7, "Name", FieldType::MultiUnicode, None)
            .unwrap()
            .add_field(7002, 7, "SubPossibilities", FieldType::OwningSequence, Some(7))
            .unwrap()
            .add_field(7003, 7, "Confidence", FieldType::ReferenceAtom, Some(7))
            .unwrap()
            .add_field(13001, 13, "Gender", FieldType::Integer, None)
            .unwrap()
            .add_field(5002001, 5002, "HomographNumber", FieldType::Integer, None)
            .unwrap();
        bldr.set_field_text(7001, "Name", "The name of the item")
            .unwrap();
        bldr.build()
    }

    #[test]
    fn field_lookups() {
        let mdc = sample();
        assert_eq!(mdc.field_count(), 5);
        assert_eq!(mdc.field_ids(), [7001, 7002, 7003, 13001, 5002001]);
        assert_eq!(mdc.owner_clid(7002).unwrap(), 7);
        assert_eq!(mdc.dst_clid(7002).unwrap(), Some(7));
        assert_eq!(mdc.dst_clid(7001).unwrap(), None);
        assert_eq!(mdc.field_type(13001).unwrap(), FieldType::Integer);
        assert_eq!(mdc.field_name(7003).unwrap(), "Confidence");
        assert_eq!(mdc.field_label(7001).unwrap(), "Name");
        assert_eq!(mdc.field_help(7001).unwrap(), "The name of the item");
        assert_eq!(mdc.field_help(7002).unwrap(), "");
        assert_eq!(mdc.field_type(1).unwrap_err().kind(), ErrorKind::UnknownField);
    }

    #[test]
    fn class_lookups() {
        let mdc = sample();
        assert_eq!(mdc.class_count(), 5);
        assert_eq!(mdc.class_ids(), [0, 7, 12, 13, 5002]);
        assert_eq!(mdc.class_name(13).unwrap(), "CmPerson");
        assert!(mdc.is_abstract(0).unwrap());
        assert_eq!(mdc.base_clid(13).unwrap(), Some(7));
        assert_eq!(mdc.base_clid(0).unwrap(), None);
        assert_eq!(mdc.base_class_name(13).unwrap(), Some("CmPossibility"));
        assert_eq!(mdc.class_id("LexEntry"), Some(5002));
        assert_eq!(mdc.class_id("Nope"), None);
        assert_eq!(mdc.class_name(99).unwrap_err().kind(), ErrorKind::UnknownClass);
    }

    #[test]
    fn fields_follow_inheritance_and_mask() {
        let mdc = sample();
        assert_eq!(
            mdc.fields(13, true, FieldTypeMask::ALL).unwrap(),
            [7001, 7002, 7003, 13001]
        );
        assert_eq!(mdc.fields(13, false, FieldTypeMask::ALL).unwrap(), [13001]);
        assert_eq!(
            mdc.fields(13, true, FieldTypeMask::OWNING).unwrap(),
            [7002]
        );
        assert_eq!(
            mdc.fields(13, true, FieldTypeMask::BASIC).unwrap(),
            [7001, 13001]
        );
        assert_eq!(mdc.field_id("CmPerson", "Name", true), Some(7001));
        assert_eq!(mdc.field_id("CmPerson", "Name", false), None);
        assert_eq!(mdc.field_id2(13, "Gender", false), Some(13001));
        assert_eq!(mdc.field_id("Nope", "Name", true), None);
    }

    #[test]
    fn all_subclasses_is_the_closure_of_direct_subclasses() {
        let mdc = sample();
        assert_eq!(mdc.direct_subclasses(7).unwrap(), [12, 13]);
        assert_eq!(mdc.direct_subclasses(0).unwrap(), [7, 5002]);
        for clid in mdc.class_ids() {
            let mut expected = Vec::new();
            let mut stack = alloc::vec![clid];
            while let Some(class) = stack.pop() {
                expected.push(class);
                stack.extend_from_slice(mdc.direct_subclasses(class).unwrap());
            }
            let mut got = mdc.all_subclasses(clid).unwrap();
            assert_eq!(got[0], clid);
            expected.sort_unstable();
            got.sort_unstable();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn builder_rejects_bad_schemas() {
        let mut bldr = MetaDataCache::builder();
        bldr.add_class(0, "CmObject", None, true).unwrap();
        fn kind<T>(res: Result<T, crate::Error>) -> ErrorKind {
            res.map(|_| ()).unwrap_err().kind()
        }
        assert_eq!(
            kind(bldr.add_class(0, "Other", None, false)),
            ErrorKind::DuplicateClass
        );
        assert_eq!(
            kind(bldr.add_class(1, "CmObject", None, false)),
            ErrorKind::DuplicateClass
        );
        assert_eq!(
            kind(bldr.add_class(2, "Orphan", Some(42), false)),
            ErrorKind::UnknownBase
        );
        assert_eq!(
            kind(bldr.add_class(3, "Selfish", Some(3), false)),
            ErrorKind::InheritanceCycle
        );
        assert_eq!(
            kind(bldr.add_field(1, 0, "Owner", FieldType::OwningAtom, None)),
            ErrorKind::InvalidSignature
        );
        assert_eq!(
            kind(bldr.add_field(1, 0, "Count", FieldType::Integer, Some(0))),
            ErrorKind::InvalidSignature
        );
        assert_eq!(
            kind(bldr.add_field(1, 9, "Count", FieldType::Integer, None)),
            ErrorKind::UnknownClass
        );
        bldr.add_field(1, 0, "Count", FieldType::Integer, None)
            .unwrap();
        assert_eq!(
            kind(bldr.add_field(2, 0, "Count", FieldType::Integer, None)),
            ErrorKind::DuplicateField
        );
    }

    #[test]
    fn virtual_props() {
        let mut mdc = sample();
        mdc.add_virtual_prop("CmPerson", "FullName", 13901, FieldType::Unicode)
            .unwrap();
        mdc.add_virtual_prop("CmPerson", "Places", 13902, FieldType::ReferenceCollection)
            .unwrap();
        assert!(mdc.is_virtual(13901).unwrap());
        assert!(!mdc.is_virtual(13001).unwrap());
        assert_eq!(mdc.field_id("CmPerson", "FullName", false), Some(13901));
        assert_eq!(mdc.dst_clid(13902).unwrap(), None);
        assert_eq!(
            mdc.add_virtual_prop("CmPerson", "Gender", 13903, FieldType::Integer)
                .unwrap_err()
                .kind(),
            ErrorKind::DuplicateField
        );
        assert_eq!(
            mdc.add_virtual_prop("Nope", "X", 1, FieldType::Integer)
                .unwrap_err()
                .kind(),
            ErrorKind::UnknownClass
        );
    }
}
