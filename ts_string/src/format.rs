// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binary run format.
//!
//! The format stores only the run table; the text travels separately. All integers are
//! little-endian:
//!
//! ```text
//! u32 run_count
//! run_count × { u32 run_start, u32 props_index }
//! u32 props_count
//! props_count × {
//!     u16 int_count, int_count × { u16 code, u8 variation, i32 value }
//!     u16 str_count, str_count × { u16 code, u32 byte_len, [u8; byte_len] utf8 }
//! }
//! ```
//!
//! Equal property sets are stored once.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use text_props::{IntPropCode, PropsBuilder, StrPropCode, TextProps, Variation};

use crate::run::{self, Run};
use crate::{Error, TsString};

impl TsString {
    /// Serializes the run table in the binary run format.
    ///
    /// Fails with [`ErrorKind::FormatOverflow`](crate::ErrorKind::FormatOverflow) when a props
    /// set holds more than `u16::MAX` properties of one kind, or a count, offset or value
    /// length exceeds `u32::MAX`.
    pub fn serialize_fmt(&self) -> Result<Vec<u8>, Error> {
        let mut table: Vec<&TextProps> = Vec::new();
        let mut lookup: HashMap<&TextProps, u32> = HashMap::new();
        let mut out = Vec::new();

        let runs = self.run_slice();
        push_u32(&mut out, runs.len(), "run count")?;
        for (irun, run) in runs.iter().enumerate() {
            let index = match lookup.get(&run.props) {
                Some(&index) => index,
                None => {
                    let index = narrow(table.len(), "props table index")?;
                    table.push(&run.props);
                    lookup.insert(&run.props, index);
                    index
                }
            };
            push_u32(&mut out, run::run_start(runs, irun), "run start")?;
            out.extend_from_slice(&index.to_le_bytes());
        }
        push_u32(&mut out, table.len(), "props count")?;
        for props in table {
            push_u16(&mut out, props.int_prop_count(), "int property count")?;
            for (code, prop) in props.int_props() {
                out.extend_from_slice(&code.0.to_le_bytes());
                out.push(prop.var.to_u8());
                out.extend_from_slice(&prop.value.to_le_bytes());
            }
            push_u16(&mut out, props.str_prop_count(), "string property count")?;
            for (code, value) in props.str_props() {
                out.extend_from_slice(&code.0.to_le_bytes());
                push_u32(&mut out, value.len(), "string property length")?;
                out.extend_from_slice(value.as_bytes());
            }
        }
        Ok(out)
    }

    /// Reconstructs a string from its text and a run table produced by
    /// [`serialize_fmt`](Self::serialize_fmt).
    pub fn deserialize(text: &str, fmt: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader { data: fmt, pos: 0 };

        let run_count = reader.u32()? as usize;
        if run_count == 0 {
            return Err(Error::malformed_format("no runs"));
        }
        let mut starts = Vec::with_capacity(run_count.min(fmt.len() / 8));
        for _ in 0..run_count {
            let start = reader.u32()? as usize;
            let props_index = reader.u32()? as usize;
            starts.push((start, props_index));
        }

        let props_count = reader.u32()? as usize;
        let mut table = Vec::with_capacity(props_count.min(fmt.len()));
        for _ in 0..props_count {
            let mut bldr = PropsBuilder::new();
            for _ in 0..reader.u16()? {
                let code = IntPropCode(reader.u16()?);
                let var = Variation::from_u8(reader.u8()?)
                    .map_err(|err| Error::malformed_format(format!("{err}")))?;
                let value = reader.i32()?;
                bldr.set_int_prop(code, var, value);
            }
            for _ in 0..reader.u16()? {
                let code = StrPropCode(reader.u16()?);
                let len = reader.u32()? as usize;
                let bytes = reader.bytes(len)?;
                let value = core::str::from_utf8(bytes)
                    .map_err(|_| Error::malformed_format("string property is not UTF-8"))?;
                bldr.set_str_prop(code, value);
            }
            table.push(bldr.build());
        }
        if reader.pos != fmt.len() {
            return Err(Error::malformed_format("trailing bytes"));
        }

        let mut runs = Vec::with_capacity(run_count);
        for (i, &(start, props_index)) in starts.iter().enumerate() {
            let end = starts.get(i + 1).map_or(text.len(), |&(next, _)| next);
            if (i == 0 && start != 0) || start > end {
                return Err(Error::malformed_format(format!(
                    "run {i} starts at {start}, which is out of order"
                )));
            }
            run::validate_offset(text, end)?;
            let props = table.get(props_index).cloned().ok_or_else(|| {
                Error::malformed_format(format!("run {i} uses missing props {props_index}"))
            })?;
            runs.push(Run { end, props });
        }
        let empty_props = runs[0].props.clone();
        let runs = run::normalize_runs(runs, &empty_props);
        Ok(Self::from_parts(String::from(text), runs))
    }
}

fn narrow<T: TryFrom<usize>>(value: usize, what: &str) -> Result<T, Error> {
    T::try_from(value).map_err(|_| Error::format_overflow(format!("{what} {value} is too large")))
}

fn push_u32(out: &mut Vec<u8>, value: usize, what: &str) -> Result<(), Error> {
    let value: u32 = narrow(value, what)?;
    out.extend_from_slice(&value.to_le_bytes());
    Ok(())
}

fn push_u16(out: &mut Vec<u8>, value: usize, what: &str) -> Result<(), Error> {
    let value: u16 = narrow(value, what)?;
    out.extend_from_slice(&value.to_le_bytes());
    Ok(())
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| Error::malformed_format("unexpected end of data"))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut out = [0; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, Error> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16, Error> {
        self.array().map(u16::from_le_bytes)
    }

    fn u32(&mut self) -> Result<u32, Error> {
        self.array().map(u32::from_le_bytes)
    }

    fn i32(&mut self) -> Result<i32, Error> {
        self.array().map(i32::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use crate::{ErrorKind, StrBuilder, TsString};
    use text_props::{IntPropCode, PropsBuilder, StrPropCode, TextProps, Variation};

    fn sample() -> TsString {
        let mut fancy = PropsBuilder::new();
        fancy
            .set_int_prop(IntPropCode::WS, Variation::Default, 2)
            .set_int_prop(IntPropCode::FONT_SIZE, Variation::MilliPoint, 12_000)
            .set_str_prop(StrPropCode::FONT_FAMILY, "Ezra SIL");
        let mut bldr = StrBuilder::new(TextProps::with_ws(1));
        bldr.replace(0..0, "plain ", None).unwrap();
        bldr.replace(6..6, "שלום", Some(&fancy.build())).unwrap();
        bldr.replace(14..14, " again", Some(&TextProps::with_ws(1)))
            .unwrap();
        bldr.build()
    }

    #[test]
    fn format_round_trip() {
        let s = sample();
        assert_eq!(s.run_count(), 3);
        let fmt = s.serialize_fmt().unwrap();
        assert_eq!(TsString::deserialize(s.text(), &fmt).unwrap(), s);
    }

    #[test]
    fn shared_props_are_stored_once() {
        let s = sample();
        let fmt = s.serialize_fmt().unwrap();
        // 4 + 3 runs * 8, then the props count.
        let props_count = u32::from_le_bytes(fmt[28..32].try_into().unwrap());
        assert_eq!(props_count, 2);
    }

    #[test]
    fn oversized_props_are_an_error() {
        let mut crowded = PropsBuilder::new();
        for code in 0..=u16::MAX {
            crowded.set_int_prop(IntPropCode(code), Variation::Default, 1);
        }
        let props = crowded.build();
        assert_eq!(props.int_prop_count(), usize::from(u16::MAX) + 1);

        let err = TsString::new("x", props.clone()).serialize_fmt().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FormatOverflow);
        assert!(err.detail().unwrap().contains("int property count"));

        // One fewer property still fits.
        let mut bldr = props.to_builder();
        bldr.clear_int_prop(IntPropCode(0));
        let s = TsString::new("x", bldr.build());
        let fmt = s.serialize_fmt().unwrap();
        assert_eq!(TsString::deserialize("x", &fmt).unwrap(), s);
    }

    #[test]
    fn empty_string_round_trip() {
        let s = TsString::empty(TextProps::with_ws(9));
        let fmt = s.serialize_fmt().unwrap();
        assert_eq!(TsString::deserialize("", &fmt).unwrap(), s);
    }

    #[test]
    fn rejects_bad_data() {
        let s = sample();
        let fmt = s.serialize_fmt().unwrap();
        let err = TsString::deserialize(s.text(), &fmt[..fmt.len() - 1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedFormat);
        // Run starts beyond the text.
        let err = TsString::deserialize("plain", &fmt).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBounds);
        assert!(TsString::deserialize("", &[0, 0, 0, 0]).is_err());
    }
}
