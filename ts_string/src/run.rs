// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The run table shared by [`TsString`](crate::TsString) and the builders.
//!
//! A run table is a non-empty list of `(end, props)` pairs. Each run starts where the previous
//! one ended (the first at 0), and the last run ends at the text length. Runs are never empty
//! unless the text is, in which case there is exactly one empty run, and adjacent runs never
//! share equal properties.

use alloc::vec::Vec;
use core::ops::Range;

use text_props::TextProps;

use crate::{Endpoint, Error};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Run {
    pub(crate) end: usize,
    pub(crate) props: TextProps,
}

/// The bounds and properties of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunInfo {
    /// Byte range of the run in the text.
    pub range: Range<usize>,
    /// Properties shared by every character of the run.
    pub props: TextProps,
}

pub(crate) fn run_start(runs: &[Run], irun: usize) -> usize {
    if irun == 0 { 0 } else { runs[irun - 1].end }
}

pub(crate) fn run_bounds(runs: &[Run], irun: usize) -> Result<Range<usize>, Error> {
    if irun >= runs.len() {
        return Err(Error::run_out_of_bounds(irun, runs.len()));
    }
    Ok(run_start(runs, irun)..runs[irun].end)
}

pub(crate) fn run_info(runs: &[Run], irun: usize) -> Result<RunInfo, Error> {
    let range = run_bounds(runs, irun)?;
    Ok(RunInfo {
        range,
        props: runs[irun].props.clone(),
    })
}

/// Finds the run containing `ich`; the text length resolves to the final run.
pub(crate) fn run_at(text: &str, runs: &[Run], ich: usize) -> Result<usize, Error> {
    validate_offset(text, ich)?;
    if ich == text.len() {
        return Ok(runs.len() - 1);
    }
    Ok(runs.partition_point(|run| run.end <= ich))
}

pub(crate) fn validate_offset(text: &str, ich: usize) -> Result<(), Error> {
    if ich > text.len() {
        return Err(Error::invalid_bounds(ich, ich, text.len()));
    }
    if !text.is_char_boundary(ich) {
        return Err(Error::not_on_char_boundary(
            text,
            ich,
            ich,
            Endpoint::Start,
            ich,
        ));
    }
    Ok(())
}

pub(crate) fn validate_range(text: &str, range: &Range<usize>) -> Result<(), Error> {
    let text_len = text.len();
    if range.start > range.end {
        return Err(Error::invalid_range(range.start, range.end, text_len));
    }
    if range.start > text_len || range.end > text_len {
        return Err(Error::invalid_bounds(range.start, range.end, text_len));
    }
    if !text.is_char_boundary(range.start) {
        return Err(Error::not_on_char_boundary(
            text,
            range.start,
            range.end,
            Endpoint::Start,
            range.start,
        ));
    }
    if !text.is_char_boundary(range.end) {
        return Err(Error::not_on_char_boundary(
            text,
            range.start,
            range.end,
            Endpoint::End,
            range.end,
        ));
    }
    Ok(())
}

/// Replaces the runs covering `range` with `inserted`, whose ends are relative to `range.start`.
///
/// The result is normalized. `empty_props` gives the properties of the lone run when the result
/// is empty.
pub(crate) fn splice_runs(
    runs: &[Run],
    range: Range<usize>,
    inserted: &[Run],
    empty_props: &TextProps,
) -> Vec<Run> {
    let inserted_len = inserted.last().map_or(0, |run| run.end);
    let removed = range.end - range.start;
    let mut out = Vec::with_capacity(runs.len() + inserted.len() + 1);

    out.extend(
        runs.iter()
            .take_while(|run| run.end <= range.start)
            .cloned(),
    );
    // Head of the run straddling `range.start`.
    if let Some(irun) = runs.iter().position(|run| run.end > range.start) {
        if run_start(runs, irun) < range.start {
            out.push(Run {
                end: range.start,
                props: runs[irun].props.clone(),
            });
        }
    }
    out.extend(inserted.iter().map(|run| Run {
        end: range.start + run.end,
        props: run.props.clone(),
    }));
    for run in runs {
        if run.end > range.end {
            out.push(Run {
                end: run.end - removed + inserted_len,
                props: run.props.clone(),
            });
        }
    }
    normalize_runs(out, empty_props)
}

/// Drops empty runs and merges neighbors with equal properties.
pub(crate) fn normalize_runs(runs: Vec<Run>, empty_props: &TextProps) -> Vec<Run> {
    let mut out: Vec<Run> = Vec::with_capacity(runs.len());
    let mut start = 0;
    for run in runs {
        if run.end == start {
            continue;
        }
        start = run.end;
        match out.last_mut() {
            Some(last) if last.props == run.props => last.end = run.end,
            _ => out.push(run),
        }
    }
    if out.is_empty() {
        out.push(Run {
            end: 0,
            props: empty_props.clone(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{Run, normalize_runs, run_at, splice_runs};
    use alloc::vec;
    use alloc::vec::Vec;
    use text_props::TextProps;

    fn ws(n: u32) -> TextProps {
        TextProps::with_ws(n)
    }

    fn ends(runs: &[Run]) -> Vec<(usize, Option<u32>)> {
        runs.iter().map(|r| (r.end, r.props.ws())).collect()
    }

    #[test]
    fn normalize_merges_and_drops() {
        let runs = vec![
            Run { end: 2, props: ws(1) },
            Run { end: 2, props: ws(2) },
            Run { end: 4, props: ws(1) },
            Run { end: 6, props: ws(3) },
        ];
        assert_eq!(
            ends(&normalize_runs(runs, &ws(0))),
            vec![(4, Some(1)), (6, Some(3))]
        );
        assert_eq!(ends(&normalize_runs(Vec::new(), &ws(9))), vec![(0, Some(9))]);
    }

    #[test]
    fn splice_inside_one_run() {
        let runs = vec![Run { end: 6, props: ws(1) }];
        let out = splice_runs(&runs, 2..4, &[Run { end: 3, props: ws(2) }], &ws(1));
        assert_eq!(ends(&out), vec![(2, Some(1)), (5, Some(2)), (7, Some(1))]);
    }

    #[test]
    fn splice_across_runs() {
        let runs = vec![
            Run { end: 2, props: ws(1) },
            Run { end: 4, props: ws(2) },
            Run { end: 6, props: ws(3) },
        ];
        let out = splice_runs(&runs, 1..5, &[], &ws(1));
        assert_eq!(ends(&out), vec![(1, Some(1)), (2, Some(3))]);
        let out = splice_runs(&runs, 0..6, &[], &ws(7));
        assert_eq!(ends(&out), vec![(0, Some(7))]);
    }

    #[test]
    fn run_at_end_resolves_to_last_run() {
        let runs = vec![Run { end: 1, props: ws(1) }, Run { end: 2, props: ws(2) }];
        assert_eq!(run_at("ab", &runs, 0), Ok(0));
        assert_eq!(run_at("ab", &runs, 1), Ok(1));
        assert_eq!(run_at("ab", &runs, 2), Ok(1));
        assert!(run_at("ab", &runs, 3).is_err());
    }
}
