// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec;
use alloc::vec::Vec;

/// Distributes extra width over the characters of a segment.
pub trait Justifier {
    /// Returns the extra advance for each character of `text` so that together they add up to
    /// `extra`, or to nothing if the text has no place to stretch.
    fn stretch(&self, text: &str, extra: f32) -> Vec<f32>;
}

/// Stretches the spaces between words equally. Trailing spaces are not stretched.
#[derive(Copy, Clone, Debug, Default)]
pub struct SpaceJustifier;

impl Justifier for SpaceJustifier {
    fn stretch(&self, text: &str, extra: f32) -> Vec<f32> {
        let trimmed = text.trim_end_matches(' ');
        let chars = text.chars().count();
        let spaces = trimmed.chars().filter(|&ch| ch == ' ').count();
        let mut out = vec![0.0; chars];
        if spaces == 0 || extra <= 0.0 {
            return out;
        }
        let share = extra / spaces as f32;
        for (slot, ch) in out.iter_mut().zip(trimmed.chars()) {
            if ch == ' ' {
                *slot = share;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Justifier, SpaceJustifier};

    #[test]
    fn spreads_over_inner_spaces() {
        assert_eq!(
            SpaceJustifier.stretch("a b c  ", 4.0),
            [0.0, 2.0, 0.0, 2.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(SpaceJustifier.stretch("abc", 4.0), [0.0; 3]);
        assert_eq!(SpaceJustifier.stretch("a b", -1.0), [0.0; 3]);
    }
}
