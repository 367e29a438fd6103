// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Helpers to build, invert and store tile orderings.
//!
//! An ordering maps destination positions to source tiles:
//! `ordering[i]` is the original tile placed at position `i`.
//! On disk it is plain text, one integer per line.

use std::fs;
use std::path::Path;

use rand::prelude::*;
use rand_xoshiro::Xoshiro256StarStar;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Ordering that leaves every tile in place.
pub fn identity(len: usize) -> Vec<i64> {
    (0..len as i64).collect()
}

/// Inverse permutation, such that `inverse(p)[p[i]] == i`.
///
/// Returns `None` if `ordering` is not a permutation of `0..ordering.len()`.
pub fn inverse(ordering: &[i64]) -> Option<Vec<i64>> {
    let mut out = vec![-1i64; ordering.len()];
    for (i, &v) in ordering.iter().enumerate() {
        let slot = out.get_mut(usize::try_from(v).ok()?)?;
        if *slot != -1 {
            return None;
        }
        *slot = i as i64;
    }

    Some(out)
}

/// Uniformly random permutation of `0..len`.
pub fn random<R: Rng + ?Sized>(len: usize, random: &mut R) -> Vec<i64> {
    let mut ret = identity(len);
    ret.shuffle(random);
    ret
}

/// Creates the RNG used for random orderings.
///
/// A seed string is hashed so any text gives a reproducible stream.
/// Without a seed the generator is seeded from entropy.
pub fn seeded_rng(seed: Option<&str>) -> Xoshiro256StarStar {
    if let Some(seed) = seed {
        let mut hasher = Sha256::new();
        hasher.update(seed);

        Xoshiro256StarStar::from_seed(hasher.finalize().into())
    } else {
        Xoshiro256StarStar::from_entropy()
    }
}

/// Parses an ordering, one integer per line.
///
/// Surrounding whitespace of the whole text and of each line is ignored.
/// Blank text is an empty ordering; a blank line in the middle is an error.
pub fn parse(text: &str) -> Result<Vec<i64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    text.lines()
        .enumerate()
        .map(|(i, l)| {
            l.trim()
                .parse()
                .map_err(|source| Error::ParseOrdering { line: i + 1, source })
        })
        .collect()
}

/// Formats an ordering as text, one integer per line.
pub fn to_text(ordering: &[i64]) -> String {
    let mut ret = String::with_capacity(ordering.len() * 4);
    for v in ordering {
        ret.push_str(&v.to_string());
        ret.push('\n');
    }
    ret
}

/// Reads an ordering file.
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<i64>> {
    parse(&fs::read_to_string(path)?)
}

/// Writes an ordering file.
pub fn write_file(path: impl AsRef<Path>, ordering: &[i64]) -> Result<()> {
    fs::write(path, to_text(ordering))?;
    Ok(())
}
