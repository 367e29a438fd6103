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

use tracing::trace;

use crate::geometry::{Dimensions, TileGrid};

/// Checks that tiles of `tile` size can be rearranged by `ordering`.
///
/// Returns `true` when:
/// * `tile` divides `image` exactly in both axes,
/// * `ordering` has one entry per tile, and
/// * `ordering` is a permutation of `0..tile_count`.
///
/// Never panics. `ordering` is left untouched.
pub fn is_valid_input(image: Dimensions, tile: Dimensions, ordering: &[i64]) -> bool {
    checked_grid(image, tile, ordering).is_some()
}

/// Grid of `tile` sized cells over `image`, if `ordering` rearranges it.
pub(crate) fn checked_grid(
    image: Dimensions,
    tile: Dimensions,
    ordering: &[i64],
) -> Option<TileGrid> {
    // Divisibility goes first, there is no tile count to speak of otherwise.
    let Some(grid) = TileGrid::new(image, tile) else {
        trace!(%image, %tile, "tile size does not divide image");
        return None;
    };

    if ordering.len() != grid.len() {
        trace!(expected = grid.len(), actual = ordering.len(), "ordering length mismatch");
        return None;
    }

    let mut sorted = ordering.to_vec();
    sorted.sort_unstable();
    let ok = sorted
        .iter()
        .enumerate()
        .all(|(i, &v)| u64::try_from(v).is_ok_and(|v| v == i as u64));
    if !ok {
        trace!("ordering is not a permutation");
        return None;
    }

    Some(grid)
}
