//! Library to rearrange the tiles of an image.
//!
//! An image is cut into a grid of equally sized tiles, numbered row-major
//! from the top-left. An ordering then says which original tile goes where:
//! destination tile `i` is source tile `ordering[i]`.
//!
//! * [is_valid_input] checks that a tile size and ordering fit an image.
//! * [rearrange_tiles] does the whole file-to-file transformation.
//! * [rearrange_image] and [scramble_image] work on decoded images.
//! * [ordering] has helpers to invert, randomize and store orderings.
//!
//! No pixel is duplicated nor removed, so applying the [ordering::inverse]
//! of an ordering restores the original image.

// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//

mod error;
mod geometry;
pub mod ordering;
mod rearrange;
mod validate;

#[doc(inline)]
pub use crate::error::{Error, Result};
#[doc(inline)]
pub use crate::geometry::{Dimensions, TileGrid, TileRect};
#[doc(inline)]
pub use crate::rearrange::{
    rearrange_image, rearrange_tiles, rearrange_tiles_with, scramble_image, ImageBackend, Imaging,
};
#[doc(inline)]
pub use crate::validate::is_valid_input;
