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

//! Error type shared by the whole library.

use std::num::ParseIntError;

use image::{ColorType, ImageError};
use thiserror::Error;

/// Errors that can occur while validating or rearranging tiles.
#[derive(Debug, Error)]
pub enum Error {
    /// Tile size does not divide the image, or the ordering is not a
    /// permutation of the tile indices.
    #[error("The tile size or ordering are not valid for the given image")]
    InvalidArgument,

    /// An ordering file contained a line that is not an integer.
    #[error("Invalid ordering entry on line {line}: {source}")]
    ParseOrdering {
        /// 1-based line number
        line: usize,
        #[source]
        source: ParseIntError,
    },

    /// A dimension string was not of the form `WxH` or `N`.
    #[error("Invalid dimensions '{0}': expected WxH (e.g. 16x16) or a single size")]
    ParseDimensions(String),

    /// The image uses a pixel layout we can't allocate a canvas for.
    #[error("Unsupported color type {0:?}")]
    UnsupportedColor(ColorType),

    /// A tile was pasted onto an image with a different pixel layout.
    #[error("Tile color type {tile:?} does not match image color type {image:?}")]
    ColorMismatch { image: ColorType, tile: ColorType },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] ImageError),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
