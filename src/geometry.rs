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

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Square dimensions.
    pub const fn square(size: u32) -> Self {
        Self::new(size, size)
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `WxH` (e.g. `16x8`) or a single number `N` meaning `NxN`.
impl FromStr for Dimensions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || Error::ParseDimensions(s.to_owned());
        let mut parts = s.trim().splitn(2, ['x', 'X']);
        let w: u32 = parts
            .next()
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(err)?;
        let h: u32 = match parts.next() {
            Some(v) => v.trim().parse().map_err(|_| err())?,
            None => w,
        };
        if w == 0 || h == 0 {
            return Err(err());
        }

        Ok(Self::new(w, h))
    }
}

/// Pixel rectangle of a single tile. Right and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Row-major grid of equally sized tiles covering an image exactly.
///
/// Source and destination share the same grid, so a linear index maps to
/// the same rectangle on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    tile: Dimensions,
    columns: u32,
    rows: u32,
}

impl TileGrid {
    /// Creates the grid of `tile` sized cells over `image`.
    ///
    /// Returns `None` if the tile size leaves remainder pixels in either
    /// axis (a zero tile dimension counts as such).
    pub fn new(image: Dimensions, tile: Dimensions) -> Option<Self> {
        if image.width.checked_rem(tile.width)? != 0 || image.height.checked_rem(tile.height)? != 0
        {
            return None;
        }

        Some(Self {
            tile,
            columns: image.width / tile.width,
            rows: image.height / tile.height,
        })
    }

    pub fn tile(&self) -> Dimensions {
        self.tile
    }

    /// Tiles per row.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Tiles per column.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Tile count.
    pub fn len(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(row, column)` of a linear tile index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`, which includes every index of an
    /// empty grid.
    pub fn position(&self, index: usize) -> (u32, u32) {
        assert!(
            index < self.len(),
            "tile index {index} out of range for {} tiles",
            self.len(),
        );
        let columns = self.columns as usize;
        ((index / columns) as u32, (index % columns) as u32)
    }

    /// Pixel rectangle of a linear tile index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn rect(&self, index: usize) -> TileRect {
        let (row, col) = self.position(index);
        TileRect {
            x: col * self.tile.width,
            y: row * self.tile.height,
            width: self.tile.width,
            height: self.tile.height,
        }
    }

    /// All rectangles in ascending linear index order.
    pub fn rects(&self) -> impl ExactSizeIterator<Item = TileRect> + '_ {
        (0..self.len()).map(|i| self.rect(i))
    }
}
