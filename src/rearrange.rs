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

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::io::Reader as ImageReader;
use image::{imageops, DynamicImage, GenericImageView};
use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{Dimensions, TileGrid, TileRect};
use crate::ordering;
use crate::validate;

/// Imaging operations needed to rearrange tiles.
///
/// Images are released when dropped.
pub trait Imaging {
    type Image;
    type Tile;

    fn open(&self, path: &Path) -> Result<Self::Image>;

    fn size(&self, image: &Self::Image) -> Dimensions;

    /// Copies the pixels under `rect` out of `image`.
    fn crop(&self, image: &Self::Image, rect: TileRect) -> Self::Tile;

    /// New image with the same size and pixel layout as `image`.
    fn blank_like(&self, image: &Self::Image) -> Result<Self::Image>;

    fn paste(&self, image: &mut Self::Image, tile: &Self::Tile, rect: TileRect) -> Result<()>;

    fn save(&self, image: &Self::Image, path: &Path) -> Result<()>;
}

/// [`Imaging`] implemented with the `image` crate.
///
/// Pixels keep their original type, 16-bit and float images are not
/// converted.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageBackend;

impl Imaging for ImageBackend {
    type Image = DynamicImage;
    type Tile = DynamicImage;

    fn open(&self, path: &Path) -> Result<DynamicImage> {
        Ok(ImageReader::new(BufReader::new(File::open(path)?))
            .with_guessed_format()?
            .decode()?)
    }

    fn size(&self, image: &DynamicImage) -> Dimensions {
        image.dimensions().into()
    }

    fn crop(&self, image: &DynamicImage, rect: TileRect) -> DynamicImage {
        image.crop_imm(rect.x, rect.y, rect.width, rect.height)
    }

    fn blank_like(&self, image: &DynamicImage) -> Result<DynamicImage> {
        let (w, h) = image.dimensions();
        Ok(match image {
            DynamicImage::ImageLuma8(_) => DynamicImage::new_luma8(w, h),
            DynamicImage::ImageLumaA8(_) => DynamicImage::new_luma_a8(w, h),
            DynamicImage::ImageRgb8(_) => DynamicImage::new_rgb8(w, h),
            DynamicImage::ImageRgba8(_) => DynamicImage::new_rgba8(w, h),
            DynamicImage::ImageLuma16(_) => DynamicImage::new_luma16(w, h),
            DynamicImage::ImageLumaA16(_) => DynamicImage::new_luma_a16(w, h),
            DynamicImage::ImageRgb16(_) => DynamicImage::new_rgb16(w, h),
            DynamicImage::ImageRgba16(_) => DynamicImage::new_rgba16(w, h),
            DynamicImage::ImageRgb32F(_) => DynamicImage::new_rgb32f(w, h),
            DynamicImage::ImageRgba32F(_) => DynamicImage::new_rgba32f(w, h),
            _ => return Err(Error::UnsupportedColor(image.color())),
        })
    }

    fn paste(&self, image: &mut DynamicImage, tile: &DynamicImage, rect: TileRect) -> Result<()> {
        use DynamicImage::*;

        let (x, y) = (i64::from(rect.x), i64::from(rect.y));
        match (image, tile) {
            (ImageLuma8(d), ImageLuma8(s)) => imageops::replace(d, s, x, y),
            (ImageLumaA8(d), ImageLumaA8(s)) => imageops::replace(d, s, x, y),
            (ImageRgb8(d), ImageRgb8(s)) => imageops::replace(d, s, x, y),
            (ImageRgba8(d), ImageRgba8(s)) => imageops::replace(d, s, x, y),
            (ImageLuma16(d), ImageLuma16(s)) => imageops::replace(d, s, x, y),
            (ImageLumaA16(d), ImageLumaA16(s)) => imageops::replace(d, s, x, y),
            (ImageRgb16(d), ImageRgb16(s)) => imageops::replace(d, s, x, y),
            (ImageRgba16(d), ImageRgba16(s)) => imageops::replace(d, s, x, y),
            (ImageRgb32F(d), ImageRgb32F(s)) => imageops::replace(d, s, x, y),
            (ImageRgba32F(d), ImageRgba32F(s)) => imageops::replace(d, s, x, y),
            (d, s) => {
                return Err(Error::ColorMismatch {
                    image: d.color(),
                    tile: s.color(),
                })
            }
        }

        Ok(())
    }

    fn save(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        image.save(path)?;
        Ok(())
    }
}

/// Extracts every tile and pastes them back in `ordering`'s positions.
///
/// `ordering` must already be validated against `grid`.
fn compose<I: Imaging + ?Sized>(
    backend: &I,
    source: &I::Image,
    grid: &TileGrid,
    ordering: &[i64],
) -> Result<I::Image> {
    debug!(
        columns = grid.columns(),
        rows = grid.rows(),
        tiles = grid.len(),
        "rearranging tiles"
    );

    let tiles: Vec<_> = grid.rects().map(|r| backend.crop(source, r)).collect();

    let mut out = backend.blank_like(source)?;
    for (rect, &src) in grid.rects().zip(ordering) {
        // Validated: 0 <= src < tiles.len()
        backend.paste(&mut out, &tiles[src as usize], rect)?;
    }

    Ok(out)
}

fn checked_grid(size: Dimensions, tile: Dimensions, ordering: &[i64]) -> Result<TileGrid> {
    validate::checked_grid(size, tile, ordering).ok_or_else(|| {
        debug!(image = %size, %tile, len = ordering.len(), "rejecting tile ordering");
        Error::InvalidArgument
    })
}

/// Rearranges the tiles of the image at `source` and writes it to `out`,
/// using `backend` for all image work.
///
/// See [`rearrange_tiles`].
pub fn rearrange_tiles_with<I: Imaging + ?Sized>(
    backend: &I,
    source: &Path,
    tile: Dimensions,
    ordering: &[i64],
    out: &Path,
) -> Result<()> {
    let image = backend.open(source)?;
    let grid = checked_grid(backend.size(&image), tile, ordering)?;

    let result = compose(backend, &image, &grid, ordering)?;
    backend.save(&result, out)?;
    debug!(out = %out.display(), "saved rearranged image");

    Ok(())
}

/// Splits the image at `source` into `tile` sized tiles, rearranges them
/// and saves the result to `out`.
///
/// Destination tile `i` is source tile `ordering[i]`, tiles are numbered
/// row-major from the top-left. The output format is picked from the
/// extension of `out`.
///
/// Fails with [`Error::InvalidArgument`] before writing anything if `tile`
/// doesn't divide the image or `ordering` isn't a permutation of the tile
/// indices. Decode, encode and I/O errors are passed through as-is.
pub fn rearrange_tiles(
    source: impl AsRef<Path>,
    tile: Dimensions,
    ordering: &[i64],
    out: impl AsRef<Path>,
) -> Result<()> {
    rearrange_tiles_with(&ImageBackend, source.as_ref(), tile, ordering, out.as_ref())
}

/// In-memory version of [`rearrange_tiles`].
pub fn rearrange_image(
    image: &DynamicImage,
    tile: Dimensions,
    ordering: &[i64],
) -> Result<DynamicImage> {
    let backend = ImageBackend;
    let grid = checked_grid(backend.size(image), tile, ordering)?;
    compose(&backend, image, &grid, ordering)
}

/// Shuffles the tiles of `image` randomly.
///
/// Returns the scrambled image together with the ordering that restores
/// it when passed to [`rearrange_image`] or [`rearrange_tiles`].
pub fn scramble_image<R: Rng + ?Sized>(
    image: &DynamicImage,
    tile: Dimensions,
    random: &mut R,
) -> Result<(DynamicImage, Vec<i64>)> {
    let grid = TileGrid::new(image.dimensions().into(), tile).ok_or(Error::InvalidArgument)?;

    let shuffled = ordering::random(grid.len(), random);
    let mut restore = vec![0; shuffled.len()];
    for (i, &src) in shuffled.iter().enumerate() {
        restore[src as usize] = i as i64;
    }
    let out = compose(&ImageBackend, image, &grid, &shuffled)?;

    Ok((out, restore))
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::path::PathBuf;

    use image::{Luma, Rgb, RgbImage};

    use super::*;

    /// Image stand-in where every pixel holds the index of its source tile.
    struct Labels {
        opened: RefCell<Vec<PathBuf>>,
        saved: RefCell<Option<(PathBuf, Vec<Vec<u32>>)>>,
        crops: Cell<usize>,
        size: Dimensions,
        tile: Dimensions,
    }

    impl Labels {
        fn new(size: Dimensions, tile: Dimensions) -> Self {
            Self {
                opened: RefCell::default(),
                saved: RefCell::default(),
                crops: Cell::default(),
                size,
                tile,
            }
        }
    }

    impl Imaging for Labels {
        type Image = Vec<Vec<u32>>;
        type Tile = u32;

        fn open(&self, path: &Path) -> Result<Self::Image> {
            self.opened.borrow_mut().push(path.to_owned());
            let Dimensions { width: tw, height: th } = self.tile;
            let cols = self.size.width / tw;
            Ok((0..self.size.height)
                .map(|y| (0..self.size.width).map(|x| (y / th) * cols + x / tw).collect())
                .collect())
        }

        fn size(&self, _: &Self::Image) -> Dimensions {
            self.size
        }

        fn crop(&self, image: &Self::Image, rect: TileRect) -> u32 {
            self.crops.set(self.crops.get() + 1);
            image[rect.y as usize][rect.x as usize]
        }

        fn blank_like(&self, image: &Self::Image) -> Result<Self::Image> {
            Ok(vec![vec![u32::MAX; image[0].len()]; image.len()])
        }

        fn paste(&self, image: &mut Self::Image, tile: &u32, rect: TileRect) -> Result<()> {
            for row in &mut image[rect.y as usize..rect.bottom() as usize] {
                row[rect.x as usize..rect.right() as usize].fill(*tile);
            }
            Ok(())
        }

        fn save(&self, image: &Self::Image, path: &Path) -> Result<()> {
            *self.saved.borrow_mut() = Some((path.to_owned(), image.clone()));
            Ok(())
        }
    }

    #[test]
    fn swaps_tiles_in_rows() {
        let backend = Labels::new((4, 4).into(), (2, 2).into());
        rearrange_tiles_with(
            &backend,
            Path::new("in.png"),
            (2, 2).into(),
            &[1, 0, 3, 2],
            Path::new("out.png"),
        )
        .unwrap();

        let (path, image) = backend.saved.into_inner().unwrap();
        assert_eq!(path, Path::new("out.png"));
        assert_eq!(
            image,
            [[1, 1, 0, 0], [1, 1, 0, 0], [3, 3, 2, 2], [3, 3, 2, 2]],
        );
    }

    #[test]
    fn non_square_tiles() {
        let backend = Labels::new((6, 2).into(), (2, 1).into());
        rearrange_tiles_with(
            &backend,
            Path::new("in"),
            (2, 1).into(),
            &[5, 4, 3, 2, 1, 0],
            Path::new("out"),
        )
        .unwrap();

        let (_, image) = backend.saved.into_inner().unwrap();
        assert_eq!(image, [[5, 5, 4, 4, 3, 3], [2, 2, 1, 1, 0, 0]]);
    }

    #[test]
    fn invalid_input_fails_before_any_work() {
        let backend = Labels::new((4, 4).into(), (2, 2).into());
        let err = rearrange_tiles_with(
            &backend,
            Path::new("in.png"),
            (2, 2).into(),
            &[0, 1, 1, 2],
            Path::new("out.png"),
        )
        .unwrap_err();

        assert!(matches!(err, Error::InvalidArgument));
        assert_eq!(backend.opened.borrow().len(), 1);
        assert_eq!(backend.crops.get(), 0);
        assert!(backend.saved.borrow().is_none());
    }

    fn checker() -> DynamicImage {
        // Every 2x2 tile gets its own color.
        DynamicImage::ImageRgb8(RgbImage::from_fn(4, 4, |x, y| {
            let i = ((y / 2) * 2 + x / 2) as u8;
            Rgb([i * 60, 255 - i * 60, (x + y) as u8])
        }))
    }

    #[test]
    fn in_memory_swap() {
        let src = checker();
        let out = rearrange_image(&src, (2, 2).into(), &[1, 0, 3, 2]).unwrap();

        assert_eq!(out.color(), src.color());
        assert_eq!(out.dimensions(), src.dimensions());
        for (x, y, p) in out.pixels() {
            let sx = x ^ 2;
            assert_eq!(p, src.get_pixel(sx, y), "pixel ({x}, {y})");
        }
    }

    #[test]
    fn identity_keeps_pixels() {
        let src = checker();
        let out = rearrange_image(&src, (2, 2).into(), &ordering::identity(4)).unwrap();
        assert_eq!(out.as_bytes(), src.as_bytes());
    }

    #[test]
    fn keeps_16_bit_pixels() {
        let src = DynamicImage::ImageLuma16(image::ImageBuffer::from_fn(4, 2, |x, _| {
            Luma([x as u16 * 1000 + 7])
        }));
        let out = rearrange_image(&src, (1, 2).into(), &[3, 2, 1, 0]).unwrap();

        let DynamicImage::ImageLuma16(out) = out else {
            panic!("color type changed");
        };
        let row: Vec<_> = (0..4).map(|x| out.get_pixel(x, 1)[0]).collect();
        assert_eq!(row, [3007, 2007, 1007, 7]);
    }

    #[test]
    fn paste_rejects_mismatched_color() {
        let mut dst = DynamicImage::new_rgb8(2, 2);
        let tile = DynamicImage::new_luma8(1, 1);
        let rect = TileRect { x: 0, y: 0, width: 1, height: 1 };
        assert!(matches!(
            ImageBackend.paste(&mut dst, &tile, rect),
            Err(Error::ColorMismatch { .. }),
        ));
    }

    #[test]
    fn in_memory_invalid() {
        let src = checker();
        assert!(matches!(
            rearrange_image(&src, (3, 3).into(), &[0]),
            Err(Error::InvalidArgument),
        ));
        assert!(matches!(
            scramble_image(&src, (3, 3).into(), &mut ordering::seeded_rng(Some("a"))),
            Err(Error::InvalidArgument),
        ));
    }

    #[test]
    fn scramble_restores() {
        let src = checker();
        let mut rng = ordering::seeded_rng(Some("scramble"));
        let (scrambled, restore) = scramble_image(&src, (2, 2).into(), &mut rng).unwrap();

        assert!(validate::is_valid_input((4, 4).into(), (2, 2).into(), &restore));
        let back = rearrange_image(&scrambled, (2, 2).into(), &restore).unwrap();
        assert_eq!(back.as_bytes(), src.as_bytes());
    }

    #[test]
    fn scramble_returns_exact_inverse() {
        let src = DynamicImage::ImageLuma8(image::ImageBuffer::from_fn(8, 1, |x, _| {
            Luma([x as u8])
        }));
        for seed in ["a", "b", "c", "great wave"] {
            let mut rng = ordering::seeded_rng(Some(seed));
            let (scrambled, restore) = scramble_image(&src, (1, 1).into(), &mut rng).unwrap();

            // Pixel x of the scrambled row is the source tile now at x.
            let applied: Vec<i64> = (0..8)
                .map(|x| i64::from(scrambled.get_pixel(x, 0)[0]))
                .collect();
            assert_eq!(ordering::inverse(&applied).unwrap(), restore, "seed {seed:?}");
        }

        let single = DynamicImage::new_rgb8(4, 4);
        let mut rng = ordering::seeded_rng(Some("one"));
        let (_, restore) = scramble_image(&single, (4, 4).into(), &mut rng).unwrap();
        assert_eq!(restore, [0]);
    }
}
