//! Bleed Edge Synthesis module
//!
//! Pads a repaired card with a mirrored margin so the printer can trim
//! without exposing unprinted edges.
//!
//! # Algorithm
//!
//! The output canvas is filled through a single mirror coordinate map: a
//! pixel at distance d beyond an edge takes the value of the d-th pixel
//! counting inward from that edge, so the first padded row repeats the edge
//! row and the seam is continuous. Axes reflect independently; corner blocks
//! mirror both at once. This reproduces the flip-and-paste construction of
//! per-edge strips in one formula, corners included.

use image::RgbaImage;

/// Pads card images with a mirrored bleed margin
pub struct BleedSynthesizer;

impl BleedSynthesizer {
    /// Pad `image` by `bleed_length` pixels on every side.
    ///
    /// Output dimensions are `(w + 2*bleed_length, h + 2*bleed_length)`;
    /// the input sits at offset `(bleed_length, bleed_length)` unchanged.
    pub fn apply(image: &RgbaImage, bleed_length: u32) -> RgbaImage {
        let (width, height) = image.dimensions();
        let out_width = width + 2 * bleed_length;
        let out_height = height + 2 * bleed_length;

        RgbaImage::from_fn(out_width, out_height, |x, y| {
            let sx = mirror_coord(x as i64 - bleed_length as i64, width as i64);
            let sy = mirror_coord(y as i64 - bleed_length as i64, height as i64);
            *image.get_pixel(sx as u32, sy as u32)
        })
    }
}

/// Map a (possibly out-of-range) coordinate into `[0, len)` by mirroring
/// about the image edge: `... 1 0 | 0 1 2 ... len-1 | len-1 len-2 ...`
/// The modular fold keeps margins wider than the image itself in range.
fn mirror_coord(coord: i64, len: i64) -> i64 {
    let period = 2 * len;
    let m = coord.rem_euclid(period);
    if m < len {
        m
    } else {
        period - 1 - m
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Image whose pixel at (x, y) encodes its own coordinates
    fn coordinate_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn test_mirror_coord_identity_inside() {
        for i in 0..10 {
            assert_eq!(mirror_coord(i, 10), i);
        }
    }

    #[test]
    fn test_mirror_coord_repeats_edge_row() {
        // One step outside mirrors the edge pixel itself
        assert_eq!(mirror_coord(-1, 10), 0);
        assert_eq!(mirror_coord(-2, 10), 1);
        assert_eq!(mirror_coord(10, 10), 9);
        assert_eq!(mirror_coord(11, 10), 8);
    }

    #[test]
    fn test_mirror_coord_deep_overhang() {
        // Folds keep landing in range even past a full mirror period
        let len = 5;
        for coord in -30..30 {
            let r = mirror_coord(coord, len);
            assert!((0..len).contains(&r), "coord {} mapped to {}", coord, r);
        }
        assert_eq!(mirror_coord(-5, 5), 4);
        assert_eq!(mirror_coord(-6, 5), 4);
    }

    #[test]
    fn test_mirror_coord_single_pixel_axis() {
        assert_eq!(mirror_coord(-3, 1), 0);
        assert_eq!(mirror_coord(0, 1), 0);
        assert_eq!(mirror_coord(7, 1), 0);
    }

    #[test]
    fn test_output_dimensions() {
        let image = coordinate_image(100, 100);
        let bled = BleedSynthesizer::apply(&image, 38);
        assert_eq!(bled.dimensions(), (176, 176));
    }

    #[test]
    fn test_interior_is_unchanged() {
        let image = coordinate_image(100, 100);
        let bled = BleedSynthesizer::apply(&image, 38);

        assert_eq!(bled.get_pixel(38, 38), image.get_pixel(0, 0));
        assert_eq!(bled.get_pixel(137, 137), image.get_pixel(99, 99));
        // Whole first row lands intact at y = 38
        for x in 0..100 {
            assert_eq!(bled.get_pixel(38 + x, 38), image.get_pixel(x, 0));
        }
    }

    #[test]
    fn test_first_mirrored_row_law() {
        let image = coordinate_image(100, 100);
        let bled = BleedSynthesizer::apply(&image, 38);

        // 1px above the top edge mirrors the top row
        assert_eq!(bled.get_pixel(38, 37), image.get_pixel(0, 0));
        // 1px left of the left edge mirrors the left column
        assert_eq!(bled.get_pixel(37, 38), image.get_pixel(0, 0));
        // Corner reflects both axes at once
        assert_eq!(bled.get_pixel(37, 37), image.get_pixel(0, 0));
        // 2px outside mirrors the second row/column in
        assert_eq!(bled.get_pixel(38, 36), image.get_pixel(0, 1));
        assert_eq!(bled.get_pixel(36, 38), image.get_pixel(1, 0));
    }

    #[test]
    fn test_matches_flip_and_paste_construction() {
        // The top band equals the top strip flipped vertically, the way an
        // explicit crop/flip/paste implementation builds it
        let image = coordinate_image(60, 40);
        let b = 10u32;
        let bled = BleedSynthesizer::apply(&image, b);

        for y in 0..b {
            for x in 0..60 {
                let flipped = image.get_pixel(x, b - 1 - y);
                assert_eq!(bled.get_pixel(b + x, y), flipped);
            }
        }
        // And the top-left corner block is the left band flipped vertically
        for y in 0..b {
            for x in 0..b {
                let expected = image.get_pixel(b - 1 - x, b - 1 - y);
                assert_eq!(bled.get_pixel(x, y), expected);
            }
        }
    }

    #[test]
    fn test_edges_are_seamless() {
        let image = coordinate_image(60, 40);
        let bled = BleedSynthesizer::apply(&image, 10);

        // The mirrored value at distance 1 outside equals the edge value
        for x in 0..60u32 {
            assert_eq!(bled.get_pixel(10 + x, 9), bled.get_pixel(10 + x, 10));
            assert_eq!(bled.get_pixel(10 + x, 50), bled.get_pixel(10 + x, 49));
        }
        for y in 0..40u32 {
            assert_eq!(bled.get_pixel(9, 10 + y), bled.get_pixel(10, 10 + y));
            assert_eq!(bled.get_pixel(70, 10 + y), bled.get_pixel(69, 10 + y));
        }
    }

    #[test]
    fn test_zero_bleed_is_identity() {
        let image = coordinate_image(30, 20);
        let bled = BleedSynthesizer::apply(&image, 0);
        assert_eq!(bled, image);
    }
}
