use image::{GrayImage, Luma};

use crate::engine::ModuleMatrix;

// Render
//------------------------------------------------------------------------------

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Rasterizes a module matrix for a requested canvas size.
///
/// Modules are scaled by the largest whole factor that fits the canvas (never below one
/// pixel per module). Linear symbols only scale horizontally and fill the requested height.
/// Unless `no_padding` is set, the symbol is centered on a canvas grown to the requested
/// size; with it the image is exactly the scaled symbol.
pub fn render(mat: &ModuleMatrix, width: u32, height: u32, no_padding: bool) -> GrayImage {
    let (mw, mh) = (mat.width() as u32, mat.height() as u32);
    let (sx, sy) = if mat.is_linear() {
        ((width / mw).max(1), height.max(1))
    } else {
        let s = (width / mw).min(height / mh).max(1);
        (s, s)
    };
    let (sym_w, sym_h) = (mw * sx, mh * sy);
    let (img_w, img_h) =
        if no_padding { (sym_w, sym_h) } else { (width.max(sym_w), height.max(sym_h)) };
    let (off_x, off_y) = ((img_w - sym_w) / 2, (img_h - sym_h) / 2);

    let mut canvas = GrayImage::from_pixel(img_w, img_h, LIGHT);
    for i in 0..sym_h {
        for j in 0..sym_w {
            let (r, c) = (i / sy, j / sx);
            if mat.get(r as i32, c as i32) {
                canvas.put_pixel(off_x + j, off_y + i, DARK);
            }
        }
    }

    canvas
}

#[cfg(test)]
mod render_tests {
    use image::Luma;
    use test_case::test_case;

    use super::render;
    use crate::engine::ModuleMatrix;

    fn checker(n: usize) -> ModuleMatrix {
        let mut mat = ModuleMatrix::new(n, n);
        for r in 0..n as i32 {
            for c in 0..n as i32 {
                mat.set(r, c, (r + c) % 2 == 0);
            }
        }
        mat
    }

    #[test_case(109, 109, false, (109, 109))]
    #[test_case(109, 109, true, (99, 99))]
    #[test_case(109, 40, true, (33, 33))]
    #[test_case(5, 5, false, (11, 11))]
    #[test_case(5, 5, true, (11, 11))]
    fn test_2d_size(width: u32, height: u32, no_padding: bool, exp: (u32, u32)) {
        let img = render(&checker(11), width, height, no_padding);
        assert_eq!(img.dimensions(), exp);
    }

    #[test]
    fn test_2d_centered() {
        // 11 modules at 9px leave 5px either side
        let img = render(&checker(11), 109, 109, false);
        assert_eq!(*img.get_pixel(4, 4), Luma([255]));
        assert_eq!(*img.get_pixel(5, 5), Luma([0]));
        assert_eq!(*img.get_pixel(13, 5), Luma([0]));
        assert_eq!(*img.get_pixel(14, 5), Luma([255]));
    }

    #[test]
    fn test_linear_stretch() {
        let mat = ModuleMatrix::from_runs(&[1, 1, 2], true, 0);
        let img = render(&mat, 9, 30, false);
        assert_eq!(img.dimensions(), (9, 30));
        // 4 modules at 2px, 1px of padding split as 0 left and 1 right
        for y in [0, 29] {
            assert_eq!(*img.get_pixel(0, y), Luma([0]));
            assert_eq!(*img.get_pixel(2, y), Luma([255]));
            assert_eq!(*img.get_pixel(7, y), Luma([0]));
            assert_eq!(*img.get_pixel(8, y), Luma([255]));
        }
    }

    #[test]
    fn test_linear_no_padding() {
        let mat = ModuleMatrix::from_runs(&[1, 1, 2], true, 3);
        let img = render(&mat, 0, 0, true);
        assert_eq!(img.dimensions(), (10, 1));
    }
}
