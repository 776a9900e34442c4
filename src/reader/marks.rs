use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::{
    drawing::draw_line_segment_mut,
    geometric_transformations::{rotate_about_center, Interpolation},
};

use crate::{BarcodeResult, OutputFormat};

// Detection marks
//------------------------------------------------------------------------------

const MARK_COLOR: Rgba<u8> = Rgba([50, 205, 50, 255]);
const STROKE_WIDTH: u32 = 2;

type Segment = ((f32, f32), (f32, f32));

/// Draws the outline described by a symbol's locating points onto a copy of `img` and
/// returns it as PNG. Fewer than two points describe no outline and give `None`.
///
/// `points` are expected in the frame of `img` turned counter-clockwise by `orientation`
/// degrees, so the copy is turned that way before drawing and back afterwards.
pub fn render_marks(
    points: &[(f32, f32)],
    orientation: Option<i32>,
    img: &DynamicImage,
) -> BarcodeResult<Option<Vec<u8>>> {
    if points.len() < 2 {
        return Ok(None);
    }

    let angle = orientation.unwrap_or(0).rem_euclid(360);
    let mut canvas = turn_clockwise(img, 360 - angle).to_rgba8();
    for (from, to) in outline(points) {
        draw_stroke(&mut canvas, from, to);
    }
    let marked = turn_clockwise(&DynamicImage::ImageRgba8(canvas), angle);

    OutputFormat::Png.write(&marked).map(Some)
}

/// Segments to stroke for a set of locating points: two points are a line, four a closed
/// quadrilateral and any other even count is read as independent pairs. Odd counts give
/// nothing.
fn outline(points: &[(f32, f32)]) -> Vec<Segment> {
    match points.len() {
        2 => vec![(points[0], points[1])],
        4 => (0..4).map(|i| (points[i], points[(i + 1) % 4])).collect(),
        n if n % 2 == 0 => points.chunks_exact(2).map(|p| (p[0], p[1])).collect(),
        _ => Vec::new(),
    }
}

fn draw_stroke(canvas: &mut RgbaImage, (x0, y0): (f32, f32), (x1, y1): (f32, f32)) {
    for d in 0..STROKE_WIDTH {
        let o = d as f32;
        draw_line_segment_mut(canvas, (x0 + o, y0), (x1 + o, y1), MARK_COLOR);
        draw_line_segment_mut(canvas, (x0, y0 + o), (x1, y1 + o), MARK_COLOR);
    }
}

fn turn_clockwise(img: &DynamicImage, degrees: i32) -> DynamicImage {
    match degrees.rem_euclid(360) {
        0 => img.clone(),
        90 => img.rotate90(),
        180 => img.rotate180(),
        270 => img.rotate270(),
        d => {
            let theta = (d as f32).to_radians();
            let rotated =
                rotate_about_center(&img.to_rgba8(), theta, Interpolation::Bilinear, Rgba([0; 4]));
            DynamicImage::ImageRgba8(rotated)
        }
    }
}

#[cfg(test)]
mod marks_tests {
    use image::{DynamicImage, Rgba, RgbaImage};
    use test_case::test_case;

    use super::{outline, render_marks, MARK_COLOR};

    fn blank(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([255; 4])))
    }

    #[test_case(2, 1)]
    #[test_case(3, 0)]
    #[test_case(4, 4)]
    #[test_case(5, 0)]
    #[test_case(6, 3)]
    #[test_case(8, 4)]
    fn test_outline_segments(n: usize, segments: usize) {
        let pts = (0..n).map(|i| (i as f32, i as f32)).collect::<Vec<_>>();
        assert_eq!(outline(&pts).len(), segments);
    }

    #[test]
    fn test_quad_is_closed() {
        let pts = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
        let segs = outline(&pts);
        assert_eq!(segs[3], ((0.0, 4.0), (0.0, 0.0)));
    }

    #[test]
    fn test_too_few_points() {
        assert_eq!(render_marks(&[], None, &blank(8, 8)).unwrap(), None);
        assert_eq!(render_marks(&[(1.0, 1.0)], Some(90), &blank(8, 8)).unwrap(), None);
    }

    #[test]
    fn test_line_drawn_unrotated() {
        let png = render_marks(&[(2.0, 5.0), (17.0, 5.0)], None, &blank(20, 10)).unwrap().unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (20, 10));
        assert_eq!(*img.get_pixel(10, 5), MARK_COLOR);
        assert_eq!(*img.get_pixel(10, 0), Rgba([255; 4]));
    }

    #[test]
    fn test_marks_follow_orientation() {
        // A 20x10 source turned counter-clockwise is 10x20; column 5 of the turned frame
        // is row 5 of the source
        let pts = [(5.0, 2.0), (5.0, 17.0)];
        let png = render_marks(&pts, Some(90), &blank(20, 10)).unwrap().unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (20, 10));
        assert_eq!(*img.get_pixel(10, 5), MARK_COLOR);
        assert_eq!(*img.get_pixel(10, 0), Rgba([255; 4]));
    }
}
