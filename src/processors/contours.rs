//! External contour extraction for glyph segmentation.

use imageproc::contours::{BorderType, Contour, find_contours};

use crate::domain::{BinaryMask, BoundingRect};

/// The outer boundary of one connected ink component.
#[derive(Debug, Clone)]
pub struct ExternalContour {
    /// Position in detection (raster scan) order.
    pub detection_index: usize,
    /// Boundary pixels in traversal order.
    pub points: Vec<(u32, u32)>,
}

impl ExternalContour {
    /// Area enclosed by the boundary polygon (shoelace formula over pixel centres).
    ///
    /// Degenerate components such as single pixels or one-pixel-thick lines
    /// enclose no area.
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    /// Bounding rectangle of the boundary, which is also that of the component.
    pub fn bounding_rect(&self) -> Option<BoundingRect> {
        BoundingRect::enclosing(self.points.iter().copied())
    }
}

/// Finds the outer boundary of every top-level ink component.
///
/// Holes, and components nested inside holes of other components, are
/// ignored. Contours are returned in detection order.
pub fn external_contours(mask: &BinaryMask) -> Vec<ExternalContour> {
    let contours: Vec<Contour<u32>> = find_contours::<u32>(mask.as_image());
    contours
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .enumerate()
        .map(|(detection_index, c)| ExternalContour {
            detection_index,
            points: c.points.iter().map(|p| (p.x, p.y)).collect(),
        })
        .collect()
}

/// Shoelace area of a closed polygon.
pub fn polygon_area(points: &[(u32, u32)]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0f64;
    for (i, &(x1, y1)) in points.iter().enumerate() {
        let (x2, y2) = points[(i + 1) % points.len()];
        twice_area += x1 as f64 * y2 as f64 - x2 as f64 * y1 as f64;
    }
    twice_area.abs() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn fill(img: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, Luma([255]));
            }
        }
    }

    #[test]
    fn test_polygon_area() {
        assert_eq!(polygon_area(&[(0, 0), (4, 0), (4, 3), (0, 3)]), 12.0);
        assert_eq!(polygon_area(&[(1, 1), (2, 2)]), 0.0);
    }

    #[test]
    fn test_holes_are_ignored() {
        let mut img = GrayImage::new(40, 40);
        fill(&mut img, 5, 5, 20, 20);
        // punch a hole and put a separate blob inside it
        for y in 10..20 {
            for x in 10..20 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        fill(&mut img, 13, 13, 4, 4);
        let mask = BinaryMask::from_image(&img);
        let contours = external_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(
            contours[0].bounding_rect(),
            Some(BoundingRect::new(5, 5, 20, 20))
        );
        assert_eq!(contours[0].area(), 19.0 * 19.0);
    }

    #[test]
    fn test_separate_components() {
        let mut img = GrayImage::new(60, 20);
        fill(&mut img, 40, 2, 10, 10);
        fill(&mut img, 5, 5, 10, 10);
        let contours = external_contours(&BinaryMask::from_image(&img));
        assert_eq!(contours.len(), 2);
        assert!(contours.iter().all(|c| c.area() == 81.0));
    }

    #[test]
    fn test_empty_mask_has_no_contours() {
        assert!(external_contours(&BinaryMask::empty(10, 10)).is_empty());
    }
}
