//! Path data for node outlines and edge curves.

use super::layout::Point;
use super::parse::Shape;
use crate::svg::fmt_num;

const CORNER_R: f64 = 5.0;
const DATABASE_RY: f64 = 6.0;
const HEXAGON_INSET: f64 = 12.0;

/// Outline of a `w`×`h` node centred on `(x, y)`.
pub fn shape_path(shape: Shape, x: f64, y: f64, w: f64, h: f64) -> String {
    let (hw, hh) = (w / 2.0, h / 2.0);
    let (l, r, t, b) = (x - hw, x + hw, y - hh, y + hh);
    let n = fmt_num;

    match shape {
        Shape::Rect => format!("M{},{}H{}V{}H{}Z", n(l), n(t), n(r), n(b), n(l)),
        Shape::Diamond => format!(
            "M{},{}L{},{}L{},{}L{},{}Z",
            n(x),
            n(t - 4.0),
            n(r + 8.0),
            n(y),
            n(x),
            n(b + 4.0),
            n(l - 8.0),
            n(y)
        ),
        Shape::Ellipse => format!(
            "M{l},{y}A{rx},{ry} 0 1,1 {r},{y}A{rx},{ry} 0 1,1 {l},{y}Z",
            l = n(l),
            r = n(r),
            y = n(y),
            rx = n(hw),
            ry = n(hh)
        ),
        Shape::Database => {
            let (top, bottom) = (n(t + DATABASE_RY), n(b - DATABASE_RY));
            format!(
                "M{l},{top}A{rx},{ry} 0 0,1 {r},{top}V{bottom}A{rx},{ry} 0 0,1 {l},{bottom}Z \
                 M{l},{top}A{rx},{ry} 0 0,0 {r},{top}",
                l = n(l),
                r = n(r),
                rx = n(hw),
                ry = n(DATABASE_RY)
            )
        }
        Shape::Hexagon => format!(
            "M{},{}H{}L{},{}L{},{}H{}L{},{}Z",
            n(l + HEXAGON_INSET),
            n(t),
            n(r - HEXAGON_INSET),
            n(r),
            n(y),
            n(r - HEXAGON_INSET),
            n(b),
            n(l + HEXAGON_INSET),
            n(l),
            n(y)
        ),
        Shape::RoundRect => {
            let c = CORNER_R;
            format!(
                "M{},{}H{}Q{},{} {},{}V{}Q{},{} {},{}H{}Q{},{} {},{}V{}Q{},{} {},{}Z",
                n(l + c),
                n(t),
                n(r - c),
                n(r),
                n(t),
                n(r),
                n(t + c),
                n(b - c),
                n(r),
                n(b),
                n(r - c),
                n(b),
                n(l + c),
                n(l),
                n(b),
                n(l),
                n(b - c),
                n(t + c),
                n(l),
                n(t),
                n(l + c),
                n(t)
            )
        }
    }
}

fn pt(p: Point) -> String {
    format!("{:.1},{:.1}", p.x, p.y)
}

/// Smooth path through routed points.
///
/// Two points draw a line, three a quadratic curve. Longer routes chain
/// smooth cubic segments and finish with a line if the chain stops short.
/// Fewer than two points yield an empty string.
pub fn edge_path(points: &[Point]) -> String {
    match points {
        [] | [_] => String::new(),
        [a, b] => format!("M{} L{}", pt(*a), pt(*b)),
        [a, cp, b] => format!("M{} Q{} {}", pt(*a), pt(*cp), pt(*b)),
        _ => {
            let last = points.len() - 1;
            let mut d = format!("M{}", pt(points[0]));
            let mut i = 1;
            while i < last {
                let end = points[(i + 1).min(last)];
                d.push_str(&format!(" S{} {}", pt(points[i]), pt(end)));
                i += 2;
            }
            let tail = pt(points[last]);
            if !d.ends_with(&tail) {
                d.push_str(&format!(" L{tail}"));
            }
            d
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_and_hexagon() {
        assert_eq!(shape_path(Shape::Rect, 50.0, 20.0, 40.0, 20.0), "M30,10H70V30H30Z");
        assert_eq!(
            shape_path(Shape::Hexagon, 50.0, 20.0, 40.0, 20.0),
            "M42,10H58L70,20L58,30H42L30,20Z"
        );
    }

    #[test]
    fn test_diamond_overshoots_box() {
        assert_eq!(
            shape_path(Shape::Diamond, 50.0, 20.0, 40.0, 20.0),
            "M50,6L78,20L50,34L22,20Z"
        );
    }

    #[test]
    fn test_roundrect_corners() {
        let d = shape_path(Shape::RoundRect, 50.0, 16.0, 80.0, 32.0);
        assert!(d.starts_with("M15,0H85Q90,0 90,5V27Q90,32 85,32"));
        assert!(d.ends_with("Q10,0 15,0Z"));
    }

    #[test]
    fn test_database_has_lid() {
        let d = shape_path(Shape::Database, 50.0, 16.0, 80.0, 32.0);
        assert_eq!(d.matches('M').count(), 2);
        assert!(d.contains("A40,6 0 0,0 90,6"));
    }

    #[test]
    fn test_edge_path_forms() {
        let p = |x, y| Point::new(x, y);
        assert_eq!(edge_path(&[p(0.0, 0.0)]), "");
        assert_eq!(edge_path(&[p(0.0, 0.0), p(1.0, 2.0)]), "M0.0,0.0 L1.0,2.0");
        assert_eq!(
            edge_path(&[p(0.0, 0.0), p(5.0, 5.0), p(10.0, 0.0)]),
            "M0.0,0.0 Q5.0,5.0 10.0,0.0"
        );
        assert_eq!(
            edge_path(&[p(0.0, 0.0), p(0.0, 10.0), p(20.0, 10.0), p(20.0, 20.0)]),
            "M0.0,0.0 S0.0,10.0 20.0,10.0 L20.0,20.0"
        );
        assert_eq!(
            edge_path(&[p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0), p(3.0, 3.0), p(4.0, 4.0)]),
            "M0.0,0.0 S1.0,1.0 2.0,2.0 S3.0,3.0 4.0,4.0"
        );
    }
}
