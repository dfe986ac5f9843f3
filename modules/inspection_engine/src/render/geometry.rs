//! Geometry for hit-testing: affine transforms and shape containment

use super::svg::SvgElement;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 2D affine transform `[a c e; b d f; 0 0 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Parse an SVG `transform` attribute; malformed input yields identity
    pub fn parse(value: &str) -> Affine {
        match svgtypes::Transform::from_str(value) {
            Ok(t) => Affine {
                a: t.a,
                b: t.b,
                c: t.c,
                d: t.d,
                e: t.e,
                f: t.f,
            },
            Err(_) => {
                tracing::debug!(transform = value, "Ignoring unparseable transform");
                Affine::IDENTITY
            }
        }
    }

    /// `self` applied after `inner`
    pub fn then(&self, inner: &Affine) -> Affine {
        Affine {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    pub fn invert(&self) -> Option<Affine> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        Some(Affine {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

/// Parse a length attribute (`12`, `12.5px`); percentages are not supported
pub fn parse_length(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
    number.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn length_attr(element: &SvgElement, name: &str) -> f64 {
    element.attr(name).and_then(parse_length).unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FillRule {
    NonZero,
    EvenOdd,
}

/// Whether `p` (in the element's own user space) lies inside the element's fill area
pub fn contains(element: &SvgElement, p: Point) -> bool {
    match element.local_name() {
        "rect" => {
            let (x, y) = (length_attr(element, "x"), length_attr(element, "y"));
            let (w, h) = (length_attr(element, "width"), length_attr(element, "height"));
            w > 0.0 && h > 0.0 && p.x >= x && p.x <= x + w && p.y >= y && p.y <= y + h
        }
        "circle" => {
            let (cx, cy, r) = (
                length_attr(element, "cx"),
                length_attr(element, "cy"),
                length_attr(element, "r"),
            );
            r > 0.0 && (p.x - cx).powi(2) + (p.y - cy).powi(2) <= r * r
        }
        "ellipse" => {
            let (cx, cy) = (length_attr(element, "cx"), length_attr(element, "cy"));
            let (rx, ry) = (length_attr(element, "rx"), length_attr(element, "ry"));
            rx > 0.0
                && ry > 0.0
                && ((p.x - cx) / rx).powi(2) + ((p.y - cy) / ry).powi(2) <= 1.0
        }
        "polygon" | "polyline" => {
            let points: Vec<Point> = element
                .attr("points")
                .map(|pts| {
                    svgtypes::PointsParser::from(pts)
                        .map(|(x, y)| Point::new(x, y))
                        .collect()
                })
                .unwrap_or_default();
            inside_rings(&[points], p, fill_rule(element))
        }
        "path" => {
            let rings = element.attr("d").map(flatten_path).unwrap_or_default();
            inside_rings(&rings, p, fill_rule(element))
        }
        _ => false,
    }
}

fn fill_rule(element: &SvgElement) -> FillRule {
    match element.attr("fill-rule") {
        Some("evenodd") => FillRule::EvenOdd,
        _ => FillRule::NonZero,
    }
}

const CURVE_STEPS: usize = 16;

/// Flatten path data into closed polylines, one per subpath
pub fn flatten_path(d: &str) -> Vec<Vec<Point>> {
    use svgtypes::SimplePathSegment as Seg;

    let mut rings: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut cursor = Point::new(0.0, 0.0);

    for segment in svgtypes::SimplifyingPathParser::from(d) {
        let Ok(segment) = segment else {
            tracing::debug!("Stopping at malformed path data");
            break;
        };
        match segment {
            Seg::MoveTo { x, y } => {
                if current.len() > 1 {
                    rings.push(std::mem::take(&mut current));
                }
                current.clear();
                cursor = Point::new(x, y);
                current.push(cursor);
            }
            Seg::LineTo { x, y } => {
                cursor = Point::new(x, y);
                current.push(cursor);
            }
            Seg::Quadratic { x1, y1, x, y } => {
                let start = cursor;
                for step in 1..=CURVE_STEPS {
                    let t = step as f64 / CURVE_STEPS as f64;
                    let mt = 1.0 - t;
                    current.push(Point::new(
                        mt * mt * start.x + 2.0 * mt * t * x1 + t * t * x,
                        mt * mt * start.y + 2.0 * mt * t * y1 + t * t * y,
                    ));
                }
                cursor = Point::new(x, y);
            }
            Seg::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let start = cursor;
                for step in 1..=CURVE_STEPS {
                    let t = step as f64 / CURVE_STEPS as f64;
                    let mt = 1.0 - t;
                    let (w0, w1, w2, w3) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
                    current.push(Point::new(
                        w0 * start.x + w1 * x1 + w2 * x2 + w3 * x,
                        w0 * start.y + w1 * y1 + w2 * y2 + w3 * y,
                    ));
                }
                cursor = Point::new(x, y);
            }
            Seg::ClosePath => {
                if let Some(first) = current.first().copied() {
                    if current.len() > 1 {
                        rings.push(std::mem::take(&mut current));
                    }
                    cursor = first;
                    current.push(cursor);
                }
            }
        }
    }
    if current.len() > 1 {
        rings.push(current);
    }
    rings
}

/// Point-in-area test over implicitly closed rings
fn inside_rings(rings: &[Vec<Point>], p: Point, rule: FillRule) -> bool {
    let mut winding = 0i32;
    let mut crossings = 0u32;
    for ring in rings.iter().filter(|r| r.len() > 2) {
        for (i, a) in ring.iter().enumerate() {
            let b = ring[(i + 1) % ring.len()];
            if a.y <= p.y {
                if b.y > p.y && cross(*a, b, p) > 0.0 {
                    winding += 1;
                }
            } else if b.y <= p.y && cross(*a, b, p) < 0.0 {
                winding -= 1;
            }
            if (a.y > p.y) != (b.y > p.y) {
                let x_at = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_at {
                    crossings += 1;
                }
            }
        }
    }
    match rule {
        FillRule::NonZero => winding != 0,
        FillRule::EvenOdd => crossings % 2 == 1,
    }
}

fn cross(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, attrs: &[(&str, &str)]) -> SvgElement {
        let mut e = SvgElement::new(name);
        for (k, v) in attrs {
            e.set_attr(k, *v);
        }
        e
    }

    #[test]
    fn test_rect_and_circle_containment() {
        let rect = element("rect", &[("x", "10"), ("y", "10"), ("width", "20"), ("height", "10")]);
        assert!(contains(&rect, Point::new(15.0, 15.0)));
        assert!(!contains(&rect, Point::new(35.0, 15.0)));

        let circle = element("circle", &[("cx", "50"), ("cy", "50"), ("r", "5px")]);
        assert!(contains(&circle, Point::new(52.0, 52.0)));
        assert!(!contains(&circle, Point::new(56.0, 56.0)));
    }

    #[test]
    fn test_path_with_hole_respects_fill_rule() {
        let d = "M0 0 L100 0 L100 100 L0 100 Z M25 25 L75 25 L75 75 L25 75 Z";
        let evenodd = element("path", &[("d", d), ("fill-rule", "evenodd")]);
        assert!(contains(&evenodd, Point::new(10.0, 10.0)));
        assert!(!contains(&evenodd, Point::new(50.0, 50.0)));

        // Same orientation on both rings: nonzero fills the hole
        let nonzero = element("path", &[("d", d)]);
        assert!(contains(&nonzero, Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_curved_path_is_flattened() {
        let wheel = element("path", &[("d", "M 0 50 A 50 50 0 1 1 100 50 A 50 50 0 1 1 0 50 Z")]);
        assert!(contains(&wheel, Point::new(50.0, 50.0)));
        assert!(!contains(&wheel, Point::new(95.0, 95.0)));
    }

    #[test]
    fn test_polygon_containment() {
        let triangle = element("polygon", &[("points", "0,0 10,0 5,10")]);
        assert!(contains(&triangle, Point::new(5.0, 3.0)));
        assert!(!contains(&triangle, Point::new(9.0, 9.0)));
    }

    #[test]
    fn test_affine_invert_round_trip() {
        let t = Affine::parse("translate(10 20) scale(2)");
        let p = Point::new(3.0, 4.0);
        let moved = t.apply(p);
        assert_eq!(moved, Point::new(16.0, 28.0));
        let back = t.invert().unwrap().apply(moved);
        assert!((back.x - p.x).abs() < 1e-9 && (back.y - p.y).abs() < 1e-9);
    }
}
