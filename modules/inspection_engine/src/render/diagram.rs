//! Diagram renderer and hit-testing
//!
//! Rendering is a pure function of (template, angle, part records): the same inputs
//! always give the same colors, which is what keeps part status stable across
//! view switches.

use super::geometry::{contains, Affine, Point};
use super::svg::{ElementPath, SvgDocument, SvgElement};
use crate::contract::{
    CarTemplate, DisplayCondition, InspectionError, InspectionPart, PartKey, ViewAngle,
};
use crate::domain::catalog::Catalog;
use std::collections::BTreeMap;

/// Attribute marking an element as an interactive part region
pub const PART_ATTR: &str = "data-part";
pub const CONDITION_ATTR: &str = "data-condition";
pub const REGION_CLASS: &str = "part-region";

/// One clickable part in a rendered diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveRegion {
    pub part_key: PartKey,
    pub element_id: String,
    pub condition: DisplayCondition,
    pub fill: String,
}

/// Pointer input as delivered by the UI, already in diagram user space
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Mouse { x: f64, y: f64 },
    Touch { x: f64, y: f64 },
    Pen { x: f64, y: f64 },
    /// DOM event target, identified by element id
    Target { element_id: String },
}

enum HitQuery<'a> {
    At(Point),
    Element(&'a str),
}

impl PointerInput {
    fn query(&self) -> HitQuery<'_> {
        match self {
            PointerInput::Mouse { x, y }
            | PointerInput::Touch { x, y }
            | PointerInput::Pen { x, y } => HitQuery::At(Point::new(*x, *y)),
            PointerInput::Target { element_id } => HitQuery::Element(element_id),
        }
    }
}

/// A template diagram with every interactive part colored for its condition
#[derive(Debug, Clone)]
pub struct ColoredDiagram {
    pub template_id: String,
    pub angle: ViewAngle,
    pub regions: Vec<InteractiveRegion>,
    document: SvgDocument,
}

impl ColoredDiagram {
    pub fn document(&self) -> &SvgDocument {
        &self.document
    }

    pub fn to_svg_string(&self) -> String {
        self.document.to_svg_string()
    }

    pub fn region(&self, part_key: &str) -> Option<&InteractiveRegion> {
        self.regions.iter().find(|r| r.part_key.as_str() == part_key)
    }

    /// Fill currently applied to a part, if it is interactive here
    pub fn fill_of(&self, part_key: &str) -> Option<&str> {
        self.region(part_key).map(|r| r.fill.as_str())
    }

    /// Resolve pointer input to the part under it
    ///
    /// Mouse, touch and pen at the same location resolve identically; a DOM target
    /// resolves through its nearest tagged ancestor.
    pub fn hit_test(&self, input: &PointerInput) -> Option<&PartKey> {
        let path = match input.query() {
            HitQuery::Element(id) => self.document.find_by_id(id)?,
            HitQuery::At(point) => self.topmost_at(point)?,
        };
        self.enclosing_part(&path)
    }

    /// Map a client coordinate inside a rendered box of `width`×`height` into user space
    ///
    /// Follows the default `preserveAspectRatio="xMidYMid meet"`.
    pub fn client_to_user(&self, x: f64, y: f64, width: f64, height: f64) -> Option<Point> {
        let (min_x, min_y, vb_w, vb_h) = view_box(self.document.root())?;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let scale = (width / vb_w).min(height / vb_h);
        let offset_x = (width - vb_w * scale) / 2.0;
        let offset_y = (height - vb_h * scale) / 2.0;
        Some(Point::new(
            min_x + (x - offset_x) / scale,
            min_y + (y - offset_y) / scale,
        ))
    }

    fn enclosing_part(&self, path: &ElementPath) -> Option<&PartKey> {
        (0..=path.len()).rev().find_map(|depth| {
            let element = self.document.element(&path[..depth])?;
            let key = element.attr(PART_ATTR)?;
            self.regions
                .iter()
                .find(|r| r.part_key.as_str() == key)
                .map(|r| &r.part_key)
        })
    }

    fn topmost_at(&self, point: Point) -> Option<ElementPath> {
        let mut hit = None;
        walk_hittable(
            self.document.root(),
            &mut Vec::new(),
            Affine::IDENTITY,
            point,
            &mut hit,
        );
        hit
    }
}

fn walk_hittable(
    element: &SvgElement,
    path: &mut ElementPath,
    parent: Affine,
    point: Point,
    hit: &mut Option<ElementPath>,
) {
    if matches!(
        element.local_name(),
        "defs" | "clipPath" | "mask" | "symbol" | "marker" | "pattern" | "title" | "desc"
    ) || element.attr("display") == Some("none")
    {
        return;
    }

    let transform = match element.attr("transform") {
        Some(t) => parent.then(&Affine::parse(t)),
        None => parent,
    };

    if element.attr("pointer-events") != Some("none") {
        if let Some(inverse) = transform.invert() {
            // Later elements paint over earlier ones, so the last hit wins
            if contains(element, inverse.apply(point)) {
                *hit = Some(path.clone());
            }
        }
    }

    for (index, child) in element.child_elements() {
        path.push(index);
        walk_hittable(child, path, transform, point, hit);
        path.pop();
    }
}

fn view_box(root: &SvgElement) -> Option<(f64, f64, f64, f64)> {
    if let Some(vb) = root.attr("viewBox") {
        let numbers: Vec<f64> = vb
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect();
        if let [x, y, w, h] = numbers[..] {
            if w > 0.0 && h > 0.0 {
                return Some((x, y, w, h));
            }
        }
    }
    let w = root.attr("width").and_then(super::geometry::parse_length)?;
    let h = root.attr("height").and_then(super::geometry::parse_length)?;
    (w > 0.0 && h > 0.0).then_some((0.0, 0.0, w, h))
}

/// Color every interactive part of `template`'s `angle` diagram
///
/// Parts missing from the template mapping, hidden, or not drawn in this angle are
/// left untouched and never become regions. Any pre-existing region tagging in the
/// source markup is stripped first.
pub fn render(
    template: &CarTemplate,
    angle: ViewAngle,
    parts_status: &BTreeMap<PartKey, InspectionPart>,
    catalog: &Catalog,
) -> Result<ColoredDiagram, InspectionError> {
    let source = template
        .diagram(angle)
        .ok_or_else(|| InspectionError::ViewAngleUnavailable {
            template_id: template.id.clone(),
            angle,
        })?;
    let mut document =
        SvgDocument::parse(source).map_err(|e| InspectionError::InvalidTemplate {
            template_id: template.id.clone(),
            details: format!("'{}' diagram: {}", angle, e),
        })?;

    document.for_each_element_mut(|element| {
        element.remove_attr(PART_ATTR);
        element.remove_attr(CONDITION_ATTR);
        element.remove_class(REGION_CLASS);
    });

    let ids = document.id_index();
    let mut regions = Vec::new();
    for part in catalog.parts() {
        let Some(mapping) = template.mapping(part.key.as_str()) else {
            continue;
        };
        if !mapping.is_interactive_in(angle) {
            continue;
        }
        let Some(element) = ids
            .get(&mapping.element_id)
            .and_then(|path| document.element_mut(path))
        else {
            tracing::warn!(
                template = %template.id,
                angle = %angle,
                element = %mapping.element_id,
                "Diagram has no element for mapped part {}",
                part.key
            );
            continue;
        };

        let condition = parts_status
            .get(&part.key)
            .map(|p| DisplayCondition::Recorded(p.condition))
            .unwrap_or(DisplayCondition::NotInspected);
        let fill = catalog.fill_for(part, condition).to_string();

        element.set_fill(&fill);
        element.set_attr(PART_ATTR, part.key.as_str());
        element.set_attr(CONDITION_ATTR, condition.as_str());
        element.add_class(REGION_CLASS);

        regions.push(InteractiveRegion {
            part_key: part.key.clone(),
            element_id: mapping.element_id.clone(),
            condition,
            fill,
        });
    }

    tracing::debug!(
        template = %template.id,
        angle = %angle,
        regions = regions.len(),
        "Rendered diagram"
    );

    Ok(ColoredDiagram {
        template_id: template.id.clone(),
        angle,
        regions,
        document,
    })
}

/// Visible stand-in for a diagram that failed to load or render
pub fn render_placeholder(angle: ViewAngle, message: &str) -> SvgDocument {
    let mut root = SvgElement::new("svg");
    root.set_attr("xmlns", "http://www.w3.org/2000/svg");
    root.set_attr("viewBox", "0 0 400 200");
    root.set_attr("class", "diagram-placeholder");
    root.set_attr("data-angle", angle.as_str());

    let mut frame = SvgElement::new("rect");
    for (k, v) in [
        ("x", "4"),
        ("y", "4"),
        ("width", "392"),
        ("height", "192"),
        ("rx", "8"),
        ("fill", "#f9fafb"),
        ("stroke", "#ef4444"),
        ("stroke-dasharray", "8 4"),
    ] {
        frame.set_attr(k, v);
    }

    let mut text = SvgElement::new("text");
    for (k, v) in [
        ("x", "200"),
        ("y", "105"),
        ("text-anchor", "middle"),
        ("font-size", "14"),
        ("fill", "#b91c1c"),
    ] {
        text.set_attr(k, v);
    }
    text.children.push(super::svg::SvgNode::Text(message.to_string()));

    root.children.push(super::svg::SvgNode::Element(frame));
    root.children.push(super::svg::SvgNode::Element(text));
    SvgDocument::from_root(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{Condition, InspectionPart};
    use crate::domain::catalog::wheel_color;
    use crate::domain::template::builtin_sedan;
    use chrono::Utc;

    fn status(entries: &[(&str, Condition)]) -> BTreeMap<PartKey, InspectionPart> {
        entries
            .iter()
            .map(|(k, c)| {
                let key = PartKey::new(*k).unwrap();
                (
                    key.clone(),
                    InspectionPart {
                        part_key: key,
                        condition: *c,
                        severity: None,
                        notes: None,
                        photos: vec![],
                        updated_at: Utc::now(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_render_colors_recorded_and_default_parts() {
        let catalog = Catalog::builtin();
        let template = builtin_sedan();
        let parts = status(&[("front_bumper", Condition::Scratch)]);

        let diagram = render(&template, ViewAngle::Front, &parts, &catalog).unwrap();

        assert_eq!(diagram.fill_of("front_bumper"), Some("#eab308"));
        assert_eq!(diagram.fill_of("hood"), Some("#d1d5db"));
        let markup = diagram.to_svg_string();
        assert!(markup.contains("data-part=\"front_bumper\""));
        assert!(markup.contains("data-condition=\"scratch\""));
    }

    #[test]
    fn test_every_condition_renders_its_table_color() {
        let catalog = Catalog::builtin();
        let template = builtin_sedan();
        for condition in Condition::ALL {
            let parts = status(&[("hood", *condition)]);
            let diagram = render(&template, ViewAngle::Front, &parts, &catalog).unwrap();
            assert_eq!(
                diagram.fill_of("hood"),
                Some(catalog.colors().color((*condition).into()))
            );
        }
    }

    #[test]
    fn test_wheels_use_wheel_palette() {
        let catalog = Catalog::builtin();
        let template = builtin_sedan();
        let parts = status(&[("wheel_front_left", Condition::Broken)]);
        let diagram = render(&template, ViewAngle::Left, &parts, &catalog).unwrap();
        assert_eq!(
            diagram.fill_of("wheel_front_left"),
            Some(wheel_color(Condition::Broken.into()))
        );
    }

    #[test]
    fn test_colors_persist_across_view_switches() {
        let catalog = Catalog::builtin();
        let template = builtin_sedan();
        let parts = status(&[
            ("front_bumper", Condition::Broken),
            ("front_left_door", Condition::Painted),
            ("trunk", Condition::Replaced),
        ]);

        let first: Vec<_> = ViewAngle::MANDATORY
            .iter()
            .map(|a| render(&template, *a, &parts, &catalog).unwrap().regions)
            .collect();
        for _ in 0..3 {
            for (angle, expected) in ViewAngle::MANDATORY.iter().zip(&first) {
                let again = render(&template, *angle, &parts, &catalog).unwrap();
                assert_eq!(&again.regions, expected);
            }
        }
    }

    #[test]
    fn test_unmapped_or_hidden_parts_are_not_interactive() {
        let catalog = Catalog::builtin();
        let mut template = builtin_sedan();
        template.parts.retain(|m| m.part_key.as_str() != "grille");
        if let Some(hood) = template.parts.iter_mut().find(|m| m.part_key.as_str() == "hood") {
            hood.visible = false;
        }

        let diagram = render(&template, ViewAngle::Front, &BTreeMap::new(), &catalog).unwrap();
        assert!(diagram.region("grille").is_none());
        assert!(diagram.region("hood").is_none());
        assert!(diagram.hit_test(&PointerInput::Target {
            element_id: "hood".to_string()
        })
        .is_none());
        assert!(!diagram.to_svg_string().contains("data-part=\"hood\""));
    }

    #[test]
    fn test_missing_angle_fails() {
        let catalog = Catalog::builtin();
        let mut template = builtin_sedan();
        template.diagrams.remove(&ViewAngle::Top);
        let err = render(&template, ViewAngle::Top, &BTreeMap::new(), &catalog).unwrap_err();
        assert!(matches!(err, InspectionError::ViewAngleUnavailable { .. }));
    }

    #[test]
    fn test_pointer_kinds_resolve_to_same_part() {
        let catalog = Catalog::builtin();
        let template = builtin_sedan();
        let diagram = render(&template, ViewAngle::Front, &BTreeMap::new(), &catalog).unwrap();
        let region = diagram.region("front_bumper").unwrap();
        let path = diagram.document().find_by_id(&region.element_id).unwrap();
        let bumper = diagram.document().element(&path).unwrap();
        let x = bumper.attr("x").unwrap().parse::<f64>().unwrap() + 5.0;
        let y = bumper.attr("y").unwrap().parse::<f64>().unwrap() + 5.0;

        let mouse = diagram.hit_test(&PointerInput::Mouse { x, y });
        let touch = diagram.hit_test(&PointerInput::Touch { x, y });
        let pen = diagram.hit_test(&PointerInput::Pen { x, y });
        let target = diagram.hit_test(&PointerInput::Target {
            element_id: region.element_id.clone(),
        });

        assert_eq!(mouse.map(PartKey::as_str), Some("front_bumper"));
        assert_eq!(mouse, touch);
        assert_eq!(mouse, pen);
        assert_eq!(mouse, target);
    }

    #[test]
    fn test_hit_test_walks_up_from_nested_target() {
        let catalog = Catalog::builtin();
        let template = builtin_sedan();
        let diagram = render(&template, ViewAngle::Left, &BTreeMap::new(), &catalog).unwrap();
        // Hub cap is drawn inside the wheel group
        let part = diagram.hit_test(&PointerInput::Target {
            element_id: "wheel-fl-hub".to_string(),
        });
        assert_eq!(part.map(PartKey::as_str), Some("wheel_front_left"));
    }

    #[test]
    fn test_hit_test_outside_any_part() {
        let catalog = Catalog::builtin();
        let template = builtin_sedan();
        let diagram = render(&template, ViewAngle::Front, &BTreeMap::new(), &catalog).unwrap();
        assert!(diagram
            .hit_test(&PointerInput::Mouse { x: -50.0, y: -50.0 })
            .is_none());
    }

    #[test]
    fn test_client_to_user_letterboxing() {
        let catalog = Catalog::builtin();
        let template = builtin_sedan();
        let diagram = render(&template, ViewAngle::Front, &BTreeMap::new(), &catalog).unwrap();
        // viewBox 0 0 400 300 drawn into 800x800 → scale 2, vertical offset 100
        let p = diagram.client_to_user(400.0, 400.0, 800.0, 800.0).unwrap();
        assert!((p.x - 200.0).abs() < 1e-9);
        assert!((p.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_placeholder_is_visible() {
        let svg = render_placeholder(ViewAngle::Rear, "Diagram failed to load").to_svg_string();
        assert!(svg.contains("Diagram failed to load"));
        assert!(svg.contains("data-angle=\"rear\""));
    }
}
