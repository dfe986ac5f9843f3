//! Owned, mutable SVG document tree
//!
//! Parsed once with `roxmltree`, edited by element path, serialized back to markup.

use std::collections::HashMap;
use std::fmt::Write as _;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug, thiserror::Error)]
pub enum SvgError {
    #[error("malformed SVG: {0}")]
    Parse(String),

    #[error("root element is <{0}>, expected <svg>")]
    NotSvg(String),
}

/// Index path from the root element to a descendant element
pub type ElementPath = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgNode {
    Element(SvgElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgElement {
    /// Qualified name as written (`path`, `xlink:href` style prefixes kept)
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SvgNode>,
}

impl SvgElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Local part of the element name
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let position = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(position).1)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_whitespace().any(|t| t == class))
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let classes = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr("class", classes);
    }

    pub fn remove_class(&mut self, class: &str) {
        let Some(existing) = self.attr("class") else {
            return;
        };
        let remaining: Vec<&str> = existing.split_whitespace().filter(|t| *t != class).collect();
        if remaining.is_empty() {
            self.remove_attr("class");
        } else {
            let joined = remaining.join(" ");
            self.set_attr("class", joined);
        }
    }

    /// Set the fill color, dropping any inline `style` fill that would override it
    pub fn set_fill(&mut self, color: &str) {
        self.set_attr("fill", color);
        if let Some(style) = self.attr("style") {
            let kept: Vec<&str> = style
                .split(';')
                .map(str::trim)
                .filter(|decl| !decl.is_empty())
                .filter(|decl| {
                    decl.split(':')
                        .next()
                        .map_or(true, |prop| prop.trim() != "fill")
                })
                .collect();
            if kept.is_empty() {
                self.remove_attr("style");
            } else {
                let joined = kept.join("; ");
                self.set_attr("style", joined);
            }
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = (usize, &SvgElement)> {
        self.children.iter().enumerate().filter_map(|(i, c)| match c {
            SvgNode::Element(e) => Some((i, e)),
            SvgNode::Text(_) => None,
        })
    }

    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                SvgNode::Text(t) => Some(t.as_str()),
                SvgNode::Element(_) => None,
            })
            .collect()
    }
}

/// A parsed SVG diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    root: SvgElement,
}

impl SvgDocument {
    pub fn parse(source: &str) -> Result<Self, SvgError> {
        let doc = roxmltree::Document::parse(source).map_err(|e| SvgError::Parse(e.to_string()))?;
        let root = doc.root_element();
        if root.tag_name().name() != "svg" {
            return Err(SvgError::NotSvg(root.tag_name().name().to_string()));
        }
        Ok(Self {
            root: build_element(root, None),
        })
    }

    pub fn from_root(root: SvgElement) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &SvgElement {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SvgElement {
        &mut self.root
    }

    pub fn element(&self, path: &[usize]) -> Option<&SvgElement> {
        let mut current = &self.root;
        for &index in path {
            current = match current.children.get(index)? {
                SvgNode::Element(e) => e,
                SvgNode::Text(_) => return None,
            };
        }
        Some(current)
    }

    pub fn element_mut(&mut self, path: &[usize]) -> Option<&mut SvgElement> {
        let mut current = &mut self.root;
        for &index in path {
            current = match current.children.get_mut(index)? {
                SvgNode::Element(e) => e,
                SvgNode::Text(_) => return None,
            };
        }
        Some(current)
    }

    /// Path of the first element carrying `id`
    pub fn find_by_id(&self, id: &str) -> Option<ElementPath> {
        self.elements()
            .into_iter()
            .find(|(_, e)| e.id() == Some(id))
            .map(|(path, _)| path)
    }

    /// Id → path index for every element with an id
    pub fn id_index(&self) -> HashMap<String, ElementPath> {
        let mut index = HashMap::new();
        for (path, element) in self.elements() {
            if let Some(id) = element.id() {
                index.entry(id.to_string()).or_insert(path);
            }
        }
        index
    }

    /// All elements in document order, root first
    pub fn elements(&self) -> Vec<(ElementPath, &SvgElement)> {
        let mut out = Vec::new();
        collect_elements(&self.root, &mut Vec::new(), &mut out);
        out
    }

    /// Apply `f` to every element in document order
    pub fn for_each_element_mut(&mut self, mut f: impl FnMut(&mut SvgElement)) {
        fn visit(element: &mut SvgElement, f: &mut impl FnMut(&mut SvgElement)) {
            f(element);
            for child in &mut element.children {
                if let SvgNode::Element(e) = child {
                    visit(e, f);
                }
            }
        }
        visit(&mut self.root, &mut f);
    }

    /// Serialize back to SVG markup
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        write_element(&self.root, &mut out);
        out
    }
}

fn collect_elements<'a>(
    element: &'a SvgElement,
    path: &mut ElementPath,
    out: &mut Vec<(ElementPath, &'a SvgElement)>,
) {
    out.push((path.clone(), element));
    for (index, child) in element.child_elements() {
        path.push(index);
        collect_elements(child, path, out);
        path.pop();
    }
}

fn qualify(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    let Some(uri) = namespace else {
        return local.to_string();
    };
    if uri == XML_NAMESPACE {
        return format!("xml:{}", local);
    }
    node.namespaces()
        .filter(|ns| ns.uri() == uri)
        .find_map(|ns| ns.name())
        .map(|prefix| format!("{}:{}", prefix, local))
        .unwrap_or_else(|| local.to_string())
}

fn build_element(node: roxmltree::Node<'_, '_>, parent: Option<roxmltree::Node<'_, '_>>) -> SvgElement {
    let tag = node.tag_name();
    let mut element = SvgElement::new(qualify(node, tag.namespace(), tag.name()));

    // Namespace declarations introduced at this element
    for ns in node.namespaces() {
        if ns.uri() == XML_NAMESPACE {
            continue;
        }
        let inherited = parent.is_some_and(|p| {
            p.namespaces()
                .any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri())
        });
        if inherited {
            continue;
        }
        let key = match ns.name() {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        element.attrs.push((key, ns.uri().to_string()));
    }

    for attr in node.attributes() {
        element.attrs.push((
            qualify(node, attr.namespace(), attr.name()),
            attr.value().to_string(),
        ));
    }

    for child in node.children() {
        if child.is_element() {
            element
                .children
                .push(SvgNode::Element(build_element(child, Some(node))));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.children.push(SvgNode::Text(text.to_string()));
            }
        }
    }
    element
}

pub(crate) fn escape_into(out: &mut String, value: &str, quote: bool) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quote => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn write_element(element: &SvgElement, out: &mut String) {
    let _ = write!(out, "<{}", element.name);
    for (key, value) in &element.attrs {
        let _ = write!(out, " {}=\"", key);
        escape_into(out, value, true);
        out.push('"');
    }
    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &element.children {
        match child {
            SvgNode::Element(e) => write_element(e, out),
            SvgNode::Text(t) => escape_into(out, t, false),
        }
    }
    let _ = write!(out, "</{}>", element.name);
}
