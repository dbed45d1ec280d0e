//! Typed drawing primitives
//!
//! Charts are built as a flat list of [`Element`]s and only turned into SVG
//! text at the very end (see [`crate::svg`]). Geometry can therefore be
//! inspected in tests without parsing markup.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pt {
    pub x: f64,
    pub y: f64,
}

impl Pt {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Pt),
    LineTo(Pt),
    Close,
}

/// An outline made of straight segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    pub commands: Vec<PathCommand>,
}

impl PathData {
    /// Closed area under `points`, dropped to `baseline` at the last and
    /// first x.
    pub fn area_under(points: &[Pt], baseline: f64) -> Self {
        let mut commands = Vec::with_capacity(points.len() + 3);
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Self { commands };
        };
        commands.push(PathCommand::MoveTo(*first));
        commands.extend(points[1..].iter().map(|p| PathCommand::LineTo(*p)));
        commands.push(PathCommand::LineTo(Pt::new(last.x, baseline)));
        commands.push(PathCommand::LineTo(Pt::new(first.x, baseline)));
        commands.push(PathCommand::Close);
        Self { commands }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// A text run. `content` is raw text; escaping happens on serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub font_size: Option<u32>,
    pub font_weight: Option<u32>,
    pub fill: Option<String>,
    pub opacity: Option<f64>,
    pub anchor: Option<TextAnchor>,
    /// Rotation in degrees about the text origin.
    pub rotate: Option<f64>,
}

impl Text {
    pub fn new(x: f64, y: f64, content: impl Into<String>) -> Self {
        Self {
            x,
            y,
            content: content.into(),
            font_size: None,
            font_weight: None,
            fill: None,
            opacity: None,
            anchor: None,
            rotate: None,
        }
    }

    pub fn size(mut self, size: u32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn weight(mut self, weight: u32) -> Self {
        self.font_weight = Some(weight);
        self
    }

    pub fn fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Line {
        from: Pt,
        to: Pt,
        stroke: String,
        width: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
        clip: Option<String>,
    },
    Text(Text),
    Polyline {
        points: Vec<Pt>,
        stroke: String,
        width: f64,
    },
    /// Clip region definition, referenced by id from other elements.
    ClipPath {
        id: String,
        path: PathData,
    },
    Group(Vec<Element>),
}

impl Element {
    pub fn line(from: Pt, to: Pt, stroke: &str, width: f64) -> Self {
        Element::Line { from, to, stroke: stroke.to_string(), width }
    }

    /// Depth-first walk over this element and any grouped children.
    pub fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Element)) {
        f(self);
        if let Element::Group(children) = self {
            for child in children {
                child.visit(f);
            }
        }
    }
}

/// A complete day image before serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub width: f64,
    pub height: f64,
    pub aria_label: String,
    pub font_family: String,
    pub font_size: u32,
    pub text_fill: String,
    pub elements: Vec<Element>,
}

impl Document {
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// All elements in draw order, with groups flattened.
    pub fn flatten(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        for element in &self.elements {
            element.visit(&mut |e| {
                if !matches!(e, Element::Group(_)) {
                    out.push(e);
                }
            });
        }
        out
    }
}
