//! Extraction of the obstacle layer from an SVG document and serialization
//! of the resulting room as a JavaScript statement.

use std::fs;
use std::path::Path;
use std::str;

use log::{debug, trace};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::path::{self, parse_integer, Rect, Transform};
use crate::{Error, Vertex};

/// The `id` of the group whose direct children are the obstacles.
pub const OBSTACLE_GROUP_ID: &str = "Obstacles";

/// The declared coordinate rectangle of the document.
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ViewBox {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl str::FromStr for ViewBox {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(str::parse::<i64>)
            .collect::<Result<Vec<i64>, _>>()
            .map_err(|_| Error::InvalidViewBox(s.to_string()))?;
        match values.as_slice() {
            &[x, y, width, height] => Ok(Self {
                x,
                y,
                width,
                height,
            }),
            _ => Err(Error::InvalidViewBox(s.to_string())),
        }
    }
}

/// A closed polygon, without a repeated closing vertex.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Obstacle {
    pub vertices: Vec<Vertex>,
}

/// The canvas size (after scaling) and its obstacles in document order.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Room {
    pub width: f64,
    pub height: f64,
    pub obstacles: Vec<Obstacle>,
}

impl Room {
    /// Render the statement that registers this room in `availableRooms`.
    pub fn to_js(&self) -> String {
        let vertex_count: usize = self.obstacles.iter().map(|o| o.vertices.len()).sum();
        let mut out = String::with_capacity(128 + self.obstacles.len() * 24 + vertex_count * 28);

        out.push_str("if (typeof availableRooms === \"undefined\") availableRooms = [];\n");
        out.push_str(&format!(
            "availableRooms.push(new Room({}, {}, [\n",
            self.width, self.height
        ));
        for obstacle in &self.obstacles {
            out.push_str("    new Obstacle([");
            let vectors: Vec<String> = obstacle
                .vertices
                .iter()
                .map(|v| format!("new Vector({}, {})", v.x, v.y))
                .collect();
            out.push_str(&vectors.join(", "));
            out.push_str("]),\n");
        }
        out.push_str("]));\n");
        out
    }
}

/// A shape found directly inside the obstacle group, still in raw document
/// coordinates.
#[derive(Debug, PartialEq)]
enum Shape {
    Path(String),
    Rect(Rect),
}

/// The parts of the document needed to build a room.
#[derive(Debug, PartialEq)]
struct Document {
    view_box: ViewBox,
    shapes: Vec<Shape>,
}

/// Return the unescaped value of the first attribute called `name`.
/// Malformed attributes and unknown escapes are parse errors.
fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>, Error> {
    for attr in e.attributes() {
        let attr: Attribute = attr.map_err(|err| Error::SvgParse(err.to_string()))?;
        if attr.key == name {
            let value = attr.unescaped_value()?;
            return str::from_utf8(&value)
                .map(|v| Some(v.to_string()))
                .map_err(|err| Error::SvgParse(err.to_string()));
        }
    }
    Ok(None)
}

fn is_obstacle_group(e: &BytesStart) -> Result<bool, Error> {
    if e.name() != b"g" {
        return Ok(false);
    }
    Ok(attribute(e, b"id")?.as_deref() == Some(OBSTACLE_GROUP_ID))
}

fn rect_attribute(e: &BytesStart, name: &str, default: Option<i64>) -> Result<i64, Error> {
    match (attribute(e, name.as_bytes())?, default) {
        (Some(value), _) => parse_integer(&value, &format!("rect attribute '{}'", name)),
        (None, Some(default)) => Ok(default),
        (None, None) => Err(Error::Structure(format!(
            "<rect> without '{}' attribute",
            name
        ))),
    }
}

/// Convert an element found directly inside the obstacle group. Elements
/// that are neither `<path>` nor `<rect>` yield `None`.
fn parse_shape(e: &BytesStart) -> Result<Option<Shape>, Error> {
    match e.name() {
        b"path" => {
            trace!("parse_shape: Found path");
            let d = attribute(e, b"d")?
                .ok_or_else(|| Error::Structure("<path> without 'd' attribute".into()))?;
            Ok(Some(Shape::Path(d)))
        }
        b"rect" => {
            trace!("parse_shape: Found rect");
            Ok(Some(Shape::Rect(Rect {
                x: rect_attribute(e, "x", Some(0))?,
                y: rect_attribute(e, "y", Some(0))?,
                width: rect_attribute(e, "width", None)?,
                height: rect_attribute(e, "height", None)?,
            })))
        }
        other => {
            trace!(
                "parse_shape: Skipping <{}>",
                String::from_utf8_lossy(other)
            );
            Ok(None)
        }
    }
}

/// Collects the document parts while the XML events stream by.
#[derive(Debug, Default)]
struct DocumentBuilder {
    view_box: Option<ViewBox>,
    group_found: bool,
    shapes: Vec<Shape>,
}

impl DocumentBuilder {
    /// Process an opening or empty element. `open` holds one entry per
    /// enclosing element, `true` for obstacle groups. Return whether the
    /// element itself is an obstacle group.
    fn element(&mut self, e: &BytesStart, open: &[bool]) -> Result<bool, Error> {
        if open.is_empty() && e.name() == b"svg" {
            let value = attribute(e, b"viewBox")?
                .ok_or_else(|| Error::Structure("<svg> without viewBox attribute".into()))?;
            self.view_box = Some(value.parse()?);
        }
        if open.last() == Some(&true) {
            if let Some(shape) = parse_shape(e)? {
                self.shapes.push(shape);
            }
        }
        let group = is_obstacle_group(e)?;
        if group {
            debug!("Found obstacle group");
            self.group_found = true;
        }
        Ok(group)
    }

    fn finish(self) -> Result<Document, Error> {
        let view_box = self
            .view_box
            .ok_or_else(|| Error::Structure("no root <svg> element".into()))?;
        if !self.group_found {
            return Err(Error::Structure(format!(
                "no <g id=\"{}\"> group",
                OBSTACLE_GROUP_ID
            )));
        }
        Ok(Document {
            view_box,
            shapes: self.shapes,
        })
    }
}

/// Parse an SVG string, return the viewBox and the obstacle shapes.
fn parse_xml(svg: &str) -> Result<Document, Error> {
    trace!("parse_xml");

    let mut reader = quick_xml::Reader::from_str(svg);
    reader.trim_text(true);

    let mut builder = DocumentBuilder::default();
    let mut open: Vec<bool> = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event(&mut buf) {
            Ok(Event::Start(ref e)) => {
                trace!("parse_xml: Matched start of {:?}", e.name());
                let group = builder.element(e, &open)?;
                open.push(group);
            }
            Ok(Event::Empty(ref e)) => {
                trace!("parse_xml: Matched empty {:?}", e.name());
                builder.element(e, &open)?;
            }
            Ok(Event::End(_)) => {
                open.pop();
            }
            Ok(Event::Eof) => {
                trace!("parse_xml: EOF");
                break;
            }
            Ok(_) => {}
            Err(e) => return Err(e.into()),
        }

        // Events borrow from `buf`, so it is only reused once they are handled
        buf.clear();
    }

    let document = builder.finish()?;
    trace!("parse_xml: Return {} shapes", document.shapes.len());
    Ok(document)
}

/// Parse an SVG string into a room, scaling all coordinates by `scale`.
pub fn parse(svg: &str, scale: f64) -> Result<Room, Error> {
    trace!("parse");

    let Document { view_box, shapes } = parse_xml(svg)?;
    let transform = Transform::new(view_box.x, view_box.y, scale);

    let obstacles = shapes
        .iter()
        .map(|shape| {
            let vertices = match shape {
                Shape::Path(expr) => path::vertices_from_path(expr, &transform)?,
                Shape::Rect(rect) => path::vertices_from_rect(rect, &transform),
            };
            Ok(Obstacle { vertices })
        })
        .collect::<Result<Vec<Obstacle>, Error>>()?;

    debug!(
        "parse: {}x{} room with {} obstacles",
        view_box.width,
        view_box.height,
        obstacles.len()
    );
    Ok(Room {
        width: transform.length(view_box.width),
        height: transform.length(view_box.height),
        obstacles,
    })
}

/// Convert the SVG file at `input` and write the room statement to `output`.
///
/// The statement is rendered completely before the output file is touched,
/// so a failing conversion leaves any existing output unchanged.
pub fn make_room(input: &Path, output: &Path, scale: f64) -> Result<Room, Error> {
    let svg = fs::read_to_string(input).map_err(|source| Error::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let room = parse(&svg, scale)?;
    fs::write(output, room.to_js()).map_err(|source| Error::Write {
        path: output.to_path_buf(),
        source,
    })?;
    Ok(room)
}
