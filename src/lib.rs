//! Convert the obstacle layer of an SVG floor plan into a JavaScript `Room`
//! literal.
//!
//! The document's `viewBox` defines the canvas. Every `<path>` and `<rect>`
//! directly inside the `<g id="Obstacles">` group becomes one obstacle
//! polygon, with coordinates shifted by the viewBox origin and multiplied by
//! an optional scale factor.
//!
//! Only straight path segments are understood (`M`, `L`, `H`, `V` and their
//! relative forms). Other commands are skipped.
//!
//! You can optionally get serde 1 support by enabling the `serde` feature.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

use std::convert;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod args;
mod error;
pub mod path;
pub mod room;

pub use crate::error::Error;
pub use crate::room::{make_room, parse, Obstacle, Room, ViewBox};

/// A `Vertex` consists of a normalized x and y coordinate.
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl convert::From<(f64, f64)> for Vertex {
    fn from(val: (f64, f64)) -> Self {
        Self { x: val.0, y: val.1 }
    }
}
