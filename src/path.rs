//! Conversion of path expressions and rectangles into obstacle vertices.
//!
//! Both conversions produce vertices in the winding order expected by the
//! `Room` consumer: path vertices are reversed after interpretation, and
//! rectangle corners are emitted in the matching order directly.

use std::convert::TryFrom;

use log::trace;

use crate::{Error, Vertex};

/// Origin offset and uniform scale applied to raw document coordinates.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Transform {
    pub origin_x: i64,
    pub origin_y: i64,
    pub scale: f64,
}

impl Transform {
    pub fn new(origin_x: i64, origin_y: i64, scale: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            scale,
        }
    }

    /// Normalize an absolute position.
    pub fn point(&self, x: i64, y: i64) -> Vertex {
        Vertex::new(
            (x as f64 - self.origin_x as f64) * self.scale,
            (y as f64 - self.origin_y as f64) * self.scale,
        )
    }

    /// Scale an extent or a relative offset. The origin is not subtracted.
    pub fn length(&self, value: i64) -> f64 {
        value as f64 * self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(0, 0, 1.0)
    }
}

/// An axis-aligned rectangle in raw document coordinates.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// A single command letter together with the argument text following it.
#[derive(Debug, PartialEq)]
struct Instruction<'a> {
    command: char,
    args: &'a str,
}

impl Instruction<'_> {
    /// Parse the argument text into exactly `N` integers.
    fn arguments<const N: usize>(&self) -> Result<[i64; N], Error> {
        let context = format!("path command '{}'", self.command);
        let values = split_arguments(self.args)
            .into_iter()
            .map(|token| parse_integer(token, &context))
            .collect::<Result<Vec<i64>, Error>>()?;
        let found = values.len();
        <[i64; N]>::try_from(values).map_err(|_| Error::ArgumentCount {
            command: self.command,
            expected: N,
            found,
        })
    }
}

/// Parse a decimal integer literal. Fractional values are rejected rather
/// than truncated.
pub(crate) fn parse_integer(value: &str, context: &str) -> Result<i64, Error> {
    value.trim().parse().map_err(|_| Error::InvalidNumber {
        value: value.to_string(),
        context: context.to_string(),
    })
}

/// Split a path expression at every ASCII letter. Text before the first
/// letter does not belong to any command and is dropped.
fn split_instructions(expr: &str) -> Vec<Instruction<'_>> {
    let mut instructions = Vec::new();
    let mut pending: Option<(char, usize)> = None;
    for (idx, c) in expr.char_indices() {
        if c.is_ascii_alphabetic() {
            if let Some((command, start)) = pending.take() {
                instructions.push(Instruction {
                    command,
                    args: &expr[start..idx],
                });
            }
            pending = Some((c, idx + 1));
        }
    }
    if let Some((command, start)) = pending {
        instructions.push(Instruction {
            command,
            args: &expr[start..],
        });
    }
    instructions
}

/// Split argument text into number tokens. Whitespace and commas separate
/// tokens, and a sign always starts a new one (`10-5` is `10`, `-5`).
fn split_arguments(args: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    for (idx, c) in args.char_indices() {
        match c {
            ',' => {
                if let Some(s) = start.take() {
                    tokens.push(&args[s..idx]);
                }
            }
            c if c.is_whitespace() => {
                if let Some(s) = start.take() {
                    tokens.push(&args[s..idx]);
                }
            }
            '+' | '-' => {
                if let Some(s) = start.take() {
                    tokens.push(&args[s..idx]);
                }
                start = Some(idx);
            }
            _ => {
                if start.is_none() {
                    start = Some(idx);
                }
            }
        }
    }
    if let Some(s) = start {
        tokens.push(&args[s..]);
    }
    tokens
}

/// Interpret a path expression as a closed polygon.
///
/// Every recognized command (`M`, `L`, `H`, `V`, absolute or relative)
/// contributes the resulting current position as a vertex. Unknown commands
/// are skipped along with their arguments. A trailing vertex equal to the
/// first one is dropped, and the result is returned in reverse order.
pub fn vertices_from_path(expr: &str, transform: &Transform) -> Result<Vec<Vertex>, Error> {
    trace!("vertices_from_path");
    let mut vertices = Vec::new();
    let mut current = Vertex::new(0.0, 0.0);

    for instruction in split_instructions(expr) {
        match instruction.command {
            'M' | 'L' => {
                let [x, y] = instruction.arguments::<2>()?;
                current = transform.point(x, y);
            }
            'm' | 'l' => {
                let [dx, dy] = instruction.arguments::<2>()?;
                current = Vertex::new(
                    current.x + transform.length(dx),
                    current.y + transform.length(dy),
                );
            }
            'H' => {
                let [x] = instruction.arguments::<1>()?;
                current.x = transform.point(x, 0).x;
            }
            'h' => {
                let [dx] = instruction.arguments::<1>()?;
                current.x += transform.length(dx);
            }
            'V' => {
                let [y] = instruction.arguments::<1>()?;
                current.y = transform.point(0, y).y;
            }
            'v' => {
                let [dy] = instruction.arguments::<1>()?;
                current.y += transform.length(dy);
            }
            other => {
                trace!("vertices_from_path: Skipping unsupported command '{}'", other);
                continue;
            }
        }
        vertices.push(current);
    }

    if vertices.is_empty() {
        return Err(Error::EmptyPath(expr.to_string()));
    }
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        trace!("vertices_from_path: Dropping explicit closing vertex");
        vertices.pop();
    }
    vertices.reverse();

    trace!("vertices_from_path: Return {} vertices", vertices.len());
    Ok(vertices)
}

/// Return the four corners of a rectangle: top-left, bottom-left,
/// bottom-right, top-right.
pub fn vertices_from_rect(rect: &Rect, transform: &Transform) -> Vec<Vertex> {
    let top_left = transform.point(rect.x, rect.y);
    let width = transform.length(rect.width);
    let height = transform.length(rect.height);
    vec![
        top_left,
        Vertex::new(top_left.x, top_left.y + height),
        Vertex::new(top_left.x + width, top_left.y + height),
        Vertex::new(top_left.x + width, top_left.y),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertices(list: &[(f64, f64)]) -> Vec<Vertex> {
        list.iter().map(|&pair| pair.into()).collect()
    }

    #[test]
    fn test_split_instructions() {
        let result = split_instructions("M10,20h5 V-3z");
        assert_eq!(
            result,
            vec![
                Instruction {
                    command: 'M',
                    args: "10,20",
                },
                Instruction {
                    command: 'h',
                    args: "5 ",
                },
                Instruction {
                    command: 'V',
                    args: "-3",
                },
                Instruction {
                    command: 'z',
                    args: "",
                },
            ]
        );
    }

    #[test]
    fn test_split_instructions_leading_text() {
        let result = split_instructions("  12 M 1 2");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].command, 'M');
        assert_eq!(result[0].args, " 1 2");
    }

    #[test]
    fn test_split_arguments() {
        assert_eq!(split_arguments(" 10, 20 "), vec!["10", "20"]);
        assert_eq!(split_arguments("10-5"), vec!["10", "-5"]);
        assert_eq!(split_arguments("-10-5+3"), vec!["-10", "-5", "+3"]);
        assert_eq!(split_arguments(",, \t"), Vec::<&str>::new());
        assert_eq!(split_arguments("1.5,2"), vec!["1.5", "2"]);
    }

    #[test]
    fn test_absolute_lines() {
        let _ = env_logger::try_init();
        let result = vertices_from_path("M 1 2 L 3 4 L 5 6 L 7 8", &Transform::default()).unwrap();
        assert_eq!(
            result,
            vertices(&[(7., 8.), (5., 6.), (3., 4.), (1., 2.)])
        );
    }

    #[test]
    fn test_absolute_lines_transformed() {
        let transform = Transform::new(10, 20, 0.5);
        let result = vertices_from_path("M 10 20 L 30 20 L 30 40", &transform).unwrap();
        assert_eq!(result, vertices(&[(10., 10.), (10., 0.), (0., 0.)]));
    }

    #[test]
    fn test_relative_lines() {
        let _ = env_logger::try_init();
        let result = vertices_from_path("M 0 0 l 10 0 l 0 10", &Transform::default()).unwrap();
        assert_eq!(result, vertices(&[(10., 10.), (10., 0.), (0., 0.)]));
    }

    #[test]
    fn test_relative_offsets_are_scaled_only() {
        let transform = Transform::new(100, 100, 2.0);
        let result = vertices_from_path("M 100 100 l 5 0 v 3 h -5", &transform).unwrap();
        assert_eq!(
            result,
            vertices(&[(0., 6.), (10., 6.), (10., 0.), (0., 0.)])
        );
    }

    #[test]
    fn test_relative_move_starts_at_zero() {
        let transform = Transform::new(50, 50, 1.0);
        let result = vertices_from_path("m 5 5 h 10", &transform).unwrap();
        assert_eq!(result, vertices(&[(15., 5.), (5., 5.)]));
    }

    #[test]
    fn test_horizontal_vertical_absolute() {
        let transform = Transform::new(1, 1, 1.0);
        let result = vertices_from_path("M 2 2 H 5 V 7 H 2", &transform).unwrap();
        assert_eq!(
            result,
            vertices(&[(1., 6.), (4., 6.), (4., 1.), (1., 1.)])
        );
    }

    #[test]
    fn test_closing_vertex_dropped() {
        let result = vertices_from_path("M0,0 H10 V10 H0 V0", &Transform::default()).unwrap();
        assert_eq!(result.len(), 4);
        assert_eq!(
            result,
            vertices(&[(0., 10.), (10., 10.), (10., 0.), (0., 0.)])
        );
    }

    #[test]
    fn test_close_command_ignored() {
        let result = vertices_from_path("M0,0 H10 V10 Z", &Transform::default()).unwrap();
        assert_eq!(result, vertices(&[(10., 10.), (10., 0.), (0., 0.)]));
    }

    #[test]
    fn test_unknown_commands_skipped() {
        let result = vertices_from_path(
            "M 0 0 A 5.5 5.5 0 0 1 10 10 L 10 0",
            &Transform::default(),
        )
        .unwrap();
        assert_eq!(result, vertices(&[(10., 0.), (0., 0.)]));
    }

    #[test]
    fn test_single_vertex_kept() {
        let result = vertices_from_path("M 3 4", &Transform::default()).unwrap();
        assert_eq!(result, vertices(&[(3., 4.)]));

        // Two commands ending where they started lose the closing vertex.
        let result = vertices_from_path("M 3 4 L 3 4", &Transform::default()).unwrap();
        assert_eq!(result, vertices(&[(3., 4.)]));
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let transform = Transform::new(-1, i64::MAX, 1.0);
        let result = vertices_from_path(
            "M 9223372036854775807 -9223372036854775808 L 1 1",
            &transform,
        )
        .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].x, 9_223_372_036_854_775_808.0);
        assert_eq!(result[1].y, -18_446_744_073_709_551_616.0);
        assert!(result.iter().all(|v| v.x.is_finite() && v.y.is_finite()));
    }

    #[test]
    fn test_empty_path() {
        for expr in &["", "   ", "Z", "C 1 2 3 4 5 6"] {
            match vertices_from_path(expr, &Transform::default()) {
                Err(Error::EmptyPath(e)) => assert_eq!(&e, expr),
                other => panic!("Unexpected result for {:?}: {:?}", expr, other),
            }
        }
    }

    #[test]
    fn test_fractional_coordinate_rejected() {
        let result = vertices_from_path("M 1.5 2 L 3 4", &Transform::default());
        match result {
            Err(Error::InvalidNumber { value, .. }) => assert_eq!(value, "1.5"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_argument_count_mismatch() {
        let result = vertices_from_path("M 1", &Transform::default());
        match result {
            Err(Error::ArgumentCount {
                command,
                expected,
                found,
            }) => {
                assert_eq!(command, 'M');
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("Unexpected result: {:?}", other),
        }

        let result = vertices_from_path("M 1 2 h 3 4", &Transform::default());
        assert!(matches!(
            result,
            Err(Error::ArgumentCount {
                command: 'h',
                expected: 1,
                found: 2,
            })
        ));
    }

    #[test]
    fn test_rect() {
        let rect = Rect {
            x: 5,
            y: 5,
            width: 10,
            height: 20,
        };
        assert_eq!(
            vertices_from_rect(&rect, &Transform::default()),
            vertices(&[(5., 5.), (5., 25.), (15., 25.), (15., 5.)])
        );
    }

    #[test]
    fn test_rect_scaled() {
        let rect = Rect {
            x: 0,
            y: 0,
            width: 3,
            height: 4,
        };
        assert_eq!(
            vertices_from_rect(&rect, &Transform::new(0, 0, 2.0)),
            vertices(&[(0., 0.), (0., 8.), (6., 8.), (6., 0.)])
        );
    }

    #[test]
    fn test_rect_origin_not_applied_to_extent() {
        let rect = Rect {
            x: 15,
            y: 30,
            width: 10,
            height: 10,
        };
        assert_eq!(
            vertices_from_rect(&rect, &Transform::new(10, 20, 1.0)),
            vertices(&[(5., 10.), (5., 20.), (15., 20.), (15., 10.)])
        );
    }

    #[test]
    fn test_rect_matches_path_winding() {
        let transform = Transform::new(0, 0, 1.0);
        let rect = Rect {
            x: 10,
            y: 10,
            width: 20,
            height: 30,
        };
        let path = vertices_from_path("M 10 10 H 30 V 40 H 10 Z", &transform).unwrap();
        assert_eq!(path.len(), 4);
        let from_rect = vertices_from_rect(&rect, &transform);
        // Same cycle, rotated by one position.
        assert_eq!(path[3], from_rect[0]);
        assert_eq!(path[0], from_rect[1]);
        assert_eq!(path[1], from_rect[2]);
        assert_eq!(path[2], from_rect[3]);
    }
}
