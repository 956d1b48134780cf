use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref OPERATOR_LINE: Regex =
        Regex::new(r"^(-?[0-9.]+)\s+(-?[0-9.]+)\s+(moveto|rlineto|scale)$").unwrap();
    static ref DIGITS: Regex = Regex::new(r"\d+").unwrap();
}

const BOUNDING_BOX_MARKER: &str = "%%BoundingBox";

/// Page size declared by the bounding-box header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageBox {
    pub width: u32,
    pub height: u32,
}

/// One recognised instruction. Operands are raw, before any scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    MoveTo(f64, f64),
    RLineTo(f64, f64),
    Scale(f64, f64),
    ClosePath,
    Fill,
    BoundingBox(PageBox),
}

impl Command {
    /// Recognise a single line. Anything that does not match exactly is `None`.
    #[must_use]
    pub fn recognise(line: &str) -> Option<Self> {
        if let Some(caps) = OPERATOR_LINE.captures(line) {
            let x: f64 = caps[1].parse().ok()?;
            let y: f64 = caps[2].parse().ok()?;
            return Some(match &caps[3] {
                "moveto" => Command::MoveTo(x, y),
                "rlineto" => Command::RLineTo(x, y),
                _ => Command::Scale(x, y),
            });
        }

        match line {
            "closepath" => Some(Command::ClosePath),
            "fill" => Some(Command::Fill),
            _ if line.starts_with(BOUNDING_BOX_MARKER) => parse_bounding_box(line),
            _ => None,
        }
    }
}

/// `%%BoundingBox: llx lly urx ury`; the third and fourth numbers give the page size.
fn parse_bounding_box(line: &str) -> Option<Command> {
    let fields: Vec<u32> = DIGITS
        .find_iter(line)
        .map(|m| m.as_str().parse())
        .collect::<Result<_, _>>()
        .ok()?;
    if fields.len() < 4 {
        return None;
    }
    Some(Command::BoundingBox(PageBox {
        width: fields[2],
        height: fields[3],
    }))
}
