//! Fact-list scenario format
//!
//! One fact per line, each terminated by a period:
//!
//! ```text
//! width(0.2).
//! height(1.0).
//! push(domino(5.0)).
//! domino(5.0).
//! domino(5.7).
//! ball_x(6.4).
//! ```
//!
//! Lines starting with `%` are comments. A trailing `success.` fact (written
//! by runs that tipped the beam) is accepted and ignored.

use std::fmt::Write;

use super::layout::SceneLayout;
use crate::error::{Error, Result};

/// Parse a fact list into a layout
///
/// Dominoes are sorted by x. The leftmost domino is the one pushed, so a
/// `push(domino(X))` fact naming any other domino is rejected.
pub fn parse_facts(text: &str, hole_size: f32) -> Result<SceneLayout> {
    let mut width = None;
    let mut height = None;
    let mut push = None;
    let mut push_line = 0;
    let mut ball_x = None;
    let mut xs = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }
        let fact = line
            .strip_suffix('.')
            .ok_or_else(|| parse_error(line_no, "missing terminating '.'"))?
            .trim();

        if fact == "success" {
            continue;
        }
        let (name, arg) = split_fact(fact).ok_or_else(|| parse_error(line_no, "malformed fact"))?;
        match name {
            "width" => set_once(&mut width, number(arg, line_no)?, "width", line_no)?,
            "height" => set_once(&mut height, number(arg, line_no)?, "height", line_no)?,
            "ball_x" => set_once(&mut ball_x, number(arg, line_no)?, "ball_x", line_no)?,
            "domino" => xs.push(number(arg, line_no)?),
            "push" => {
                let (_, x) = split_fact(arg)
                    .filter(|(inner, _)| *inner == "domino")
                    .ok_or_else(|| parse_error(line_no, "expected push(domino(X))"))?;
                set_once(&mut push, number(x, line_no)?, "push", line_no)?;
                push_line = line_no;
            }
            other => return Err(parse_error(line_no, &format!("unknown fact '{other}'"))),
        }
    }

    let missing = |what: &str| Error::Parse {
        line: 0,
        message: format!("missing {what} fact"),
    };
    let domino_width = width.ok_or_else(|| missing("width"))?;
    let domino_height = height.ok_or_else(|| missing("height"))?;
    let ball_x = ball_x.ok_or_else(|| missing("ball_x"))?;

    xs.sort_by(f32::total_cmp);
    if let Some(px) = push {
        match xs.first() {
            Some(&first) if first == px => {}
            Some(_) if xs.contains(&px) => {
                return Err(parse_error(push_line, "only the leftmost domino can be pushed"));
            }
            _ => {
                return Err(parse_error(
                    push_line,
                    &format!("pushed domino at {px} is not a domino"),
                ));
            }
        }
    }

    let layout = SceneLayout {
        domino_width,
        domino_height,
        domino_xs: xs,
        ball_x,
        hole_size,
    };
    layout.validate()?;
    Ok(layout)
}

/// Render a layout as a fact list (one fact per line, trailing newline)
pub fn render_facts(layout: &SceneLayout) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "width({}).", layout.domino_width);
    let _ = writeln!(out, "height({}).", layout.domino_height);
    for (i, x) in layout.domino_xs.iter().enumerate() {
        if i == 0 {
            let _ = writeln!(out, "push(domino({x})).");
        }
        let _ = writeln!(out, "domino({x}).");
    }
    let _ = writeln!(out, "ball_x({}).", layout.ball_x);
    out
}

/// Split `name(arg)` into `("name", "arg")`
fn split_fact(fact: &str) -> Option<(&str, &str)> {
    let open = fact.find('(')?;
    let inner = fact[open + 1..].strip_suffix(')')?;
    let name = fact[..open].trim();
    if name.is_empty() {
        return None;
    }
    Some((name, inner.trim()))
}

fn number(arg: &str, line: usize) -> Result<f32> {
    arg.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| parse_error(line, &format!("'{arg}' is not a number")))
}

fn set_once(slot: &mut Option<f32>, value: f32, what: &str, line: usize) -> Result<()> {
    if slot.replace(value).is_some() {
        return Err(parse_error(line, &format!("duplicate {what} fact")));
    }
    Ok(())
}

fn parse_error(line: usize, message: &str) -> Error {
    Error::Parse {
        line,
        message: message.to_string(),
    }
}
