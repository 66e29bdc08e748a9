//!
//! Completeness check for the captured slots.
//!

use crate::input_token::{InputKind, InputToken, Step};

/// Checks if the captures of a scan fill the mask.
///
/// Built once per compiled mask.
#[derive(Debug, Clone)]
pub struct Validator {
    tokens: Vec<InputToken>,
}

impl Validator {
    pub fn new(tokens: &[InputToken]) -> Self {
        Self {
            tokens: tokens.to_vec(),
        }
    }

    /// All slots are complete.
    pub fn is_complete(&self, captures: &[String]) -> bool {
        self.tokens
            .iter()
            .enumerate()
            .all(|(i, token)| slot_complete(token, captures.get(i).map(|v| v.as_str())))
    }

    /// Indices of all incomplete slots.
    pub fn incomplete_slots(&self, captures: &[String]) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(i, token)| !slot_complete(token, captures.get(*i).map(|v| v.as_str())))
            .map(|(i, _)| i)
            .collect()
    }

    /// Check a single slot.
    pub fn is_slot_complete(&self, slot: usize, capture: &str) -> bool {
        match self.tokens.get(slot) {
            Some(token) => slot_complete(token, Some(capture)),
            None => false,
        }
    }
}

fn slot_complete(token: &InputToken, capture: Option<&str>) -> bool {
    if token.is_literal() {
        return true;
    }
    let capture = capture.unwrap_or_default();
    if capture.is_empty() {
        return token.optional;
    }
    let chars = capture.chars().collect::<Vec<_>>();
    if chars.len() > token.max_width as usize {
        return false;
    }
    if !token.paths.iter().any(|path| path_accepts(path, &chars)) {
        return false;
    }
    in_range(token, capture)
}

/// The chars match all of the path, or the part before a forcible marker.
fn path_accepts(path: &[Step], chars: &[char]) -> bool {
    let mut n = 0;
    for step in path {
        match step {
            Step::Forcible => {
                if n == chars.len() {
                    return true;
                }
            }
            Step::Char(test) => {
                let Some(c) = chars.get(n) else {
                    return false;
                };
                if !test.test(*c) {
                    return false;
                }
                n += 1;
            }
        }
    }
    n == chars.len()
}

fn in_range(token: &InputToken, capture: &str) -> bool {
    let InputKind::Slot(kind) = &token.kind else {
        return true;
    };
    let Some((min, max)) = kind.value_range() else {
        return true;
    };
    match capture.parse::<u32>() {
        Ok(v) => min <= v && v <= max,
        Err(_) => false,
    }
}
