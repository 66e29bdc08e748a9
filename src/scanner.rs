//!
//! Runs a text through the lexicon.
//!

use crate::MaskError;
use crate::lexicon::{Lexicon, StateId};
use crate::upos_type;
use log::debug;
use rustc_hash::FxHashMap;

/// Result of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Captured text per slot.
    pub captured: Vec<String>,
    /// State after the last char.
    pub state: StateId,
    /// Index of the last slot that has been passed.
    pub last_complete: Option<usize>,
}

impl ScanResult {
    /// Slot that takes the next char.
    ///
    /// Equals the slot count if the scan reached the end state.
    #[inline]
    pub fn pending_slot(&self, lexicon: &Lexicon) -> usize {
        lexicon.state(self.state).key.position
    }

    /// Number of chars captured.
    pub fn char_count(&self) -> usize {
        self.captured.iter().map(|v| v.chars().count()).sum()
    }

    /// Concatenated captures.
    pub fn text(&self) -> String {
        self.captured.concat()
    }
}

/// Best way to read the rest of the text from a state.
#[derive(Debug, Clone, Copy)]
struct Choice {
    /// The text ends in a state that is not accepting.
    incomplete: bool,
    /// Input slots passed over after the first char.
    skipped: usize,
    /// Edge taken, None at the end of the text.
    edge: Option<usize>,
}

impl Choice {
    #[inline]
    fn rank(&self) -> (bool, usize) {
        (self.incomplete, self.skipped)
    }
}

#[derive(Debug)]
struct Search<'a> {
    lexicon: &'a Lexicon,
    chars: Vec<char>,
    memo: FxHashMap<(StateId, usize), Option<Choice>>,
    /// Furthest char that no edge accepts.
    fail: Option<(usize, StateId)>,
}

impl Search<'_> {
    fn best(&mut self, id: StateId, pos: usize) -> Option<Choice> {
        if let Some(choice) = self.memo.get(&(id, pos)) {
            return *choice;
        }

        let lexicon = self.lexicon;
        let state = lexicon.state(id);
        let res = if let Some(c) = self.chars.get(pos).copied() {
            let mut best: Option<Choice> = None;
            let mut matched = false;
            for (i, edge, _) in lexicon.matching(id, c) {
                matched = true;
                let Some(next) = self.best(edge.target, pos + 1) else {
                    continue;
                };
                // leading empty slots are fine.
                let skipped = if pos > 0 {
                    lexicon.skipped(id, edge)
                } else {
                    0
                };
                let choice = Choice {
                    incomplete: next.incomplete,
                    skipped: next.skipped + skipped,
                    edge: Some(i),
                };
                if best.is_none_or(|v| choice.rank() < v.rank()) {
                    best = Some(choice);
                }
            }
            if !matched && self.fail.is_none_or(|(p, _)| pos > p) {
                self.fail = Some((pos, id));
            }
            best
        } else {
            Some(Choice {
                incomplete: !state.accepting,
                skipped: 0,
                edge: None,
            })
        };

        self.memo.insert((id, pos), res);
        res
    }
}

/// Run the text through the automaton.
///
/// If the text can be read in more than one way, a reading that
/// completes the mask wins. Next come readings that leave fewer
/// empty slots between the chars. Last the order of the edges
/// decides, which fills the slots from the left.
///
/// Fails with [MaskError::InvalidInputCharacter] at the furthest
/// char no reading can take.
pub fn scan(lexicon: &Lexicon, text: &str) -> Result<ScanResult, MaskError> {
    let mut search = Search {
        lexicon,
        chars: text.chars().collect(),
        memo: FxHashMap::default(),
        fail: None,
    };

    if search.best(lexicon.begin(), 0).is_none() {
        let (pos, state) = search.fail.unwrap_or((0, lexicon.begin()));
        let ch = search.chars.get(pos).copied().unwrap_or_default();
        debug!(
            "rejected {:?} at {} in {:?}, state {:?}",
            ch,
            pos,
            text,
            lexicon.state(state).key
        );
        return Err(MaskError::InvalidInputCharacter {
            pos: pos as upos_type,
            ch,
        });
    }

    let mut captured = vec![String::new(); lexicon.slot_count()];
    let mut state = lexicon.begin();
    for (pos, c) in search.chars.iter().enumerate() {
        let Some(Some(Choice { edge: Some(i), .. })) = search.memo.get(&(state, pos)) else {
            break;
        };
        let edge = &lexicon.state(state).edges[*i];
        captured[edge.slot].push(lexicon.tokens()[edge.slot].map_case(*c));
        state = edge.target;
    }

    let position = lexicon.state(state).key.position;
    let last_complete = if position > 0 {
        Some(position - 1)
    } else {
        None
    };

    Ok(ScanResult {
        captured,
        state,
        last_complete,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_token::build_input_tokens;
    use crate::tokenizer::compile;
    use format_num_pattern::{CurrencySym, NumberSymbols};

    fn lexicon(pattern: &str) -> Lexicon {
        let sym = NumberSymbols {
            decimal_sep: '.',
            decimal_grp: Some(','),
            negative_sym: '-',
            positive_sym: ' ',
            exponent_upper_sym: 'E',
            exponent_lower_sym: 'e',
            currency_sym: CurrencySym::new("$"),
        };
        let mask = compile(pattern).expect("mask");
        let (tokens, _) = build_input_tokens(&mask.tokens, '_', &sym);
        Lexicon::build(tokens)
    }

    #[test]
    fn test_date() {
        let lex = lexicon("m/d/y");
        let r = scan(&lex, "1225").expect("scan");
        assert_eq!(r.captured, vec!["12", "", "25", "", ""]);
        assert_eq!(r.pending_slot(&lex), 3);
        assert_eq!(r.last_complete, Some(2));

        // literals are optional
        let r = scan(&lex, "13").expect("scan");
        assert_eq!(r.captured, vec!["1", "", "3", "", ""]);

        let r = scan(&lex, "1/5/99").expect("scan");
        assert_eq!(r.captured, vec!["1", "/", "5", "/", "99"]);
        assert_eq!(r.state, lex.end());

        // forcible month, pending
        let r = scan(&lex, "1").expect("scan");
        assert_eq!(r.captured[0], "1");
        assert_eq!(r.pending_slot(&lex), 0);
        assert_eq!(r.last_complete, None);
    }

    #[test]
    fn test_reject() {
        let lex = lexicon("m/d/y");
        assert_eq!(
            scan(&lex, "00"),
            Err(MaskError::InvalidInputCharacter { pos: 1, ch: '0' })
        );
        assert_eq!(
            scan(&lex, "12/25/991"),
            Err(MaskError::InvalidInputCharacter { pos: 8, ch: '1' })
        );
        assert_eq!(
            scan(&lex, "x"),
            Err(MaskError::InvalidInputCharacter { pos: 0, ch: 'x' })
        );
    }

    #[test]
    fn test_optional() {
        // the required digit is filled first.
        let lex = lexicon("##0");
        let r = scan(&lex, "5").expect("scan");
        assert_eq!(r.captured, vec!["", "", "5"]);
        assert_eq!(r.state, lex.end());
        let r = scan(&lex, "12").expect("scan");
        assert_eq!(r.captured, vec!["", "1", "2"]);
        let r = scan(&lex, "123").expect("scan");
        assert_eq!(r.captured, vec!["1", "2", "3"]);
        assert!(scan(&lex, "1234").is_err());

        let lex = lexicon("+0");
        let r = scan(&lex, "7").expect("scan");
        assert_eq!(r.captured, vec!["", "7"]);
        let r = scan(&lex, "-7").expect("scan");
        assert_eq!(r.captured, vec!["-", "7"]);
    }

    #[test]
    fn test_case() {
        let lex = lexicon("<A{2}");
        let r = scan(&lex, "ab").expect("scan");
        assert_eq!(r.captured, vec!["A", "B"]);

        let lex = lexicon("H:Ip");
        let r = scan(&lex, "10:15PM").expect("scan");
        assert_eq!(r.captured, vec!["10", ":", "15", "pm"]);
    }

    #[test]
    fn test_numeric() {
        let lex = lexicon("#,##0.00");
        let r = scan(&lex, "5.25").expect("scan");
        assert_eq!(r.captured, vec!["", "", "", "", "5", ".", "2", "5"]);
        assert_eq!(r.state, lex.end());

        let r = scan(&lex, "1,234.56").expect("scan");
        assert_eq!(r.captured, vec!["1", ",", "2", "3", "4", ".", "5", "6"]);

        let r = scan(&lex, "34.50").expect("scan");
        assert_eq!(r.captured, vec!["", "", "", "3", "4", ".", "5", "0"]);

        // still typing, filled from the left.
        let r = scan(&lex, "1").expect("scan");
        assert_eq!(r.captured[0], "1");

        assert_eq!(
            scan(&lex, "5.2.5"),
            Err(MaskError::InvalidInputCharacter { pos: 3, ch: '.' })
        );
    }
}
