//!
//! The lexicon is the automaton that splits the input text into
//! the slots of the mask.
//!
//! States are kept in an arena and addressed by [StateId]. Each state
//! is known by its [StateKey] `(position, path, step)`.
//!
//! The automaton is built in two passes.
//!
//! * The lead-ins are calculated backwards from the last slot.
//!   The lead-in of a slot contains the first-char edges of all its
//!   paths. If the slot is optional the lead-in of the following slot
//!   is appended, which allows skipping the slot.
//!
//! * Wiring. Every step of a path gets its own state with one edge
//!   to the next step. After the last step the edge points to the
//!   start state of the next slot. If the path may end before a step
//!   (a forcible marker), the lead-in of the next slot is spliced in
//!   after the edge of the step.
//!
//! The start state of each slot holds its lead-in. The start state of
//! the first slot is the begin state. The start state after the last
//! slot is the end state, it has no edges and rejects trailing input.
//!
//! A state is accepting if the text may end there and leave every
//! slot complete. The edges of a slot come before the lead-in of
//! the following slots, so a first-match walk fills the slots from
//! the left. The [scanner](crate::scanner) searches the alternatives
//! when that is not what the text needs.
//!

use crate::input_token::{CharTest, InputToken, Step};
use rustc_hash::FxHashMap;
use std::fmt;
use std::fmt::{Debug, Formatter};

/// Index into the state arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

/// Identity of a state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey {
    /// Slot index.
    pub position: usize,
    /// Path index of the slot.
    pub path: usize,
    /// Index of the char step within the path.
    pub step: usize,
}

/// Outgoing edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Char test.
    pub rule: CharTest,
    /// Slot that captures the char.
    pub slot: usize,
    /// Next state.
    pub target: StateId,
}

/// One state of the automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconState {
    pub key: StateKey,
    /// Edges in match order.
    pub edges: Vec<Edge>,
    /// The text may end here.
    pub accepting: bool,
}

/// The automaton.
#[derive(Debug, Clone)]
pub struct Lexicon {
    tokens: Vec<InputToken>,
    states: Vec<LexiconState>,
    index: FxHashMap<StateKey, StateId>,
    begin: StateId,
    end: StateId,
}

impl Debug for StateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl StateId {
    /// Index into the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl StateKey {
    pub fn new(position: usize, path: usize, step: usize) -> Self {
        Self {
            position,
            path,
            step,
        }
    }

    /// Start state of a slot.
    pub fn start(position: usize) -> Self {
        Self::new(position, 0, 0)
    }
}

/// Lead-in edge before the target ids are known.
#[derive(Debug, Clone)]
struct LeadIn {
    rule: CharTest,
    slot: usize,
    target: StateKey,
}

/// Char steps of a path with a flag for a preceding forcible marker.
fn char_steps(path: &[Step]) -> Vec<(&CharTest, bool)> {
    let mut res = Vec::new();
    let mut forcible = false;
    for step in path {
        match step {
            Step::Char(test) => {
                res.push((test, forcible));
                forcible = false;
            }
            Step::Forcible => {
                forcible = true;
            }
        }
    }
    res
}

/// Next state after step `step` of a path.
fn next_key(position: usize, path: usize, step: usize, len: usize) -> StateKey {
    if step + 1 < len {
        StateKey::new(position, path, step + 1)
    } else {
        StateKey::start(position + 1)
    }
}

impl Lexicon {
    /// Build the automaton for the slots.
    pub fn build(tokens: Vec<InputToken>) -> Self {
        let n = tokens.len();

        // pass 1: lead-ins
        let mut leadin: Vec<Vec<LeadIn>> = vec![Vec::new(); n + 1];
        for p in (0..n).rev() {
            let token = &tokens[p];
            // a required slot starts fresh.
            let mut li = Vec::new();
            for (i, path) in token.paths.iter().enumerate() {
                let steps = char_steps(path);
                if let Some((rule, _)) = steps.first() {
                    li.push(LeadIn {
                        rule: (*rule).clone(),
                        slot: p,
                        target: next_key(p, i, 0, steps.len()),
                    });
                }
            }
            if token.optional {
                li.extend(leadin[p + 1].iter().cloned());
            }
            leadin[p] = li;
        }

        // all slots from p on can stay empty.
        let mut skippable = vec![true; n + 1];
        for p in (0..n).rev() {
            skippable[p] = tokens[p].optional && skippable[p + 1];
        }

        // allocate all states
        let mut states = Vec::new();
        let mut index = FxHashMap::default();
        let mut alloc = |key: StateKey, accepting: bool, states: &mut Vec<LexiconState>| {
            let id = StateId(states.len() as u32);
            states.push(LexiconState {
                key,
                edges: Vec::new(),
                accepting,
            });
            index.insert(key, id);
        };
        for p in 0..n {
            alloc(StateKey::start(p), skippable[p], &mut states);
            for (i, path) in tokens[p].paths.iter().enumerate() {
                let steps = char_steps(path);
                for (j, (_, forcible)) in steps.iter().enumerate().skip(1) {
                    alloc(
                        StateKey::new(p, i, j),
                        *forcible && skippable[p + 1],
                        &mut states,
                    );
                }
            }
        }
        alloc(StateKey::start(n), true, &mut states);

        // pass 2: wiring
        let resolve = |li: &LeadIn| Edge {
            rule: li.rule.clone(),
            slot: li.slot,
            target: index[&li.target],
        };
        for p in 0..n {
            let start = index[&StateKey::start(p)];
            states[start.index()].edges = leadin[p].iter().map(resolve).collect();

            for (i, path) in tokens[p].paths.iter().enumerate() {
                let steps = char_steps(path);
                for (j, (rule, forcible)) in steps.iter().enumerate().skip(1) {
                    let id = index[&StateKey::new(p, i, j)];
                    let mut edges = vec![Edge {
                        rule: (*rule).clone(),
                        slot: p,
                        target: index[&next_key(p, i, j, steps.len())],
                    }];
                    if *forcible {
                        edges.extend(leadin[p + 1].iter().map(resolve));
                    }
                    states[id.index()].edges = edges;
                }
            }
        }

        let begin = index[&StateKey::start(0)];
        let end = index[&StateKey::start(n)];

        Self {
            tokens,
            states,
            index,
            begin,
            end,
        }
    }

    /// Slots of the mask.
    #[inline]
    pub fn tokens(&self) -> &[InputToken] {
        &self.tokens
    }

    /// Number of slots.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.tokens.len()
    }

    /// Number of states.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Never empty, there are at least begin and end.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Begin state.
    #[inline]
    pub fn begin(&self) -> StateId {
        self.begin
    }

    /// End state.
    #[inline]
    pub fn end(&self) -> StateId {
        self.end
    }

    /// Get a state.
    #[inline]
    pub fn state(&self, id: StateId) -> &LexiconState {
        &self.states[id.index()]
    }

    /// Find a state by key.
    pub fn find(&self, key: StateKey) -> Option<StateId> {
        self.index.get(&key).copied()
    }

    /// All states in arena order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &LexiconState)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, v)| (StateId(i as u32), v))
    }

    /// Number of input slots passed over empty by the edge.
    ///
    /// Literal slots are not counted.
    pub fn skipped(&self, id: StateId, edge: &Edge) -> usize {
        let key = self.state(id).key;
        let first = if key.path == 0 && key.step == 0 {
            key.position
        } else {
            key.position + 1
        };
        self.tokens
            .get(first..edge.slot)
            .map(|v| v.iter().filter(|t| !t.is_literal()).count())
            .unwrap_or_default()
    }

    /// All edges of a state that take the char.
    ///
    /// Yields the edge index, the edge and the char after case forcing.
    pub fn matching(
        &self,
        id: StateId,
        c: char,
    ) -> impl Iterator<Item = (usize, &Edge, char)> + '_ {
        self.state(id)
            .edges
            .iter()
            .enumerate()
            .filter_map(move |(i, edge)| {
                let c = self.tokens[edge.slot].map_case(c);
                edge.rule.test(c).then_some((i, edge, c))
            })
    }
}
