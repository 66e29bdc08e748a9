//!
//! Input tokens: one token per slot of the final mask.
//!
//! Each reserved mask code is a [SlotKind]. The behaviour of a code
//! (width, acceptance paths, padding, forced case) comes from the
//! tables in `impl SlotKind`.
//!

use crate::mask_token::{CaseDirection, MaskToken, MaskType};
use crate::upos_type;
use format_num_pattern::NumberSymbols;
use std::borrow::Cow;
use std::fmt;
use std::fmt::{Debug, Formatter};

/// The reserved mask codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SlotKind {
    /// `_` any printable char
    AnyChar,
    /// `?` any printable char, optional
    AnyCharOpt,
    /// `A` letter or digit
    Alnum,
    /// `a` letter or digit, optional
    AlnumOpt,
    /// `L` letter
    Letter,
    /// `l` letter, optional
    LetterOpt,
    /// `C` letter, digit or space
    AlnumSpace,
    /// `c` letter, digit or space, optional
    AlnumSpaceOpt,
    /// `+` sign
    Sign,
    /// `0` digit
    Digit,
    /// `#` digit, optional
    DigitOpt,
    /// `M` month
    Month,
    /// `m` month
    MonthNoPad,
    /// `D` day
    Day,
    /// `d` day
    DayNoPad,
    /// `Y` 4-digit year
    Year4,
    /// `y` 2-digit year
    Year2,
    /// `H` hour
    Hour,
    /// `I` minute
    Minute,
    /// `S` second
    Second,
    /// `P` AM/PM
    AmPmUpper,
    /// `p` am/pm
    AmPmLower,
    /// `.`
    DecimalSep,
    /// `,`
    GroupingSep,
    /// `:`
    TimeSep,
    /// `/`
    DateSep,
}

/// Test for a single char.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum CharTest {
    Exact(char),
    OneOf(Cow<'static, str>),
    Range(char, char),
    /// Case insensitive [CharTest::OneOf].
    NoCase(&'static str),
    Digit,
    Letter,
    Alnum,
    AlnumSpace,
    Printable,
}

/// One step of an acceptance path.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Char(CharTest),
    /// The path may end here if the next slot continues.
    Forcible,
}

/// Acceptance path of a slot.
pub type Path = Vec<Step>;

/// What kind of slot is this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// Literal text. Merged from consecutive literal mask tokens.
    Literal(Box<str>),
    /// A reserved mask code.
    Slot(SlotKind),
    /// A custom char set.
    Custom { chars: Box<str>, numeric: bool },
}

/// One slot of the mask.
#[derive(Clone, PartialEq, Eq)]
pub struct InputToken {
    pub kind: InputKind,
    /// Acceptance paths.
    pub paths: Vec<Path>,
    /// Minimum chars for a complete slot.
    pub min_width: upos_type,
    /// Maximum chars.
    pub max_width: upos_type,
    /// Display of the empty slot.
    pub placeholder: Box<str>,
    /// Slot can be skipped.
    pub optional: bool,
    /// Left pad a single char with 0.
    pub zero_pad: bool,
    pub force_upper: bool,
    pub force_lower: bool,
}

impl Debug for CharTest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CharTest::Exact(c) => write!(f, "{:?}", c),
            CharTest::OneOf(s) => write!(f, "[{}]", s),
            CharTest::Range(a, b) => write!(f, "[{}-{}]", a, b),
            CharTest::NoCase(s) => write!(f, "[{}]/i", s),
            CharTest::Digit => write!(f, "digit"),
            CharTest::Letter => write!(f, "letter"),
            CharTest::Alnum => write!(f, "alnum"),
            CharTest::AlnumSpace => write!(f, "alnum|space"),
            CharTest::Printable => write!(f, "printable"),
        }
    }
}

impl Debug for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Step::Char(t) => write!(f, "{:?}", t),
            Step::Forcible => write!(f, "~"),
        }
    }
}

impl Debug for InputToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {}..{} {:?}",
            self.kind, self.min_width, self.max_width, self.paths
        )?;
        if self.optional {
            write!(f, " opt")?;
        }
        if self.force_upper {
            write!(f, " upper")?;
        } else if self.force_lower {
            write!(f, " lower")?;
        }
        Ok(())
    }
}

impl CharTest {
    /// Char is accepted.
    #[inline]
    pub fn test(&self, c: char) -> bool {
        match self {
            CharTest::Exact(e) => *e == c,
            CharTest::OneOf(s) => s.contains(c),
            CharTest::Range(a, b) => *a <= c && c <= *b,
            CharTest::NoCase(s) => s.contains(c.to_ascii_lowercase()),
            CharTest::Digit => c.is_ascii_digit(),
            CharTest::Letter => c.is_ascii_alphabetic(),
            CharTest::Alnum => c.is_ascii_alphanumeric(),
            CharTest::AlnumSpace => c.is_ascii_alphanumeric() || c == ' ',
            CharTest::Printable => c.is_ascii_graphic() || c == ' ',
        }
    }
}

fn ch(test: CharTest) -> Step {
    Step::Char(test)
}

fn one_of(s: &'static str) -> Step {
    Step::Char(CharTest::OneOf(Cow::Borrowed(s)))
}

fn exact(c: char) -> Step {
    Step::Char(CharTest::Exact(c))
}

fn range(a: char, b: char) -> Step {
    Step::Char(CharTest::Range(a, b))
}

impl SlotKind {
    /// Map a mask code to its kind.
    pub fn from_code(c: char) -> Option<SlotKind> {
        Some(match c {
            '_' => SlotKind::AnyChar,
            '?' => SlotKind::AnyCharOpt,
            'A' => SlotKind::Alnum,
            'a' => SlotKind::AlnumOpt,
            'L' => SlotKind::Letter,
            'l' => SlotKind::LetterOpt,
            'C' => SlotKind::AlnumSpace,
            'c' => SlotKind::AlnumSpaceOpt,
            '+' => SlotKind::Sign,
            '0' => SlotKind::Digit,
            '#' => SlotKind::DigitOpt,
            'M' => SlotKind::Month,
            'm' => SlotKind::MonthNoPad,
            'D' => SlotKind::Day,
            'd' => SlotKind::DayNoPad,
            'Y' => SlotKind::Year4,
            'y' => SlotKind::Year2,
            'H' => SlotKind::Hour,
            'I' => SlotKind::Minute,
            'S' => SlotKind::Second,
            'P' => SlotKind::AmPmUpper,
            'p' => SlotKind::AmPmLower,
            '.' => SlotKind::DecimalSep,
            ',' => SlotKind::GroupingSep,
            ':' => SlotKind::TimeSep,
            '/' => SlotKind::DateSep,
            _ => return None,
        })
    }

    /// Mask code.
    pub fn symbol(&self) -> char {
        match self {
            SlotKind::AnyChar => '_',
            SlotKind::AnyCharOpt => '?',
            SlotKind::Alnum => 'A',
            SlotKind::AlnumOpt => 'a',
            SlotKind::Letter => 'L',
            SlotKind::LetterOpt => 'l',
            SlotKind::AlnumSpace => 'C',
            SlotKind::AlnumSpaceOpt => 'c',
            SlotKind::Sign => '+',
            SlotKind::Digit => '0',
            SlotKind::DigitOpt => '#',
            SlotKind::Month => 'M',
            SlotKind::MonthNoPad => 'm',
            SlotKind::Day => 'D',
            SlotKind::DayNoPad => 'd',
            SlotKind::Year4 => 'Y',
            SlotKind::Year2 => 'y',
            SlotKind::Hour => 'H',
            SlotKind::Minute => 'I',
            SlotKind::Second => 'S',
            SlotKind::AmPmUpper => 'P',
            SlotKind::AmPmLower => 'p',
            SlotKind::DecimalSep => '.',
            SlotKind::GroupingSep => ',',
            SlotKind::TimeSep => ':',
            SlotKind::DateSep => '/',
        }
    }

    /// Codes that may occur only once per mask.
    #[inline]
    pub fn is_single(&self) -> bool {
        matches!(
            self,
            SlotKind::Sign | SlotKind::DecimalSep | SlotKind::GroupingSep
        )
    }

    /// Text slot. Can take a case modifier.
    #[inline]
    pub fn is_text(&self) -> bool {
        self.mask_type() == MaskType::Text
    }

    /// Separator slot. Acts as a literal.
    #[inline]
    pub fn is_separator(&self) -> bool {
        matches!(
            self,
            SlotKind::DecimalSep | SlotKind::GroupingSep | SlotKind::TimeSep | SlotKind::DateSep
        )
    }

    /// Class of the code.
    pub fn mask_type(&self) -> MaskType {
        match self {
            SlotKind::AnyChar
            | SlotKind::AnyCharOpt
            | SlotKind::Alnum
            | SlotKind::AlnumOpt
            | SlotKind::Letter
            | SlotKind::LetterOpt
            | SlotKind::AlnumSpace
            | SlotKind::AlnumSpaceOpt => MaskType::Text,
            SlotKind::Sign
            | SlotKind::Digit
            | SlotKind::DigitOpt
            | SlotKind::DecimalSep
            | SlotKind::GroupingSep => MaskType::Numeric,
            SlotKind::Month
            | SlotKind::MonthNoPad
            | SlotKind::Day
            | SlotKind::DayNoPad
            | SlotKind::Year4
            | SlotKind::Year2
            | SlotKind::Hour
            | SlotKind::Minute
            | SlotKind::Second
            | SlotKind::AmPmUpper
            | SlotKind::AmPmLower
            | SlotKind::TimeSep
            | SlotKind::DateSep => MaskType::Date,
        }
    }

    /// Number of chars.
    pub fn width(&self) -> upos_type {
        match self {
            SlotKind::Month
            | SlotKind::MonthNoPad
            | SlotKind::Day
            | SlotKind::DayNoPad
            | SlotKind::Year2
            | SlotKind::Hour
            | SlotKind::Minute
            | SlotKind::Second
            | SlotKind::AmPmUpper
            | SlotKind::AmPmLower => 2,
            SlotKind::Year4 => 4,
            _ => 1,
        }
    }

    /// Can be skipped.
    pub fn optional(&self) -> bool {
        matches!(
            self,
            SlotKind::AnyCharOpt
                | SlotKind::AlnumOpt
                | SlotKind::LetterOpt
                | SlotKind::AlnumSpaceOpt
                | SlotKind::Sign
                | SlotKind::DigitOpt
        ) || self.is_separator()
    }

    /// A single digit gets a leading 0 when the slot is done.
    ///
    /// `m` and `d` share this with `M` and `D`. They differ only
    /// for output formatting, which is not done here.
    pub fn zero_pad(&self) -> bool {
        matches!(
            self,
            SlotKind::Month | SlotKind::MonthNoPad | SlotKind::Day | SlotKind::DayNoPad
        )
    }

    /// Inherent case of the slot.
    pub fn case(&self) -> Option<CaseDirection> {
        match self {
            SlotKind::AmPmUpper => Some(CaseDirection::Upper),
            SlotKind::AmPmLower => Some(CaseDirection::Lower),
            _ => None,
        }
    }

    /// Valid numeric range of a complete slot.
    pub fn value_range(&self) -> Option<(u32, u32)> {
        match self {
            SlotKind::Month | SlotKind::MonthNoPad => Some((1, 12)),
            SlotKind::Day | SlotKind::DayNoPad => Some((1, 31)),
            SlotKind::Hour => Some((0, 23)),
            SlotKind::Minute | SlotKind::Second => Some((0, 59)),
            _ => None,
        }
    }

    /// Acceptance paths.
    ///
    /// Separators use the given literal char.
    pub fn paths(&self, sym: &NumberSymbols) -> Vec<Path> {
        match self {
            SlotKind::AnyChar | SlotKind::AnyCharOpt => vec![vec![ch(CharTest::Printable)]],
            SlotKind::Alnum | SlotKind::AlnumOpt => vec![vec![ch(CharTest::Alnum)]],
            SlotKind::Letter | SlotKind::LetterOpt => vec![vec![ch(CharTest::Letter)]],
            SlotKind::AlnumSpace | SlotKind::AlnumSpaceOpt => {
                vec![vec![ch(CharTest::AlnumSpace)]]
            }
            SlotKind::Sign => vec![vec![one_of("+-")]],
            SlotKind::Digit | SlotKind::DigitOpt => vec![vec![ch(CharTest::Digit)]],
            SlotKind::Month | SlotKind::MonthNoPad => vec![
                // 1, 10-12
                vec![exact('1'), Step::Forcible, one_of("012")],
                // 01-09
                vec![exact('0'), range('1', '9')],
                // 2-9
                vec![range('2', '9')],
            ],
            SlotKind::Day | SlotKind::DayNoPad => vec![
                // 3, 30-31
                vec![exact('3'), Step::Forcible, one_of("01")],
                // 1, 2, 10-29
                vec![one_of("12"), Step::Forcible, ch(CharTest::Digit)],
                // 01-09
                vec![exact('0'), range('1', '9')],
                // 4-9
                vec![range('4', '9')],
            ],
            SlotKind::Year4 => vec![vec![ch(CharTest::Digit); 4]],
            SlotKind::Year2 => vec![vec![ch(CharTest::Digit); 2]],
            SlotKind::Hour => vec![
                // 2, 20-23
                vec![exact('2'), Step::Forcible, one_of("0123")],
                // 0, 1, 00-19
                vec![one_of("01"), Step::Forcible, ch(CharTest::Digit)],
                // 3-9
                vec![range('3', '9')],
            ],
            SlotKind::Minute | SlotKind::Second => {
                vec![vec![one_of("012345"), ch(CharTest::Digit)]]
            }
            SlotKind::AmPmUpper | SlotKind::AmPmLower => vec![vec![
                Step::Char(CharTest::NoCase("pa")),
                Step::Char(CharTest::NoCase("m")),
            ]],
            SlotKind::DecimalSep => vec![vec![exact(sym.decimal_sep)]],
            SlotKind::GroupingSep => vec![vec![exact(grouping_char(sym))]],
            SlotKind::TimeSep => vec![vec![exact(':')]],
            SlotKind::DateSep => vec![vec![exact('/')]],
        }
    }

    /// Literal text of a separator.
    pub fn separator_text(&self, sym: &NumberSymbols) -> Option<char> {
        match self {
            SlotKind::DecimalSep => Some(sym.decimal_sep),
            SlotKind::GroupingSep => Some(grouping_char(sym)),
            SlotKind::TimeSep => Some(':'),
            SlotKind::DateSep => Some('/'),
            _ => None,
        }
    }
}

// a missing grouping char would break the one char per mask position.
fn grouping_char(sym: &NumberSymbols) -> char {
    sym.decimal_grp.unwrap_or(',')
}

/// Count the chars up to the first forcible marker.
fn min_width(paths: &[Path]) -> upos_type {
    paths
        .iter()
        .map(|path| {
            let mut n = 0;
            for step in path {
                match step {
                    Step::Char(_) => n += 1,
                    Step::Forcible => break,
                }
            }
            n
        })
        .min()
        .unwrap_or(0)
}

impl InputToken {
    /// Literal slot.
    pub fn literal(text: &str) -> Self {
        let paths = vec![text.chars().map(exact).collect::<Path>()];
        let width = text.chars().count() as upos_type;
        Self {
            kind: InputKind::Literal(Box::from(text)),
            paths,
            min_width: width,
            max_width: width,
            placeholder: Box::from(text),
            optional: true,
            zero_pad: false,
            force_upper: false,
            force_lower: false,
        }
    }

    /// Slot for a mask code.
    pub fn slot(kind: SlotKind, placeholder: char, sym: &NumberSymbols) -> Self {
        if let Some(sep) = kind.separator_text(sym) {
            let mut tok = Self::literal(&sep.to_string());
            tok.kind = InputKind::Slot(kind);
            return tok;
        }

        let paths = kind.paths(sym);
        let width = kind.width();
        Self {
            kind: InputKind::Slot(kind),
            min_width: min_width(&paths),
            max_width: width,
            paths,
            placeholder: placeholder.to_string().repeat(width as usize).into(),
            optional: kind.optional(),
            zero_pad: kind.zero_pad(),
            force_upper: kind.case() == Some(CaseDirection::Upper),
            force_lower: kind.case() == Some(CaseDirection::Lower),
        }
    }

    /// Slot for a custom set.
    pub fn custom(chars: &str, placeholder: char) -> Self {
        Self {
            kind: InputKind::Custom {
                chars: Box::from(chars),
                numeric: MaskToken::is_numeric_set(chars),
            },
            paths: vec![vec![Step::Char(CharTest::OneOf(Cow::Owned(
                chars.to_string(),
            )))]],
            min_width: 1,
            max_width: 1,
            placeholder: placeholder.to_string().into(),
            optional: false,
            zero_pad: false,
            force_upper: false,
            force_lower: false,
        }
    }

    /// Literal slots and separators.
    #[inline]
    pub fn is_literal(&self) -> bool {
        match &self.kind {
            InputKind::Literal(_) => true,
            InputKind::Slot(kind) => kind.is_separator(),
            InputKind::Custom { .. } => false,
        }
    }

    /// Text shown for the captured chars of a finished slot.
    pub fn proper_display<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.zero_pad && self.max_width == 2 && text.chars().count() == 1 {
            Cow::Owned(format!("0{}", text))
        } else {
            Cow::Borrowed(text)
        }
    }

    /// Apply the forced case.
    #[inline]
    pub fn map_case(&self, c: char) -> char {
        if self.force_upper {
            c.to_ascii_uppercase()
        } else if self.force_lower {
            c.to_ascii_lowercase()
        } else {
            c
        }
    }

    fn set_case(&mut self, case: Option<CaseDirection>) {
        match case {
            Some(CaseDirection::Upper) => {
                self.force_upper = true;
                self.force_lower = false;
            }
            Some(CaseDirection::Lower) => {
                self.force_lower = true;
                self.force_upper = false;
            }
            None => {}
        }
    }
}

/// Create the input tokens for the mask tokens.
///
/// Returns the tokens and the empty display of each token.
pub fn build_input_tokens(
    tokens: &[MaskToken],
    placeholder: char,
    sym: &NumberSymbols,
) -> (Vec<InputToken>, Vec<String>) {
    let mut out = Vec::<InputToken>::new();

    let mut idx = 0;
    while idx < tokens.len() {
        let tok = match &tokens[idx] {
            MaskToken::Literal(_) => {
                // merge consecutive literals
                let mut buf = String::new();
                while let Some(MaskToken::Literal(s)) = tokens.get(idx) {
                    buf.push_str(s);
                    idx += 1;
                }
                out.push(InputToken::literal(&buf));
                continue;
            }
            MaskToken::CharClass { kind, case, .. } => {
                let mut tok = InputToken::slot(*kind, placeholder, sym);
                tok.set_case(*case);
                tok
            }
            MaskToken::CustomSet { chars } => InputToken::custom(chars, placeholder),
            MaskToken::Repeater(_) | MaskToken::CaseModifier(_) | MaskToken::RightToLeft => {
                // resolved by the tokenizer.
                idx += 1;
                continue;
            }
        };
        out.push(tok);
        idx += 1;
    }

    let empty = out.iter().map(|v| v.placeholder.to_string()).collect();
    (out, empty)
}
