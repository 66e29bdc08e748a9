//!
//! Date and time values from the captures of a date mask.
//!

use crate::compiler::CompiledMask;
use crate::input_token::{InputKind, SlotKind};
use crate::scanner::ScanResult;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parts of a date/time collected from the slots.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    /// Some(true) for PM.
    pub pm: Option<bool>,
}

/// Expand a two-digit year.
///
/// 50..99 map to 1950..1999, 0..49 map to 2000..2049.
/// Years with more digits are kept.
pub fn expand_year(year: u32) -> i32 {
    let year = year as i32;
    if year >= 100 {
        year
    } else if year >= 50 {
        1900 + year
    } else {
        2000 + year
    }
}

impl DateParts {
    /// Collect the parts of all date slots.
    ///
    /// Empty or unparseable slots are left as None.
    pub fn from_scan(mask: &CompiledMask, scan: &ScanResult) -> Self {
        let mut parts = DateParts::default();
        for (token, capture) in mask.tokens().iter().zip(scan.captured.iter()) {
            let InputKind::Slot(kind) = token.kind else {
                continue;
            };
            if capture.is_empty() {
                continue;
            }
            let num = capture.parse::<u32>().ok();
            match kind {
                SlotKind::Year4 => parts.year = num.map(|v| v as i32),
                SlotKind::Year2 => parts.year = num.map(expand_year),
                SlotKind::Month | SlotKind::MonthNoPad => parts.month = num,
                SlotKind::Day | SlotKind::DayNoPad => parts.day = num,
                SlotKind::Hour => parts.hour = num,
                SlotKind::Minute => parts.minute = num,
                SlotKind::Second => parts.second = num,
                SlotKind::AmPmUpper | SlotKind::AmPmLower => {
                    parts.pm = Some(capture.starts_with(['p', 'P']));
                }
                _ => {}
            }
        }
        parts
    }

    /// Hour with am/pm applied.
    pub fn hour24(&self) -> Option<u32> {
        let hour = self.hour?;
        Some(match self.pm {
            Some(true) if hour < 12 => hour + 12,
            Some(false) if hour == 12 => 0,
            _ => hour,
        })
    }

    /// Date if year, month and day are valid.
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)
    }

    /// Time if the hour is valid. Minute and second default to 0.
    pub fn to_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(
            self.hour24()?,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
        )
    }

    /// Date and time.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        Some(NaiveDateTime::new(self.to_date()?, self.to_time()?))
    }
}
