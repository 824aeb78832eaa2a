//! Dates on which a period extreme occurred.
//!
//! Text form is compact: `YYYYMMDD`, optionally followed by `@HH`. Spans
//! join two such dates with `-`, and a wind extreme appends its direction in
//! degrees as `/DDD`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use clim_utils::dates::{format_date_compact, parse_date_compact};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OccurrenceDate {
    pub date: NaiveDate,
    pub hour: Option<u8>,
}

impl OccurrenceDate {
    pub fn new(date: NaiveDate) -> Self {
        OccurrenceDate { date, hour: None }
    }

    pub fn with_hour(date: NaiveDate, hour: u32) -> Result<Self, CoreError> {
        if hour > 23 {
            return Err(CoreError::InvalidHour(hour));
        }
        Ok(OccurrenceDate {
            date,
            hour: Some(hour as u8),
        })
    }
}

impl FromStr for OccurrenceDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidOccurrence(s.to_string());
        let (date_part, hour_part) = match s.trim().split_once('@') {
            Some((d, h)) => (d, Some(h)),
            None => (s.trim(), None),
        };
        let date = parse_date_compact(date_part).map_err(|_| invalid())?;
        match hour_part {
            Some(h) => {
                let hour = h.parse::<u32>().map_err(|_| invalid())?;
                OccurrenceDate::with_hour(date, hour)
            }
            None => Ok(OccurrenceDate::new(date)),
        }
    }
}

impl fmt::Display for OccurrenceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_date_compact(&self.date))?;
        if let Some(hour) = self.hour {
            write!(f, "@{:02}", hour)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occurrence {
    Day(OccurrenceDate),
    Span {
        start: OccurrenceDate,
        end: OccurrenceDate,
    },
    /// A day with the direction the wind blew from, in degrees.
    DirectedDay { day: OccurrenceDate, direction: u16 },
}

/// Largest legal direction; 360 is north, 0 is calm.
pub const MAX_DIRECTION: u16 = 360;

fn parse_direction(text: &str, whole: &str) -> Result<u16, CoreError> {
    match text.trim().parse::<u16>() {
        Ok(direction) if direction <= MAX_DIRECTION => Ok(direction),
        _ => Err(CoreError::InvalidOccurrence(whole.to_string())),
    }
}

impl FromStr for Occurrence {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((day, direction)) = s.split_once('/') {
            return Ok(Occurrence::DirectedDay {
                day: day.parse()?,
                direction: parse_direction(direction, s)?,
            });
        }
        match s.split_once('-') {
            Some((start, end)) => Ok(Occurrence::Span {
                start: start.parse()?,
                end: end.parse()?,
            }),
            None => Ok(Occurrence::Day(s.parse()?)),
        }
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occurrence::Day(day) => write!(f, "{}", day),
            Occurrence::Span { start, end } => write!(f, "{}-{}", start, end),
            Occurrence::DirectedDay { day, direction } => write!(f, "{}/{:03}", day, direction),
        }
    }
}

/// What a field's occurrence inputs look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccurrenceShape {
    /// A single day.
    Day,
    /// A start and end day.
    Span,
    /// A start and end day, each with an hour.
    SpanWithHours,
    /// A single day with a wind direction.
    DirectedDay,
}

impl OccurrenceShape {
    /// Whether `occurrence` has the form this shape records.
    pub fn accepts(self, occurrence: &Occurrence) -> bool {
        match (self, occurrence) {
            (OccurrenceShape::Day, Occurrence::Day(_)) => true,
            (OccurrenceShape::Span, Occurrence::Span { start, end }) => {
                start.hour.is_none() && end.hour.is_none()
            }
            (OccurrenceShape::SpanWithHours, Occurrence::Span { start, end }) => {
                start.hour.is_some() && end.hour.is_some()
            }
            (OccurrenceShape::DirectedDay, Occurrence::DirectedDay { .. }) => true,
            _ => false,
        }
    }
}

/// The operator-facing inputs for one occurrence slot. Any part may be blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OccurrenceInput {
    pub start: Option<NaiveDate>,
    pub start_hour: Option<u8>,
    pub end: Option<NaiveDate>,
    pub end_hour: Option<u8>,
    pub direction: Option<u16>,
}

impl OccurrenceInput {
    pub fn from_occurrence(occurrence: &Occurrence) -> Self {
        match occurrence {
            Occurrence::Day(day) => OccurrenceInput {
                start: Some(day.date),
                start_hour: day.hour,
                ..Default::default()
            },
            Occurrence::Span { start, end } => OccurrenceInput {
                start: Some(start.date),
                start_hour: start.hour,
                end: Some(end.date),
                end_hour: end.hour,
                ..Default::default()
            },
            Occurrence::DirectedDay { day, direction } => OccurrenceInput {
                start: Some(day.date),
                start_hour: day.hour,
                direction: Some(*direction),
                ..Default::default()
            },
        }
    }

    pub fn is_blank(&self) -> bool {
        *self == OccurrenceInput::default()
    }

    /// The occurrence these inputs describe, or `None` when a part required by
    /// `shape` is blank.
    pub fn complete(&self, shape: OccurrenceShape) -> Option<Occurrence> {
        let start = self.start?;
        match shape {
            OccurrenceShape::Day => Some(Occurrence::Day(OccurrenceDate {
                date: start,
                hour: self.start_hour,
            })),
            OccurrenceShape::Span => Some(Occurrence::Span {
                start: OccurrenceDate::new(start),
                end: OccurrenceDate::new(self.end?),
            }),
            OccurrenceShape::SpanWithHours => Some(Occurrence::Span {
                start: OccurrenceDate {
                    date: start,
                    hour: Some(self.start_hour?),
                },
                end: OccurrenceDate {
                    date: self.end?,
                    hour: Some(self.end_hour?),
                },
            }),
            OccurrenceShape::DirectedDay => Some(Occurrence::DirectedDay {
                day: OccurrenceDate {
                    date: start,
                    hour: self.start_hour,
                },
                direction: self.direction.filter(|d| *d <= MAX_DIRECTION)?,
            }),
        }
    }
}

/// Ordered list of occurrences holding at most `capacity` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundedOccurrenceList {
    capacity: usize,
    items: Vec<Occurrence>,
}

impl BoundedOccurrenceList {
    pub fn new(capacity: usize) -> Self {
        BoundedOccurrenceList {
            capacity,
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn try_from_vec(capacity: usize, items: Vec<Occurrence>) -> Result<Self, CoreError> {
        if items.len() > capacity {
            return Err(CoreError::CapacityExceeded {
                len: items.len(),
                capacity,
            });
        }
        Ok(BoundedOccurrenceList { capacity, items })
    }

    /// Append unless full. Returns whether the occurrence was accepted.
    pub fn push(&mut self, occurrence: Occurrence) -> bool {
        if self.items.len() >= self.capacity {
            return false;
        }
        self.items.push(occurrence);
        true
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Occurrence] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Occurrence> {
        self.items.iter()
    }
}

/// Positional comparison of the first `capacity` slots. An absent slot only
/// equals another absent slot, so reordered dates compare unequal.
pub fn equal_up_to_capacity(a: &[Occurrence], b: &[Occurrence], capacity: usize) -> bool {
    (0..capacity).all(|i| a.get(i) == b.get(i))
}
