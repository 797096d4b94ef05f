use crate::error::{DnssecError, Result};
use chrono::{DateTime, Utc};

/// The window of time against which RRSIG inception and expiration are
/// checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DatePeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(DnssecError::InvalidPeriod {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(DatePeriod { start, end })
    }

    /// A zero-length period at `instant`.
    pub fn instant(instant: DateTime<Utc>) -> Self {
        DatePeriod {
            start: instant,
            end: instant,
        }
    }

    pub fn now() -> Self {
        Self::instant(Utc::now())
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether the closed interval `[inception, expiration]`, given as
    /// seconds since the epoch, overlaps this period.
    pub fn overlaps(&self, inception: u32, expiration: u32) -> bool {
        i64::from(inception) <= self.end.timestamp()
            && self.start.timestamp() <= i64::from(expiration)
    }
}
