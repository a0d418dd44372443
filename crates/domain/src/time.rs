use chrono::{Local, TimeZone, Utc};
use derive_more::{Deref, Display, From, Into};

pub const TICKS_PER_SECOND: i64 = 1000;
pub const TICKS_PER_DAY: i64 = 24 * 60 * 60 * TICKS_PER_SECOND;
pub const DAYS_PER_WEEK: i64 = 7;
pub const WEEKS_PER_MONTH: i64 = 4;

const TICKS_PER_WEEK: i64 = TICKS_PER_DAY * DAYS_PER_WEEK;
const TICKS_PER_MONTH: i64 = TICKS_PER_WEEK * WEEKS_PER_MONTH;

/// Milliseconds since the Unix epoch.
#[derive(
    Deref, Debug, Default, Display, Clone, Copy, From, Into, Hash, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Tick(i64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Elapsed milliseconds from `self` until `now`.
    #[must_use]
    pub fn ticks_until(self, now: Tick) -> i64 {
        now.0 - self.0
    }
}

pub trait Clock {
    fn now(&self) -> Tick;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Tick {
        Tick(Utc::now().timestamp_millis())
    }
}

/// A clock that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Tick);

impl Clock for FixedClock {
    fn now(&self) -> Tick {
        self.0
    }
}

/// Number of whole weeks elapsed since `tick`. Zero is the current week, future ticks are
/// negative.
#[must_use]
pub fn weeks_ago(tick: Tick, now: Tick) -> i64 {
    tick.ticks_until(now).div_euclid(TICKS_PER_WEEK)
}

/// Number of whole four-week months elapsed since `tick`.
#[must_use]
pub fn months_ago(tick: Tick, now: Tick) -> i64 {
    tick.ticks_until(now).div_euclid(TICKS_PER_MONTH)
}

#[must_use]
pub fn from_weeks_ago(weeks: i64, now: Tick) -> Tick {
    Tick(now.0 - weeks * TICKS_PER_WEEK)
}

#[must_use]
pub fn from_months_ago(months: i64, now: Tick) -> Tick {
    Tick(now.0 - months * TICKS_PER_MONTH)
}

/// Format the time elapsed since `tick` in a compact form.
///
/// Up to one week the two most significant units are shown (`3d 4h`, `2h 5m`, `1m 30s`, `42s`).
/// Older ticks are shown as a local calendar date. A zero tick yields an empty string.
#[must_use]
pub fn relative_date(tick: Tick, now: Tick) -> String {
    if tick.is_zero() {
        return String::new();
    }

    let dt = tick.ticks_until(now).max(0);
    let sec = dt / TICKS_PER_SECOND;
    let min = sec / 60;
    let hr = min / 60;
    let day = hr / 24;

    if day > DAYS_PER_WEEK {
        return calendar_date(tick);
    }
    if day > 0 {
        return format!("{day}d {}h", hr % 24);
    }
    if hr > 0 {
        return format!("{hr}h {}m", min % 60);
    }
    if min > 0 {
        return format!("{min}m {}s", sec % 60);
    }
    format!("{sec}s")
}

fn calendar_date(tick: Tick) -> String {
    match Local.timestamp_millis_opt(tick.0).single() {
        Some(date_time) => date_time.format("%-m/%-d/%Y").to_string(),
        None => String::new(),
    }
}
