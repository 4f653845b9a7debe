//! Report vocabulary shared by the writers
//!
//! The engine hands over integer codes for store type, timestep type and
//! reporting frequency. Each code maps to an enum here, and each enum owns
//! the exact text or integer that lands in the database.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Regex splitting `"Description [units]"` labels
static UNITS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<desc>[^\[]*)\[(?P<units>[^\]]*)\]").expect("Invalid units regex")
});

/// Days per month, non-leap year
const DAYS_IN_MONTH: [i32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Aggregation granularity of a report variable or meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportingFrequency {
    /// Every HVAC system timestep
    EachCall,
    /// Every zone timestep
    TimeStep,
    /// End of each hour
    Hourly,
    /// End of each day
    Daily,
    /// End of each month
    Monthly,
    /// Once per environment period
    RunPeriod,
}

impl ReportingFrequency {
    /// All frequencies in code order
    pub const ALL: [ReportingFrequency; 6] = [
        ReportingFrequency::EachCall,
        ReportingFrequency::TimeStep,
        ReportingFrequency::Hourly,
        ReportingFrequency::Daily,
        ReportingFrequency::Monthly,
        ReportingFrequency::RunPeriod,
    ];

    /// Convert from the engine's integer code
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(ReportingFrequency::EachCall),
            0 => Some(ReportingFrequency::TimeStep),
            1 => Some(ReportingFrequency::Hourly),
            2 => Some(ReportingFrequency::Daily),
            3 => Some(ReportingFrequency::Monthly),
            4 => Some(ReportingFrequency::RunPeriod),
            _ => None,
        }
    }

    /// Integer code, also stored as `Time.IntervalType`
    pub fn code(&self) -> i32 {
        match self {
            ReportingFrequency::EachCall => -1,
            ReportingFrequency::TimeStep => 0,
            ReportingFrequency::Hourly => 1,
            ReportingFrequency::Daily => 2,
            ReportingFrequency::Monthly => 3,
            ReportingFrequency::RunPeriod => 4,
        }
    }

    /// Text stored in `ReportDataDictionary.ReportingFrequency`
    pub fn name(&self) -> &'static str {
        match self {
            ReportingFrequency::EachCall => "HVAC System Timestep",
            ReportingFrequency::TimeStep => "Zone Timestep",
            ReportingFrequency::Hourly => "Hourly",
            ReportingFrequency::Daily => "Daily",
            ReportingFrequency::Monthly => "Monthly",
            ReportingFrequency::RunPeriod => "Run Period",
        }
    }

    /// Frequencies finer than one hour carry raw hour/minute stamps
    pub fn is_sub_hourly(&self) -> bool {
        matches!(
            self,
            ReportingFrequency::EachCall | ReportingFrequency::TimeStep
        )
    }

    /// Frequencies whose data rows may carry min/max statistics
    pub fn has_extended_data(&self) -> bool {
        matches!(
            self,
            ReportingFrequency::Daily | ReportingFrequency::Monthly | ReportingFrequency::RunPeriod
        )
    }
}

impl fmt::Display for ReportingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a variable accumulates over a reporting interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreType {
    /// Averaged over the interval
    Averaged,
    /// Summed over the interval
    Summed,
}

impl StoreType {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(StoreType::Averaged),
            2 => Some(StoreType::Summed),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StoreType::Averaged => "Avg",
            StoreType::Summed => "Sum",
        }
    }
}

/// Which timestep loop updates a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestepType {
    Zone,
    HvacSystem,
}

impl TimestepType {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(TimestepType::Zone),
            2 => Some(TimestepType::HvacSystem),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TimestepType::Zone => "Zone",
            TimestepType::HvacSystem => "HVAC System",
        }
    }
}

/// Kind of environment period being simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum EnvironmentKind {
    DesignDay = 1,
    RunPeriodDesign = 2,
    RunPeriodWeather = 3,
}

impl EnvironmentKind {
    pub fn as_db_int(&self) -> i32 {
        *self as i32
    }
}

/// Severity of a recorded simulation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorKind {
    Warning = 0,
    Severe = 1,
    Fatal = 2,
}

impl ErrorKind {
    pub fn as_db_int(&self) -> i32 {
        *self as i32
    }
}

/// Calendar position decoded from the engine's packed min/max date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedDate {
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
}

impl PackedDate {
    /// Decode `month*1_000_000 + day*10_000 + hour*100 + minute`
    pub fn decode(packed: i32) -> Self {
        let month = packed / 1_000_000;
        let rest = packed - month * 1_000_000;
        let day = rest / 10_000;
        let rest = rest - day * 10_000;
        Self {
            month,
            day,
            hour: rest / 100,
            minute: rest % 100,
        }
    }

    /// Same date with hour/minute in interval form
    pub fn normalized(self) -> Self {
        let (hour, minute) = normalize_hour_minute(self.hour, self.minute);
        Self {
            hour,
            minute,
            ..self
        }
    }
}

/// Rewrite an end-of-interval clock time into the stored convention where
/// the minute lies in `(0, 60]`: `(H, 0)` becomes `(H - 1, 60)`.
pub fn normalize_hour_minute(hour: i32, minute: i32) -> (i32, i32) {
    if minute == 0 {
        (hour - 1, 60)
    } else {
        (hour, minute)
    }
}

/// Last day of a 1-based month, `None` when out of range
pub fn days_in_month(month: i32) -> Option<i32> {
    usize::try_from(month - 1)
        .ok()
        .and_then(|idx| DAYS_IN_MONTH.get(idx).copied())
}

/// Split `"Total Energy [GJ]"` into `("Total Energy", "GJ")`.
///
/// Labels without a bracketed unit come back whole with empty units.
pub fn split_units(label: &str) -> (String, String) {
    match UNITS_REGEX.captures(label) {
        Some(caps) => (
            caps["desc"].trim_end().to_string(),
            caps["units"].to_string(),
        ),
        None => (label.to_string(), String::new()),
    }
}
