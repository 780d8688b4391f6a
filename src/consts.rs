/// Number of days in a week
pub const DAYS_PER_WEEK: usize = 7;

/// Last valid canonical weekday number (Saturday, with Sunday = 0)
pub const MAX_FIRST_DAY_NO: i64 = 6;

/// First day of week used when the configuration does not name one (Monday)
pub const DEFAULT_FIRST_DAY_NO: i64 = 1;

/// Month number for February
pub const FEBRUARY: u32 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u32 = 29;

/// Days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u32; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

/// Width of one time slot in minutes
pub const SLOT_MINUTES: u32 = 30;

/// Number of half-hour slots in a day (00:00 through 23:30)
pub const SLOTS_PER_DAY: usize = 48;

/// Columns of the rendered time grid
pub const TIME_GRID_COLUMNS: usize = 6;

/// Default distance of the start date from "now"
pub const DEFAULT_START_OFFSET_DAYS: i64 = 1;

/// Default span of the selectable window, counted from the start date
pub const DEFAULT_LAST_DATE_SPAN_DAYS: i64 = 365;

/// Minimum gap between start and end when the configuration gives none
pub const DEFAULT_MIN_INTERVAL_HOURS: f64 = 1.0;

/// Delay before a panel is hidden after a selection
pub const CLOSE_DELAY_MS: u64 = 500;

/// Label keys for the canonical week, Sunday first
pub const WEEKDAY_KEYS: [&str; DAYS_PER_WEEK] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// Short label keys for months, January first
pub const MONTH_KEYS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Full-name label keys for months, January first
pub const MONTH_NAME_KEYS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];
