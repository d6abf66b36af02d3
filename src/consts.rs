/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Last day of December, used for `end_of_year`
pub const LAST_DAY_OF_DECEMBER: u8 = 31;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
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

pub const DAYS_IN_WEEK: u32 = 7;

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Date component separator (`YYYY-MM-DD`)
pub const DATE_SEPARATOR: char = '-';
/// Prefix standing in for the year of a no-year date (`--MM-DD`)
pub const NO_YEAR_PREFIX: &str = "--";
/// Separator between the two dates of a period
pub const PERIOD_SEPARATOR: char = '/';

/// Width of the trailing `MM-DD` key of every stored date string.
/// Lexicographic order of this suffix equals (month, day) order.
pub const MONTH_DAY_WIDTH: usize = 5;

/// Stored source-record id meaning "no record at the origin store"
pub const NO_SOURCE_RECORD_ID: i64 = -1;

/// Raw event type tags as persisted by the event store
pub const TYPE_CUSTOM: i32 = 0;
pub const TYPE_ANNIVERSARY: i32 = 1;
pub const TYPE_OTHER: i32 = 2;
pub const TYPE_BIRTHDAY: i32 = 3;

/// How far ahead the closest-celebration lookup searches for name-days
pub const DEFAULT_NAMEDAY_LOOKAHEAD_WEEKS: u16 = 4;
