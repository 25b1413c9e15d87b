//! Date values as search engines accept them: a date in one of the field's
//! formats, or `now`, optionally followed by date math.
//!
//! ```text
//! now-1d/d                 yesterday, midnight
//! 2022-01-31||+1M          2022-02-28
//! 1500000000000            epoch millis with the default format
//! ```
//!
//! Formats are Joda style patterns (`yyyy-MM-dd'T'HH:mm:ss`) or one of the
//! named formats: `epoch_second`, `epoch_millis`, `strict_date_optional_time`,
//! `date_optional_time`, `strict_date`, `date`, `basic_date`,
//! `date_hour_minute_second`, `strict_date_hour_minute_second`.

use chrono::{
    DateTime, Datelike, Days, Duration, Months, NaiveDate, TimeZone, Timelike, Utc,
};
use nom::{
    branch::alt,
    character::complete::{anychar, char, digit1, one_of},
    combinator::{all_consuming, map, map_opt, map_res, opt},
    multi::many0,
    sequence::{preceded, tuple},
    IResult,
};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DateMathError {
    #[error("invalid date format `{pattern}`: {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("`{value}` does not match `{format}`: {reason}")]
    Format {
        value: String,
        format: String,
        reason: String,
    },

    #[error("invalid date math `{0}`")]
    Math(String),

    #[error("date math `{0}` is out of range")]
    OutOfRange(String),
}

/// Evaluates a date expression against a field's formats.
pub trait DateMath {
    fn evaluate(&self, expr: &str, formats: &[&str]) -> Result<DateTime<Utc>, DateMathError>;
}

pub const DEFAULT_FORMATS: [&str; 2] = ["strict_date_optional_time", "epoch_millis"];

/// The stock evaluator. `now` is the wall clock unless pinned.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use lucene2sql::datemath::{DateMath, DateMathParser};
///
/// let parser = DateMathParser::new().with_now(Utc.with_ymd_and_hms(2022, 2, 3, 10, 20, 30).unwrap());
/// let dt = parser.evaluate("now-1d/d", &[]).unwrap();
///
/// assert_eq!(dt.to_string(), "2022-02-02 00:00:00 UTC");
/// ```
#[derive(Debug, Default, Clone)]
pub struct DateMathParser {
    now: Option<DateTime<Utc>>,
}

impl DateMathParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

impl DateMath for DateMathParser {
    fn evaluate(&self, expr: &str, formats: &[&str]) -> Result<DateTime<Utc>, DateMathError> {
        let expr = expr.trim();
        let (anchor, math) = if let Some(math) = expr.strip_prefix("now") {
            (self.now(), math)
        } else if let Some((date, math)) = expr.split_once("||") {
            (parse_date(date, formats)?, math)
        } else {
            (parse_date(expr, formats)?, "")
        };

        let (_, ops) = math_ops(math).map_err(|_| DateMathError::Math(math.to_string()))?;
        ops.into_iter().try_fold(anchor, |dt, op| {
            op.apply(dt)
                .ok_or_else(|| DateMathError::OutOfRange(expr.to_string()))
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Unit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl Unit {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'y' => Some(Unit::Year),
            'M' => Some(Unit::Month),
            'w' => Some(Unit::Week),
            'd' => Some(Unit::Day),
            'h' | 'H' => Some(Unit::Hour),
            'm' => Some(Unit::Minute),
            's' => Some(Unit::Second),
            _ => None,
        }
    }

    fn seconds(self) -> Option<i64> {
        match self {
            Unit::Week => Some(7 * 24 * 3600),
            Unit::Day => Some(24 * 3600),
            Unit::Hour => Some(3600),
            Unit::Minute => Some(60),
            Unit::Second => Some(1),
            Unit::Year | Unit::Month => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Op {
    Add(i64, Unit),
    Round(Unit),
}

impl Op {
    fn apply(self, dt: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Op::Add(n, Unit::Year) => add_months(dt, n.checked_mul(12)?),
            Op::Add(n, Unit::Month) => add_months(dt, n),
            Op::Add(n, unit) => {
                let secs = n.checked_mul(unit.seconds()?)?;
                dt.checked_add_signed(Duration::try_seconds(secs)?)
            }
            Op::Round(unit) => round_down(dt, unit),
        }
    }
}

fn add_months(dt: DateTime<Utc>, n: i64) -> Option<DateTime<Utc>> {
    let months = Months::new(u32::try_from(n.unsigned_abs()).ok()?);
    if n < 0 {
        dt.checked_sub_months(months)
    } else {
        dt.checked_add_months(months)
    }
}

fn round_down(dt: DateTime<Utc>, unit: Unit) -> Option<DateTime<Utc>> {
    let date = dt.date_naive();
    let naive = match unit {
        Unit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)?.and_hms_opt(0, 0, 0)?,
        Unit::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?.and_hms_opt(0, 0, 0)?,
        Unit::Week => date
            .checked_sub_days(Days::new(date.weekday().num_days_from_monday().into()))?
            .and_hms_opt(0, 0, 0)?,
        Unit::Day => date.and_hms_opt(0, 0, 0)?,
        Unit::Hour => date.and_hms_opt(dt.hour(), 0, 0)?,
        Unit::Minute => date.and_hms_opt(dt.hour(), dt.minute(), 0)?,
        Unit::Second => date.and_hms_opt(dt.hour(), dt.minute(), dt.second())?,
    };
    Some(Utc.from_utc_datetime(&naive))
}

fn unit(input: &str) -> IResult<&str, Unit> {
    map_opt(anychar, Unit::from_char)(input)
}

fn math_op(input: &str) -> IResult<&str, Op> {
    alt((
        map_res(
            tuple((one_of("+-"), opt(digit1), unit)),
            |(sign, n, unit)| {
                let n = n.map_or(Ok(1), str::parse::<i64>)?;
                let n = if sign == '-' { -n } else { n };
                Ok::<_, std::num::ParseIntError>(Op::Add(n, unit))
            },
        ),
        map(preceded(char('/'), unit), Op::Round),
    ))(input)
}

fn math_ops(input: &str) -> IResult<&str, Vec<Op>> {
    all_consuming(many0(math_op))(input)
}

const DATE_OPTIONAL_TIME: &[&str] = &[
    "yyyy-MM-dd'T'HH:mm:ss.SSSZ",
    "yyyy-MM-dd'T'HH:mm:ss.SSS",
    "yyyy-MM-dd'T'HH:mm:ssZ",
    "yyyy-MM-dd'T'HH:mm:ss",
    "yyyy-MM-dd'T'HH:mmZ",
    "yyyy-MM-dd'T'HH:mm",
    "yyyy-MM-dd'T'HH",
    "yyyy-MM-dd",
    "yyyy-MM",
    "yyyy",
];

enum Format<'a> {
    EpochSecond,
    EpochMillis,
    Named { patterns: &'static [&'static str], strict: bool },
    Pattern(&'a str),
}

impl<'a> Format<'a> {
    fn new(name: &'a str) -> Self {
        match name {
            "epoch_second" => Format::EpochSecond,
            "epoch_millis" => Format::EpochMillis,
            "strict_date_optional_time" => Format::Named {
                patterns: DATE_OPTIONAL_TIME,
                strict: true,
            },
            "date_optional_time" => Format::Named {
                patterns: DATE_OPTIONAL_TIME,
                strict: false,
            },
            "strict_date" => Format::Named {
                patterns: &["yyyy-MM-dd"],
                strict: true,
            },
            "date" => Format::Named {
                patterns: &["yyyy-MM-dd"],
                strict: false,
            },
            "basic_date" => Format::Named {
                patterns: &["yyyyMMdd"],
                strict: true,
            },
            "strict_date_hour_minute_second" => Format::Named {
                patterns: &["yyyy-MM-dd'T'HH:mm:ss"],
                strict: true,
            },
            "date_hour_minute_second" => Format::Named {
                patterns: &["yyyy-MM-dd'T'HH:mm:ss"],
                strict: false,
            },
            pattern => Format::Pattern(pattern),
        }
    }

    fn parse(&self, value: &str) -> Result<Result<DateTime<Utc>, String>, DateMathError> {
        Ok(match self {
            Format::EpochSecond => epoch(value, |n| Utc.timestamp_opt(n, 0).single()),
            Format::EpochMillis => epoch(value, |n| Utc.timestamp_millis_opt(n).single()),
            Format::Named { patterns, strict } => {
                let mut last = Err(String::new());
                for pattern in patterns.iter() {
                    last = parse_pattern(value, &compile(pattern)?, *strict);
                    if last.is_ok() {
                        break;
                    }
                }
                last
            }
            Format::Pattern(pattern) => parse_pattern(value, &compile(pattern)?, false),
        })
    }
}

fn epoch<F>(value: &str, f: F) -> Result<DateTime<Utc>, String>
where
    F: Fn(i64) -> Option<DateTime<Utc>>,
{
    let n = value
        .parse::<i64>()
        .map_err(|e| format!("not an epoch: {}", e))?;
    f(n).ok_or_else(|| "epoch out of range".to_string())
}

/// Tries each format in turn, the first match wins.
fn parse_date(value: &str, formats: &[&str]) -> Result<DateTime<Utc>, DateMathError> {
    let formats = if formats.is_empty() {
        &DEFAULT_FORMATS[..]
    } else {
        formats
    };
    let mut reason = String::from("empty date");
    if !value.is_empty() {
        for format in formats {
            match Format::new(format).parse(value)? {
                Ok(dt) => return Ok(dt),
                Err(e) => reason = e,
            }
        }
    }
    Err(DateMathError::Format {
        value: value.to_string(),
        format: formats.join("||"),
        reason,
    })
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(String),
    Field(char, usize),
}

impl Token {
    fn is_numeric(&self) -> bool {
        match self {
            Token::Field('a' | 'Z', _) => false,
            Token::Field('M', width) => *width < 3,
            Token::Field(..) => true,
            Token::Literal(_) => false,
        }
    }
}

const PATTERN_LETTERS: &str = "yYMdHhmsSaZ";

fn push_literal(tokens: &mut Vec<Token>, lit: &str) {
    match tokens.last_mut() {
        Some(Token::Literal(prev)) => prev.push_str(lit),
        _ => tokens.push(Token::Literal(lit.to_string())),
    }
}

fn compile(pattern: &str) -> Result<Vec<Token>, DateMathError> {
    let err = |reason: String| DateMathError::Pattern {
        pattern: pattern.to_string(),
        reason,
    };
    let mut tokens = Vec::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            // `''` is a quote, inside or outside a quoted run
            if chars.peek() == Some(&'\'') {
                chars.next();
                push_literal(&mut tokens, "'");
                continue;
            }
            let mut lit = String::new();
            loop {
                match chars.next() {
                    None => return Err(err("unterminated quote".into())),
                    Some('\'') if chars.peek() == Some(&'\'') => {
                        chars.next();
                        lit.push('\'');
                    }
                    Some('\'') => break,
                    Some(c) => lit.push(c),
                }
            }
            push_literal(&mut tokens, &lit);
        } else if c.is_ascii_alphabetic() {
            if !PATTERN_LETTERS.contains(c) {
                return Err(err(format!("unsupported pattern letter `{}`", c)));
            }
            let mut width = 1;
            while chars.peek() == Some(&c) {
                chars.next();
                width += 1;
            }
            tokens.push(Token::Field(c, width));
        } else {
            push_literal(&mut tokens, c.encode_utf8(&mut [0; 4]));
        }
    }
    Ok(tokens)
}

const MONTHS: [&str; 12] = [
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

/// Date fields collected while matching a pattern. A field seen twice keeps
/// the last value, fields never seen keep the epoch.
#[derive(Debug)]
struct Fields {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    hour12: Option<u32>,
    pm: bool,
    minute: u32,
    second: u32,
    nano: u32,
    offset: i64,
}

impl Default for Fields {
    fn default() -> Self {
        Self {
            year: 1970,
            month: 1,
            day: 1,
            hour: 0,
            hour12: None,
            pm: false,
            minute: 0,
            second: 0,
            nano: 0,
            offset: 0,
        }
    }
}

fn take_digits(input: &str, min: usize, max: usize) -> Result<(&str, &str), String> {
    let len = input
        .bytes()
        .take(max)
        .take_while(u8::is_ascii_digit)
        .count();
    if len < min {
        return Err(format!("expected {} digit(s) at `{}`", min, input));
    }
    Ok(input.split_at(len))
}

fn starts_with_ignore_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .map_or(false, |s| s.eq_ignore_ascii_case(prefix))
}

impl Fields {
    fn parse_field<'a>(
        &mut self,
        letter: char,
        width: usize,
        fixed: bool,
        input: &'a str,
    ) -> Result<&'a str, String> {
        match letter {
            'a' => {
                if starts_with_ignore_case(input, "am") {
                    self.pm = false;
                } else if starts_with_ignore_case(input, "pm") {
                    self.pm = true;
                } else {
                    return Err(format!("expected AM/PM at `{}`", input));
                }
                Ok(&input[2..])
            }
            'Z' => self.parse_offset(input),
            'M' if width >= 3 => {
                for (i, name) in MONTHS.iter().enumerate() {
                    for name in [*name, &name[..3]] {
                        if starts_with_ignore_case(input, name) {
                            self.month = i as u32 + 1;
                            return Ok(&input[name.len()..]);
                        }
                    }
                }
                Err(format!("expected month name at `{}`", input))
            }
            _ => {
                let (min, max) = match letter {
                    'S' => (1, 9),
                    _ if fixed => (width, width),
                    'y' | 'Y' => (1, width.max(9)),
                    _ => (1, width.max(2)),
                };
                let (digits, rest) = take_digits(input, min, max)?;
                let n: u32 = digits.parse().map_err(|e| format!("{}", e))?;
                match letter {
                    'y' | 'Y' => self.year = n as i32,
                    'M' => self.month = n,
                    'd' => self.day = n,
                    'H' => {
                        self.hour = n;
                        self.hour12 = None;
                    }
                    'h' => self.hour12 = Some(n),
                    'm' => self.minute = n,
                    's' => self.second = n,
                    'S' => self.nano = n * 10u32.pow(9 - digits.len() as u32),
                    _ => return Err(format!("unsupported pattern letter `{}`", letter)),
                }
                Ok(rest)
            }
        }
    }

    fn parse_offset<'a>(&mut self, input: &'a str) -> Result<&'a str, String> {
        if let Some(rest) = input.strip_prefix('Z') {
            self.offset = 0;
            return Ok(rest);
        }
        let sign = match input.chars().next() {
            Some('+') => 1,
            Some('-') => -1,
            _ => return Err(format!("expected zone offset at `{}`", input)),
        };
        let (hh, rest) = take_digits(&input[1..], 2, 2)?;
        let rest = rest.strip_prefix(':').unwrap_or(rest);
        let (mm, rest) = take_digits(rest, 0, 2)?;
        let hh: i64 = hh.parse().map_err(|e| format!("{}", e))?;
        let mm: i64 = if mm.is_empty() {
            0
        } else {
            mm.parse().map_err(|e| format!("{}", e))?
        };
        if hh > 23 || mm > 59 {
            return Err(format!("zone offset out of range at `{}`", input));
        }
        self.offset = sign * (hh * 3600 + mm * 60);
        Ok(rest)
    }

    fn resolve(self) -> Result<DateTime<Utc>, String> {
        let hour = match self.hour12 {
            Some(h) if (1..=12).contains(&h) => h % 12 + if self.pm { 12 } else { 0 },
            Some(h) => return Err(format!("clock hour {} out of range", h)),
            None => self.hour,
        };
        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(|| {
            format!(
                "no such date {:04}-{:02}-{:02}",
                self.year, self.month, self.day
            )
        })?;
        let naive = date
            .and_hms_nano_opt(hour, self.minute, self.second, self.nano)
            .ok_or_else(|| {
                format!(
                    "no such time {:02}:{:02}:{:02}",
                    hour, self.minute, self.second
                )
            })?;
        let utc = Duration::try_seconds(self.offset)
            .and_then(|offset| naive.checked_sub_signed(offset))
            .ok_or_else(|| "date out of range".to_string())?;
        Ok(Utc.from_utc_datetime(&utc))
    }
}

fn parse_pattern(value: &str, tokens: &[Token], strict: bool) -> Result<DateTime<Utc>, String> {
    let mut fields = Fields::default();
    let mut rest = value;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Literal(lit) => {
                rest = rest
                    .strip_prefix(lit.as_str())
                    .ok_or_else(|| format!("expected `{}` at `{}`", lit, rest))?;
            }
            Token::Field(letter, width) => {
                // adjacent numeric fields can only be told apart by width
                let fixed = strict || tokens.get(i + 1).map_or(false, Token::is_numeric);
                rest = fields.parse_field(*letter, *width, fixed, rest)?;
            }
        }
    }
    if !rest.is_empty() {
        return Err(format!("unexpected `{}`", rest));
    }
    fields.resolve()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::datemath::{DateMath, DateMathError, DateMathParser};

    fn parser() -> DateMathParser {
        DateMathParser::new().with_now(Utc.with_ymd_and_hms(2022, 2, 3, 10, 20, 30).unwrap())
    }

    #[test]
    fn test_formats() {
        let tests = [
            ("2022-02-03", "yyyy-MM-dd", "2022-02-03 00:00:00"),
            ("2001-01-01 08:08:08", "yyyy-MM-dd HH:mm:ss", "2001-01-01 08:08:08"),
            ("2001-01-01T09", "yyyy-HH-dd'T'HH", "2001-01-01 09:00:00"),
            ("67", "epoch_second", "1970-01-01 00:01:07"),
            ("1500000000000", "epoch_millis", "2017-07-14 02:40:00"),
            ("-1000", "epoch_millis", "1969-12-31 23:59:59"),
            ("20220203", "basic_date", "2022-02-03 00:00:00"),
            ("2022-02-03", "strict_date", "2022-02-03 00:00:00"),
            ("2022-2-3", "date", "2022-02-03 00:00:00"),
            ("2022-02-03T10:20:30", "strict_date_hour_minute_second", "2022-02-03 10:20:30"),
            ("2017-07-14T10:40:00+08:00", "strict_date_optional_time", "2017-07-14 02:40:00"),
            ("2017-07-14T02:40:00.5Z", "strict_date_optional_time", "2017-07-14 02:40:00"),
            ("2017-07-14T02:40-0130", "strict_date_optional_time", "2017-07-14 04:10:00"),
            ("2017-07", "strict_date_optional_time", "2017-07-01 00:00:00"),
            ("2017-7-4T2", "date_optional_time", "2017-07-04 02:00:00"),
            ("03/Feb/2022", "dd/MMM/yyyy", "2022-02-03 00:00:00"),
            ("3 february 2022", "d MMMM yyyy", "2022-02-03 00:00:00"),
            ("02:05 PM 2022-02-03", "hh:mm a yyyy-MM-dd", "2022-02-03 14:05:00"),
            ("12:05 am 2022-02-03", "hh:mm a yyyy-MM-dd", "2022-02-03 00:05:00"),
            ("at 2022'02", "'at' yyyy''MM", "2022-02-01 00:00:00"),
            ("1500000000000", "strict_date_optional_time||epoch_millis", "2017-07-14 02:40:00"),
            ("2022-02-03", "epoch_millis||yyyy-MM-dd", "2022-02-03 00:00:00"),
        ];
        let parser = parser();
        for (value, format, expected) in tests {
            let formats: Vec<&str> = format.split("||").collect();
            let dt = parser.evaluate(value, &formats).unwrap();
            assert_eq!(
                dt.format("%Y-%m-%d %H:%M:%S").to_string(),
                expected,
                "{} {}",
                value,
                format
            );
        }
    }

    #[test]
    fn test_format_errors() {
        let tests = [
            ("2001-01-01 09:88:66", "yyyy-HH-dd'T'HH"),
            ("2001-01-01 09:88:66", "yyyy-MM-dd HH:mm:ss"),
            ("2022-02-03T09:00:88", "yyyy-MM-dd'T'HH"),
            ("2022-02-30", "yyyy-MM-dd"),
            ("2022-2-3", "strict_date"),
            ("13:00 PM 2022-02-03", "hh:mm a yyyy-MM-dd"),
            ("", "yyyy-MM-dd"),
            ("abc", "epoch_second"),
            ("2017-07-14T02:40+25:00", "strict_date_optional_time"),
        ];
        let parser = parser();
        for (value, format) in tests {
            let formats: Vec<&str> = format.split("||").collect();
            assert!(
                matches!(
                    parser.evaluate(value, &formats),
                    Err(DateMathError::Format { .. })
                ),
                "{} {}",
                value,
                format
            );
        }
    }

    #[test]
    fn test_bad_patterns() {
        let parser = parser();
        assert_eq!(
            parser.evaluate("2022-02-03", &["yyyy-MM-dd'T"]),
            Err(DateMathError::Pattern {
                pattern: "yyyy-MM-dd'T".to_string(),
                reason: "unterminated quote".to_string(),
            })
        );
        assert!(matches!(
            parser.evaluate("2022-02-03 Thu", &["yyyy-MM-dd EEE"]),
            Err(DateMathError::Pattern { .. })
        ));
    }

    #[test]
    fn test_date_math() {
        let tests = [
            ("now", "2022-02-03 10:20:30"),
            ("now-1d/d", "2022-02-02 00:00:00"),
            ("now+1M", "2022-03-03 10:20:30"),
            ("now-1y", "2021-02-03 10:20:30"),
            ("now/w", "2022-01-31 00:00:00"),
            ("now/y", "2022-01-01 00:00:00"),
            ("now/M", "2022-02-01 00:00:00"),
            ("now/H", "2022-02-03 10:00:00"),
            ("now-2h+30m/m", "2022-02-03 08:50:00"),
            ("now+1w-3s", "2022-02-10 10:20:27"),
            ("now+d", "2022-02-04 10:20:30"),
            ("2022-01-31||+1M", "2022-02-28 00:00:00"),
            ("2022-01-31||/M", "2022-01-01 00:00:00"),
            ("2022-01-31||", "2022-01-31 00:00:00"),
        ];
        let parser = parser();
        for (expr, expected) in tests {
            let dt = parser.evaluate(expr, &["yyyy-MM-dd"]).unwrap();
            assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), expected, "{}", expr);
        }
    }

    #[test]
    fn test_date_math_errors() {
        let parser = parser();
        assert_eq!(
            parser.evaluate("now+1x", &[]),
            Err(DateMathError::Math("+1x".to_string()))
        );
        assert_eq!(
            parser.evaluate("now/", &[]),
            Err(DateMathError::Math("/".to_string()))
        );
        assert_eq!(
            parser.evaluate("now+99999999999999y", &[]),
            Err(DateMathError::OutOfRange("now+99999999999999y".to_string()))
        );
    }

    #[test]
    fn test_default_formats() {
        let parser = parser();
        let dt = parser.evaluate("2022-02-03T10:20:30Z", &[]).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2022, 2, 3, 10, 20, 30).unwrap());
        let dt = parser.evaluate("67000", &[]).unwrap();
        assert_eq!(dt, Utc.timestamp_opt(67, 0).unwrap());
    }
}
