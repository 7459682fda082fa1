//! Date formatting with `yyyy-MM-dd hh:mm:ss` style patterns
//!
//! | Token | Value |
//! |-------|-------|
//! | `y`/`Y` | year, truncated to as many trailing digits as letters |
//! | `M` | month (1-12) |
//! | `d` | day of month |
//! | `h` | hour (0-23) |
//! | `m` | minute |
//! | `s` | second |
//! | `q` | quarter (1-4) |
//! | `S` | millisecond |
//!
//! A single letter prints the plain number; two or more letters print it as
//! two zero-padded digits. Anything else is copied through.
//!
//! ```
//! use chrono::NaiveDate;
//! use forumkit::formatting::date_format;
//!
//! let t = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap().and_hms_opt(9, 5, 0).unwrap();
//! assert_eq!(date_format(&t, "yyyy-MM-dd hh:mm"), "2024-03-07 09:05");
//! assert_eq!(date_format(&t, "yy/M/d"), "24/3/7");
//! ```

use chrono::{Datelike, Timelike};
use logos::Logos;

pub const DEFAULT_PATTERN: &str = "yyyy-MM-dd hh:mm:ss";

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    #[regex("[yY]+", |lex| lex.slice().len())]
    Year(usize),
    #[regex("M+", |lex| lex.slice().len())]
    Month(usize),
    #[regex("d+", |lex| lex.slice().len())]
    Day(usize),
    #[regex("h+", |lex| lex.slice().len())]
    Hour(usize),
    #[regex("m+", |lex| lex.slice().len())]
    Minute(usize),
    #[regex("s+", |lex| lex.slice().len())]
    Second(usize),
    #[regex("q+", |lex| lex.slice().len())]
    Quarter(usize),
    #[regex("S+", |lex| lex.slice().len())]
    Millisecond(usize),
    #[regex("[^yYMdhmsqS]+")]
    Literal,
}

/// Formats `time` according to `pattern`
pub fn date_format<T: Datelike + Timelike>(time: &T, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut lex = Token::lexer(pattern);

    while let Some(token) = lex.next() {
        let (width, value) = match token {
            Ok(Token::Year(width)) => {
                let year = time.year().to_string();
                let skip = year.len().saturating_sub(width);
                out.push_str(&year[skip..]);
                continue;
            }
            Ok(Token::Month(w)) => (w, time.month()),
            Ok(Token::Day(w)) => (w, time.day()),
            Ok(Token::Hour(w)) => (w, time.hour()),
            Ok(Token::Minute(w)) => (w, time.minute()),
            Ok(Token::Second(w)) => (w, time.second()),
            Ok(Token::Quarter(w)) => (w, (time.month() + 2) / 3),
            // Leap seconds report nanos past 1e9
            Ok(Token::Millisecond(w)) => (w, (time.nanosecond() / 1_000_000).min(999)),
            Ok(Token::Literal) | Err(()) => {
                out.push_str(lex.slice());
                continue;
            }
        };
        push_number(&mut out, width, value);
    }
    out
}

fn push_number(out: &mut String, width: usize, value: u32) {
    let digits = if width == 1 {
        value.to_string()
    } else {
        format!("{:02}", value % 100)
    };
    out.push_str(&digits);
}
