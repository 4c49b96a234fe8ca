//! Small formatting and validation helpers shared by listing cards, onboarding
//! steps, and settings views.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Join a list into a readable enumeration.
///
/// `["apples", "oranges"]` becomes `"apples and oranges"`, three or more items
/// use commas with the join word before the last item.
pub fn format_enumeration<S: AsRef<str>>(list: &[S], join_word: &str) -> String {
    match list {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} {join_word} {}", first.as_ref(), second.as_ref()),
        [head @ .., last] => {
            let head: Vec<&str> = head.iter().map(|item| item.as_ref()).collect();
            format!("{}, {join_word} {}", head.join(", "), last.as_ref())
        }
    }
}

/// Pick one of three labels depending on whether the value is true, false, or unknown.
pub fn format_truthy<'a>(
    value: Option<bool>,
    truthy: &'a str,
    falsy: &'a str,
    unknown: &'a str,
) -> &'a str {
    match value {
        Some(true) => truthy,
        Some(false) => falsy,
        None => unknown,
    }
}

/// Describe the time commitment of a case from its weekly hours and duration.
pub fn parse_time_commitment(hours_per_week: Option<u32>, num_weeks: Option<u32>) -> String {
    let Some(weeks) = num_weeks else {
        return match hours_per_week {
            Some(hours) => format!("{hours} hours/week"),
            None => "To Be Determined".to_string(),
        };
    };

    let monthly = weeks > 4;
    let unit = if monthly { "month" } else { "week" };
    let span = if monthly {
        f64::from(weeks) / 4.0
    } else {
        f64::from(weeks)
    };
    let plural = if span > 1.0 { "s" } else { "" };
    let span = format_quantity(span);

    match hours_per_week {
        None => format!("{span} {unit}{plural}"),
        Some(hours) => {
            let rate = if monthly { hours.saturating_mul(4) } else { hours };
            format!("{rate} hours/{unit} for {span} {unit}{plural}")
        }
    }
}

fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as u64)
    } else {
        format!("{value}")
    }
}

/// Label the roles a case needs. Cards use the compact form.
pub fn parse_roles_needed(card: bool, attorney: Option<bool>, interpreter: Option<bool>) -> &'static str {
    let attorney = attorney.unwrap_or(false);
    let interpreter = interpreter.unwrap_or(false);

    if attorney && interpreter {
        return if card {
            "Interpreter & Attorney"
        } else {
            "Attorney, Interpreter"
        };
    }

    if interpreter {
        "Interpreter"
    } else {
        "Attorney"
    }
}

/// Bar numbers are one to six ASCII digits.
pub fn is_valid_bar_number(candidate: &str) -> bool {
    (1..=6).contains(&candidate.len()) && candidate.bytes().all(|b| b.is_ascii_digit())
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A date counts as upcoming when it is today or later.
pub fn is_upcoming_date(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today
}

/// Render an optional timestamp as `m/d/yyyy`.
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => ts.format("%-m/%-d/%Y").to_string(),
        None => "Not Available".to_string(),
    }
}

/// One page of dropdown options after applying a search string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionPage {
    pub options: Vec<String>,
    pub has_more: bool,
}

/// Case-insensitive substring search over `options`, returning the page that
/// starts at `offset`.
pub fn filter_and_paginate(
    options: &[String],
    search: &str,
    offset: usize,
    page_size: usize,
) -> OptionPage {
    let needle = search.to_lowercase();
    let matching: Vec<&String> = if search.is_empty() {
        options.iter().collect()
    } else {
        options
            .iter()
            .filter(|option| option.to_lowercase().contains(&needle))
            .collect()
    };

    let has_more = matching.len().saturating_sub(offset) > page_size;
    let options = matching
        .into_iter()
        .skip(offset)
        .take(page_size)
        .cloned()
        .collect();

    OptionPage { options, has_more }
}
