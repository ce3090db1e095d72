use chrono::{Datelike, Timelike};

// Longest tokens first so `YYYY` is not read as two `YY`
const TOKENS: [&str; 7] = ["YYYY", "YY", "MM", "DD", "HH", "mm", "ss"];

/// Render `value` with a `YYYY/MM/DD HH:mm` style format string.
///
/// Recognised tokens are `YYYY`, `YY`, `MM`, `DD`, `HH` (24h), `mm` and `ss`.
/// Everything else is copied as is.
pub fn format_clock<T>(format: &str, value: &T) -> String
where
    T: Datelike + Timelike,
{
    let mut out = String::with_capacity(format.len() + 4);
    let mut rest = format;

    while !rest.is_empty() {
        match TOKENS.iter().find(|token| rest.starts_with(**token)) {
            Some(token) => {
                push_token(&mut out, token, value);
                rest = &rest[token.len()..];
            }
            None => {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    out.push(c);
                }
                rest = chars.as_str();
            }
        }
    }

    out
}

fn push_token<T>(out: &mut String, token: &str, value: &T)
where
    T: Datelike + Timelike,
{
    let rendered = match token {
        "YYYY" => format!("{:04}", value.year()),
        "YY" => format!("{:02}", value.year().rem_euclid(100)),
        "MM" => format!("{:02}", value.month()),
        "DD" => format!("{:02}", value.day()),
        "HH" => format!("{:02}", value.hour()),
        "mm" => format!("{:02}", value.minute()),
        "ss" => format!("{:02}", value.second()),
        _ => token.to_string(),
    };
    out.push_str(&rendered);
}
