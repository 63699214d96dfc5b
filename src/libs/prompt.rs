//! Interactive form fields built on `dialoguer`.
//!
//! Every field is pre-filled with the current value so that pressing enter
//! keeps it. Optional fields accept an empty answer, which clears the value.

use crate::libs::dates::{format_date, format_time, parse_date, parse_optional_date, parse_optional_time};
use crate::libs::messages::Message;
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::fmt::Display;
use std::str::FromStr;

pub fn text(prompt: &str, current: &str) -> Result<String> {
    Ok(Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(current.to_string())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("A value is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?
        .trim()
        .to_string())
}

pub fn optional_text(prompt: &str, current: &Option<String>) -> Result<Option<String>> {
    let value = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(current.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

pub fn optional_number<T>(prompt: &str, current: Option<T>) -> Result<Option<T>>
where
    T: FromStr + Display + 'static,
{
    let value = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(current.map(|v| v.to_string()).unwrap_or_default())
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() || input.trim().parse::<T>().is_ok() {
                Ok(())
            } else {
                Err("Enter a number or leave blank")
            }
        })
        .interact_text()?;
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    Ok(value.parse::<T>().ok())
}

pub fn date(prompt: &str, current: NaiveDate) -> Result<NaiveDate> {
    let value = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(current.format("%Y-%m-%d").to_string())
        .validate_with(|input: &String| -> Result<(), String> { parse_date(input).map(|_| ()).map_err(|e| e.to_string()) })
        .interact_text()?;
    parse_date(&value)
}

pub fn optional_date(prompt: &str, current: Option<NaiveDate>) -> Result<Option<NaiveDate>> {
    let value = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(format_date(current))
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> { parse_optional_date(input).map(|_| ()).map_err(|e| e.to_string()) })
        .interact_text()?;
    parse_optional_date(&value)
}

pub fn optional_time(prompt: &str, current: Option<NaiveTime>) -> Result<Option<NaiveTime>> {
    let value = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(format_time(current))
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> { parse_optional_time(input).map(|_| ()).map_err(|e| e.to_string()) })
        .interact_text()?;
    parse_optional_time(&value)
}

/// Picks one of `options`, starting at `current` when it is among them.
pub fn choice(prompt: &str, options: &[&str], current: &str) -> Result<String> {
    let default = options.iter().position(|o| o.eq_ignore_ascii_case(current)).unwrap_or(0);
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(options)
        .default(default)
        .interact()?;
    Ok(options[selection].to_string())
}

const NO_CHOICE: &str = "(none)";

/// Like [`choice`], with a leading "(none)" entry so a blank value stays blank.
pub fn optional_choice(prompt: &str, options: &[&str], current: Option<&str>) -> Result<Option<String>> {
    let items: Vec<&str> = std::iter::once(NO_CHOICE).chain(options.iter().copied()).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(optional_default(options, current))
        .interact()?;
    Ok(optional_selection(options, selection))
}

fn optional_default(options: &[&str], current: Option<&str>) -> usize {
    current
        .and_then(|value| options.iter().position(|o| o.eq_ignore_ascii_case(value)))
        .map_or(0, |index| index + 1)
}

fn optional_selection(options: &[&str], selection: usize) -> Option<String> {
    selection.checked_sub(1).and_then(|index| options.get(index)).map(|o| o.to_string())
}

pub fn flag(prompt: &str, current: bool) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default()).with_prompt(prompt).default(current).interact()?)
}

/// Asks before deleting; `assume_yes` skips the question.
pub fn confirm_delete(label: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::ConfirmDelete(label.to_string()).to_string())
        .default(false)
        .interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: &[&str] = &["Normal Day", "Holiday"];

    #[test]
    fn test_blank_optional_choice_defaults_to_none() {
        assert_eq!(optional_default(KINDS, None), 0);
        assert_eq!(optional_default(KINDS, Some("")), 0);
        assert_eq!(optional_selection(KINDS, 0), None);
    }

    #[test]
    fn test_optional_choice_keeps_current_value() {
        let default = optional_default(KINDS, Some("holiday"));
        assert_eq!(default, 2);
        assert_eq!(optional_selection(KINDS, default).as_deref(), Some("Holiday"));
        assert_eq!(optional_selection(KINDS, 9), None);
    }
}
