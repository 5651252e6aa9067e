//! Scheduling rules sent alongside the roster

use chrono::{Datelike, Month, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use crate::config::RulesConfig;

pub const MONTHS: [&str; 12] = [
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

pub const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Resolve a month given as a name, a three-letter abbreviation, or 1-12
pub fn normalize_month(input: &str) -> Option<&'static str> {
    let s = input.trim();
    if let Ok(n) = s.parse::<usize>() {
        return (1..=12).contains(&n).then(|| MONTHS[n - 1]);
    }
    let month = s.parse::<Month>().ok()?;
    Some(MONTHS[month.number_from_month() as usize - 1])
}

/// 1-based month number for a month name
pub fn month_number(name: &str) -> Option<u32> {
    let name = normalize_month(name)?;
    MONTHS.iter().position(|m| *m == name).map(|i| i as u32 + 1)
}

/// Resolve a weekday given as a full name or a three-letter abbreviation
pub fn normalize_weekday(input: &str) -> Option<&'static str> {
    let day = input.trim().parse::<Weekday>().ok()?;
    Some(WEEKDAYS[day.num_days_from_monday() as usize])
}

/// Split free text on newlines and commas into trimmed, non-empty entries
pub fn parse_holiday_lines(text: &str) -> Vec<String> {
    text.split(['\n', ','])
        .map(|s| s.trim().trim_end_matches('\r').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRules {
    pub year: i32,
    /// Lower-case English month name
    pub month: String,
    pub start_day: u32,
    pub public_holidays: Vec<String>,
    pub excluded_weekdays: Vec<String>,
    pub local_off_days: u32,
    pub overseas_off_days: u32,
    pub driver_percentage_cap: f64,
}

impl ScheduleRules {
    /// Rules for the given month, other fields from configured defaults
    pub fn from_config(defaults: &RulesConfig, year: i32, month: &str) -> Self {
        let mut rules = Self {
            year,
            month: month.trim().to_lowercase(),
            start_day: defaults.start_day,
            public_holidays: Vec::new(),
            excluded_weekdays: Vec::new(),
            local_off_days: defaults.local_off_days,
            overseas_off_days: defaults.overseas_off_days,
            driver_percentage_cap: defaults.driver_percentage_cap,
        };
        for day in &defaults.excluded_weekdays {
            if !rules.exclude_weekday(day) {
                // Kept as given so validate() names it
                log::warn!("Unknown excluded weekday in config: {}", day);
                rules.excluded_weekdays.push(day.trim().to_lowercase());
            }
        }
        if let Some(name) = normalize_month(month) {
            rules.month = name.to_string();
        }
        rules
    }

    /// Rules for the current calendar month
    pub fn current_month(defaults: &RulesConfig) -> Self {
        let today = chrono::Local::now().date_naive();
        Self::from_config(defaults, today.year(), MONTHS[today.month0() as usize])
    }

    /// Add a holiday; the list stays deduplicated and sorted
    pub fn add_holiday(&mut self, date: &str) {
        let date = date.trim();
        if date.is_empty() {
            return;
        }
        if !self.public_holidays.iter().any(|d| d == date) {
            self.public_holidays.push(date.to_string());
            self.public_holidays.sort();
        }
    }

    pub fn remove_holiday(&mut self, date: &str) {
        self.public_holidays.retain(|d| d != date.trim());
    }

    pub fn add_holidays_from_text(&mut self, text: &str) {
        for date in parse_holiday_lines(text) {
            self.add_holiday(&date);
        }
    }

    /// Returns false for an unrecognized weekday name
    pub fn exclude_weekday(&mut self, day: &str) -> bool {
        let Some(day) = normalize_weekday(day) else {
            return false;
        };
        if !self.excluded_weekdays.iter().any(|d| d == day) {
            self.excluded_weekdays.push(day.to_string());
        }
        true
    }

    pub fn include_weekday(&mut self, day: &str) {
        if let Some(day) = normalize_weekday(day) {
            self.excluded_weekdays.retain(|d| d != day);
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1900..=9999).contains(&self.year) {
            return Err(ValidationError::invalid("year", format!("{} is out of range", self.year)));
        }
        if !MONTHS.contains(&self.month.as_str()) {
            return Err(ValidationError::invalid(
                "month",
                format!("'{}' is not a month name", self.month),
            ));
        }
        if !(1..=31).contains(&self.start_day) {
            return Err(ValidationError::invalid("start day", "must be between 1 and 31"));
        }
        if self.local_off_days > 31 {
            return Err(ValidationError::invalid("local off days", "must be between 0 and 31"));
        }
        if self.overseas_off_days > 31 {
            return Err(ValidationError::invalid("overseas off days", "must be between 0 and 31"));
        }
        if !(0.0..=1.0).contains(&self.driver_percentage_cap) {
            return Err(ValidationError::invalid(
                "driver percentage cap",
                "must be between 0 and 1",
            ));
        }
        for day in &self.excluded_weekdays {
            if !WEEKDAYS.contains(&day.as_str()) {
                return Err(ValidationError::invalid(
                    "excluded weekday",
                    format!("'{}' is not a weekday", day),
                ));
            }
        }
        for date in &self.public_holidays {
            if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                return Err(ValidationError::invalid(
                    "public holiday",
                    format!("'{}' is not a YYYY-MM-DD date", date),
                ));
            }
        }
        Ok(())
    }
}
