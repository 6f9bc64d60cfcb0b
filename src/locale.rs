//! Fixed-locale date and time formatting

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ID_MONTHS: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni",
    "Juli", "Agustus", "September", "Oktober", "November", "Desember",
];

const EN_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Supported display locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Indonesian
    #[default]
    Id,
    /// English
    En,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Id => "id",
            Locale::En => "en",
        }
    }

    pub fn weekday_name(&self, weekday: Weekday) -> &'static str {
        match self {
            Locale::Id => match weekday {
                Weekday::Mon => "Senin",
                Weekday::Tue => "Selasa",
                Weekday::Wed => "Rabu",
                Weekday::Thu => "Kamis",
                Weekday::Fri => "Jumat",
                Weekday::Sat => "Sabtu",
                Weekday::Sun => "Minggu",
            },
            Locale::En => match weekday {
                Weekday::Mon => "Monday",
                Weekday::Tue => "Tuesday",
                Weekday::Wed => "Wednesday",
                Weekday::Thu => "Thursday",
                Weekday::Fri => "Friday",
                Weekday::Sat => "Saturday",
                Weekday::Sun => "Sunday",
            },
        }
    }

    /// Full month name, `month0` is zero based
    pub fn month_name(&self, month0: u32) -> &'static str {
        let index = (month0 as usize).min(11);
        match self {
            Locale::Id => ID_MONTHS[index],
            Locale::En => EN_MONTHS[index],
        }
    }

    /// Medium date-time format used for message timestamps
    pub fn format_medium(&self, at: &NaiveDateTime) -> String {
        match self {
            Locale::Id => format!("{} pukul {}", self.format_long_date(at), self.format_time(at)),
            Locale::En => {
                let short_month = &self.month_name(at.month0())[..3];
                format!("{} {}, {} {}", short_month, at.day(), at.year(), self.format_time(at))
            }
        }
    }

    /// Long date, e.g. `19 Oktober 2026` or `October 19, 2026`
    pub fn format_long_date(&self, at: &NaiveDateTime) -> String {
        let month = self.month_name(at.month0());
        match self {
            Locale::Id => format!("{} {} {}", at.day(), month, at.year()),
            Locale::En => format!("{} {}, {}", month, at.day(), at.year()),
        }
    }

    /// Short time of day
    pub fn format_time(&self, at: &NaiveDateTime) -> String {
        match self {
            Locale::Id => format!("{:02}.{:02}", at.hour(), at.minute()),
            Locale::En => {
                let (pm, hour) = at.hour12();
                format!("{}:{:02} {}", hour, at.minute(), if pm { "PM" } else { "AM" })
            }
        }
    }

    pub fn format_weekday(&self, at: &NaiveDateTime) -> &'static str {
        self.weekday_name(at.weekday())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" | "id-id" | "id_id" => Ok(Locale::Id),
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            other => Err(anyhow::anyhow!("Unsupported locale '{}' (expected 'id' or 'en')", other)),
        }
    }
}
