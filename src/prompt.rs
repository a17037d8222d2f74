//! Prompt construction from the calendar.
//!
//! The prompt names the weekday, date and season. It picks a painterly
//! style and, near a holiday, a holiday subject and palette. All
//! randomness goes through a caller-supplied `Rng`, so a seeded RNG gives
//! repeatable prompts.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

// ── Seasons and dates ───────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }

    /// Example subjects offered to the model as guidance.
    pub fn subject_examples(self) -> &'static str {
        match self {
            Self::Winter => {
                "snowy landscapes, winter berries, frost patterns, winter flowers, \
                 winter bouquets, winter flowers in a vase"
            }
            Self::Spring => {
                "cherry blossoms, tulips, spring gardens, spring bouquets, wild flowers, \
                 spring flowers in a vase"
            }
            Self::Summer => {
                "summer gardens, sunflowers, nature, summer bouquets, summer wild flowers, \
                 summer flowers in a vase, poppies in a meadow, lavender fields"
            }
            Self::Autumn => {
                "autumn foliage, harvest scenes, fall colors, fall flowers, autumn leaves, \
                 autumnal bouquets, autumn flowers in a vase"
            }
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Autumn => "Autumn",
        };
        f.write_str(name)
    }
}

/// Everything about a date that goes into the prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateInfo {
    pub date: NaiveDate,
    pub season: Season,
    pub weekday: &'static str,
    pub month_name: &'static str,
    pub day_with_suffix: String,
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl DateInfo {
    pub fn new(date: NaiveDate) -> Self {
        let day = date.day();
        Self {
            date,
            season: Season::from_month(date.month()),
            weekday: weekday_name(date.weekday()),
            month_name: MONTH_NAMES[date.month0() as usize],
            day_with_suffix: format!("{day}{}", ordinal_suffix(day)),
        }
    }

    /// e.g. "25th of December"
    pub fn formatted_date(&self) -> String {
        format!("{} of {}", self.day_with_suffix, self.month_name)
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

// ── Styles ───────────────────────────────────────────────────────────

pub const ART_STYLES: [&str; 9] = [
    "palette knife painting",
    "impasto technique",
    "textured painting",
    "oil painting with heavy texture",
    "thick paint application",
    "textured abstract art",
    "modern impressionism with palette knife",
    "contemporary impasto landscape",
    "bold and textured color field painting",
];

// ── Holidays ─────────────────────────────────────────────────────────

/// A date window (inclusive at both ends) with its own subjects and
/// palette. A window may wrap the year end.
#[derive(Clone, Copy, Debug)]
pub struct Holiday {
    pub name: &'static str,
    pub start: (u32, u32),
    pub end: (u32, u32),
    pub subjects: &'static [&'static str],
    pub mood: &'static str,
    pub palette: &'static str,
}

impl Holiday {
    pub fn is_active(&self, date: NaiveDate) -> bool {
        let today = (date.month(), date.day());
        if self.start <= self.end {
            self.start <= today && today <= self.end
        } else {
            today >= self.start || today <= self.end
        }
    }
}

pub const HOLIDAYS: [Holiday; 4] = [
    Holiday {
        name: "Christmas",
        start: (12, 10),
        end: (12, 26),
        subjects: &[
            "festive christmas market scene",
            "cozy living room with decorated christmas tree",
            "snowy village with christmas lights",
            "elegant christmas wreath on a rustic door",
            "vintage christmas ornaments",
            "winter scene with holly and ivy",
            "festive holiday bouquet with poinsettias",
        ],
        mood: "It is the festive holiday season. Capture the magic and warmth of Christmas.",
        palette: "festive palette with rich reds, greens, golds, and snowy whites",
    },
    Holiday {
        name: "Halloween",
        start: (10, 25),
        end: (10, 31),
        subjects: &[
            "spooky haunted house silhouette",
            "carved pumpkins on a porch",
            "misty forest with twisted trees",
            "autumn harvest with pumpkins and corn",
            "vintage halloween decorations",
        ],
        mood: "It is Halloween season. Create a mysterious and slightly spooky atmosphere.",
        palette: "autumnal palette with deep oranges, blacks, purples, and shadowy greys",
    },
    Holiday {
        name: "July 4th",
        start: (7, 4),
        end: (7, 4),
        subjects: &[
            "fireworks over a lake",
            "summer picnic scene",
            "patriotic bunting on a porch",
            "summer evening celebration",
        ],
        mood: "It is Independence Day. Capture the celebratory spirit of summer.",
        palette: "vibrant summer palette with touches of red, white, and blue",
    },
    Holiday {
        name: "New Year",
        start: (12, 31),
        end: (1, 1),
        subjects: &[
            "fireworks in the night sky",
            "elegant champagne toast setup",
            "festive party streamers and confetti",
            "clocks striking midnight",
        ],
        mood: "It is New Year's. Capture the excitement and hope of a new beginning.",
        palette: "elegant palette with golds, silvers, blacks, and deep blues",
    },
];

pub fn active_holiday(date: NaiveDate) -> Option<&'static Holiday> {
    HOLIDAYS.iter().find(|h| h.is_active(date))
}

// ── Prompt ───────────────────────────────────────────────────────────

/// Build the generation prompt for `date`.
///
/// `weather` is an optional mood phrase from [`crate::weather`].
pub fn art_prompt<R: Rng + ?Sized>(date: NaiveDate, weather: Option<&str>, rng: &mut R) -> String {
    let info = DateInfo::new(date);
    let style = ART_STYLES.choose(rng).copied().unwrap_or(ART_STYLES[0]);
    let season = info.season;

    let mut prompt = format!(
        "Create a high-quality {style} art piece for {}, {} in {season}. ",
        info.weekday,
        info.formatted_date()
    );

    match active_holiday(date) {
        Some(holiday) => {
            let subject = holiday.subjects.choose(rng).copied().unwrap_or(holiday.name);
            prompt.push_str(&format!(
                "{} The subject should be a {subject}. Use a {}. ",
                holiday.mood, holiday.palette
            ));
        }
        None => {
            prompt.push_str(&format!(
                "Choose a subject relevant to this day and time of year. Focus on a single \
                 seasonal subject that evokes this time of year. This could be something like \
                 {}, or something more unexpected but still seasonally appropriate. Feel free \
                 to interpret the theme creatively based on the time of year. Use a soft, \
                 natural {season} palette with subtle, muted tones, avoiding overly vibrant or \
                 saturated colours. ",
                season.subject_examples()
            ));
        }
    }

    if let Some(weather) = weather.filter(|w| !w.is_empty()) {
        prompt.push_str(&format!("Reflect today's weather: {weather}. "));
    }

    prompt.push_str(
        "The painting should emulate the look and feel of real paint on canvas, with visible \
         brushstrokes and layered texture. Aim for a realistic fine art aesthetic, evoking the \
         softness of traditional oil or acrylic painting. Ensure 16:9 aspect ratio. Create fine \
         art with texture and depth. IMPORTANT: Do not include any text, words, letters, dates, \
         signatures, or written elements anywhere in the image. This should be a pure visual \
         artwork without any textual content whatsoever.",
    );

    prompt
}
