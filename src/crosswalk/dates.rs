// Normalizes the free text dates found in VAULT to level 0 EDTF.
// @see https://www.loc.gov/standards/datetime/
use chrono::NaiveDate;
use log::warn;
use regex::Regex;

lazy_static! {
    static ref YEAR: Regex = Regex::new(r"^(\d{4})$").unwrap();
    static ref YEAR_MONTH: Regex = Regex::new(r"^(\d{4})-(\d{1,2})$").unwrap();
    static ref YEAR_MONTH_DAY: Regex = Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap();
    static ref DATE_TIME: Regex = Regex::new(r"^(\d{4}-\d{2}-\d{2})[T ]\d{2}:\d{2}").unwrap();
    static ref YEAR_RANGE: Regex = Regex::new(r"^(\d{4})\s*-\s*(\d{4})$").unwrap();
    static ref US_DATE: Regex = Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})$").unwrap();
    static ref SEASON: Regex =
        Regex::new(r"(?i)^(spring|summer|fall|autumn|winter),?\s+(\d{4})$").unwrap();
    static ref MONTH_YEAR: Regex = Regex::new(r"^([A-Za-z]+)\.?,?\s+(\d{4})$").unwrap();
    static ref MONTH_DAY_YEAR: Regex =
        Regex::new(r"^([A-Za-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})$").unwrap();
    static ref CIRCA: Regex = Regex::new(r"(?i)^(?:c\.|ca\.?|circa)\s*(\d{4})\??$").unwrap();
}

// Full month names followed by the abbreviations found in VAULT.
static MONTHS: [(&str, &str, &str); 12] = [
    ("january", "jan", "jan"),
    ("february", "feb", "feb"),
    ("march", "mar", "mar"),
    ("april", "apr", "apr"),
    ("may", "may", "may"),
    ("june", "jun", "jun"),
    ("july", "jul", "jul"),
    ("august", "aug", "aug"),
    ("september", "sep", "sept"),
    ("october", "oct", "oct"),
    ("november", "nov", "nov"),
    ("december", "dec", "dec"),
];

// Seasons are mapped to the month they start in our academic calendar.
fn season_month(season: &str) -> u32 {
    match season.to_lowercase().as_str() {
        "spring" => 2,
        "summer" => 5,
        "fall" | "autumn" => 8,
        _ => 11,
    }
}

// Whole month names & abbreviations only, e.g. "September", "Sept", "Sep".
fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTHS
        .iter()
        .position(|(full, short, long)| name == *full || name == *short || name == *long)
        .map(|index| index as u32 + 1)
}

fn number(text: &str) -> Option<u32> {
    text.parse().ok()
}

fn year_month(year: &str, month: u32) -> Option<String> {
    if (1..=12).contains(&month) {
        Some(format!("{}-{:02}", year, month))
    } else {
        None
    }
}

fn year_month_day(year: i32, month: u32, day: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.format("%Y-%m-%d").to_string())
}

// Two digit years follow the POSIX pivot: 69-99 => 19xx, 00-68 => 20xx.
fn full_year(year: &str) -> Option<i32> {
    let value: i32 = year.parse().ok()?;
    match year.len() {
        2 if value >= 69 => Some(1900 + value),
        2 => Some(2000 + value),
        _ => Some(value),
    }
}

// A single date, never a range.
fn single(text: &str) -> Option<String> {
    if YEAR.is_match(text) {
        return Some(text.to_string());
    }
    if let Some(captures) = YEAR_MONTH.captures(text) {
        return year_month(&captures[1], number(&captures[2])?);
    }
    if let Some(captures) = YEAR_MONTH_DAY.captures(text) {
        return year_month_day(
            captures[1].parse().ok()?,
            number(&captures[2])?,
            number(&captures[3])?,
        );
    }
    if let Some(captures) = DATE_TIME.captures(text) {
        return single(&captures[1]);
    }
    if let Some(captures) = US_DATE.captures(text) {
        return year_month_day(
            full_year(&captures[3])?,
            number(&captures[1])?,
            number(&captures[2])?,
        );
    }
    if let Some(captures) = SEASON.captures(text) {
        return year_month(&captures[2], season_month(&captures[1]));
    }
    if let Some(captures) = CIRCA.captures(text) {
        return Some(captures[1].to_string());
    }
    if let Some(captures) = MONTH_YEAR.captures(text) {
        return year_month(&captures[2], month_number(&captures[1])?);
    }
    if let Some(captures) = MONTH_DAY_YEAR.captures(text) {
        return year_month_day(
            captures[3].parse().ok()?,
            month_number(&captures[1])?,
            number(&captures[2])?,
        );
    }
    None
}

fn parse(text: &str) -> Option<String> {
    if let Some(date) = single(text) {
        return Some(date);
    }
    if let Some(captures) = YEAR_RANGE.captures(text) {
        return Some(format!("{}/{}", &captures[1], &captures[2]));
    }
    // Ranges of any of the above, e.g. "2017-09-23/winter 2020".
    let mut parts = text.splitn(2, '/');
    match (parts.next(), parts.next()) {
        (Some(start), Some(end)) => {
            let start = single(start.trim())?;
            let end = single(end.trim())?;
            Some(format!("{}/{}", start, end))
        }
        _ => None,
    }
}

pub fn to_edtf(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let date = parse(text);
    if date.is_none() {
        warn!("Unable to convert \"{}\" to an EDTF date", text);
    }
    date
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edtf(text: &str) -> String {
        to_edtf(text).unwrap()
    }

    #[test]
    fn iso_dates() {
        assert_eq!(edtf("1996"), "1996");
        assert_eq!(edtf("1984-11"), "1984-11");
        assert_eq!(edtf("2020-03-14"), "2020-03-14");
        assert_eq!(edtf(" 2020-3-4 "), "2020-03-04");
        assert_eq!(to_edtf("2020-13"), None);
        assert_eq!(to_edtf("2021-02-30"), None);
    }

    #[test]
    fn item_date_created() {
        assert_eq!(edtf("2019-04-25T16:22:52.704-07:00"), "2019-04-25");
        assert_eq!(edtf("2019-04-25 16:22:52"), "2019-04-25");
    }

    #[test]
    fn ranges() {
        assert_eq!(edtf("1996-1997"), "1996/1997");
        assert_eq!(edtf("2016-09/2017-05"), "2016-09/2017-05");
        assert_eq!(edtf("2017-09-23/winter 2020"), "2017-09-23/2020-11");
        assert_eq!(to_edtf("2017/someday"), None);
    }

    #[test]
    fn us_dates() {
        assert_eq!(edtf("10/1/93"), "1993-10-01");
        assert_eq!(edtf("3/14/2015"), "2015-03-14");
        assert_eq!(edtf("1/2/05"), "2005-01-02");
        assert_eq!(to_edtf("13/1/93"), None);
    }

    #[test]
    fn seasons() {
        assert_eq!(edtf("Spring 2014"), "2014-02");
        assert_eq!(edtf("summer 2001"), "2001-05");
        assert_eq!(edtf("fall 2017"), "2017-08");
        assert_eq!(edtf("Autumn 1999"), "1999-08");
        assert_eq!(edtf("winter 2020"), "2020-11");
    }

    #[test]
    fn natural_language() {
        assert_eq!(edtf("March 1987"), "1987-03");
        assert_eq!(edtf("Sept. 1990"), "1990-09");
        assert_eq!(edtf("October 5, 2001"), "2001-10-05");
        assert_eq!(edtf("ca. 1950"), "1950");
        assert_eq!(edtf("circa 1920"), "1920");
        assert_eq!(edtf("c.1910"), "1910");
        assert_eq!(edtf("Sep 1990"), "1990-09");
        assert_eq!(edtf("jan. 3, 1971"), "1971-01-03");
    }

    #[test]
    fn unparseable() {
        assert_eq!(to_edtf(""), None);
        assert_eq!(to_edtf("   "), None);
        assert_eq!(to_edtf("sometime last year"), None);
        assert_eq!(to_edtf("Foo 1987"), None);
        assert_eq!(to_edtf("Decade 1990"), None);
        assert_eq!(to_edtf("Marching 1990"), None);
        assert_eq!(to_edtf("Mayday 4, 1990"), None);
    }
}
