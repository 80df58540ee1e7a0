use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::InputError;
use crate::models::{format_work_type, ApplicationData, EMPTY_COMMENT, NO_RESPONSE};

pub const END_SENTINEL: &str = "end,,,,,,,,";
const FIELD_COUNT: usize = 7;

static SHORT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})(?:\.(\d{2}|\d{4}))?\.?$").expect("valid regex"));

#[derive(Debug, Default)]
pub struct ImportStats {
    pub lines_read: usize,
    pub records_parsed: usize,
    pub lines_skipped: usize,
}

#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub records: Vec<ApplicationData>,
    pub stats: ImportStats,
    pub reached_end: bool,
}

/// Strip trailing "remote"/"hybrid" markers from a location such as
/// "Berlin hybrid" or "Berlinremote". Returns (location, is_remote, is_hybrid).
pub fn split_location(raw: &str) -> (String, bool, bool) {
    let mut rest = raw.trim();
    let mut is_remote = false;
    let mut is_hybrid = false;

    loop {
        let lower = rest.to_ascii_lowercase();
        if lower.ends_with("remote") {
            is_remote = true;
        } else if lower.ends_with("hybrid") {
            is_hybrid = true;
        } else {
            break;
        }
        rest = rest[..rest.len() - "remote".len()].trim_end();
    }

    (rest.to_string(), is_remote, is_hybrid)
}

/// Turn "D.M" or "D.M.Y" into a full timestamp at midnight. Empty stays empty.
pub fn parse_short_date(value: &str, default_year: i32, format: &str) -> Result<String, InputError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(String::new());
    }

    let invalid = || InputError::InvalidShortDate(value.to_string());
    let caps = SHORT_DATE.captures(value).ok_or_else(invalid)?;

    let day: u32 = caps[1].parse().map_err(|_| invalid())?;
    let month: u32 = caps[2].parse().map_err(|_| invalid())?;
    let year = match caps.get(3) {
        Some(y) if y.as_str().len() == 2 => 2000 + y.as_str().parse::<i32>().map_err(|_| invalid())?,
        Some(y) => y.as_str().parse::<i32>().map_err(|_| invalid())?,
        None => default_year,
    };

    let midnight = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(invalid)?;
    Ok(midnight.format(format).to_string())
}

fn non_empty_or(value: &str, default: &str) -> String {
    let chosen = if value.is_empty() { default } else { value };
    chosen.to_string()
}

/// Parse one CSV data line:
/// company,role,location+suffix,appdate,respdate,response,comment
pub fn parse_line(line: &str, config: &Config) -> Result<ApplicationData, InputError> {
    let tokens: Vec<&str> = line.split(',').collect();
    if tokens.len() < FIELD_COUNT {
        return Err(InputError::TooFewFields {
            expected: FIELD_COUNT,
            found: tokens.len(),
        });
    }

    let (location, is_remote, is_hybrid) = split_location(tokens[2]);
    let format = config.date_format.as_str();

    let app = ApplicationData {
        company: tokens[0].trim().to_string(),
        role: tokens[1].trim().to_string(),
        work_type: format_work_type(&location, is_remote, is_hybrid),
        location,
        is_hybrid,
        is_remote,
        application_date: parse_short_date(tokens[3], config.default_import_year, format)?,
        response_date: parse_short_date(tokens[4], config.default_import_year, format)?,
        response: non_empty_or(tokens[5], NO_RESPONSE),
        comment: non_empty_or(tokens[6], EMPTY_COMMENT),
    };
    app.validate()?;
    Ok(app)
}

/// Read every record up to the end sentinel. The first line is a header.
/// Bad lines are logged and skipped.
pub fn read_records<R: BufRead>(mut reader: R, config: &Config) -> Result<ImportOutcome> {
    let mut outcome = ImportOutcome::default();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .context("Failed to read import file")?;
        if read == 0 {
            break;
        }
        line_no += 1;
        if line_no == 1 {
            continue; // header
        }

        // Spreadsheet exports are often Latin-1; keep the row rather than fail the file.
        let decoded = String::from_utf8_lossy(&buf);
        if matches!(decoded, Cow::Owned(_)) {
            warn!(line = line_no, "line is not valid UTF-8, replacing invalid bytes");
        }
        let line = decoded.trim_end_matches(['\n', '\r']);

        if line == END_SENTINEL {
            info!(line = line_no, "found end of data");
            outcome.reached_end = true;
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        outcome.stats.lines_read += 1;
        match parse_line(line, config) {
            Ok(app) => {
                outcome.stats.records_parsed += 1;
                outcome.records.push(app);
            }
            Err(e) => {
                outcome.stats.lines_skipped += 1;
                warn!(line = line_no, error = %e, "skipping line");
            }
        }
    }

    Ok(outcome)
}

pub fn read_file(path: &Path, config: &Config) -> Result<ImportOutcome> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    read_records(BufReader::new(file), config)
}
