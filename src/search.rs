use chrono::{Duration, NaiveDateTime};
use clap::Args;

use crate::config::Config;
use crate::models::SearchData;

#[derive(Debug, Clone, Args)]
pub struct GetArgs {
    /// Name (or part of the name) of the company
    #[arg(long)]
    pub company: Option<String>,

    /// Role (or part of it) you applied for
    #[arg(long)]
    pub role: Option<String>,

    /// Location (or part of it)
    #[arg(short = 'l', long)]
    pub location: Option<String>,

    /// Only remote applications
    #[arg(short = 'r', long)]
    pub remote: bool,

    /// Only hybrid applications
    #[arg(short = 'y', long)]
    pub hybrid: bool,

    /// Only applications older than this many days
    #[arg(short = 'o', long = "older", default_value = "0")]
    pub older: u32,

    /// Response (or part of it), e.g. "denied"
    #[arg(long)]
    pub response: Option<String>,

    /// Print records as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl GetArgs {
    pub fn work_types(&self) -> Vec<String> {
        let mut types = Vec::new();
        if self.hybrid {
            types.push("hybrid".to_string());
        }
        if self.remote {
            types.push("remote".to_string());
        }
        types
    }

    /// `now` minus the requested days, clamped to the earliest representable time.
    pub fn older_than_date(&self, format: &str, now: NaiveDateTime) -> String {
        now.checked_sub_signed(Duration::days(i64::from(self.older)))
            .unwrap_or(NaiveDateTime::MIN)
            .format(format)
            .to_string()
    }

    pub fn to_search_data(&self, config: &Config, now: NaiveDateTime) -> SearchData {
        SearchData {
            company: self.company.clone().unwrap_or_default(),
            role: self.role.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
            work_type: self.work_types(),
            is_hybrid: self.hybrid,
            is_remote: self.remote,
            response: self.response.clone().unwrap_or_default(),
            older_than_date: self.older_than_date(&config.date_format, now),
        }
    }
}
