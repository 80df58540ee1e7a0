use chrono::NaiveDateTime;
use clap::{Args, ValueEnum};

use crate::config::Config;
use crate::error::InputError;
use crate::models::{format_work_type, ApplicationData, EMPTY_COMMENT, NO_RESPONSE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WorkMode {
    Remote,
    Hybrid,
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Name of the company
    pub company: Option<String>,

    /// Position or role at the company
    pub role: Option<String>,

    /// Work location (city); mark it remote or hybrid with -r / -b
    pub location: Option<String>,

    /// Remote work model
    #[arg(short = 'r', long = "remote")]
    pub remote: bool,

    /// Hybrid work model, based at the given location
    #[arg(short = 'b', long = "hybrid")]
    pub hybrid: bool,

    /// Company name (takes priority over the positional argument)
    #[arg(long = "company", value_name = "COMPANY")]
    pub company_opt: Option<String>,

    /// Role (takes priority over the positional argument)
    #[arg(long = "role", value_name = "ROLE")]
    pub role_opt: Option<String>,

    /// Location (takes priority over the positional argument)
    #[arg(long = "location", value_name = "LOCATION")]
    pub location_opt: Option<String>,

    /// Work model
    #[arg(short = 't', long = "type", value_enum)]
    pub work_type: Option<WorkMode>,

    /// Application date, "YYYY-MM-DD HH:MM:SS" (default: now)
    #[arg(long = "sdate")]
    pub application_date: Option<String>,

    /// Response date, "YYYY-MM-DD HH:MM:SS", for an already resolved application
    #[arg(long = "rdate")]
    pub response_date: Option<String>,

    /// Company's response (accepted, denied, hr interview, ...)
    #[arg(long)]
    pub response: Option<String>,

    /// General purpose comment
    #[arg(long)]
    pub comment: Option<String>,

    /// Show the record without saving it
    #[arg(long)]
    pub dry_run: bool,
}

/// Named flag first, then positional. Blank values count as missing.
fn pick<'a>(flag: &'a Option<String>, positional: &'a Option<String>) -> Option<&'a str> {
    [flag, positional]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .find(|v| !v.trim().is_empty())
}

impl AddArgs {
    pub fn company(&self) -> Result<&str, InputError> {
        pick(&self.company_opt, &self.company).ok_or(InputError::MissingCompany)
    }

    pub fn role(&self) -> Result<&str, InputError> {
        pick(&self.role_opt, &self.role).ok_or(InputError::MissingRole)
    }

    // Location is optional, a job can be fully remote
    pub fn location(&self) -> &str {
        pick(&self.location_opt, &self.location).unwrap_or("")
    }

    pub fn is_hybrid(&self) -> bool {
        self.hybrid || self.work_type == Some(WorkMode::Hybrid)
    }

    pub fn is_remote(&self) -> bool {
        self.remote || self.work_type == Some(WorkMode::Remote)
    }

    fn parse_date(
        field: &'static str,
        value: &str,
        format: &str,
    ) -> Result<NaiveDateTime, InputError> {
        NaiveDateTime::parse_from_str(value.trim(), format).map_err(|_| InputError::InvalidDate {
            field,
            value: value.to_string(),
        })
    }

    pub fn application_date(&self, format: &str, now: NaiveDateTime) -> Result<NaiveDateTime, InputError> {
        match self.application_date.as_deref() {
            Some(value) if !value.is_empty() => Self::parse_date("application", value, format),
            _ => Ok(now),
        }
    }

    pub fn response_date(&self, format: &str) -> Result<Option<NaiveDateTime>, InputError> {
        match self.response_date.as_deref() {
            Some(value) if !value.is_empty() => Self::parse_date("response", value, format).map(Some),
            _ => Ok(None),
        }
    }

    /// Build the record to store. `now` fills in a missing application date.
    pub fn to_application(&self, config: &Config, now: NaiveDateTime) -> Result<ApplicationData, InputError> {
        let company = self.company()?;
        let role = self.role()?;
        let location = self.location();
        let format = config.date_format.as_str();

        let application_date = self.application_date(format, now)?;
        let response_date = self.response_date(format)?;

        let app = ApplicationData {
            company: company.to_string(),
            role: role.to_string(),
            location: location.to_string(),
            work_type: format_work_type(location, self.is_remote(), self.is_hybrid()),
            is_hybrid: self.is_hybrid(),
            is_remote: self.is_remote(),
            application_date: application_date.format(format).to_string(),
            response_date: response_date
                .map(|d| d.format(format).to_string())
                .unwrap_or_default(),
            response: self
                .response
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| NO_RESPONSE.to_string()),
            comment: self
                .comment
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| EMPTY_COMMENT.to_string()),
        };
        app.validate()?;
        Ok(app)
    }
}
