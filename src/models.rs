use chrono::{DateTime, Local, NaiveDate};
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{ParseStatusError, ValidationError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static date pattern"));

/// Other shapes a typed or pasted date may take, tried in order after ISO.
const LOOSE_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%m/%d/%Y", "%b %d, %Y", "%B %d, %Y", "%d %b %Y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

// Persisted data is not trusted: an unknown status string falls back to the default.
impl<'de> Deserialize<'de> for ApplicationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: String,
    pub company_name: String,
    pub job_title: String,
    #[serde(default, with = "date_slot")]
    pub application_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub links: Vec<String>,
    pub created_at: i64, // epoch millis
    pub updated_at: i64,
}

/// Form payload for both add and edit. Whether it creates or replaces a
/// record depends only on whether `id` names an existing application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationDraft {
    pub id: Option<String>,
    pub company_name: String,
    pub job_title: String,
    pub application_date: Option<NaiveDate>,
    pub status: ApplicationStatus,
    pub notes: String,
    pub links: Vec<String>,
}

impl ApplicationDraft {
    pub fn new(company_name: &str, job_title: &str) -> Self {
        Self {
            company_name: company_name.to_string(),
            job_title: job_title.to_string(),
            ..Default::default()
        }
    }

    /// Prefills an edit form from a stored record.
    pub fn from_application(app: &JobApplication) -> Self {
        Self {
            id: Some(app.id.clone()),
            company_name: app.company_name.clone(),
            job_title: app.job_title.clone(),
            application_date: app.application_date,
            status: app.status,
            notes: app.notes.clone(),
            links: app.links.clone(),
        }
    }

    pub fn with_links_text(mut self, text: &str) -> Self {
        self.links = parse_links_text(text);
        self
    }

    /// Trims text fields, dedupes links and fills a missing date with `today`.
    pub fn validate(self, today: NaiveDate) -> Result<ApplicationDraft, ValidationError> {
        let company_name = self.company_name.trim().to_string();
        if company_name.is_empty() {
            return Err(ValidationError::MissingCompany);
        }
        let job_title = self.job_title.trim().to_string();
        if job_title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        Ok(ApplicationDraft {
            id: self.id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty()),
            company_name,
            job_title,
            application_date: Some(self.application_date.unwrap_or(today)),
            status: self.status,
            notes: self.notes.trim().to_string(),
            links: normalize_links(&self.links),
        })
    }
}

/// Turns free-form date input into a calendar date. Empty or unrecognized
/// input yields `None` rather than a malformed value.
pub fn normalize_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if ISO_DATE.is_match(trimmed) {
        return NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Local).date_naive());
    }

    LOOSE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Trims entries, drops blanks and keeps the first occurrence of each link.
pub fn normalize_links<S: AsRef<str>>(links: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .iter()
        .map(|link| link.as_ref().trim())
        .filter(|link| !link.is_empty())
        .filter(|link| seen.insert(link.to_string()))
        .map(str::to_string)
        .collect()
}

/// One link per line, as typed into the links box.
pub fn parse_links_text(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    normalize_links(&lines)
}

mod date_slot {
    use super::{DATE_FORMAT, normalize_date};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(normalize_date))
    }
}
