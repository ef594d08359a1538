use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseStatusError;
use crate::models::{ApplicationStatus, JobApplication};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub applied: usize,
    pub interview: usize,
    pub offer: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn tally<'a>(apps: impl IntoIterator<Item = &'a JobApplication>) -> Self {
        let mut counts = Self::default();
        for app in apps {
            *counts.slot_mut(app.status) += 1;
        }
        counts
    }

    pub fn get(&self, status: ApplicationStatus) -> usize {
        match status {
            ApplicationStatus::Applied => self.applied,
            ApplicationStatus::Interview => self.interview,
            ApplicationStatus::Offer => self.offer,
            ApplicationStatus::Rejected => self.rejected,
        }
    }

    pub fn total(&self) -> usize {
        self.applied + self.interview + self.offer + self.rejected
    }

    fn slot_mut(&mut self, status: ApplicationStatus) -> &mut usize {
        match status {
            ApplicationStatus::Applied => &mut self.applied,
            ApplicationStatus::Interview => &mut self.interview,
            ApplicationStatus::Offer => &mut self.offer,
            ApplicationStatus::Rejected => &mut self.rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: ApplicationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    /// All -> applied -> interview -> offer -> rejected -> All
    pub fn next(&self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(ApplicationStatus::Applied),
            StatusFilter::Only(ApplicationStatus::Applied) => StatusFilter::Only(ApplicationStatus::Interview),
            StatusFilter::Only(ApplicationStatus::Interview) => StatusFilter::Only(ApplicationStatus::Offer),
            StatusFilter::Only(ApplicationStatus::Offer) => StatusFilter::Only(ApplicationStatus::Rejected),
            StatusFilter::Only(ApplicationStatus::Rejected) => StatusFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.label(),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.pad("all"),
            StatusFilter::Only(status) => f.pad(status.as_str()),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortMode {
    /// Newest application date first
    #[default]
    #[value(name = "date_desc")]
    DateDesc,
    /// Oldest application date first
    #[value(name = "date_asc")]
    DateAsc,
    /// Most recently updated first
    #[value(name = "updated_desc")]
    UpdatedDesc,
}

impl SortMode {
    pub fn next(&self) -> Self {
        match self {
            SortMode::DateDesc => SortMode::DateAsc,
            SortMode::DateAsc => SortMode::UpdatedDesc,
            SortMode::UpdatedDesc => SortMode::DateDesc,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortMode::DateDesc => "Date (newest)",
            SortMode::DateAsc => "Date (oldest)",
            SortMode::UpdatedDesc => "Last updated",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub status: StatusFilter,
    pub search: String,
    pub sort: SortMode,
}

/// Case-insensitive substring match over company, title, notes and links.
/// `needle` must already be lowercased; an empty needle matches everything.
pub fn matches_search(app: &JobApplication, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    app.company_name.to_lowercase().contains(needle)
        || app.job_title.to_lowercase().contains(needle)
        || app.notes.to_lowercase().contains(needle)
        || app.links.iter().any(|link| link.to_lowercase().contains(needle))
}

/// Filter by status, then search, then sort. The sort is stable, so ties keep
/// collection order. Undated records count as the earliest date.
pub fn filter_and_sort<'a>(apps: &'a [JobApplication], query: &ViewQuery) -> Vec<&'a JobApplication> {
    let needle = query.search.trim().to_lowercase();

    let mut list: Vec<&JobApplication> = apps
        .iter()
        .filter(|app| query.status.matches(app.status))
        .filter(|app| matches_search(app, &needle))
        .collect();

    match query.sort {
        SortMode::DateDesc => list.sort_by(|a, b| b.application_date.cmp(&a.application_date)),
        SortMode::DateAsc => list.sort_by(|a, b| a.application_date.cmp(&b.application_date)),
        SortMode::UpdatedDesc => list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
    }

    list
}
