//! Applicant analytics for a single job.
//!
//! Aggregates the data a recruiter dashboard charts: applications per
//! status, per day, per experience band, and the most common skills.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::application::{Application, ApplicationStatus};

/// Experience bands in display order.
pub const EXPERIENCE_BUCKETS: [&str; 4] = ["0-1", "2-4", "5-7", "8+"];

/// Number of skills reported in `top_skills`.
pub const TOP_SKILLS_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub range: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobAnalytics {
    pub total: usize,
    /// Every status, including zero counts.
    pub by_status: Vec<StatusCount>,
    /// Days with at least one application, oldest first.
    pub by_day: Vec<DayCount>,
    /// Every band in [`EXPERIENCE_BUCKETS`] order.
    pub by_experience: Vec<BucketCount>,
    /// Most frequent first; ties broken alphabetically.
    pub top_skills: Vec<SkillCount>,
}

fn experience_bucket(years: u32) -> &'static str {
    match years {
        0..=1 => EXPERIENCE_BUCKETS[0],
        2..=4 => EXPERIENCE_BUCKETS[1],
        5..=7 => EXPERIENCE_BUCKETS[2],
        _ => EXPERIENCE_BUCKETS[3],
    }
}

impl JobAnalytics {
    pub fn from_applications(applications: &[Application]) -> Self {
        let mut statuses: HashMap<ApplicationStatus, usize> = HashMap::new();
        let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        let mut bands: HashMap<&'static str, usize> = HashMap::new();
        let mut skills: HashMap<String, usize> = HashMap::new();

        for app in applications {
            *statuses.entry(app.status).or_default() += 1;
            *days.entry(app.created_at.date_naive()).or_default() += 1;
            *bands.entry(experience_bucket(app.experience)).or_default() += 1;
            for skill in app.skill_list() {
                *skills.entry(skill).or_default() += 1;
            }
        }

        let by_status = ApplicationStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: statuses.get(&status).copied().unwrap_or(0),
            })
            .collect();

        let by_day = days
            .into_iter()
            .map(|(date, count)| DayCount { date, count })
            .collect();

        let by_experience = EXPERIENCE_BUCKETS
            .into_iter()
            .map(|range| BucketCount {
                range,
                count: bands.get(range).copied().unwrap_or(0),
            })
            .collect();

        let mut top_skills: Vec<SkillCount> = skills
            .into_iter()
            .map(|(skill, count)| SkillCount { skill, count })
            .collect();
        top_skills.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.skill.cmp(&b.skill)));
        top_skills.truncate(TOP_SKILLS_LIMIT);

        Self {
            total: applications.len(),
            by_status,
            by_day,
            by_experience,
            top_skills,
        }
    }
}
