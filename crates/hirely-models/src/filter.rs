//! Job listing filters.

use serde::{Deserialize, Serialize};

use crate::job::Job;

/// Filters for the job listing.
///
/// Each supplied, non-blank filter narrows the result; omitted or blank
/// filters impose no constraint. The store applies the same rules:
/// `location` and `company_id` by equality, `search` as a case-insensitive
/// substring of the title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilter {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl JobFilter {
    pub fn location(&self) -> Option<&str> {
        non_blank(&self.location)
    }

    pub fn company_id(&self) -> Option<&str> {
        non_blank(&self.company_id)
    }

    pub fn search(&self) -> Option<&str> {
        non_blank(&self.search)
    }

    /// True when no filter constrains the listing.
    pub fn is_empty(&self) -> bool {
        self.location().is_none() && self.company_id().is_none() && self.search().is_none()
    }

    /// Whether a job satisfies every supplied filter.
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(location) = self.location() {
            if job.location != location {
                return false;
            }
        }
        if let Some(company_id) = self.company_id() {
            if job.company_id.as_str() != company_id {
                return false;
            }
        }
        if let Some(search) = self.search() {
            if !job.title.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn job(id: usize, title: &str, location: &str, company_id: &str) -> Job {
        serde_json::from_value(json!({
            "id": id,
            "title": title,
            "location": location,
            "company_id": company_id,
            "recruiter_id": "user_r",
            "isOpen": true,
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap()
    }

    fn ids(filter: &JobFilter, jobs: &[Job]) -> Vec<String> {
        jobs.iter()
            .filter(|j| filter.matches(j))
            .map(|j| j.id.to_string())
            .collect()
    }

    #[test]
    fn test_blank_filters_are_omitted() {
        let filter = JobFilter {
            location: Some("  ".into()),
            company_id: Some(String::new()),
            search: None,
        };
        assert!(filter.is_empty());
        assert!(filter.matches(&job(1, "Anything", "Goa", "1")));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let filter = JobFilter {
            search: Some("end eng".into()),
            ..Default::default()
        };
        assert!(filter.matches(&job(1, "Backend Engineer", "Goa", "1")));
        assert!(!filter.matches(&job(2, "Designer", "Goa", "1")));
    }

    fn arb_field(options: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some(String::new())),
            proptest::sample::select(options).prop_map(|s| Some(s.to_string())),
        ]
    }

    const LOCATIONS: &[&str] = &["Karnataka", "Goa", "Delhi"];
    const COMPANIES: &[&str] = &["1", "2", "42"];
    const TITLES: &[&str] = &["Backend Engineer", "Frontend Engineer", "Designer", "Data Analyst"];
    const SEARCHES: &[&str] = &["engineer", "END", "design", "x"];

    proptest! {
        #[test]
        fn prop_filter_is_intersection_of_single_filters(
            rows in proptest::collection::vec(
                (
                    proptest::sample::select(TITLES),
                    proptest::sample::select(LOCATIONS),
                    proptest::sample::select(COMPANIES),
                ),
                0..20,
            ),
            location in arb_field(LOCATIONS),
            company_id in arb_field(COMPANIES),
            search in arb_field(SEARCHES),
        ) {
            let jobs: Vec<Job> = rows
                .iter()
                .enumerate()
                .map(|(i, (t, l, c))| job(i + 1, t, l, c))
                .collect();

            let combined = JobFilter {
                location: location.clone(),
                company_id: company_id.clone(),
                search: search.clone(),
            };
            let by_location = JobFilter { location, ..Default::default() };
            let by_company = JobFilter { company_id, ..Default::default() };
            let by_search = JobFilter { search, ..Default::default() };

            let a = ids(&by_location, &jobs);
            let b = ids(&by_company, &jobs);
            let c = ids(&by_search, &jobs);
            let intersection: Vec<String> = jobs
                .iter()
                .map(|j| j.id.to_string())
                .filter(|id| a.contains(id) && b.contains(id) && c.contains(id))
                .collect();

            prop_assert_eq!(ids(&combined, &jobs), intersection);
        }

        #[test]
        fn prop_empty_filter_keeps_everything(
            rows in proptest::collection::vec(
                (
                    proptest::sample::select(TITLES),
                    proptest::sample::select(LOCATIONS),
                    proptest::sample::select(COMPANIES),
                ),
                0..20,
            ),
        ) {
            let jobs: Vec<Job> = rows
                .iter()
                .enumerate()
                .map(|(i, (t, l, c))| job(i + 1, t, l, c))
                .collect();
            prop_assert_eq!(ids(&JobFilter::default(), &jobs).len(), jobs.len());
        }
    }
}
