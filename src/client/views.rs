//! Local filter, search and sort state over already-fetched lists
//!
//! Nothing here talks to the server. Pages fetch the full collection through
//! [`ApiClient`](super::ApiClient) and narrow it with these filters.

use crate::db::schemas::{SpaceMission, Worksheet};

/// Sentinel used by the select boxes for "no filter"
pub const ALL: &str = "all";

/// Statuses offered by the mission status filter
pub const MISSION_STATUSES: [&str; 4] = ["planned", "active", "completed", "failed"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissionLayout {
    /// Oldest launch first
    #[default]
    Timeline,
    /// Newest launch first
    Grid,
}

#[derive(Debug, Clone, Default)]
pub struct MissionFilter {
    pub status: Option<String>,
    pub agency: Option<String>,
    pub target: Option<String>,
    pub search: String,
    pub layout: MissionLayout,
}

fn selected(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty() && *v != ALL)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl MissionFilter {
    pub fn matches(&self, mission: &SpaceMission) -> bool {
        if let Some(status) = selected(&self.status) {
            if mission.fields.status != status {
                return false;
            }
        }
        if let Some(agency) = selected(&self.agency) {
            if mission.fields.agency != agency {
                return false;
            }
        }
        if let Some(target) = selected(&self.target) {
            if !mission.fields.target_bodies.iter().any(|t| t == target) {
                return false;
            }
        }
        contains_ignore_case(&mission.fields.name, &self.search)
    }

    /// Matching missions ordered for the current layout
    pub fn apply<'a>(&self, missions: &'a [SpaceMission]) -> Vec<&'a SpaceMission> {
        let mut out: Vec<&SpaceMission> = missions.iter().filter(|m| self.matches(m)).collect();
        match self.layout {
            MissionLayout::Timeline => out.sort_by_key(|m| m.fields.launch_date),
            MissionLayout::Grid => {
                out.sort_by(|a, b| b.fields.launch_date.cmp(&a.fields.launch_date))
            }
        }
        out
    }
}

/// Options for the mission filter dropdowns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionFacets {
    pub agencies: Vec<String>,
    pub targets: Vec<String>,
    pub statuses: Vec<String>,
}

fn push_distinct(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

impl From<&[SpaceMission]> for MissionFacets {
    fn from(missions: &[SpaceMission]) -> Self {
        let mut agencies = Vec::new();
        let mut targets = Vec::new();
        for mission in missions {
            push_distinct(&mut agencies, &mission.fields.agency);
            for target in &mission.fields.target_bodies {
                push_distinct(&mut targets, target);
            }
        }
        Self {
            agencies,
            targets,
            statuses: MISSION_STATUSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorksheetFilter {
    pub age_range: Option<String>,
    pub subject: Option<String>,
    pub search: String,
}

impl WorksheetFilter {
    pub fn matches(&self, worksheet: &Worksheet) -> bool {
        if let Some(age_range) = selected(&self.age_range) {
            if worksheet.age_range != age_range {
                return false;
            }
        }
        if let Some(subject) = selected(&self.subject) {
            if worksheet.subject != subject {
                return false;
            }
        }
        contains_ignore_case(&worksheet.title, &self.search)
    }

    pub fn apply<'a>(&self, worksheets: &'a [Worksheet]) -> Vec<&'a Worksheet> {
        worksheets.iter().filter(|w| self.matches(w)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetFacets {
    pub age_ranges: Vec<String>,
    pub subjects: Vec<String>,
}

impl From<&[Worksheet]> for WorksheetFacets {
    fn from(worksheets: &[Worksheet]) -> Self {
        let mut age_ranges = Vec::new();
        let mut subjects = Vec::new();
        for worksheet in worksheets {
            push_distinct(&mut age_ranges, &worksheet.age_range);
            push_distinct(&mut subjects, &worksheet.subject);
        }
        Self {
            age_ranges,
            subjects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::SeedData;
    use crate::db::schemas::{NewSpaceMission, NewWorksheet};
    use crate::db::Record;

    fn missions() -> Vec<SpaceMission> {
        let seed = SeedData::bundled().unwrap();
        seed.space_missions
            .into_iter()
            .enumerate()
            .map(|(i, m): (usize, NewSpaceMission)| SpaceMission::from_new(i as i64 + 1, m))
            .collect()
    }

    fn worksheets() -> Vec<Worksheet> {
        let seed = SeedData::bundled().unwrap();
        seed.worksheets
            .into_iter()
            .enumerate()
            .map(|(i, w): (usize, NewWorksheet)| Worksheet::from_new(i as i64 + 1, w))
            .collect()
    }

    #[test]
    fn test_default_filter_keeps_everything_in_launch_order() {
        let all = missions();
        let shown = MissionFilter::default().apply(&all);
        assert_eq!(shown.len(), all.len());
        assert!(shown.windows(2).all(|w| w[0].fields.launch_date <= w[1].fields.launch_date));
    }

    #[test]
    fn test_grid_layout_is_newest_first() {
        let all = missions();
        let filter = MissionFilter {
            layout: MissionLayout::Grid,
            ..MissionFilter::default()
        };
        let shown = filter.apply(&all);
        assert!(shown.windows(2).all(|w| w[0].fields.launch_date >= w[1].fields.launch_date));
    }

    #[test]
    fn test_all_sentinel_and_search() {
        let all = missions();
        let first = all[0].fields.name.clone();
        let filter = MissionFilter {
            status: Some(ALL.to_string()),
            search: first.to_uppercase(),
            ..MissionFilter::default()
        };
        let shown = filter.apply(&all);
        assert!(shown.iter().any(|m| m.fields.name == first));
        assert!(shown.iter().all(|m| m.fields.name.to_lowercase().contains(&first.to_lowercase())));
    }

    #[test]
    fn test_target_filter_is_membership() {
        let all = missions();
        let target = all[0].fields.target_bodies[0].clone();
        let filter = MissionFilter {
            target: Some(target.clone()),
            ..MissionFilter::default()
        };
        assert!(filter
            .apply(&all)
            .iter()
            .all(|m| m.fields.target_bodies.contains(&target)));
    }

    #[test]
    fn test_mission_facets_distinct_first_seen() {
        let all = missions();
        let facets = MissionFacets::from(all.as_slice());
        assert_eq!(facets.agencies[0], all[0].fields.agency);
        let mut deduped = facets.agencies.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), facets.agencies.len());
        assert_eq!(facets.statuses, vec!["planned", "active", "completed", "failed"]);
    }

    #[test]
    fn test_worksheet_filters() {
        let all = worksheets();
        let facets = WorksheetFacets::from(all.as_slice());
        let age_range = facets.age_ranges[0].clone();
        let filter = WorksheetFilter {
            age_range: Some(age_range.clone()),
            ..WorksheetFilter::default()
        };
        let shown = filter.apply(&all);
        assert!(!shown.is_empty());
        assert!(shown.iter().all(|w| w.age_range == age_range));

        let none = WorksheetFilter {
            search: "no worksheet has this title".into(),
            ..WorksheetFilter::default()
        };
        assert!(none.apply(&all).is_empty());
    }
}
