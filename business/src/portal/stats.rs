//! Dashboard and assessment-page statistics.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::AssignedProduct;

/// Headline numbers for the dashboard metric cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentStats {
    #[serde(default)]
    pub total_assigned: u32,
    #[serde(default)]
    pub total_in_process: u32,
    #[serde(default)]
    pub total_completed: u32,
    #[serde(default)]
    pub completion_rate: Option<f64>,
}

impl AssessmentStats {
    pub fn total(&self) -> u32 {
        self.total_assigned + self.total_in_process + self.total_completed
    }

    /// Reported completion rate, else completed over all assessments.
    pub fn completion_percent(&self) -> u32 {
        if let Some(rate) = self.completion_rate {
            return rate.clamp(0.0, 100.0).round() as u32;
        }
        match self.total() {
            0 => 0,
            total => (f64::from(self.total_completed) / f64::from(total) * 100.0).round() as u32,
        }
    }
}

/// Status counts shown above the assessments table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentCounts {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub assigned: u32,
    #[serde(default)]
    pub in_process: u32,
    #[serde(default)]
    pub completed: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub total_users: u32,
    #[serde(default)]
    pub active_users: u32,
}

/// Bucket size for the trends chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TrendType {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl TrendType {
    pub const ALL: [Self; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];

    /// Value of the `trendType` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "day-on-day",
            Self::Weekly => "week-on-week",
            Self::Monthly => "month-on-month",
            Self::Yearly => "year-on-year",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily Trends",
            Self::Weekly => "Weekly Trends",
            Self::Monthly => "Monthly Trends",
            Self::Yearly => "Yearly Trends",
        }
    }
}

impl fmt::Display for TrendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One bucket of the trends series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Bucket label as the backend formats it.
    pub date: String,
    /// Assigned but not yet completed.
    #[serde(default)]
    pub pending: u32,
    #[serde(default)]
    pub in_process: u32,
    #[serde(default)]
    pub completed: u32,
}

/// Largest value across both plotted series, at least 1.
pub fn trend_scale(points: &[TrendPoint]) -> u32 {
    points
        .iter()
        .map(|point| point.pending.max(point.completed))
        .max()
        .unwrap_or_default()
        .max(1)
}

/// A recently completed assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub assessment_type: Option<String>,
    #[serde(default)]
    pub updated_on: Option<DateTime<Utc>>,
}

impl ActivityEntry {
    /// "User - Assessment" headline.
    pub fn title(&self) -> String {
        format!(
            "{} - {}",
            self.user_name.as_deref().unwrap_or("Unknown user"),
            self.assessment_type.as_deref().unwrap_or("Assessment"),
        )
    }
}

/// Signed link to a consultation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLink {
    pub report_link: String,
}

/// Share of assessments per assessment name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionEntry {
    pub name: String,
    pub count: usize,
    /// Rounded share of all assessments.
    pub percentage: u32,
}

/// Counts assessments per name, in the order names first appear.
pub fn distribution(assessments: &[AssignedProduct]) -> Vec<DistributionEntry> {
    let mut entries: Vec<DistributionEntry> = Vec::new();
    for assessment in assessments {
        let name = assessment.display_assessment();
        match entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.count += 1,
            None => entries.push(DistributionEntry {
                name: name.to_owned(),
                count: 1,
                percentage: 0,
            }),
        }
    }

    let total = assessments.len();
    for entry in &mut entries {
        entry.percentage = (entry.count as f64 / total as f64 * 100.0).round() as u32;
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assessment(name: &str) -> AssignedProduct {
        serde_json::from_value(json!({
            "_id": format!("a-{name}"),
            "assessmentName": name,
            "status": "ASSIGNED"
        }))
        .unwrap()
    }

    #[test]
    fn completion_prefers_reported_rate() {
        let stats: AssessmentStats = serde_json::from_value(json!({
            "totalAssigned": 4, "totalInProcess": 2, "totalCompleted": 2, "completionRate": 33.4
        }))
        .unwrap();

        assert_eq!(stats.total(), 8);
        assert_eq!(stats.completion_percent(), 33);
    }

    #[test]
    fn completion_is_computed_when_missing() {
        let stats = AssessmentStats {
            total_assigned: 1,
            total_in_process: 0,
            total_completed: 3,
            completion_rate: None,
        };

        assert_eq!(stats.completion_percent(), 75);
        assert_eq!(AssessmentStats::default().completion_percent(), 0);
    }

    #[test]
    fn distribution_counts_in_first_seen_order() {
        let rows = vec![
            assessment("Hearing"),
            assessment("Vision"),
            assessment("Hearing"),
        ];

        let entries = distribution(&rows);

        assert_eq!(
            entries,
            vec![
                DistributionEntry {
                    name: "Hearing".to_owned(),
                    count: 2,
                    percentage: 67,
                },
                DistributionEntry {
                    name: "Vision".to_owned(),
                    count: 1,
                    percentage: 33,
                },
            ]
        );
        assert!(distribution(&[]).is_empty());
    }

    #[test]
    fn trend_scale_never_drops_below_one() {
        let points = vec![TrendPoint {
            date: "Jan".to_owned(),
            pending: 4,
            in_process: 9,
            completed: 6,
        }];

        assert_eq!(trend_scale(&points), 6);
        assert_eq!(trend_scale(&[]), 1);
    }

    #[test]
    fn trend_types_use_query_values() {
        assert_eq!(TrendType::default().as_str(), "month-on-month");
        assert_eq!(TrendType::Weekly.label(), "Weekly Trends");
    }

    #[test]
    fn activity_title_names_user_and_assessment() {
        let entry: ActivityEntry = serde_json::from_value(json!({
            "userName": "Asha", "assessmentType": "Hearing", "updatedOn": "2024-04-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(entry.title(), "Asha - Hearing");
    }
}
