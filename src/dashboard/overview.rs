//! Role-aware counters for the dashboard home page

use crate::core::auth::Role;
use crate::core::entity::RecordId;
use crate::core::field::parse_timestamp;
use crate::core::status::MeasurementStatus;
use crate::entities::{Measurement, User};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of entries on the recent-activity timeline
pub const TIMELINE_LEN: usize = 5;

/// One slice of the status pie
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSlice {
    pub status: MeasurementStatus,
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub id: Option<RecordId>,
    /// `"{customer} ({status})"`
    pub title: String,
    pub time: Option<DateTime<Utc>>,
}

/// Everything the home page shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub total_users: usize,
    /// All appointments, whatever the role
    pub total_measurements: usize,
    pub assigned: usize,
    pub in_progress: usize,
    pub status_breakdown: Vec<StatusSlice>,
    pub timeline: Vec<TimelineEntry>,
}

impl Overview {
    pub fn compute(role: Role, measurements: &[Measurement], users: &[User]) -> Self {
        let statuses = role.visible_statuses();
        let visible: Vec<&Measurement> = match role {
            Role::Admin => measurements.iter().collect(),
            Role::Normal => measurements
                .iter()
                .filter(|m| m.status.is_some_and(|s| statuses.contains(&s)))
                .collect(),
        };

        let count = |status: MeasurementStatus| {
            visible
                .iter()
                .filter(|m| m.status == Some(status))
                .count()
        };

        let status_breakdown = statuses
            .iter()
            .map(|&status| StatusSlice {
                status,
                label: status.label(),
                value: count(status),
            })
            .collect();

        let mut recent: Vec<(Option<DateTime<Utc>>, &Measurement)> =
            visible.iter().map(|m| (activity_time(m), *m)).collect();
        // Newest first, undated entries last; sort_by is stable
        recent.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        let timeline = recent
            .into_iter()
            .take(TIMELINE_LEN)
            .map(|(time, m)| TimelineEntry {
                id: m.id.clone(),
                title: format!("{} ({})", m.customer_name, m.status()),
                time,
            })
            .collect();

        let overview = Self {
            total_users: users.len(),
            total_measurements: measurements.len(),
            assigned: count(MeasurementStatus::Assigned),
            in_progress: count(MeasurementStatus::InProgress),
            status_breakdown,
            timeline,
        };

        tracing::debug!(
            role = %role,
            measurements = overview.total_measurements,
            visible = visible.len(),
            "computed overview"
        );
        overview
    }
}

/// Creation time, falling back to the appointment date
fn activity_time(measurement: &Measurement) -> Option<DateTime<Utc>> {
    measurement
        .created_at
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| measurement.measurement_date.as_deref().and_then(parse_timestamp))
}
