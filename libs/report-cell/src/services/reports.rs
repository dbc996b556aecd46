use tracing::debug;

use shared_gateway::BackendClient;
use shared_models::ApiError;

use crate::models::{ReportFilters, ReportOverview, Shift, ShiftCount};

pub struct ReportService {
    client: BackendClient,
}

impl ReportService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Fetches the aggregate report, filtered server-side when filters are
    /// set.
    pub async fn overview(&self, filters: &ReportFilters) -> Result<ReportOverview, ApiError> {
        let path = format!("/api/reports{}", query_string(filters));
        debug!(%path, "fetching report overview");
        self.client.get(&path).await
    }

    /// Buckets raw arrival times into shifts. With a shift filter only the
    /// selected bucket is returned; otherwise all four, in day order.
    pub fn shift_counts(time_data: &[String], only: Option<Shift>) -> Vec<ShiftCount> {
        let mut counts = [0u32; 4];
        for time in time_data {
            let shift = Shift::from_time(time);
            let slot = Shift::ALL
                .iter()
                .position(|candidate| *candidate == shift)
                .unwrap_or(0);
            counts[slot] += 1;
        }

        Shift::ALL
            .iter()
            .zip(counts)
            .filter(|(shift, _)| only.map_or(true, |selected| selected == **shift))
            .map(|(shift, count)| ShiftCount {
                shift: *shift,
                count,
            })
            .collect()
    }
}

fn query_string(filters: &ReportFilters) -> String {
    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(room) = &filters.room {
        params.push(("room", room.clone()));
    }
    if let Some(gender) = &filters.gender {
        params.push(("gender", gender.clone()));
    }
    if let Some(age_group) = &filters.age_group {
        params.push(("ageGroup", age_group.clone()));
    }
    if let Some(start_date) = &filters.start_date {
        params.push(("startDate", start_date.clone()));
    }
    if let Some(end_date) = &filters.end_date {
        params.push(("endDate", end_date.clone()));
    }
    if let Some(turn) = filters.turn {
        params.push(("turn", turn.key().to_string()));
    }

    if params.is_empty() {
        return String::new();
    }

    let encoded: Vec<String> = params
        .iter()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect();
    format!("?{}", encoded.join("&"))
}
