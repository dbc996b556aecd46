use std::collections::BTreeMap;

use serde::Deserialize;

/// Aggregates served by `GET /api/reports`. Rendering (charts, PDF export)
/// stays out of scope; this is the data contract only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportOverview {
    /// Occupied-bed count keyed by room label.
    #[serde(default)]
    pub bed_counts: BTreeMap<String, u32>,
    #[serde(default)]
    pub gender_counts: Vec<GenderCount>,
    #[serde(default)]
    pub age_counts: Vec<AgeCount>,
    /// Raw arrival times; shift bucketing happens client-side.
    #[serde(default)]
    pub time_data: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenderCount {
    pub gender: String,
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgeCount {
    pub group: String,
    pub count: u32,
}

/// Arrival-time bucket (turno).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shift {
    Madrugada,
    Manha,
    Tarde,
    Noite,
}

impl Shift {
    pub const ALL: [Shift; 4] = [Shift::Madrugada, Shift::Manha, Shift::Tarde, Shift::Noite];

    /// Buckets an `HH:MM` string. Unparsable entries land in the overnight
    /// bucket, matching how the legacy report treated them.
    pub fn from_time(time: &str) -> Shift {
        let hour: Option<u32> = time.split(':').next().and_then(|raw| raw.parse().ok());
        match hour {
            Some(hour) if (6..12).contains(&hour) => Shift::Manha,
            Some(hour) if (12..18).contains(&hour) => Shift::Tarde,
            Some(hour) if (18..24).contains(&hour) => Shift::Noite,
            _ => Shift::Madrugada,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Shift::Madrugada => "madrugada",
            Shift::Manha => "manha",
            Shift::Tarde => "tarde",
            Shift::Noite => "noite",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Shift::Madrugada => "Madrugada (00:00 - 06:00)",
            Shift::Manha => "Manhã (06:00 - 12:00)",
            Shift::Tarde => "Tarde (12:00 - 18:00)",
            Shift::Noite => "Noite (18:00 - 23:59)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftCount {
    pub shift: Shift,
    pub count: u32,
}

/// Query filters accepted by the report endpoint; empty fields are omitted
/// from the query string.
#[derive(Debug, Clone, Default)]
pub struct ReportFilters {
    pub room: Option<String>,
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub turn: Option<Shift>,
}

impl ReportFilters {
    pub fn is_empty(&self) -> bool {
        self.room.is_none()
            && self.gender.is_none()
            && self.age_group.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.turn.is_none()
    }
}

pub fn age_group_label(key: &str) -> &str {
    match key {
        "adultos" => "Adultos (18-59)",
        "idosos" => "Idosos (60+)",
        other => other,
    }
}
