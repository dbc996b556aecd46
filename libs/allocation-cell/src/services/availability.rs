use serde::Deserialize;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_gateway::BackendClient;
use shared_models::ApiError;

use crate::models::{
    fallback_rooms, AvailabilitySummary, BedOccupant, Room, RoomAvailability,
};
use crate::services::rooms::RoomService;

/// Derives per-room `{available, occupied}` tallies from the appointment
/// collection and the room reference list.
pub struct AvailabilityService {
    client: BackendClient,
    rooms: RoomService,
    capacity_per_room: u32,
}

impl AvailabilityService {
    pub fn new(client: BackendClient, config: &AppConfig) -> Self {
        Self {
            rooms: RoomService::new(client.clone()),
            client,
            capacity_per_room: config.room_capacity,
        }
    }

    /// Recomputes the summary. When the caller holds no appointment data the
    /// collection is reloaded first; otherwise whatever is in memory is
    /// used, stale or not. Reference failures degrade to a zeroed summary,
    /// never an error.
    pub async fn summary(&self, cached: &[BedOccupant]) -> AvailabilitySummary {
        let rooms = match self.rooms.rooms().await {
            Ok(rooms) => rooms,
            Err(err) => {
                warn!("room reference fetch failed, reporting zero availability: {err}");
                return AvailabilitySummary::zeroed(&fallback_rooms());
            }
        };

        if cached.is_empty() {
            match self.load_occupants().await {
                Ok(occupants) => reconcile(&rooms, &occupants, self.capacity_per_room),
                Err(err) => {
                    warn!("appointment reload failed, reporting zero availability: {err}");
                    AvailabilitySummary::zeroed(&rooms)
                }
            }
        } else {
            reconcile(&rooms, cached, self.capacity_per_room)
        }
    }

    /// The backend's own grand total, used by the intake banner. Falls back
    /// to zero on any failure.
    pub async fn remote_available_beds(&self) -> u32 {
        #[derive(Deserialize)]
        struct AvailableBeds {
            #[serde(rename = "availableBeds")]
            available_beds: u32,
        }

        match self
            .client
            .get::<AvailableBeds>("/api/appointments/available-beds")
            .await
        {
            Ok(body) => body.available_beds,
            Err(err) => {
                warn!("available-beds fetch failed, showing zero: {err}");
                0
            }
        }
    }

    /// Thin occupancy view of `GET /api/appointments`; only visibility and
    /// allocation are decoded.
    async fn load_occupants(&self) -> Result<Vec<BedOccupant>, ApiError> {
        #[derive(Deserialize)]
        struct OccupancyRecord {
            #[serde(default)]
            name: String,
            #[serde(default)]
            last_name: String,
            #[serde(rename = "isHidden", default)]
            is_hidden: bool,
            #[serde(rename = "additionalInfo", default)]
            info: Option<OccupancyInfo>,
        }

        #[derive(Deserialize, Default)]
        struct OccupancyInfo {
            room_id: Option<i64>,
            bed_id: Option<i64>,
        }

        debug!("reloading appointment collection for availability");
        let records: Vec<OccupancyRecord> = self.client.get("/api/appointments").await?;
        Ok(records
            .into_iter()
            .map(|record| {
                let info = record.info.unwrap_or_default();
                BedOccupant {
                    room_id: info.room_id,
                    bed_id: info.bed_id,
                    hidden: record.is_hidden,
                    guest_name: format!("{} {}", record.name, record.last_name),
                }
            })
            .collect())
    }
}

/// Pure reconciliation step.
///
/// Every known room starts at the configured capacity. Hidden appointments
/// and appointments without a bed assignment never count; records pointing
/// at a room absent from the reference set are skipped without raising.
pub fn reconcile(
    rooms: &[Room],
    occupants: &[BedOccupant],
    capacity_per_room: u32,
) -> AvailabilitySummary {
    let mut tallies: Vec<RoomAvailability> = rooms
        .iter()
        .map(|room| RoomAvailability {
            room_id: room.id,
            room_name: room.name.clone(),
            capacity: capacity_per_room,
            occupied: 0,
            available: capacity_per_room,
        })
        .collect();

    for occupant in occupants {
        if occupant.hidden || occupant.bed_id.is_none() {
            continue;
        }
        let Some(room_id) = occupant.room_id else {
            continue;
        };
        if let Some(row) = tallies.iter_mut().find(|row| row.room_id == room_id) {
            row.occupied += 1;
            row.available = row.capacity.saturating_sub(row.occupied);
        }
    }

    let total_capacity = tallies.iter().map(|row| row.capacity).sum();
    let total_occupied = tallies.iter().map(|row| row.occupied).sum();
    let total_available = tallies.iter().map(|row| row.available).sum();

    AvailabilitySummary {
        rooms: tallies,
        total_capacity,
        total_occupied,
        total_available,
    }
}
