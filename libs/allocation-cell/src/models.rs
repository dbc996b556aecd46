use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
}

/// Reference record from `GET /api/rooms/{id}/beds`. Occupancy is not part
/// of the wire shape; it is rederived by joining against the appointment
/// collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bed {
    pub id: i64,
    #[serde(default)]
    pub bed_number: String,
}

/// A bed joined with the guest currently assigned to it, for the editor's
/// room picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedView {
    pub id: i64,
    pub bed_number: String,
    pub is_available: bool,
    pub occupant_name: Option<String>,
}

/// Minimal occupancy view of one appointment. Visibility and allocation are
/// the only facts the reconciler needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BedOccupant {
    pub room_id: Option<i64>,
    pub bed_id: Option<i64>,
    pub hidden: bool,
    pub guest_name: String,
}

/// Derived availability row for one room. Never persisted; recomputed on
/// every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomAvailability {
    pub room_id: i64,
    pub room_name: String,
    pub capacity: u32,
    pub occupied: u32,
    pub available: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilitySummary {
    pub rooms: Vec<RoomAvailability>,
    pub total_capacity: u32,
    pub total_occupied: u32,
    pub total_available: u32,
}

impl AvailabilitySummary {
    /// Zeroed fallback used when the room reference fetch fails: every known
    /// room shows zero beds available rather than failing the whole view.
    pub fn zeroed(rooms: &[Room]) -> Self {
        Self {
            rooms: rooms
                .iter()
                .map(|room| RoomAvailability {
                    room_id: room.id,
                    room_name: room.name.clone(),
                    capacity: 0,
                    occupied: 0,
                    available: 0,
                })
                .collect(),
            total_capacity: 0,
            total_occupied: 0,
            total_available: 0,
        }
    }

    pub fn room(&self, room_id: i64) -> Option<&RoomAvailability> {
        self.rooms.iter().find(|row| row.room_id == room_id)
    }
}

/// Room trio the legacy screens hard-coded; used when the reference
/// endpoint is unreachable.
pub fn fallback_rooms() -> Vec<Room> {
    vec![
        Room {
            id: 1,
            name: "Quarto A".to_string(),
        },
        Room {
            id: 2,
            name: "Quarto B".to_string(),
        },
        Room {
            id: 3,
            name: "Quarto C".to_string(),
        },
    ]
}

/// Display name for an allocation, `Não alocado` when unassigned or the
/// room is unknown.
pub fn room_display_name(rooms: &[Room], room_id: Option<i64>) -> String {
    room_id
        .and_then(|id| rooms.iter().find(|room| room.id == id))
        .map(|room| room.name.clone())
        .unwrap_or_else(|| "Não alocado".to_string())
}

pub fn bed_display_name(bed_id: Option<i64>) -> String {
    match bed_id {
        Some(id) => format!("Cama {id}"),
        None => "Não alocado".to_string(),
    }
}
