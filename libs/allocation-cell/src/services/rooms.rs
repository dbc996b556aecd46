use futures::future::join_all;
use tracing::debug;

use shared_gateway::BackendClient;
use shared_models::ApiError;

use crate::models::{Bed, BedOccupant, BedView, Room};

/// Client for the room/bed reference endpoints.
#[derive(Debug)]
pub struct RoomService {
    client: BackendClient,
}

impl RoomService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn rooms(&self) -> Result<Vec<Room>, ApiError> {
        debug!("fetching room reference list");
        self.client.get("/api/rooms").await
    }

    pub async fn beds(&self, room_id: i64) -> Result<Vec<Bed>, ApiError> {
        debug!(room_id, "fetching beds for room");
        self.client.get(&format!("/api/rooms/{room_id}/beds")).await
    }

    /// Beds of every room, fetched concurrently. Rooms whose bed fetch fails
    /// are returned with an empty list instead of failing the whole view.
    pub async fn beds_for_rooms(&self, rooms: &[Room]) -> Vec<(i64, Vec<Bed>)> {
        let fetches = rooms.iter().map(|room| async move {
            let beds = self.beds(room.id).await.unwrap_or_default();
            (room.id, beds)
        });
        join_all(fetches).await
    }

    /// Joins a room's beds against the appointment collection so the editor
    /// can show who occupies what. Hidden guests free their bed.
    pub fn beds_with_occupants(beds: Vec<Bed>, occupants: &[BedOccupant]) -> Vec<BedView> {
        beds.into_iter()
            .map(|bed| {
                let occupant = occupants
                    .iter()
                    .find(|entry| !entry.hidden && entry.bed_id == Some(bed.id));
                BedView {
                    id: bed.id,
                    bed_number: bed.bed_number,
                    is_available: occupant.is_none(),
                    occupant_name: occupant.map(|entry| entry.guest_name.clone()),
                }
            })
            .collect()
    }
}
