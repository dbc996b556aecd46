use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use allocation_cell::{fallback_rooms, BedOccupant, BedView, Room, RoomService};
use reference_cell::{
    fallback_nationalities, LocaleService, Municipality, NationalityService, State,
};
use shared_config::AppConfig;
use shared_gateway::BackendClient;
use shared_models::ApiError;

use crate::models::Appointment;
use crate::services::directory::DirectoryService;
use crate::validation::validate_guest_fields;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Loading,
    Idle,
    Saving,
    Saved,
    Failed(String),
}

/// Single-record editing session.
///
/// Lifecycle: `Loading → Idle → Saving → (Saved | Failed)`. Only the
/// appointment fetch can fail the load; every reference list degrades to a
/// fallback. The cancellation token ties in-flight requests to the owning
/// component: when it fires, pending work resolves to
/// [`ApiError::Cancelled`] instead of landing on a dead view.
#[derive(Debug)]
pub struct Editor {
    client: BackendClient,
    locale: LocaleService,
    rooms_service: RoomService,
    cancel: CancellationToken,
    state: EditorState,
    pub appointment: Appointment,
    pub states: Vec<State>,
    pub municipalities: Vec<Municipality>,
    pub rooms: Vec<Room>,
    pub nationalities: Vec<String>,
    pub occupied: Vec<BedOccupant>,
    pub beds: Vec<BedView>,
}

impl Editor {
    /// Fetches the record and its reference data concurrently.
    pub async fn load(
        client: BackendClient,
        config: &AppConfig,
        id: i64,
        cancel: CancellationToken,
    ) -> Result<Self, ApiError> {
        debug!(id, "loading appointment editor");

        let locale = LocaleService::new(config)?;
        let nationality = NationalityService::new(config)?;
        let rooms_service = RoomService::new(client.clone());
        let directory_service = DirectoryService::new(client.clone(), config);
        let storage_base = config.storage_base_url();

        let fetch = async {
            let appointment_path = format!("/api/appointments/{id}");
            let (appointment, states, rooms, nationalities, directory) = tokio::join!(
                client.get::<Appointment>(&appointment_path),
                locale.states(),
                rooms_service.rooms(),
                nationality.nationalities(),
                directory_service.load(),
            );

            // The record itself is the only hard dependency.
            let mut appointment = appointment?;
            appointment.normalize(&storage_base);

            let states = states.unwrap_or_else(|err| {
                warn!("states fetch failed, continuing with an empty list: {err}");
                Vec::new()
            });
            let rooms = rooms.unwrap_or_else(|err| {
                warn!("rooms fetch failed, continuing with the fallback trio: {err}");
                fallback_rooms()
            });
            let nationalities = nationalities.unwrap_or_else(|err| {
                warn!("nationalities fetch failed, using the fallback list: {err}");
                fallback_nationalities()
            });
            let occupied = directory
                .map(|directory| directory.occupants())
                .unwrap_or_else(|err| {
                    warn!("occupied-bed fetch failed, beds will show as free: {err}");
                    Vec::new()
                });

            Ok::<_, ApiError>((appointment, states, rooms, nationalities, occupied))
        };

        let (appointment, states, rooms, nationalities, occupied) = tokio::select! {
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
            loaded = fetch => loaded?,
        };

        let mut editor = Self {
            client,
            locale,
            rooms_service,
            cancel,
            state: EditorState::Loading,
            appointment,
            states,
            municipalities: Vec::new(),
            rooms,
            nationalities,
            occupied,
            beds: Vec::new(),
        };

        if let Some(room_id) = editor.appointment.room_id() {
            editor.refresh_beds(room_id).await;
        }

        editor.state = EditorState::Idle;
        Ok(editor)
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_saved(&self) -> bool {
        self.state == EditorState::Saved
    }

    /// Municipalities for the picked state. Failures degrade to an empty
    /// list; the operator can still type the city by hand.
    pub async fn select_state(&mut self, state_id: i64) {
        self.municipalities = match self.locale.municipalities(state_id).await {
            Ok(municipalities) => municipalities,
            Err(err) => {
                warn!(state_id, "municipalities fetch failed: {err}");
                Vec::new()
            }
        };
    }

    /// Moves the guest to another room and reloads that room's bed board.
    pub async fn select_room(&mut self, room_id: i64) {
        self.appointment.info_mut().room_id = Some(room_id);
        self.appointment.info_mut().bed_id = None;
        self.refresh_beds(room_id).await;
    }

    pub fn assign_bed(&mut self, bed_id: i64) {
        self.appointment.info_mut().bed_id = Some(bed_id);
    }

    async fn refresh_beds(&mut self, room_id: i64) {
        self.beds = match self.rooms_service.beds(room_id).await {
            Ok(beds) => RoomService::beds_with_occupants(beds, &self.occupied),
            Err(err) => {
                warn!(room_id, "bed fetch failed: {err}");
                Vec::new()
            }
        };
    }

    /// Submits the edit. Enters `Saving` only when local validation passes;
    /// the outcome maps exactly onto the error taxonomy:
    /// 419 is replayed once inside the gateway, a repeat surfaces here as
    /// session-expired; 401 clears the session for the login redirect; 422
    /// carries the server's first field error; anything else returns the
    /// editor to `Idle` behind a generic message.
    pub async fn save(&mut self) -> Result<(), ApiError> {
        if !matches!(self.state, EditorState::Idle | EditorState::Failed(_)) {
            return Err(ApiError::Conflict("edição já está sendo salva".to_string()));
        }

        let issues = validate_guest_fields(
            &self.appointment.guest_fields(),
            Utc::now().date_naive(),
        );
        if let Some(first) = issues.first() {
            self.state = EditorState::Failed(first.message.clone());
            return Err(ApiError::Validation {
                field: first.field.clone(),
                message: first.message.clone(),
            });
        }

        self.state = EditorState::Saving;
        debug!(id = self.appointment.id, "saving appointment");

        // Saving always returns the record to the active list.
        let mut payload = self.appointment.clone();
        payload.is_hidden = false;

        let path = format!("/api/appointments/{}", payload.id);
        let body = serde_json::to_value(&payload)?;

        let result = tokio::select! {
            _ = self.cancel.cancelled() => Err(ApiError::Cancelled),
            saved = self.client.put::<Appointment>(&path, body) => saved,
        };

        match result {
            Ok(mut updated) => {
                updated.normalize(&self.client_storage_base());
                self.appointment = updated;
                self.state = EditorState::Saved;
                Ok(())
            }
            Err(err) => {
                match &err {
                    ApiError::Unauthorized | ApiError::SessionExpired => {
                        self.client.session().clear();
                        self.state = EditorState::Failed(err.user_message());
                    }
                    ApiError::Validation { .. } => {
                        self.state = EditorState::Failed(err.user_message());
                    }
                    _ => {
                        self.state = EditorState::Idle;
                    }
                }
                Err(err)
            }
        }
    }

    fn client_storage_base(&self) -> String {
        format!(
            "{}/storage",
            self.client.base_url().as_str().trim_end_matches('/')
        )
    }
}
