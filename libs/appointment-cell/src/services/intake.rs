use chrono::NaiveDate;
use tracing::{debug, info};

use shared_gateway::BackendClient;
use shared_models::ApiError;

use crate::models::{Appointment, NewAppointment};
use crate::validation::{validate_arrival_window, validate_guest_fields, FieldIssue};

/// Outcome of an intake submission. A duplicate CPF is not an error at this
/// boundary: the operator decides whether to overwrite.
#[derive(Debug)]
pub enum IntakeOutcome {
    Created(Appointment),
    /// Backend answered 409; carries the conflict message for the
    /// confirmation prompt.
    DuplicateCpf(String),
}

pub struct IntakeService {
    client: BackendClient,
}

impl IntakeService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Guest rules plus the intake-only arrival window.
    pub fn validate(&self, draft: &NewAppointment, today: NaiveDate) -> Vec<FieldIssue> {
        let mut issues = validate_guest_fields(&draft.guest_fields(), today);
        if let Some(issue) = validate_arrival_window(draft.arrival_date, today) {
            issues.push(issue);
        }
        issues
    }

    /// First submission. A 409 comes back as
    /// [`IntakeOutcome::DuplicateCpf`] instead of an error so the caller can
    /// run the confirmation flow.
    pub async fn submit(&self, draft: &NewAppointment) -> Result<IntakeOutcome, ApiError> {
        debug!(cpf = %draft.cpf, "submitting intake");

        match self
            .client
            .post::<Appointment>("/api/appointments", serde_json::to_value(draft)?)
            .await
        {
            Ok(created) => {
                info!(id = created.id, "intake created");
                Ok(IntakeOutcome::Created(created))
            }
            Err(ApiError::Conflict(message)) => Ok(IntakeOutcome::DuplicateCpf(message)),
            Err(err) => Err(err),
        }
    }

    /// Confirmed overwrite of a duplicate-CPF conflict. The resubmission
    /// carries `replace: true` and fully replaces the existing record.
    pub async fn submit_replacing(&self, draft: &NewAppointment) -> Result<Appointment, ApiError> {
        debug!(cpf = %draft.cpf, "resubmitting intake with replace flag");

        let mut confirmed = draft.clone();
        confirmed.replace = Some(true);
        self.client
            .post("/api/appointments", serde_json::to_value(&confirmed)?)
            .await
    }
}
