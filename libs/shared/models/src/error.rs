use thiserror::Error;

/// Failure taxonomy for every remote call made by the client.
///
/// Components never let one of these crash the view: each is converted into
/// a user-facing notification at the component boundary, and the worst case
/// is a forced re-login.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connectivity failure (the "status 0" class): refused connection,
    /// DNS failure, timeout.
    #[error("connection failure: {0}")]
    Network(String),

    /// 401 from the backend. The session must be cleared and the user sent
    /// back to login.
    #[error("authentication required")]
    Unauthorized,

    /// 419 that survived the single CSRF refresh-and-replay.
    #[error("session expired")]
    SessionExpired,

    /// 422 with a Laravel validation payload; carries the first field error.
    #[error("validation failed: {message}")]
    Validation { field: String, message: String },

    /// 409, raised on duplicate-CPF intake submissions.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The response did not match the expected payload shape.
    #[error("unexpected response payload: {0}")]
    Decode(String),

    /// The owning component was torn down while the call was in flight.
    #[error("request cancelled")]
    Cancelled,

    /// Any other non-success status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    /// Notification text shown to shelter staff. Kept in Portuguese to match
    /// the rest of the operator-facing copy.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Não foi possível conectar ao servidor. Verifique sua conexão.".to_string()
            }
            ApiError::Unauthorized => "Autenticação necessária. Faça login novamente.".to_string(),
            ApiError::SessionExpired => {
                "Sessão expirada. Por favor, faça login novamente.".to_string()
            }
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Conflict(_) => {
                "Já existe um agendamento com este CPF. Deseja substituir?".to_string()
            }
            ApiError::NotFound(_) => "Registro não encontrado.".to_string(),
            ApiError::Decode(_) | ApiError::Server { .. } => {
                "Erro ao processar a solicitação. Tente novamente mais tarde.".to_string()
            }
            ApiError::Cancelled => "Operação cancelada.".to_string(),
        }
    }

    /// True for the classes that invalidate the current session.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::SessionExpired)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            // Connect/timeout/request-build failures all land here; none of
            // them carry a meaningful HTTP status.
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
