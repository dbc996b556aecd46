use assert_matches::assert_matches;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::{Editor, EditorState};
use shared_gateway::BackendClient;
use shared_models::{ApiError, SessionContext, SessionState};
use shared_utils::test_utils::{MockBackendResponses, TestConfig};

fn staff_session() -> SessionContext {
    let session = SessionContext::new();
    session.begin(SessionState {
        token: "staff-token".to_string(),
        role: "admin".to_string(),
        user_id: Some(7),
        photo_url: None,
    });
    session
}

fn client_for(server: &MockServer, session: SessionContext) -> BackendClient {
    let config = TestConfig::for_server(&server.uri()).to_app_config();
    BackendClient::new(&config, session).unwrap()
}

/// Appointment by id plus the collection; reference endpoints are left
/// unmounted on purpose so their 404s exercise the fallback paths.
async fn mount_minimal_load(server: &MockServer, id: i64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/appointments/{id}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::appointment(id, "Maria", "Silva")),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::appointment_with_bed(9, "Ocupante", 1, 1)
        ])))
        .mount(server)
        .await;
}

async fn mount_csrf(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/sanctum/csrf-cookie"))
        .respond_with(
            ResponseTemplate::new(204).insert_header("set-cookie", "XSRF-TOKEN=fresh; Path=/"),
        )
        .mount(server)
        .await;
}

async fn loaded_editor(server: &MockServer, session: SessionContext) -> Editor {
    let config = TestConfig::for_server(&server.uri()).to_app_config();
    let client = BackendClient::new(&config, session).unwrap();
    Editor::load(client, &config, 1, CancellationToken::new())
        .await
        .unwrap()
}

#[tokio::test]
async fn load_degrades_reference_failures_to_fallbacks() {
    let server = MockServer::start().await;
    mount_minimal_load(&server, 1).await;

    let editor = loaded_editor(&server, staff_session()).await;

    assert_eq!(*editor.state(), EditorState::Idle);
    assert_eq!(editor.appointment.name, "Maria");
    // Reference endpoints all 404ed: states stay empty, rooms fall back to
    // the fixed trio, nationalities to the short list.
    assert!(editor.states.is_empty());
    assert_eq!(editor.rooms.len(), 3);
    assert_eq!(editor.nationalities.len(), 5);
    assert_eq!(editor.occupied.len(), 1);
}

#[tokio::test]
async fn load_honors_the_teardown_signal() {
    let server = MockServer::start().await;
    mount_minimal_load(&server, 1).await;

    let config = TestConfig::for_server(&server.uri()).to_app_config();
    let client = client_for(&server, staff_session());

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = Editor::load(client, &config, 1, cancel).await;
    assert_matches!(result, Err(ApiError::Cancelled));
}

#[tokio::test]
async fn missing_appointment_fails_the_load_outright() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = TestConfig::for_server(&server.uri()).to_app_config();
    let client = client_for(&server, staff_session());

    let result = Editor::load(client, &config, 42, CancellationToken::new()).await;
    assert_matches!(result, Err(ApiError::NotFound(_)));
}

#[tokio::test]
async fn save_success_forces_the_record_back_into_the_active_list() {
    let server = MockServer::start().await;
    mount_minimal_load(&server, 1).await;

    let mut saved = MockBackendResponses::appointment(1, "Maria", "Silva");
    saved["observation"] = json!("atualizado");

    Mock::given(method("PUT"))
        .and(path("/api/appointments/1"))
        .and(body_partial_json(json!({"isHidden": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(saved))
        .expect(1)
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&server, staff_session()).await;
    editor.appointment.observation = "atualizado".to_string();

    editor.save().await.unwrap();

    assert!(editor.is_saved());
    assert_eq!(editor.appointment.observation, "atualizado");
}

#[tokio::test]
async fn a_419_is_replayed_exactly_once() {
    let server = MockServer::start().await;
    mount_minimal_load(&server, 1).await;
    mount_csrf(&server).await;

    Mock::given(method("PUT"))
        .and(path("/api/appointments/1"))
        .respond_with(ResponseTemplate::new(419))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/appointments/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::appointment(1, "Maria", "Silva")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&server, staff_session()).await;
    editor.save().await.unwrap();

    assert!(editor.is_saved());
}

#[tokio::test]
async fn a_second_419_escalates_to_session_expired() {
    let server = MockServer::start().await;
    mount_minimal_load(&server, 1).await;
    mount_csrf(&server).await;

    Mock::given(method("PUT"))
        .and(path("/api/appointments/1"))
        .respond_with(ResponseTemplate::new(419))
        .expect(2)
        .mount(&server)
        .await;

    let session = staff_session();
    let mut editor = loaded_editor(&server, session.clone()).await;
    let result = editor.save().await;

    assert_matches!(result, Err(ApiError::SessionExpired));
    assert!(!session.is_authenticated());
    assert_matches!(editor.state(), EditorState::Failed(_));
}

#[tokio::test]
async fn a_401_clears_the_session_for_the_login_redirect() {
    let server = MockServer::start().await;
    mount_minimal_load(&server, 1).await;

    Mock::given(method("PUT"))
        .and(path("/api/appointments/1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let session = staff_session();
    let mut editor = loaded_editor(&server, session.clone()).await;
    let result = editor.save().await;

    assert_matches!(result, Err(ApiError::Unauthorized));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn a_422_surfaces_the_first_field_error() {
    let server = MockServer::start().await;
    mount_minimal_load(&server, 1).await;

    Mock::given(method("PUT"))
        .and(path("/api/appointments/1"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "The given data was invalid.",
            "errors": {"cpf": ["O CPF informado é inválido."]}
        })))
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&server, staff_session()).await;
    let result = editor.save().await;

    assert_matches!(result, Err(ApiError::Validation { field, message }) => {
        assert_eq!(field, "cpf");
        assert_eq!(message, "O CPF informado é inválido.");
    });
    assert_eq!(
        *editor.state(),
        EditorState::Failed("O CPF informado é inválido.".to_string())
    );
}

#[tokio::test]
async fn any_other_failure_returns_the_editor_to_idle() {
    let server = MockServer::start().await;
    mount_minimal_load(&server, 1).await;

    Mock::given(method("PUT"))
        .and(path("/api/appointments/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&server, staff_session()).await;
    let result = editor.save().await;

    assert_matches!(result, Err(ApiError::Server { status: 500, .. }));
    assert_eq!(*editor.state(), EditorState::Idle);
}

#[tokio::test]
async fn invalid_fields_never_reach_the_wire() {
    let server = MockServer::start().await;
    mount_minimal_load(&server, 1).await;

    Mock::given(method("PUT"))
        .and(path("/api/appointments/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&server, staff_session()).await;
    editor.appointment.cpf = "12345678900".to_string();

    let result = editor.save().await;

    assert_matches!(result, Err(ApiError::Validation { field, .. }) => {
        assert_eq!(field, "cpf");
    });
    assert_matches!(editor.state(), EditorState::Failed(_));
}

#[tokio::test]
async fn selecting_a_room_reloads_its_bed_board() {
    let server = MockServer::start().await;
    mount_minimal_load(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/rooms/1/beds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::beds(1)))
        .mount(&server)
        .await;

    let mut editor = loaded_editor(&server, staff_session()).await;
    editor.select_room(1).await;

    assert_eq!(editor.appointment.room_id(), Some(1));
    assert_eq!(editor.appointment.bed_id(), None);
    assert_eq!(editor.beds.len(), 2);
    // Bed 1 is taken by the occupant from the collection mock.
    assert!(!editor.beds[0].is_available);
    assert_eq!(editor.beds[0].occupant_name.as_deref(), Some("Ocupante Silva"));

    editor.assign_bed(2);
    assert_eq!(editor.appointment.bed_id(), Some(2));
}
