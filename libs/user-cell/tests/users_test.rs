use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_gateway::BackendClient;
use shared_models::{ApiError, SessionContext};
use shared_utils::test_utils::TestConfig;
use user_cell::{UpdateUserRequest, UserService};

fn service_for(server: &MockServer) -> UserService {
    let config = TestConfig::for_server(&server.uri()).to_app_config();
    UserService::new(BackendClient::new(&config, SessionContext::new()).unwrap())
}

#[tokio::test]
async fn list_and_get_decode_staff_accounts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Admin", "email": "admin@abrigo.org", "role": "admin"},
            {"id": 2, "name": "Plantão", "role": "employee"},
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": 2, "name": "Plantão", "role": "employee"}
        )))
        .mount(&server)
        .await;

    let service = service_for(&server);

    let users = service.list().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].role, "admin");
    // Optional wire fields default instead of failing the decode.
    assert_eq!(users[1].email, "");

    let user = service.get(2).await.unwrap();
    assert_eq!(user.name, "Plantão");
}

#[tokio::test]
async fn update_sends_only_present_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/users/2"))
        .and(body_json(json!({"role": "admin"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": 2, "name": "Plantão", "role": "admin"}
        )))
        .expect(1)
        .mount(&server)
        .await;

    let updated = service_for(&server)
        .update(
            2,
            &UpdateUserRequest {
                role: Some("admin".to_string()),
                ..UpdateUserRequest::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.role, "admin");
}

#[tokio::test]
async fn remove_propagates_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "no user"})))
        .mount(&server)
        .await;

    let result = service_for(&server).remove(9).await;
    assert_matches!(result, Err(ApiError::NotFound(_)));
}
