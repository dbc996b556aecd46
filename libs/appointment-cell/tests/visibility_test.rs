use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use allocation_cell::{fallback_rooms, reconcile};
use appointment_cell::{Appointment, Directory, VisibilityService};
use shared_gateway::BackendClient;
use shared_models::SessionContext;
use shared_utils::test_utils::{MockBackendResponses, TestConfig};

fn directory_with_one_allocated_guest() -> Directory {
    let record: Appointment =
        serde_json::from_value(MockBackendResponses::appointment_with_bed(5, "Maria", 1, 1))
            .unwrap();
    Directory::new(vec![record])
}

fn client_for(server: &MockServer) -> BackendClient {
    let config = TestConfig::for_server(&server.uri()).to_app_config();
    BackendClient::new(&config, SessionContext::new()).unwrap()
}

#[tokio::test]
async fn hiding_frees_the_bed_and_unhiding_reclaims_it() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/appointments/5/hide"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(2)
        .mount(&server)
        .await;

    let service = VisibilityService::new(client_for(&server));
    let mut directory = directory_with_one_allocated_guest();

    let before = reconcile(&fallback_rooms(), &directory.occupants(), 4);
    assert_eq!(before.total_available, 11);

    service.hide(&mut directory, 5).await.unwrap();
    assert!(directory.visible().is_empty());
    let while_hidden = reconcile(&fallback_rooms(), &directory.occupants(), 4);
    assert_eq!(while_hidden.total_available, 12);

    // Toggling back restores the original membership and the original
    // availability.
    service.unhide(&mut directory, 5).await.unwrap();
    assert_eq!(directory.visible().len(), 1);
    let after = reconcile(&fallback_rooms(), &directory.occupants(), 4);
    assert_eq!(after.total_available, 11);
}

#[tokio::test]
async fn the_wire_payload_carries_the_target_visibility() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/appointments/5/hide"))
        .and(body_json(json!({"isHidden": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let service = VisibilityService::new(client_for(&server));
    service.set_hidden(5, true).await.unwrap();
}

#[tokio::test]
async fn remote_failure_leaves_the_visible_set_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/appointments/5/hide"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = VisibilityService::new(client_for(&server));
    let mut directory = directory_with_one_allocated_guest();

    let result = service.hide(&mut directory, 5).await;

    assert!(result.is_err());
    assert_eq!(directory.visible().len(), 1);
}
