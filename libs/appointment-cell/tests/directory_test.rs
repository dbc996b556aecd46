use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::{search_and_sort, sort_entries, Appointment, Directory, DirectoryService, SortField, SortKey, SortOrder};
use shared_gateway::BackendClient;
use shared_models::SessionContext;
use shared_utils::test_utils::{MockBackendResponses, TestConfig};

fn appointment_from(value: serde_json::Value) -> Appointment {
    serde_json::from_value(value).unwrap()
}

fn sample_directory() -> Directory {
    Directory::new(vec![
        appointment_from(MockBackendResponses::appointment(1, "Bruna", "Alves")),
        appointment_from(MockBackendResponses::appointment(2, "Carlos", "Dias")),
        appointment_from(MockBackendResponses::hidden_appointment(3, "Amanda", "Costa")),
    ])
}

#[test]
fn default_view_excludes_hidden_records() {
    let directory = sample_directory();
    let visible = directory.visible();

    assert_eq!(visible.len(), 2);
    assert!(visible.iter().all(|entry| !entry.is_hidden));
    assert_eq!(directory.hidden().len(), 1);
}

#[test]
fn empty_search_term_reverts_to_visible_only() {
    let directory = sample_directory();
    assert_eq!(directory.search("").len(), 2);
    assert_eq!(directory.search("   ").len(), 2);
}

#[test]
fn matching_search_term_reaches_hidden_records() {
    let directory = sample_directory();
    let hits = directory.search("amanda");

    assert_eq!(hits.len(), 1);
    assert!(hits[0].is_hidden);
}

#[test]
fn search_matches_either_name_field_case_insensitively() {
    let directory = sample_directory();

    assert_eq!(directory.search("DIAS").len(), 1);
    assert_eq!(directory.search("ar")[0].name, "Carlos");
    assert!(directory.search("zebra").is_empty());
}

#[test]
fn sort_selector_parses_field_and_order() {
    assert_eq!(
        SortKey::parse("name-asc"),
        Some(SortKey {
            field: SortField::Name,
            order: SortOrder::Asc
        })
    );
    assert_eq!(
        SortKey::parse("date-desc"),
        Some(SortKey {
            field: SortField::Date,
            order: SortOrder::Desc
        })
    );
    assert_eq!(SortKey::parse("cpf-asc"), None);
    assert_eq!(SortKey::parse("name"), None);
}

#[test]
fn name_sort_is_case_insensitive_and_reversible() {
    let directory = sample_directory();
    let mut entries = directory.search("a");

    sort_entries(&mut entries, SortKey::parse("name-asc").unwrap());
    let ascending: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(ascending, vec!["Amanda", "Bruna", "Carlos"]);

    sort_entries(&mut entries, SortKey::parse("name-desc").unwrap());
    let descending: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(descending, vec!["Carlos", "Bruna", "Amanda"]);
}

#[test]
fn date_sort_compares_dates_not_strings() {
    let mut early = MockBackendResponses::appointment(1, "Bruna", "Alves");
    early["date"] = json!("2025-02-03");
    let mut late = MockBackendResponses::appointment(2, "Carlos", "Dias");
    late["date"] = json!("2025-11-20");

    let directory = Directory::new(vec![
        appointment_from(late),
        appointment_from(early),
    ]);

    let sorted = search_and_sort(&directory, "", SortKey::parse("date-asc").unwrap());
    assert_eq!(sorted[0].name, "Bruna");
    assert_eq!(sorted[1].name, "Carlos");
}

#[tokio::test]
async fn load_normalizes_additional_info_and_photo_urls() {
    let server = MockServer::start().await;

    let mut with_photo = MockBackendResponses::appointment(4, "Paula", "Reis");
    with_photo["photo"] = json!("photos/4.jpg");

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::bare_appointment(1, "Bruna"),
            with_photo,
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::for_server(&server.uri()).to_app_config();
    let client = BackendClient::new(&config, SessionContext::new()).unwrap();
    let directory = DirectoryService::new(client, &config).load().await.unwrap();

    // The record that arrived without an additional-info block has one now.
    let bare = directory.get(1).unwrap();
    assert!(bare.info().is_some());
    assert_eq!(bare.bed_id(), None);

    let photographed = directory.get(4).unwrap();
    assert_eq!(
        photographed.photo_url.as_deref(),
        Some(format!("{}/storage/photos/4.jpg", server.uri()).as_str())
    );
}

#[test]
fn occupants_view_carries_visibility_and_allocation() {
    let directory = Directory::new(vec![
        appointment_from(MockBackendResponses::appointment_with_bed(1, "Maria", 1, 2)),
        appointment_from(MockBackendResponses::hidden_appointment(2, "José", "Oculto")),
    ]);

    let occupants = directory.occupants();
    assert_eq!(occupants.len(), 2);
    assert_eq!(occupants[0].room_id, Some(1));
    assert_eq!(occupants[0].bed_id, Some(2));
    assert_eq!(occupants[0].guest_name, "Maria Silva");
    assert!(occupants[1].hidden);
}
