//! Fixtures shared by the cell test suites. Production code never touches
//! this module.

use serde_json::{json, Value};

use shared_config::AppConfig;

pub struct TestConfig {
    pub api_base_url: String,
    pub room_capacity: u32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            room_capacity: 4,
        }
    }
}

impl TestConfig {
    /// Points every base URL at the same mock server.
    pub fn for_server(uri: &str) -> Self {
        Self {
            api_base_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            ibge_base_url: self.api_base_url.clone(),
            countries_base_url: self.api_base_url.clone(),
            room_capacity: self.room_capacity,
            request_timeout_secs: 5,
        }
    }
}

/// Canned backend payloads shaped like the Laravel API responses.
pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn appointment(id: i64, name: &str, last_name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "last_name": last_name,
            "cpf": "11144477735",
            "date": "2025-03-10",
            "arrival_date": "2025-03-12",
            "time": "14:30",
            "birth_date": "1990-05-20",
            "state": "Rio Grande do Sul",
            "city": "Porto Alegre",
            "mother_name": "Ana Souza",
            "phone": "(51) 91234-5678",
            "observation": "",
            "gender": "female",
            "accommodation_mode": "pernoite",
            "isHidden": false,
            "photo": null,
            "additionalInfo": Self::additional_info(None, None),
        })
    }

    pub fn appointment_with_bed(id: i64, name: &str, room_id: i64, bed_id: i64) -> Value {
        let mut record = Self::appointment(id, name, "Silva");
        record["additionalInfo"] = Self::additional_info(Some(room_id), Some(bed_id));
        record
    }

    pub fn hidden_appointment(id: i64, name: &str, last_name: &str) -> Value {
        let mut record = Self::appointment(id, name, last_name);
        record["isHidden"] = json!(true);
        record
    }

    /// A record the way older backend rows arrive: no additional-info block
    /// at all.
    pub fn bare_appointment(id: i64, name: &str) -> Value {
        let mut record = Self::appointment(id, name, "Santos");
        record.as_object_mut()
            .expect("appointment fixture is an object")
            .remove("additionalInfo");
        record
    }

    pub fn additional_info(room_id: Option<i64>, bed_id: Option<i64>) -> Value {
        json!({
            "ethnicity": "",
            "addictions": "",
            "is_accompanied": false,
            "benefits": "",
            "is_lactating": false,
            "has_disability": false,
            "reason_for_accommodation": "",
            "has_religion": false,
            "religion": "",
            "has_chronic_disease": false,
            "chronic_disease": "",
            "education_level": "",
            "nationality": "Brasil",
            "room_id": room_id,
            "bed_id": bed_id,
            "stay_duration": null,
            "exit_date": null,
        })
    }

    pub fn rooms() -> Value {
        json!([
            {"id": 1, "name": "Quarto A"},
            {"id": 2, "name": "Quarto B"},
            {"id": 3, "name": "Quarto C"},
        ])
    }

    pub fn beds(first_id: i64) -> Value {
        json!([
            {"id": first_id, "bed_number": format!("{}", first_id)},
            {"id": first_id + 1, "bed_number": format!("{}", first_id + 1)},
        ])
    }

    pub fn login_response(token: &str, role: &str) -> Value {
        json!({
            "token": token,
            "role": role,
            "user": {
                "id": 7,
                "name": "Operador",
                "photo_url": "http://127.0.0.1:8000/storage/photos/7.jpg",
            }
        })
    }

    pub fn ibge_states() -> Value {
        json!([
            {"id": 43, "sigla": "RS", "nome": "Rio Grande do Sul"},
            {"id": 35, "sigla": "SP", "nome": "São Paulo"},
        ])
    }

    pub fn ibge_municipalities() -> Value {
        json!([
            {"id": 4314902, "nome": "Porto Alegre"},
            {"id": 4305108, "nome": "Caxias do Sul"},
        ])
    }

    pub fn countries() -> Value {
        json!([
            {"name": {"common": "Chile"}},
            {"name": {"common": "Brazil"}},
            {"name": {"common": "Argentina"}},
        ])
    }
}
