use chrono::{Duration, NaiveDate};

use shared_utils::validation::{is_adult, is_valid_cpf, is_valid_phone};

use crate::models::{Gender, GuestFields};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Local form validation shared by the editor and the intake form. Issues
/// come back in field order; the first one is what gets surfaced.
pub fn validate_guest_fields(fields: &GuestFields<'_>, today: NaiveDate) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    if fields.name.trim().is_empty() {
        issues.push(FieldIssue::new("name", "Informe o nome."));
    }
    if fields.last_name.trim().is_empty() {
        issues.push(FieldIssue::new("last_name", "Informe o sobrenome."));
    }
    if !is_valid_cpf(fields.cpf) {
        issues.push(FieldIssue::new("cpf", "CPF inválido."));
    }
    match fields.birth_date {
        None => issues.push(FieldIssue::new("birth_date", "Informe a data de nascimento.")),
        Some(birth_date) if !is_adult(birth_date, today) => {
            issues.push(FieldIssue::new(
                "birth_date",
                "Menores de idade não podem realizar agendamentos.",
            ));
        }
        Some(_) => {}
    }
    if fields.mother_name.trim().is_empty() {
        issues.push(FieldIssue::new("mother_name", "Informe o nome da mãe."));
    }
    if fields.gender == Gender::Unspecified {
        issues.push(FieldIssue::new("gender", "Informe o gênero."));
    }
    if fields.time.trim().is_empty() {
        issues.push(FieldIssue::new("time", "Informe o horário de chegada."));
    }

    // State and city only apply to guests arriving from inside the country.
    if !fields.foreign_country {
        if fields.state.trim().is_empty() {
            issues.push(FieldIssue::new("state", "Informe o estado."));
        }
        if fields.city.trim().is_empty() {
            issues.push(FieldIssue::new("city", "Informe a cidade."));
        }
    }

    // Absent phone means the guest declared having none; a present phone
    // must be masked.
    if let Some(phone) = fields.phone {
        if !is_valid_phone(phone) {
            issues.push(FieldIssue::new("phone", "Telefone inválido."));
        }
    }

    issues
}

/// Intake-only rule: arrivals are bookable from today up to two weeks out.
pub fn validate_arrival_window(arrival_date: NaiveDate, today: NaiveDate) -> Option<FieldIssue> {
    let latest = today + Duration::days(14);
    if arrival_date < today || arrival_date > latest {
        Some(FieldIssue::new(
            "arrival_date",
            "A data de chegada deve estar entre hoje e duas semanas.",
        ))
    } else {
        None
    }
}
