use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use allocation_cell::BedOccupant;

// ==============================================================================
// CORE INTAKE MODELS
// ==============================================================================

/// A guest intake record ("appointment"). Created by the intake form,
/// mutated by the editor, never hard-deleted; soft removal flips
/// `is_hidden`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub cpf: String,
    pub date: NaiveDate,
    pub arrival_date: NaiveDate,
    #[serde(default)]
    pub time: String,
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub mother_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub observation: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub accommodation_mode: String,
    #[serde(default)]
    pub foreign_country: Option<bool>,
    #[serde(rename = "isHidden", default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(rename = "additionalInfo", default)]
    pub additional_info: Option<AdditionalInfo>,
}

impl Appointment {
    /// Applies the load-time invariants: the additional-info block always
    /// exists afterwards, and relative photo paths become absolute URLs
    /// under the backend's storage root.
    pub fn normalize(&mut self, storage_base: &str) {
        if self.additional_info.is_none() {
            self.additional_info = Some(AdditionalInfo::default());
        }

        if let Some(photo) = self.photo.as_deref().filter(|p| !p.is_empty()) {
            self.photo_url = Some(if photo.starts_with("http") {
                photo.to_string()
            } else {
                format!("{}/{}", storage_base.trim_end_matches('/'), photo)
            });
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }

    pub fn info(&self) -> Option<&AdditionalInfo> {
        self.additional_info.as_ref()
    }

    /// Mutable access to the nested block, materializing the default when a
    /// record was never normalized.
    pub fn info_mut(&mut self) -> &mut AdditionalInfo {
        self.additional_info.get_or_insert_with(AdditionalInfo::default)
    }

    pub fn room_id(&self) -> Option<i64> {
        self.info().and_then(|info| info.room_id)
    }

    pub fn bed_id(&self) -> Option<i64> {
        self.info().and_then(|info| info.bed_id)
    }

    /// Occupancy view consumed by the availability reconciler.
    pub fn occupant(&self) -> BedOccupant {
        BedOccupant {
            room_id: self.room_id(),
            bed_id: self.bed_id(),
            hidden: self.is_hidden,
            guest_name: self.full_name(),
        }
    }
}

/// Social/medical/allocation sub-record. Nullable on the wire; normalized
/// to this all-empty default when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    #[serde(default)]
    pub ethnicity: String,
    #[serde(default)]
    pub addictions: String,
    #[serde(default)]
    pub is_accompanied: bool,
    #[serde(default)]
    pub benefits: String,
    #[serde(default)]
    pub is_lactating: bool,
    #[serde(default)]
    pub has_disability: bool,
    #[serde(default)]
    pub reason_for_accommodation: String,
    #[serde(default)]
    pub has_religion: bool,
    #[serde(default)]
    pub religion: String,
    #[serde(default)]
    pub has_chronic_disease: bool,
    #[serde(default)]
    pub chronic_disease: String,
    #[serde(default)]
    pub education_level: String,
    #[serde(default)]
    pub nationality: String,
    pub room_id: Option<i64>,
    pub bed_id: Option<i64>,
    pub stay_duration: Option<i64>,
    #[serde(default)]
    pub exit_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    #[serde(other)]
    Unspecified,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Masculino",
            Gender::Female => "Feminino",
            Gender::Other => "Outro",
            Gender::Unspecified => "Não informado",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Intake form payload for `POST /api/appointments`. The `replace` flag is
/// only set on the confirmed resubmission of a duplicate-CPF conflict.
#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub name: String,
    pub last_name: String,
    pub cpf: String,
    pub mother_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub arrival_date: NaiveDate,
    pub time: String,
    pub state: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub observation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_country: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<bool>,
}

/// Field view shared by the editor and the intake form so both run the same
/// rule set.
pub struct GuestFields<'a> {
    pub name: &'a str,
    pub last_name: &'a str,
    pub cpf: &'a str,
    pub mother_name: &'a str,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub time: &'a str,
    pub state: &'a str,
    pub city: &'a str,
    pub phone: Option<&'a str>,
    pub foreign_country: bool,
}

impl Appointment {
    pub fn guest_fields(&self) -> GuestFields<'_> {
        GuestFields {
            name: &self.name,
            last_name: &self.last_name,
            cpf: &self.cpf,
            mother_name: &self.mother_name,
            gender: self.gender,
            birth_date: self.birth_date,
            time: &self.time,
            state: &self.state,
            city: &self.city,
            phone: self.phone.as_deref(),
            foreign_country: self.foreign_country.unwrap_or(false),
        }
    }
}

impl NewAppointment {
    pub fn guest_fields(&self) -> GuestFields<'_> {
        GuestFields {
            name: &self.name,
            last_name: &self.last_name,
            cpf: &self.cpf,
            mother_name: &self.mother_name,
            gender: self.gender,
            birth_date: Some(self.birth_date),
            time: &self.time,
            state: &self.state,
            city: &self.city,
            phone: self.phone.as_deref(),
            foreign_country: self.foreign_country.unwrap_or(false),
        }
    }
}
