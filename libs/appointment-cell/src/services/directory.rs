use tracing::debug;

use allocation_cell::BedOccupant;
use shared_config::AppConfig;
use shared_gateway::BackendClient;
use shared_models::ApiError;

use crate::models::Appointment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Compound `"field-order"` selector the listing screen binds to, e.g.
/// `name-asc` or `date-desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortKey {
    fn default() -> Self {
        Self {
            field: SortField::Name,
            order: SortOrder::Asc,
        }
    }
}

impl SortKey {
    pub fn parse(selector: &str) -> Option<Self> {
        let (field, order) = selector.split_once('-')?;
        let field = match field {
            "name" => SortField::Name,
            "date" => SortField::Date,
            _ => return None,
        };
        let order = match order {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            _ => return None,
        };
        Some(Self { field, order })
    }
}

/// Loads the appointment collection and hands out a normalized in-memory
/// directory.
pub struct DirectoryService {
    client: BackendClient,
    storage_base: String,
}

impl DirectoryService {
    pub fn new(client: BackendClient, config: &AppConfig) -> Self {
        Self {
            client,
            storage_base: config.storage_base_url(),
        }
    }

    pub async fn load(&self) -> Result<Directory, ApiError> {
        debug!("loading appointment directory");
        let mut records: Vec<Appointment> = self.client.get("/api/appointments").await?;
        for record in &mut records {
            record.normalize(&self.storage_base);
        }
        debug!(count = records.len(), "directory loaded");
        Ok(Directory::new(records))
    }
}

/// Transient client-side copy of the appointment collection. The backend
/// stays authoritative; this view only partitions, searches and sorts.
#[derive(Debug, Default)]
pub struct Directory {
    appointments: Vec<Appointment>,
}

impl Directory {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self { appointments }
    }

    pub fn all(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Appointment> {
        self.appointments.iter().find(|entry| entry.id == id)
    }

    pub fn visible(&self) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|entry| !entry.is_hidden)
            .collect()
    }

    pub fn hidden(&self) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|entry| entry.is_hidden)
            .collect()
    }

    /// Substring search over first and last name, case-insensitive. An
    /// empty term reverts to the visible-only view; a non-empty term also
    /// matches hidden records, so staff can find a soft-removed guest by
    /// name.
    pub fn search(&self, term: &str) -> Vec<&Appointment> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.visible();
        }

        self.appointments
            .iter()
            .filter(|entry| {
                entry.name.to_lowercase().contains(&term)
                    || entry.last_name.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Flips the local copy after a successful remote visibility update.
    pub fn set_hidden(&mut self, id: i64, hidden: bool) -> bool {
        match self.appointments.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.is_hidden = hidden;
                true
            }
            None => false,
        }
    }

    /// Swaps in the record returned by a successful editor save.
    pub fn replace(&mut self, updated: Appointment) {
        if let Some(slot) = self
            .appointments
            .iter_mut()
            .find(|entry| entry.id == updated.id)
        {
            *slot = updated;
        } else {
            self.appointments.push(updated);
        }
    }

    /// Occupancy view for the availability reconciler.
    pub fn occupants(&self) -> Vec<BedOccupant> {
        self.appointments
            .iter()
            .map(Appointment::occupant)
            .collect()
    }
}

/// Stable sort over a result set. Dates compare as dates, names as
/// lowercased strings; ties keep their load order.
pub fn sort_entries(entries: &mut [&Appointment], key: SortKey) {
    entries.sort_by(|a, b| {
        let ordering = match key.field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        };
        match key.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Convenience wrapper: search then sort in one call, the way the listing
/// screen consumes the directory.
pub fn search_and_sort<'a>(
    directory: &'a Directory,
    term: &str,
    key: SortKey,
) -> Vec<&'a Appointment> {
    let mut entries = directory.search(term);
    sort_entries(&mut entries, key);
    entries
}
