//! Conversions between storage records and domain entities.
//!
//! Records keep ids and timestamps as strings the way the storage layer
//! persists them; domain entities carry `Uuid` and `DateTime<Utc>`. All
//! parsing happens here so malformed stored values fail loudly instead
//! of leaking into the aggregation logic.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use vitaltrack_data::models::{HealthEntryRecord, NewHealthEntry, NewPerson, PersonRecord};

use super::health_entry::{CreateHealthEntryRequest, HealthEntry, UpdateHealthEntryRequest};
use super::person::{Person, RegisterPersonRequest};

/// Parse a string into a UUID with a readable error
pub fn parse_string_to_uuid(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id).map_err(|_| format!("Invalid id: {}", id))
}

/// Parse an RFC 3339 string into a UTC timestamp with a readable error
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("Invalid timestamp: {}", raw))
}

/// Convert a storage record into a domain health entry
pub fn entry_from_record(record: HealthEntryRecord) -> Result<HealthEntry, String> {
    Ok(HealthEntry {
        id: parse_string_to_uuid(&record.id)?,
        person_id: parse_string_to_uuid(&record.person_id)?,
        systolic: record.systolic,
        diastolic: record.diastolic,
        heart_rate: record.heart_rate,
        tags: record.tags,
        timestamp: parse_timestamp(&record.timestamp)?,
    })
}

/// Convert a domain health entry into a storage record
pub fn record_from_entry(entry: &HealthEntry) -> HealthEntryRecord {
    HealthEntryRecord {
        id: entry.id.to_string(),
        person_id: entry.person_id.to_string(),
        systolic: entry.systolic,
        diastolic: entry.diastolic,
        heart_rate: entry.heart_rate,
        tags: entry.tags.clone(),
        timestamp: entry.timestamp.to_rfc3339(),
    }
}

/// Convert a create request into storage input, filling in the timestamp
pub fn new_entry_from_request(
    request: &CreateHealthEntryRequest,
    timestamp: DateTime<Utc>,
) -> NewHealthEntry {
    NewHealthEntry {
        person_id: request.person_id.to_string(),
        systolic: request.systolic,
        diastolic: request.diastolic,
        heart_rate: request.heart_rate,
        tags: request.tags.clone(),
        timestamp: timestamp.to_rfc3339(),
    }
}

/// Build the replacement record for an update request
pub fn record_from_update(id: Uuid, request: &UpdateHealthEntryRequest) -> HealthEntryRecord {
    HealthEntryRecord {
        id: id.to_string(),
        person_id: request.person_id.to_string(),
        systolic: request.systolic,
        diastolic: request.diastolic,
        heart_rate: request.heart_rate,
        tags: request.tags.clone(),
        timestamp: request.timestamp.to_rfc3339(),
    }
}

/// Convert a storage record into a domain person
pub fn person_from_record(record: PersonRecord) -> Result<Person, String> {
    Ok(Person {
        id: parse_string_to_uuid(&record.id)?,
        name: record.name,
        age: record.age,
        gender: record.gender,
        description: record.description,
    })
}

/// Convert a register request into storage input
pub fn new_person_from_request(request: &RegisterPersonRequest) -> NewPerson {
    NewPerson {
        name: request.name.clone(),
        age: request.age,
        gender: request.gender.clone(),
        description: request.description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_round_trip() {
        let entry = HealthEntry {
            id: Uuid::new_v4(),
            person_id: Uuid::new_v4(),
            systolic: 120,
            diastolic: 80,
            heart_rate: 72,
            tags: Some("morning".to_string()),
            timestamp: parse_timestamp("2024-01-01T08:00:00Z").unwrap(),
        };

        let record = record_from_entry(&entry);
        let back = entry_from_record(record).unwrap();

        assert_eq!(back.id, entry.id);
        assert_eq!(back.person_id, entry.person_id);
        assert_eq!(back.timestamp, entry.timestamp);
        assert_eq!(back.tags.as_deref(), Some("morning"));
    }

    #[test]
    fn test_malformed_timestamp_is_rejected() {
        let record = HealthEntryRecord {
            id: Uuid::new_v4().to_string(),
            person_id: Uuid::new_v4().to_string(),
            systolic: 120,
            diastolic: 80,
            heart_rate: 72,
            tags: None,
            timestamp: "not-a-date".to_string(),
        };

        let result = entry_from_record(record);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid timestamp"));
    }

    #[test]
    fn test_malformed_id_is_rejected() {
        assert!(parse_string_to_uuid("12345").is_err());
    }
}
