//! Mapping between Firestore typed values and the salon records
//!
//! Stored field names are camelCase (`clientId`, `startTime`, ...).
//! `startTime` is written as a `timestampValue`; older documents stored it as
//! an RFC 3339 `stringValue`, and both are accepted on read.

use chrono::{DateTime, SecondsFormat, Utc};
use salonsync_common::models::{
    Appointment, AppointmentPatch, Client, NewAppointment, NewClient, TEMP_CLIENT_ID,
};
use serde_json::{json, Map, Value};

use crate::client::{Document, FirestoreError};

pub fn string_value(value: &str) -> Value {
    json!({ "stringValue": value })
}

pub fn timestamp_value(value: DateTime<Utc>) -> Value {
    json!({ "timestampValue": value.to_rfc3339_opts(SecondsFormat::Millis, true) })
}

fn get_string<'a>(doc: &'a Document, field: &str) -> Option<&'a str> {
    doc.fields
        .get(field)
        .and_then(|v| v.get("stringValue"))
        .and_then(Value::as_str)
}

fn get_instant(doc: &Document, field: &str) -> Option<DateTime<Utc>> {
    let value = doc.fields.get(field)?;
    let raw = value
        .get("timestampValue")
        .or_else(|| value.get("stringValue"))
        .and_then(Value::as_str)?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn insert_opt(fields: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        fields.insert(key.to_string(), string_value(value));
    }
}

pub fn encode_client(client: &NewClient) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("name".to_string(), string_value(client.name.trim()));
    fields.insert("phone".to_string(), string_value(&client.phone));
    insert_opt(&mut fields, "notes", client.notes.as_deref());
    fields
}

pub fn decode_client(doc: &Document) -> Result<Client, FirestoreError> {
    let name = get_string(doc, "name").ok_or_else(|| FirestoreError::DecodeError {
        name: doc.name.clone(),
        reason: "missing name".to_string(),
    })?;
    Ok(Client {
        id: doc.id().to_string(),
        name: name.to_string(),
        phone: get_string(doc, "phone").unwrap_or_default().to_string(),
        notes: get_string(doc, "notes").map(str::to_string),
    })
}

pub fn encode_appointment(appointment: &NewAppointment) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("clientId".to_string(), string_value(&appointment.client_id));
    insert_opt(&mut fields, "clientName", appointment.client_name.as_deref());
    insert_opt(&mut fields, "serviceId", appointment.service_id.as_deref());
    fields.insert(
        "startTime".to_string(),
        timestamp_value(appointment.start_time),
    );
    insert_opt(&mut fields, "notes", appointment.notes.as_deref());
    fields
}

pub fn decode_appointment(doc: &Document) -> Result<Appointment, FirestoreError> {
    let start_time = get_instant(doc, "startTime").ok_or_else(|| FirestoreError::DecodeError {
        name: doc.name.clone(),
        reason: "missing or unparseable startTime".to_string(),
    })?;
    Ok(Appointment {
        id: doc.id().to_string(),
        client_id: get_string(doc, "clientId")
            .unwrap_or(TEMP_CLIENT_ID)
            .to_string(),
        client_name: get_string(doc, "clientName").map(str::to_string),
        service_id: get_string(doc, "serviceId").map(str::to_string),
        start_time,
        notes: get_string(doc, "notes").map(str::to_string),
    })
}

/// Fields and update mask for a partial appointment write.
pub fn encode_patch(patch: &AppointmentPatch) -> (Map<String, Value>, Vec<&'static str>) {
    let mut fields = Map::new();
    insert_opt(&mut fields, "clientId", patch.client_id.as_deref());
    insert_opt(&mut fields, "clientName", patch.client_name.as_deref());
    insert_opt(&mut fields, "serviceId", patch.service_id.as_deref());
    if let Some(start_time) = patch.start_time {
        fields.insert("startTime".to_string(), timestamp_value(start_time));
    }
    insert_opt(&mut fields, "notes", patch.notes.as_deref());
    (fields, patch.field_paths())
}
