//! Normalize raw portal records into canonical [`TenderRecord`]s.
//!
//! The portal API is untyped and inconsistent; this module is the single
//! choke point enforcing the canonical shape. Load-bearing fields
//! (tender number, published date) reject the record; everything else is
//! tolerated with defaults so a partially filled opportunity still flows
//! downstream.

use chrono::NaiveDateTime;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use tender_core::tender::{SupportingDoc, TenderRecord, SOURCE_NAME};

/// The portal's timestamp format: 12-hour clock with meridiem indicator.
const DATE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Label used when an attachment entry carries no usable name.
const DEFAULT_DOC_NAME: &str = "Tender Attachment";

/// Why a raw record was rejected instead of normalized.
///
/// The identifier check runs before date parsing: a record that fails both
/// is reported as `MissingIdentifier`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("record has no tender number")]
    MissingIdentifier,

    #[error("unparseable {field}: {value:?}")]
    DateParseError {
        field: &'static str,
        value: String,
    },
}

/// Convert one raw portal record into a canonical [`TenderRecord`].
///
/// Pure: no I/O, no logging. Callers are expected to log rejections
/// (see [`normalize_batch`]).
pub fn normalize(raw: &Value) -> Result<TenderRecord, Rejection> {
    // A record with no identifier carries no value downstream; bail before
    // touching any other field.
    let tender_number = clean(&coerce_text(raw.get("tenderNumber"))).to_uppercase();
    if tender_number.is_empty() {
        return Err(Rejection::MissingIdentifier);
    }

    let published = parse_required_date(raw, "publishedDate")?;
    // The portal has been observed to omit or malform closingDate without
    // it invalidating the opportunity.
    let closing = parse_optional_date(raw, "closingDate");

    Ok(TenderRecord {
        title: clean(&coerce_text(raw.get("nameOfTender"))),
        description: clean(&coerce_text(raw.get("descriptionOfTender"))),
        source: SOURCE_NAME.to_string(),
        published,
        closing,
        supporting_docs: extract_docs(raw),
        // Hard invariant: tags are populated by the downstream AI service,
        // never here, even if the raw record carries a tags-like field.
        tags: Vec::new(),
        tender_number,
        institution: clean(&coerce_text(raw.get("nameOfInstitution"))).to_uppercase(),
        category: clean(&coerce_text(raw.get("tenderCategory"))),
        tender_type: clean(&coerce_text(raw.get("tenderType"))).to_uppercase(),
        location: clean(&coerce_text(raw.get("locationOfService"))),
        email: clean(&coerce_text(raw.get("contactPersonEmailAddress"))).to_lowercase(),
        contact_person: clean(&coerce_text(raw.get("contactPersonName"))),
    })
}

/// Normalize a full listing, separating records from rejections.
///
/// Good records are never blocked by bad ones. Each rejection is logged
/// and returned with the record's identity (raw tender number when
/// present, otherwise its position in the listing).
pub fn normalize_batch(raws: &[Value]) -> (Vec<TenderRecord>, Vec<(String, Rejection)>) {
    let mut records = Vec::with_capacity(raws.len());
    let mut rejections = Vec::new();

    for (index, raw) in raws.iter().enumerate() {
        match normalize(raw) {
            Ok(record) => records.push(record),
            Err(rejection) => {
                let identity = record_identity(raw, index);
                warn!(record = %identity, reason = %rejection, "Skipping tender");
                rejections.push((identity, rejection));
            }
        }
    }

    (records, rejections)
}

fn record_identity(raw: &Value, index: usize) -> String {
    let number = clean(&coerce_text(raw.get("tenderNumber")));
    if number.is_empty() {
        format!("#{index}")
    } else {
        number
    }
}

fn parse_required_date(raw: &Value, field: &'static str) -> Result<NaiveDateTime, Rejection> {
    let value = coerce_text(raw.get(field));
    NaiveDateTime::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| Rejection::DateParseError { field, value })
}

fn parse_optional_date(raw: &Value, field: &str) -> Option<NaiveDateTime> {
    let value = coerce_text(raw.get(field));
    NaiveDateTime::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Coerce a scalar JSON value to text. Null and missing become empty;
/// arrays and objects are rendered back to JSON text.
fn coerce_text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Strip embedded line breaks and surrounding whitespace.
fn clean(s: &str) -> String {
    s.replace('\n', " ").replace('\r', "").trim().to_string()
}

/// Extract supporting documents from the `attachment` field.
///
/// The portal usually sends a bare URL string; some records carry a list
/// of `{name, url}` entries. Anything else means no attachments.
fn extract_docs(raw: &Value) -> Vec<SupportingDoc> {
    match raw.get("attachment") {
        Some(Value::String(url)) if !url.trim().is_empty() => vec![SupportingDoc {
            name: DEFAULT_DOC_NAME.to_string(),
            url: url.clone(),
        }],
        Some(Value::Array(entries)) => entries.iter().filter_map(doc_from_entry).collect(),
        _ => Vec::new(),
    }
}

fn doc_from_entry(entry: &Value) -> Option<SupportingDoc> {
    let obj = entry.as_object()?;
    let url = obj.get("url").and_then(Value::as_str)?;
    if url.trim().is_empty() {
        return None;
    }

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_DOC_NAME);

    Some(SupportingDoc {
        name: name.to_string(),
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_raw() -> Value {
        json!({
            "rowKey": "abc123",
            "nameOfTender": "Upgrade of Rail",
            "descriptionOfTender": "Full overhaul of rail infrastructure",
            "publishedDate": "10/01/2025 09:00:00 AM",
            "closingDate": "10/31/2025 04:00:00 PM",
            "attachment": "https://example.com/doc.pdf",
            "tenderNumber": "TN123",
            "nameOfInstitution": "Transnet Freight Rail",
            "tenderCategory": "Infrastructure",
            "tenderType": "Open",
            "locationOfService": "Durban",
            "contactPersonEmailAddress": "Contact@Transnet.co.za",
            "contactPersonName": "John Doe"
        })
    }

    #[test]
    fn valid_record_maps_all_fields() {
        let record = normalize(&valid_raw()).unwrap();

        assert_eq!(record.tender_number, "TN123");
        assert_eq!(record.title, "Upgrade of Rail");
        assert_eq!(record.source, "Transnet");
        assert_eq!(record.institution, "TRANSNET FREIGHT RAIL");
        assert_eq!(record.tender_type, "OPEN");
        assert_eq!(record.location, "Durban");
        assert_eq!(record.email, "contact@transnet.co.za");
        assert_eq!(record.contact_person, "John Doe");
        assert_eq!(record.published.to_string(), "2025-10-01 09:00:00");
        assert_eq!(
            record.closing.unwrap().to_string(),
            "2025-10-31 16:00:00"
        );
        assert_eq!(record.supporting_docs.len(), 1);
        assert_eq!(record.supporting_docs[0].name, "Tender Attachment");
        assert_eq!(record.supporting_docs[0].url, "https://example.com/doc.pdf");
    }

    #[test]
    fn missing_identifier_rejected() {
        for raw in [
            json!({"nameOfTender": "No number at all"}),
            json!({"tenderNumber": null, "publishedDate": "10/01/2025 09:00:00 AM"}),
            json!({"tenderNumber": "", "publishedDate": "10/01/2025 09:00:00 AM"}),
            json!({"tenderNumber": "  \n ", "publishedDate": "10/01/2025 09:00:00 AM"}),
        ] {
            assert_eq!(normalize(&raw), Err(Rejection::MissingIdentifier));
        }
    }

    #[test]
    fn identifier_check_wins_over_bad_date() {
        let raw = json!({"publishedDate": "bad"});
        assert_eq!(normalize(&raw), Err(Rejection::MissingIdentifier));
    }

    #[test]
    fn bad_published_date_rejected_with_diagnostics() {
        let mut raw = valid_raw();
        raw["publishedDate"] = json!("2025-10-01T09:00:00");

        let err = normalize(&raw).unwrap_err();
        assert_eq!(
            err,
            Rejection::DateParseError {
                field: "publishedDate",
                value: "2025-10-01T09:00:00".to_string(),
            }
        );
    }

    #[test]
    fn absent_published_date_rejected() {
        let mut raw = valid_raw();
        raw.as_object_mut().unwrap().remove("publishedDate");

        assert!(matches!(
            normalize(&raw).unwrap_err(),
            Rejection::DateParseError {
                field: "publishedDate",
                ..
            }
        ));
    }

    #[test]
    fn twelve_hour_clock_parsed() {
        let mut raw = valid_raw();
        raw["publishedDate"] = json!("10/07/2025 07:53:26 PM");

        let record = normalize(&raw).unwrap();
        assert_eq!(record.published.to_string(), "2025-10-07 19:53:26");
    }

    #[test]
    fn bad_or_absent_closing_date_tolerated() {
        let mut raw = valid_raw();
        raw["closingDate"] = json!("not-a-date");
        assert_eq!(normalize(&raw).unwrap().closing, None);

        raw.as_object_mut().unwrap().remove("closingDate");
        assert_eq!(normalize(&raw).unwrap().closing, None);
    }

    #[test]
    fn tags_always_empty() {
        let mut raw = valid_raw();
        raw["tags"] = json!(["construction", "rail"]);

        assert!(normalize(&raw).unwrap().tags.is_empty());
    }

    #[test]
    fn missing_optional_fields_default_to_empty_string() {
        let raw = json!({
            "tenderNumber": "TN9",
            "publishedDate": "01/01/2025 12:00:00 AM",
        });

        let record = normalize(&raw).unwrap();
        assert_eq!(record.title, "");
        assert_eq!(record.institution, "");
        assert_eq!(record.email, "");
        assert!(record.supporting_docs.is_empty());
        // Midnight in the portal's 12-hour notation.
        assert_eq!(record.published.to_string(), "2025-01-01 00:00:00");
    }

    #[test]
    fn numeric_fields_coerce_to_text() {
        let raw = json!({
            "tenderNumber": 4711,
            "publishedDate": "01/01/2025 12:00:00 AM",
            "locationOfService": 2000,
        });

        let record = normalize(&raw).unwrap();
        assert_eq!(record.tender_number, "4711");
        assert_eq!(record.location, "2000");
    }

    #[test]
    fn embedded_line_breaks_cleaned() {
        let mut raw = valid_raw();
        raw["nameOfTender"] = json!("  Upgrade\r\nof Rail  ");
        raw["tenderNumber"] = json!("tn-99\n");

        let record = normalize(&raw).unwrap();
        assert_eq!(record.title, "Upgrade of Rail");
        assert_eq!(record.tender_number, "TN-99");
    }

    #[test]
    fn attachment_list_extracted() {
        let mut raw = valid_raw();
        raw["attachment"] = json!([
            {"name": "Scope of Work", "url": "https://example.com/scope.pdf"},
            {"url": "https://example.com/annex.pdf"},
            {"name": "no url here"},
            {"name": "blank", "url": "   "},
        ]);

        let docs = normalize(&raw).unwrap().supporting_docs;
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].name, "Scope of Work");
        assert_eq!(docs[0].url, "https://example.com/scope.pdf");
        assert_eq!(docs[1].name, "Tender Attachment");
        assert_eq!(docs[1].url, "https://example.com/annex.pdf");
    }

    #[test]
    fn attachment_garbage_means_no_docs() {
        let mut raw = valid_raw();
        for garbage in [json!(null), json!(42), json!({"url": "x"}), json!("")] {
            raw["attachment"] = garbage;
            assert!(normalize(&raw).unwrap().supporting_docs.is_empty());
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = valid_raw();
        assert_eq!(normalize(&raw).unwrap(), normalize(&raw).unwrap());
    }

    #[test]
    fn batch_separates_records_from_rejections() {
        let raws = vec![
            json!({
                "tenderNumber": "T1",
                "publishedDate": "10/07/2025 07:53:26 PM",
            }),
            json!({"publishedDate": "bad"}),
            json!({
                "tenderNumber": "T3",
                "publishedDate": "01/01/2025 12:00:00 AM",
                "closingDate": "not-a-date",
            }),
        ];

        let (records, rejections) = normalize_batch(&raws);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tender_number, "T1");
        assert_eq!(records[0].closing, None);
        assert_eq!(records[1].tender_number, "T3");
        assert_eq!(records[1].closing, None);

        assert_eq!(rejections.len(), 1);
        assert_eq!(rejections[0].0, "#1");
        assert_eq!(rejections[0].1, Rejection::MissingIdentifier);
    }
}
