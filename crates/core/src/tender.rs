use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Origin system identifier stamped on every record from this adapter.
pub const SOURCE_NAME: &str = "Transnet";

/// A downloadable document attached to a tender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportingDoc {
    pub name: String,
    pub url: String,
}

/// Canonical tender record as consumed by the downstream pipeline.
///
/// Wire field names match the payload contract of the shared AI queue:
/// camelCase for the multi-word source fields, `supporting_docs` and
/// `tags` verbatim. Timestamps are source-local (the portal publishes no
/// timezone), serialized as ISO-8601 via chrono.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderRecord {
    pub title: String,
    pub description: String,
    pub source: String,
    #[serde(rename = "publishedDate")]
    pub published: NaiveDateTime,
    #[serde(rename = "closingDate")]
    pub closing: Option<NaiveDateTime>,
    pub supporting_docs: Vec<SupportingDoc>,
    /// Always empty here; populated by the downstream AI tagging service.
    pub tags: Vec<String>,
    #[serde(rename = "tenderNumber")]
    pub tender_number: String,
    pub institution: String,
    pub category: String,
    #[serde(rename = "tenderType")]
    pub tender_type: String,
    pub location: String,
    pub email: String,
    #[serde(rename = "contactPerson")]
    pub contact_person: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_record() -> TenderRecord {
        TenderRecord {
            title: "Rail Upgrade".to_string(),
            description: "Full overhaul of rail infrastructure".to_string(),
            source: SOURCE_NAME.to_string(),
            published: NaiveDate::from_ymd_opt(2025, 10, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            closing: None,
            supporting_docs: vec![SupportingDoc {
                name: "Tender Attachment".to_string(),
                url: "https://example.com/doc.pdf".to_string(),
            }],
            tags: Vec::new(),
            tender_number: "TN123".to_string(),
            institution: "TRANSNET FREIGHT RAIL".to_string(),
            category: "Infrastructure".to_string(),
            tender_type: "OPEN".to_string(),
            location: "Durban".to_string(),
            email: "contact@transnet.co.za".to_string(),
            contact_person: "John Doe".to_string(),
        }
    }

    #[test]
    fn wire_field_names() {
        let json = serde_json::to_value(sample_record()).unwrap();
        let obj = json.as_object().unwrap();

        assert!(obj.contains_key("publishedDate"));
        assert!(obj.contains_key("closingDate"));
        assert!(obj.contains_key("tenderNumber"));
        assert!(obj.contains_key("tenderType"));
        assert!(obj.contains_key("contactPerson"));
        assert!(obj.contains_key("supporting_docs"));
        assert!(obj.contains_key("tags"));
        // No snake_case leakage for the renamed fields.
        assert!(!obj.contains_key("published_date"));
        assert!(!obj.contains_key("tender_number"));
    }

    #[test]
    fn dates_serialize_iso8601() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["publishedDate"], "2025-10-01T09:00:00");
        assert_eq!(json["closingDate"], serde_json::Value::Null);
    }

    #[test]
    fn serde_roundtrip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: TenderRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
