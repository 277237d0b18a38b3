//! Delimited monthly payload parsing.
//!
//! Payloads carry a comma-separated header line followed by positional value
//! rows; quoted fields are unquoted. A payload is classified by its header
//! field set before any typed records are produced: a header carrying
//! `quantity` is a consumption listing, one carrying `receipt`/`delivery` is
//! an actual-flow listing. A payload with fewer than two lines yields zero
//! records, which is not an error.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::warn;

use crate::domain::{RawConsumptionRecord, RawFlowRecord};

/// A monthly payload after header classification.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedPayload {
    Flow(Vec<RawFlowRecord>),
    Consumption(Vec<RawConsumptionRecord>),
    /// Empty body, a headerless payload, or a header matching neither shape.
    Empty,
}

/// Parse a monthly delimited payload into typed records.
pub fn parse_monthly_payload(text: &str) -> FeedPayload {
    if text.trim().lines().count() < 2 {
        return FeedPayload::Empty;
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.trim().as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(err) => {
            warn!(error = %err, "unreadable payload header, dropping payload");
            return FeedPayload::Empty;
        }
    };

    let field = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let gas_day = field("gasDay");
    let facility_name = field("facilityName");

    if let (Some(day_idx), Some(name_idx), Some(quantity_idx)) =
        (gas_day, facility_name, field("quantity"))
    {
        let records = reader
            .records()
            .filter_map(keep_row)
            .filter_map(|record| {
                let gas_day = parse_gas_day(record.get(day_idx))?;
                Some(RawConsumptionRecord {
                    gas_day,
                    facility_raw_name: record.get(name_idx).unwrap_or_default().to_string(),
                    quantity: coerce_numeric(record.get(quantity_idx)),
                })
            })
            .collect();
        return FeedPayload::Consumption(records);
    }

    if let (Some(day_idx), Some(name_idx), Some(receipt_idx), Some(delivery_idx)) =
        (gas_day, facility_name, field("receipt"), field("delivery"))
    {
        let records = reader
            .records()
            .filter_map(keep_row)
            .filter_map(|record| {
                let gas_day = parse_gas_day(record.get(day_idx))?;
                Some(RawFlowRecord {
                    gas_day,
                    facility_raw_name: record.get(name_idx).unwrap_or_default().to_string(),
                    receipt: coerce_numeric(record.get(receipt_idx)),
                    delivery: coerce_numeric(record.get(delivery_idx)),
                })
            })
            .collect();
        return FeedPayload::Flow(records);
    }

    warn!(header = ?headers, "payload header matches neither flow nor consumption shape");
    FeedPayload::Empty
}

fn keep_row(record: Result<StringRecord, csv::Error>) -> Option<StringRecord> {
    match record {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(error = %err, "dropping malformed payload row");
            None
        }
    }
}

fn parse_gas_day(field: Option<&str>) -> Option<NaiveDate> {
    let raw = field.unwrap_or_default().trim();
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"));
    match parsed {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(gas_day = raw, "dropping row with unparseable gas day");
            None
        }
    }
}

/// Numeric fields that fail to parse coerce to 0, matching the permissive
/// upstream behavior.
fn coerce_numeric(field: Option<&str>) -> f64 {
    field
        .unwrap_or_default()
        .trim()
        .trim_matches('"')
        .parse()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_payload_classified_by_header_set() {
        let text = "facilityCode,facilityName,gasDay,receipt,delivery\n\
                    530001,Karratha Gas Plant,2024-06-01,585.2,0\n\
                    530002,Gorgon Gas Plant,2024-06-01,276.0,1.5\n";
        let payload = parse_monthly_payload(text);
        match payload {
            FeedPayload::Flow(records) => {
                assert_eq!(records.len(), 2);
                assert_eq!(records[0].facility_raw_name, "Karratha Gas Plant");
                assert_eq!(records[0].receipt, 585.2);
                assert_eq!(records[1].delivery, 1.5);
            }
            other => panic!("expected flow payload, got {other:?}"),
        }
    }

    #[test]
    fn test_consumption_payload_classified_by_header_set() {
        let text = "facilityCode,facilityName,gasDay,quantity\n\
                    610001,Alcoa Pinjarra,2024-06-01,88.4\n";
        match parse_monthly_payload(text) {
            FeedPayload::Consumption(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].quantity, 88.4);
            }
            other => panic!("expected consumption payload, got {other:?}"),
        }
    }

    #[test]
    fn test_quoted_fields_are_unquoted() {
        let text = "facilityCode,facilityName,gasDay,receipt,delivery\n\
                    \"530001\",\"Karratha Gas Plant\",\"2024-06-01\",\"585.2\",\"0\"\n";
        match parse_monthly_payload(text) {
            FeedPayload::Flow(records) => {
                assert_eq!(records[0].facility_raw_name, "Karratha Gas Plant");
                assert_eq!(records[0].receipt, 585.2);
            }
            other => panic!("expected flow payload, got {other:?}"),
        }
    }

    #[test]
    fn test_short_payload_yields_zero_records() {
        assert_eq!(parse_monthly_payload(""), FeedPayload::Empty);
        assert_eq!(
            parse_monthly_payload("facilityCode,facilityName,gasDay,receipt,delivery\n"),
            FeedPayload::Empty
        );
    }

    #[test]
    fn test_garbled_numerics_coerce_to_zero() {
        let text = "facilityCode,facilityName,gasDay,receipt,delivery\n\
                    530001,Pluto,2024-06-01,n/a,\n";
        match parse_monthly_payload(text) {
            FeedPayload::Flow(records) => {
                assert_eq!(records[0].receipt, 0.0);
                assert_eq!(records[0].delivery, 0.0);
            }
            other => panic!("expected flow payload, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_gas_day_drops_row_only() {
        let text = "facilityCode,facilityName,gasDay,receipt,delivery\n\
                    530001,Pluto,not-a-date,40.0,0\n\
                    530001,Pluto,2024-06-02,41.0,0\n";
        match parse_monthly_payload(text) {
            FeedPayload::Flow(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].receipt, 41.0);
            }
            other => panic!("expected flow payload, got {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_header_is_empty() {
        let text = "foo,bar\n1,2\n";
        assert_eq!(parse_monthly_payload(text), FeedPayload::Empty);
    }
}
