use crate::{ImporterError, Result};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// `getPrices` payload: country code -> service code -> `{cost, count}`.
///
/// Keys keep the order the upstream sent them in. Service values are kept as raw JSON so that one malformed entry is skipped
/// instead of failing the whole list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PriceList {
    countries: IndexMap<String, IndexMap<String, Value>>,
}

/// A usable `{cost, count}` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceEntry {
    pub country_code: String,
    pub service_code: String,
    pub cost: Decimal,
    pub count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotAnObject,
    MissingCost,
    InvalidCost(String),
    InvalidCount(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "value is not an object"),
            Self::MissingCost => write!(f, "no cost field"),
            Self::InvalidCost(raw) => write!(f, "unreadable cost {}", raw),
            Self::InvalidCount(raw) => write!(f, "unreadable count {}", raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub country_code: String,
    pub service_code: String,
    pub reason: SkipReason,
}

impl PriceList {
    /// Parse a response body. The API answers failures such as `BAD_KEY` as
    /// plain text, which is surfaced as an upstream error rather than a JSON
    /// syntax error.
    pub fn from_body(body: &str) -> Result<Self> {
        let trimmed = body.trim();
        if !trimmed.starts_with('{') {
            let mut message: String = trimmed.chars().take(200).collect();
            if message.is_empty() {
                message = "empty response".to_string();
            }
            return Err(ImporterError::UpstreamError(message));
        }

        Ok(serde_json::from_str(trimmed)?)
    }

    pub fn is_empty(&self) -> bool {
        self.countries.values().all(IndexMap::is_empty)
    }

    pub fn len(&self) -> usize {
        self.countries.values().map(IndexMap::len).sum()
    }

    /// Every (country, service) pair in document order, parsed or with the reason it is unusable.
    pub fn entries(&self) -> impl Iterator<Item = std::result::Result<PriceEntry, SkippedEntry>> + '_ {
        self.countries.iter().flat_map(|(country_code, services)| {
            services
                .iter()
                .map(move |(service_code, value)| parse_entry(country_code, service_code, value))
        })
    }
}

fn parse_entry(
    country_code: &str,
    service_code: &str,
    value: &Value,
) -> std::result::Result<PriceEntry, SkippedEntry> {
    let skip = |reason| SkippedEntry {
        country_code: country_code.to_string(),
        service_code: service_code.to_string(),
        reason,
    };

    let object = value.as_object().ok_or_else(|| skip(SkipReason::NotAnObject))?;
    let cost = object.get("cost").ok_or_else(|| skip(SkipReason::MissingCost))?;
    let cost = parse_cost(cost).ok_or_else(|| skip(SkipReason::InvalidCost(cost.to_string())))?;

    let count = object.get("count").unwrap_or(&Value::Null);
    let count = count
        .as_i64()
        .and_then(|c| i32::try_from(c).ok())
        .filter(|c| *c >= 0)
        .ok_or_else(|| skip(SkipReason::InvalidCount(count.to_string())))?;

    Ok(PriceEntry {
        country_code: country_code.to_string(),
        service_code: service_code.to_string(),
        cost,
        count,
    })
}

fn parse_cost(value: &Value) -> Option<Decimal> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
        .filter(|cost| !cost.is_sign_negative() || cost.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_reference_payload() {
        let list = PriceList::from_body(r#"{"73": {"ya": {"cost": 1.50, "count": 20}}}"#).unwrap();
        let entries: Vec<_> = list.entries().collect();

        assert_eq!(
            entries,
            vec![Ok(PriceEntry {
                country_code: "73".into(),
                service_code: "ya".into(),
                cost: dec("1.5"),
                count: 20,
            })]
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_cost_as_string_and_scientific() {
        let list = PriceList::from_body(
            r#"{"73": {"a": {"cost": "2.30", "count": 1}, "b": {"cost": 1e-2, "count": 3}}}"#,
        )
        .unwrap();
        let costs: Vec<_> = list.entries().map(|e| e.unwrap().cost).collect();

        assert_eq!(costs, vec![dec("2.30"), dec("0.01")]);
    }

    #[test]
    fn test_entry_without_cost_is_skipped() {
        let list = PriceList::from_body(r#"{"73": {"wa": {"count": 4}, "tg": 12}}"#).unwrap();
        let reasons: Vec<_> = list.entries().map(|e| e.unwrap_err().reason).collect();

        assert_eq!(reasons, vec![SkipReason::MissingCost, SkipReason::NotAnObject]);
    }

    #[test]
    fn test_entries_follow_document_order() {
        let list = PriceList::from_body(
            r#"{
                "zz": {"wa": {"cost": 1, "count": 1}, "ab": {"cost": 2, "count": 1}},
                "aa": {"ya": {"cost": 3, "count": 1}}
            }"#,
        )
        .unwrap();
        let keys: Vec<_> = list
            .entries()
            .map(|e| {
                let e = e.unwrap();
                (e.country_code, e.service_code)
            })
            .collect();

        assert_eq!(
            keys,
            vec![
                ("zz".to_string(), "wa".to_string()),
                ("zz".to_string(), "ab".to_string()),
                ("aa".to_string(), "ya".to_string()),
            ]
        );
    }

    #[test]
    fn test_bad_cost_and_count_are_skipped() {
        let list = PriceList::from_body(
            r#"{"73": {
                "a": {"cost": "abc", "count": 1},
                "b": {"cost": -1, "count": 1},
                "c": {"cost": 1.0},
                "d": {"cost": 1.0, "count": -5},
                "e": {"cost": 1.0, "count": 2.5}
            }}"#,
        )
        .unwrap();
        let reasons: Vec<_> = list.entries().map(|e| e.unwrap_err().reason).collect();

        assert!(matches!(reasons[0], SkipReason::InvalidCost(_)));
        assert!(matches!(reasons[1], SkipReason::InvalidCost(_)));
        assert!(reasons[2..].iter().all(|r| matches!(r, SkipReason::InvalidCount(_))));
    }

    #[test]
    fn test_plain_text_body_is_upstream_error() {
        let err = PriceList::from_body("BAD_KEY").unwrap_err();
        assert!(matches!(err, ImporterError::UpstreamError(ref m) if m == "BAD_KEY"));

        let err = PriceList::from_body("   ").unwrap_err();
        assert!(matches!(err, ImporterError::UpstreamError(_)));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = PriceList::from_body(r#"{"73": "#).unwrap_err();
        assert!(matches!(err, ImporterError::ParseError(_)));
    }

    #[test]
    fn test_empty_object() {
        let list = PriceList::from_body("{}").unwrap();
        assert!(list.is_empty());
        assert_eq!(list.entries().count(), 0);
    }
}
