use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};

use crate::types::AccountName;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A single normalized ledger row.
///
/// Rows arrive already cleaned: the account label is normalized upstream and
/// the amount is signed. Several rows per account per day are expected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    pub account: AccountName,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Decimal
}

impl Transaction {
    pub fn new(date: NaiveDate, account: impl Into<AccountName>, amount: Decimal) -> Self {
        Self {
            date,
            account: account.into(),
            amount
        }
    }
}

/// Parses the date layouts the ingestion side is known to emit.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    DATE_FORMATS.iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS.iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|date_time| date_time.date())
        })
}

pub fn parse_amount(value: &str) -> Option<Decimal> {
    let value = value.trim();

    Decimal::from_str(value).ok()
        .or_else(|| Decimal::from_scientific(value).ok())
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_date(&value).ok_or_else(|| de::Error::custom(format!("invalid date '{value}'")))
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_amount(&value).ok_or_else(|| de::Error::custom(format!("amount '{value}' is not numeric")))
}
