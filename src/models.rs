// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::month::MonthKey;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid transaction kind '{0}', expected income|expense")]
    Kind(String),
    #[error("Invalid status '{0}', expected planned|settled|cancelled")]
    Status(String),
    #[error("Invalid flow '{0}', expected none|light|moderate|heavy")]
    Flow(String),
    #[error("Invalid frequency '{0}', expected daily, weekdays:mon,wed,... or weekly:N (1-7)")]
    Frequency(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(ParseError::Kind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Planned,
    Settled,
    Cancelled,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Planned => "planned",
            TxStatus::Settled => "settled",
            TxStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(TxStatus::Planned),
            "settled" => Ok(TxStatus::Settled),
            "cancelled" => Ok(TxStatus::Cancelled),
            other => Err(ParseError::Status(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub kind: TxKind,
    pub name: String,
    pub amount: Decimal,
    pub estimated_amount: Option<Decimal>,
    pub category_id: Option<i64>,
    pub card_id: Option<i64>,
    pub due_date: NaiveDate,
    pub effective_date: Option<NaiveDate>,
    pub competence: MonthKey,
    pub status: TxStatus,
    pub installment_index: Option<u32>,
    pub installment_total: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub is_income: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub account: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    None,
    Light,
    Moderate,
    Heavy,
}

impl Flow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::None => "none",
            Flow::Light => "light",
            Flow::Moderate => "moderate",
            Flow::Heavy => "heavy",
        }
    }

    pub fn is_bleeding(&self) -> bool {
        !matches!(self, Flow::None)
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flow {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Flow::None),
            "light" => Ok(Flow::Light),
            "moderate" => Ok(Flow::Moderate),
            "heavy" => Ok(Flow::Heavy),
            other => Err(ParseError::Flow(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRecord {
    pub date: NaiveDate,
    pub flow: Flow,
    pub symptoms: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CycleSettings {
    pub last_period_start: NaiveDate,
    pub cycle_length: u32,
    pub period_length: u32,
    pub luteal_length: u32,
}

/// Habit cadence. `Weekdays` is kept sorted Monday-first and deduplicated;
/// `TimesPerWeek` is 1..=7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekdays(Vec<Weekday>),
    TimesPerWeek(u32),
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => f.write_str("daily"),
            Frequency::Weekdays(days) => {
                let names: Vec<&str> = days
                    .iter()
                    .map(|d| match d {
                        Weekday::Mon => "mon",
                        Weekday::Tue => "tue",
                        Weekday::Wed => "wed",
                        Weekday::Thu => "thu",
                        Weekday::Fri => "fri",
                        Weekday::Sat => "sat",
                        Weekday::Sun => "sun",
                    })
                    .collect();
                write!(f, "weekdays:{}", names.join(","))
            }
            Frequency::TimesPerWeek(n) => write!(f, "weekly:{}", n),
        }
    }
}

impl FromStr for Frequency {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Frequency(s.to_string());
        if s == "daily" {
            return Ok(Frequency::Daily);
        }
        if let Some(rest) = s.strip_prefix("weekdays:") {
            let mut days: Vec<Weekday> = Vec::new();
            for part in rest.split(',') {
                let day: Weekday = part.trim().parse().map_err(|_| err())?;
                if !days.contains(&day) {
                    days.push(day);
                }
            }
            if days.is_empty() {
                return Err(err());
            }
            days.sort_by_key(|d| d.num_days_from_monday());
            return Ok(Frequency::Weekdays(days));
        }
        if let Some(rest) = s.strip_prefix("weekly:") {
            let n: u32 = rest.trim().parse().map_err(|_| err())?;
            if !(1..=7).contains(&n) {
                return Err(err());
            }
            return Ok(Frequency::TimesPerWeek(n));
        }
        Err(err())
    }
}

impl Serialize for Frequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMood {
    pub date: NaiveDate,
    pub rating: u8,
    pub emotions: Vec<String>,
}
