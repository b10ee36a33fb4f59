use crate::error::KycError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two kinds of parties that can act on a KYC request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartyRole {
    Customer,
    BankEmployee,
}

impl PartyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyRole::Customer => "customer",
            PartyRole::BankEmployee => "employee",
        }
    }
}

impl FromStr for PartyRole {
    type Err = KycError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(PartyRole::Customer),
            "employee" => Ok(PartyRole::BankEmployee),
            other => Err(KycError::InvalidAction(format!(
                "unknown party role '{other}', expected 'customer' or 'employee'"
            ))),
        }
    }
}

/// A typed reference to a party, e.g. `customer:alice` or `employee:matias`.
///
/// The role is part of the reference because customers and bank employees
/// live in separate registries and the same id could appear in both.
/// Serializes as the `role:id` string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartyRef {
    pub role: PartyRole,
    pub id: String,
}

impl PartyRef {
    pub fn customer(id: impl Into<String>) -> Self {
        Self {
            role: PartyRole::Customer,
            id: id.into(),
        }
    }

    pub fn employee(id: impl Into<String>) -> Self {
        Self {
            role: PartyRole::BankEmployee,
            id: id.into(),
        }
    }

    pub fn is_employee(&self) -> bool {
        self.role == PartyRole::BankEmployee
    }
}

impl fmt::Display for PartyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role.as_str(), self.id)
    }
}

impl FromStr for PartyRef {
    type Err = KycError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (role, id) = s.split_once(':').ok_or_else(|| {
            KycError::InvalidAction(format!("party reference '{s}' must have the form 'role:id'"))
        })?;
        if id.is_empty() {
            return Err(KycError::InvalidAction(format!(
                "party reference '{s}' is missing the id part"
            )));
        }
        Ok(Self {
            role: role.parse()?,
            id: id.to_string(),
        })
    }
}

impl Serialize for PartyRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PartyRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Identifier of a bank participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BankId(String);

impl BankId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BankId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bank {
    pub id: BankId,
    pub name: String,
}

/// A customer of one of the participating banks.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub last_name: String,
    pub company_name: String,
    pub bank: BankId,
}

impl Customer {
    pub fn party_ref(&self) -> PartyRef {
        PartyRef::customer(self.id.clone())
    }
}

/// An employee acting on behalf of one of the participating banks.
#[derive(Debug, Clone, PartialEq)]
pub struct BankEmployee {
    pub id: String,
    pub name: String,
    pub bank: BankId,
}

impl BankEmployee {
    pub fn party_ref(&self) -> PartyRef {
        PartyRef::employee(self.id.clone())
    }
}
