//! Customer domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "M" | "m" => Some(Gender::M),
            "F" | "f" => Some(Gender::F),
            _ => None,
        }
    }
}

/// Domain model representing a message recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub birth_year: i32,
    pub phone: Option<String>,
    pub road_address: Option<String>,
    pub detail_address: Option<String>,
    pub postal_code: Option<String>,
    pub sido: Option<String>,
    pub sigungu: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub created_at: NaiveDateTime,
}

impl Customer {
    /// Name with everything but the first and last character hidden.
    pub fn masked_name(&self) -> String {
        let chars: Vec<char> = self.name.chars().collect();
        match chars.len() {
            0 => String::new(),
            1 => chars[0].to_string(),
            2 => format!("{}*", chars[0]),
            n => {
                let mut masked = String::new();
                masked.push(chars[0]);
                masked.extend(std::iter::repeat('*').take(n - 2));
                masked.push(chars[n - 1]);
                masked
            }
        }
    }

    /// Coarse address: region names only, or a truncated road address.
    pub fn masked_address(&self) -> String {
        match (self.sido.as_deref(), self.sigungu.as_deref()) {
            (Some(sido), Some(sigungu)) => format!("{} {}", sido, sigungu),
            (Some(sido), None) => sido.to_string(),
            _ => match self.road_address.as_deref() {
                Some(road) if road.chars().count() > 10 => {
                    format!("{}...", road.chars().take(10).collect::<String>())
                }
                Some(road) => road.to_string(),
                None => String::new(),
            },
        }
    }

    pub fn age(&self, reference_year: i32) -> i32 {
        reference_year - self.birth_year
    }
}

/// Audience listing entry without personal contact data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceMember {
    pub id: String,
    pub gender: Gender,
    pub birth_year: i32,
    pub sido: Option<String>,
    pub sigungu: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub created_at: NaiveDateTime,
}

impl From<Customer> for AudienceMember {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            gender: customer.gender,
            birth_year: customer.birth_year,
            sido: customer.sido,
            sigungu: customer.sigungu,
            lat: customer.lat,
            lng: customer.lng,
            created_at: customer.created_at,
        }
    }
}

/// Input model for creating a new customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub gender: Gender,
    pub birth_year: i32,
    pub phone: Option<String>,
    pub road_address: Option<String>,
    pub detail_address: Option<String>,
    pub postal_code: Option<String>,
    pub sido: Option<String>,
    pub sigungu: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl NewCustomer {
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.name, self.birth_year, self.lat, self.lng)
    }

    /// Trims text fields and turns blanks into `None`.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.phone = blank_to_none(self.phone);
        self.road_address = blank_to_none(self.road_address);
        self.detail_address = blank_to_none(self.detail_address);
        self.postal_code = blank_to_none(self.postal_code);
        self.sido = blank_to_none(self.sido);
        self.sigungu = blank_to_none(self.sigungu);
        self
    }
}

/// Input model for updating a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    pub id: String,
    #[serde(flatten)]
    pub fields: NewCustomer,
}

impl CustomerUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::invalid_input("Customer id is required"));
        }
        self.fields.validate()
    }
}

fn validate_fields(name: &str, birth_year: i32, lat: f64, lng: f64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_input("Customer name cannot be empty"));
    }
    if !(1900..=2100).contains(&birth_year) {
        return Err(Error::invalid_input(format!(
            "Birth year {} is out of range",
            birth_year
        )));
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(Error::invalid_input("Coordinates are out of range"));
    }
    Ok(())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(name: &str, sido: Option<&str>, sigungu: Option<&str>, road: Option<&str>) -> Customer {
        Customer {
            id: "c1".to_string(),
            name: name.to_string(),
            gender: Gender::F,
            birth_year: 1990,
            phone: None,
            road_address: road.map(str::to_string),
            detail_address: None,
            postal_code: None,
            sido: sido.map(str::to_string),
            sigungu: sigungu.map(str::to_string),
            lat: 37.5,
            lng: 127.0,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn masks_names_by_length() {
        assert_eq!(customer("김", None, None, None).masked_name(), "김");
        assert_eq!(customer("김철", None, None, None).masked_name(), "김*");
        assert_eq!(customer("김철수", None, None, None).masked_name(), "김*수");
        assert_eq!(customer("Alexander", None, None, None).masked_name(), "A*******r");
    }

    #[test]
    fn masks_address_to_region() {
        let c = customer("x", Some("서울특별시"), Some("강남구"), Some("테헤란로 123"));
        assert_eq!(c.masked_address(), "서울특별시 강남구");
        let c = customer("x", Some("서울특별시"), None, None);
        assert_eq!(c.masked_address(), "서울특별시");
        let c = customer("x", None, None, Some("0123456789ABCDEF"));
        assert_eq!(c.masked_address(), "0123456789...");
    }

    #[test]
    fn validation_rejects_bad_birth_year() {
        let mut new = NewCustomer {
            name: "Kim".to_string(),
            gender: Gender::M,
            birth_year: 1850,
            phone: None,
            road_address: None,
            detail_address: None,
            postal_code: None,
            sido: None,
            sigungu: None,
            lat: 37.0,
            lng: 127.0,
        };
        assert!(new.validate().is_err());
        new.birth_year = 1985;
        assert!(new.validate().is_ok());
    }
}
