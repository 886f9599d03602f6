//! Filter specification models and the audience predicate they resolve to.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::geo::{haversine_distance_meters, BoundingBox};
use crate::constants::MAX_FILTER_AGE;
use crate::customers::{Customer, Gender};
use crate::errors::{Result, ValidationError};

/// A toggleable filter block. `value` is only meaningful while `enabled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterBlock<T> {
    pub enabled: bool,
    pub value: Option<T>,
}

impl<T> FilterBlock<T> {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            value: None,
        }
    }

    pub fn enabled(value: Option<T>) -> Self {
        Self {
            enabled: true,
            value,
        }
    }

    /// The value that constrains the audience, if any.
    pub fn active_value(&self) -> Option<&T> {
        if self.enabled {
            self.value.as_ref()
        } else {
            None
        }
    }
}

impl<T> Default for FilterBlock<T> {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Inclusive age bounds. Serialized as a two element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl From<[u32; 2]> for AgeRange {
    fn from(pair: [u32; 2]) -> Self {
        Self {
            min: pair[0],
            max: pair[1],
        }
    }
}

impl From<AgeRange> for [u32; 2] {
    fn from(range: AgeRange) -> Self {
        [range.min, range.max]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sido: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigungu: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCircle {
    pub lat: f64,
    pub lng: f64,
    pub meters: f64,
}

impl GeoCircle {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        haversine_distance_meters(self.lat, self.lng, lat, lng) <= self.meters
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::around(self.lat, self.lng, self.meters)
    }
}

/// Typed targeting specification, one block per filter kind.
///
/// Serializes back to the same wire shape it is parsed from, with blank
/// values already normalized away, so a stored spec re-parses identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub gender: FilterBlock<Gender>,
    pub age_range: FilterBlock<AgeRange>,
    pub region: FilterBlock<RegionValue>,
    pub radius: FilterBlock<GeoCircle>,
}

impl FilterSpec {
    /// Parses the wire format. Missing blocks are disabled; values of
    /// disabled blocks are ignored without validation.
    pub fn parse(raw: &Value) -> Result<Self> {
        let obj = match raw {
            Value::Null => return Ok(Self::default()),
            Value::Object(obj) => obj,
            _ => return Err(invalid("filters must be an object")),
        };

        Ok(Self {
            gender: parse_block(obj, "gender", parse_gender)?,
            age_range: parse_block(obj, "ageRange", parse_age_range)?,
            region: parse_block(obj, "region", parse_region)?,
            radius: parse_block(obj, "radius", parse_radius)?,
        })
    }

    /// Number of enabled filter kinds (0-4). Drives pricing.
    pub fn active_filter_count(&self) -> usize {
        [
            self.gender.enabled,
            self.age_range.enabled,
            self.region.enabled,
            self.radius.enabled,
        ]
        .iter()
        .filter(|enabled| **enabled)
        .count()
    }

    /// Turns the spec into concrete predicates, evaluating ages against
    /// `reference_year`.
    pub fn resolve(&self, reference_year: i32) -> ResolvedFilters {
        let region = self.region.active_value();
        let query = AudienceQuery {
            gender: self.gender.active_value().copied(),
            sido: region.and_then(|r| r.sido.clone()),
            sigungu: region.and_then(|r| r.sigungu.clone()),
            age_from: self.age_range.active_value().map(|r| r.min),
            age_to: self.age_range.active_value().map(|r| r.max),
            radius: self.radius.active_value().copied(),
            reference_year,
        };
        ResolvedFilters {
            query,
            active_filter_count: self.active_filter_count(),
        }
    }

    pub fn to_value(&self) -> Value {
        // A plain struct of strings, numbers and options always serializes.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Predicates plus the price-tier input.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFilters {
    pub query: AudienceQuery,
    pub active_filter_count: usize,
}

/// Normalized audience predicates. Absent fields impose no constraint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudienceQuery {
    pub gender: Option<Gender>,
    pub sido: Option<String>,
    pub sigungu: Option<String>,
    pub age_from: Option<u32>,
    pub age_to: Option<u32>,
    pub radius: Option<GeoCircle>,
    pub reference_year: i32,
}

impl AudienceQuery {
    /// Matches every customer.
    pub fn everyone(reference_year: i32) -> Self {
        Self {
            reference_year,
            ..Default::default()
        }
    }

    /// Birth-year bounds equivalent to the age bounds, inclusive.
    pub fn birth_year_bounds(&self) -> (Option<i32>, Option<i32>) {
        let born = |age: u32| {
            let age = i32::try_from(age).unwrap_or(i32::MAX);
            self.reference_year.saturating_sub(age)
        };
        (self.age_to.map(born), self.age_from.map(born))
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        if let Some(gender) = self.gender {
            if customer.gender != gender {
                return false;
            }
        }
        if let Some(sido) = &self.sido {
            if customer.sido.as_deref() != Some(sido.as_str()) {
                return false;
            }
        }
        if let Some(sigungu) = &self.sigungu {
            if customer.sigungu.as_deref() != Some(sigungu.as_str()) {
                return false;
            }
        }
        let (min_birth, max_birth) = self.birth_year_bounds();
        if let Some(min_birth) = min_birth {
            if customer.birth_year < min_birth {
                return false;
            }
        }
        if let Some(max_birth) = max_birth {
            if customer.birth_year > max_birth {
                return false;
            }
        }
        if let Some(circle) = &self.radius {
            if !circle.contains(customer.lat, customer.lng) {
                return false;
            }
        }
        true
    }
}

fn invalid(message: impl Into<String>) -> crate::Error {
    ValidationError::InvalidFilter(message.into()).into()
}

fn parse_block<T>(
    obj: &Map<String, Value>,
    key: &str,
    parse_value: impl Fn(&Value) -> Result<Option<T>>,
) -> Result<FilterBlock<T>> {
    let block = match obj.get(key) {
        None | Some(Value::Null) => return Ok(FilterBlock::disabled()),
        Some(Value::Object(block)) => block,
        Some(_) => return Err(invalid(format!("'{}' must be an object", key))),
    };
    let enabled = matches!(block.get("enabled"), Some(Value::Bool(true)));
    if !enabled {
        return Ok(FilterBlock::disabled());
    }
    let value = match block.get("value") {
        None | Some(Value::Null) => None,
        Some(value) => parse_value(value).map_err(|e| match e {
            crate::Error::Validation(ValidationError::InvalidFilter(msg)) => {
                invalid(format!("{}: {}", key, msg))
            }
            other => other,
        })?,
    };
    Ok(FilterBlock::enabled(value))
}

/// Returns the trimmed string, or `None` when blank.
fn non_blank(value: Option<&Value>) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Some(_) => Err(invalid("expected a string")),
    }
}

fn parse_gender(value: &Value) -> Result<Option<Gender>> {
    match non_blank(Some(value))? {
        None => Ok(None),
        Some(code) => Gender::from_code(&code)
            .map(Some)
            .ok_or_else(|| invalid(format!("unknown gender '{}'", code))),
    }
}

fn parse_age_range(value: &Value) -> Result<Option<AgeRange>> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid("expected [min, max]"))?;
    if items.len() != 2 {
        return Err(invalid("expected exactly two ages"));
    }
    let age = |v: &Value| -> Result<u32> {
        v.as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| invalid("ages must be non-negative integers"))
    };
    let min = age(&items[0])?;
    let max = age(&items[1])?;
    if min > max {
        return Err(invalid(format!("min age {} exceeds max age {}", min, max)));
    }
    if max > MAX_FILTER_AGE {
        return Err(invalid(format!("ages must not exceed {}", MAX_FILTER_AGE)));
    }
    Ok(Some(AgeRange { min, max }))
}

fn parse_region(value: &Value) -> Result<Option<RegionValue>> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("expected {sido, sigungu}"))?;
    let sido = non_blank(obj.get("sido"))?;
    let sigungu = non_blank(obj.get("sigungu"))?;
    if sido.is_none() && sigungu.is_none() {
        return Ok(None);
    }
    Ok(Some(RegionValue { sido, sigungu }))
}

fn parse_radius(value: &Value) -> Result<Option<GeoCircle>> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("expected {lat, lng, meters}"))?;
    let number = |key: &str| -> Result<f64> {
        obj.get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| invalid(format!("'{}' must be a number", key)))
    };
    let lat = number("lat")?;
    let lng = number("lng")?;
    let meters = number("meters")?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(invalid("lat must be within [-90, 90]"));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(invalid("lng must be within [-180, 180]"));
    }
    if !meters.is_finite() || meters <= 0.0 {
        return Err(invalid("meters must be positive"));
    }
    Ok(Some(GeoCircle { lat, lng, meters }))
}
