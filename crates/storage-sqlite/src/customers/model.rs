//! Database model for customers.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use geocast_core::customers::{Customer, Gender, NewCustomer};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct CustomerDB {
    pub id: String,
    pub name: String,
    pub gender: String,
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

impl CustomerDB {
    pub fn from_new(id: String, new: NewCustomer, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            name: new.name,
            gender: new.gender.as_str().to_string(),
            birth_year: new.birth_year,
            phone: new.phone,
            road_address: new.road_address,
            detail_address: new.detail_address,
            postal_code: new.postal_code,
            sido: new.sido,
            sigungu: new.sigungu,
            lat: new.lat,
            lng: new.lng,
            created_at,
        }
    }
}

impl From<CustomerDB> for Customer {
    fn from(db: CustomerDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            // The column carries a CHECK (gender IN ('M','F')).
            gender: Gender::from_code(&db.gender).unwrap_or(Gender::F),
            birth_year: db.birth_year,
            phone: db.phone,
            road_address: db.road_address,
            detail_address: db.detail_address,
            postal_code: db.postal_code,
            sido: db.sido,
            sigungu: db.sigungu,
            lat: db.lat,
            lng: db.lng,
            created_at: db.created_at,
        }
    }
}
