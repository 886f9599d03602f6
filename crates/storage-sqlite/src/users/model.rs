//! Database model for users.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use geocast_core::users::{AppUser, UserRole};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::app_users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AppUserDB {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub business_no: String,
    pub company_name: String,
    pub role: String,
    pub points: i64,
    pub created_at: NaiveDateTime,
}

impl From<AppUserDB> for AppUser {
    fn from(db: AppUserDB) -> Self {
        Self {
            id: db.id,
            email: db.email,
            password_hash: db.password_hash,
            business_no: db.business_no,
            company_name: db.company_name,
            // Unknown roles never gain privileges.
            role: UserRole::parse(&db.role).unwrap_or(UserRole::User),
            points: db.points,
            created_at: db.created_at,
        }
    }
}
