//! Shared fixtures for repository tests.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::RunQueryDsl;
use tempfile::{tempdir, TempDir};

use geocast_core::customers::{Gender, NewCustomer};
use geocast_core::users::{AppUser, NewAppUser, UserRepositoryTrait, UserRole};

use crate::db::{create_pool, get_connection, run_migrations, spawn_writer, DbPool, WriteHandle};
use crate::users::UserRepository;

pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    _dir: TempDir,
}

pub fn test_db() -> TestDb {
    let dir = tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db").to_string_lossy().to_string();
    crate::db::init(&db_path).expect("Failed to init database");
    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());
    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}

pub async fn create_user(db: &TestDb, email: &str) -> AppUser {
    UserRepository::new(Arc::clone(&db.pool), db.writer.clone())
        .create(NewAppUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            business_no: "123-45-67890".to_string(),
            company_name: "Acme Coffee".to_string(),
            role: UserRole::User,
        })
        .await
        .expect("Failed to create user")
}

pub fn new_customer(name: &str, gender: Gender, birth_year: i32, sido: &str, lat: f64, lng: f64) -> NewCustomer {
    NewCustomer {
        name: name.to_string(),
        gender,
        birth_year,
        phone: None,
        road_address: None,
        detail_address: None,
        postal_code: None,
        sido: Some(sido.to_string()),
        sigungu: None,
        lat,
        lng,
    }
}

/// Fixed timestamp on 2024-07-01, offset by `hour`.
pub fn stamp(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 1)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

pub fn execute(db: &TestDb, sql: &str) {
    let mut conn = get_connection(&db.pool).expect("Failed to get connection");
    diesel::sql_query(sql)
        .execute(&mut conn)
        .expect("Failed to execute sql");
}
