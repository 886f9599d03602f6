use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use uuid::Uuid;

use geocast_core::users::{AppUser, NewAppUser, UserRepositoryTrait};
use geocast_core::{Error, Result};

use super::model::AppUserDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::app_users;

pub struct UserRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_by_id(&self, user_id: &str) -> Result<AppUser> {
        let mut conn = get_connection(&self.pool)?;
        let user = app_users::table
            .find(user_id)
            .select(AppUserDB::as_select())
            .first(&mut conn)
            .map_err(not_found_as("User", user_id))?;
        Ok(user.into())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<AppUser>> {
        let mut conn = get_connection(&self.pool)?;
        let user = app_users::table
            .filter(app_users::email.eq(email))
            .select(AppUserDB::as_select())
            .first(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(user.map(AppUser::from))
    }

    async fn create(&self, new_user: NewAppUser) -> Result<AppUser> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AppUser> {
                let row = AppUserDB {
                    id: Uuid::now_v7().to_string(),
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    business_no: new_user.business_no,
                    company_name: new_user.company_name,
                    role: new_user.role.as_str().to_string(),
                    points: 0,
                    created_at: chrono::Utc::now().naive_utc(),
                };
                let saved = diesel::insert_into(app_users::table)
                    .values(&row)
                    .returning(AppUserDB::as_returning())
                    .get_result(conn)
                    .map_err(|e| match e {
                        diesel::result::Error::DatabaseError(
                            diesel::result::DatabaseErrorKind::UniqueViolation,
                            _,
                        ) => Error::invalid_input("Email is already registered"),
                        other => StorageError::from(other).into(),
                    })?;
                Ok(saved.into())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_user, test_db};
    use geocast_core::users::UserRole;

    #[tokio::test]
    async fn duplicate_email_is_a_validation_error() {
        let db = test_db();
        let first = create_user(&db, "owner@example.com").await;
        assert_eq!(first.points, 0);
        assert_eq!(first.role, UserRole::User);

        let repo = UserRepository::new(Arc::clone(&db.pool), db.writer.clone());
        let err = repo
            .create(NewAppUser {
                email: "owner@example.com".to_string(),
                password_hash: "other".to_string(),
                business_no: "000".to_string(),
                company_name: "Other".to_string(),
                role: UserRole::User,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let found = repo.find_by_email("owner@example.com").unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert!(repo.find_by_email("nobody@example.com").unwrap().is_none());
    }
}
