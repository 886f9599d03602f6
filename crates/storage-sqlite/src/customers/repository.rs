use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use uuid::Uuid;

use geocast_core::customers::{Customer, CustomerRepositoryTrait, CustomerUpdate, NewCustomer};
use geocast_core::filters::AudienceQuery;
use geocast_core::utils::{Page, PageRequest};
use geocast_core::Result;

use super::model::CustomerDB;
use super::query::{count_audience, load_audience, page_audience};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::customers;

pub struct CustomerRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CustomerRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CustomerRepositoryTrait for CustomerRepository {
    fn count_matching(&self, query: &AudienceQuery) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        count_audience(&mut conn, query)
    }

    fn list_matching(&self, query: &AudienceQuery) -> Result<Vec<Customer>> {
        let mut conn = get_connection(&self.pool)?;
        load_audience(&mut conn, query)
    }

    fn list_page(&self, query: &AudienceQuery, page: PageRequest) -> Result<Page<Customer>> {
        let mut conn = get_connection(&self.pool)?;
        page_audience(&mut conn, query, page)
    }

    fn get_by_id(&self, customer_id: &str) -> Result<Customer> {
        let mut conn = get_connection(&self.pool)?;
        let row = customers::table
            .find(customer_id)
            .select(CustomerDB::as_select())
            .first(&mut conn)
            .map_err(not_found_as("Customer", customer_id))?;
        Ok(row.into())
    }

    async fn create(&self, new_customer: NewCustomer) -> Result<Customer> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Customer> {
                let row = CustomerDB::from_new(
                    Uuid::now_v7().to_string(),
                    new_customer,
                    chrono::Utc::now().naive_utc(),
                );
                let saved = diesel::insert_into(customers::table)
                    .values(&row)
                    .returning(CustomerDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(saved.into())
            })
            .await
    }

    async fn update(&self, customer_update: CustomerUpdate) -> Result<Customer> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Customer> {
                let id = customer_update.id;
                let existing = customers::table
                    .find(&id)
                    .select(CustomerDB::as_select())
                    .first(conn)
                    .map_err(not_found_as("Customer", &id))?;
                let row =
                    CustomerDB::from_new(id.clone(), customer_update.fields, existing.created_at);
                let saved = diesel::update(customers::table.find(&id))
                    .set(&row)
                    .returning(CustomerDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(saved.into())
            })
            .await
    }

    async fn delete(&self, customer_id: &str) -> Result<usize> {
        let id = customer_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected = diesel::delete(customers::table.find(&id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(affected)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{new_customer, test_db};
    use geocast_core::customers::Gender;
    use geocast_core::filters::GeoCircle;

    async fn seed(repo: &CustomerRepository) {
        // Seoul City Hall, Gangnam (~8.5km), Busan (~325km)
        let rows = [
            ("Kim", Gender::F, 1990, "Seoul", 37.5663, 126.9779),
            ("Lee", Gender::M, 1985, "Seoul", 37.4979, 127.0276),
            ("Park", Gender::F, 1970, "Busan", 35.1796, 129.0756),
            ("Choi", Gender::F, 2001, "Seoul", 37.5665, 126.9780),
        ];
        for (name, gender, birth_year, sido, lat, lng) in rows {
            repo.create(new_customer(name, gender, birth_year, sido, lat, lng))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn scalar_predicates_combine() {
        let db = test_db();
        let repo = CustomerRepository::new(Arc::clone(&db.pool), db.writer.clone());
        seed(&repo).await;

        let query = AudienceQuery {
            gender: Some(Gender::F),
            sido: Some("Seoul".to_string()),
            ..AudienceQuery::everyone(2025)
        };
        assert_eq!(repo.count_matching(&query).unwrap(), 2);

        let thirties = AudienceQuery {
            age_from: Some(30),
            age_to: Some(39),
            ..AudienceQuery::everyone(2025)
        };
        let names: Vec<String> = repo
            .list_matching(&thirties)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Kim".to_string()]);
    }

    #[tokio::test]
    async fn radius_is_exact_not_bounding_box() {
        let db = test_db();
        let repo = CustomerRepository::new(Arc::clone(&db.pool), db.writer.clone());
        seed(&repo).await;

        let near_city_hall = AudienceQuery {
            radius: Some(GeoCircle {
                lat: 37.5663,
                lng: 126.9779,
                meters: 1_000.0,
            }),
            ..AudienceQuery::everyone(2025)
        };
        assert_eq!(repo.count_matching(&near_city_hall).unwrap(), 2);

        let wide = AudienceQuery {
            radius: Some(GeoCircle {
                lat: 37.5663,
                lng: 126.9779,
                meters: 10_000.0,
            }),
            ..AudienceQuery::everyone(2025)
        };
        assert_eq!(repo.count_matching(&wide).unwrap(), 3);
        let page = repo
            .list_page(&wide, PageRequest::new(Some(1), Some(2)).unwrap())
            .unwrap();
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn update_keeps_created_at_and_delete_reports_rows() {
        let db = test_db();
        let repo = CustomerRepository::new(Arc::clone(&db.pool), db.writer.clone());
        let created = repo
            .create(new_customer("Kim", Gender::F, 1990, "Seoul", 37.5, 127.0))
            .await
            .unwrap();

        let mut fields = new_customer("Kim Minji", Gender::F, 1991, "Seoul", 37.5, 127.0);
        fields.sigungu = Some("Jongno-gu".to_string());
        let updated = repo
            .update(CustomerUpdate {
                id: created.id.clone(),
                fields,
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "Kim Minji");
        assert_eq!(updated.sigungu.as_deref(), Some("Jongno-gu"));
        assert_eq!(updated.created_at, created.created_at);

        assert_eq!(repo.delete(&created.id).await.unwrap(), 1);
        assert!(repo.get_by_id(&created.id).unwrap_err().is_not_found());
    }
}
