//! Audience selection shared by the customer and campaign repositories.
//!
//! Scalar predicates and the radius bounding box run in SQL; exact
//! great-circle containment is applied to the surviving rows.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;

use geocast_core::customers::Customer;
use geocast_core::filters::AudienceQuery;
use geocast_core::utils::{Page, PageRequest};
use geocast_core::Result;

use super::model::CustomerDB;
use crate::errors::StorageError;
use crate::schema::customers;

type BoxedCustomers<'a> = customers::BoxedQuery<'a, Sqlite>;

fn filtered(query: &AudienceQuery) -> BoxedCustomers<'static> {
    let mut sql = customers::table.into_boxed();

    if let Some(gender) = query.gender {
        sql = sql.filter(customers::gender.eq(gender.as_str()));
    }
    if let Some(sido) = &query.sido {
        sql = sql.filter(customers::sido.eq(sido.clone()));
    }
    if let Some(sigungu) = &query.sigungu {
        sql = sql.filter(customers::sigungu.eq(sigungu.clone()));
    }
    let (min_birth, max_birth) = query.birth_year_bounds();
    if let Some(min_birth) = min_birth {
        sql = sql.filter(customers::birth_year.ge(min_birth));
    }
    if let Some(max_birth) = max_birth {
        sql = sql.filter(customers::birth_year.le(max_birth));
    }
    if let Some(circle) = &query.radius {
        let bbox = circle.bounding_box();
        sql = sql
            .filter(customers::lat.between(bbox.min_lat, bbox.max_lat))
            .filter(customers::lng.between(bbox.min_lng, bbox.max_lng));
    }
    sql
}

/// Every customer matching `query`, ordered by id.
pub fn load_audience(conn: &mut SqliteConnection, query: &AudienceQuery) -> Result<Vec<Customer>> {
    let rows = filtered(query)
        .order(customers::id.asc())
        .select(CustomerDB::as_select())
        .load::<CustomerDB>(conn)
        .map_err(StorageError::from)?;

    Ok(rows
        .into_iter()
        .map(Customer::from)
        .filter(|c| match &query.radius {
            Some(circle) => circle.contains(c.lat, c.lng),
            None => true,
        })
        .collect())
}

pub fn count_audience(conn: &mut SqliteConnection, query: &AudienceQuery) -> Result<i64> {
    if query.radius.is_some() {
        return Ok(load_audience(conn, query)?.len() as i64);
    }
    let total = filtered(query)
        .count()
        .get_result::<i64>(conn)
        .map_err(StorageError::from)?;
    Ok(total)
}

pub fn page_audience(
    conn: &mut SqliteConnection,
    query: &AudienceQuery,
    page: PageRequest,
) -> Result<Page<Customer>> {
    if query.radius.is_some() {
        let all = load_audience(conn, query)?;
        return Ok(Page::from_full(all, page));
    }
    let total = count_audience(conn, query)?;
    let rows = filtered(query)
        .order(customers::id.asc())
        .limit(page.size)
        .offset(page.offset())
        .select(CustomerDB::as_select())
        .load::<CustomerDB>(conn)
        .map_err(StorageError::from)?;
    Ok(Page::new(
        rows.into_iter().map(Customer::from).collect(),
        total,
        page,
    ))
}
