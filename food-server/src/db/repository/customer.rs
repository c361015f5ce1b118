//! Customer Repository

use super::{Page, RepoError, RepoResult};
use shared::models::{Customer, CustomerCreate};
use sqlx::{Sqlite, SqlitePool};

const COLUMNS: &str = "id, name, email, phone_number, address, is_active, created_at, updated_at";

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Customer>> {
    let sql = format!("SELECT {COLUMNS} FROM customers WHERE id = ?");
    let customer = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(customer)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Customer>> {
    let sql = format!("SELECT {COLUMNS} FROM customers WHERE email = ? LIMIT 1");
    let customer = sqlx::query_as::<_, Customer>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(customer)
}

pub async fn find_all(pool: &SqlitePool, page: Page) -> RepoResult<Vec<Customer>> {
    let sql = format!("SELECT {COLUMNS} FROM customers ORDER BY id LIMIT ? OFFSET ?");
    let customers = sqlx::query_as::<_, Customer>(&sql)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(pool)
        .await?;
    Ok(customers)
}

pub async fn create(pool: &SqlitePool, data: &CustomerCreate, now: i64) -> RepoResult<Customer> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO customers (name, email, phone_number, address, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone_number)
    .bind(&data.address)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".into()))
}

/// Overwrite the editable columns with an already merged record
pub async fn update(pool: &SqlitePool, customer: &Customer) -> RepoResult<Customer> {
    let rows = sqlx::query(
        "UPDATE customers SET name = ?, email = ?, phone_number = ?, address = ?, \
         is_active = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&customer.name)
    .bind(&customer.email)
    .bind(&customer.phone_number)
    .bind(&customer.address)
    .bind(customer.is_active)
    .bind(customer.updated_at)
    .bind(customer.id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Customer {} not found",
            customer.id
        )));
    }
    find_by_id(pool, customer.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer {} not found", customer.id)))
}

pub async fn delete(conn: impl sqlx::Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM customers WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{customer_payload, test_pool};

    #[tokio::test]
    async fn test_create_find_update() {
        let pool = test_pool().await;
        let created = create(&pool, &customer_payload("Ann Lee", "ann@example.com"), 10)
            .await
            .unwrap();
        assert!(created.is_active);

        let by_email = find_by_email(&pool, "ann@example.com").await.unwrap();
        assert_eq!(by_email.as_ref().map(|c| c.id), Some(created.id));

        let mut changed = created.clone();
        changed.is_active = false;
        changed.updated_at = 20;
        let updated = update(&pool, &changed).await.unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.updated_at, 20);
        assert_eq!(updated.created_at, 10);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let pool = test_pool().await;
        create(&pool, &customer_payload("Ann Lee", "ann@example.com"), 0)
            .await
            .unwrap();
        let err = create(&pool, &customer_payload("Ann Other", "ann@example.com"), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_pagination() {
        let pool = test_pool().await;
        for i in 0..5 {
            create(
                &pool,
                &customer_payload(&format!("Customer {i}"), &format!("c{i}@example.com")),
                0,
            )
            .await
            .unwrap();
        }
        let page = find_all(&pool, Page::new(2, 2)).await.unwrap();
        let names: Vec<&str> = page.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Customer 2", "Customer 3"]);
    }
}
