#[cfg(test)]
pub mod test_utils {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sqlx::PgPool;
    use uuid::Uuid;

    type TestResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

    pub async fn insert_student(pool: &PgPool) -> TestResult<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO student (id, full_name) VALUES ($1, $2)")
            .bind(id)
            .bind("Ledger Student")
            .execute(pool)
            .await?;
        Ok(id)
    }

    pub async fn insert_term(pool: &PgPool, name: &str, start: NaiveDate, end: NaiveDate) -> TestResult<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO term (id, name, academic_year, start_date, end_date) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(name)
        .bind(start.format("%Y").to_string())
        .bind(start)
        .bind(end)
        .execute(pool)
        .await?;
        Ok(id)
    }

    pub async fn insert_fee(pool: &PgPool, student_id: Uuid, term_id: Option<Uuid>, amount: Decimal) -> TestResult<()> {
        sqlx::query("INSERT INTO student_fee (id, student_id, term_id, amount) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(student_id)
            .bind(term_id)
            .bind(amount)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn insert_payment(pool: &PgPool, student_id: Uuid, amount: Decimal, date: NaiveDate) -> TestResult<()> {
        sqlx::query("INSERT INTO payment (id, student_id, amount, payment_date) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(student_id)
            .bind(amount)
            .bind(date)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Deleting the students cascades to their fees and payments.
    pub async fn cleanup_students(pool: &PgPool, ids: &[Uuid]) -> TestResult<()> {
        sqlx::query("DELETE FROM student WHERE id = ANY($1)").bind(ids).execute(pool).await?;
        Ok(())
    }

    pub async fn cleanup_terms(pool: &PgPool, ids: &[Uuid]) -> TestResult<()> {
        sqlx::query("DELETE FROM term WHERE id = ANY($1)").bind(ids).execute(pool).await?;
        Ok(())
    }
}
