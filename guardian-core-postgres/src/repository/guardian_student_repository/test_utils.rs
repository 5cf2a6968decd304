#[cfg(test)]
pub mod test_utils {
    use crate::unit_of_work::PostgresSession;
    use chrono::Utc;
    use guardian_core_api::{relationship_type, Edge, Preferences};
    use rand::Rng;
    use uuid::Uuid;

    pub fn random_phone_number() -> String {
        let mut rng = rand::thread_rng();
        format!("+2557{:08}", rng.gen_range(0..100_000_000u32))
    }

    pub async fn create_test_student(
        session: &PostgresSession,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        let id = Uuid::new_v4();
        let mut tx = session.executor().tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        sqlx::query("INSERT INTO student (id, full_name) VALUES ($1, $2)")
            .bind(id)
            .bind("Test Student")
            .execute(&mut **transaction)
            .await?;
        Ok(id)
    }

    pub async fn create_test_guardian(
        session: &PostgresSession,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        let id = Uuid::new_v4();
        let mut tx = session.executor().tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        sqlx::query(
            "INSERT INTO guardian (id, first_name, last_name, phone_number) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind("Test")
        .bind("Guardian")
        .bind(random_phone_number())
        .execute(&mut **transaction)
        .await?;
        Ok(id)
    }

    pub fn new_test_edge(guardian_id: Uuid, student_id: Uuid, is_primary: bool) -> Edge {
        // Postgres keeps microseconds; truncate so round-tripped edges compare equal.
        let now = Utc::now();
        let now = now - chrono::Duration::nanoseconds(i64::from(now.timestamp_subsec_nanos() % 1_000));
        Edge::new(
            guardian_id,
            student_id,
            relationship_type("Mother").unwrap(),
            is_primary,
            Preferences::default(),
            now,
        )
    }
}
