use guardian_core_db::models::audit::AuditLogModel;
use guardian_core_db::utils::order_by_ids;
use postgres_unit_of_work::Executor;
use uuid::Uuid;

pub async fn load_batch_impl(
    executor: &Executor,
    ids: &[Uuid],
) -> Result<Vec<Option<AuditLogModel>>, Box<dyn std::error::Error + Send + Sync>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let query = sqlx::query_as::<_, AuditLogModel>(
        r#"
        SELECT id, action, student_id, channel, updated_at, updated_by_user_id
        FROM audit_log
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids);

    let mut tx = executor.tx.lock().await;
    let rows = if let Some(transaction) = tx.as_mut() {
        query.fetch_all(&mut **transaction).await?
    } else {
        return Err("Transaction has been consumed".into());
    };

    Ok(order_by_ids(ids, rows))
}
