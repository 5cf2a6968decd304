use chrono::{DateTime, Utc};
use guardian_core_api::{Edge, EdgePatch};
use guardian_core_db::repository::{RepositoryError, RepositoryResult};
use crate::utils::{map_sqlx_error, TryFromRow};
use uuid::Uuid;

use super::repo_impl::{GuardianStudentRepositoryImpl, EDGE_COLUMNS};

impl GuardianStudentRepositoryImpl {
    pub(super) async fn update_impl(
        repo: &GuardianStudentRepositoryImpl,
        guardian_id: Uuid,
        student_id: Uuid,
        patch: &EdgePatch,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Option<Edge>> {
        let query = format!(
            r#"
            UPDATE guardian_student SET
                is_primary = COALESCE($3, is_primary),
                relationship_type = COALESCE($4, relationship_type),
                receives_sms = COALESCE($5, receives_sms),
                receives_email = COALESCE($6, receives_email),
                receives_whatsapp = COALESCE($7, receives_whatsapp),
                receives_portal = COALESCE($8, receives_portal),
                receives_calls = COALESCE($9, receives_calls),
                updated_at = $10
            WHERE guardian_id = $1 AND student_id = $2
            RETURNING {EDGE_COLUMNS}
            "#
        );
        let preferences = patch.preferences;

        let row = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(&query)
                .bind(guardian_id)
                .bind(student_id)
                .bind(patch.is_primary)
                .bind(patch.relationship_type.as_ref().map(|label| label.as_str()))
                .bind(preferences.map(|p| p.sms))
                .bind(preferences.map(|p| p.email))
                .bind(preferences.map(|p| p.whatsapp))
                .bind(preferences.map(|p| p.portal))
                .bind(preferences.map(|p| p.calls))
                .bind(now)
                .fetch_optional(&mut **transaction)
                .await
                .map_err(map_sqlx_error)?
        };
        tracing::debug!(%guardian_id, %student_id, found = row.is_some(), "guardian_student updated");

        match row {
            Some(row) => Ok(Some(Edge::try_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use chrono::{TimeZone, Utc};
    use guardian_core_api::{EdgePatch, PreferenceChannel, Preferences};
    use guardian_core_db::repository::{EdgeRepository, EdgeSession, RepositoryError};
    use serial_test::serial;
    use uuid::Uuid;
    use super::super::test_utils::test_utils::{create_test_guardian, create_test_student, new_test_edge};

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn test_update_edge() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let session = ctx.session();
        let guardian_id = create_test_guardian(session).await?;
        let student_id = create_test_student(session).await?;
        session.edges().create(new_test_edge(guardian_id, student_id, false)).await?;

        let prefs = Preferences::default().with(PreferenceChannel::Calls, true);
        let updated = session
            .edges()
            .update(guardian_id, student_id, &EdgePatch::preferences(prefs), Utc::now())
            .await?
            .unwrap();
        assert_eq!(updated.preferences, prefs);
        assert!(!updated.is_primary);

        let stamp = Utc.with_ymd_and_hms(2031, 3, 4, 5, 6, 7).unwrap();

        let updated = session
            .edges()
            .update(guardian_id, student_id, &EdgePatch::primary(true), stamp)
            .await?
            .unwrap();
        assert!(updated.is_primary);
        assert_eq!(updated.updated_at, stamp);
        assert_eq!(updated.preferences, prefs);

        let missing = session
            .edges()
            .update(Uuid::new_v4(), student_id, &EdgePatch::primary(true), Utc::now())
            .await?;
        assert!(missing.is_none());
        Ok(())
    }

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn test_promote_without_demote_is_conflict() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let session = ctx.session();
        let student_id = create_test_student(session).await?;
        let first = create_test_guardian(session).await?;
        let second = create_test_guardian(session).await?;
        session.edges().create(new_test_edge(first, student_id, true)).await?;
        session.edges().create(new_test_edge(second, student_id, false)).await?;

        let err = session
            .edges()
            .update(second, student_id, &EdgePatch::primary(true), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        Ok(())
    }
}
