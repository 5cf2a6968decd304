use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guardian_core_api::{
    relationship_type, AuditAction, Edge, EdgePatch, EdgeSpec, InvariantKind, Preferences,
    RelationshipError, RelationshipResult, RelationshipType, DEFAULT_RELATIONSHIP_TYPE,
};
use guardian_core_db::repository::{EdgeRepository, EdgeSession};
use sqlx::Database;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;
use validator::Validate;

use super::checks::{demote_primaries, ensure_guardians_exist, ensure_student_exists};
use super::mutation::{Applied, Mutation};

/// Validated target entry with the primary flag already repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEdge {
    pub guardian_id: Uuid,
    pub is_primary: bool,
    pub relationship_type: Option<RelationshipType>,
    pub preferences: Option<Preferences>,
}

pub struct SyncGuardians {
    pub student_id: Uuid,
    pub targets: Vec<TargetEdge>,
}

impl SyncGuardians {
    /// Validates `specs` and applies the primary repair rules.
    ///
    /// Rejects an empty list and a guardian listed twice. With no requested primary
    /// the first entry becomes primary; with several, only the first requested one stays.
    pub fn prepare(student_id: Uuid, specs: Vec<EdgeSpec>) -> RelationshipResult<Self> {
        if specs.is_empty() {
            return Err(RelationshipError::InvariantViolation(
                InvariantKind::MinOneGuardianRequired,
            ));
        }

        let mut seen = HashSet::with_capacity(specs.len());
        for spec in &specs {
            spec.validate()?;
            if !seen.insert(spec.guardian_id) {
                return Err(RelationshipError::InvariantViolation(InvariantKind::DuplicateEdge));
            }
        }

        let primary_index = specs.iter().position(|spec| spec.is_primary).unwrap_or(0);

        let targets = specs
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                Ok(TargetEdge {
                    guardian_id: spec.guardian_id,
                    is_primary: index == primary_index,
                    relationship_type: spec
                        .relationship_type
                        .as_deref()
                        .map(relationship_type)
                        .transpose()?,
                    preferences: spec.preferences,
                })
            })
            .collect::<RelationshipResult<Vec<_>>>()?;

        Ok(Self { student_id, targets })
    }

    fn primary_guardian_id(&self) -> Option<Uuid> {
        self.targets
            .iter()
            .find(|target| target.is_primary)
            .map(|target| target.guardian_id)
    }
}

#[async_trait]
impl<DB: Database, S: EdgeSession<DB>> Mutation<DB, S> for SyncGuardians {
    type Output = Vec<Edge>;

    fn name(&self) -> &'static str {
        "sync_guardians"
    }

    fn student_id(&self) -> Uuid {
        self.student_id
    }

    async fn apply(&self, session: &S, now: DateTime<Utc>) -> RelationshipResult<Applied<Vec<Edge>>> {
        let student_id = self.student_id;
        let target_ids: Vec<Uuid> = self.targets.iter().map(|target| target.guardian_id).collect();

        ensure_student_exists::<DB, S>(session, student_id).await?;
        ensure_guardians_exist::<DB, S>(session, &target_ids).await?;

        let current = session.edges().list_by_student(student_id).await?;
        let wanted: HashSet<Uuid> = target_ids.iter().copied().collect();

        // 1. Demote stale primaries before anything else is promoted.
        let demoted = demote_primaries::<DB, S>(session, &current, self.primary_guardian_id(), now).await?;
        let mut touched = demoted.clone();

        let mut current_by_guardian: HashMap<Uuid, Edge> = current
            .into_iter()
            .map(|mut edge| {
                if demoted.contains(&edge.guardian_id) {
                    edge.is_primary = false;
                }
                (edge.guardian_id, edge)
            })
            .collect();

        // 2. Remove edges that are no longer listed.
        let removed: Vec<Uuid> = current_by_guardian
            .keys()
            .filter(|guardian_id| !wanted.contains(guardian_id))
            .copied()
            .collect();
        for guardian_id in &removed {
            session.edges().delete(*guardian_id, student_id).await?;
            current_by_guardian.remove(guardian_id);
            touched.push(*guardian_id);
        }

        // 3. Update kept edges and insert new ones, in the caller's order.
        let mut result = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            match current_by_guardian.remove(&target.guardian_id) {
                Some(existing) => {
                    let patch = EdgePatch {
                        is_primary: Some(target.is_primary),
                        relationship_type: target.relationship_type.clone(),
                        preferences: target.preferences,
                    };
                    if patch.is_noop_for(&existing) {
                        result.push(existing);
                        continue;
                    }
                    let updated = session
                        .edges()
                        .update(target.guardian_id, student_id, &patch, now)
                        .await?
                        .ok_or_else(|| RelationshipError::not_linked(target.guardian_id, student_id))?;
                    touched.push(target.guardian_id);
                    result.push(updated);
                }
                None => {
                    let label = match &target.relationship_type {
                        Some(label) => label.clone(),
                        None => relationship_type(DEFAULT_RELATIONSHIP_TYPE)?,
                    };
                    let edge = Edge::new(
                        target.guardian_id,
                        student_id,
                        label,
                        target.is_primary,
                        target.preferences.unwrap_or_default(),
                        now,
                    );
                    result.push(session.edges().create(edge).await?);
                    touched.push(target.guardian_id);
                }
            }
        }

        tracing::debug!(
            %student_id,
            removed = removed.len(),
            guardians = result.len(),
            "guardian list replaced"
        );
        Ok(Applied::new(result, AuditAction::GuardiansSynced, touched))
    }
}
