//! In-memory unit of work for service tests.
//!
//! Sessions take the store mutex for their whole lifetime, so sessions are
//! serialized like Postgres sessions holding the same advisory lock. Commit
//! re-checks the edge invariants the way the deferred constraint trigger does,
//! and creating a second primary fails like the partial unique index.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guardian_core_api::{
    ActorContext, AuditEvent, AuditSink, CommunicationFilter, Edge, EdgePatch,
};
use guardian_core_db::models::{CommunicationLogModel, PaymentModel, StudentFeeModel, TermModel};
use guardian_core_db::repository::{
    CommunicationLogRepository, EdgeRepository, EdgeSession, ExistByIds, FeeRepository,
    PaymentRepository, RepositoryError, RepositoryResult, TermRepository, UnitOfWork,
};
use sqlx::Postgres;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::aggregation_engine::AggregationSources;
use crate::clock::{Clock, SystemClock};
use crate::config::ServiceConfig;
use crate::GuardianCoreServices;

#[derive(Debug, Default)]
pub struct MemoryState {
    pub edges: Vec<Edge>,
    pub guardians: HashSet<Uuid>,
    pub students: HashSet<Uuid>,
}

#[derive(Default)]
pub struct MemoryUnitOfWork {
    state: Arc<AsyncMutex<MemoryState>>,
    pending_conflicts: Arc<AtomicU32>,
    commits: Arc<AtomicU32>,
}

impl MemoryUnitOfWork {
    pub async fn add_guardian(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().await.guardians.insert(id);
        id
    }

    pub async fn add_student(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().await.students.insert(id);
        id
    }

    /// Committed edges of one student.
    pub async fn student_edges(&self, student_id: Uuid) -> Vec<Edge> {
        self.state
            .lock()
            .await
            .edges
            .iter()
            .filter(|edge| edge.student_id == student_id)
            .cloned()
            .collect()
    }

    /// Make the next `count` calls to `lock_student` fail with a conflict.
    pub fn inject_conflicts(&self, count: u32) {
        self.pending_conflicts.store(count, Ordering::SeqCst);
    }

    pub fn commits(&self) -> u32 {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UnitOfWork<Postgres> for MemoryUnitOfWork {
    type Session = MemorySession;

    async fn begin(&self) -> RepositoryResult<MemorySession> {
        let guard = self.state.clone().lock_owned().await;
        let edges = MemoryEdges(Mutex::new(guard.edges.clone()));
        let guardians = MemoryDirectory(guard.guardians.clone());
        let students = MemoryDirectory(guard.students.clone());
        Ok(MemorySession {
            guard,
            edges,
            guardians,
            students,
            pending_conflicts: self.pending_conflicts.clone(),
            commits: self.commits.clone(),
        })
    }
}

pub struct MemorySession {
    guard: OwnedMutexGuard<MemoryState>,
    edges: MemoryEdges,
    guardians: MemoryDirectory,
    students: MemoryDirectory,
    pending_conflicts: Arc<AtomicU32>,
    commits: Arc<AtomicU32>,
}

/// Students whose committed edges would break the edge-set invariants.
fn broken_students(before: &[Edge], after: &[Edge]) -> Vec<Uuid> {
    let mut primaries: HashMap<Uuid, usize> = HashMap::new();
    for edge in after {
        let count = primaries.entry(edge.student_id).or_insert(0);
        if edge.is_primary {
            *count += 1;
        }
    }
    let mut broken: Vec<Uuid> = primaries
        .iter()
        .filter(|(_, count)| **count != 1)
        .map(|(student_id, _)| *student_id)
        .collect();
    for edge in before {
        if !primaries.contains_key(&edge.student_id) && !broken.contains(&edge.student_id) {
            broken.push(edge.student_id);
        }
    }
    broken
}

#[async_trait]
impl EdgeSession<Postgres> for MemorySession {
    type Edges = MemoryEdges;
    type Guardians = MemoryDirectory;
    type Students = MemoryDirectory;

    fn edges(&self) -> &MemoryEdges {
        &self.edges
    }

    fn guardians(&self) -> &MemoryDirectory {
        &self.guardians
    }

    fn students(&self) -> &MemoryDirectory {
        &self.students
    }

    async fn lock_student(&self, student_id: Uuid) -> RepositoryResult<()> {
        let injected = self
            .pending_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match injected {
            Ok(_) => Err(RepositoryError::Conflict(format!(
                "injected conflict on student {student_id}"
            ))),
            Err(_) => Ok(()),
        }
    }

    async fn commit(self) -> RepositoryResult<()> {
        let MemorySession {
            mut guard,
            edges,
            commits,
            ..
        } = self;
        let edges = edges.0.into_inner().map_err(|_| RepositoryError::TransactionConsumed)?;

        let broken = broken_students(&guard.edges, &edges);
        if !broken.is_empty() {
            return Err(RepositoryError::Conflict(format!(
                "edge invariants violated for students {broken:?}"
            )));
        }

        guard.edges = edges;
        commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self) -> RepositoryResult<()> {
        Ok(())
    }
}

/// Working copy of the edge table for one session.
pub struct MemoryEdges(Mutex<Vec<Edge>>);

impl MemoryEdges {
    fn with_edges<T>(&self, f: impl FnOnce(&mut Vec<Edge>) -> RepositoryResult<T>) -> RepositoryResult<T> {
        let mut edges = self.0.lock().map_err(|_| RepositoryError::TransactionConsumed)?;
        f(&mut edges)
    }
}

fn second_primary(edges: &[Edge], candidate: &Edge) -> bool {
    candidate.is_primary
        && edges.iter().any(|edge| {
            edge.student_id == candidate.student_id
                && edge.guardian_id != candidate.guardian_id
                && edge.is_primary
        })
}

#[async_trait]
impl EdgeRepository<Postgres> for MemoryEdges {
    async fn create(&self, edge: Edge) -> RepositoryResult<Edge> {
        self.with_edges(|edges| {
            if edges.iter().any(|existing| existing.key() == edge.key()) {
                return Err(RepositoryError::DuplicateEdge {
                    guardian_id: edge.guardian_id,
                    student_id: edge.student_id,
                });
            }
            if second_primary(edges, &edge) {
                return Err(RepositoryError::Conflict("one primary per student".to_string()));
            }
            edges.push(edge.clone());
            Ok(edge)
        })
    }

    async fn find(&self, guardian_id: Uuid, student_id: Uuid) -> RepositoryResult<Option<Edge>> {
        self.with_edges(|edges| {
            Ok(edges
                .iter()
                .find(|edge| edge.key() == (guardian_id, student_id))
                .cloned())
        })
    }

    async fn delete(&self, guardian_id: Uuid, student_id: Uuid) -> RepositoryResult<bool> {
        self.with_edges(|edges| {
            let before = edges.len();
            edges.retain(|edge| edge.key() != (guardian_id, student_id));
            Ok(edges.len() < before)
        })
    }

    async fn update(
        &self,
        guardian_id: Uuid,
        student_id: Uuid,
        patch: &EdgePatch,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Option<Edge>> {
        self.with_edges(|edges| {
            let Some(position) = edges
                .iter()
                .position(|edge| edge.key() == (guardian_id, student_id))
            else {
                return Ok(None);
            };
            let mut updated = edges[position].clone();
            patch.apply(&mut updated, now);
            if second_primary(edges, &updated) {
                return Err(RepositoryError::Conflict("one primary per student".to_string()));
            }
            edges[position] = updated.clone();
            Ok(Some(updated))
        })
    }

    async fn list_by_student(&self, student_id: Uuid) -> RepositoryResult<Vec<Edge>> {
        self.with_edges(|edges| {
            let mut found: Vec<Edge> = edges
                .iter()
                .filter(|edge| edge.student_id == student_id)
                .cloned()
                .collect();
            found.sort_by_key(|edge| (edge.created_at, edge.guardian_id));
            Ok(found)
        })
    }

    async fn list_by_guardian(&self, guardian_id: Uuid) -> RepositoryResult<Vec<Edge>> {
        self.with_edges(|edges| {
            let mut found: Vec<Edge> = edges
                .iter()
                .filter(|edge| edge.guardian_id == guardian_id)
                .cloned()
                .collect();
            found.sort_by_key(|edge| (edge.created_at, edge.student_id));
            Ok(found)
        })
    }
}

pub struct MemoryDirectory(HashSet<Uuid>);

#[async_trait]
impl ExistByIds<Postgres> for MemoryDirectory {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, bool)>, Box<dyn Error + Send + Sync>> {
        Ok(ids.iter().map(|id| (*id, self.0.contains(id))).collect())
    }
}

/// Payments, fees, terms and communication logs for aggregation tests.
#[derive(Default)]
pub struct MemoryLedger {
    pub payments: Mutex<Vec<PaymentModel>>,
    pub fees: Mutex<Vec<StudentFeeModel>>,
    pub terms: Mutex<Vec<TermModel>>,
    pub communication_logs: Mutex<Vec<CommunicationLogModel>>,
}

fn poisoned<T>(_: T) -> Box<dyn Error + Send + Sync> {
    "memory ledger lock poisoned".into()
}

#[async_trait]
impl PaymentRepository<Postgres> for MemoryLedger {
    async fn find_by_student_ids(
        &self,
        student_ids: &[Uuid],
    ) -> Result<Vec<PaymentModel>, Box<dyn Error + Send + Sync>> {
        let payments = self.payments.lock().map_err(poisoned)?;
        Ok(payments
            .iter()
            .filter(|payment| student_ids.contains(&payment.student_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FeeRepository<Postgres> for MemoryLedger {
    async fn find_by_student_ids(
        &self,
        student_ids: &[Uuid],
        term_id: Option<Uuid>,
    ) -> Result<Vec<StudentFeeModel>, Box<dyn Error + Send + Sync>> {
        let fees = self.fees.lock().map_err(poisoned)?;
        Ok(fees
            .iter()
            .filter(|fee| student_ids.contains(&fee.student_id))
            .filter(|fee| fee.term_id.is_none() || fee.term_id == term_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TermRepository<Postgres> for MemoryLedger {
    async fn find_containing(
        &self,
        date: chrono::NaiveDate,
    ) -> Result<Option<TermModel>, Box<dyn Error + Send + Sync>> {
        let terms = self.terms.lock().map_err(poisoned)?;
        Ok(terms
            .iter()
            .filter(|term| term.contains(date))
            .max_by_key(|term| term.start_date)
            .cloned())
    }

    async fn find_latest(&self) -> Result<Option<TermModel>, Box<dyn Error + Send + Sync>> {
        let terms = self.terms.lock().map_err(poisoned)?;
        Ok(terms.iter().max_by_key(|term| term.start_date).cloned())
    }
}

#[async_trait]
impl CommunicationLogRepository<Postgres> for MemoryLedger {
    async fn find_by_guardian_id(
        &self,
        guardian_id: Uuid,
        filter: &CommunicationFilter,
    ) -> Result<Vec<CommunicationLogModel>, Box<dyn Error + Send + Sync>> {
        let logs = self.communication_logs.lock().map_err(poisoned)?;
        Ok(logs
            .iter()
            .filter(|log| log.guardian_id == guardian_id)
            .filter(|log| filter.matches(log.student_id, log.communication_type, log.sent_at))
            .cloned()
            .collect())
    }
}

/// Audit sink that keeps every event, or rejects every event when `failing`.
#[derive(Default)]
pub struct RecordingAuditSink {
    pub events: Mutex<Vec<AuditEvent>>,
    pub failing: bool,
}

impl RecordingAuditSink {
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn record(&self, event: AuditEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.failing {
            return Err("audit store unavailable".into());
        }
        self.events.lock().map_err(poisoned)?.push(event);
        Ok(())
    }
}

pub struct TestContext {
    pub store: Arc<MemoryUnitOfWork>,
    pub ledger: Arc<MemoryLedger>,
    pub audit: Arc<RecordingAuditSink>,
    pub services: GuardianCoreServices<Postgres, MemoryUnitOfWork>,
    pub actor: ActorContext,
}

pub fn setup_test_context() -> TestContext {
    setup_test_context_with(Arc::new(SystemClock), Arc::new(RecordingAuditSink::default()))
}

pub fn setup_test_context_with(clock: Arc<dyn Clock>, audit: Arc<RecordingAuditSink>) -> TestContext {
    let store = Arc::new(MemoryUnitOfWork::default());
    let ledger = Arc::new(MemoryLedger::default());
    let sources = AggregationSources {
        payments: ledger.clone(),
        fees: ledger.clone(),
        terms: ledger.clone(),
        communication_logs: ledger.clone(),
    };
    let config = ServiceConfig {
        retry_backoff_ms: 1,
        ..ServiceConfig::default()
    };
    let services = GuardianCoreServices::new(store.clone(), sources, audit.clone(), clock, config);
    TestContext {
        store,
        ledger,
        audit,
        services,
        actor: ActorContext::new(Uuid::new_v4()),
    }
}
