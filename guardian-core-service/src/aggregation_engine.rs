use async_trait::async_trait;
use guardian_core_api::{
    AggregationService, CommunicationFilter, CommunicationStats, FinancialSummary,
    RelationshipError, RelationshipResult, StudentBalance,
};
use guardian_core_db::models::{PaymentModel, StudentFeeModel, TermModel};
use guardian_core_db::repository::{
    CommunicationLogRepository, EdgeRepository, EdgeSession, FeeRepository, PaymentRepository,
    RepositoryError, TermRepository, UnitOfWork,
};
use rust_decimal::Decimal;
use sqlx::Database;
use std::collections::{BTreeSet, HashMap};
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::SummaryCache;
use crate::clock::Clock;

fn backend(err: Box<dyn std::error::Error + Send + Sync>) -> RelationshipError {
    RepositoryError::Backend(err).into()
}

/// Read-only collaborator data the aggregates are computed from.
pub struct AggregationSources<DB: Database> {
    pub payments: Arc<dyn PaymentRepository<DB>>,
    pub fees: Arc<dyn FeeRepository<DB>>,
    pub terms: Arc<dyn TermRepository<DB>>,
    pub communication_logs: Arc<dyn CommunicationLogRepository<DB>>,
}

impl<DB: Database> Clone for AggregationSources<DB> {
    fn clone(&self) -> Self {
        Self {
            payments: self.payments.clone(),
            fees: self.fees.clone(),
            terms: self.terms.clone(),
            communication_logs: self.communication_logs.clone(),
        }
    }
}

pub struct AggregationEngine<DB: Database, U: UnitOfWork<DB>> {
    unit_of_work: Arc<U>,
    sources: AggregationSources<DB>,
    clock: Arc<dyn Clock>,
    cache: Option<Arc<SummaryCache>>,
    _db: PhantomData<fn() -> DB>,
}

impl<DB: Database, U: UnitOfWork<DB>> AggregationEngine<DB, U> {
    pub fn new(unit_of_work: Arc<U>, sources: AggregationSources<DB>, clock: Arc<dyn Clock>) -> Self {
        Self {
            unit_of_work,
            sources,
            clock,
            cache: None,
            _db: PhantomData,
        }
    }

    pub fn with_cache(mut self, cache: Arc<SummaryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Term containing today, else the most recently started one.
    async fn current_term(&self) -> RelationshipResult<Option<TermModel>> {
        let today = self.clock.today();
        if let Some(term) = self.sources.terms.find_containing(today).await.map_err(backend)? {
            return Ok(Some(term));
        }
        self.sources.terms.find_latest().await.map_err(backend)
    }

    async fn linked_students(&self, guardian_id: Uuid) -> RelationshipResult<Vec<Uuid>> {
        let session = self.unit_of_work.begin().await?;
        let edges = session.edges().list_by_guardian(guardian_id).await;
        if let Err(err) = session.rollback().await {
            tracing::warn!(error = %err, "failed to close read session");
        }
        Ok(edges?.into_iter().map(|edge| edge.student_id).collect())
    }

    async fn compute_summary(&self, guardian_id: Uuid) -> RelationshipResult<FinancialSummary> {
        let student_ids = self.linked_students(guardian_id).await?;
        let term = self.current_term().await?;
        let term_id = term.as_ref().map(|term| term.id);
        let mut summary = FinancialSummary::empty(guardian_id, term.map(|term| term.name));

        if student_ids.is_empty() {
            return Ok(summary);
        }

        let fees = self
            .sources
            .fees
            .find_by_student_ids(&student_ids, term_id)
            .await
            .map_err(backend)?;
        let payments = self
            .sources
            .payments
            .find_by_student_ids(&student_ids)
            .await
            .map_err(backend)?;

        let fees = resolve_fees(fees, term_id);
        let mut paid = sum_payments(payments);

        for student_id in student_ids {
            let fee_amount = fees.get(&student_id).copied().unwrap_or(Decimal::ZERO);
            let (amount_paid, last_payment_date) = paid.remove(&student_id).unwrap_or((Decimal::ZERO, None));
            summary.push(StudentBalance {
                student_id,
                fee_amount,
                amount_paid,
                balance: fee_amount - amount_paid,
                last_payment_date,
            });
        }
        Ok(summary)
    }
}

/// Expected fee per student: term rows when present, else default rows.
///
/// Several rows of the same kind add up (tuition plus transport, say).
fn resolve_fees(fees: Vec<StudentFeeModel>, term_id: Option<Uuid>) -> HashMap<Uuid, Decimal> {
    let mut term_fees: HashMap<Uuid, Decimal> = HashMap::new();
    let mut default_fees: HashMap<Uuid, Decimal> = HashMap::new();
    for fee in fees {
        match fee.term_id {
            None => *default_fees.entry(fee.student_id).or_default() += fee.amount,
            Some(id) if Some(id) == term_id => *term_fees.entry(fee.student_id).or_default() += fee.amount,
            Some(_) => {}
        }
    }
    for (student_id, amount) in term_fees {
        default_fees.insert(student_id, amount);
    }
    default_fees
}

fn sum_payments(
    payments: Vec<PaymentModel>,
) -> HashMap<Uuid, (Decimal, Option<chrono::NaiveDate>)> {
    let mut paid: HashMap<Uuid, (Decimal, Option<chrono::NaiveDate>)> = HashMap::new();
    for payment in payments {
        let entry = paid.entry(payment.student_id).or_insert((Decimal::ZERO, None));
        entry.0 += payment.amount;
        entry.1 = entry.1.max(Some(payment.payment_date));
    }
    paid
}

#[async_trait]
impl<DB: Database, U: UnitOfWork<DB> + 'static> AggregationService for AggregationEngine<DB, U> {
    #[tracing::instrument(skip(self))]
    async fn financial_summary(&self, guardian_id: Uuid) -> RelationshipResult<FinancialSummary> {
        let epoch = match &self.cache {
            Some(cache) => {
                if let Some(summary) = cache.get(&guardian_id).await {
                    tracing::debug!(%guardian_id, "financial summary served from cache");
                    return Ok(summary);
                }
                Some(cache.epoch())
            }
            None => None,
        };

        let summary = self.compute_summary(guardian_id).await?;
        tracing::debug!(
            %guardian_id,
            students = summary.students.len(),
            total_balance = %summary.total_balance,
            "financial summary computed"
        );

        if let (Some(cache), Some(epoch)) = (&self.cache, epoch) {
            cache.insert_if_current(epoch, summary.clone()).await;
        }
        Ok(summary)
    }

    #[tracing::instrument(skip(self))]
    async fn communication_stats(
        &self,
        guardian_id: Uuid,
        filter: CommunicationFilter,
    ) -> RelationshipResult<CommunicationStats> {
        let logs = self
            .sources
            .communication_logs
            .find_by_guardian_id(guardian_id, &filter)
            .await
            .map_err(backend)?;

        let mut stats = CommunicationStats::empty(guardian_id);
        let mut seen = BTreeSet::new();
        for log in logs
            .into_iter()
            .filter(|log| filter.matches(log.student_id, log.communication_type, log.sent_at))
        {
            if seen.insert(log.id) {
                stats.record(log.communication_type, log.sent_at);
            }
        }
        Ok(stats)
    }
}
