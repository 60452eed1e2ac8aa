//! Expense workflow service
//!
//! Lists, creates and marks expenses paid through an `ExpenseApi`. Batch
//! operations (recurring create, pay-by-filter) run item by item: a failed
//! item is recorded and the batch continues, except on authentication
//! failures which stop it. Nothing is rolled back.

use chrono::NaiveDate;

use crate::api::{ExpenseApi, MAX_PER_PAGE, MIN_PER_PAGE};
use crate::error::{FicError, FicResult};
use crate::models::{
    Expense, ExpenseDraft, ExpenseId, ExpenseInput, ExpenseSummary, PaymentAccount,
    PaymentAccountId, QuotaInfo,
};
use crate::services::filter::{ExpenseFilter, StatusFilter};
use crate::services::schedule;

/// Which installments of an expense to mark paid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallmentSelector {
    /// Every installment not yet paid
    AllUnpaid,
    /// A single installment by 1-based position
    Index(u32),
}

impl InstallmentSelector {
    pub fn from_option(index: Option<u32>) -> Self {
        index.map_or(Self::AllUnpaid, Self::Index)
    }
}

/// One failed item of a batch
#[derive(Debug)]
pub struct BatchFailure {
    /// Human-readable item label ("expense #12", "occurrence 3 (2026-03-15)")
    pub item: String,
    pub error: FicError,
}

/// Outcome of a sequential batch
#[derive(Debug)]
pub struct BatchReport<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<BatchFailure>,
    /// Items never attempted because an authentication failure stopped the batch
    pub skipped: usize,
}

impl<T> BatchReport<T> {
    fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
            skipped: 0,
        }
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.skipped == 0
    }

    pub fn is_partial(&self) -> bool {
        !self.succeeded.is_empty() && !self.is_complete_success()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.skipped
    }
}

/// An expense created as part of `create`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedExpense {
    pub id: ExpenseId,
    pub date: NaiveDate,
}

/// Result of marking one expense paid
#[derive(Debug, Clone)]
pub struct PaidExpense {
    pub expense: Expense,
    /// Number of installments switched to paid
    pub marked: usize,
}

/// Service for expense workflows
pub struct ExpenseService<'a> {
    api: &'a dyn ExpenseApi,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(api: &'a dyn ExpenseApi) -> Self {
        Self { api }
    }

    /// Quota reported by the most recent API response
    pub fn quota(&self) -> Option<QuotaInfo> {
        self.api.last_quota()
    }

    /// List expenses matching `filter`, newest first
    pub fn list(&self, filter: &ExpenseFilter) -> FicResult<Vec<ExpenseSummary>> {
        let query = filter.to_query();
        let query = query.as_deref();

        // Without local filtering one page of exactly `limit` rows is enough
        if let Some(limit) = filter.limit {
            if limit <= MAX_PER_PAGE as usize && !filter.filters_locally() {
                let per_page = (limit as u32).max(MIN_PER_PAGE);
                let mut rows: Vec<ExpenseSummary> = self
                    .api
                    .list_expenses(query, 1, per_page)?
                    .into_iter()
                    .filter(|e| filter.matches(e))
                    .collect();
                rows.truncate(limit);
                return Ok(rows);
            }
        }

        let mut collected = Vec::new();
        let mut page = 1;
        loop {
            let rows = self.api.list_expenses(query, page, MAX_PER_PAGE)?;
            let fetched = rows.len();
            collected.extend(rows.into_iter().filter(|e| filter.matches(e)));

            if let Some(limit) = filter.limit {
                if collected.len() >= limit {
                    collected.truncate(limit);
                    break;
                }
            }
            if fetched < MAX_PER_PAGE as usize {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = collected.len(), pages = page, "listed expenses");
        Ok(collected)
    }

    /// Full record of a single expense
    pub fn show(&self, id: ExpenseId) -> FicResult<Expense> {
        self.api.get_expense(id)
    }

    pub fn payment_accounts(&self) -> FicResult<Vec<PaymentAccount>> {
        self.api.list_payment_accounts()
    }

    /// Every draft `create` would send, in order. Validates the input and
    /// computes all schedules without contacting the API.
    pub fn plan(&self, input: &ExpenseInput) -> FicResult<Vec<ExpenseDraft>> {
        plan_instances(input)
    }

    /// Create the expense (and its recurrences)
    pub fn create(&self, input: &ExpenseInput) -> FicResult<BatchReport<CreatedExpense>> {
        let drafts = plan_instances(input)?;
        let mut report = BatchReport::new();
        let total = drafts.len();

        for (k, draft) in drafts.iter().enumerate() {
            match self.api.create_expense(draft) {
                Ok(id) => {
                    tracing::info!(id, date = %draft.date, "created expense");
                    report.succeeded.push(CreatedExpense {
                        id,
                        date: draft.date,
                    });
                }
                Err(error) => {
                    tracing::warn!(occurrence = k + 1, %error, "create failed");
                    let fatal = error.is_auth();
                    report.failed.push(BatchFailure {
                        item: format!("occurrence {} ({})", k + 1, draft.date),
                        error,
                    });
                    if fatal {
                        report.skipped = total - k - 1;
                        break;
                    }
                }
            }
        }

        Ok(report)
    }

    /// Mark installments of one expense paid.
    ///
    /// Without `paid_date` each installment is paid on its own due date. A
    /// missing payment account is rejected before any API call.
    pub fn mark_paid(
        &self,
        id: ExpenseId,
        selector: InstallmentSelector,
        paid_date: Option<NaiveDate>,
        account: Option<PaymentAccountId>,
    ) -> FicResult<PaidExpense> {
        let account = require_account(account)?;
        if selector == InstallmentSelector::Index(0) {
            return Err(FicError::Validation(
                "Installment numbers start at 1".to_string(),
            ));
        }
        self.mark_paid_with_account(id, selector, paid_date, account)
    }

    fn mark_paid_with_account(
        &self,
        id: ExpenseId,
        selector: InstallmentSelector,
        paid_date: Option<NaiveDate>,
        account: PaymentAccountId,
    ) -> FicResult<PaidExpense> {
        let mut expense = self.api.get_expense(id)?;
        let marked = apply_payment(&mut expense, selector, paid_date, account)?;

        if marked == 0 {
            tracing::info!(id, "nothing left to pay");
            return Ok(PaidExpense { expense, marked });
        }

        self.api
            .update_expense_payments(id, &expense.installments)?;
        tracing::info!(id, marked, "marked installments paid");
        Ok(PaidExpense { expense, marked })
    }

    /// Unpaid expenses matching a supplier or date filter
    pub fn unpaid_matching(&self, filter: &ExpenseFilter) -> FicResult<Vec<ExpenseSummary>> {
        if !filter.has_criteria() {
            return Err(FicError::Validation(
                "Batch payment needs a supplier or a date range".to_string(),
            ));
        }
        let filter = filter
            .clone()
            .with_status(StatusFilter::Unpaid)
            .with_limit(None);
        self.list(&filter)
    }

    /// Mark every unpaid installment of each expense paid, one at a time
    pub fn pay_many(
        &self,
        ids: &[ExpenseId],
        paid_date: Option<NaiveDate>,
        account: Option<PaymentAccountId>,
    ) -> FicResult<BatchReport<PaidExpense>> {
        let account = require_account(account)?;
        let mut report = BatchReport::new();

        for (n, id) in ids.iter().enumerate() {
            match self.mark_paid_with_account(*id, InstallmentSelector::AllUnpaid, paid_date, account)
            {
                Ok(paid) => report.succeeded.push(paid),
                Err(error) => {
                    tracing::warn!(id, %error, "payment failed");
                    let fatal = error.is_auth();
                    report.failed.push(BatchFailure {
                        item: format!("expense #{}", id),
                        error,
                    });
                    if fatal {
                        report.skipped = ids.len() - n - 1;
                        break;
                    }
                }
            }
        }

        Ok(report)
    }

    /// Pay everything unpaid that matches `filter`
    pub fn pay_batch(
        &self,
        filter: &ExpenseFilter,
        paid_date: Option<NaiveDate>,
        account: Option<PaymentAccountId>,
    ) -> FicResult<BatchReport<PaidExpense>> {
        require_account(account)?;
        let ids: Vec<ExpenseId> = self.unpaid_matching(filter)?.iter().map(|e| e.id).collect();
        self.pay_many(&ids, paid_date, account)
    }
}

/// The payment account to record, or a configuration error when none is set
pub fn require_account(account: Option<PaymentAccountId>) -> FicResult<PaymentAccountId> {
    account.ok_or_else(|| {
        FicError::Config(
            "No payment account configured. Run 'fic-expenses configs' to pick a default account"
                .to_string(),
        )
    })
}

/// Switch the selected installments to paid; returns how many changed
fn apply_payment(
    expense: &mut Expense,
    selector: InstallmentSelector,
    paid_date: Option<NaiveDate>,
    account: PaymentAccountId,
) -> FicResult<usize> {
    if expense.installments.is_empty() {
        return Err(FicError::Validation(format!(
            "Expense {} has no payment schedule",
            expense.id
        )));
    }

    let expense_id = expense.id;
    match selector {
        InstallmentSelector::Index(index) => {
            let count = expense.installments.len();
            let installment = index
                .checked_sub(1)
                .and_then(|i| expense.installments.get_mut(i as usize))
                .ok_or_else(|| {
                    FicError::Validation(format!(
                        "Installment {} does not exist (expense {} has {})",
                        index, expense_id, count
                    ))
                })?;
            let date = paid_date.unwrap_or(installment.due_date);
            installment.mark_paid(date, account);
            Ok(1)
        }
        InstallmentSelector::AllUnpaid => {
            let mut marked = 0;
            for installment in expense.installments.iter_mut().filter(|i| !i.paid) {
                let date = paid_date.unwrap_or(installment.due_date);
                installment.mark_paid(date, account);
                marked += 1;
            }
            Ok(marked)
        }
    }
}

/// Expand an input into one draft per recurrence instance.
///
/// Occurrence 0 gets the base schedule; occurrence k shifts the expense date
/// and every due date of occurrence 0 by k periods.
pub fn plan_instances(input: &ExpenseInput) -> FicResult<Vec<ExpenseDraft>> {
    input.validate()?;

    let first_due = input.effective_first_due()?;
    let base = schedule::build_installments(
        input.amount_gross()?,
        first_due,
        input.installments,
        input.installment_period,
    )?;

    let (period, occurrences) = match input.recurrence {
        Some(period) => (period, input.occurrences),
        None => (input.installment_period, 1),
    };
    let dates = schedule::generate_recurrence_dates(input.expense_date, occurrences, period)?;

    dates
        .into_iter()
        .enumerate()
        .map(|(k, date)| {
            let installments = base
                .iter()
                .map(|i| {
                    let mut shifted = i.clone();
                    shifted.due_date = schedule::shift_date(i.due_date, period, k as u32)?;
                    Ok(shifted)
                })
                .collect::<FicResult<Vec<_>>>()?;

            Ok(ExpenseDraft {
                date,
                supplier: input.supplier.trim().to_string(),
                description: input.description.clone(),
                category: input.category.clone(),
                amount_net: input.amount_net,
                amount_vat: input.amount_vat(),
                installments,
            })
        })
        .collect()
}
