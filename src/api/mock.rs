//! In-memory `ExpenseApi` used by service and TUI tests

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use super::ExpenseApi;
use crate::error::{FicError, FicResult};
use crate::models::{
    Expense, ExpenseDraft, ExpenseId, ExpenseSummary, Installment, PaymentAccount, QuotaInfo,
};

/// Records every call and serves expenses from a map
#[derive(Default)]
pub struct MockApi {
    pub expenses: RefCell<BTreeMap<ExpenseId, Expense>>,
    pub accounts: Vec<PaymentAccount>,
    pub created: RefCell<Vec<ExpenseDraft>>,
    pub updates: RefCell<Vec<(ExpenseId, Vec<Installment>)>>,
    pub list_calls: RefCell<Vec<(Option<String>, u32, u32)>>,
    /// Calls (1-based) to `create_expense` that fail, with the error to raise
    pub failing_creates: RefCell<BTreeMap<usize, fn() -> FicError>>,
    /// Expense ids whose update fails
    pub failing_updates: RefCell<BTreeMap<ExpenseId, fn() -> FicError>>,
    next_id: Cell<ExpenseId>,
}

impl MockApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.next_id.set(1000);
        api
    }

    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        let api = Self::new();
        api.expenses
            .borrow_mut()
            .extend(expenses.into_iter().map(|e| (e.id, e)));
        api
    }

    pub fn fail_create(&self, call: usize, err: fn() -> FicError) {
        self.failing_creates.borrow_mut().insert(call, err);
    }

    pub fn fail_update(&self, id: ExpenseId, err: fn() -> FicError) {
        self.failing_updates.borrow_mut().insert(id, err);
    }

    pub fn call_count(&self) -> usize {
        self.created.borrow().len() + self.updates.borrow().len() + self.list_calls.borrow().len()
    }

    fn sorted_summaries(&self) -> Vec<ExpenseSummary> {
        let mut rows: Vec<ExpenseSummary> =
            self.expenses.borrow().values().map(Expense::summary).collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        rows
    }
}

impl ExpenseApi for MockApi {
    fn list_expenses(
        &self,
        query: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> FicResult<Vec<ExpenseSummary>> {
        self.list_calls
            .borrow_mut()
            .push((query.map(str::to_string), page, per_page));
        let start = ((page.max(1) - 1) * per_page) as usize;
        Ok(self
            .sorted_summaries()
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect())
    }

    fn get_expense(&self, id: ExpenseId) -> FicResult<Expense> {
        self.expenses
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| FicError::expense_not_found(id.to_string()))
    }

    fn create_expense(&self, draft: &ExpenseDraft) -> FicResult<ExpenseId> {
        self.created.borrow_mut().push(draft.clone());
        let call = self.created.borrow().len();
        if let Some(err) = self.failing_creates.borrow().get(&call) {
            return Err(err());
        }

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.expenses.borrow_mut().insert(
            id,
            Expense {
                id,
                date: draft.date,
                supplier: draft.supplier.clone(),
                description: draft.description.clone(),
                category: draft.category.clone(),
                amount_net: draft.amount_net,
                amount_vat: draft.amount_vat,
                amount_gross: draft.amount_gross(),
                installments: draft.installments.clone(),
            },
        );
        Ok(id)
    }

    fn update_expense_payments(
        &self,
        id: ExpenseId,
        installments: &[Installment],
    ) -> FicResult<()> {
        self.updates.borrow_mut().push((id, installments.to_vec()));
        if let Some(err) = self.failing_updates.borrow().get(&id) {
            return Err(err());
        }
        let mut expenses = self.expenses.borrow_mut();
        let expense = expenses
            .get_mut(&id)
            .ok_or_else(|| FicError::expense_not_found(id.to_string()))?;
        expense.installments = installments.to_vec();
        Ok(())
    }

    fn list_payment_accounts(&self) -> FicResult<Vec<PaymentAccount>> {
        Ok(self.accounts.clone())
    }

    fn last_quota(&self) -> Option<QuotaInfo> {
        None
    }
}
