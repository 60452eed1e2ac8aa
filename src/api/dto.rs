//! Wire types for the received-documents endpoints
//!
//! Amounts travel as JSON numbers; they are converted to `Money` here and
//! nowhere else.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FicError, FicResult};
use crate::models::{
    Expense, ExpenseDraft, ExpenseSummary, Installment, Money, PaymentAccount,
};

pub const STATUS_PAID: &str = "paid";
pub const STATUS_NOT_PAID: &str = "not_paid";

/// `{"data": ...}` wrapper used by every request and response body
#[derive(Debug, Serialize, Deserialize)]
pub struct DataBody<T> {
    pub data: T,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EntityDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRefDto {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub amount: f64,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_account: Option<AccountRefDto>,
}

/// A received document as exchanged with the API
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ReceivedDocumentDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_net: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_vat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_gross: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_deductibility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_deductibility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payments_list: Option<Vec<PaymentDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentAccountDto {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of a page of list results; `data` may be null on empty pages
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub data: Vec<T>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ReceivedDocumentDto {
    fn required_id(&self) -> FicResult<u64> {
        self.id.ok_or_else(|| FicError::Api {
            status: None,
            message: "Document without id in response".into(),
        })
    }

    fn required_date(&self) -> FicResult<NaiveDate> {
        self.date.ok_or_else(|| FicError::Api {
            status: None,
            message: format!("Document {} has no date", self.id.unwrap_or_default()),
        })
    }

    fn supplier(&self) -> String {
        self.entity
            .as_ref()
            .and_then(|e| e.name.clone())
            .unwrap_or_default()
    }

    fn amounts(&self) -> (Money, Money, Money) {
        let net = Money::from_f64(self.amount_net.unwrap_or_default());
        let vat = Money::from_f64(self.amount_vat.unwrap_or_default());
        let gross = self
            .amount_gross
            .map(Money::from_f64)
            .unwrap_or(net + vat);
        (net, vat, gross)
    }

    pub fn into_summary(self) -> FicResult<ExpenseSummary> {
        let (amount_net, amount_vat, amount_gross) = self.amounts();
        Ok(ExpenseSummary {
            id: self.required_id()?,
            date: self.required_date()?,
            supplier: self.supplier(),
            amount_net,
            amount_vat,
            amount_gross,
            next_due_date: self.next_due_date,
            description: self.description,
            category: self.category,
        })
    }

    pub fn into_expense(self) -> FicResult<Expense> {
        let (amount_net, amount_vat, amount_gross) = self.amounts();
        let id = self.required_id()?;
        let date = self.required_date()?;
        let supplier = self.supplier();

        let installments = self
            .payments_list
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, p)| Installment {
                id: p.id,
                sequence: i as u32 + 1,
                due_date: p.due_date.unwrap_or(date),
                amount: Money::from_f64(p.amount),
                paid: p.status.as_deref() == Some(STATUS_PAID),
                paid_date: p.paid_date,
                payment_account: p.payment_account.map(|a| a.id),
            })
            .collect();

        Ok(Expense {
            id,
            date,
            supplier,
            description: self.description,
            category: self.category,
            amount_net,
            amount_vat,
            amount_gross,
            installments,
        })
    }

    /// Body for creating a new expense; deductibility is always full
    pub fn from_draft(draft: &ExpenseDraft) -> Self {
        Self {
            kind: Some("expense".into()),
            entity: Some(EntityDto {
                id: None,
                name: Some(draft.supplier.clone()),
            }),
            date: Some(draft.date),
            description: draft.description.clone(),
            category: draft.category.clone(),
            amount_net: Some(draft.amount_net.to_f64()),
            amount_vat: Some(draft.amount_vat.to_f64()),
            tax_deductibility: Some(100.0),
            vat_deductibility: Some(100.0),
            payments_list: Some(payments_to_wire(&draft.installments)),
            ..Default::default()
        }
    }

    /// Body for replacing only the payment schedule
    pub fn payments_only(installments: &[Installment]) -> Self {
        Self {
            payments_list: Some(payments_to_wire(installments)),
            ..Default::default()
        }
    }
}

pub fn payments_to_wire(installments: &[Installment]) -> Vec<PaymentDto> {
    installments
        .iter()
        .map(|i| PaymentDto {
            id: i.id,
            amount: i.amount.to_f64(),
            due_date: Some(i.due_date),
            status: Some(if i.paid { STATUS_PAID } else { STATUS_NOT_PAID }.to_string()),
            paid_date: i.paid_date,
            payment_account: i.payment_account.map(|id| AccountRefDto { id, name: None }),
        })
        .collect()
}

impl From<PaymentAccountDto> for PaymentAccount {
    fn from(dto: PaymentAccountDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name.unwrap_or_else(|| format!("Account {}", dto.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_page() {
        let body = r#"{
            "current_page": 1,
            "data": [{
                "id": 12,
                "type": "expense",
                "entity": {"id": 3, "name": "ACME"},
                "date": "2024-03-05",
                "amount_net": 100.0,
                "amount_vat": 22.0,
                "amount_gross": 122.0,
                "next_due_date": "2024-04-30"
            }]
        }"#;
        let page: ListResponse<ReceivedDocumentDto> = serde_json::from_str(body).unwrap();
        let summary = page.data.into_iter().next().unwrap().into_summary().unwrap();
        assert_eq!(summary.id, 12);
        assert_eq!(summary.supplier, "ACME");
        assert_eq!(summary.amount_gross, Money::from_cents(12200));
        assert!(!summary.is_paid());
    }

    #[test]
    fn test_null_data_is_empty_page() {
        let page: ListResponse<ReceivedDocumentDto> =
            serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_parse_full_expense_with_payments() {
        let body = r#"{"data": {
            "id": 5,
            "date": "2024-01-10",
            "entity": {"name": "Globex"},
            "amount_net": 81.97,
            "amount_vat": 18.03,
            "payments_list": [
                {"id": 301, "amount": 50.0, "due_date": "2024-01-31", "status": "paid",
                 "paid_date": "2024-01-30", "payment_account": {"id": 9, "name": "Bank"}},
                {"amount": 50.0, "due_date": "2024-02-29", "status": "not_paid"}
            ]
        }}"#;
        let wrapped: DataBody<ReceivedDocumentDto> = serde_json::from_str(body).unwrap();
        let expense = wrapped.data.into_expense().unwrap();
        assert_eq!(expense.amount_gross, Money::from_cents(10000));
        assert_eq!(expense.installments.len(), 2);
        assert!(expense.installments[0].paid);
        assert_eq!(expense.installments[0].payment_account, Some(9));
        assert_eq!(expense.installments[0].id, Some(301));
        assert_eq!(expense.installments[1].id, None);
        assert_eq!(expense.installments[1].sequence, 2);
        assert!(!expense.installments[1].paid);
    }

    #[test]
    fn test_missing_id_is_api_error() {
        let dto = ReceivedDocumentDto::default();
        assert!(matches!(dto.into_summary(), Err(FicError::Api { .. })));
    }

    #[test]
    fn test_draft_body_shape() {
        let draft = ExpenseDraft {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            supplier: "ACME".into(),
            description: Some("Hosting".into()),
            category: None,
            amount_net: Money::from_cents(10000),
            amount_vat: Money::from_cents(2200),
            installments: vec![Installment::unpaid(
                1,
                NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
                Money::from_cents(12200),
            )],
        };
        let json = serde_json::to_value(DataBody {
            data: ReceivedDocumentDto::from_draft(&draft),
        })
        .unwrap();
        let data = &json["data"];
        assert_eq!(data["type"], "expense");
        assert_eq!(data["entity"]["name"], "ACME");
        assert_eq!(data["amount_vat"], 22.0);
        assert_eq!(data["payments_list"][0]["status"], "not_paid");
        assert_eq!(data["payments_list"][0]["due_date"], "2024-06-30");
        assert!(data.get("id").is_none());
        assert!(data["payments_list"][0].get("id").is_none());
        assert!(data.get("category").is_none());
    }

    #[test]
    fn test_payment_update_keeps_item_ids() {
        let mut first = Installment::unpaid(
            1,
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            Money::from_cents(5000),
        );
        first.id = Some(301);
        first.mark_paid(NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(), 9);
        let mut second = Installment::unpaid(
            2,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            Money::from_cents(5000),
        );
        second.id = Some(302);

        let json = serde_json::to_value(DataBody {
            data: ReceivedDocumentDto::payments_only(&[first, second]),
        })
        .unwrap();
        let payments = &json["data"]["payments_list"];
        assert_eq!(payments[0]["id"], 301);
        assert_eq!(payments[0]["status"], "paid");
        assert_eq!(payments[0]["payment_account"]["id"], 9);
        assert_eq!(payments[1]["id"], 302);
        assert_eq!(payments[1]["status"], "not_paid");
    }
}
