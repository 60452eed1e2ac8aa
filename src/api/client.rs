//! Blocking HTTP client for the Fatture in Cloud v2 API

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::cell::Cell;
use std::time::Duration;
use zeroize::Zeroizing;

use super::dto::{DataBody, ListResponse, PaymentAccountDto, ReceivedDocumentDto};
use super::ExpenseApi;
use crate::config::Credentials;
use crate::error::{FicError, FicResult};
use crate::models::{
    Expense, ExpenseDraft, ExpenseId, ExpenseSummary, Installment, PaymentAccount, QuotaInfo,
};

pub const DEFAULT_BASE_URL: &str = "https://api-v2.fattureincloud.it";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const LIST_SORT: &str = "-date";
const ERROR_BODY_LIMIT: usize = 300;

/// API client bound to one company
pub struct FicClient {
    client: Client,
    base_url: String,
    company_id: u64,
    token: Zeroizing<String>,
    last_quota: Cell<Option<QuotaInfo>>,
}

impl FicClient {
    /// Create a client for the default API host
    pub fn new(credentials: &Credentials) -> FicResult<Self> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    /// Create a client for a custom API host (used for staging or proxies)
    pub fn with_base_url(credentials: &Credentials, base_url: &str) -> FicResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("fic-expenses/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FicError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            company_id: credentials.company_id,
            token: credentials.access_token.clone(),
            last_quota: Cell::new(None),
        })
    }

    fn documents_url(&self) -> String {
        format!("{}/c/{}/received_documents", self.base_url, self.company_id)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(self.token.as_str())
            .header(ACCEPT, "application/json")
    }

    fn record_quota(&self, headers: &HeaderMap) {
        let has_quota = headers
            .keys()
            .any(|k| k.as_str().starts_with("ratelimit-"));
        if !has_quota {
            return;
        }
        let quota = QuotaInfo::from_lookup(|name| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        });
        tracing::debug!(
            hourly_remaining = quota.hourly_remaining,
            monthly_remaining = quota.monthly_remaining,
            "quota updated"
        );
        self.last_quota.set(Some(quota));
    }

    /// Send a request, record quota and map failures to error variants
    fn send(&self, request: RequestBuilder, what: &str) -> FicResult<Response> {
        let response = self.authorized(request).send()?;
        self.record_quota(response.headers());

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let excerpt: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        tracing::warn!(status = status.as_u16(), what, "API request failed");
        Err(map_status(status, what, excerpt))
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> FicResult<T> {
        let response = self.send(request, what)?;
        response.json::<T>().map_err(|e| FicError::Api {
            status: None,
            message: format!("Unexpected response for {}: {}", what, e),
        })
    }
}

fn map_status(status: StatusCode, what: &str, body: String) -> FicError {
    match status {
        StatusCode::UNAUTHORIZED => {
            FicError::Auth("Invalid or expired access token".to_string())
        }
        StatusCode::FORBIDDEN => FicError::Auth(
            "Access denied. Check the token permissions for this company".to_string(),
        ),
        StatusCode::NOT_FOUND => FicError::NotFound {
            entity_type: "Resource",
            identifier: what.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => {
            FicError::RateLimited("API quota exhausted, try again later".to_string())
        }
        other => FicError::api(other.as_u16(), format!("{} failed: {}", what, body)),
    }
}

impl ExpenseApi for FicClient {
    fn list_expenses(
        &self,
        query: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> FicResult<Vec<ExpenseSummary>> {
        let mut params: Vec<(&str, String)> = vec![
            ("type", "expense".to_string()),
            ("sort", LIST_SORT.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(q) = query {
            params.push(("q", q.to_string()));
        }

        tracing::debug!(page, per_page, query, "listing expenses");
        let request = self.client.get(self.documents_url()).query(&params);
        let page: ListResponse<ReceivedDocumentDto> = self.send_json(request, "list expenses")?;

        page.data
            .into_iter()
            .map(ReceivedDocumentDto::into_summary)
            .collect()
    }

    fn get_expense(&self, id: ExpenseId) -> FicResult<Expense> {
        let url = format!("{}/{}", self.documents_url(), id);
        let request = self.client.get(url);
        let wrapped: DataBody<ReceivedDocumentDto> = self
            .send_json(request, &format!("expense {}", id))
            .map_err(|e| match e {
                FicError::NotFound { .. } => FicError::expense_not_found(id.to_string()),
                other => other,
            })?;
        wrapped.data.into_expense()
    }

    fn create_expense(&self, draft: &ExpenseDraft) -> FicResult<ExpenseId> {
        let body = DataBody {
            data: ReceivedDocumentDto::from_draft(draft),
        };
        tracing::info!(supplier = %draft.supplier, date = %draft.date, "creating expense");
        let request = self.client.post(self.documents_url()).json(&body);
        let wrapped: DataBody<ReceivedDocumentDto> =
            self.send_json(request, "create expense")?;

        wrapped.data.id.ok_or_else(|| FicError::Api {
            status: None,
            message: "Created expense has no id".to_string(),
        })
    }

    fn update_expense_payments(
        &self,
        id: ExpenseId,
        installments: &[Installment],
    ) -> FicResult<()> {
        let url = format!("{}/{}", self.documents_url(), id);
        let body = DataBody {
            data: ReceivedDocumentDto::payments_only(installments),
        };
        tracing::info!(id, installments = installments.len(), "updating payments");
        self.send(self.client.put(url).json(&body), &format!("expense {}", id))
            .map_err(|e| match e {
                FicError::NotFound { .. } => FicError::expense_not_found(id.to_string()),
                other => other,
            })?;
        Ok(())
    }

    fn list_payment_accounts(&self) -> FicResult<Vec<PaymentAccount>> {
        let url = format!(
            "{}/c/{}/settings/payment_accounts",
            self.base_url, self.company_id
        );
        let response: ListResponse<PaymentAccountDto> = self
            .send_json(self.client.get(url), "payment accounts")
            .map_err(|e| match e {
                FicError::NotFound { .. } => FicError::NotFound {
                    entity_type: "Company",
                    identifier: self.company_id.to_string(),
                },
                other => other,
            })?;

        Ok(response.data.into_iter().map(PaymentAccount::from).collect())
    }

    fn last_quota(&self) -> Option<QuotaInfo> {
        self.last_quota.get()
    }
}
