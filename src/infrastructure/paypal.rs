//! PayPal REST client implementing the payment-authority port.
//!
//! Talks to the classic v1 payments API: a client-credentials OAuth token
//! (cached, refreshed when rejected), `POST /v1/payments/payment` to create
//! a sale intent, and `GET /v1/payments/payment/{id}` to fetch authoritative
//! state at capture time.

use crate::config::PayPalConfig;
use crate::domain::ports::{CreatedPayment, PaymentAuthority, PaymentRequest, PaymentState};
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

pub struct PayPalClient {
    config: PayPalConfig,
    client: Client,
    /// Cached OAuth access token. Cleared and re-fetched when the API
    /// rejects it.
    access_token: RwLock<Option<String>>,
}

#[derive(Serialize)]
struct CreatePaymentBody {
    intent: &'static str,
    payer: WirePayer,
    redirect_urls: WireRedirectUrls,
    transactions: Vec<WireTransaction>,
}

#[derive(Serialize)]
struct WirePayer {
    payment_method: &'static str,
}

#[derive(Serialize)]
struct WireRedirectUrls {
    return_url: String,
    cancel_url: String,
}

#[derive(Serialize)]
struct WireTransaction {
    item_list: WireItemList,
    amount: WireAmount,
    description: String,
}

#[derive(Serialize)]
struct WireItemList {
    items: Vec<WireItem>,
}

#[derive(Serialize)]
struct WireItem {
    name: String,
    sku: String,
    price: String,
    currency: String,
    quantity: u32,
}

#[derive(Serialize)]
struct WireAmount {
    currency: String,
    total: String,
}

#[derive(Deserialize)]
struct WirePayment {
    id: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    links: Vec<WireLink>,
}

#[derive(Deserialize)]
struct WireLink {
    href: String,
    rel: String,
}

#[derive(Deserialize)]
struct WireTokenResponse {
    access_token: String,
}

/// Formats a monetary amount to exactly two decimal places, the precision
/// the payments API requires.
fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

fn parse_state(state: &str) -> PaymentState {
    match state {
        "approved" => PaymentState::Approved,
        "created" => PaymentState::Created,
        "failed" => PaymentState::Failed,
        other => PaymentState::Other(other.to_string()),
    }
}

/// Extracts the approval redirect location from a payment's link list.
fn approval_url(links: &[WireLink]) -> Option<String> {
    links
        .iter()
        .find(|link| link.rel == "approval_url")
        .map(|link| link.href.clone())
}

impl PayPalClient {
    pub fn new(config: PayPalConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| OrderError::PaymentAuthority(err.to_string()))?;
        Ok(Self {
            config,
            client,
            access_token: RwLock::new(None),
        })
    }

    async fn token(&self) -> Result<String> {
        if let Some(token) = self.access_token.read().await.clone() {
            return Ok(token);
        }
        self.refresh_token().await
    }

    async fn refresh_token(&self) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/v1/oauth2/token", self.config.api_base_url))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OrderError::PaymentAuthority(format!(
                "token request failed with status {}",
                response.status()
            )));
        }

        let token: WireTokenResponse = response
            .json()
            .await
            .map_err(|err| OrderError::PaymentAuthority(err.to_string()))?;
        *self.access_token.write().await = Some(token.access_token.clone());
        Ok(token.access_token)
    }

    /// Sends an authenticated request, refreshing the cached token once if
    /// the API rejects it.
    async fn send_authorized(
        &self,
        build: impl Fn(&Client, &str) -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let token = self.token().await?;
        let response = build(&self.client, &token).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        *self.access_token.write().await = None;
        let token = self.refresh_token().await?;
        Ok(build(&self.client, &token).send().await?)
    }

    async fn parse_payment(&self, response: reqwest::Response) -> Result<WirePayment> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body, "payment authority returned an error");
            return Err(OrderError::PaymentAuthority(format!(
                "request failed with status {status}"
            )));
        }
        response
            .json()
            .await
            .map_err(|err| OrderError::PaymentAuthority(err.to_string()))
    }
}

#[async_trait]
impl PaymentAuthority for PayPalClient {
    async fn create_payment(&self, request: PaymentRequest) -> Result<CreatedPayment> {
        let body = CreatePaymentBody {
            intent: "sale",
            payer: WirePayer {
                payment_method: "paypal",
            },
            redirect_urls: WireRedirectUrls {
                return_url: request.return_url.clone(),
                cancel_url: request.cancel_url.clone(),
            },
            transactions: vec![WireTransaction {
                item_list: WireItemList {
                    items: request
                        .items
                        .iter()
                        .map(|item| WireItem {
                            name: item.name.clone(),
                            sku: item.sku.clone(),
                            price: format_amount(item.price),
                            currency: request.currency.clone(),
                            quantity: item.quantity,
                        })
                        .collect(),
                },
                amount: WireAmount {
                    currency: request.currency.clone(),
                    total: format_amount(request.total),
                },
                description: "order payment".to_string(),
            }],
        };

        let url = format!("{}/v1/payments/payment", self.config.api_base_url);
        let response = self
            .send_authorized(|client: &Client, token: &str| {
                client.post(url.as_str()).bearer_auth(token).json(&body)
            })
            .await?;
        let payment = self.parse_payment(response).await?;

        let approval_url = approval_url(&payment.links).ok_or_else(|| {
            OrderError::PaymentAuthority("payment response carries no approval link".to_string())
        })?;

        Ok(CreatedPayment {
            payment_id: payment.id,
            approval_url,
        })
    }

    async fn get_payment(&self, payment_id: &str) -> Result<PaymentState> {
        let url = format!(
            "{}/v1/payments/payment/{payment_id}",
            self.config.api_base_url
        );
        let response = self
            .send_authorized(|client: &Client, token: &str| {
                client.get(url.as_str()).bearer_auth(token)
            })
            .await?;
        let payment = self.parse_payment(response).await?;

        Ok(payment
            .state
            .as_deref()
            .map(parse_state)
            .unwrap_or(PaymentState::Other("unknown".to_string())))
    }
}
