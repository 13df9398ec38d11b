use std::time::Duration;

/// Configuration for the order workflow itself.
///
/// Handed to [`crate::application::workflow::OrderWorkflow`] at construction
/// time; handlers never read ambient environment state.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Public base URL of the deployment, used to build the return/cancel
    /// callbacks the end user is redirected through after authorization.
    pub public_base_url: String,
    /// ISO currency code sent with every payment intent.
    pub currency: String,
}

impl WorkflowConfig {
    pub fn new(public_base_url: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            currency: currency.into(),
        }
    }

    /// Callback the authority redirects to after a successful authorization.
    pub fn return_url(&self) -> String {
        format!("{}/shop/paypal-return", self.public_base_url)
    }

    /// Callback the authority redirects to when the user cancels.
    pub fn cancel_url(&self) -> String {
        format!("{}/shop/paypal-cancel", self.public_base_url)
    }
}

/// Connection settings for the PayPal REST client.
#[derive(Debug, Clone)]
pub struct PayPalConfig {
    /// API endpoint, e.g. `https://api.sandbox.paypal.com`.
    pub api_base_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Bound on every remote call; a timeout counts as a remote failure.
    pub timeout: Duration,
}

impl PayPalConfig {
    pub fn new(
        api_base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout: Duration::from_secs(30),
        }
    }
}
