use std::sync::Arc;

use gatehouse_core::{PhoneNumber, SmsClient};
use secrecy::ExposeSecret;
use tokio::sync::RwLock;

/// SMS client that delivers nowhere. Records every message so tests can
/// read the code a real carrier would have sent; logs at debug level for
/// local development.
#[derive(Debug, Clone, Default)]
pub struct MockSmsClient {
    sent: Arc<RwLock<Vec<SentSms>>>,
    fail_sends: bool,
}

#[derive(Debug, Clone)]
pub struct SentSms {
    pub recipient: String,
    pub body: String,
}

impl MockSmsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose every send fails, for exercising delivery-failure
    /// paths.
    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail_sends: true,
        }
    }

    pub async fn sent_messages(&self) -> Vec<SentSms> {
        self.sent.read().await.clone()
    }

    pub async fn last_message(&self) -> Option<SentSms> {
        self.sent.read().await.last().cloned()
    }
}

#[async_trait::async_trait]
impl SmsClient for MockSmsClient {
    async fn send_sms(&self, recipient: &PhoneNumber, body: &str) -> Result<(), String> {
        if self.fail_sends {
            return Err("mock SMS client configured to fail".to_owned());
        }
        tracing::debug!("mock SMS delivery: {body}");
        self.sent.write().await.push(SentSms {
            recipient: recipient.as_ref().expose_secret().clone(),
            body: body.to_owned(),
        });
        Ok(())
    }
}
