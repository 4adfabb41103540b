use std::sync::Arc;
use std::sync::Mutex;

use account_service::account::errors::AccountError;
use account_service::account::models::Account;
use account_service::account::models::EmailAddress;
use account_service::account::ports::AccountStore;
use account_service::domain::account::service::AccountService;
use account_service::domain::email::service::EmailService;
use account_service::email::errors::EmailError;
use account_service::email::models::EmailMessage;
use account_service::email::models::EmailRecord;
use account_service::email::ports::EmailHistoryStore;
use account_service::email::ports::MailRelay;
use account_service::inbound::http::router::create_router;
use async_trait::async_trait;
use auth::Authenticator;
use auth::ManualClock;
use auth::ResetTokenManager;
use chrono::DateTime;
use chrono::Utc;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-token-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory adapters
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub clock: Arc<ManualClock>,
    pub outbox: Arc<RecordingMailRelay>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let clock = ManualClock::shared(Utc::now());

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let account_store = Arc::new(InMemoryAccountStore::new());
        let outbox = Arc::new(RecordingMailRelay::new());
        let history = Arc::new(InMemoryEmailHistoryStore::new());

        let sender = EmailAddress::new("no-reply@service.test".to_string())
            .expect("Failed to parse test sender address");

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET, clock.clone()));
        let reset_tokens = ResetTokenManager::new(TEST_SECRET, clock.clone());

        let email_service = Arc::new(EmailService::new(
            Arc::clone(&outbox),
            history,
            sender,
            clock.clone(),
        ));

        let account_service = Arc::new(AccountService::new(
            account_store,
            Arc::clone(&email_service),
            Arc::clone(&authenticator),
            reset_tokens,
            clock.clone(),
        ));

        let router = create_router(account_service, email_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            clock,
            outbox,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }
}

/// Account store backed by a plain Vec, matching the Postgres adapter's
/// uniqueness and lookup rules
pub struct InMemoryAccountStore {
    accounts: Mutex<Vec<Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.lock().unwrap();

        if accounts.iter().any(|a| a.email == account.email) {
            return Err(AccountError::EmailAlreadyRegistered(
                account.email.as_str().to_string(),
            ));
        }
        if accounts
            .iter()
            .any(|a| a.display_name == account.display_name)
        {
            return Err(AccountError::DisplayNameTaken(
                account.display_name.as_str().to_string(),
            ));
        }

        accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, AccountError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .find(|a| a.email.as_str() == identifier || a.display_name.as_str() == identifier)
            .cloned())
    }

    async fn find_by_email_and_reset_token(
        &self,
        email: &str,
        token: &str,
    ) -> Result<Option<Account>, AccountError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .find(|a| a.email.as_str() == email && a.reset_token.token.as_deref() == Some(token))
            .cloned())
    }

    async fn save(&self, account: &Account) -> Result<(), AccountError> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.iter_mut().find(|a| a.id == account.id) {
            Some(stored) => {
                *stored = account.clone();
                Ok(())
            }
            None => Err(AccountError::NotFound(account.id.to_string())),
        }
    }
}

/// Mail relay that records deliveries instead of talking to an SMTP server
pub struct RecordingMailRelay {
    sent: Mutex<Vec<(EmailAddress, EmailMessage)>>,
    failure: Mutex<Option<String>>,
}

impl RecordingMailRelay {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    /// Make every following delivery fail with the given message
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn sent(&self) -> Vec<(EmailAddress, EmailMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailRelay for RecordingMailRelay {
    async fn deliver(
        &self,
        sender: &EmailAddress,
        message: &EmailMessage,
    ) -> Result<(), EmailError> {
        if let Some(failure) = self.failure.lock().unwrap().as_ref() {
            return Err(EmailError::Relay(failure.clone()));
        }

        self.sent
            .lock()
            .unwrap()
            .push((sender.clone(), message.clone()));
        Ok(())
    }
}

/// History store backed by a plain Vec
pub struct InMemoryEmailHistoryStore {
    records: Mutex<Vec<EmailRecord>>,
}

impl InMemoryEmailHistoryStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EmailHistoryStore for InMemoryEmailHistoryStore {
    async fn record(&self, record: &EmailRecord) -> Result<(), EmailError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn list_since(
        &self,
        cutoff: Option<DateTime<Utc>>,
    ) -> Result<Vec<EmailRecord>, EmailError> {
        let records = self.records.lock().unwrap();
        let mut listed: Vec<EmailRecord> = records
            .iter()
            .filter(|r| cutoff.map_or(true, |cutoff| r.sent_at >= cutoff))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        Ok(listed)
    }
}
