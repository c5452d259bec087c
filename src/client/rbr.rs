//! The main RocketBotRoyale client.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, ErrorKind};
use crate::types::{
    decode, decode_payload, AccountResponse, AuthenticateResponse, Credentials, GuestSession,
    LootBoxReward, SessionToken,
};

use super::conn::{check_status, ConnectionManager, RawResponse, DEFAULT_TIMEOUT};

/// Fixed backend endpoint base.
pub const BASE_URL: &str = "https://dev-nakama.winterpixel.io/v2";

/// Client version reported on every authentication call. High enough that
/// the backend never rejects the client as outdated.
pub const CLIENT_VERSION: &str = "9999999999";

const BASIC_AUTH: &str = "Basic OTAyaXViZGFmOWgyZTlocXBldzBmYjlhZWIzOTo=";
const GAME_ORIGIN: &str = "https://rocketbotroyale2.winterpixel.io";
const GAME_REFERER: &str = "https://rocketbotroyale2.winterpixel.io/";
const CLIENT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// The common header set for unauthenticated calls.
fn base_headers(content_type: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(AUTHORIZATION, HeaderValue::from_static(BASIC_AUTH));
    headers.insert(ORIGIN, HeaderValue::from_static(GAME_ORIGIN));
    headers.insert(REFERER, HeaderValue::from_static(GAME_REFERER));
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers
}

/// The common header set with the Basic authorization swapped for a Bearer
/// token.
fn bearer_headers(token: &str, content_type: &'static str) -> Result<HeaderMap, Error> {
    let mut headers = base_headers(content_type);
    let value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| Error::InvalidSessionToken)?;
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Encode an RPC argument object the way the backend expects: JSON text
/// embedded in a JSON string (the request-side mirror of the
/// double-encoded response fields).
fn rpc_body<T: Serialize>(args: &T) -> Result<String, serde_json::Error> {
    let inner = serde_json::to_string(args)?;
    serde_json::to_string(&inner)
}

/// Reply payload of the friend-code lookup RPC.
#[derive(Deserialize)]
struct FriendCodeOwner {
    user_id: String,
}

/// The main client for the Rocket Bot Royale backend.
///
/// One instance holds one cached session token and one worker identity.
/// Clones of the shared [`ConnectionManager`] may be injected so several
/// workers reuse the same handle map, each under its own key.
///
/// # Example
///
/// ```rust,no_run
/// use rbr_kit::RocketBotRoyale;
///
/// #[tokio::main]
/// async fn main() -> Result<(), rbr_kit::Error> {
///     let client = RocketBotRoyale::connect("a@b.com", "pw").await?;
///
///     let account = client.account().await?;
///     println!("coins: {}", account.wallet.coins);
///
///     client.collect_timed_bonus().await?;
///     Ok(())
/// }
/// ```
pub struct RocketBotRoyale {
    base_url: String,
    worker: String,
    timeout: Duration,
    connections: Arc<ConnectionManager>,
    credentials: Option<Credentials>,
    session: Mutex<Option<SessionToken>>,
}

impl RocketBotRoyale {
    /// Create a builder targeting the production backend.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Build a client with the given credentials and authenticate it.
    pub async fn connect(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, Error> {
        let client = Self::builder().credentials(email, password).build();
        client.authenticate().await?;
        Ok(client)
    }

    /// The backend base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The worker key this client acquires connections under.
    pub fn worker(&self) -> &str {
        &self.worker
    }

    /// The cached session token, if authenticated.
    pub fn session_token(&self) -> Option<SessionToken> {
        self.session
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Discard this worker's connection handle; the next call gets a fresh
    /// one.
    pub fn reset_connection(&self) {
        self.connections.reset(&self.worker);
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Authenticate with the configured credentials and cache the session
    /// token for subsequent calls.
    pub async fn authenticate(&self) -> Result<AuthenticateResponse, Error> {
        let credentials = self.credentials.as_ref().ok_or(Error::NoCredentials)?;
        let body = serde_json::json!({
            "email": credentials.email,
            "password": credentials.password,
            "vars": {"client_version": CLIENT_VERSION},
        });

        let raw = self
            .request(
                Method::POST,
                "/account/authenticate/email?create=false&",
                base_headers(CONTENT_TYPE_JSON),
                Some(body.to_string()),
            )
            .await?;
        let raw = check_status(raw, ErrorKind::Authentication)?;

        let session: AuthenticateResponse = decode(&raw.body)?;
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = Some(SessionToken {
            token: session.token.clone(),
            refresh_token: session.refresh_token.clone(),
        });
        tracing::debug!(worker = %self.worker, "session token cached");

        Ok(session)
    }

    /// Fetch the full account snapshot for the authenticated user.
    pub async fn account(&self) -> Result<AccountResponse, Error> {
        let headers = self.session_headers(CONTENT_TYPE_JSON)?;
        let raw = self
            .request(Method::GET, "/account", headers, None)
            .await?;
        let raw = check_status(raw, ErrorKind::Authentication)?;
        Ok(decode(&raw.body)?)
    }

    /// Collect the timed bonus, if it is currently available.
    pub async fn collect_timed_bonus(&self) -> Result<(), Error> {
        let headers = self.session_headers(CONTENT_TYPE_FORM)?;
        let body = rpc_body(&serde_json::json!({}))?;
        let raw = self
            .request(
                Method::POST,
                "/rpc/collect_timed_bonus",
                headers,
                Some(body),
            )
            .await?;
        check_status(raw, ErrorKind::CollectTimedBonus)?;
        Ok(())
    }

    /// Send a friend request to the holder of `friend_code`.
    pub async fn send_friend_request(&self, friend_code: &str) -> Result<(), Error> {
        let headers = self.session_headers(CONTENT_TYPE_FORM)?;
        let body = rpc_body(&serde_json::json!({"friend_code": friend_code}))?;
        let raw = self
            .request(
                Method::POST,
                "/rpc/winterpixel_query_user_id_for_friend_code",
                headers,
                Some(body),
            )
            .await?;
        check_status(raw, ErrorKind::FriendRequest)?;
        Ok(())
    }

    /// Resolve a friend code to the owning user's id.
    pub async fn friend_code_to_id(&self, friend_code: &str) -> Result<String, Error> {
        let headers = self.session_headers(CONTENT_TYPE_JSON)?;
        let body = rpc_body(&serde_json::json!({"friend_code": friend_code}))?;
        let raw = self
            .request(
                Method::POST,
                "/rpc/winterpixel_query_user_id_for_friend_code",
                headers,
                Some(body),
            )
            .await?;
        let raw = check_status(raw, ErrorKind::UnknownUser)?;

        let owner: FriendCodeOwner = decode_payload(&raw.body)?;
        Ok(owner.user_id)
    }

    /// Purchase a loot box; `elite` buys the premium variant.
    pub async fn buy_crate(&self, elite: bool) -> Result<LootBoxReward, Error> {
        let headers = self.session_headers(CONTENT_TYPE_JSON)?;
        let body = rpc_body(&serde_json::json!({"unique": elite}))?;
        let raw = self
            .request(
                Method::POST,
                "/rpc/tankkings_consume_lootbox",
                headers,
                Some(body),
            )
            .await?;
        let raw = check_status(raw, ErrorKind::LootBox)?;
        Ok(decode_payload(&raw.body)?)
    }

    /// Register a new account.
    ///
    /// Mints a throwaway guest identity via custom auth, then submits the
    /// sign-up fields under the guest's bearer token. Works on a client
    /// without configured credentials.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<(), Error> {
        let guest = self.guest_session().await?;

        let body = rpc_body(&serde_json::json!({
            "display_name": display_name,
            "email": email,
            "password": password,
        }))?;
        let headers = bearer_headers(&guest.token, CONTENT_TYPE_FORM)?;
        let raw = self
            .request(Method::POST, "/rpc/winterpixel_signup", headers, Some(body))
            .await?;
        check_status(raw, ErrorKind::SignUp)?;
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Mint a guest session for the sign-up flow.
    async fn guest_session(&self) -> Result<GuestSession, Error> {
        let body = serde_json::json!({
            "id": Uuid::new_v4().to_string(),
            "vars": {"client_version": CLIENT_VERSION, "platform": "HTML5"},
        });

        let raw = self
            .request(
                Method::POST,
                "/account/authenticate/custom?create=true&",
                base_headers(CONTENT_TYPE_JSON),
                Some(body.to_string()),
            )
            .await?;
        let raw = check_status(raw, ErrorKind::Authentication)?;
        Ok(decode(&raw.body)?)
    }

    /// Bearer headers from the cached session token; fails locally with
    /// [`Error::Unauthenticated`] before any network call when absent.
    fn session_headers(&self, content_type: &'static str) -> Result<HeaderMap, Error> {
        let session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        let token = session.as_ref().ok_or(Error::Unauthenticated)?;
        bearer_headers(&token.token, content_type)
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<String>,
    ) -> Result<RawResponse, Error> {
        let handle = self.connections.acquire(&self.worker);
        let url = format!("{}{}", self.base_url, path);
        handle.perform(method, &url, headers, body, self.timeout).await
    }
}

impl std::fmt::Debug for RocketBotRoyale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocketBotRoyale")
            .field("base_url", &self.base_url)
            .field("worker", &self.worker)
            .field("authenticated", &self.session_token().is_some())
            .finish()
    }
}

/// Fluent builder for [`RocketBotRoyale`].
///
/// # Example
///
/// ```rust,no_run
/// use rbr_kit::RocketBotRoyale;
///
/// # async fn example() -> Result<(), rbr_kit::Error> {
/// let client = RocketBotRoyale::builder()
///     .credentials("a@b.com", "pw")
///     .worker("scraper-3")
///     .build();
/// client.authenticate().await?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: String,
    worker: String,
    timeout: Duration,
    connections: Option<Arc<ConnectionManager>>,
    credentials: Option<Credentials>,
}

impl ClientBuilder {
    fn new() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            worker: "main".to_string(),
            timeout: DEFAULT_TIMEOUT,
            connections: None,
            credentials: None,
        }
    }

    /// Set the account credentials used by `authenticate()`.
    pub fn credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(email, password));
        self
    }

    /// Override the backend base URL (stubs, staging).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the worker key this client acquires connections under.
    pub fn worker(mut self, worker: impl Into<String>) -> Self {
        self.worker = worker.into();
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Share a connection manager across several clients/workers.
    pub fn connection_manager(mut self, connections: Arc<ConnectionManager>) -> Self {
        self.connections = Some(connections);
        self
    }

    /// Build the client.
    pub fn build(self) -> RocketBotRoyale {
        RocketBotRoyale {
            base_url: self.base_url,
            worker: self.worker,
            timeout: self.timeout,
            connections: self
                .connections
                .unwrap_or_else(|| Arc::new(ConnectionManager::new())),
            credentials: self.credentials,
            session: Mutex::new(None),
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ClientBuilder> for RocketBotRoyale {
    fn from(builder: ClientBuilder) -> Self {
        builder.build()
    }
}
