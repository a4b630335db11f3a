//! Top-level client handle

use memoria_core::{AuthMode, ClientConfig, ClientOptions, HttpClient, Result};

use crate::cognitive::{GoalsClient, MetacognitionClient, UncertaintyClient, WorkingMemoryClient};

/// Client for the Memoria memory service
///
/// Construction validates the options once; afterwards the client is
/// immutable and can be cloned and shared across tasks.
///
/// ```no_run
/// use memoria_client::{ClientOptions, CreateMemoryOptions, MemoryClient};
///
/// # async fn run() -> memoria_client::Result<()> {
/// let client = MemoryClient::new(ClientOptions::with_api_key("mk_live_123"))?;
/// let memory = client
///     .create_memory("Prefers morning meetings", CreateMemoryOptions::default())
///     .await?;
/// println!("{}", memory["id"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryClient {
    pub(crate) http: HttpClient,
}

impl MemoryClient {
    /// Validate options and create a client
    pub fn new(options: ClientOptions) -> Result<Self> {
        Ok(Self {
            http: HttpClient::from_options(options)?,
        })
    }

    /// Create a client from `MEMORIA_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientOptions::from_env()?)
    }

    /// Create a client from an already validated configuration
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    /// Auth mode fixed at construction
    pub fn auth_mode(&self) -> AuthMode {
        self.http.auth_mode()
    }

    /// The underlying request executor
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Short-lived attention buffer
    pub fn working_memory(&self) -> WorkingMemoryClient<'_> {
        WorkingMemoryClient::new(&self.http)
    }

    /// Goal tracking
    pub fn goals(&self) -> GoalsClient<'_> {
        GoalsClient::new(&self.http)
    }

    /// Reflection and confidence estimates
    pub fn metacognition(&self) -> MetacognitionClient<'_> {
        MetacognitionClient::new(&self.http)
    }

    /// Open questions and their resolution
    pub fn uncertainty(&self) -> UncertaintyClient<'_> {
        UncertaintyClient::new(&self.http)
    }
}
