//! Main FmsClient

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::cache::LayoutCache;
use crate::error::ApiError;
use crate::error::Error;
use crate::transport::Credentials;
use crate::transport::HttpTransport;
use crate::transport::Transport;

/// The XML grammars served by the web publishing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// `fmresultset`, used by every command.
    ResultSet,
    /// `FMPXMLRESULT`, a flat row/column rendition.
    XmlResult,
    /// `FMPXMLLAYOUT`, layout and value list metadata.
    Layout,
}

impl Grammar {
    /// Returns the grammar name used in the endpoint path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Grammar::ResultSet => "fmresultset",
            Grammar::XmlResult => "FMPXMLRESULT",
            Grammar::Layout => "FMPXMLLAYOUT",
        }
    }

    /// Returns the endpoint path, e.g. `/fmi/xml/fmresultset.xml`.
    pub fn path(&self) -> String {
        format!("/fmi/xml/{}.xml", self.as_str())
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The client for one web publishing server.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks. Clones share the layout cache.
///
/// # Example
///
/// ```no_run
/// # async fn demo() -> Result<(), fmxml_lib::error::Error> {
/// use fmxml_lib::FmsClient;
/// use fmxml_lib::api::command::Command;
///
/// let client = FmsClient::builder()
///     .url("https://fms.example.com")
///     .credentials("admin", "secret")
///     .database("Contacts")
///     .build()?;
///
/// let result = client.find("People").execute().await?;
/// println!("{} of {}", result.found_count(), result.total_count());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FmsClient {
    pub(crate) inner: Arc<FmsClientInner>,
}

pub(crate) struct FmsClientInner {
    pub(crate) base_url: Url,
    pub(crate) database: Option<String>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) layouts: LayoutCache,
}

impl FmsClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> FmsClientBuilder<Missing, Missing> {
        FmsClientBuilder::new()
    }

    /// Returns the server URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Returns the default database for commands.
    pub fn database(&self) -> Option<&str> {
        self.inner.database.as_deref()
    }

    /// Returns the layout cache shared by all clones of this client.
    pub fn layout_cache(&self) -> &LayoutCache {
        &self.inner.layouts
    }

    /// Builds the request URL for a grammar endpoint.
    pub(crate) fn endpoint(&self, path: &str, query: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self
            .inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))?;
        url.set_query(query);
        Ok(url)
    }
}

impl fmt::Debug for FmsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmsClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("database", &self.inner.database)
            .field("cached_layouts", &self.inner.layouts.len())
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`FmsClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - The server URL, e.g. `https://fms.example.com`
/// - `credentials` or `guest` - How to authenticate
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use fmxml_lib::FmsClient;
///
/// let client = FmsClient::builder()
///     .url("https://fms.example.com")
///     .guest()
///     .database("Catalog")
///     .timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// assert_eq!(client.database(), Some("Catalog"));
/// ```
pub struct FmsClientBuilder<U, A> {
    url: U,
    credentials: A,
    database: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
    transport: Option<Arc<dyn Transport>>,
}

impl FmsClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            credentials: Missing,
            database: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
            transport: None,
        }
    }
}

impl Default for FmsClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> FmsClientBuilder<Missing, A> {
    /// Sets the server URL. Only scheme, host and port are used.
    pub fn url(self, url: impl Into<String>) -> FmsClientBuilder<Set<String>, A> {
        FmsClientBuilder {
            url: Set(url.into()),
            credentials: self.credentials,
            database: self.database,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            transport: self.transport,
        }
    }
}

impl<U> FmsClientBuilder<U, Missing> {
    /// Authenticates with HTTP basic authentication.
    pub fn credentials(
        self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> FmsClientBuilder<U, Set<Credentials>> {
        self.with_credentials(Credentials::Basic {
            username: username.into(),
            password: password.into(),
        })
    }

    /// Connects without credentials.
    pub fn guest(self) -> FmsClientBuilder<U, Set<Credentials>> {
        self.with_credentials(Credentials::Guest)
    }

    fn with_credentials(self, credentials: Credentials) -> FmsClientBuilder<U, Set<Credentials>> {
        FmsClientBuilder {
            url: self.url,
            credentials: Set(credentials),
            database: self.database,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            transport: self.transport,
        }
    }
}

impl<U, A> FmsClientBuilder<U, A> {
    /// Sets the database used by commands that do not name one.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Replaces the HTTP transport.
    ///
    /// Credentials, timeouts and the HTTP client are ignored when a transport
    /// is set.
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }
}

impl FmsClientBuilder<Set<String>, Set<Credentials>> {
    /// Builds the [`FmsClient`].
    ///
    /// # Errors
    ///
    /// Fails if the URL cannot be parsed or the HTTP client cannot be built.
    pub fn build(self) -> Result<FmsClient, Error> {
        let base_url = Url::parse(&self.url.0)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.url.0, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(self.url.0).into());
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let http_client = match self.http_client {
                    Some(client) => client,
                    None => {
                        let mut builder = Client::builder();
                        if let Some(timeout) = self.connect_timeout {
                            builder = builder.connect_timeout(timeout);
                        }
                        builder.build().map_err(ApiError::from)?
                    }
                };
                Arc::new(HttpTransport::new(
                    http_client,
                    self.credentials.0,
                    self.timeout,
                )) as Arc<dyn Transport>
            }
        };

        Ok(FmsClient {
            inner: Arc::new(FmsClientInner {
                base_url,
                database: self.database,
                transport,
                layouts: LayoutCache::new(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_paths() {
        assert_eq!(Grammar::ResultSet.path(), "/fmi/xml/fmresultset.xml");
        assert_eq!(Grammar::XmlResult.path(), "/fmi/xml/FMPXMLRESULT.xml");
        assert_eq!(Grammar::Layout.to_string(), "FMPXMLLAYOUT");
    }

    #[test]
    fn test_endpoint_ignores_base_path() {
        let client = FmsClient::builder()
            .url("http://fms.example.com:8080/some/page")
            .guest()
            .build()
            .unwrap();
        let url = client
            .endpoint(&Grammar::ResultSet.path(), Some("-dbnames"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://fms.example.com:8080/fmi/xml/fmresultset.xml?-dbnames"
        );
    }

    #[test]
    fn test_invalid_url() {
        let result = FmsClient::builder().url("not a url").guest().build();
        assert!(matches!(result, Err(Error::Api(ApiError::InvalidUrl(_)))));
    }
}
