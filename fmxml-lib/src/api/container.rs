//! Container field data

use log::info;
use url::Url;

use crate::FmsClient;
use crate::error::ApiError;
use crate::error::Error;

/// Prefix of every container data path.
const CONTAINER_PATH_PREFIX: &str = "/fmi/xml/cnt";

impl FmsClient {
    /// Resolves a container path, as found in a container field, against the
    /// server.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiError::InvalidUrl`] if the path does not start with
    /// `/fmi/xml/cnt`.
    pub fn container_url(&self, path: &str) -> Result<Url, Error> {
        if !path.starts_with(CONTAINER_PATH_PREFIX) {
            return Err(ApiError::InvalidUrl(path.to_string()).into());
        }
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };
        Ok(self.endpoint(path, query)?)
    }

    /// Fetches the bytes stored in a container field. Nothing is cached.
    pub async fn container_data(&self, path: &str) -> Result<Vec<u8>, Error> {
        let url = self.container_url(path)?;
        info!("GET {}", url);
        Ok(self.inner.transport.get(&url).await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::FmsClient;

    fn client() -> FmsClient {
        FmsClient::builder()
            .url("https://fms.example.com")
            .guest()
            .build()
            .unwrap()
    }

    #[test]
    fn test_container_url() {
        let url = client()
            .container_url("/fmi/xml/cnt/photo.jpg?-db=Family&-lay=People&-recid=14&-field=Photo(1)")
            .unwrap();
        assert_eq!(url.path(), "/fmi/xml/cnt/photo.jpg");
        assert_eq!(
            url.query(),
            Some("-db=Family&-lay=People&-recid=14&-field=Photo(1)")
        );
    }

    #[test]
    fn test_container_url_rejects_other_paths() {
        assert!(client().container_url("/fmi/xml/fmresultset.xml").is_err());
    }
}
