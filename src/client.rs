use std::sync::Arc;

use crate::{data::Data, Result, Variation};

/// The part of the Kameleoon client the provider relies on.
///
/// Implementations are expected to be safe to call from several threads at once; the provider
/// does not add any locking around them.
pub trait KameleoonClient {
    /// Attach data records to the visitor.
    ///
    /// # Errors
    ///
    /// [`Error::VisitorCodeInvalid`](crate::Error::VisitorCodeInvalid) if the visitor code is
    /// rejected.
    fn add_data(&self, visitor_code: &str, data: Vec<Data>) -> Result<()>;

    /// Compute the variation of `feature_key` assigned to the visitor.
    ///
    /// # Errors
    ///
    /// [`Error::FeatureNotFound`](crate::Error::FeatureNotFound) if the flag does not exist, and
    /// [`Error::FeatureEnvironmentDisabled`](crate::Error::FeatureEnvironmentDisabled) if it is
    /// disabled in the current environment.
    fn get_variation(&self, visitor_code: &str, feature_key: &str) -> Result<Variation>;

    /// Block until the client has fetched its configuration. Returns `false` if initialization
    /// did not succeed.
    fn wait_init(&self) -> Result<bool>;
}

/// Client handle shared between the provider, its resolver and the client factory.
pub type SharedClient = Arc<dyn KameleoonClient + Send + Sync>;
