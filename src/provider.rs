use std::{path::Path, sync::Arc};

use serde::Serialize;

use crate::{
    client::SharedClient,
    resolver::{KameleoonResolver, Resolver, TYPE_MISMATCH_MESSAGE},
    AllowedTypes, ClientConfig, ClientFactory, ErrorCode, EvaluationContext, ResolutionDetails,
    Result, Value,
};

const NOT_READY_MESSAGE: &str = "The provider is not ready to resolve flags.";

/// Static information about the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    /// Provider name.
    pub name: &'static str,
}

/// Feature flag provider resolving flags with a Kameleoon client.
///
/// A provider starts in the not-ready state. Call [`KameleoonProvider::init()`] to wait for the
/// client to fetch its configuration; until it succeeds, every fetch returns the default value
/// with [`ErrorCode::ProviderNotReady`]. If the client could not be created at all, fetches
/// report [`ErrorCode::ProviderFatal`] instead.
///
/// Fetch methods never fail: errors are reported inside the returned [`ResolutionDetails`]
/// together with the caller's default value.
///
/// # Examples
/// ```no_run
/// # use std::sync::Arc;
/// # use kameleoon_openfeature::{CachingClientFactory, ClientConfig, EvaluationContext, KameleoonProvider, SharedClient};
/// # fn connect(site_code: &str, config: Option<&ClientConfig>) -> kameleoon_openfeature::Result<SharedClient> { todo!() }
/// let factory = Arc::new(CachingClientFactory::new(connect));
/// let mut provider = KameleoonProvider::new(
///     "site-code",
///     Some(ClientConfig::new("client-id", "client-secret")),
///     factory,
/// );
/// provider.init();
///
/// let context = EvaluationContext::with_targeting_key("visitor-code");
/// let enabled = provider
///     .fetch_boolean_value("new-checkout", false, Some(&context))
///     .into_value();
/// ```
pub struct KameleoonProvider {
    site_code: String,
    factory: Arc<dyn ClientFactory + Send + Sync>,
    client: Option<SharedClient>,
    resolver: Option<Box<dyn Resolver + Send + Sync>>,
    ready_state: bool,
}

impl KameleoonProvider {
    /// Name reported in [`ProviderMetadata`].
    pub const NAME: &'static str = "Kameleoon Provider";

    /// Create a provider for `site_code`, asking `factory` for a client.
    ///
    /// A failure to create the client is logged and not returned; the provider then reports
    /// [`ErrorCode::ProviderFatal`] on every fetch.
    pub fn new(
        site_code: impl Into<String>,
        config: Option<ClientConfig>,
        factory: Arc<dyn ClientFactory + Send + Sync>,
    ) -> Self {
        let site_code = site_code.into();
        let client = factory.create(&site_code, config.as_ref());
        KameleoonProvider::with_client(site_code, client, factory)
    }

    /// Create a provider for `site_code` with the client configuration stored in the JSON file
    /// at `config_path`.
    ///
    /// A configuration file that cannot be read or parsed is handled like a failure to create the
    /// client: the provider reports [`ErrorCode::ProviderFatal`] on every fetch.
    pub fn from_config_path(
        site_code: impl Into<String>,
        config_path: impl AsRef<Path>,
        factory: Arc<dyn ClientFactory + Send + Sync>,
    ) -> Self {
        let site_code = site_code.into();
        let client = ClientConfig::from_path(config_path)
            .and_then(|config| factory.create(&site_code, Some(&config)));
        KameleoonProvider::with_client(site_code, client, factory)
    }

    fn with_client(
        site_code: String,
        client: Result<SharedClient>,
        factory: Arc<dyn ClientFactory + Send + Sync>,
    ) -> Self {
        let client = match client {
            Ok(client) => Some(client),
            Err(err) => {
                log::warn!(target: "kameleoon",
                           site_code = site_code.as_str();
                           "unable to create Kameleoon client: {err}");
                None
            }
        };
        let resolver = client.clone().map(|client| {
            Box::new(KameleoonResolver::new(client)) as Box<dyn Resolver + Send + Sync>
        });

        KameleoonProvider {
            site_code,
            factory,
            client,
            resolver,
            ready_state: false,
        }
    }

    #[cfg(test)]
    fn new_with_resolver(
        site_code: &str,
        client: Option<SharedClient>,
        resolver: Box<dyn Resolver + Send + Sync>,
        factory: Arc<dyn ClientFactory + Send + Sync>,
    ) -> Self {
        KameleoonProvider {
            site_code: site_code.to_owned(),
            factory,
            client,
            resolver: Some(resolver),
            ready_state: false,
        }
    }

    #[allow(missing_docs)]
    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: KameleoonProvider::NAME,
        }
    }

    /// Client used by this provider. `None` if it could not be created or the provider was shut
    /// down.
    pub fn client(&self) -> Option<&SharedClient> {
        self.client.as_ref()
    }

    /// Return `true` if the provider resolves flags.
    pub fn ready_state(&self) -> bool {
        self.ready_state
    }

    /// Wait for the client to initialize and return the new ready state.
    ///
    /// The provider is ready only if the client exists and reports a successful initialization.
    pub fn init(&mut self) -> bool {
        let ready = match &self.client {
            None => false,
            Some(client) => match client.wait_init() {
                Ok(ready) => ready,
                Err(err) => {
                    log::warn!(target: "kameleoon",
                               site_code = self.site_code.as_str();
                               "Kameleoon client failed to initialize: {err}");
                    false
                }
            },
        };
        self.ready_state = ready;
        ready
    }

    /// Release the client and go back to the not-ready state.
    ///
    /// The factory forgets the client of this site, so a provider created afterwards gets a new
    /// one. This provider reports [`ErrorCode::ProviderFatal`] from now on.
    pub fn shutdown(&mut self) {
        self.factory.forget(&self.site_code);
        self.ready_state = false;
        self.client = None;
        self.resolver = None;
    }

    /// Resolve a boolean flag value.
    pub fn fetch_boolean_value(
        &self,
        flag_key: &str,
        default_value: bool,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<bool> {
        self.fetch_value(AllowedTypes::BOOLEAN, flag_key, default_value, context)
    }

    /// Resolve a string flag value.
    pub fn fetch_string_value(
        &self,
        flag_key: &str,
        default_value: impl Into<String>,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<String> {
        self.fetch_value(AllowedTypes::STRING, flag_key, default_value.into(), context)
    }

    /// Resolve a numeric flag value. Integral values are returned as `f64`.
    pub fn fetch_number_value(
        &self,
        flag_key: &str,
        default_value: f64,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<f64> {
        self.fetch_value(AllowedTypes::NUMBER, flag_key, default_value, context)
    }

    /// Resolve an integer flag value.
    pub fn fetch_integer_value(
        &self,
        flag_key: &str,
        default_value: i64,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<i64> {
        self.fetch_value(AllowedTypes::INTEGER, flag_key, default_value, context)
    }

    /// Resolve a floating-point flag value.
    pub fn fetch_float_value(
        &self,
        flag_key: &str,
        default_value: f64,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<f64> {
        self.fetch_value(AllowedTypes::FLOAT, flag_key, default_value, context)
    }

    /// Resolve a structured flag value (array or map).
    pub fn fetch_object_value(
        &self,
        flag_key: &str,
        default_value: Value,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<Value> {
        self.fetch_value(AllowedTypes::OBJECT, flag_key, default_value, context)
    }

    fn fetch_value<T>(
        &self,
        allowed_types: AllowedTypes,
        flag_key: &str,
        default_value: T,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<T>
    where
        T: Clone + Into<Value> + TryFrom<Value>,
    {
        let resolver = match &self.resolver {
            Some(resolver) if self.ready_state => resolver,
            _ => {
                let error_code = if self.client.is_none() {
                    ErrorCode::ProviderFatal
                } else {
                    ErrorCode::ProviderNotReady
                };
                log::debug!(target: "kameleoon",
                            flag_key,
                            error_code:display = error_code;
                            "resolving a flag before the provider is ready");
                return ResolutionDetails::error(default_value, error_code, NOT_READY_MESSAGE, None);
            }
        };

        let details = resolver.resolve(
            allowed_types,
            flag_key,
            default_value.clone().into(),
            context,
        );
        if details.is_error() {
            return details.map(|_| default_value);
        }

        match T::try_from(details.value().clone()) {
            Ok(value) => details.map(|_| value),
            Err(_) => {
                log::warn!(target: "kameleoon",
                           flag_key,
                           variant = details.variant();
                           "resolver returned a value of type {:?}, expected one of {:?}",
                           details.value().value_type(),
                           allowed_types.types());
                ResolutionDetails::error(
                    default_value,
                    ErrorCode::TypeMismatch,
                    TYPE_MISMATCH_MESSAGE,
                    details.variant().map(str::to_owned),
                )
            }
        }
    }
}
