//! Creation and reuse of Kameleoon clients per site code.
use std::{
    collections::{hash_map::Entry, HashMap},
    sync::RwLock,
};

use crate::{client::SharedClient, ClientConfig, Error, Result};

/// Creates Kameleoon clients for the provider and forgets them on shutdown.
pub trait ClientFactory {
    /// Return a client for `site_code`, creating it if needed.
    fn create(&self, site_code: &str, config: Option<&ClientConfig>) -> Result<SharedClient>;

    /// Drop any client kept for `site_code`. The next [`create`](ClientFactory::create) builds
    /// a new one.
    fn forget(&self, site_code: &str);
}

/// [`ClientFactory`] that keeps one client per site code.
///
/// Clients are built by the closure given to [`CachingClientFactory::new`] and reused by every
/// later `create` call for the same site code until [`forget`](ClientFactory::forget) is called.
/// The configuration passed to `create` is only used when a new client is built.
///
/// The closure runs without holding the cache lock, so a slow client construction does not block
/// other site codes. If two threads build a client for the same site code at once, the first one
/// stored wins and the other is dropped.
///
/// # Examples
/// ```no_run
/// # use kameleoon_openfeature::{CachingClientFactory, ClientConfig, SharedClient};
/// # fn connect(site_code: &str, config: Option<&ClientConfig>) -> kameleoon_openfeature::Result<SharedClient> { todo!() }
/// let factory = CachingClientFactory::new(connect);
/// ```
pub struct CachingClientFactory<F> {
    make_client: F,
    clients: RwLock<HashMap<String, SharedClient>>,
}

impl<F> CachingClientFactory<F>
where
    F: Fn(&str, Option<&ClientConfig>) -> Result<SharedClient>,
{
    /// Create a factory building clients with `make_client`.
    pub fn new(make_client: F) -> Self {
        CachingClientFactory {
            make_client,
            clients: RwLock::new(HashMap::new()),
        }
    }
}

impl<F> ClientFactory for CachingClientFactory<F>
where
    F: Fn(&str, Option<&ClientConfig>) -> Result<SharedClient>,
{
    fn create(&self, site_code: &str, config: Option<&ClientConfig>) -> Result<SharedClient> {
        if site_code.is_empty() {
            return Err(Error::SiteCodeIsEmpty);
        }

        if let Some(client) = self
            .clients
            .read()
            .expect("thread holding clients lock should not panic")
            .get(site_code)
        {
            return Ok(client.clone());
        }

        let client = (self.make_client)(site_code, config)?;

        let mut clients = self
            .clients
            .write()
            .expect("thread holding clients lock should not panic");

        // Another thread may have stored a client while this one was being built.
        match clients.entry(site_code.to_owned()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                log::debug!(target: "kameleoon", site_code; "created Kameleoon client");
                Ok(entry.insert(client).clone())
            }
        }
    }

    fn forget(&self, site_code: &str) {
        let removed = self
            .clients
            .write()
            .expect("thread holding clients lock should not panic")
            .remove(site_code);
        if removed.is_some() {
            log::debug!(target: "kameleoon", site_code; "forgot Kameleoon client");
        }
    }
}
