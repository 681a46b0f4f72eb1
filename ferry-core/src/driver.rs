use crate::{Connection, Dialect, Result};
use std::future::Future;

/// Entry point of a database backend.
pub trait Driver: Default + Send + Sync {
    type Connection: Connection<Driver = Self>;

    /// Identity used to pick the dialect, e.g. `sqlite`.
    const NAME: &'static str;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Syntax profile of the backend.
    fn dialect(&self) -> Dialect {
        Dialect::for_driver(Self::NAME)
    }

    fn connect(&self, url: &str) -> impl Future<Output = Result<Self::Connection>> + Send {
        <Self::Connection as Connection>::connect(url)
    }
}
