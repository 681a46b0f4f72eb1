use crate::{Executor, Result, Transaction};
use std::future::Future;

pub trait Connection: Executor {
    type Transaction<'c>: Transaction<'c>
    where
        Self: 'c;

    /// Open a connection to the given URL.
    fn connect(url: &str) -> impl Future<Output = Result<Self>> + Send;

    /// Start a transaction, it borrows the connection until committed or rolled back.
    fn begin(&mut self) -> impl Future<Output = Result<Self::Transaction<'_>>> + Send;
}
