use crate::{
    Command, CommandOptions, Driver, QueryResult, Result, RowLabeled, RowsAffected,
    stream::{Stream, StreamExt, TryStreamExt},
};
use std::future::Future;

pub trait Executor: Send + Sized {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// General method to send any command and return any result type (either row or count).
    fn run(
        &mut self,
        command: Command,
        options: CommandOptions,
    ) -> impl Stream<Item = Result<QueryResult>> + Send;

    /// Execute the command and returns the rows.
    fn fetch(
        &mut self,
        command: Command,
        options: CommandOptions,
    ) -> impl Stream<Item = Result<RowLabeled>> + Send {
        self.run(command, options).filter_map(|v| async move {
            match v {
                Ok(QueryResult::Row(v)) => Some(Ok(v)),
                Err(e) => Some(Err(e)),
                _ => None,
            }
        })
    }

    /// Execute the command and return the total number of rows affected.
    fn execute(
        &mut self,
        command: Command,
        options: CommandOptions,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        self.run(command, options)
            .filter_map(|v| async move {
                match v {
                    Ok(QueryResult::Affected(v)) => Some(Ok(v)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                }
            })
            .try_collect()
    }
}

impl<X: Executor> Executor for &mut X {
    type Driver = X::Driver;

    fn driver(&self) -> &Self::Driver {
        (**self).driver()
    }

    fn run(
        &mut self,
        command: Command,
        options: CommandOptions,
    ) -> impl Stream<Item = Result<QueryResult>> + Send {
        (**self).run(command, options)
    }
}
