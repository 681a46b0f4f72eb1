use crate::{SqliteConnection, SqliteDriver};
use ferry_core::{
    Command, CommandOptions, Executor, QueryResult, Result, Transaction, stream::Stream,
};
use libsqlite3_sys::{sqlite3_exec, sqlite3_get_autocommit};
use std::ptr;

/// Transaction over a borrowed connection. Dropped without `commit` or
/// `rollback`, it rolls back.
pub struct SqliteTransaction<'c> {
    connection: &'c mut SqliteConnection,
    finished: bool,
}

impl<'c> SqliteTransaction<'c> {
    pub async fn new(connection: &'c mut SqliteConnection) -> Result<Self> {
        connection
            .execute("BEGIN".into(), CommandOptions::default())
            .await?;
        Ok(Self {
            connection,
            finished: false,
        })
    }

    async fn finish(mut self, sql: &str) -> Result<()> {
        self.connection
            .execute(sql.into(), CommandOptions::default())
            .await?;
        self.finished = true;
        Ok(())
    }
}

impl<'c> Executor for SqliteTransaction<'c> {
    type Driver = SqliteDriver;

    fn driver(&self) -> &SqliteDriver {
        self.connection.driver()
    }

    fn run(
        &mut self,
        command: Command,
        options: CommandOptions,
    ) -> impl Stream<Item = Result<QueryResult>> + Send {
        self.connection.run(command, options)
    }
}

impl<'c> Transaction<'c> for SqliteTransaction<'c> {
    fn commit(self) -> impl Future<Output = Result<()>> + Send {
        self.finish("COMMIT")
    }

    fn rollback(self) -> impl Future<Output = Result<()>> + Send {
        self.finish("ROLLBACK")
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        let connection = *self.connection.connection;
        unsafe {
            if self.finished || sqlite3_get_autocommit(connection) != 0 {
                return;
            }
            log::warn!("Transaction dropped without commit or rollback, rolling back");
            sqlite3_exec(
                connection,
                c"ROLLBACK".as_ptr(),
                None,
                ptr::null_mut(),
                ptr::null_mut(),
            );
        }
    }
}
