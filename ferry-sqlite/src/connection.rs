use crate::{
    CBox, SqliteDriver, SqliteTransaction,
    bind::bind_parameters,
    error_message,
    extract::{extract_name, extract_value},
};
use async_stream::try_stream;
use ferry_core::{
    Command, CommandKind, CommandOptions, Connection, Context, Driver, Error, Executor,
    QueryResult, Result, Row, RowLabeled, RowNames, RowsAffected, as_c_string,
    stream::Stream, truncate_long,
};
use libsqlite3_sys::{
    SQLITE_BUSY, SQLITE_DONE, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE,
    SQLITE_OPEN_URI, SQLITE_ROW, sqlite3, sqlite3_busy_timeout, sqlite3_close,
    sqlite3_column_count, sqlite3_finalize, sqlite3_last_insert_rowid, sqlite3_open_v2,
    sqlite3_prepare_v2, sqlite3_step, sqlite3_stmt, sqlite3_total_changes64,
};
use std::{
    ffi::{c_char, c_int},
    ptr,
    sync::Arc,
};
use tokio::task::spawn_blocking;

pub struct SqliteConnection {
    pub(crate) connection: CBox<sqlite3>,
}

/// Prepares the first statement of `sql[offset..]`, returns it with the offset
/// of the text that follows it. The statement is null when only whitespace or
/// comments are left.
fn prepare(
    connection: *mut sqlite3,
    sql: &str,
    offset: usize,
) -> Result<(CBox<sqlite3_stmt>, usize)> {
    let rest = &sql[offset..];
    let head = rest.as_ptr() as *const c_char;
    let mut statement = CBox::new(ptr::null_mut(), |p| unsafe {
        sqlite3_finalize(p);
    });
    let mut tail: *const c_char = ptr::null();
    let rc = unsafe {
        sqlite3_prepare_v2(
            connection,
            head,
            rest.len() as c_int,
            &mut *statement,
            &mut tail,
        )
    };
    if rc != SQLITE_OK {
        return Err(Error::msg(error_message(connection)));
    }
    let consumed = if tail.is_null() {
        rest.len()
    } else {
        unsafe { tail.offset_from(head) as usize }
    };
    Ok((statement, offset + consumed))
}

fn fail(error: Error) -> Error {
    log::error!("{:#}", error);
    error
}

impl SqliteConnection {
    fn set_timeout(&self, options: &CommandOptions) {
        let timeout = if options.timeout.is_zero() {
            c_int::MAX
        } else {
            options.timeout.as_millis().min(c_int::MAX as u128) as c_int
        };
        unsafe {
            sqlite3_busy_timeout(*self.connection, timeout);
        }
    }
}

impl Executor for SqliteConnection {
    type Driver = SqliteDriver;

    fn driver(&self) -> &Self::Driver {
        &SqliteDriver
    }

    /// Runs each statement of the command text in order. Every statement that
    /// is not a plain read also reports the rows it changed.
    fn run(
        &mut self,
        command: Command,
        options: CommandOptions,
    ) -> impl Stream<Item = Result<QueryResult>> + Send {
        self.set_timeout(&options);
        let connection = self.connection.borrowed();
        try_stream! {
            if options.kind != CommandKind::Text {
                Err::<(), Error>(fail(Error::msg(format!(
                    "Sqlite supports only text commands, not {:?}",
                    options.kind
                ))))?;
            }
            let context = format!("While executing the command:\n{}", truncate_long!(command.text));
            log::trace!("{}", command.text);
            let sql: Arc<str> = command.text.into();
            let parameters = Arc::new(command.parameters);
            let mut offset = 0;
            while offset < sql.len() {
                let (statement, next) = {
                    let connection = connection.borrowed();
                    let sql = sql.clone();
                    let parameters = parameters.clone();
                    spawn_blocking(move || {
                        let (statement, next) = prepare(*connection, &sql, offset)?;
                        if !statement.is_null() {
                            bind_parameters(*statement, &parameters)?;
                        }
                        Ok::<_, Error>((statement, next))
                    })
                    .await
                    .map_err(Error::new)
                    .and_then(|v| v)
                    .with_context(|| context.clone())
                    .map_err(fail)?
                };
                offset = next;
                if statement.is_null() {
                    continue;
                }
                let count = unsafe { sqlite3_column_count(*statement) };
                let labels = (0..count)
                    .map(|i| extract_name(*statement, i))
                    .collect::<Result<RowNames>>()?;
                let changes = unsafe { sqlite3_total_changes64(*connection) };
                let last_id = unsafe { sqlite3_last_insert_rowid(*connection) };
                loop {
                    match unsafe { sqlite3_step(*statement) } {
                        SQLITE_ROW => {
                            let values = (0..count)
                                .map(|i| extract_value(*statement, i))
                                .collect::<Result<Row>>()?;
                            yield QueryResult::Row(RowLabeled::new(labels.clone(), values));
                        }
                        SQLITE_DONE => break,
                        rc => {
                            let message = error_message(*connection);
                            let error = if rc == SQLITE_BUSY {
                                Error::msg(format!("The database is busy: {message}"))
                            } else {
                                Error::msg(message)
                            };
                            Err::<(), Error>(fail(error.context(context.clone())))?;
                        }
                    }
                }
                let rows_affected = unsafe { sqlite3_total_changes64(*connection) } - changes;
                if count == 0 || rows_affected > 0 {
                    let inserted = unsafe { sqlite3_last_insert_rowid(*connection) };
                    yield QueryResult::Affected(RowsAffected {
                        rows_affected: rows_affected.max(0) as u64,
                        last_affected_id: (inserted != last_id).then_some(inserted),
                    });
                }
            }
        }
    }
}

impl Connection for SqliteConnection {
    type Transaction<'c> = SqliteTransaction<'c>;

    /// Opens `sqlite://<path>[?<options>]`, e.g. `sqlite://data.db?mode=rwc`
    /// or `sqlite://:memory:`. The rest of the URL is handed to SQLite as a
    /// `file:` URI.
    async fn connect(url: &str) -> Result<SqliteConnection> {
        let prefix = format!("{}://", <SqliteDriver as Driver>::NAME);
        let Some(path) = url.strip_prefix(&prefix) else {
            return Err(fail(Error::msg(format!(
                "Expected sqlite connection url to start with `{}`",
                &prefix
            ))));
        };
        let uri = as_c_string(format!("file:{path}"));
        let mut connection = CBox::new(ptr::null_mut(), |p| unsafe {
            sqlite3_close(p);
        });
        let rc = unsafe {
            sqlite3_open_v2(
                uri.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_URI,
                ptr::null(),
            )
        };
        if rc != SQLITE_OK {
            let error = Error::msg(error_message(*connection))
                .context(format!("While opening the database `{url}`"));
            return Err(fail(error));
        }
        log::debug!("Connected to `{url}`");
        Ok(Self { connection })
    }

    async fn begin(&mut self) -> Result<SqliteTransaction<'_>> {
        SqliteTransaction::new(self).await
    }
}
