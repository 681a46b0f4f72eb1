use crate::{
    AsValue, Command, CommandBuilder, CommandOptions, Context, Dialect, Driver, Entity, Error,
    Executor, FromRow, FromSplitRow, MappingError, QueryOptions, QueryResult, Registry, Result,
    RowLabeled, RowsAffected, Value, change_type,
    stream::{BoxStream, Stream, StreamExt, TryStreamExt},
    truncate_long,
};
use std::{
    pin::{Pin, pin},
    sync::Arc,
    task::{Context as TaskContext, Poll},
    vec,
};

/// Runs commands on an executor and maps their results.
///
/// The executor may be a connection, a `&mut` connection or a transaction.
/// ```ignore
/// let mut mapper = DataMapper::new(&mut connection, registry.clone());
/// let id = mapper.insert(&mut character, Default::default()).await?;
/// let found = mapper.find::<Character>(id, &[], Default::default()).await?;
/// ```
pub struct DataMapper<X: Executor> {
    executor: X,
    registry: Arc<Registry>,
    dialect: Dialect,
}

impl<X: Executor> DataMapper<X> {
    /// Uses the dialect of the executor's driver.
    pub fn new(executor: X, registry: Arc<Registry>) -> Self {
        let dialect = executor.driver().dialect();
        Self {
            executor,
            registry,
            dialect,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn executor(&mut self) -> &mut X {
        &mut self.executor
    }

    pub fn into_inner(self) -> X {
        self.executor
    }

    /// Command builder bound to the dialect and the registry of this mapper.
    pub fn builder(&self) -> CommandBuilder<'_> {
        CommandBuilder::new(self.dialect.clone(), &self.registry)
    }

    /// Executes the command and returns the total number of rows affected.
    pub async fn execute(
        &mut self,
        command: impl Into<Command>,
        options: CommandOptions,
    ) -> Result<RowsAffected> {
        let command = command.into();
        let context = format!("While executing the command:\n{}", truncate_long!(command.text));
        log::debug!("{}", command.text);
        self.executor
            .execute(command, options)
            .await
            .context(context)
            .map_err(log_error)
    }

    /// Executes the query and maps every row into `T`.
    ///
    /// Buffered queries read and map all the rows before returning, the first
    /// failure is returned immediately. Otherwise rows are mapped while the
    /// returned stream is polled, which ends after the first failure.
    pub async fn query<T: FromRow + 'static>(
        &mut self,
        command: impl Into<Command>,
        options: QueryOptions,
    ) -> Result<Rows<'_, T>> {
        let registry = self.registry.clone();
        self.rows(command.into(), options, move |row| T::from_row(&registry, row))
            .await
    }

    /// Executes the query and splits every row into the targets of `T`.
    ///
    /// `split_on` names the first column of each target after the first one,
    /// a single name is used for every cut.
    pub async fn query_split<T: FromSplitRow + 'static>(
        &mut self,
        command: impl Into<Command>,
        split_on: &[&str],
        options: QueryOptions,
    ) -> Result<Rows<'_, T::Output>>
    where
        T::Output: 'static,
    {
        let registry = self.registry.clone();
        let split_on: Vec<String> = split_on.iter().map(|v| v.to_string()).collect();
        self.rows(command.into(), options, move |row| {
            let boundaries: Vec<&str> = split_on.iter().map(String::as_str).collect();
            T::from_split_row(&registry, row, &boundaries)
        })
        .await
    }

    /// First row of the query, `EmptyResult` when there is none.
    pub async fn query_first<T: FromRow + 'static>(
        &mut self,
        command: impl Into<Command>,
        options: CommandOptions,
    ) -> Result<T> {
        match self.query_first_or_default(command, options).await? {
            Some(v) => Ok(v),
            None => Err(log_error(MappingError::EmptyResult.into())),
        }
    }

    /// First row of the query, if any.
    pub async fn query_first_or_default<T: FromRow + 'static>(
        &mut self,
        command: impl Into<Command>,
        options: CommandOptions,
    ) -> Result<Option<T>> {
        let mut rows = self
            .query::<T>(command, QueryOptions::from(options).buffered(false))
            .await?;
        rows.try_next().await
    }

    /// The only row of the query, `EmptyResult` or `MultipleResults` otherwise.
    pub async fn query_single<T: FromRow + 'static>(
        &mut self,
        command: impl Into<Command>,
        options: CommandOptions,
    ) -> Result<T> {
        let mut rows = self
            .query::<T>(command, QueryOptions::from(options).buffered(false))
            .await?;
        let Some(row) = rows.try_next().await? else {
            return Err(log_error(MappingError::EmptyResult.into()));
        };
        if rows.try_next().await?.is_some() {
            return Err(log_error(MappingError::MultipleResults.into()));
        }
        Ok(row)
    }

    /// The only row of the query, `None` when the query returns no row or more than one.
    pub async fn query_single_or_default<T: FromRow + 'static>(
        &mut self,
        command: impl Into<Command>,
        options: CommandOptions,
    ) -> Result<Option<T>> {
        let mut rows = self
            .query::<T>(command, QueryOptions::from(options).buffered(false))
            .await?;
        let Some(row) = rows.try_next().await? else {
            return Ok(None);
        };
        if rows.try_next().await?.is_some() {
            return Ok(None);
        }
        Ok(Some(row))
    }

    /// First column of the first row converted to `T`. A query without rows
    /// yields `NULL` converted to `T`.
    pub async fn scalar<T: AsValue>(
        &mut self,
        command: impl Into<Command>,
        options: CommandOptions,
    ) -> Result<T> {
        let row = self
            .query_first_or_default::<RowLabeled>(command, options)
            .await?;
        let value = row
            .and_then(|v| v.values.into_vec().into_iter().next())
            .unwrap_or_default();
        change_type(value).map_err(log_error)
    }

    /// Inserts the entity, assigns the generated identity back to it and returns it.
    ///
    /// The identity is read from the first row returned by the command, or
    /// from the last inserted id reported by the driver.
    pub async fn insert<E: Entity>(&mut self, entity: &mut E, options: CommandOptions) -> Result<i64> {
        let table = self.registry.resolve::<E>()?;
        let identity = table.require_identity()?;
        let command = self.builder().build_insert(&*entity)?;
        let context = format!("While executing the insert:\n{}", truncate_long!(command.text));
        log::debug!("{}", command.text);
        let mut id = Value::Null;
        let mut last_affected_id = None;
        {
            let mut stream = pin!(self.executor.run(command, options));
            while let Some(result) = stream
                .try_next()
                .await
                .with_context(|| context.clone())
                .map_err(log_error)?
            {
                match result {
                    QueryResult::Row(row) if id.is_null() => {
                        id = row.values.into_vec().into_iter().next().unwrap_or_default();
                    }
                    QueryResult::Affected(affected) if affected.last_affected_id.is_some() => {
                        last_affected_id = affected.last_affected_id;
                    }
                    _ => {}
                }
            }
        }
        if id.is_null() {
            id = Value::Int64(last_affected_id);
        }
        if id.is_null() {
            let error = Error::msg(format!(
                "The insert into `{}` did not return the generated identity",
                table.table().full_name()
            ));
            return Err(log_error(error));
        }
        let id: i64 = change_type(id).map_err(log_error)?;
        entity.set_column_value(&identity.field, Value::Int64(Some(id)))?;
        Ok(id)
    }

    /// The entity with the given identity, loading only `columns` (all when empty).
    pub async fn find<E: Entity>(
        &mut self,
        id: impl Into<Value>,
        columns: &[&str],
        options: CommandOptions,
    ) -> Result<Option<E>> {
        let command = self.builder().build_select::<E>(id, columns)?;
        self.query_single_or_default::<E>(command, options).await
    }

    pub async fn exists<E: Entity>(
        &mut self,
        id: impl Into<Value>,
        options: CommandOptions,
    ) -> Result<bool> {
        let command = self.builder().build_exists::<E>(id)?;
        self.scalar::<bool>(command, options).await
    }

    /// Updates `columns` of the entity (all persisted ones when empty), returns the rows affected.
    pub async fn update<E: Entity>(
        &mut self,
        entity: &E,
        columns: &[&str],
        options: CommandOptions,
    ) -> Result<u64> {
        let command = self.builder().build_update(entity, columns)?;
        Ok(self.execute(command, options).await?.rows_affected)
    }

    /// Deletes the entity, returns whether some row was deleted.
    pub async fn delete<E: Entity>(&mut self, entity: &E, options: CommandOptions) -> Result<bool> {
        let command = self.builder().build_delete(entity)?;
        let affected = self.execute(command, options).await?.rows_affected;
        if affected != 1 {
            log::info!(
                "Deleting a `{}` affected {} rows",
                std::any::type_name::<E>(),
                affected
            );
        }
        Ok(affected > 0)
    }

    async fn rows<'s, U: 'static>(
        &'s mut self,
        command: Command,
        options: QueryOptions,
        mut map: impl FnMut(RowLabeled) -> Result<U> + Send + 's,
    ) -> Result<Rows<'s, U>> {
        let context = format!("While executing the query:\n{}", truncate_long!(command.text));
        log::debug!("{}", command.text);
        let stream = self
            .executor
            .fetch(command, options.command)
            .map(move |row| row.and_then(&mut map));
        if options.buffered {
            let rows = stream
                .try_collect::<Vec<_>>()
                .await
                .context(context)
                .map_err(log_error)?;
            Ok(Rows::Buffered(rows.into_iter()))
        } else {
            Ok(Rows::Streaming(Some(stream.boxed())))
        }
    }
}

fn log_error(error: Error) -> Error {
    log::error!("{:#}", error);
    error
}

/// Mapped rows of a query.
pub enum Rows<'a, T> {
    /// Every row was already read and mapped.
    Buffered(vec::IntoIter<T>),
    /// Rows are read and mapped on demand, the underlying result is released
    /// once the stream ends, fails or is dropped.
    Streaming(Option<BoxStream<'a, Result<T>>>),
}

impl<T> Rows<'_, T> {
    pub fn is_buffered(&self) -> bool {
        matches!(self, Rows::Buffered(..))
    }

    /// Collects the remaining rows.
    pub async fn into_vec(self) -> Result<Vec<T>> {
        match self {
            Rows::Buffered(rows) => Ok(rows.collect()),
            rows => rows.try_collect().await,
        }
    }
}

impl<T> Unpin for Rows<'_, T> {}

impl<T> Stream for Rows<'_, T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        match self.get_mut() {
            Rows::Buffered(rows) => Poll::Ready(rows.next().map(Ok)),
            Rows::Streaming(stream) => {
                let Some(inner) = stream.as_mut() else {
                    return Poll::Ready(None);
                };
                let result = futures::ready!(inner.as_mut().poll_next(cx));
                if !matches!(result, Some(Ok(..))) {
                    *stream = None;
                }
                Poll::Ready(result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Connection, Record, Transaction,
        fixture::{Character, CharacterGender, cedric},
        stream,
    };
    use std::collections::VecDeque;

    #[derive(Default)]
    struct MockDriver;

    impl Driver for MockDriver {
        type Connection = MockConnection;
        const NAME: &'static str = "sqlite";
    }

    #[derive(Default)]
    struct MockConnection {
        driver: MockDriver,
        responses: VecDeque<Vec<Result<QueryResult>>>,
        commands: Vec<Command>,
        outcome: Option<&'static str>,
    }

    impl MockConnection {
        fn respond(mut self, results: Vec<QueryResult>) -> Self {
            self.responses
                .push_back(results.into_iter().map(Ok).collect());
            self
        }

        fn fail(mut self, message: &'static str) -> Self {
            self.responses.push_back(vec![Err(Error::msg(message))]);
            self
        }
    }

    impl Executor for MockConnection {
        type Driver = MockDriver;

        fn driver(&self) -> &Self::Driver {
            &self.driver
        }

        fn run(
            &mut self,
            command: Command,
            _options: CommandOptions,
        ) -> impl Stream<Item = Result<QueryResult>> + Send {
            self.commands.push(command);
            stream::iter(self.responses.pop_front().unwrap_or_default())
        }
    }

    impl Connection for MockConnection {
        type Transaction<'c> = MockTransaction<'c>;

        async fn connect(_url: &str) -> Result<Self> {
            Ok(Default::default())
        }

        async fn begin(&mut self) -> Result<MockTransaction<'_>> {
            Ok(MockTransaction { connection: self })
        }
    }

    struct MockTransaction<'c> {
        connection: &'c mut MockConnection,
    }

    impl Executor for MockTransaction<'_> {
        type Driver = MockDriver;

        fn driver(&self) -> &Self::Driver {
            &self.connection.driver
        }

        fn run(
            &mut self,
            command: Command,
            options: CommandOptions,
        ) -> impl Stream<Item = Result<QueryResult>> + Send {
            self.connection.run(command, options)
        }
    }

    impl<'c> Transaction<'c> for MockTransaction<'c> {
        async fn commit(self) -> Result<()> {
            let connection = self.connection;
            connection.outcome = Some("commit");
            Ok(())
        }

        async fn rollback(self) -> Result<()> {
            let connection = self.connection;
            connection.outcome = Some("rollback");
            Ok(())
        }
    }

    fn character_row(id: i64, first_name: &str) -> QueryResult {
        RowLabeled::from_iter([
            ("ID", Value::Int64(Some(id))),
            ("firstName", Value::Varchar(Some(first_name.into()))),
            ("gender", Value::Varchar(Some("hobbit".into()))),
            ("lastName", Value::Null),
        ])
        .into()
    }

    fn scalar_row(value: Value) -> QueryResult {
        RowLabeled::from_iter([("value", value)]).into()
    }

    fn affected(rows_affected: u64, last_affected_id: Option<i64>) -> QueryResult {
        RowsAffected {
            rows_affected,
            last_affected_id,
        }
        .into()
    }

    fn mapper(connection: MockConnection) -> DataMapper<MockConnection> {
        DataMapper::new(connection, Arc::new(Registry::new()))
    }

    #[tokio::test]
    async fn query_buffered_and_streaming() {
        let connection = MockConnection::default()
            .respond(vec![character_row(1, "Frodo"), affected(0, None), character_row(2, "Sam")])
            .respond(vec![character_row(3, "Pippin")]);
        let mut mapper = mapper(connection);

        let rows = mapper
            .query::<Character>("SELECT * FROM Characters", QueryOptions::default())
            .await
            .expect("Buffered query failed");
        assert!(rows.is_buffered());
        let rows = rows.into_vec().await.expect("Could not collect the rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].first_name, "Frodo");
        assert_eq!(rows[1].id, 2);
        assert_eq!(rows[1].gender, CharacterGender::Hobbit);
        assert_eq!(rows[1].last_name, None);

        let rows = mapper
            .query::<Record>(
                ("SELECT * FROM Characters WHERE ID = @id", vec![Value::Int64(Some(3))]),
                QueryOptions::default().buffered(false),
            )
            .await
            .expect("Streaming query failed");
        assert!(!rows.is_buffered());
        let rows = rows.into_vec().await.expect("Could not collect the rows");
        assert_eq!(rows[0]["firstName"], Value::Varchar(Some("Pippin".into())));

        let commands = &mapper.executor().commands;
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].parameters.len(), 1);
    }

    #[tokio::test]
    async fn buffered_query_fails_on_driver_error() {
        let mut mapper = mapper(MockConnection::default().fail("disk I/O error"));
        let result = mapper
            .query::<Character>("SELECT * FROM Characters", QueryOptions::default())
            .await;
        let error = result.err().expect("The query should fail");
        assert!(format!("{error:#}").contains("disk I/O error"));
    }

    #[tokio::test]
    async fn first_and_single() {
        let connection = MockConnection::default()
            .respond(vec![])
            .respond(vec![character_row(1, "Frodo"), character_row(2, "Sam")])
            .respond(vec![character_row(1, "Frodo"), character_row(2, "Sam")])
            .respond(vec![character_row(1, "Frodo"), character_row(2, "Sam")])
            .respond(vec![]);
        let mut mapper = mapper(connection);
        let options = CommandOptions::default();

        let error = mapper
            .query_first::<Character>("SELECT 1", options)
            .await
            .expect_err("Empty result should fail");
        assert_eq!(
            error.downcast_ref::<MappingError>(),
            Some(&MappingError::EmptyResult)
        );

        let first = mapper
            .query_first::<Character>("SELECT 2", options)
            .await
            .expect("First row expected");
        assert_eq!(first.first_name, "Frodo");

        let error = mapper
            .query_single::<Character>("SELECT 3", options)
            .await
            .expect_err("Two rows should fail");
        assert_eq!(
            error.downcast_ref::<MappingError>(),
            Some(&MappingError::MultipleResults)
        );

        let single = mapper
            .query_single_or_default::<Character>("SELECT 4", options)
            .await
            .expect("Query failed");
        assert_eq!(single, None);

        let single = mapper
            .query_single_or_default::<Character>("SELECT 5", options)
            .await
            .expect("Query failed");
        assert_eq!(single, None);
    }

    #[tokio::test]
    async fn scalar_values() {
        let connection = MockConnection::default()
            .respond(vec![scalar_row(Value::Varchar(Some("42".into())))])
            .respond(vec![])
            .respond(vec![])
            .respond(vec![scalar_row(Value::Int64(Some(1)))]);
        let mut mapper = mapper(connection);
        let options = CommandOptions::default();
        assert_eq!(mapper.scalar::<i32>("SELECT '42'", options).await.unwrap(), 42);
        assert_eq!(mapper.scalar::<i64>("SELECT NULL", options).await.unwrap(), 0);
        assert_eq!(
            mapper.scalar::<Option<String>>("SELECT NULL", options).await.unwrap(),
            None
        );
        assert!(mapper.exists::<Character>(1000, options).await.unwrap());
        assert_eq!(
            mapper.executor().commands[3].text,
            r#"SELECT 1 FROM "main"."Characters" WHERE "ID" = @ID"#
        );
    }

    #[tokio::test]
    async fn insert_assigns_identity() {
        let connection = MockConnection::default()
            .respond(vec![scalar_row(Value::Int64(Some(42))), affected(1, Some(42))])
            .respond(vec![affected(1, Some(7))])
            .respond(vec![affected(1, None)]);
        let mut mapper = mapper(connection);
        let options = CommandOptions::default();

        let mut character = cedric();
        character.id = 0;
        assert_eq!(mapper.insert(&mut character, options).await.unwrap(), 42);
        assert_eq!(character.id, 42);
        assert!(mapper.executor().commands[0].text.ends_with(r#"RETURNING "ID""#));
        assert_eq!(mapper.executor().commands[0].parameters.len(), 3);

        assert_eq!(mapper.insert(&mut character, options).await.unwrap(), 7);
        assert_eq!(character.id, 7);

        assert!(mapper.insert(&mut character, options).await.is_err());
        assert_eq!(character.id, 7);
    }

    #[tokio::test]
    async fn entity_operations() {
        let connection = MockConnection::default()
            .respond(vec![character_row(1000, "Cédric")])
            .respond(vec![affected(1, None)])
            .respond(vec![affected(0, None)])
            .respond(vec![]);
        let mut mapper = mapper(connection);
        let options = CommandOptions::default();

        let found = mapper
            .find::<Character>(1000, &["firstName"], options)
            .await
            .unwrap()
            .expect("Character 1000 exists");
        assert_eq!(found.first_name, "Cédric");
        assert_eq!(
            mapper.executor().commands[0].text,
            r#"SELECT "ID", "firstName" FROM "main"."Characters" WHERE "ID" = @ID"#
        );

        assert_eq!(
            mapper.update(&cedric(), &["lastName"], options).await.unwrap(),
            1
        );
        assert_eq!(mapper.executor().commands[1].parameters.len(), 2);

        assert!(!mapper.delete(&cedric(), options).await.unwrap());
        assert!(!mapper.exists::<Character>(1, options).await.unwrap());
    }

    #[tokio::test]
    async fn split_query() {
        let row: QueryResult = RowLabeled::from_iter([
            ("Id", Value::Int64(Some(1))),
            ("Name", Value::Varchar(Some("Frodo".into()))),
            ("Id", Value::Null),
            ("Name", Value::Null),
        ])
        .into();
        let mut mapper = mapper(MockConnection::default().respond(vec![row]));
        let rows = mapper
            .query_split::<(Record, Record)>("SELECT ...", &["Id"], QueryOptions::default())
            .await
            .unwrap()
            .into_vec()
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        let (left, right) = &rows[0];
        assert_eq!(
            left.as_ref().map(|v| v["Name"].clone()),
            Some(Value::Varchar(Some("Frodo".into())))
        );
        assert!(right.is_none());
    }

    #[tokio::test]
    async fn transaction_commit_and_rollback() {
        let registry = Arc::new(Registry::new());
        let mut connection = MockConnection::connect("mock://")
            .await
            .unwrap()
            .respond(vec![affected(1, None)]);
        {
            let transaction = connection.begin().await.unwrap();
            let mut mapper = DataMapper::new(transaction, registry.clone());
            mapper
                .execute("DELETE FROM Characters", CommandOptions::default())
                .await
                .unwrap();
            mapper.into_inner().commit().await.unwrap();
        }
        assert_eq!(connection.outcome, Some("commit"));
        {
            let transaction = connection.begin().await.unwrap();
            transaction.rollback().await.unwrap();
        }
        assert_eq!(connection.outcome, Some("rollback"));
        assert_eq!(connection.commands.len(), 1);
    }
}
