#[cfg(test)]
mod tests {
    use ferry::{
        CommandKind, CommandOptions, Connection, DataMapper, Driver, Entity, Enumeration,
        MappingError, QueryOptions, Record, Registry, Transaction, Value,
        stream::TryStreamExt,
    };
    use ferry_sqlite::{SqliteConnection, SqliteDriver};
    use indoc::indoc;
    use log::LevelFilter;
    use std::{env, sync::Arc};

    fn init_logs() {
        let mut logger = env_logger::builder();
        logger
            .is_test(true)
            .format_file(true)
            .format_line_number(true);
        if env::var("RUST_LOG").is_err() {
            logger.filter_level(LevelFilter::Warn);
        }
        let _ = logger.try_init();
    }

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Enumeration)]
    enum CharacterGender {
        Balrog,
        DarkLord,
        Dwarf,
        Elf,
        Hobbit,
        #[default]
        Human,
        Istari,
    }

    #[derive(Debug, Default, Clone, PartialEq, Entity)]
    #[ferry(name = "Characters", schema = "main")]
    struct Character {
        #[ferry(identity, name = "ID")]
        id: i64,
        #[ferry(name = "firstName")]
        first_name: String,
        gender: CharacterGender,
        #[ferry(name = "lastName")]
        last_name: Option<String>,
        #[ferry(computed, name = "fullName")]
        full_name: String,
    }

    const SCHEMA: &str = indoc! {"
        CREATE TABLE Characters (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            firstName TEXT NOT NULL,
            gender INTEGER NOT NULL,
            lastName TEXT,
            fullName TEXT GENERATED ALWAYS AS (trim(firstName || ' ' || coalesce(lastName, ''))) VIRTUAL
        );
    "};

    fn character(first_name: &str, gender: CharacterGender, last_name: Option<&str>) -> Character {
        Character {
            first_name: first_name.into(),
            gender,
            last_name: last_name.map(Into::into),
            ..Default::default()
        }
    }

    async fn open() -> SqliteConnection {
        init_logs();
        let mut connection = SqliteDriver::new()
            .connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        let mut mapper = DataMapper::new(&mut connection, Arc::new(Registry::new()));
        mapper
            .execute(SCHEMA, CommandOptions::default())
            .await
            .expect("Could not create the table");
        connection
    }

    #[tokio::test]
    async fn wrong_url() {
        init_logs();
        assert!(SqliteConnection::connect("duckdb://some_value").await.is_err());
        assert!(
            SqliteConnection::connect("sqlite://../target/missing/dir/db.sqlite?mode=ro")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn entity_round_trip() {
        let mut connection = open().await;
        let mut mapper = DataMapper::new(&mut connection, Arc::new(Registry::new()));
        let options = CommandOptions::default();

        let mut cedric = character("Cédric", CharacterGender::DarkLord, None);
        let id = mapper
            .insert(&mut cedric, options)
            .await
            .expect("Could not insert the character");
        assert_eq!(id, 1);
        assert_eq!(cedric.id, 1);

        let found = mapper
            .find::<Character>(id, &[], options)
            .await
            .expect("Could not find the character")
            .expect("The character should exist");
        assert_eq!(found.id, 1);
        assert_eq!(found.first_name, "Cédric");
        assert_eq!(found.gender, CharacterGender::DarkLord);
        assert_eq!(found.last_name, None);
        assert_eq!(found.full_name, "Cédric");

        let partial = mapper
            .find::<Character>(id, &["firstName"], options)
            .await
            .expect("Could not find the character")
            .expect("The character should exist");
        assert_eq!(partial.first_name, "Cédric");
        assert_eq!(partial.gender, CharacterGender::default());

        cedric.last_name = Some("Belin".into());
        cedric.first_name = "Not saved".into();
        let updated = mapper
            .update(&cedric, &["lastName"], options)
            .await
            .expect("Could not update the character");
        assert_eq!(updated, 1);
        let found = mapper
            .find::<Character>(id, &[], options)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.first_name, "Cédric");
        assert_eq!(found.full_name, "Cédric Belin");

        assert!(mapper.exists::<Character>(id, options).await.unwrap());
        assert!(mapper.delete(&cedric, options).await.unwrap());
        assert!(!mapper.delete(&cedric, options).await.unwrap());
        assert!(!mapper.exists::<Character>(id, options).await.unwrap());
        assert_eq!(
            mapper.find::<Character>(id, &[], options).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn queries() {
        let mut connection = open().await;
        let mut mapper = DataMapper::new(&mut connection, Arc::new(Registry::new()));
        let options = CommandOptions::default();
        for mut character in [
            character("Frodo", CharacterGender::Hobbit, Some("Baggins")),
            character("Samwise", CharacterGender::Hobbit, Some("Gamgee")),
            character("Gandalf", CharacterGender::Istari, None),
        ] {
            mapper.insert(&mut character, options).await.unwrap();
        }

        let hobbits = mapper
            .query::<Character>(
                (
                    "SELECT * FROM Characters WHERE gender = @gender ORDER BY ID",
                    [("gender", CharacterGender::Hobbit)],
                ),
                QueryOptions::default(),
            )
            .await
            .expect("Could not query the hobbits")
            .into_vec()
            .await
            .unwrap();
        assert_eq!(hobbits.len(), 2);
        assert_eq!(hobbits[0].full_name, "Frodo Baggins");
        assert_eq!(hobbits[1].last_name.as_deref(), Some("Gamgee"));

        let names = mapper
            .query::<Record>(
                "SELECT firstName AS name, gender FROM Characters ORDER BY ID DESC",
                QueryOptions::default().buffered(false),
            )
            .await
            .unwrap()
            .try_collect::<Vec<_>>()
            .await
            .unwrap();
        assert_eq!(names.len(), 3);
        assert_eq!(names[0]["name"], Value::Varchar(Some("Gandalf".into())));
        assert_eq!(
            names[0].get_as::<CharacterGender>("gender").unwrap(),
            CharacterGender::Istari
        );

        let first_name = mapper
            .scalar::<String>(
                ("SELECT firstName FROM Characters WHERE ID = ?", vec![Value::Int64(Some(2))]),
                options,
            )
            .await
            .unwrap();
        assert_eq!(first_name, "Samwise");
        let count = mapper
            .scalar::<i64>("SELECT COUNT(*) FROM Characters", options)
            .await
            .unwrap();
        assert_eq!(count, 3);

        let error = mapper
            .query_single::<Character>("SELECT * FROM Characters", options)
            .await
            .expect_err("Three rows are not a single one");
        assert_eq!(
            error.downcast_ref::<MappingError>(),
            Some(&MappingError::MultipleResults)
        );
        let error = mapper
            .query_first::<Character>("SELECT * FROM Characters WHERE ID > 100", options)
            .await
            .expect_err("No row expected");
        assert_eq!(
            error.downcast_ref::<MappingError>(),
            Some(&MappingError::EmptyResult)
        );

        let pairs = mapper
            .query_split::<(Character, Record)>(
                "SELECT c.*, o.ID, o.firstName FROM Characters c \
                 LEFT JOIN Characters o ON o.ID = c.ID + 1 ORDER BY c.ID",
                &["ID"],
                QueryOptions::default(),
            )
            .await
            .unwrap()
            .into_vec()
            .await
            .unwrap();
        assert_eq!(pairs.len(), 3);
        let (frodo, next) = &pairs[0];
        assert_eq!(frodo.as_ref().map(|v| v.first_name.as_str()), Some("Frodo"));
        assert_eq!(
            next.as_ref().map(|v| v["firstName"].clone()),
            Some(Value::Varchar(Some("Samwise".into())))
        );
        let (gandalf, next) = &pairs[2];
        assert_eq!(gandalf.as_ref().map(|v| v.id), Some(3));
        assert!(next.is_none());

        let affected = mapper
            .execute(
                "UPDATE Characters SET gender = 0 WHERE gender = 4; DELETE FROM Characters WHERE ID = 3",
                options,
            )
            .await
            .unwrap();
        assert_eq!(affected.rows_affected, 3);

        assert!(
            mapper
                .execute("SELECT 1", options.kind(CommandKind::StoredProcedure))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn transactions() {
        let mut connection = open().await;
        let registry = Arc::new(Registry::new());
        let options = CommandOptions::default();

        let transaction = connection.begin().await.expect("Could not begin");
        let mut mapper = DataMapper::new(transaction, registry.clone());
        mapper
            .insert(&mut character("Saruman", CharacterGender::Istari, None), options)
            .await
            .unwrap();
        mapper.into_inner().rollback().await.expect("Could not roll back");

        let transaction = connection.begin().await.expect("Could not begin");
        let mut mapper = DataMapper::new(transaction, registry.clone());
        mapper
            .insert(&mut character("Radagast", CharacterGender::Istari, None), options)
            .await
            .unwrap();
        mapper.into_inner().commit().await.expect("Could not commit");

        {
            let transaction = connection.begin().await.expect("Could not begin");
            let mut mapper = DataMapper::new(transaction, registry.clone());
            mapper
                .insert(&mut character("Alatar", CharacterGender::Istari, None), options)
                .await
                .unwrap();
        }

        let mut mapper = DataMapper::new(&mut connection, registry);
        let names = mapper
            .query::<Record>("SELECT firstName FROM Characters", QueryOptions::default())
            .await
            .unwrap()
            .into_vec()
            .await
            .unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].get_as::<String>("firstName").unwrap(), "Radagast");
    }

    #[test]
    fn entity_metadata() {
        let registry = Registry::new();
        let table = registry.resolve::<Character>().unwrap();
        assert_eq!(table.table().full_name(), "main.Characters");
        assert_eq!(table.identity().map(|c| &*c.name), Some("ID"));
        assert!(table.column("fullName").is_some_and(|c| c.computed));
        assert!(table.column("last_name").is_some_and(|c| c.nullable));
        assert_eq!(CharacterGender::MEMBERS.len(), 7);
        assert_eq!(Character::table_ref().name, "Characters");
    }
}
