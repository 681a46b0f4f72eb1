mod resource {
    pub mod character;
}

#[cfg(test)]
mod tests {
    use crate::resource::character::{Character, CharacterGender};
    use ferry::{
        AsValue, CommandBuilder, DbType, Dialect, MappingError, ParameterDirection, Registry,
        Value,
    };

    fn sqlite(registry: &Registry) -> CommandBuilder<'_> {
        CommandBuilder::new(Dialect::for_driver("sqlite"), registry)
    }

    #[test]
    fn delete_command() {
        let registry = Registry::new();
        let command = sqlite(&registry)
            .build_delete(&Character::cedric())
            .unwrap();
        assert!(command.text.starts_with(r#"DELETE FROM "main"."Characters""#));
        assert!(command.text.ends_with(r#"WHERE "ID" = @ID"#));
        assert_eq!(command.parameters.len(), 1);
        assert_eq!(command.parameters[0].name, "@ID");
        assert_eq!(command.parameters[0].value, Value::Int64(Some(1000)));
    }

    #[test]
    fn exists_command() {
        let registry = Registry::new();
        let command = sqlite(&registry).build_exists::<Character>(1000).unwrap();
        assert!(command.text.starts_with("SELECT 1"));
        assert!(command.text.contains(r#"FROM "main"."Characters""#));
        assert!(command.text.ends_with(r#"WHERE "ID" = @ID"#));
        assert_eq!(command.parameters.len(), 1);
        assert_eq!(command.parameters[0].value, Value::Int32(Some(1000)));
    }

    #[test]
    fn select_command() {
        let registry = Registry::new();
        let builder = sqlite(&registry);

        let command = builder.build_select::<Character>(1000_i64, &[]).unwrap();
        assert_eq!(
            command.text,
            r#"SELECT * FROM "main"."Characters" WHERE "ID" = @ID"#
        );
        assert_eq!(command.parameters.len(), 1);

        let command = builder
            .build_select::<Character>(1000_i64, &["firstName", "ID", "first_name"])
            .unwrap();
        assert_eq!(
            command.text,
            r#"SELECT "ID", "firstName" FROM "main"."Characters" WHERE "ID" = @ID"#
        );
        assert!(!command.text.contains("gender"));
        assert!(!command.text.contains("lastName"));
    }

    #[test]
    fn insert_command() {
        let registry = Registry::new();
        let command = sqlite(&registry)
            .build_insert(&Character::cedric())
            .unwrap();
        assert!(command.text.starts_with(r#"INSERT INTO "main"."Characters" ("#));
        assert!(command.text.contains("VALUES ("));
        assert!(!command.text.contains("fullName"));

        let parameters = &command.parameters;
        assert_eq!(parameters.len(), 3);
        assert_eq!(
            parameters.get("firstName").map(|p| &p.value),
            Some(&Value::Varchar(Some("Cédric".into())))
        );
        assert_eq!(
            parameters.get("gender").map(|p| &p.value),
            Some(&CharacterGender::DarkLord.as_value())
        );
        assert_eq!(
            parameters.get("lastName").map(|p| &p.value),
            Some(&Value::Varchar(Some("".into())))
        );
    }

    #[test]
    fn insert_command_per_dialect() {
        let registry = Registry::new();
        let character = Character::cedric();

        let command = CommandBuilder::new(Dialect::for_driver("mysql"), &registry)
            .build_insert(&character)
            .unwrap();
        assert_eq!(
            command.text,
            "INSERT INTO `main`.`Characters` (`firstName`, `gender`, `lastName`) \
             VALUES (@firstName, @gender, @lastName); SELECT LAST_INSERT_ID()"
        );

        let command = CommandBuilder::new(Dialect::for_driver("oracle"), &registry)
            .build_insert(&character)
            .unwrap();
        assert!(command.text.ends_with(r#"RETURNING "ID" INTO :ID"#));
        assert_eq!(command.parameters.len(), 4);
        let output = command.parameters.get("ID").unwrap();
        assert_eq!(output.direction, Some(ParameterDirection::Output));
        assert_eq!(output.db_type, Some(DbType::Int64));

        let command = CommandBuilder::new(Dialect::default(), &registry)
            .build_insert(&character)
            .unwrap();
        assert!(command.text.starts_with("INSERT INTO [main].[Characters] ([firstName]"));
        assert!(command.text.ends_with("; SELECT SCOPE_IDENTITY()"));
    }

    #[test]
    fn update_command() {
        let registry = Registry::new();
        let builder = sqlite(&registry);
        let character = Character::cedric();

        let command = builder.build_update(&character, &[]).unwrap();
        assert!(command.text.starts_with(r#"UPDATE "main"."Characters""#));
        assert!(command.text.contains(r#"SET ""#));
        assert!(command.text.ends_with(r#"WHERE "ID" = @ID"#));
        let parameters = &command.parameters;
        assert_eq!(parameters.len(), 4);
        assert_eq!(parameters[3].name, "@ID");
        assert_eq!(
            parameters.get("ID").map(|p| &p.value),
            Some(&Value::Int64(Some(1000)))
        );

        let command = builder.build_update(&character, &["lastName"]).unwrap();
        assert_eq!(
            command.text,
            r#"UPDATE "main"."Characters" SET "lastName" = @lastName WHERE "ID" = @ID"#
        );
        assert_eq!(command.parameters.len(), 2);

        let error = builder
            .build_update(&character, &["fullName", "unknown"])
            .expect_err("Computed columns cannot be updated");
        assert_eq!(
            error.downcast_ref::<MappingError>(),
            Some(&MappingError::NoColumnsToUpdate {
                table: "main.Characters".into()
            })
        );
    }

    #[test]
    fn positional_parameters() {
        let registry = Registry::new();
        let command = CommandBuilder::new(Dialect::for_driver("odbc"), &registry)
            .build_update(&Character::cedric(), &["firstName", "gender"])
            .unwrap();
        assert_eq!(
            command.text,
            "UPDATE [main].[Characters] SET [firstName] = ?, [gender] = ? WHERE [ID] = ?"
        );
        assert_eq!(command.parameters.len(), 3);
    }
}
