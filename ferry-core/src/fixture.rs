use crate::{
    AsValue, ColumnDef, EnumMember, Entity, Enumeration, Result, TableRef, Value, enum_from_value,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CharacterGender {
    Balrog,
    DarkLord,
    Dwarf,
    Elf,
    Hobbit,
    #[default]
    Human,
    Istari,
}

impl Enumeration for CharacterGender {
    const MEMBERS: &'static [EnumMember] = &[
        EnumMember {
            name: "Balrog",
            ordinal: 0,
        },
        EnumMember {
            name: "DarkLord",
            ordinal: 1,
        },
        EnumMember {
            name: "Dwarf",
            ordinal: 2,
        },
        EnumMember {
            name: "Elf",
            ordinal: 3,
        },
        EnumMember {
            name: "Hobbit",
            ordinal: 4,
        },
        EnumMember {
            name: "Human",
            ordinal: 5,
        },
        EnumMember {
            name: "Istari",
            ordinal: 6,
        },
    ];
    fn ordinal(&self) -> i64 {
        *self as i64
    }
    fn from_ordinal(ordinal: i64) -> Option<Self> {
        Some(match ordinal {
            0 => Self::Balrog,
            1 => Self::DarkLord,
            2 => Self::Dwarf,
            3 => Self::Elf,
            4 => Self::Hobbit,
            5 => Self::Human,
            6 => Self::Istari,
            _ => return None,
        })
    }
}

impl AsValue for CharacterGender {
    fn as_empty_value() -> Value {
        Value::Enum(None, Self::MEMBERS)
    }
    fn as_value(self) -> Value {
        Value::Enum(Some(self.ordinal()), Self::MEMBERS)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        enum_from_value(value)
    }
}

/// What `#[derive(Entity)]` would generate for a `main.Characters` table.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Character {
    pub id: i64,
    pub first_name: String,
    pub gender: CharacterGender,
    pub last_name: Option<String>,
    pub full_name: String,
}

impl Entity for Character {
    fn table_ref() -> TableRef {
        TableRef::new("Characters").with_schema("main")
    }
    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef {
                name: "ID".into(),
                identity: true,
                ..ColumnDef::new("id", i64::as_empty_value())
            },
            ColumnDef {
                name: "firstName".into(),
                ..ColumnDef::new("first_name", String::as_empty_value())
            },
            ColumnDef::new("gender", CharacterGender::as_empty_value()),
            ColumnDef {
                name: "lastName".into(),
                nullable: true,
                ..ColumnDef::new("last_name", String::as_empty_value())
            },
            ColumnDef {
                name: "fullName".into(),
                computed: true,
                ..ColumnDef::new("full_name", String::as_empty_value())
            },
        ]
    }
    fn column_value(&self, field: &str) -> Option<Value> {
        Some(match field {
            "id" => self.id.as_value(),
            "first_name" => self.first_name.clone().as_value(),
            "gender" => self.gender.as_value(),
            "last_name" => self.last_name.clone().as_value(),
            "full_name" => self.full_name.clone().as_value(),
            _ => return None,
        })
    }
    fn set_column_value(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "id" => self.id = AsValue::try_from_value(value)?,
            "first_name" => self.first_name = AsValue::try_from_value(value)?,
            "gender" => self.gender = AsValue::try_from_value(value)?,
            "last_name" => self.last_name = AsValue::try_from_value(value)?,
            "full_name" => self.full_name = AsValue::try_from_value(value)?,
            _ => {}
        }
        Ok(())
    }
}

pub fn cedric() -> Character {
    Character {
        id: 1000,
        first_name: "Cédric".into(),
        gender: CharacterGender::DarkLord,
        last_name: Some("".into()),
        full_name: "".into(),
    }
}
