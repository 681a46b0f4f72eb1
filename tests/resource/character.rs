use ferry::{Entity, Enumeration};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Enumeration)]
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

#[derive(Debug, Default, Clone, PartialEq, Entity)]
#[ferry(name = "Characters", schema = "main")]
pub struct Character {
    #[ferry(identity, name = "ID")]
    pub id: i64,
    #[ferry(name = "firstName")]
    pub first_name: String,
    pub gender: CharacterGender,
    #[ferry(name = "lastName")]
    pub last_name: Option<String>,
    #[ferry(computed, name = "fullName")]
    pub full_name: String,
}

impl Character {
    pub fn cedric() -> Self {
        Self {
            id: 1000,
            first_name: "Cédric".into(),
            gender: CharacterGender::DarkLord,
            last_name: Some("".into()),
            full_name: "".into(),
        }
    }
}
