use crate::SqliteConnection;
use ferry_core::Driver;

#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDriver;

impl SqliteDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for SqliteDriver {
    type Connection = SqliteConnection;

    const NAME: &'static str = "sqlite";
}
