mod as_value;
mod coerce;
mod column;
mod command;
mod command_builder;
mod connection;
mod data_mapper;
mod dialect;
mod driver;
mod entity;
mod enumeration;
mod error;
mod executor;
#[cfg(test)]
mod fixture;
mod mapper;
mod parse;
mod parameter;
mod record;
mod registry;
mod row;
mod table;
mod transaction;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use coerce::*;
pub use column::*;
pub use command::*;
pub use command_builder::*;
pub use connection::*;
pub use data_mapper::*;
pub use dialect::*;
pub use driver::*;
pub use entity::*;
pub use enumeration::*;
pub use error::*;
pub use executor::*;
pub use mapper::*;
pub use parse::*;
pub use parameter::*;
pub use record::*;
pub use registry::*;
pub use row::*;
pub use table::*;
pub use transaction::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
