use libsqlite3_sys::*;
use ferry_core::{Error, Result, Value};
use std::{
    ffi::{CStr, c_int},
    slice,
};

pub(crate) fn extract_value(statement: *mut sqlite3_stmt, index: c_int) -> Result<Value> {
    unsafe {
        let column_type = sqlite3_column_type(statement, index);
        Ok(match column_type {
            SQLITE_NULL => Value::Null,
            SQLITE_INTEGER => Value::Int64(Some(sqlite3_column_int64(statement, index))),
            SQLITE_FLOAT => Value::Float64(Some(sqlite3_column_double(statement, index))),
            SQLITE_BLOB => {
                let ptr = sqlite3_column_blob(statement, index) as *const u8;
                let len = sqlite3_column_bytes(statement, index) as usize;
                let bytes = if ptr.is_null() {
                    &[][..]
                } else {
                    slice::from_raw_parts(ptr, len)
                };
                Value::Blob(Some(bytes.into()))
            }
            SQLITE_TEXT => {
                let ptr = sqlite3_column_text(statement, index);
                let len = sqlite3_column_bytes(statement, index) as usize;
                let bytes = if ptr.is_null() {
                    &[][..]
                } else {
                    slice::from_raw_parts(ptr, len)
                };
                Value::Varchar(Some(String::from_utf8_lossy(bytes).into_owned()))
            }
            _ => {
                return Err(Error::msg(format!(
                    "Unexpected column type {}",
                    column_type
                )));
            }
        })
    }
}

pub(crate) fn extract_name(statement: *mut sqlite3_stmt, index: c_int) -> Result<String> {
    unsafe {
        let ptr = sqlite3_column_name(statement, index);
        if ptr.is_null() {
            return Err(Error::msg(format!("Column {index} has no name")));
        }
        Ok(CStr::from_ptr(ptr).to_str()?.into())
    }
}
