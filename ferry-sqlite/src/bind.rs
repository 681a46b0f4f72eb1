use ferry_core::{Error, Parameter, ParameterDirection, Parameters, Result, Value, as_c_string, coerce};
use libsqlite3_sys::*;
use std::ffi::{CStr, c_char, c_int};

/// Index of the placeholder `parameter` binds to, 0 when none.
///
/// Names are looked up as given, then with each SQLite prefix when the name
/// has none. Unmatched parameters take the placeholder at their position when
/// that placeholder is anonymous (`?`) or numbered (`?NNN`).
fn placeholder_index(statement: *mut sqlite3_stmt, parameter: &Parameter, position: c_int) -> c_int {
    let name = parameter.name.as_ref();
    unsafe {
        if !name.is_empty() {
            let index = sqlite3_bind_parameter_index(statement, as_c_string(name).as_ptr());
            if index != 0 {
                return index;
            }
            if !name.starts_with(['@', ':', '$', '?']) {
                for prefix in ['@', ':', '$'] {
                    let prefixed = as_c_string(format!("{prefix}{name}"));
                    let index = sqlite3_bind_parameter_index(statement, prefixed.as_ptr());
                    if index != 0 {
                        return index;
                    }
                }
            }
        }
        if position > sqlite3_bind_parameter_count(statement) {
            return 0;
        }
        let placeholder = sqlite3_bind_parameter_name(statement, position);
        if placeholder.is_null() || CStr::from_ptr(placeholder).to_bytes().starts_with(b"?") {
            position
        } else {
            0
        }
    }
}

pub(crate) fn bind_parameters(statement: *mut sqlite3_stmt, parameters: &Parameters) -> Result<()> {
    for (i, parameter) in parameters.iter().enumerate() {
        if matches!(
            parameter.direction,
            Some(ParameterDirection::Output | ParameterDirection::ReturnValue)
        ) {
            continue;
        }
        let index = placeholder_index(statement, parameter, i as c_int + 1);
        if index == 0 {
            log::trace!("Parameter `{}` has no placeholder, skipped", parameter.name);
            continue;
        }
        let rc = bind_value(statement, index, &parameter.value)?;
        if rc != SQLITE_OK {
            return Err(Error::msg(format!(
                "Could not bind the parameter `{}`: {}",
                parameter.name,
                crate::error_message(unsafe { sqlite3_db_handle(statement) })
            )));
        }
    }
    Ok(())
}

fn bind_value(statement: *mut sqlite3_stmt, index: c_int, value: &Value) -> Result<c_int> {
    if value.is_null() {
        return Ok(unsafe { sqlite3_bind_null(statement, index) });
    }
    let integer = match value {
        Value::Boolean(Some(v)) => Some(*v as i64),
        Value::Int8(Some(v)) => Some(*v as i64),
        Value::Int16(Some(v)) => Some(*v as i64),
        Value::Int32(Some(v)) => Some(*v as i64),
        Value::Int64(Some(v)) => Some(*v),
        Value::UInt8(Some(v)) => Some(*v as i64),
        Value::UInt16(Some(v)) => Some(*v as i64),
        Value::UInt32(Some(v)) => Some(*v as i64),
        Value::UInt64(Some(v)) => i64::try_from(*v).ok(),
        Value::Enum(Some(v), ..) => Some(*v),
        _ => None,
    };
    unsafe {
        if let Some(v) = integer {
            return Ok(sqlite3_bind_int64(statement, index, v));
        }
        Ok(match value {
            Value::Float32(Some(v)) => sqlite3_bind_double(statement, index, *v as f64),
            Value::Float64(Some(v)) => sqlite3_bind_double(statement, index, *v),
            Value::Varchar(Some(v)) => bind_text(statement, index, v),
            Value::Blob(Some(v)) => sqlite3_bind_blob(
                statement,
                index,
                v.as_ptr().cast(),
                v.len() as c_int,
                SQLITE_TRANSIENT(),
            ),
            other => {
                let Value::Varchar(Some(text)) = coerce(other.clone(), &Value::Varchar(None), true)?
                else {
                    return Err(Error::msg(format!("Cannot bind {other:?} as text")));
                };
                bind_text(statement, index, &text)
            }
        })
    }
}

unsafe fn bind_text(statement: *mut sqlite3_stmt, index: c_int, text: &str) -> c_int {
    unsafe {
        sqlite3_bind_text(
            statement,
            index,
            text.as_ptr() as *const c_char,
            text.len() as c_int,
            SQLITE_TRANSIENT(),
        )
    }
}
