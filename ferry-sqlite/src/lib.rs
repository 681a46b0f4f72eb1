mod bind;
mod cbox;
mod connection;
mod driver;
mod extract;
mod transaction;

use libsqlite3_sys::{sqlite3, sqlite3_errmsg};
use std::ffi::CStr;

pub(crate) use cbox::*;
pub use connection::*;
pub use driver::*;
pub use transaction::*;

/// Last error reported on `connection`.
pub(crate) fn error_message(connection: *mut sqlite3) -> String {
    unsafe {
        let ptr = sqlite3_errmsg(connection);
        if ptr.is_null() {
            "Unknown error (could not extract the error message)".into()
        } else {
            CStr::from_ptr(ptr).to_string_lossy().into_owned()
        }
    }
}
