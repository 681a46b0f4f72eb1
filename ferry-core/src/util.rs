use std::{borrow::Cow, ffi::CString};

/// Writes each value with `f`, placing `separator` between the ones that
/// produced some output.
pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Null terminated copy of `str`, interior nul bytes are dropped.
pub fn as_c_string<'s, S: Into<Cow<'s, str>>>(str: S) -> CString {
    let str = str.into();
    match CString::new(str.as_bytes()) {
        Ok(v) => v,
        Err(..) => {
            let bytes: Vec<u8> = str.bytes().filter(|b| *b != 0).collect();
            CString::new(bytes).unwrap_or_default()
        }
    }
}

/// Longest prefix of `value` up to `len` bytes ending on a char boundary.
pub fn truncate_str(value: &str, len: usize) -> &str {
    if value.len() <= len {
        return value;
    }
    let mut end = len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::truncate_str(&$query, 497).trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}
