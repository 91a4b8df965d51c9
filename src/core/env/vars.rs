use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;

fn invalid(msg: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg)
}

/// Rejects the names `setenv(3)` refuses with `EINVAL`.
pub fn validate_name(name: &OsStr) -> io::Result<()> {
    let bytes = name.as_bytes();
    if bytes.is_empty() {
        return Err(invalid("empty variable name"));
    }
    if bytes.contains(&b'=') {
        return Err(invalid("variable name contains '='"));
    }
    if bytes.contains(&0) {
        return Err(invalid("variable name contains a NUL byte"));
    }
    Ok(())
}

pub fn validate_value(value: &OsStr) -> io::Result<()> {
    if value.as_bytes().contains(&0) {
        return Err(invalid("value contains a NUL byte"));
    }
    Ok(())
}
