//! Storage library status codes.
//!
//! The codes and messages match those of the netCDF-C library, so a storage implementation backed by it can pass its statuses through unchanged.

/// No error.
pub const NC_NOERR: i32 = 0;
/// Not a valid id.
pub const NC_EBADID: i32 = -33;
/// Invalid argument.
pub const NC_EINVAL: i32 = -36;
/// Operation not allowed in data mode.
pub const NC_ENOTINDEFINE: i32 = -38;
/// String match to name in use.
pub const NC_ENAMEINUSE: i32 = -42;
/// Not a valid data type.
pub const NC_EBADTYPE: i32 = -45;
/// Invalid dimension id or name.
pub const NC_EBADDIM: i32 = -46;
/// Variable not found.
pub const NC_ENOTVAR: i32 = -49;
/// Invalid dimension size.
pub const NC_EDIMSIZE: i32 = -63;
/// Name contains illegal characters.
pub const NC_EBADNAME: i32 = -59;
/// Bad group id.
pub const NC_EBADGRPID: i32 = -116;

/// Returns the message for a status `code`.
#[must_use]
pub fn message(code: i32) -> &'static str {
    match code {
        NC_NOERR => "No error",
        NC_EBADID => "NetCDF: Not a valid ID",
        NC_EINVAL => "NetCDF: Invalid argument",
        NC_ENOTINDEFINE => "NetCDF: Operation not allowed in data mode",
        NC_ENAMEINUSE => "NetCDF: String match to name in use",
        NC_EBADTYPE => "NetCDF: Not a valid data type or _FillValue type mismatch",
        NC_EBADDIM => "NetCDF: Invalid dimension ID or name",
        NC_ENOTVAR => "NetCDF: Variable not found",
        NC_EDIMSIZE => "NetCDF: Invalid dimension size",
        NC_EBADNAME => "NetCDF: Name contains illegal characters",
        NC_EBADGRPID => "NetCDF: Bad group ID",
        _ => "Unknown Error",
    }
}
