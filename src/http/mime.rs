//! MIME type detection module
//!
//! Returns the Content-Type sent with an uploaded document, based on the
//! file extension.

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use file_squire::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("log")), "text/plain; charset=utf-8");
/// assert_eq!(get_content_type(Some("gz")), "application/gzip");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension.map(str::to_ascii_lowercase).as_deref() {
        // Text and logs
        Some("txt" | "log" | "out" | "err" | "md") => "text/plain; charset=utf-8",
        Some("csv") => "text/csv",
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("xml") => "application/xml",

        // Config and data
        Some("json") => "application/json",
        Some("yaml" | "yml") => "application/yaml",
        Some("toml" | "ini" | "conf" | "cfg") => "text/plain; charset=utf-8",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",

        // Documents and archives
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",
        Some("tar") => "application/x-tar",
        Some("db" | "sqlite" | "sqlite3") => "application/vnd.sqlite3",

        // Default
        _ => "application/octet-stream",
    }
}
