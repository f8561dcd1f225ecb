//! MIME type mapping
//!
//! Maps file extensions to Content-Type values. The table is built once at
//! startup and handed to the handler as part of the immutable application
//! state; overrides are applied at construction, never by mutating a shared
//! table afterwards.

use std::collections::HashMap;

/// Extension to Content-Type table, fixed at construction.
///
/// The default table pins `js`, `mjs` and `wasm` explicitly: some platform
/// MIME databases classify them as `text/plain`, which breaks module scripts
/// and WebAssembly streaming compilation in browsers.
#[derive(Debug, Clone)]
pub struct MimeMap {
    overrides: HashMap<&'static str, &'static str>,
}

impl Default for MimeMap {
    fn default() -> Self {
        Self {
            overrides: HashMap::from([
                ("js", "application/javascript"),
                ("mjs", "application/javascript"),
                ("wasm", "application/wasm"),
            ]),
        }
    }
}

impl MimeMap {
    /// Get MIME Content-Type based on file extension
    pub fn content_type(&self, extension: Option<&str>) -> &'static str {
        if let Some(ext) = extension {
            if let Some(ct) = self.overrides.get(ext) {
                return ct;
            }
        }
        builtin_content_type(extension)
    }
}

/// Built-in extension table, used when no override applies
fn builtin_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",

        // JavaScript/WASM
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Misc assets
        Some("map") => "application/json",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",

        // Default
        _ => "application/octet-stream",
    }
}
