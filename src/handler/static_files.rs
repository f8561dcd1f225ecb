//! Static file serving module
//!
//! Resolves request paths against the asset root, probes index files for
//! directories, renders directory listings and loads file content with the
//! matching Content-Type.

use crate::config::AppState;
use crate::handler::RequestContext;
use crate::http::{self, mime::MimeMap};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Outcome of resolving a request path against the root directory
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    File(PathBuf),
    Listing(PathBuf),
    Redirect(String),
    NotFound,
}

/// Serve a request for a static asset
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let site = &state.config.site;
    match resolve_path(&state.root, ctx.path, &site.index_files, site.directory_listing) {
        Resolved::File(file_path) => match load_file(&file_path, &state.mime).await {
            Some((content, content_type)) => {
                http::build_file_response(content, content_type, ctx.is_head)
            }
            None => http::build_404_response(),
        },
        Resolved::Listing(dir) => match render_listing(&dir, ctx.path).await {
            Some(html) => http::build_html_response(html, ctx.is_head),
            None => http::build_404_response(),
        },
        Resolved::Redirect(target) => http::build_redirect_response(&target),
        Resolved::NotFound => http::build_404_response(),
    }
}

/// Resolve a request path to a file, a directory listing or a redirect.
///
/// `root` must already be canonical. Parent-directory segments are stripped
/// from the request path, and the resolved path is canonicalized and checked
/// for containment in the root; anything that escapes resolves to `NotFound`.
pub fn resolve_path(
    root: &Path,
    request_path: &str,
    index_files: &[String],
    directory_listing: bool,
) -> Resolved {
    // Remove leading slash and prevent directory traversal
    let clean_path = request_path.trim_start_matches('/').replace("..", "");
    let clean_path = clean_path.trim_start_matches('/');

    let mut file_path = root.join(clean_path);

    if file_path.is_dir() {
        // Directories are addressed with a trailing slash so relative links
        // in index pages and listings resolve correctly
        if !clean_path.is_empty() && !request_path.ends_with('/') {
            return Resolved::Redirect(format!("{request_path}/"));
        }

        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.is_file() {
                file_path = index_path;
                break;
            }
        }

        if file_path.is_dir() {
            if !directory_listing {
                return Resolved::NotFound;
            }
            let Ok(dir) = file_path.canonicalize() else {
                return Resolved::NotFound;
            };
            if !dir.starts_with(root) {
                logger::log_warning(&format!("Path traversal attempt blocked: {request_path}"));
                return Resolved::NotFound;
            }
            return Resolved::Listing(dir);
        }
    }

    // A path that fails to canonicalize is the ordinary 404 case; only a
    // path that resolves outside the root (e.g. through a symlink) warns.
    let Ok(resolved) = file_path.canonicalize() else {
        return Resolved::NotFound;
    };
    if !resolved.starts_with(root) {
        logger::log_warning(&format!("Path traversal attempt blocked: {request_path}"));
        return Resolved::NotFound;
    }
    if !resolved.is_file() {
        return Resolved::NotFound;
    }

    Resolved::File(resolved)
}

/// Load file content and determine its Content-Type
async fn load_file(file_path: &Path, mime: &MimeMap) -> Option<(Vec<u8>, &'static str)> {
    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime.content_type(file_path.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

/// Render an HTML listing of a directory's entries
async fn render_listing(dir: &Path, request_path: &str) -> Option<String> {
    let mut entries: Vec<(String, bool)> = Vec::new();
    let mut read_dir = fs::read_dir(dir).await.ok()?;

    while let Ok(Some(entry)) = read_dir.next_entry().await {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        entries.push((name, is_dir));
    }

    entries.sort();

    let title = escape_html(request_path);
    let mut items = String::new();
    for (name, is_dir) in entries {
        let display = if is_dir { format!("{name}/") } else { name };
        let escaped = escape_html(&display);
        items.push_str(&format!("        <li><a href=\"{escaped}\">{escaped}</a></li>\n"));
    }

    Some(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Directory listing for {title}</title>
</head>
<body>
    <h1>Directory listing for {title}</h1>
    <hr>
    <ul>
{items}    </ul>
    <hr>
</body>
</html>"#
    ))
}

/// Minimal HTML escaping for entry names and the page title
fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string(), "index.htm".to_string()]
    }

    /// A canonical root containing index.html, app.js, module.wasm and an
    /// assets/ subdirectory without an index, next to a secret.txt that must
    /// stay unreachable.
    fn fixture() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path().join("dist");
        std_fs::create_dir(&root).expect("create root");
        std_fs::write(root.join("index.html"), b"<h1>home</h1>").expect("write index");
        std_fs::write(root.join("app.js"), b"console.log(1);").expect("write js");
        std_fs::write(root.join("module.wasm"), b"\x00asm").expect("write wasm");
        std_fs::create_dir(root.join("assets")).expect("create assets");
        std_fs::write(root.join("assets").join("logo.svg"), b"<svg/>").expect("write svg");
        std_fs::write(tmp.path().join("secret.txt"), b"top secret").expect("write secret");
        let canonical = root.canonicalize().expect("canonical root");
        (tmp, canonical)
    }

    #[test]
    fn test_resolves_existing_file() {
        let (_tmp, root) = fixture();
        match resolve_path(&root, "/app.js", &index_files(), true) {
            Resolved::File(path) => assert!(path.ends_with("app.js")),
            other => panic!("expected file, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (_tmp, root) = fixture();
        let resolved = resolve_path(&root, "/missing.png", &index_files(), true);
        assert_eq!(resolved, Resolved::NotFound);
    }

    #[test]
    fn test_root_serves_index_file() {
        let (_tmp, root) = fixture();
        match resolve_path(&root, "/", &index_files(), true) {
            Resolved::File(path) => assert!(path.ends_with("index.html")),
            other => panic!("expected index file, got {other:?}"),
        }
    }

    #[test]
    fn test_traversal_is_blocked() {
        let (_tmp, root) = fixture();
        let resolved = resolve_path(&root, "/../secret.txt", &index_files(), true);
        assert_eq!(resolved, Resolved::NotFound);

        let resolved = resolve_path(&root, "/..%2F..%2Fsecret.txt", &index_files(), true);
        assert!(!matches!(resolved, Resolved::File(p) if p.ends_with("secret.txt")));
    }

    #[test]
    fn test_directory_without_slash_redirects() {
        let (_tmp, root) = fixture();
        let resolved = resolve_path(&root, "/assets", &index_files(), true);
        assert_eq!(resolved, Resolved::Redirect("/assets/".to_string()));
    }

    #[test]
    fn test_directory_without_index_lists() {
        let (_tmp, root) = fixture();
        match resolve_path(&root, "/assets/", &index_files(), true) {
            Resolved::Listing(dir) => assert!(dir.ends_with("assets")),
            other => panic!("expected listing, got {other:?}"),
        }
    }

    #[test]
    fn test_listing_disabled_is_not_found() {
        let (_tmp, root) = fixture();
        let resolved = resolve_path(&root, "/assets/", &index_files(), false);
        assert_eq!(resolved, Resolved::NotFound);
    }

    #[tokio::test]
    async fn test_load_file_exact_bytes_and_type() {
        let (_tmp, root) = fixture();
        let mime = MimeMap::default();

        let (content, content_type) = load_file(&root.join("app.js"), &mime)
            .await
            .expect("file loads");
        assert_eq!(content, b"console.log(1);");
        assert_eq!(content_type, "application/javascript");

        let (content, content_type) = load_file(&root.join("module.wasm"), &mime)
            .await
            .expect("file loads");
        assert_eq!(content, b"\x00asm");
        assert_eq!(content_type, "application/wasm");
    }

    #[tokio::test]
    async fn test_listing_contains_entries() {
        let (_tmp, root) = fixture();
        let html = render_listing(&root, "/").await.expect("listing renders");
        assert!(html.contains("app.js"));
        assert!(html.contains("assets/"));
        assert!(html.contains("Directory listing for /"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
