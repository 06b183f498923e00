//! Directory listing module
//!
//! Renders an HTML index for directories that have no index file.

use crate::handler::router::RequestContext;
use crate::http::{self, response::escape_html, Body};
use crate::logger;
use hyper::{Response, StatusCode};
use std::path::Path;
use tokio::fs;

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Text shown for the entry: directories get `/`, symlinks `@`
    fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Relative link target; directories (including symlinked ones) end in `/`
    fn href(&self) -> String {
        let encoded = urlencoding::encode(&self.name);
        if self.is_dir {
            format!("{encoded}/")
        } else {
            encoded.into_owned()
        }
    }
}

/// Serve the listing of `dir` for the request in `ctx`
pub async fn serve_listing(ctx: &RequestContext<'_>, dir: &Path) -> Response<Body> {
    let entries = match read_entries(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            logger::log_warning(&format!(
                "Cannot list directory '{}': {}",
                dir.display(),
                e
            ));
            return http::build_error_response(
                StatusCode::NOT_FOUND,
                Some("No permission to list directory"),
                ctx.is_head,
            );
        }
    };

    let display_path = urlencoding::decode(ctx.path)
        .map_or_else(|_| ctx.path.to_string(), std::borrow::Cow::into_owned);
    http::build_html_response(render_listing(&display_path, &entries), ctx.is_head)
}

/// Read a directory, sorted case-insensitively by name
pub async fn read_entries(dir: &Path) -> std::io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let file_type = entry.file_type().await?;
        let is_symlink = file_type.is_symlink();
        let is_dir = if is_symlink {
            fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir())
        } else {
            file_type.is_dir()
        };

        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the listing page for `display_path`
pub fn render_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = String::with_capacity(256 + entries.len() * 64);

    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_html(&entry.href()),
            escape_html(&entry.display_name())
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_render_listing() {
        let html = render_listing(
            "/assets/",
            &[
                entry("img", true, false),
                entry("my file.txt", false, false),
                entry("<x>.js", false, false),
                entry("latest", true, true),
            ],
        );

        assert!(html.contains("<title>Directory listing for /assets/</title>"));
        assert!(html.contains("<li><a href=\"img/\">img/</a></li>"));
        assert!(html.contains("<li><a href=\"my%20file.txt\">my file.txt</a></li>"));
        assert!(html.contains("<li><a href=\"%3Cx%3E.js\">&lt;x&gt;.js</a></li>"));
        assert!(html.contains("<li><a href=\"latest/\">latest@</a></li>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = render_listing("/<b>/", &[]);
        assert!(html.contains("<h1>Directory listing for /&lt;b&gt;/</h1>"));
        assert!(html.contains("<ul>\n</ul>"));
    }

    #[tokio::test]
    async fn test_read_entries_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("A.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("c")).unwrap();

        let entries = read_entries(dir.path()).await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A.txt", "b.txt", "c"]);
        assert!(entries[2].is_dir);
        assert!(!entries[0].is_dir);
    }

    #[tokio::test]
    async fn test_read_entries_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_entries(&dir.path().join("gone")).await.is_err());
    }
}
