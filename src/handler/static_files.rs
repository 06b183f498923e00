//! Static file serving module
//!
//! Resolves a request against the root directory and builds the response:
//! file contents, index file, directory listing, redirect or error.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, Body, Validators};
use crate::logger;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tokio::fs;

const FILE_NOT_FOUND: &str = "File not found";

/// Serve whatever the request path maps to under the root directory
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Body> {
    let translated = http::translate_path(&state.root, ctx.path);

    let Some((resolved, metadata)) = resolve(state, ctx.path, &translated.fs_path).await else {
        return not_found(ctx);
    };

    if metadata.is_dir() {
        return serve_directory(ctx, state, &translated.fs_path, &resolved).await;
    }

    // A file addressed like a directory does not exist
    if translated.trailing_slash {
        return not_found(ctx);
    }

    serve_file(ctx, &translated.fs_path, &resolved, &metadata).await
}

/// Canonicalize `path` and make sure it stays below the root
///
/// Missing files are common (404) and not logged; escapes through symlinks are.
async fn resolve(state: &AppState, request_path: &str, path: &Path) -> Option<(PathBuf, Metadata)> {
    let canonical = fs::canonicalize(path).await.ok()?;
    if !canonical.starts_with(&state.root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            canonical.display()
        ));
        return None;
    }

    let metadata = fs::metadata(&canonical).await.ok()?;
    Some((canonical, metadata))
}

async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
    resolved: &Path,
) -> Response<Body> {
    if !ctx.path.ends_with('/') {
        return http::build_redirect_response(&redirect_location(ctx));
    }

    for index_file in &state.config.static_files.index_files {
        let candidate = dir.join(index_file);
        if let Some((index_resolved, metadata)) = resolve(state, ctx.path, &candidate).await {
            if metadata.is_file() {
                return serve_file(ctx, &candidate, &index_resolved, &metadata).await;
            }
        }
    }

    if !state.config.static_files.directory_listing {
        return not_found(ctx);
    }

    listing::serve_listing(ctx, resolved).await
}

/// Serve a regular file, answering 304 when the client's copy is current
async fn serve_file(
    ctx: &RequestContext<'_>,
    requested: &Path,
    resolved: &Path,
    metadata: &Metadata,
) -> Response<Body> {
    let modified = metadata.modified().ok();
    let validators = Validators {
        etag: Some(cache::generate_etag(metadata.len(), modified)),
        last_modified: modified.map(cache::http_date),
    };
    let etag = validators.etag.as_deref().unwrap_or_default();

    // If-None-Match takes precedence over If-Modified-Since
    let not_modified = if ctx.if_none_match.is_some() {
        cache::check_etag_match(ctx.if_none_match, etag)
    } else {
        cache::not_modified_since(ctx.if_modified_since, modified)
    };
    if not_modified {
        return http::build_not_modified_response(&validators);
    }

    let content = match fs::read(resolved).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                resolved.display(),
                e
            ));
            return not_found(ctx);
        }
    };

    http::build_file_response(
        Bytes::from(content),
        mime::content_type_for(requested),
        &validators,
        ctx.is_head,
    )
}

/// `Location` for a directory requested without its trailing slash.
///
/// Leading slashes collapse to one: `//host/dir/` would be read by clients
/// as a network-path reference to another host.
fn redirect_location(ctx: &RequestContext<'_>) -> String {
    let path = ctx.path.trim_start_matches('/');
    match ctx.query {
        Some(query) => format!("/{path}/?{query}"),
        None => format!("/{path}/"),
    }
}

fn not_found(ctx: &RequestContext<'_>) -> Response<Body> {
    http::build_error_response(StatusCode::NOT_FOUND, Some(FILE_NOT_FOUND), ctx.is_head)
}
