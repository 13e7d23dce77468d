//! Static file serving module
//!
//! Maps request paths onto a root directory, serves file bytes with a
//! content type from the extension, and keeps every file it has read in a
//! [`FileCache`]. Every failure is answered with the same 404.

use super::file_cache::FileCache;
use super::Handler;
use crate::config::StaticFilesConfig;
use crate::http::{self, mime, ResponseBody};
use crate::logger;
use hyper::http::request::Parts;
use hyper::Response;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct StaticFiles {
    root: String,
    index_file: String,
    confine_to_root: bool,
    cache: FileCache,
}

impl StaticFiles {
    pub fn new(config: &StaticFilesConfig) -> Self {
        Self {
            root: config.root.clone(),
            index_file: config.index_file.clone(),
            confine_to_root: config.confine_to_root,
            cache: FileCache::new(),
        }
    }

    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    /// Map a request path onto the filesystem
    ///
    /// `/` becomes `<root>/<index_file>`; anything else is appended to the
    /// root as-is. No normalization happens here, `..` segments included.
    pub fn resolve(&self, request_path: &str) -> PathBuf {
        let root = self.root.trim_end_matches('/');
        if request_path == "/" {
            PathBuf::from(format!("{root}/{}", self.index_file))
        } else {
            PathBuf::from(format!("{root}{request_path}"))
        }
    }

    /// Serve a resolved path from the cache, or from disk on a miss
    pub async fn serve_static(&self, path: &Path) -> Response<ResponseBody> {
        match self
            .cache
            .get_or_load(path, |p| async move { self.read_file(&p).await })
            .await
        {
            Ok(data) => http::build_file_response(data, mime::content_type_for_path(path)),
            Err(e) => {
                logger::log_not_found(path, &e);
                http::build_404_response()
            }
        }
    }

    /// One asynchronous read attempt; "absent" and "unreadable" look the same
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        if self.confine_to_root {
            self.ensure_within_root(path).await?;
        }
        fs::read(path).await
    }

    /// Both sides are canonicalized, so a symlinked root is accepted while a
    /// symlink inside the root that leads elsewhere is refused.
    async fn ensure_within_root(&self, path: &Path) -> io::Result<()> {
        let root = fs::canonicalize(&self.root).await?;
        let target = fs::canonicalize(path).await?;
        if target.starts_with(&root) {
            return Ok(());
        }

        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path.display(),
            target.display()
        ));
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "resolved path is outside the static root",
        ))
    }
}

impl Handler for StaticFiles {
    async fn handle(&self, req: &Parts) -> Response<ResponseBody> {
        let path = self.resolve(req.uri.path());
        self.serve_static(&path).await
    }

    fn describe(&self) -> String {
        format!(
            "static files from '{}' (index: {}, confined: {})",
            self.root, self.index_file, self.confine_to_root
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::CacheStats;
    use http_body_util::BodyExt;
    use hyper::header::CONTENT_TYPE;
    use hyper::{Method, Request, StatusCode};
    use std::fs as std_fs;
    use tempfile::TempDir;

    /// `<tmp>/client/{index.html, style.css, sub/}` plus `<tmp>/secret.txt`
    fn fixture() -> (TempDir, StaticFilesConfig) {
        let dir = tempfile::tempdir().unwrap();
        let client = dir.path().join("client");
        std_fs::create_dir_all(client.join("sub")).unwrap();
        std_fs::write(client.join("index.html"), "<h1>hi</h1>").unwrap();
        std_fs::write(client.join("style.css"), "body{}").unwrap();
        std_fs::write(dir.path().join("secret.txt"), "top secret").unwrap();

        let config = StaticFilesConfig {
            root: client.to_str().unwrap().to_string(),
            index_file: "index.html".to_string(),
            confine_to_root: true,
        };
        (dir, config)
    }

    fn parts(method: Method, uri: &str) -> Parts {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    async fn get(files: &StaticFiles, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let resp = files.handle(&parts(Method::GET, uri)).await;
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = resp.into_body().collect().await.unwrap().to_bytes().to_vec();
        (status, content_type, body)
    }

    #[tokio::test]
    async fn test_scenario() {
        let (_dir, config) = fixture();
        let files = StaticFiles::new(&config);

        let (status, ct, body) = get(&files, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct.as_deref(), Some("text/html"));
        assert_eq!(body, b"<h1>hi</h1>");

        let (status, ct, body) = get(&files, "/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct.as_deref(), Some("text/css"));
        assert_eq!(body, b"body{}");

        let (status, ct, body) = get(&files, "/missing.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(ct.as_deref(), Some("text/plain"));
        assert_eq!(body, b"Error 404: resource not found.");
    }

    #[tokio::test]
    async fn test_second_request_served_from_cache() {
        let (_dir, config) = fixture();
        let files = StaticFiles::new(&config);

        let (_, _, first) = get(&files, "/style.css").await;
        assert!(files.cache().contains(&files.resolve("/style.css")).await);

        // Removing the file proves the second response never touches disk
        std_fs::remove_file(Path::new(&config.root).join("style.css")).unwrap();

        let (status, _, second) = get(&files, "/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first, second);
        assert_eq!(files.cache().stats(), CacheStats { hits: 1, loads: 1 });
    }

    #[tokio::test]
    async fn test_root_and_index_share_target() {
        let (_dir, config) = fixture();
        let files = StaticFiles::new(&config);
        assert_eq!(files.resolve("/"), files.resolve("/index.html"));

        get(&files, "/").await;
        let (status, _, body) = get(&files, "/index.html").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>hi</h1>");
        assert_eq!(files.cache().stats().loads, 1);
    }

    #[test]
    fn test_resolve_is_verbatim() {
        let files = StaticFiles::new(&StaticFilesConfig {
            root: "client/".to_string(),
            index_file: "index.html".to_string(),
            confine_to_root: false,
        });
        assert_eq!(files.resolve("/"), PathBuf::from("client/index.html"));
        assert_eq!(files.resolve("/js/app.js"), PathBuf::from("client/js/app.js"));
        assert_eq!(files.resolve("/a/../b"), PathBuf::from("client/a/../b"));
        assert_eq!(files.resolve("/%20x"), PathBuf::from("client/%20x"));
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let (_dir, config) = fixture();
        let files = StaticFiles::new(&config);

        let (status, _, _) = get(&files, "/late.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        std_fs::write(Path::new(&config.root).join("late.txt"), "now here").unwrap();
        let (status, ct, body) = get(&files, "/late.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct.as_deref(), Some("text/plain"));
        assert_eq!(body, b"now here");
    }

    #[tokio::test]
    async fn test_read_error_is_404() {
        let (_dir, config) = fixture();
        let files = StaticFiles::new(&config);

        // The directory exists but cannot be read as a file
        let (status, _, body) = get(&files, "/sub").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, http::NOT_FOUND_BODY.as_bytes());
        assert!(files.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_traversal_blocked_when_confined() {
        let (_dir, config) = fixture();
        let files = StaticFiles::new(&config);

        let (status, _, body) = get(&files, "/../secret.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, http::NOT_FOUND_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_traversal_followed_when_not_confined() {
        let (_dir, mut config) = fixture();
        config.confine_to_root = false;
        let files = StaticFiles::new(&config);

        let (status, _, body) = get(&files, "/../secret.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"top secret");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_leaving_root_follows_confinement() {
        let (dir, mut config) = fixture();
        std::os::unix::fs::symlink(
            dir.path().join("secret.txt"),
            Path::new(&config.root).join("link.txt"),
        )
        .unwrap();

        let files = StaticFiles::new(&config);
        let (status, _, _) = get(&files, "/link.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        config.confine_to_root = false;
        let files = StaticFiles::new(&config);
        let (status, _, body) = get(&files, "/link.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"top secret");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_root_is_served_when_confined() {
        let (dir, mut config) = fixture();
        let alias = dir.path().join("alias");
        std::os::unix::fs::symlink(&config.root, &alias).unwrap();
        config.root = alias.to_str().unwrap().to_string();

        let files = StaticFiles::new(&config);
        let (status, _, body) = get(&files, "/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"body{}");
    }

    #[tokio::test]
    async fn test_any_method_is_a_read() {
        let (_dir, config) = fixture();
        let files = StaticFiles::new(&config);

        for method in [Method::POST, Method::PUT, Method::DELETE] {
            let resp = files.handle(&parts(method, "/style.css")).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_query_string_is_ignored() {
        let (_dir, config) = fixture();
        let files = StaticFiles::new(&config);

        let (status, _, body) = get(&files, "/style.css?v=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"body{}");
    }
}
