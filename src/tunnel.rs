#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncRead, BufReader, ReadBuf};

    #[test]
    fn test_extract_url_from_noise() {
        let line = "2026-08-07T12:00:01Z INF your url is https://abc-123.trycloudflare.com ready";
        assert_eq!(
            extract_url(line),
            Some("https://abc-123.trycloudflare.com".to_string())
        );
    }

    #[test]
    fn test_extract_url_no_match() {
        assert_eq!(extract_url("Starting tunnel connection..."), None);
        assert_eq!(extract_url("visit http://localhost:8000"), None);
    }

    #[test]
    fn test_extract_url_rejects_bad_subdomain() {
        // Underscores are not part of the provider's hostname alphabet
        assert_eq!(extract_url("https://bad_sub.trycloudflare.com"), None);
    }

    #[test]
    fn test_extract_url_stops_at_domain_suffix() {
        let line = "https://witty-otter-42.trycloudflare.com/index.html";
        assert_eq!(
            extract_url(line),
            Some("https://witty-otter-42.trycloudflare.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_scan_stream_finds_url_after_noise() {
        let output = b"Thank you for trying Cloudflare Tunnel.\n\
Requesting new quick Tunnel on trycloudflare.com...\n\
+----------------------------------------------+\n\
|  https://abc-123.trycloudflare.com           |\n\
+----------------------------------------------+\n";

        let url = scan_stream(output.as_slice()).await;
        assert_eq!(url, Some("https://abc-123.trycloudflare.com".to_string()));
    }

    #[tokio::test]
    async fn test_scan_stream_eof_without_match() {
        let output = b"Starting tunnel\nconnection refused\n";
        assert_eq!(scan_stream(output.as_slice()).await, None);
    }

    #[tokio::test]
    async fn test_scan_stream_empty() {
        assert_eq!(scan_stream(b"".as_slice()).await, None);
    }

    /// Yields its payload on the first read, then panics. Lets the tests
    /// prove the scanner never reads past the chunk containing the match.
    struct OneShotReader {
        data: Option<Vec<u8>>,
    }

    impl AsyncRead for OneShotReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            match self.data.take() {
                Some(data) => {
                    buf.put_slice(&data);
                    Poll::Ready(Ok(()))
                }
                None => panic!("stream was read past the matching line"),
            }
        }
    }

    #[tokio::test]
    async fn test_scan_stream_stops_at_first_match() {
        let reader = OneShotReader {
            data: Some(
                b"noise line one\nhttps://abc-123.trycloudflare.com\ntrailing line\n".to_vec(),
            ),
        };

        // A second poll of the reader would panic; returning the URL proves
        // the scanner stopped at the match instead of draining to EOF.
        let url = scan_stream(BufReader::new(reader)).await;
        assert_eq!(url, Some("https://abc-123.trycloudflare.com".to_string()));
    }

    #[test]
    fn test_resolve_binary_by_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let resolved = resolve_binary(file.path().to_str().unwrap()).unwrap();
        assert_eq!(resolved, file.path());
    }

    #[test]
    fn test_resolve_binary_missing_path() {
        let result = resolve_binary("/definitely/not/here/cloudflared");
        assert!(matches!(result, Err(QuickshareError::BinaryNotFound(_))));
    }

    #[test]
    fn test_resolve_binary_missing_name() {
        let result = resolve_binary("quickshare-no-such-binary");
        assert!(matches!(result, Err(QuickshareError::BinaryNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_binary_from_path_env() {
        let resolved = resolve_binary("sh").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("sh"));
    }
}

use crate::config::TunnelConfig;
use crate::error::{QuickshareError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::time::timeout;
use tracing::{debug, info};

/// Public hostname form announced by the tunnel provider.
const TUNNEL_URL_PATTERN: &str = r"https://[a-zA-Z0-9-]+\.trycloudflare\.com";

fn tunnel_url_regex() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| Regex::new(TUNNEL_URL_PATTERN).expect("tunnel URL pattern compiles"))
}

/// A running tunnel process and the public URL it announced.
///
/// The child is killed when the handle is dropped, so the tunnel never
/// outlives the run that created it. Its output pipes are kept open but
/// unread once the URL is known; the provider keeps logging after the
/// banner, and a closed pipe would end it early.
pub struct TunnelHandle {
    url: String,
    _child: Child,
    _stdout: Lines<BufReader<ChildStdout>>,
    _stderr: Lines<BufReader<ChildStderr>>,
}

impl TunnelHandle {
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Resolve the configured tunnel executable to a concrete path.
///
/// A value containing a path separator is checked on disk directly; a bare
/// name is searched in PATH. Either way a missing binary is reported before
/// any spawn is attempted.
pub fn resolve_binary(binary: &str) -> Result<PathBuf> {
    let candidate = Path::new(binary);

    if candidate.components().count() > 1 {
        if candidate.is_file() {
            return Ok(candidate.to_path_buf());
        }
        return Err(QuickshareError::BinaryNotFound(candidate.to_path_buf()));
    }

    if let Some(paths) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&paths) {
            let full = dir.join(candidate);
            if full.is_file() {
                return Ok(full);
            }
        }
    }

    Err(QuickshareError::BinaryNotFound(candidate.to_path_buf()))
}

/// Launch the tunnel process against the local port and block until it
/// announces a public URL, exits, or the configured scan timeout elapses.
pub async fn establish(config: &TunnelConfig, port: u16) -> Result<TunnelHandle> {
    let binary = resolve_binary(&config.binary)?;

    let mut command = Command::new(&binary);
    command
        .arg("tunnel")
        .arg("--url")
        .arg(format!("http://localhost:{port}"));

    if !config.extra_args.trim().is_empty() {
        let extra = shlex::split(&config.extra_args).ok_or_else(|| {
            QuickshareError::ConfigError(format!(
                "Failed to parse tunnel extra args: {}",
                config.extra_args
            ))
        })?;
        command.args(extra);
    }

    command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(Stdio::null())
        .kill_on_drop(true);

    debug!("Launching tunnel: {} port {}", binary.display(), port);

    let mut child = command
        .spawn()
        .map_err(|e| QuickshareError::SpawnError(format!("{}: {e}", binary.display())))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| QuickshareError::SpawnError("stdout was not captured".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| QuickshareError::SpawnError("stderr was not captured".to_string()))?;

    let mut out_lines = BufReader::new(stdout).lines();
    let mut err_lines = BufReader::new(stderr).lines();

    info!("Waiting for tunnel to be established...");

    let url = match timeout(
        Duration::from_secs(config.scan_timeout_secs),
        scan_child(&mut out_lines, &mut err_lines),
    )
    .await
    {
        Ok(Some(url)) => url,
        Ok(None) => return Err(QuickshareError::TunnelNotEstablished),
        Err(_) => return Err(QuickshareError::TunnelTimeout(config.scan_timeout_secs)),
    };

    Ok(TunnelHandle {
        url,
        _child: child,
        _stdout: out_lines,
        _stderr: err_lines,
    })
}

/// Watch both child streams line by line until one of them announces the
/// public URL or both reach EOF. The provider writes its banner to stderr,
/// so the two pipes are scanned together the way a merged stream would be.
async fn scan_child(
    out_lines: &mut Lines<BufReader<ChildStdout>>,
    err_lines: &mut Lines<BufReader<ChildStderr>>,
) -> Option<String> {
    let mut out_done = false;
    let mut err_done = false;

    loop {
        let line = tokio::select! {
            res = out_lines.next_line(), if !out_done => match res {
                Ok(Some(line)) => Some(line),
                _ => {
                    out_done = true;
                    None
                }
            },
            res = err_lines.next_line(), if !err_done => match res {
                Ok(Some(line)) => Some(line),
                _ => {
                    err_done = true;
                    None
                }
            },
            else => break,
        };

        if let Some(line) = line {
            info!(target: "tunnel", "{}", line.trim_end());
            if let Some(url) = extract_url(&line) {
                return Some(url);
            }
        }
    }

    None
}

/// Scan a single output stream for the first line carrying a tunnel URL.
///
/// Returns as soon as a line matches; nothing past the match is consumed.
pub async fn scan_stream<R>(reader: R) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Ok(Some(line)) = lines.next_line().await {
        info!(target: "tunnel", "{}", line.trim_end());
        if let Some(url) = extract_url(&line) {
            return Some(url);
        }
    }

    None
}

fn extract_url(line: &str) -> Option<String> {
    tunnel_url_regex()
        .find(line)
        .map(|m| m.as_str().to_string())
}
