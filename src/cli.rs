#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_defaults() {
        let args = CliArgs::try_parse_from(["quickshare"]).unwrap();

        assert!(args.port.is_none());
        assert!(args.dir.is_none());
        assert!(args.tunnel_bin.is_none());
        assert!(args.tunnel_timeout.is_none());
        assert!(!args.keep_serving);
        assert!(!args.no_open);
        assert!(args.config.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_cli_args_parsing() {
        let args = CliArgs::try_parse_from([
            "quickshare",
            "-p",
            "3000",
            "-d",
            "./public",
            "--tunnel-bin",
            "/opt/cloudflared",
            "--no-open",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(args.port, Some(3000));
        assert_eq!(args.dir, Some(PathBuf::from("./public")));
        assert_eq!(args.tunnel_bin, Some("/opt/cloudflared".to_string()));
        assert!(args.no_open);
        assert!(args.verbose);
    }

    #[test]
    fn test_cli_args_rejects_bad_port() {
        let result = CliArgs::try_parse_from(["quickshare", "--port", "not-a-port"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_args_tunnel_timeout() {
        let args = CliArgs::try_parse_from(["quickshare", "--tunnel-timeout", "90"]).unwrap();
        assert_eq!(args.tunnel_timeout, Some(90));
    }
}

use clap::Parser;
use std::path::PathBuf;

/// Quickshare - serve a directory locally and expose it through a public tunnel
#[derive(Parser, Debug)]
#[command(name = "quickshare")]
#[command(about = "Serve the current directory over HTTP and expose it through a Cloudflare quick tunnel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct CliArgs {
    /// Port to serve on (default 8000, 0 picks a free port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory to serve (defaults to the current directory)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Path or name of the tunnel executable
    #[arg(long)]
    pub tunnel_bin: Option<String>,

    /// Seconds to wait for the tunnel to announce its public URL
    #[arg(long)]
    pub tunnel_timeout: Option<u64>,

    /// Keep serving locally if the tunnel cannot be established
    #[arg(long)]
    pub keep_serving: bool,

    /// Do not open the public URL in a browser
    #[arg(long)]
    pub no_open: bool,

    /// Override the default config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
