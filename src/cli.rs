use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seo-audit")]
#[command(
    version,
    about = "SEO Audit - Report on-page SEO and technical-health signals for a single page",
    long_about = "SEO Audit\n\nModes:\n- audit: load a URL in headless Chromium and run every check against it.\n- audit-html: run the same checks against a local HTML file (network probes still target --url).\n- serve: expose POST /seo over HTTP.\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose (debug) logging on stderr")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) for timeouts, browser and server settings"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit a live URL in a headless browser
    Audit {
        #[arg(help = "Absolute http(s) URL to audit")]
        url: String,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Checks to run (e.g. title,headings,spf); all when omitted"
        )]
        checks: Option<Vec<String>>,

        #[arg(long, help = "Navigation timeout in seconds (overrides config)")]
        nav_timeout: Option<u64>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Audit a local HTML file as if it had been served from --url
    AuditHtml {
        #[arg(help = "Path to the HTML document")]
        file: PathBuf,

        #[arg(long, help = "URL the document stands for; network probes target it")]
        url: String,

        #[arg(
            long,
            value_name = "VALUE",
            help = "content-type header to report for the document"
        )]
        content_type: Option<String>,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Checks to run (e.g. title,headings,spf); all when omitted"
        )]
        checks: Option<Vec<String>>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Serve the audit endpoint (POST /seo)
    Serve {
        #[arg(long, help = "Bind address (overrides config)")]
        host: Option<String>,

        #[arg(long, help = "Port (overrides config and PORT)")]
        port: Option<u16>,
    },
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
