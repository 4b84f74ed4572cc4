mod cli;
mod commands;
mod formatting;
mod server;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_audit, run_audit_html, run_serve};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let args = cli::parse();
    settings::init_tracing(args.verbose);

    match args.command {
        Commands::Audit {
            url,
            checks,
            nav_timeout,
            format,
            output,
        } => run_audit(args.config, url, checks, nav_timeout, format, output).await,
        Commands::AuditHtml {
            file,
            url,
            content_type,
            checks,
            format,
            output,
        } => run_audit_html(args.config, file, url, content_type, checks, format, output).await,
        Commands::Serve { host, port } => run_serve(args.config, host, port).await,
    }
}
