use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;

use segment_router::config::load_config;
use segment_router::routing::Dispatcher;

#[derive(Parser)]
#[command(name = "route-check")]
#[command(about = "Match request paths against a route file without starting a server", long_about = None)]
struct Cli {
    /// Route file (TOML).
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    /// Request paths to match, e.g. /user/5/dashboard
    #[arg(required = true)]
    paths: Vec<String>,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let dispatcher = Dispatcher::new(config.build_table(|route| route.name.clone())?);

    let mut all_matched = true;
    for path in &cli.paths {
        let line = match dispatcher.dispatch(path) {
            Ok(matched) => json!({
                "path": path,
                "route": matched.handler,
                "params": matched.params,
            }),
            Err(miss) => {
                all_matched = false;
                let failures: Vec<_> = miss
                    .attempts
                    .iter()
                    .map(|attempt| {
                        json!({
                            "route": attempt.route,
                            "kind": attempt.failure.kind.to_string(),
                            "position": attempt.failure.position,
                            "expected": attempt.failure.expected,
                        })
                    })
                    .collect();
                json!({
                    "path": path,
                    "route": null,
                    "failures": failures,
                })
            }
        };
        println!("{}", serde_json::to_string(&line)?);
    }

    Ok(if all_matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
