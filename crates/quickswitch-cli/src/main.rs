// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use quickswitch_answer::AnswerFetcher;
use quickswitch_net::{BRAVE_SUGGEST_URL, BraveSuggestClient, SUGGEST_TIMEOUT, live_providers};
use quickswitch_tui::PopupServices;
use runtime::SnapshotRuntime;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `quickswitch --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    let settings = config
        .to_snapshot()
        .with_context(|| format!("invalid config {}", options.config_path.display()))?;

    let mut host = if options.demo {
        SnapshotRuntime::demo()
    } else {
        let session_path = options.session_path.as_ref().ok_or_else(|| {
            anyhow!("no browser session given; pass --session <file> or --demo")
        })?;
        SnapshotRuntime::from_file(session_path)?
    };

    let services = PopupServices {
        suggestions: Some(Arc::new(BraveSuggestClient::new(
            BRAVE_SUGGEST_URL,
            SUGGEST_TIMEOUT,
        )?)),
        answers: Some(Arc::new(AnswerFetcher::new(live_providers(
            &settings.ai_api_key,
        )?))),
    };

    if options.check_only {
        return Ok(());
    }

    quickswitch_tui::run_popup(&settings, &mut host, &services)?;

    for line in runtime::replay_lines(host.executed(), host.opens_urls_directly()) {
        println!("{line}");
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    session_path: Option<PathBuf>,
    demo: bool,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        session_path: None,
        demo: false,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--session" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--session requires a file path"))?;
                options.session_path = Some(PathBuf::from(value.as_ref()));
            }
            "--demo" => {
                options.demo = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("quickswitch");
    println!("  --config <path>          Use a specific config path");
    println!("  --session <path>         Browser session JSON exported by the extension");
    println!("  --demo                   Launch with a canned session");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config and service setup, then exit");
    println!("  --help                   Show this help");
}
