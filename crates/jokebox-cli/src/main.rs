// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use jokebox_app::{RandomPicker, SessionState};
use runtime::SourceRuntime;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

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
            "load config {}; run `jokebox --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let client = jokebox_source::Client::new(
        config.source_endpoint(),
        config.source_timeout()?,
        config.reveal_delay()?,
    )
    .with_context(|| {
        format!(
            "invalid [source] config in {}; fix endpoint/timeout values",
            options.config_path.display()
        )
    })?;
    if options.check_only {
        return Ok(());
    }

    let _log_guard = logging::init(&config)?;
    info!(
        endpoint = client.endpoint(),
        reveal_delay_ms = client.reveal_delay().as_millis() as u64,
        "starting jokebox"
    );

    let mut picker = match config.emoji_seed() {
        Some(seed) => RandomPicker::seeded(seed),
        None => RandomPicker::from_entropy(),
    };
    let mut state = SessionState::default();
    let mut runtime = SourceRuntime::new(Arc::new(client));
    jokebox_tui::run_app(&mut state, &mut runtime, &mut picker)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
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
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
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
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("jokebox");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config and exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use crate::config::Config;
    use anyhow::Result;
    use std::path::PathBuf;
    use std::time::Duration;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/jokebox-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn check_with_config_validates_the_named_file() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("jokes.toml");
        std::fs::write(
            &path,
            "version = 1\n[source]\nendpoint = \"http://127.0.0.1:9000/random_joke\"\nreveal_delay = \"0ms\"\n[ui]\nemoji_seed = 3\n",
        )?;

        let options = parse_cli_args(
            vec!["--check", "--config", path.to_str().expect("utf-8 temp path")],
            default_options_path(),
        )?;
        assert!(options.check_only);
        assert!(!options.print_example);
        assert_eq!(options.config_path, path);

        let config = Config::load(&options.config_path)?;
        assert_eq!(config.source_endpoint(), "http://127.0.0.1:9000/random_joke");
        assert_eq!(config.reveal_delay()?, Duration::ZERO);
        assert_eq!(config.emoji_seed(), Some(3));
        Ok(())
    }

    #[test]
    fn check_with_config_surfaces_invalid_log_level() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("jokes.toml");
        std::fs::write(&path, "version = 1\n[logging]\nlevel = \"loud\"\n")?;

        let options = parse_cli_args(
            vec!["--config", path.to_str().expect("utf-8 temp path"), "--check"],
            default_options_path(),
        )?;
        let error = Config::load(&options.config_path).expect_err("bad level should fail");
        assert!(error.to_string().contains("logging.level"));
        Ok(())
    }

    #[test]
    fn repeated_config_flag_keeps_last_path() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/first.toml", "--config", "/second.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/second.toml"));
        Ok(())
    }
}
