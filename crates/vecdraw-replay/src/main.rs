//! Headless replay entry point.
//!
//! Usage: `vecdraw-replay <script.json> [settings.json]`, or
//! `vecdraw-replay --shortcuts` to list the key bindings scripts may use.

use std::process::ExitCode;
use vecdraw_core::{EditorResult, EditorSettings};
use vecdraw_replay::{ShortcutRegistry, Summary, load_settings, replay_file};

fn run(script: &str, settings: Option<&str>) -> EditorResult<String> {
    let settings = match settings {
        Some(path) => load_settings(path)?,
        None => EditorSettings::default(),
    };
    let editor = replay_file(script, settings)?;
    Ok(Summary::from_editor(&editor).to_json()?)
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().is_some_and(|a| a == "--shortcuts") {
        ShortcutRegistry::print_all();
        return ExitCode::SUCCESS;
    }
    let Some(script) = args.first() else {
        eprintln!("usage: vecdraw-replay <script.json> [settings.json]");
        return ExitCode::FAILURE;
    };

    log::info!("Replaying {script}");
    match run(script, args.get(1).map(String::as_str)) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Replay failed: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
