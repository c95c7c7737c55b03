use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use framewire_core::{SessionOptions, decode_file};

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let input = path.join("input.bin");
        if !input.exists() {
            continue;
        }
        let options = read_options(&path.join("options.json"))?;
        let output = path.join("expected_report.json");
        regenerate_one(&input, options, &output)?;
    }

    Ok(())
}

fn read_options(path: &Path) -> Result<SessionOptions, String> {
    if !path.exists() {
        return Ok(SessionOptions::default());
    }
    let json = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;
    serde_json::from_str(&json).map_err(|err| format!("invalid {}: {}", path.display(), err))
}

fn regenerate_one(input: &Path, options: SessionOptions, output: &Path) -> Result<(), String> {
    let mut report = decode_file(input, options)
        .map_err(|err| format!("decode failed for {}: {}", input.display(), err))?;
    report.input.name = "input.bin".to_string();
    let json = serde_json::to_string(&report)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    fs::write(output, json)
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}
