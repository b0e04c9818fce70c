//! The `asterc` command-line front-end.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use asterc::render::render_all;
use asterc::{compile, compile_and_typecheck, CompileOptions};
use aster_core::Envelope;
use aster_typeck::{CapabilityManifest, ModuleCache, TypecheckOptions};

#[derive(Parser)]
#[command(name = "asterc", version, about = "The Aster compiler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile and type-check a source file, printing diagnostics.
    Check {
        file: PathBuf,
        /// Lexicon locale (en, de, zh).
        #[arg(long, default_value = "en")]
        locale: String,
        /// Capability manifest JSON file.
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Directory searched for imported modules; repeatable.
        #[arg(long = "search-path")]
        search_paths: Vec<PathBuf>,
        /// Disable PII flow analysis.
        #[arg(long)]
        no_pii: bool,
        /// Disable colored output.
        #[arg(long)]
        no_color: bool,
        /// Print diagnostics as JSON instead of rendered reports.
        #[arg(long)]
        json: bool,
    },
    /// Compile a source file and emit the Core IR JSON envelope.
    Emit {
        file: PathBuf,
        /// Output path; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "en")]
        locale: String,
    },
}

fn main() -> ExitCode {
    match Cli::parse().command {
        Command::Check {
            file,
            locale,
            manifest,
            search_paths,
            no_pii,
            no_color,
            json,
        } => check(file, locale, manifest, search_paths, no_pii, no_color, json),
        Command::Emit {
            file,
            output,
            locale,
        } => emit(file, output, locale),
    }
}

fn check(
    file: PathBuf,
    locale: String,
    manifest: Option<PathBuf>,
    mut search_paths: Vec<PathBuf>,
    no_pii: bool,
    no_color: bool,
    json: bool,
) -> ExitCode {
    let source = match std::fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("asterc: cannot read {}: {e}", file.display());
            return ExitCode::FAILURE;
        }
    };

    let manifest = match manifest {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|text| CapabilityManifest::from_json(&text).map_err(|e| e.to_string()))
        {
            Ok(m) => Some(m),
            Err(e) => {
                eprintln!("asterc: cannot load manifest {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    if let Some(dir) = file.parent() {
        search_paths.push(dir.to_path_buf());
    }

    let options = CompileOptions {
        locale: locale.clone(),
        domain: None,
        file: Some(file.display().to_string()),
        typecheck: TypecheckOptions {
            manifest,
            module_cache: Some(Arc::new(ModuleCache::new())),
            module_search_paths: search_paths,
            locale,
            enforce_pii: !no_pii,
            ..Default::default()
        },
    };

    let result = compile_and_typecheck(&source, &options);
    if json {
        let out = serde_json::to_string_pretty(&result.diagnostics)
            .expect("diagnostics serialize to JSON");
        println!("{out}");
    } else if !result.diagnostics.is_empty() {
        let name = file.display().to_string();
        eprint!("{}", render_all(&result.diagnostics, &source, &name, !no_color));
    }
    if result.success {
        if !json {
            println!("ok: {}", file.display());
        }
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn emit(file: PathBuf, output: Option<PathBuf>, locale: String) -> ExitCode {
    let source = match std::fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("asterc: cannot read {}: {e}", file.display());
            return ExitCode::FAILURE;
        }
    };

    let options = CompileOptions {
        locale,
        domain: None,
        file: Some(file.display().to_string()),
        typecheck: TypecheckOptions::default(),
    };

    let result = compile(&source, &options);
    let Some(core) = result.core else {
        let name = file.display().to_string();
        eprint!("{}", render_all(&result.diagnostics, &source, &name, true));
        return ExitCode::FAILURE;
    };

    let envelope = Envelope::new(core, file.display().to_string());
    let json = envelope.to_json();
    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, json) {
                eprintln!("asterc: cannot write {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        }
        None => println!("{json}"),
    }
    ExitCode::SUCCESS
}
