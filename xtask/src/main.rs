use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for litegpu")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests and doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates with warnings denied
    Clippy,
    /// Run tests; GPU tests skip themselves without an adapter
    Test {
        /// Only run the GPU-free crates
        #[arg(long)]
        no_gpu: bool,
    },
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Compile every .vert/.frag/.comp file under a directory
    Shaders {
        #[arg(default_value = "shaders")]
        dir: PathBuf,
    },
}

const GPU_FREE_CRATES: &[&str] = &[
    "litegpu-common",
    "litegpu-input",
    "litegpu-frame",
    "litegpu-render",
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo("fmt", &["fmt", "--all", "--", "--check"])?;
            clippy()?;
            test(false)?;
            cargo("doc", &["doc", "--workspace", "--no-deps"])?;
        }
        Commands::Fmt => cargo("fmt", &["fmt", "--all", "--", "--check"])?,
        Commands::Clippy => clippy()?,
        Commands::Test { no_gpu } => test(no_gpu)?,
        Commands::Doc => cargo("doc", &["doc", "--workspace", "--no-deps"])?,
        Commands::Build => cargo("build", &["build", "--workspace"])?,
        Commands::Shaders { dir } => shaders(&dir)?,
    }

    Ok(())
}

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {step} failed");
    }
    Ok(())
}

fn clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test(no_gpu: bool) -> Result<()> {
    if !no_gpu {
        return cargo("test", &["test", "--workspace"]);
    }
    let mut args = vec!["test"];
    for name in GPU_FREE_CRATES {
        args.extend(["-p", *name]);
    }
    cargo("test", &args)
}

fn shaders(dir: &Path) -> Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    let mut failed = 0;
    for entry in entries {
        let path = entry?.path();
        let is_shader = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("vert" | "frag" | "comp")
        );
        if !is_shader {
            continue;
        }
        let path_arg = path.to_string_lossy().into_owned();
        if cargo(
            "run",
            &["run", "-q", "-p", "litegpu-cli", "--", "compile", path_arg.as_str()],
        )
        .is_err()
        {
            failed += 1;
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} shader(s) failed to compile");
    }
    Ok(())
}
