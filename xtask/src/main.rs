use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LAMBDA_PACKAGE: &str = "face_auth_lambda";
const DIST_DIR: &str = "infra/dist";

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the employee face-authentication workspace",
    long_about = "A unified CLI for CI checks and Lambda packaging in the\n\
                  employee face-authentication workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run unit tests for every crate
    Test,
    /// Run CI checks (fmt, clippy, tests)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::All)]
        job: CiJob,
    },
    /// Build and zip the Lambda binaries as `bootstrap` artifacts
    LambdaPackage {
        /// Compilation target triple for Lambda binaries
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build profile used for binaries
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
        /// Package a single function instead of both
        #[arg(value_enum, long)]
        function: Option<LambdaFunction>,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting and clippy
    Lint,
    /// Unit tests
    Test,
    /// Lint + test
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    fn dir_name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    fn as_cargo_flag(self) -> Option<&'static str> {
        match self {
            Self::Debug => None,
            Self::Release => Some("--release"),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LambdaFunction {
    Registration,
    Authentication,
}

impl LambdaFunction {
    const ALL: [Self; 2] = [Self::Registration, Self::Authentication];

    fn bin_name(self) -> &'static str {
        match self {
            Self::Registration => "registration_lambda",
            Self::Authentication => "authentication_lambda",
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn package_lambdas(target: &str, profile: BuildProfile, functions: &[LambdaFunction]) {
    ensure_rust_target_installed(target);

    step("Build lambda binaries");

    let mut cargo_args = vec!["build", "-p", LAMBDA_PACKAGE, "--target", target];
    for function in functions {
        cargo_args.push("--bin");
        cargo_args.push(function.bin_name());
    }
    if let Some(flag) = profile.as_cargo_flag() {
        cargo_args.push(flag);
    }
    run_cargo(&cargo_args);

    step("Package lambda zip artifacts");
    let target_dir = Path::new("target").join(target).join(profile.dir_name());
    let dist_dir = Path::new(DIST_DIR);
    fs::create_dir_all(dist_dir).expect("failed to create lambda dist directory");

    eprintln!("\nPackaged artifacts:");
    for function in functions {
        let zip_path = dist_dir.join(format!("{}.zip", function.bin_name()));
        package_lambda_zip(
            *function,
            &target_dir.join(binary_name(function.bin_name(), target)),
            &zip_path,
        );
        eprintln!("- {}", zip_path.display());
    }
}

/// Fails early when the cross target is missing; skipped when rustup itself
/// is unavailable (for example in a toolchain-only container).
fn ensure_rust_target_installed(target: &str) {
    let installed = match Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output()
    {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).into_owned()
        }
        Ok(output) => panic!(
            "`rustup target list --installed` exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        Err(error) => {
            eprintln!("warning: rustup unavailable ({error}); not checking target {target}");
            return;
        }
    };

    if !installed.lines().map(str::trim).any(|line| line == target) {
        panic!("lambda target `{target}` is missing; run `rustup target add {target}` first");
    }
}

fn binary_name(bin_name: &str, target: &str) -> String {
    if target.contains("windows") {
        format!("{bin_name}.exe")
    } else {
        bin_name.to_string()
    }
}

/// Writes the built binary of `function` into `zip_path` as the executable
/// `bootstrap` entry the `provided.al2023` runtime expects.
fn package_lambda_zip(function: LambdaFunction, binary_path: &Path, zip_path: &Path) {
    let name = function.bin_name();
    let binary = fs::read(binary_path).unwrap_or_else(|error| {
        panic!("{name}: cannot read built binary '{}': {error}", binary_path.display())
    });
    let file = fs::File::create(zip_path)
        .unwrap_or_else(|error| panic!("{name}: cannot create '{}': {error}", zip_path.display()));

    if let Err(error) = write_bootstrap_zip(file, &binary) {
        panic!("{name}: failed to write '{}': {error}", zip_path.display());
    }
}

fn write_bootstrap_zip(file: fs::File, binary: &[u8]) -> ZipResult<()> {
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options)?;
    zip.write_all(binary)?;
    zip.finish()?;
    Ok(())
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_lint() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);
}

fn ci_test() {
    step("Test face_auth_core");
    run_cargo(&["test", "-p", "face_auth_core"]);

    step("Test face_auth_lambda");
    run_cargo(&["test", "-p", LAMBDA_PACKAGE]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Test => ci_test(),
        Commands::Ci { job } => {
            match job {
                CiJob::Lint => ci_lint(),
                CiJob::Test => ci_test(),
                CiJob::All => {
                    ci_lint();
                    ci_test();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LambdaPackage {
            target,
            profile,
            function,
        } => {
            let functions = match function {
                Some(value) => vec![value],
                None => LambdaFunction::ALL.to_vec(),
            };
            package_lambdas(&target, profile, &functions);
        }
    }
}
