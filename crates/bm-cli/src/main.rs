use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

mod commands;
mod config;
mod logger;

/// Byte Machine toolchain: assembler, disassembler and emulator.
///
/// The Byte Machine is a small stack-based virtual machine. Programs are
/// written in a line-oriented assembly language, translated to a flat binary
/// format, and executed with a bounded step count.
///
/// EXAMPLES:
///     bm asm fib.basm fib.bm        Assemble a program
///     bm disasm fib.bm              Print the program as assembly
///     bm run fib.bm --limit 100     Run for at most 100 steps
///
/// ENVIRONMENT VARIABLES:
///     BM_LOG               Log level (error, warn, info, debug, trace)
///     BM_STACK_CAPACITY    Maximum stack depth
///     BM_PROGRAM_CAPACITY  Maximum program length
///     BM_EXECUTION_LIMIT   Default step limit for `bm run`
///     NO_COLOR             Set to disable colored output
#[derive(Parser)]
#[command(name = "bm")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a source file into a binary program
    ///
    /// Translates one instruction per line. Blank lines and lines starting
    /// with '#' are skipped; text after '#' on an instruction line is a
    /// comment.
    ///
    /// EXAMPLES:
    ///     bm asm fib.basm fib.bm
    ///     bm basm fib.basm fib.bm
    #[command(visible_alias = "basm")]
    Asm {
        /// Path to the assembly source
        input: PathBuf,
        /// Path of the binary program to write
        output: PathBuf,
    },

    /// Disassemble a binary program
    ///
    /// Prints one instruction per line in a form the assembler accepts.
    ///
    /// EXAMPLES:
    ///     bm disasm fib.bm
    ///     bm disasm fib.bm > fib.basm
    #[command(visible_alias = "debasm")]
    Disasm {
        /// Path to the binary program
        input: PathBuf,
    },

    /// Execute a binary program and dump the stack
    ///
    /// Runs until `halt`, a fault, or the step limit. The final stack is
    /// printed bottom first. On a fault the error code is printed to stderr
    /// and the exit status is 1.
    ///
    /// EXAMPLES:
    ///     bm run fib.bm                 Run until halt or fault
    ///     bm run fib.bm --limit 69      Stop after 69 steps
    #[command(visible_alias = "bme")]
    Run {
        /// Path to the binary program
        input: PathBuf,
        /// Maximum number of steps; negative runs without bound
        #[arg(long, short = 'l', allow_negative_numbers = true)]
        limit: Option<i64>,
    },

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     bm completions bash > ~/.bash_completions/bm.bash
    ///     bm completions zsh > ~/.zfunc/_bm
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cli_config = config::Config::from_env();

    logger::init(cli_config.log_level(cli.verbose), !cli_config.no_color)
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Asm { input, output } => {
            let machine = load_machine_config()?;
            commands::asm::run(&input, &output, machine.program_capacity)?;
        }
        Commands::Disasm { input } => {
            let machine = load_machine_config()?;
            commands::disasm::run(&input, machine.program_capacity, &mut io::stdout())?;
        }
        Commands::Run { input, limit } => {
            let config = load_config()?;
            // Command-line flag overrides configuration
            let limit = limit.unwrap_or_else(|| config.execution_limit());
            let outcome = commands::run::run(&input, &config.machine(), limit)?;
            if let Some(fault) = outcome.fault {
                eprintln!("ERROR: {}", fault.code());
                std::process::exit(1);
            }
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "bm", &mut io::stdout());
        }
    }

    Ok(())
}

/// Load bm.toml / ~/.bm/config.toml / BM_* settings for the working directory
fn load_config() -> Result<bm_config::Config> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    bm_config::ConfigLoader::new()
        .load_from_directory(&cwd)
        .context("Failed to load configuration")
}

fn load_machine_config() -> Result<bm_config::MachineConfig> {
    Ok(load_config()?.machine())
}
