use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;

use cpu::{Halt, Key, Machine};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rand::{SeedableRng, rngs::StdRng};

mod console;

/// Cartridge program tester
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Program to load, as text or a binary cartridge image
    program: PathBuf,

    /// Seed for the random number instructions
    #[clap(long)]
    seed: Option<u64>,

    /// Run to completion without prompting, then print the final frame
    #[clap(long)]
    batch: bool,

    /// Stop a batch run after this many steps
    #[clap(long, requires = "batch")]
    max_steps: Option<usize>,

    /// Write the program as a binary cartridge image and exit
    #[clap(long, value_name = "FILE", conflicts_with = "batch")]
    assemble: Option<PathBuf>,
}

fn main() -> Result<()> {
    let env = env_logger::Env::default()
        .filter_or("SMNES_LOG", "info")
        .write_style_or("SMNES_LOG", "always");
    env_logger::init_from_env(env);

    let args = Args::parse();
    let data = std::fs::read(&args.program)
        .with_context(|| format!("failed to read {:?}", args.program))?;
    let program = cart::load(&data)
        .with_context(|| format!("failed to load {:?}", args.program))?;
    info!("loaded {} instructions", program.len());

    if let Some(path) = &args.assemble {
        std::fs::write(path, cart::to_bytes(&program))
            .with_context(|| format!("failed to write {path:?}"))?;
        info!("wrote cartridge image to {path:?}");
        return Ok(());
    }

    let mut rng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let mut vm = Machine::new(program);

    if args.batch {
        let max = args.max_steps.unwrap_or(usize::MAX);
        let start = std::time::Instant::now();
        let r = vm.run_until(&mut rng, |_, i| i >= max);
        info!("batch run complete in {:?}", start.elapsed());
        print!("{}", cart::frame(&vm));
        match r {
            Some(h) => println!("{}", halt_message(h)),
            None => warn!("stopped after {max} steps"),
        }
        return Ok(());
    }

    // Blocking loop, listening to the stdin reader thread
    let lines = console::worker();
    loop {
        println!("\n=======================");
        println!("Type \"Quit\" to exit");
        println!("Type \"Output\" to print the cartridge listing");
        println!("Type \"Run\" to test the program");
        println!("=======================\n");
        prompt()?;
        let Ok(line) = lines.recv() else {
            break;
        };
        match line.trim() {
            "quit" | "Quit" => break,
            "output" | "Output" => {
                print!("{}", cart::listing(vm.program()));
            }
            "run" | "Run" => {
                vm.reset();
                if !session(&mut vm, &mut rng, &lines)? {
                    break;
                }
            }
            _ => continue,
        }
        println!("\nHit ENTER to continue...");
        if lines.recv().is_err() {
            break;
        }
    }
    println!("Exiting...");
    Ok(())
}

fn prompt() -> Result<()> {
    print!(">");
    std::io::stdout().flush().context("failed to flush stdout")
}

fn halt_message(h: Halt) -> &'static str {
    match h {
        Halt::Finished => "Program Finished!",
        Halt::OutOfRange => {
            "!! Program Terminated Program Counter Out Of Range !!"
        }
    }
}

/// Runs the loaded program one step per line of input
///
/// Returns `false` if `stdin` was closed during the run.
fn session(
    vm: &mut Machine,
    rng: &mut StdRng,
    lines: &mpsc::Receiver<String>,
) -> Result<bool> {
    loop {
        print!("{}", "\n".repeat(20));
        if let Some(i) = vm.current() {
            println!("{i}");
        }
        if let Some(h) = vm.step(rng) {
            if h == Halt::Finished {
                print!("{}", cart::frame(vm));
            }
            println!("{}", halt_message(h));
            return Ok(true);
        }
        print!("{}", cart::frame(vm));

        println!("Hit ENTER or type \"Quit\" to leave");
        println!("Use wasd for the D-pad and 1234 for Select, Start, A and B");
        prompt()?;
        let Ok(line) = lines.recv() else {
            return Ok(false);
        };
        let line = line.trim();
        if matches!(line, "quit" | "Quit") {
            println!("Exiting program...");
            return Ok(true);
        }
        let mut chars = line.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(k) = Key::from_char(c) {
                if !vm.press(k) {
                    info!("dropping {k:?}; a key is already pending");
                }
            }
        }
    }
}
