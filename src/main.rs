use clap::Parser;
use pith::diagnostics::PrintReporter;
use pith::loader::FsLoader;
use pith::pith_env::Pith;
use std::io::Write;

#[derive(Parser)]
#[command(name = "pith")]
#[command(about = "An indentation-sensitive scripting language interpreter")]
#[command(version)]
struct Cli {
    /// Script file to execute in batch mode. Omit for an interactive REPL.
    #[arg()]
    script_file: Option<String>,

    /// Run the given script, then drop into an interactive REPL sharing
    /// its global environment.
    #[arg(short = 'i', long = "interactive", value_name = "FILE")]
    interactive_after: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let base_dir = std::env::current_dir().unwrap_or_else(|_| ".".into());
    let mut pith = Pith::new(Box::new(FsLoader::new(base_dir)));
    let mut reporter = PrintReporter::default();

    if let Some(path) = cli.interactive_after {
        run_file(&mut pith, &mut reporter, &path);
        repl(&mut pith, &mut reporter);
        return;
    }

    match cli.script_file {
        Some(path) => {
            let ok = run_file(&mut pith, &mut reporter, &path);
            std::process::exit(if ok { 0 } else { 1 });
        }
        None => {
            repl(&mut pith, &mut reporter);
        }
    }
}

fn run_file(pith: &mut Pith, reporter: &mut PrintReporter, path: &str) -> bool {
    match std::fs::read_to_string(path) {
        Ok(source) => pith.run(&source, reporter),
        Err(e) => {
            eprintln!("Error: cannot read script file: {}: {}", path, e);
            false
        }
    }
}

fn repl(pith: &mut Pith, reporter: &mut PrintReporter) {
    let stdin = std::io::stdin();
    loop {
        print!("pith> ");
        std::io::stdout().flush().ok();
        let mut line = String::new();
        if stdin.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        pith.run(&line, reporter);
    }
}
