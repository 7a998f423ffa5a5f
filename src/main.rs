use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use path_clean::PathClean;
use tracing_subscriber::EnvFilter;

use vuedeps::analysis::OsFileSystem;
use vuedeps::app::{self, Options};
use vuedeps::export::ExportFormat;
use vuedeps::parser::DEFAULT_EXTENSION;

#[derive(Parser)]
#[command(name = "vuedeps")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Show which components import which, as trees", long_about = None)]
struct Cli {
    /// Components to show, relative to the project root (defaults to all)
    targets: Vec<PathBuf>,

    /// Show the components that import each target
    #[arg(short = 'p', long = "parents")]
    show_parents: bool,

    /// Show the components each target imports (default unless --parents)
    #[arg(short = 'c', long = "children")]
    show_children: bool,

    /// One path per line, without indentation
    #[arg(short, long)]
    flat: bool,

    /// Color each tree's root line
    #[arg(long)]
    color: bool,

    /// Component file extension
    #[arg(long = "ext", value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Output format: tree or json
    #[arg(long, value_name = "FORMAT", default_value_t = ExportFormat::Tree)]
    format: ExportFormat,

    /// List import cycles after the trees
    #[arg(long)]
    cycles: bool,

    /// Project root (defaults to the current directory)
    #[arg(short = 'C', long = "dir", value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        eprintln!("{err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let project_root = match cli.dir {
        Some(dir) => cwd.join(dir).clean(),
        None => cwd,
    };

    let show_children = cli.show_children || !cli.show_parents;

    let options = Options {
        project_root,
        targets: cli.targets,
        show_children,
        show_parents: cli.show_parents,
        flat: cli.flat,
        color: cli.color,
        extension: cli.extension,
        format: cli.format,
        cycles: cli.cycles,
    };
    tracing::debug!(?options, "starting run");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    app::run(&OsFileSystem, &options, &mut out)?;
    out.flush()?;

    Ok(())
}

/// Logs go to stderr so stdout only ever carries rendered output.
fn init_logger(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("vuedeps=debug")
    } else if quiet {
        EnvFilter::new("vuedeps=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vuedeps=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
