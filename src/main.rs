use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::Level;

use git_release::cli::{run_release_workflow, Operation, Outcome, ReleaseArgs};
use git_release::config;
use git_release::git::{Git2Repository, Repository};
use git_release::ui;

const COMMANDS_HELP: &str = "\
Commands (run on a branch):
  init                       Tag HEAD as <branch>-0.0.0
  patch | minor | major      Bump the nearest release and tag HEAD
  match                      Re-tag the nearest release's version under this branch
  exact <major> <minor> <patch>
                             Tag HEAD with an explicit version
  defer                      'match' on a forked branch, 'patch' otherwise (default)

Commands (deploy checkouts):
  sync                       Check out the nearest release tag (default when detached)
  next | prev                Step to the neighbouring release
  ver <major.minor.patch>    Check out a specific release";

#[derive(clap::Parser)]
#[command(
    name = "git-release",
    about = "Create signed release tags and deploy them by checkout",
    version,
    after_help = COMMANDS_HELP
)]
struct Args {
    #[arg(short, long, help = "Proceed even with uncommitted changes")]
    dirty: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv)")]
    verbose: u8,

    #[arg(help = "Operation to run; chosen from the checkout when omitted")]
    command: Option<String>,

    #[arg(help = "Operation arguments", allow_hyphen_values = true)]
    args: Vec<String>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    // Reject bad commands before touching the repository
    let operation = args
        .command
        .as_deref()
        .map(|token| Operation::parse(token, &args.args))
        .transpose()?;

    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let repo = Git2Repository::open(&cwd)?;
    let config = config::load_config(args.config.as_deref(), repo.workdir())?;

    let release_args = ReleaseArgs {
        operation,
        allow_dirty: args.dirty,
    };

    match run_release_workflow(&repo, &config, &release_args)? {
        Outcome::Tagged { plan, warnings } => {
            warnings.iter().for_each(ui::display_boundary_warning);
            ui::display_release_plan(&plan);
        }
        Outcome::Deployed { tag, warnings } => {
            warnings.iter().for_each(ui::display_boundary_warning);
            ui::display_deployed(&tag.name());
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
