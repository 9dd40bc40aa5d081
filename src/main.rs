use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use git_vertag::config::{self, Config};
use git_vertag::domain::{BuildId, PreReleaseId};
use git_vertag::manager::{TagChange, TagManager};
use git_vertag::store::{DryRunStore, Git2Store, TagStore};
use git_vertag::ui;

mod logging;

#[derive(Parser)]
#[command(
    name = "git-vertag",
    version,
    about = "Manage version tags following the semantic versioning specification"
)]
struct Cli {
    #[arg(
        short = 'C',
        long,
        value_name = "PATH",
        global = true,
        help = "Run as if git was started in <PATH> instead of the current working directory"
    )]
    current_directory: Option<PathBuf>,

    #[arg(long, global = true, help = "Show the git commands instead of changing tags")]
    dry_run: bool,

    #[arg(long, global = true, help = "Fetch tags from the remote first")]
    fetch: bool,

    #[arg(long, global = true, help = "Tag name prefix [default: v]")]
    prefix: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Also maintain MAJOR and MAJOR.MINOR tags pointing at the latest release"
    )]
    ancestors: bool,

    #[arg(long, global = true, value_name = "REMOTE", help = "Push tag changes to <REMOTE>")]
    push_to: Option<String>,

    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Show debug output")]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current version tag (default)
    Get,
    /// Create a tag for the next major version and print it
    Major(NextArgs),
    /// Create a tag for the next minor version and print it
    Minor(NextArgs),
    /// Create a tag for the next patch version and print it
    Patch(NextArgs),
    /// Create a tag with a new (or incremented) pre-release and print it
    Pre(NextArgs),
    /// Create a tag with new build metadata and print it
    Build(BuildArgs),
    /// Create a tag for the release of the current pre-release and print it
    Release(BuildArgs),
    /// Delete the tag for the current version and print it
    Delete,
    /// Recreate the tag for the current version at HEAD and print it
    Replace(MessageArgs),
}

#[derive(Args)]
struct MessageArgs {
    #[arg(
        short,
        long,
        help = "Tag message; multiple values become separate paragraphs"
    )]
    message: Vec<String>,

    #[arg(short = 'F', long, help = "Take the tag message from a file (- for stdin)")]
    file: Option<String>,
}

#[derive(Args)]
struct BuildArgs {
    #[arg(
        short,
        long,
        value_delimiter = '.',
        help = "Build metadata identifier (repeatable, or dot-separated)"
    )]
    build: Vec<BuildId>,

    #[command(flatten)]
    message: MessageArgs,
}

#[derive(Args)]
struct NextArgs {
    #[arg(
        short,
        long,
        value_delimiter = '.',
        help = "Pre-release identifier (repeatable, or dot-separated)"
    )]
    pre: Vec<PreReleaseId>,

    #[command(flatten)]
    build: BuildArgs,
}

impl Cli {
    /// Configuration file values overridden by command-line flags
    fn config(&self) -> Result<Config> {
        let mut config = config::load_config(self.config.as_deref())
            .context("Failed to load configuration")?;

        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        if let Some(remote) = &self.push_to {
            config.push_to = Some(remote.clone());
        }
        config.ancestors |= self.ancestors;
        config.fetch |= self.fetch;
        Ok(config)
    }

    fn store(&self, config: &Config) -> Result<Box<dyn TagStore>> {
        let path = self
            .current_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let store = Git2Store::open(&path)?.with_fetch_remote(config.fetch_remote.clone());

        if self.dry_run {
            ui::display_status("Dry run: tags are left unchanged");
            Ok(Box::new(DryRunStore::new(store)))
        } else {
            Ok(Box::new(store))
        }
    }
}

fn main() {
    let cli = Cli::parse();

    logging::setup_logging(if cli.verbose {
        logging::Level::Verbose
    } else {
        logging::Level::Default
    });

    if let Err(e) = run(cli) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config()?;
    let manager = TagManager::new(cli.store(&config)?, config);

    match cli.command.unwrap_or(Command::Get) {
        Command::Get => {
            let current = manager.get_ver()?;
            ui::print_tag(&manager.tag_name(&current));
        }
        Command::Major(args) => {
            let (pre, build, m) = args.into_parts();
            report(manager.update_major(pre, build, &m.message, m.file.as_deref())?);
        }
        Command::Minor(args) => {
            let (pre, build, m) = args.into_parts();
            report(manager.update_minor(pre, build, &m.message, m.file.as_deref())?);
        }
        Command::Patch(args) => {
            let (pre, build, m) = args.into_parts();
            report(manager.update_patch(pre, build, &m.message, m.file.as_deref())?);
        }
        Command::Pre(args) => {
            let (pre, build, m) = args.into_parts();
            report(manager.update_pre(pre, build, &m.message, m.file.as_deref())?);
        }
        Command::Build(args) => {
            let m = args.message;
            report(manager.build(args.build, &m.message, m.file.as_deref())?);
        }
        Command::Release(args) => {
            let m = args.message;
            report(manager.release(args.build, &m.message, m.file.as_deref())?);
        }
        Command::Delete => {
            let current = manager.get_ver()?;
            manager.delete_ver(&current)?;
            let tag = manager.tag_name(&current);
            ui::display_success(&format!("Deleted tag {}", tag));
            ui::print_tag(&tag);
        }
        Command::Replace(m) => {
            let current = manager.get_ver()?;
            manager.replace_ver(&current, &m.message, m.file.as_deref())?;
            let tag = manager.tag_name(&current);
            ui::display_success(&format!("Replaced tag {}", tag));
            ui::print_tag(&tag);
        }
    }

    Ok(())
}

impl NextArgs {
    fn into_parts(self) -> (Vec<PreReleaseId>, Vec<BuildId>, MessageArgs) {
        (self.pre, self.build.build, self.build.message)
    }
}

fn report(change: TagChange) {
    ui::display_tag_change(&change.previous, &change.next);
    ui::print_tag(&change.next);
}
