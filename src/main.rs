use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use pbxinject::commands::{self, fix_assets::FixAssetsOptions, inject::InjectOptions, ProjectOptions};

#[derive(Parser)]
#[command(name = "pbxinject")]
#[command(about = "Add the JS bundle and assets folder to an Xcode project", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ProjectArgs {
    /// Directory containing the .xcodeproj (defaults to current directory)
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Config file (default: <root>/pbxinject.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// The .xcodeproj to edit, relative to the root
    #[arg(long = "project")]
    xcodeproj: Option<String>,
    /// Native target name (default: project name)
    #[arg(long)]
    target: Option<String>,
    /// Group receiving the references (default: target name)
    #[arg(long)]
    group: Option<String>,
}

impl From<ProjectArgs> for ProjectOptions {
    fn from(args: ProjectArgs) -> Self {
        Self {
            root: args.root,
            config: args.config,
            xcodeproj: args.xcodeproj,
            target: args.target,
            group: args.group,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Add main.jsbundle and the assets folder to the Resources build phase
    Inject {
        #[command(flatten)]
        project: ProjectArgs,
        /// Only add the bundle
        #[arg(long)]
        no_assets: bool,
        /// Merge in memory and report, but do not write the project
        #[arg(long)]
        dry_run: bool,
        /// Only print errors
        #[arg(short, long)]
        quiet: bool,
    },
    /// Report whether the bundle and assets are wired into the project
    Check {
        #[command(flatten)]
        project: ProjectArgs,
        /// Only print errors
        #[arg(short, long)]
        quiet: bool,
    },
    /// Rewrite require() paths so images load from the assets folder
    FixAssets {
        /// Directory holding the script sources (defaults to current directory)
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Config file (default: <root>/pbxinject.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Report changes without writing files
        #[arg(long)]
        dry_run: bool,
        /// Only print errors
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inject { project, no_assets, dry_run, quiet } => {
            commands::inject::execute(&InjectOptions {
                project: project.into(),
                skip_assets: no_assets,
                dry_run,
                quiet,
            })
            .map(|_| ())
        }
        Commands::Check { project, quiet } => {
            commands::check::execute(&project.into(), quiet).map(|_| ())
        }
        Commands::FixAssets { root, config, dry_run, quiet } => {
            commands::fix_assets::execute(&FixAssetsOptions { root, config, dry_run, quiet })
                .map(|_| ())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
