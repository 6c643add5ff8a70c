use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser};

use stampver::adapters::{AndroidAdapter, FormatAdapter, PlistAdapter, SourceAdapter};
use stampver::config::Config;
use stampver::version::base_version;
use stampver::{ui, validate};

#[derive(clap::Parser)]
#[command(
    name = "stampver",
    version,
    about = "Stamp a consistent version across source, Android manifest, and iOS plist files"
)]
struct Args {
    #[arg(
        short = 'v',
        long,
        default_value_t = 1,
        help = "A numeric major version number greater than zero"
    )]
    major: i32,

    #[arg(
        short,
        long,
        default_value_t = 0,
        help = "A numeric minor version number greater than zero"
    )]
    minor: i32,

    #[arg(short, long, help = "A numeric build number greater than zero")]
    build: Option<i32>,

    #[arg(short, long, help = "A numeric revision number greater than zero")]
    revision: Option<i32>,

    #[arg(
        short,
        long,
        help = "The path to a source file to update with version information"
    )]
    path: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "The path to an Android manifest file to update with version information"
    )]
    android_manifest: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "The path to an iOS plist file to update with version information"
    )]
    touch_plist: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Increment the current build number by 1 (overrides -b)"
    )]
    inc_build: bool,

    #[arg(
        short = 's',
        long,
        help = "Stamp the revision with the number of seconds today (overrides -r)"
    )]
    revision_stamp: bool,

    #[arg(
        short,
        long,
        help = "Wait for a key press after execution (useful in post-build steps)"
    )]
    do_not_exit: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve(args);

    let errors = validate::validate(&config);
    if !errors.is_empty() {
        ui::display_validation_errors(&errors);
        print_usage();
        ui::pause_for_keypress();
        std::process::exit(1);
    }

    if let Err(e) = run(&config) {
        ui::display_error(&format!("An unexpected error was encountered: {}", e));
        print_usage();
        ui::pause_for_keypress();
        std::process::exit(1);
    }

    ui::display_success("Version information successfully updated.");

    // Inverted naming: setting the flag forces the pause rather than
    // suppressing it.
    if config.do_not_exit {
        ui::pause_for_keypress();
    }

    Ok(())
}

fn resolve(args: Args) -> Config {
    Config {
        major: args.major,
        minor: args.minor,
        build: args.build,
        revision: args.revision,
        version_path: args.path,
        android_manifest_path: args.android_manifest,
        touch_plist_path: args.touch_plist,
        inc_build: args.inc_build,
        revision_stamp: args.revision_stamp,
        do_not_exit: args.do_not_exit,
    }
}

fn run(config: &Config) -> stampver::Result<()> {
    let base = base_version(config)?;

    let mut targets: Vec<(&Path, Box<dyn FormatAdapter>)> = Vec::new();
    if let Some(path) = &config.version_path {
        targets.push((path, Box::new(SourceAdapter::new()?)));
    }
    if let Some(path) = &config.android_manifest_path {
        targets.push((path, Box::new(AndroidAdapter)));
    }
    if let Some(path) = &config.touch_plist_path {
        targets.push((path, Box::new(PlistAdapter)));
    }

    // Writes are sequential and unconditional: a failure partway leaves the
    // earlier targets already rewritten on disk.
    for (path, adapter) in targets {
        let version = if config.inc_build {
            // Each target contributes its own current build number
            base.with_build(adapter.read_current_build(path)? + 1)
        } else {
            base.clone()
        };

        ui::display_status(&format!("Updating {} to {}", path.display(), version));
        adapter.write(path, &version)?;
    }

    Ok(())
}

fn print_usage() {
    let _ = Args::command().print_help();
}
