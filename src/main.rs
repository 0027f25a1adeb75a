use anyhow::Result;
use clap::Parser;

use git_tagscope::config;
use git_tagscope::formatter::{BranchScopedFormatter, DefaultTagFormatter, TagFormatter};
use git_tagscope::git_ops::GitRepo;
use git_tagscope::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-tagscope",
    about = "Derive tag patterns and tag validity rules from branch names"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        short,
        long,
        help = "Branch to scope by (defaults to the checked-out branch)"
    )]
    branch: Option<String>,

    #[arg(long, help = "Print the tag glob pattern for the branch and exit")]
    pattern: bool,

    #[arg(
        long,
        value_name = "TAG",
        help = "Check whether a tag is acceptable for the branch"
    )]
    check: Option<String>,

    #[arg(
        long,
        value_name = "TAG",
        help = "Parse a tag into its major.minor.patch components"
    )]
    parse: Option<String>,

    #[arg(long, help = "List repository tags that fall inside the branch scope")]
    tags: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("git-tagscope {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    // Resolve the branch that drives the scope
    let branch = if let Some(branch) = args.branch {
        branch
    } else {
        match GitRepo::discover().and_then(|repo| repo.current_branch()) {
            Ok(branch) => branch,
            Err(e) => {
                ui::display_error(&format!("Cannot determine current branch: {}", e));
                std::process::exit(1);
            }
        }
    };

    // Build the formatter, scoped to the branch
    let formatter = match DefaultTagFormatter::new(&config)
        .and_then(|base| BranchScopedFormatter::new(base, &config.version_from_branch, &branch))
    {
        Ok(formatter) => formatter,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    if let Some(tag) = args.parse {
        match formatter.parse(&tag) {
            Ok(version) => println!("{}", version),
            Err(e) => {
                ui::display_error(&e.to_string());
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    if let Some(tag) = args.check {
        check_tag(&formatter, &tag, &branch);
        return Ok(());
    }

    if args.pattern {
        println!("{}", formatter.pattern());
        return Ok(());
    }

    if args.tags {
        list_scoped_tags(&formatter)?;
        return Ok(());
    }

    ui::display_branch_scope(&branch, &formatter.constraint(), &formatter.pattern());
    Ok(())
}

/// Reports whether the tag is acceptable for the branch. Exits non-zero on
/// rejection so the check can gate CI jobs and hooks.
fn check_tag(formatter: &BranchScopedFormatter<DefaultTagFormatter>, tag: &str, branch: &str) {
    match formatter.is_valid(tag) {
        Ok(true) => {
            ui::display_success(&format!(
                "Tag '{}' is acceptable for branch '{}'",
                tag, branch
            ));
        }
        Ok(false) => {
            ui::display_error(&format!(
                "Tag '{}' is not acceptable for branch '{}' (expected {})",
                tag,
                branch,
                formatter.pattern()
            ));
            std::process::exit(1);
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn list_scoped_tags(formatter: &BranchScopedFormatter<DefaultTagFormatter>) -> Result<()> {
    let repo = match GitRepo::discover() {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };

    let mut accepted = Vec::new();
    let mut rejected = 0usize;
    for name in repo.tag_names()? {
        if formatter.is_valid(&name)? {
            let version = formatter.parse(&name)?;
            accepted.push((name, version));
        } else {
            rejected += 1;
        }
    }
    accepted.sort_by_key(|(_, version)| *version);

    ui::display_scoped_tags(&accepted, rejected);
    Ok(())
}
