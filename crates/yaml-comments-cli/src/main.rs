use std::path::PathBuf;
use std::process::ExitCode;

use bpaf::Bpaf;
use tracing_subscriber::prelude::*;
use yaml_comments::{CommentOptions, DEFAULT_INDENT_WIDTH};

mod commands;

#[derive(Debug, Clone, Bpaf)]
pub struct IndentArgs {
    /// Columns per indentation level
    #[bpaf(
        long("indent"),
        argument("WIDTH"),
        fallback(DEFAULT_INDENT_WIDTH),
        display_fallback
    )]
    pub indent: usize,
}

impl IndentArgs {
    pub fn options(&self) -> CommentOptions {
        CommentOptions {
            indent_width: self.indent,
        }
    }
}

#[derive(Debug, Clone, Bpaf)]
pub struct ListArgs {
    /// Print the comments as a JSON array
    #[bpaf(long("json"), switch)]
    pub json: bool,

    #[bpaf(external(indent_args))]
    pub indent: IndentArgs,

    /// YAML file to read
    #[bpaf(positional("FILE"))]
    pub file: PathBuf,
}

#[derive(Debug, Clone, Bpaf)]
pub struct RestoreArgs {
    /// File holding the comments to restore
    #[bpaf(long("from"), argument("SOURCE"))]
    pub from: PathBuf,

    /// Rewrite TARGET in place instead of printing to stdout
    #[bpaf(short('w'), long("write"), switch)]
    pub write: bool,

    /// Report restored and dropped comments on stderr
    #[bpaf(short('v'), long("verbose"), switch)]
    pub verbose: bool,

    #[bpaf(external(indent_args))]
    pub indent: IndentArgs,

    /// File to restore the comments into
    #[bpaf(positional("TARGET"))]
    pub target: PathBuf,
}

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version, fallback_to_usage)]
/// Preserve YAML comments across a parse/serialize round-trip
struct Cli {
    #[bpaf(external(commands))]
    command: Commands,
}

#[derive(Debug, Clone, Bpaf)]
enum Commands {
    #[bpaf(command("list"))]
    /// List the comments of a file with what each one is anchored to
    List(#[bpaf(external(list_args))] ListArgs),

    #[bpaf(command("restore"))]
    /// Restore the comments of one file into another version of it
    Restore(#[bpaf(external(restore_args))] RestoreArgs),

    #[bpaf(command("version"))]
    /// Print version information
    Version,
}

fn init_tracing() {
    if let Ok(filter) = tracing_subscriber::EnvFilter::try_from_env("YAML_COMMENTS_LOG") {
        tracing_subscriber::registry()
            .with(
                tracing_tree::HierarchicalLayer::new(2)
                    .with_targets(true)
                    .with_bracketed_fields(true)
                    .with_indent_lines(true)
                    .with_timer(tracing_tree::time::Uptime::default())
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let cli = cli().run();

    let result = match cli.command {
        Commands::List(args) => commands::list::run(&args),
        Commands::Restore(args) => commands::restore::run(&args),
        Commands::Version => {
            println!("yaml-comments {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:?}");
            ExitCode::from(1)
        }
    }
}
