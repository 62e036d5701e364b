use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod context;
mod format;

/// helm-repo - Helm chart repositories on OCI registries
///
/// Lists, inspects and deletes charts pushed to an OCI registry, using the
/// credentials `helm registry login` and `docker login` already stored.
#[derive(Parser, Debug)]
#[command(name = "helm-repo")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control colored output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    color: String,

    /// Talk to the registry over http:// instead of https://
    #[arg(long, global = true)]
    plain_http: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List artifacts
    Ls {
        /// Registry host with an optional path: [oci://]host[/path]
        reference: String,
        /// Show all nested artifacts
        #[arg(short, long)]
        all: bool,
    },
    /// List artifact tags
    Tags {
        /// Artifact: [oci://]host/path
        reference: String,
        /// Print manifest name before tags
        #[arg(long)]
        print_name: bool,
    },
    /// Delete a tag
    Rm {
        /// Artifact: [oci://]host/path
        reference: String,
        /// Tag to delete
        tag: String,
    },
    /// Display version information
    Version,
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_logging(verbosity: context::VerbosityLevel) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(verbosity.log_filter());
    // RUST_LOG, when set, wins over -v.
    builder.parse_default_env();
    builder.init();
}

fn main() {
    let cli = Cli::parse();

    let overrides = context::CliOverrides {
        color: format::ColorChoice::from(cli.color.as_str()),
        verbosity: context::VerbosityLevel::from_count(cli.verbose),
        plain_http: cli.plain_http,
        timeout: cli.timeout,
    };
    init_logging(overrides.verbosity);

    let ctx = match context::AppContext::build(overrides.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            let fallback =
                context::AppContext::with_config(libhelmrepo::Config::default(), overrides);
            commands::fail(&fallback, e);
        }
    };

    match cli.command {
        Commands::Ls { reference, all } => {
            commands::ls::handle_ls(&ctx, &reference, all);
        }
        Commands::Tags {
            reference,
            print_name,
        } => {
            commands::tags::handle_tags(&ctx, &reference, print_name);
        }
        Commands::Rm { reference, tag } => {
            commands::rm::handle_rm(&ctx, &reference, &tag);
        }
        Commands::Version => {
            commands::version::print_version();
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        }
    }
}
