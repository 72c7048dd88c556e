use clap::Parser;
use fabquote::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    // This is standard practice for CLI tools that output to stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Catalog(cmd) => fabquote::cli::commands::catalog::run(cmd, &global),
        Commands::Quote(cmd) => fabquote::cli::commands::quote::run(cmd, &global),
        Commands::Cart(cmd) => fabquote::cli::commands::cart::run(cmd, &global),
        Commands::Validate(args) => fabquote::cli::commands::validate::run(args, &global),
        Commands::Completions(args) => fabquote::cli::commands::completions::run(args),
    }
}
