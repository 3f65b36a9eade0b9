use clap::{Parser as ClapParser, Subcommand};
use resfilter_lang::{
    EncoderRegistry,
    cli::{self, CheckOptions, CheckResult, CliError},
};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "resfilter")]
#[command(about = "resfilter - A filter language for fuzzing results")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a filter and apply it to JSON results
    Check {
        /// The filter expression to apply
        filter: String,

        /// JSON results (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// JSON baseline result for BBB comparisons
        #[arg(short, long)]
        baseline: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't execute
        #[arg(long)]
        syntax_only: bool,
    },

    /// List the placeholders a filter refers to
    Placeholders {
        /// The filter expression to inspect
        filter: String,
    },

    /// List the registered encoders
    Encoders,

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'resfilter docs' to list categories)
        category: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            filter,
            input,
            baseline,
            pretty,
            syntax_only,
        } => run_check(CheckOptions {
            filter,
            input,
            baseline,
            pretty,
            syntax_only,
        }),
        Commands::Placeholders { filter } => {
            for name in cli::list_placeholders(&filter) {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Encoders => {
            let registry = EncoderRegistry::default();
            for name in registry.names() {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(mut options: CheckOptions) -> Result<(), CliError> {
    if options.input.is_none() && !options.syntax_only && !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        options.input = Some(buffer);
    }

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => {
            let json = if options.pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            println!("{}", json);
        }
    }
    Ok(())
}
