use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, command};
use proc_client::config::{self, Config};
use proc_client::{
    Accept, Client, DEFAULT_API_URL, Operation, OutputMode, auth, parse_args, render, response,
    term, wire,
};

#[derive(Parser, Debug)]
#[command(name = "proc", version, about = "Client for the proc remote execution service", long_about = None)]
struct Args {
    /// The authorization to use when interacting with the service
    #[clap(long, global = true, env = "PROC_AUTH")]
    auth: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile the given source file, returning its AST
    Compile {
        file: PathBuf,
        /// Print the raw json response instead of text
        #[clap(long)]
        json: bool,
    },
    /// Run the given source file, returning the result
    #[command(alias = "exec")]
    Run {
        file: PathBuf,
        /// Print the raw json response instead of text
        #[clap(long)]
        json: bool,
        /// Pass a named argument to the program (repeatable)
        #[clap(long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,
    },
    /// Deploy the objects defined in the given source file
    Deploy {
        file: PathBuf,
        /// Deploy to the release stage
        #[clap(long)]
        release: bool,
        /// Print the raw json response instead of text
        #[clap(long)]
        json: bool,
        /// Pass a named argument to the program (repeatable)
        #[clap(long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,
    },
    /// Store the current authorization for later invocations
    Login,
    /// Remove the stored authorization
    Logout,
    /// Show the current version of this command-line interface
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{:#}", error);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let authorization = args.auth;
    match args.command {
        Commands::Compile { file, json } => {
            submit(authorization, file, Operation::Compile, vec![], json).await
        }
        Commands::Run { file, json, args } => {
            submit(authorization, file, Operation::Run, args, json).await
        }
        Commands::Deploy {
            file,
            release,
            json,
            args,
        } => submit(authorization, file, Operation::Deploy { release }, args, json).await,
        Commands::Login => {
            auth::login(authorization.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Logout => {
            auth::logout()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Version => {
            println!("Proc CLI v{}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn submit(
    authorization: Option<String>,
    file: PathBuf,
    operation: Operation,
    args: Vec<String>,
    json: bool,
) -> Result<ExitCode> {
    let source =
        fs::read_to_string(&file).with_context(|| format!("could not read {}", file.display()))?;
    let args = parse_args(args)?;
    let program = term::build_program(&source, language_tag(&file), operation, &args);
    let payload = wire::encode_program(&program)?;

    let config: Config = config::load_base_config().extract()?;
    let client = Client::new(
        config.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        auth::resolve(authorization.as_deref()),
    );
    let accept = if json { Accept::Json } else { Accept::Text };
    let reply = client.call(operation.path(), payload, accept).await?;

    let deploy = matches!(operation, Operation::Deploy { .. });
    let succeeded = reply.status.as_u16() == 200 || (deploy && reply.status.as_u16() == 424);
    if !succeeded {
        // Historical behavior: error payloads go to stdout, in the
        // negotiated format, and the invocation fails as a whole.
        match accept {
            Accept::Json => println!("{}", reply.body_text()),
            Accept::Text => println!(
                "{} {}: {}",
                reply.status.as_u16(),
                reply.status.canonical_reason().unwrap_or(""),
                reply.body_text()
            ),
        }
        return Ok(ExitCode::FAILURE);
    }

    if deploy && !json {
        let results = response::decode_deploy(&reply.body)?;
        print!("{}", render::render_deploy_text(&results));
    } else {
        let value = response::decode_value(&reply.body)?;
        let mode = if json { OutputMode::Json } else { OutputMode::Text };
        println!("{}", render::render_value(&value, mode));
    }
    Ok(ExitCode::SUCCESS)
}

/// The language tag is the file extension, passed through verbatim; the
/// service rejects tags it does not recognize.
fn language_tag(file: &Path) -> &str {
    file.extension().and_then(OsStr::to_str).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_tag_is_the_extension() {
        assert_eq!(language_tag(Path::new("procs/foo.rb")), "rb");
        assert_eq!(language_tag(Path::new("a.b.ts")), "ts");
        assert_eq!(language_tag(Path::new("no-extension")), "");
    }
}
