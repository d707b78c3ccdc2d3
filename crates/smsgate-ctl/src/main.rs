//! smsgate-ctl — command-line interface for the smsgate daemon.

use anyhow::{Context, Result};

mod cmd;

const DEFAULT_PORT: u16 = 8080;

fn print_usage() {
    println!("Usage: smsgate-ctl [--port <port>] <command>");
    println!();
    println!("Commands:");
    println!("  status                                  Show queue depth and delivery counters");
    println!("  send <originator> <recipient> <text>    Submit a message");
    println!("  measure <text>                          Show how a message would be split");
    println!();
    println!("Options:");
    println!("  --port <port>   API port (default: {})", DEFAULT_PORT);
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Parse --port option
    let mut port = DEFAULT_PORT;
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--port" {
            i += 1;
            port = args
                .get(i)
                .context("--port requires a value")?
                .parse()
                .context("--port must be a number")?;
        } else {
            remaining.push(&args[i]);
        }
        i += 1;
    }

    match remaining.as_slice() {
        ["status"] | [] => cmd::status::cmd_status(port).await,
        ["send", originator, recipient, text @ ..] if !text.is_empty() => {
            cmd::messages::cmd_send(port, originator, recipient, &text.join(" ")).await
        }
        ["measure", text @ ..] if !text.is_empty() => cmd::measure::cmd_measure(&text.join(" ")),
        ["help"] | ["--help"] | ["-h"] => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
