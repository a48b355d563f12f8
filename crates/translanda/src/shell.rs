// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `translanda shell` command implementation.
//!
//! A readline REPL that talks to the same answering core as the Telegram
//! bot, as the fixed user `shell`. Its transcript lives in the same memory
//! file as everyone else's.

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use translanda_config::model::TranslandaConfig;
use translanda_core::error::TranslandaError;
use translanda_core::types::UserId;
use translanda_memory::Reply;

use crate::serve::build_responder;

/// Conversation key used for every shell message.
const SHELL_USER: &str = "shell";

/// Runs the `translanda shell` interactive REPL.
pub async fn run_shell(config: TranslandaConfig) -> Result<(), TranslandaError> {
    let responder = build_responder(&config).await?;
    let user = UserId::from(SHELL_USER);

    let mut rl = DefaultEditor::new().map_err(|e| {
        TranslandaError::Internal(format!("failed to initialize readline: {e}"))
    })?;

    println!("{}", "translanda shell".bold().green());
    println!("Type {} to exit.\n", "/quit".yellow());

    let prompt = format!("{}> ", "tú".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                match responder.reply(&user, trimmed).await {
                    Ok(reply) => {
                        let (tag, text) = tagged(&reply);
                        let tag = if reply.is_curated() { tag.cyan() } else { tag.magenta() };
                        println!("{tag} {text}\n");
                    }
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            // Ctrl+C / Ctrl+D
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "adiós".dimmed());
    Ok(())
}

/// Splits a reply into its source tag and text.
fn tagged(reply: &Reply) -> (&'static str, &str) {
    match reply {
        Reply::Curated(text) => ("[curated]", text.as_str()),
        Reply::Generated(text) => ("[model]", text.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_name_the_source() {
        assert_eq!(tagged(&Reply::Curated("a".into())), ("[curated]", "a"));
        assert_eq!(tagged(&Reply::Generated("b".into())), ("[model]", "b"));
    }
}
