//! Application entry point — PodAI terminal driver.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the Gemini gateway and load the history store.
//! 5. Run the command loop until `quit` or EOF.
//!
//! The driver holds no state of its own: every command is an event on the
//! [`Workflow`], and the prompt renders the current stage. Actions invalid
//! for the stage are refused by the workflow and reported inline.

use std::io::{self, BufRead, Write as _};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use podai::config::AppConfig;
use podai::export;
use podai::gateway::{ChatRole, GeminiClient};
use podai::history::HistoryStore;
use podai::persona;
use podai::upload;
use podai::workflow::{AppStage, Workflow};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("PodAI starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (transcription and transformation each take a worker)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    // 4. Gateway + history + workflow
    let gateway = Arc::new(GeminiClient::from_config(&config.gateway));
    let history = HistoryStore::load_or_default();
    let mut workflow = Workflow::new(gateway, history, &config.upload);

    println!("PodAI — give your voice a new personality");
    println!("Type 'help' for the command list.");

    // 5. Command loop
    let stdin = io::stdin();
    loop {
        print!("podai [{}]> ", workflow.stage().label());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "help" => print_help(),
            "quit" | "exit" => break,

            "upload" => {
                if rest.is_empty() {
                    println!("usage: upload <audio file>");
                    continue;
                }
                match rt.block_on(workflow.upload_file(Path::new(rest))) {
                    Ok(()) => render_after_transition(&workflow),
                    Err(e) => println!("{e}"),
                }
            }

            "folder" => {
                if rest.is_empty() {
                    println!("usage: folder <directory>");
                    continue;
                }
                match upload::scan_folder(Path::new(rest), config.upload.max_file_size_bytes()) {
                    Ok(files) => {
                        println!("{} audio file(s) found:", files.len());
                        for file in files {
                            println!("  {}", file.display());
                        }
                        println!("Use 'upload <path>' to transcribe one.");
                    }
                    Err(e) => println!("{e}"),
                }
            }

            "personas" => print_personas(&workflow),

            "select" => {
                if rest.is_empty() {
                    println!("usage: select <persona id>");
                    continue;
                }
                match workflow.select_persona(rest) {
                    Ok(()) => {
                        if let Some(p) = workflow.selected_persona() {
                            println!("Selected {} {} — {}", p.icon.glyph(), p.name, p.role);
                            println!("Type 'generate' to transform the transcript.");
                        }
                    }
                    Err(e) => println!("{e}"),
                }
            }

            "generate" => match rt.block_on(workflow.generate()) {
                Ok(()) => render_after_transition(&workflow),
                Err(e) => println!("{e}"),
            },

            "transcript" => {
                if workflow.transcript().is_empty() {
                    println!("No transcript yet.");
                } else {
                    println!("{}", workflow.transcript());
                }
            }

            "result" => print_result(&workflow),

            "chat" => {
                if rest.is_empty() {
                    print_chat_log(&workflow);
                    continue;
                }
                match rt.block_on(workflow.send_chat(rest)) {
                    Ok(()) => {
                        if let Some(reply) = workflow.chat_messages().last() {
                            let persona_name = workflow
                                .selected_persona()
                                .map(|p| p.name)
                                .unwrap_or("Model");
                            println!("{persona_name}: {}", reply.text);
                        }
                    }
                    Err(e) => println!("{e}"),
                }
            }

            "history" => print_history(&workflow),

            "load" => {
                if rest.is_empty() {
                    println!("usage: load <history id>");
                    continue;
                }
                match workflow.load_history(rest) {
                    Ok(()) => print_result(&workflow),
                    Err(e) => println!("{e}"),
                }
            }

            "random" => match workflow.load_random_history() {
                Some(id) => {
                    println!("Restored history item {id}.");
                    print_result(&workflow);
                }
                None => println!("No history yet."),
            },

            "delete" => {
                if rest.is_empty() {
                    println!("usage: delete <history id>");
                    continue;
                }
                if workflow.delete_history(rest) {
                    println!("Deleted.");
                } else {
                    println!("No history item with id {rest}.");
                }
            }

            "export" => export_archive(&workflow, rest),

            "save" => save_script(&workflow, rest),

            "reset" => {
                workflow.reset();
                println!("Back to the start. Upload an audio file to begin.");
            }

            other => println!("Unknown command '{other}'. Type 'help' for the command list."),
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn print_help() {
    println!(
        "\
Commands:
  upload <file>     Upload an audio file and transcribe it
  folder <dir>      List valid audio files in a directory
  transcript        Show the raw transcript
  personas          List available personas
  select <id>       Pick a persona for the transformation
  generate          Transform the transcript with the selected persona
  result            Show the generated script
  chat [message]    Chat with the persona about the content (no message: show log)
  history           List saved transformations
  load <id>         Restore a saved transformation
  random            Restore a random saved transformation
  delete <id>       Delete a saved transformation
  export [dir]      Write the history archive as JSON
  save [dir]        Write the generated script as a text file
  reset             Discard the session and start over
  quit              Exit"
    );
}

/// Render the view for the stage a remote call resolved into.
fn render_after_transition(workflow: &Workflow) {
    match workflow.stage() {
        AppStage::ReviewTranscript => {
            println!("--- Raw Transcript ---");
            println!("{}", workflow.transcript());
            println!("----------------------");
            println!("Review the transcript, then 'select <persona id>' ('personas' to list).");
        }
        AppStage::Result => print_result(workflow),
        AppStage::Error => {
            println!("Something went wrong:");
            if let Some(message) = workflow.error_message() {
                println!("  {message}");
            }
            println!("Type 'reset' to try again.");
        }
        // Loading stages never survive past the awaited call.
        stage => println!("Stage: {stage}"),
    }
}

fn print_personas(workflow: &Workflow) {
    let selected = workflow.selected_persona().map(|p| p.id);
    for p in persona::catalog() {
        let marker = if selected == Some(p.id) { "*" } else { " " };
        println!("{marker} {} {:<12} {} ({})", p.icon.glyph(), p.id, p.name, p.role);
        println!("      {}", p.description);
    }
}

fn print_result(workflow: &Workflow) {
    let Some(result) = workflow.result() else {
        println!("No result yet.");
        return;
    };
    let persona_name = persona::find(&result.persona_id)
        .map(|p| p.name)
        .unwrap_or("Unknown");

    println!("=== {persona_name} Edition ===");
    println!("{}", result.transformed_content);
    println!("===");
    match workflow.audio_file() {
        Some(audio) => println!("Based on {} — ready for recording.", audio.file_name),
        None => println!("Restored from history."),
    }
    println!("'chat <message>' to talk to the persona, 'save' to export the script.");
}

fn print_chat_log(workflow: &Workflow) {
    if workflow.chat_messages().is_empty() {
        println!("No chat yet. 'chat <message>' to start one.");
        return;
    }
    let persona_name = workflow.selected_persona().map(|p| p.name).unwrap_or("Model");
    for message in workflow.chat_messages() {
        match message.role {
            ChatRole::User => println!("You: {}", message.text),
            ChatRole::Model => println!("{persona_name}: {}", message.text),
        }
    }
}

fn print_history(workflow: &Workflow) {
    let items = workflow.history_items();
    if items.is_empty() {
        println!("No history yet. Upload an audio file to get started!");
        return;
    }
    for item in items {
        let date = chrono::DateTime::from_timestamp_millis(item.timestamp)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let persona_name = persona::find(&item.persona_id)
            .map(|p| p.name)
            .unwrap_or("Unknown");
        println!("  {}  {date}  {:<24} {persona_name}", item.id, item.file_name);
    }
}

// ---------------------------------------------------------------------------
// File output
// ---------------------------------------------------------------------------

fn output_path(dir: &str, file_name: &str) -> PathBuf {
    if dir.is_empty() {
        PathBuf::from(file_name)
    } else {
        Path::new(dir).join(file_name)
    }
}

fn export_archive(workflow: &Workflow, dir: &str) {
    let items = workflow.history_items();
    if items.is_empty() {
        println!("No history to export.");
        return;
    }
    let json = match export::render_archive(items) {
        Ok(json) => json,
        Err(e) => {
            println!("Failed to serialise history: {e}");
            return;
        }
    };
    let path = output_path(dir, &export::archive_file_name(chrono::Local::now().date_naive()));
    match std::fs::write(&path, json) {
        Ok(()) => println!("Wrote {}", path.display()),
        Err(e) => println!("Failed to write {}: {e}", path.display()),
    }
}

fn save_script(workflow: &Workflow, dir: &str) {
    let Some(result) = workflow.result() else {
        println!("No result to save.");
        return;
    };
    let Some(persona) = persona::find(&result.persona_id) else {
        println!("Unknown persona in result.");
        return;
    };

    let stem = export::source_stem(workflow.audio_file().map(|a| a.file_name.as_str()));
    let content = export::render_script(&result.transformed_content, &stem, persona);
    let path = output_path(dir, &export::script_file_name(persona, &stem));

    match std::fs::write(&path, content) {
        Ok(()) => println!("Wrote {}", path.display()),
        Err(e) => println!("Failed to write {}: {e}", path.display()),
    }
}
