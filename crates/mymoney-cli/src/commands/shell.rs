//! Interactive shell
//!
//! Each stdin line becomes one UI event for the controller's event loop, so
//! typing `desc uber to office` behaves like typing into the description
//! field: the suggestion shows up once the debounce window passes.

use anyhow::Result;
use mymoney_core::{AppEvent, ClientConfig, FinanceApi, FormField, KeyPress, View};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use super::core::open_controller;

/// A parsed shell line
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Event(AppEvent),
    Help,
    Quit,
}

const HELP: &str = "\
Form:      desc <text> | blur | amount <n> | type <income|expense> | category <name> | date <YYYY-MM-DD>
Actions:   submit | edit <id> | cancel | delete <id> | refresh
Views:     view <homepage|personal|business>
Keys:      key esc | key ctrl+enter | key alt+<1|2|3>
Other:     dismiss <toast id> | help | quit";

fn print_help() {
    println!("{}", HELP);
}

fn parse_id(arg: &str) -> std::result::Result<i64, String> {
    arg.trim()
        .parse()
        .map_err(|_| format!("Invalid transaction id: {}", arg))
}

/// Parse a key combo like `alt+2`, `ctrl+enter` or `esc`
///
/// Shell input always counts as focus inside the form.
pub fn parse_key(combo: &str) -> std::result::Result<KeyPress, String> {
    let mut press = KeyPress::plain("");
    press.focus_in_form = true;

    let parts: Vec<&str> = combo.split('+').map(str::trim).collect();
    let Some((key, modifiers)) = parts.split_last() else {
        return Err("Missing key".to_string());
    };

    for m in modifiers {
        match m.to_lowercase().as_str() {
            "ctrl" | "control" => press.modifiers.ctrl = true,
            "meta" | "cmd" => press.modifiers.meta = true,
            "alt" | "option" => press.modifiers.alt = true,
            other => return Err(format!("Unknown modifier: {}", other)),
        }
    }

    press.key = match key.to_lowercase().as_str() {
        "esc" | "escape" => "Escape".to_string(),
        "enter" | "return" => "Enter".to_string(),
        "" => return Err("Missing key".to_string()),
        _ => key.to_string(),
    };
    Ok(press)
}

/// Parse one shell line; blank lines yield `None`
pub fn parse_line(line: &str) -> std::result::Result<Option<ShellCommand>, String> {
    let line = line.trim_start();
    if line.trim().is_empty() {
        return Ok(None);
    }

    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let word = word.trim().to_lowercase();
    let field = |f: FormField| ShellCommand::Event(AppEvent::FieldInput(f, rest.to_string()));

    let command = match word.as_str() {
        // Description keeps its raw spacing
        "desc" | "description" => field(FormField::Description),
        "blur" => ShellCommand::Event(AppEvent::DescriptionBlur),
        "amount" => field(FormField::Amount),
        "type" => field(FormField::Type),
        "category" | "cat" => field(FormField::Category),
        "date" => field(FormField::Date),
        "submit" => ShellCommand::Event(AppEvent::Submit),
        "edit" => ShellCommand::Event(AppEvent::BeginEdit(parse_id(rest)?)),
        "cancel" => ShellCommand::Event(AppEvent::CancelEdit),
        "delete" => ShellCommand::Event(AppEvent::Delete(parse_id(rest)?)),
        "refresh" | "sync" => ShellCommand::Event(AppEvent::Refresh),
        "view" => ShellCommand::Event(AppEvent::ShowView(rest.trim().parse::<View>()?)),
        "key" => ShellCommand::Event(AppEvent::Key(parse_key(rest.trim())?)),
        "dismiss" => {
            let id = rest
                .trim()
                .parse()
                .map_err(|_| format!("Invalid toast id: {}", rest))?;
            ShellCommand::Event(AppEvent::DismissToast(id))
        }
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("Unknown command: {} (try 'help')", other)),
    };
    Ok(Some(command))
}

pub async fn cmd_shell<A>(api: A, config: ClientConfig) -> Result<()>
where
    A: FinanceApi + Clone + 'static,
{
    let mut controller = open_controller(api, config)?;

    println!("💸 My Money shell. Type 'help' for commands, 'quit' to exit.");
    controller.handle(AppEvent::ShowView(View::Personal));

    let (tx, rx) = mpsc::channel(32);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_line(&line) {
                Ok(None) => {}
                Ok(Some(ShellCommand::Event(event))) => {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Ok(Some(ShellCommand::Help)) => print_help(),
                Ok(Some(ShellCommand::Quit)) => break,
                Err(message) => eprintln!("❓ {}", message),
            }
        }
        debug!("Shell input closed");
    });

    controller.run(rx).await;
    let _ = reader.await;

    println!("👋 Bye");
    Ok(())
}
