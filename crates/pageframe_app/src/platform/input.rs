use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

use engine_logging::engine_debug;
use pageframe_core::Msg;

use super::app::Inbound;

const FOCUS_COMMAND: &str = ":focus";
const QUIT_COMMAND: &str = ":quit";

/// Maps one line of interactive input to what the dispatcher should do.
/// Anything that is not a command is submitted as typed, blank lines included.
pub fn parse_line(line: &str) -> Inbound {
    match line.trim() {
        FOCUS_COMMAND => Inbound::Msg(Msg::InputFocused),
        QUIT_COMMAND => Inbound::Quit,
        _ => Inbound::Submit(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

pub fn spawn_stdin_reader(tx: mpsc::Sender<Inbound>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(parse_line(&line)).is_err() {
                return;
            }
        }
        engine_debug!("Standard input closed");
        let _ = tx.send(Inbound::InputClosed);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_recognised() {
        assert_eq!(parse_line(":focus"), Inbound::Msg(Msg::InputFocused));
        assert_eq!(parse_line("  :quit "), Inbound::Quit);
    }

    #[test]
    fn other_lines_are_submissions() {
        assert_eq!(
            parse_line("https://example.com\r"),
            Inbound::Submit("https://example.com".to_string())
        );
        assert_eq!(parse_line("   "), Inbound::Submit("   ".to_string()));
    }
}
