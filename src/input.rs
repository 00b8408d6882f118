//! Interactive Input Reader
//!
//! Console reads are blocking, so they run on a dedicated thread and
//! are handed to the session loop over a channel. This keeps the loop
//! free to surface notifications while waiting for the next line, and
//! keeps all writes on the single session task.

use std::io::{self, BufRead, Write};
use std::thread;
use tokio::sync::mpsc;

/// Spawn the stdin reader thread and return the line channel.
///
/// The prompt is printed before each read. The channel closes on EOF or
/// a read error, which the session loop treats as end of session.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    thread::spawn(move || {
        let mut stdin = io::stdin().lock();
        loop {
            print!("> ");
            let _ = io::stdout().flush();

            let mut line = String::new();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let line = line.trim_end_matches(['\r', '\n']).to_string();
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            }
        }
    });

    rx
}
