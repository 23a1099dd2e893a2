use std::io::BufRead;
use std::sync::mpsc;

use log::warn;

/// Spawns a worker thread that listens on `stdin` and emits lines
///
/// The channel is closed when `stdin` reaches end-of-file.
pub fn worker() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("failed to read stdin: {e}");
                    return;
                }
            };
            if tx.send(line).is_err() {
                return;
            }
        }
    });
    rx
}
