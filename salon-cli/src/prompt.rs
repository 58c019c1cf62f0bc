use async_trait::async_trait;
use salon_session::Confirm;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Lines typed on stdin, shared between the command loop and prompts.
pub type InputLines = Arc<Mutex<mpsc::Receiver<String>>>;

/// Asks on stdout and takes the next input line as the answer.
pub struct StdinConfirm {
    input: InputLines,
}

impl StdinConfirm {
    pub fn new(input: InputLines) -> Self {
        Self { input }
    }
}

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, message: &str) -> bool {
        println!("{} [y/N]", message);
        let mut input = self.input.lock().await;
        match input.recv().await {
            Some(answer) => is_yes(&answer),
            // stdin closed
            None => false,
        }
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
