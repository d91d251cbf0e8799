use std::io::BufRead;
use tokio::sync::mpsc;

/// Lines typed by the operator.
///
/// Whoever holds the `Operator` is the only reader of operator input, which is
/// how server mode decides which connection a typed reply belongs to.
#[derive(Debug)]
pub struct Operator {
    lines: mpsc::Receiver<String>,
}

impl Operator {
    /// Reads stdin on a dedicated thread. The channel closes at end of input.
    pub fn stdin() -> Self {
        let (tx, operator) = Self::channel(1);
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        tracing::warn!(%err, "failed to read operator input");
                        return;
                    }
                };
                if tx.blocking_send(line).is_err() {
                    return;
                }
            }
            tracing::info!("operator input closed");
        });
        operator
    }

    pub fn channel(capacity: usize) -> (mpsc::Sender<String>, Self) {
        let (tx, lines) = mpsc::channel(capacity);
        (tx, Self { lines })
    }

    /// `None` once the input is exhausted.
    pub async fn read_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lines_then_end() {
        let (tx, mut operator) = Operator::channel(4);
        tx.send("send hi".to_owned()).await.unwrap();
        tx.send("quit NOW".to_owned()).await.unwrap();
        drop(tx);
        assert_eq!(operator.read_line().await.as_deref(), Some("send hi"));
        assert_eq!(operator.read_line().await.as_deref(), Some("quit NOW"));
        assert_eq!(operator.read_line().await, None);
    }
}
