use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::error;

/// Sender half of the process-wide stop signal.
pub fn channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Resolves once shutdown has been signalled or the sender is gone.
pub async fn requested(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

/// Why the supervisor stopped waiting.
#[derive(Debug, PartialEq, Eq)]
pub enum Exit {
    Interrupted,
    /// A background task finished on its own
    TaskEnded(&'static str),
}

/// Wait for the interrupt `signal` or for either task to end. A signal
/// listener that fails is logged and dropped; the tasks are still watched.
pub async fn supervise<S, A, B>(
    signal: S,
    updater: &mut JoinHandle<A>,
    display: &mut JoinHandle<B>,
) -> Exit
where
    S: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(signal);
    let mut listening = true;
    loop {
        tokio::select! {
            res = &mut signal, if listening => match res {
                Ok(()) => return Exit::Interrupted,
                Err(e) => {
                    error!("Failed to listen for Ctrl-C: {}", e);
                    listening = false;
                }
            },
            res = &mut *updater => {
                error!("Background updater exited unexpectedly: {:?}", res.map(|_| ()));
                return Exit::TaskEnded("updater");
            }
            res = &mut *display => {
                error!("Display loop exited unexpectedly: {:?}", res.map(|_| ()));
                return Exit::TaskEnded("display");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_requested_after_signal() {
        let (tx, mut rx) = channel();
        let waiter = tokio::spawn(async move { requested(&mut rx).await });
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_requested_when_sender_dropped() {
        let (tx, mut rx) = channel();
        drop(tx);
        tokio::time::timeout(Duration::from_secs(1), requested(&mut rx))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_pending_without_signal() {
        let (_tx, mut rx) = channel();
        let res = tokio::time::timeout(Duration::from_millis(50), requested(&mut rx)).await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn test_supervise_returns_on_signal() {
        let mut updater = tokio::spawn(std::future::pending::<()>());
        let mut display = tokio::spawn(std::future::pending::<()>());
        let exit = supervise(async { std::io::Result::Ok(()) }, &mut updater, &mut display).await;
        assert_eq!(exit, Exit::Interrupted);
        updater.abort();
        display.abort();
    }

    #[tokio::test]
    async fn test_supervise_keeps_watching_tasks_after_signal_error() {
        let mut updater = tokio::spawn(tokio::time::sleep(Duration::from_millis(50)));
        let mut display = tokio::spawn(std::future::pending::<()>());
        let signal = async { Err::<(), _>(std::io::Error::other("no handler")) };

        let exit = tokio::time::timeout(
            Duration::from_secs(1),
            supervise(signal, &mut updater, &mut display),
        )
        .await
        .unwrap();
        assert_eq!(exit, Exit::TaskEnded("updater"));
        assert!(!display.is_finished());
        display.abort();
    }
}
