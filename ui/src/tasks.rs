//! Background requests whose results come back on the UI thread.

use std::future::Future;

use flume::{Receiver, Sender};

/// What a finished task left behind.
#[derive(Debug)]
enum Delivery<T> {
    Done(T),
    /// The task panicked or was cancelled.
    Lost,
}

/// Mailbox for the results of tokio tasks spawned from a widget.
///
/// Results are queued on a `flume` channel and drained once per frame.
/// Every spawned task delivers exactly once, so [`Inbox::is_busy`] settles
/// even when a task dies.
#[derive(Debug)]
pub struct Inbox<T> {
    send: Sender<Delivery<T>>,
    recv: Receiver<Delivery<T>>,
    in_flight: usize,
}

impl<T: Send + 'static> Inbox<T> {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            send,
            recv,
            in_flight: 0,
        }
    }

    /// Runs `future` on the current tokio runtime and wakes `ctx` once its
    /// output is queued.
    pub fn spawn<F>(&mut self, ctx: &egui::Context, future: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let send = self.send.clone();
        let ctx = ctx.clone();
        self.in_flight += 1;
        let task = tokio::spawn(future);
        tokio::spawn(async move {
            let delivery = match task.await {
                Ok(output) => Delivery::Done(output),
                Err(err) => {
                    log::error!("Background task failed: {err}");
                    Delivery::Lost
                }
            };
            if send.send(delivery).is_err() {
                log::debug!("Task finished after its widget was dropped");
            }
            ctx.request_repaint();
        });
    }

    /// Results that arrived since the last call.
    pub fn drain(&mut self) -> Vec<T> {
        let mut results = Vec::new();
        for delivery in self.recv.try_iter() {
            self.in_flight = self.in_flight.saturating_sub(1);
            if let Delivery::Done(output) = delivery {
                results.push(output);
            }
        }
        results
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}

impl<T: Send + 'static> Default for Inbox<T> {
    fn default() -> Self {
        Self::new()
    }
}
