use std::{
    fmt::Display,
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendError, Sender};

/// What an actor wants to do after handling a message.
pub enum Act<T: Actor> {
    Continue,
    /// Wait for the next message, but deliver `timeout_msg` to ourselves if
    /// nothing arrives within `timeout`.
    WaitOr {
        timeout: Duration,
        timeout_msg: T::Message,
    },
    Shutdown,
}

pub trait Actor: Sized {
    type Message: Send + 'static;
    type Error: Display;

    fn handle(&mut self, msg: Self::Message) -> Result<Act<Self>, Self::Error>;

    fn process(mut self, recv: Receiver<Self::Message>) {
        let mut act = Act::Continue;
        loop {
            let msg = match act {
                Act::Continue => match recv.recv() {
                    Ok(msg) => msg,
                    Err(_) => break,
                },
                Act::WaitOr {
                    timeout,
                    timeout_msg,
                } => match recv.recv_timeout(timeout) {
                    Ok(msg) => msg,
                    Err(RecvTimeoutError::Timeout) => timeout_msg,
                    Err(RecvTimeoutError::Disconnected) => break,
                },
                Act::Shutdown => break,
            };
            act = match self.handle(msg) {
                Ok(act) => act,
                Err(err) => {
                    log::error!("actor error: {}", err);
                    break;
                }
            };
        }
    }

    /// Run the actor on its own named thread, with a mailbox of `queue`
    /// messages.
    fn spawn(self, name: &str, queue: usize) -> ActorHandle<Self::Message>
    where
        Self: Send + 'static,
    {
        let (sender, recv) = bounded(queue);
        let thread = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || self.process(recv))
            .ok();
        if thread.is_none() {
            log::error!("failed to spawn actor thread {}", name);
        }
        ActorHandle { thread, sender }
    }
}

pub struct ActorHandle<M> {
    thread: Option<JoinHandle<()>>,
    sender: Sender<M>,
}

impl<M> ActorHandle<M> {
    pub fn send(&self, msg: M) -> Result<(), SendError<M>> {
        self.sender.send(msg)
    }

    pub fn is_running(&self) -> bool {
        matches!(&self.thread, Some(thread) if !thread.is_finished())
    }
}
