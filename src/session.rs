//! Agent confined to its own worker thread.
//!
//! The agent is moved onto a dedicated thread and driven through a request
//! channel. Every request carries its own reply channel, so each call blocks
//! until the worker answers that call. The caller sees the same sequential
//! `start → step* → end` protocol as with a direct agent, and value-function
//! saves and loads can never overlap a learning update. A handle shared
//! between threads serialises their calls on the worker; replies always reach
//! the caller that sent the request.

use std::thread::{self, JoinHandle};

use crossbeam::channel::{bounded, Sender};
use tracing::debug;

use crate::agent::{AgentError, EpisodicAgent};

type Reply<T> = Sender<T>;

enum Request {
    Start(usize, Reply<usize>),
    Step(Vec<f64>, usize, Reply<usize>),
    End(Vec<f64>, Reply<()>),
    Message(String, Reply<Result<String, AgentError>>),
    Shutdown,
}

/// Handle to an agent running on a worker thread.
///
/// Dropping the handle shuts the worker down.
pub struct AgentHandle<A: EpisodicAgent + 'static> {
    name: String,
    requests: Sender<Request>,
    worker: Option<JoinHandle<A>>,
}

impl<A: EpisodicAgent + 'static> AgentHandle<A> {
    /// Moves `agent` onto a new worker thread.
    pub fn spawn(agent: A) -> Self {
        let name = agent.name().to_string();
        let (requests, request_rx) = bounded::<Request>(1);

        let worker = thread::spawn(move || {
            let mut agent = agent;
            while let Ok(request) = request_rx.recv() {
                // a caller that gave up waiting has dropped its receiver
                match request {
                    Request::Start(observation, reply) => {
                        let _ = reply.send(agent.start(observation));
                    }
                    Request::Step(reward, observation, reply) => {
                        let _ = reply.send(agent.step(&reward, observation));
                    }
                    Request::End(reward, reply) => {
                        agent.end(&reward);
                        let _ = reply.send(());
                    }
                    Request::Message(message, reply) => {
                        let _ = reply.send(agent.message(&message));
                    }
                    Request::Shutdown => break,
                }
            }
            debug!(agent = agent.name(), "agent session stopped");
            agent
        });

        Self {
            name,
            requests,
            worker: Some(worker),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sends the request built around a fresh reply channel and waits for
    /// its answer.
    fn call<T>(&self, request: impl FnOnce(Reply<T>) -> Request) -> Result<T, AgentError> {
        let (tx, rx) = bounded(1);
        self.requests
            .send(request(tx))
            .map_err(|_| AgentError::SessionClosed)?;
        rx.recv().map_err(|_| AgentError::SessionClosed)
    }

    pub fn start(&self, observation: usize) -> Result<usize, AgentError> {
        self.call(|reply| Request::Start(observation, reply))
    }

    pub fn step(&self, reward: &[f64], observation: usize) -> Result<usize, AgentError> {
        self.call(|reply| Request::Step(reward.to_vec(), observation, reply))
    }

    pub fn end(&self, reward: &[f64]) -> Result<(), AgentError> {
        self.call(|reply| Request::End(reward.to_vec(), reply))
    }

    pub fn message(&self, message: &str) -> Result<String, AgentError> {
        self.call(|reply| Request::Message(message.to_string(), reply))?
    }

    /// Stops the worker and returns the agent.
    pub fn shutdown(mut self) -> Result<A, AgentError> {
        let worker = self.worker.take().ok_or(AgentError::SessionClosed)?;
        // a worker that already exited has dropped its receiver
        let _ = self.requests.send(Request::Shutdown);
        worker.join().map_err(|_| AgentError::SessionClosed)
    }
}

impl<A: EpisodicAgent + 'static> Drop for AgentHandle<A> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.requests.send(Request::Shutdown);
            let _ = worker.join();
        }
    }
}
