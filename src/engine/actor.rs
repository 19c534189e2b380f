// ============================================================================
// Engine Actor
// Single writer thread owning the engine, fed over an ordered channel
// ============================================================================

use crate::domain::{Order, OrderBookSnapshot, Price, Quantity, Side};
use crate::engine::{Execution, ExecutionStats, MatchingEngine};
use crate::error::{EngineError, EngineResult};
use crossbeam::channel::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

enum Command {
    Submit(Order, Sender<EngineResult<Execution>>),
    AddLiquidity(Price, Quantity, Side, Sender<EngineResult<()>>),
    RemoveQuantity(Price, Quantity, Side, Sender<Quantity>),
    Snapshot(Sender<OrderBookSnapshot>),
    Stats(Sender<ExecutionStats>),
}

/// Owns a [`MatchingEngine`] on a dedicated thread.
///
/// Commands are processed strictly in arrival order, one at a time. Each
/// call blocks until the engine thread has answered.
pub struct EngineActor {
    commands: Option<Sender<Command>>,
    worker: Option<JoinHandle<MatchingEngine>>,
}

impl EngineActor {
    /// Move the engine onto a new thread named after its instrument
    pub fn spawn(engine: MatchingEngine) -> EngineResult<Self> {
        let (commands, inbox) = channel::unbounded();
        let worker = thread::Builder::new()
            .name(format!("engine-{}", engine.instrument()))
            .spawn(move || Self::run(engine, inbox))
            .map_err(|e| {
                tracing::error!("Failed to spawn engine thread: {}", e);
                EngineError::WorkerSpawn(e.to_string())
            })?;

        Ok(Self {
            commands: Some(commands),
            worker: Some(worker),
        })
    }

    pub fn submit(&self, order: Order) -> EngineResult<Execution> {
        self.request(|reply| Command::Submit(order, reply))?
    }

    pub fn add_liquidity(&self, price: Price, quantity: Quantity, side: Side) -> EngineResult<()> {
        self.request(|reply| Command::AddLiquidity(price, quantity, side, reply))?
    }

    pub fn remove_quantity(
        &self,
        price: Price,
        quantity: Quantity,
        side: Side,
    ) -> EngineResult<Quantity> {
        self.request(|reply| Command::RemoveQuantity(price, quantity, side, reply))
    }

    pub fn snapshot(&self) -> EngineResult<OrderBookSnapshot> {
        self.request(Command::Snapshot)
    }

    pub fn stats(&self) -> EngineResult<ExecutionStats> {
        self.request(Command::Stats)
    }

    /// Stop accepting commands, drain what was queued, and hand the engine back
    pub fn shutdown(mut self) -> EngineResult<MatchingEngine> {
        self.commands.take();
        self.worker
            .take()
            .ok_or(EngineError::EngineStopped)?
            .join()
            .map_err(|_| EngineError::EngineStopped)
    }

    fn request<T>(&self, build: impl FnOnce(Sender<T>) -> Command) -> EngineResult<T> {
        let commands = self.commands.as_ref().ok_or(EngineError::EngineStopped)?;
        let (reply, response) = channel::bounded(1);
        commands
            .send(build(reply))
            .map_err(|_| EngineError::EngineStopped)?;
        response.recv().map_err(|_| EngineError::EngineStopped)
    }

    fn run(mut engine: MatchingEngine, inbox: Receiver<Command>) -> MatchingEngine {
        tracing::debug!("Engine thread for {} started", engine.instrument());

        // A dropped reply receiver only means the caller stopped waiting
        for command in inbox {
            match command {
                Command::Submit(order, reply) => {
                    let _ = reply.send(engine.submit(&order));
                },
                Command::AddLiquidity(price, quantity, side, reply) => {
                    let _ = reply.send(engine.add_liquidity(price, quantity, side));
                },
                Command::RemoveQuantity(price, quantity, side, reply) => {
                    let _ = reply.send(engine.remove_quantity(price, quantity, side));
                },
                Command::Snapshot(reply) => {
                    let _ = reply.send(engine.snapshot());
                },
                Command::Stats(reply) => {
                    let _ = reply.send(engine.stats());
                },
            }
        }

        tracing::debug!("Engine thread for {} stopped", engine.instrument());
        engine
    }
}

impl Drop for EngineActor {
    fn drop(&mut self) {
        self.commands.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderOutcome;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    #[test]
    fn test_actor_round_trip() {
        let actor = EngineActor::spawn(MatchingEngine::default()).unwrap();
        actor
            .add_liquidity(Decimal::from(50000), 10, Side::Sell)
            .unwrap();

        let execution = actor.submit(Order::buy(Decimal::from(50005), 12)).unwrap();

        assert_eq!(execution.filled_quantity(), 10);
        assert_eq!(execution.rested, 2);
        assert_eq!(execution.outcome, OrderOutcome::PartiallyFilled);

        let snapshot = actor.snapshot().unwrap();
        assert_eq!(snapshot.best_bid(), Some(Decimal::from(50005)));
        assert_eq!(snapshot.best_ask(), None);
        assert_eq!(actor.stats().unwrap().total_volume, 10);
    }

    #[test]
    fn test_spawn_names_thread_after_instrument() {
        let engine = MatchingEngine::new(
            &crate::domain::EngineConfig::new("ETH-USD"),
            Arc::new(crate::interfaces::NoOpEventHandler),
        );

        let actor = EngineActor::spawn(engine).unwrap();
        let name = actor
            .worker
            .as_ref()
            .and_then(|worker| worker.thread().name().map(str::to_string));

        assert_eq!(name.as_deref(), Some("engine-ETH-USD"));
        assert_eq!(actor.shutdown().unwrap().instrument(), "ETH-USD");
    }

    #[test]
    fn test_actor_rejects_invalid_order() {
        let actor = EngineActor::spawn(MatchingEngine::default()).unwrap();

        let result = actor.submit(Order::sell(Decimal::from(10), 0));

        assert!(matches!(result, Err(EngineError::InvalidOrder { .. })));
        assert_eq!(actor.remove_quantity(Decimal::from(10), 1, Side::Sell), Ok(0));
    }

    #[test]
    fn test_shutdown_returns_engine_state() {
        let actor = EngineActor::spawn(MatchingEngine::default()).unwrap();
        actor
            .add_liquidity(Decimal::from(7), 3, Side::Buy)
            .unwrap();

        let engine = actor.shutdown().unwrap();

        assert_eq!(engine.best_bid(), Some(Decimal::from(7)));
    }

    #[test]
    fn test_submissions_from_many_threads() {
        let actor = Arc::new(EngineActor::spawn(MatchingEngine::default()).unwrap());
        actor
            .add_liquidity(Decimal::from(100), 400, Side::Buy)
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let actor = Arc::clone(&actor);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        actor.submit(Order::sell(Decimal::from(95), 10)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = actor.stats().unwrap();
        assert_eq!(stats.total_volume, 400);
        assert_eq!(actor.snapshot().unwrap().best_bid(), None);
    }
}
