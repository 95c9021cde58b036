//! Apply-then-settle helper shared by every optimistic mutation.
//!
//! [`Mutation::apply`] changes the cache and captures whatever the caller
//! needs to undo it. [`Mutation::settle`] then either confirms the change
//! from the remote payload or restores the captured snapshot. The busy guard
//! travels with the mutation and is released only after settling.
//!
//! Dropping a `Mutation` without settling leaves the local change in place;
//! callers drive the remote future to completion rather than abandoning it.

use crate::flight::FlightGuard;
use featureflow_core::{FeedbackError, Result};
use tokio::sync::RwLock;

#[must_use = "an applied mutation must be settled with the remote outcome"]
pub struct Mutation<'a, C, S> {
    state: &'a RwLock<C>,
    guard: FlightGuard,
    snapshot: S,
    label: &'static str,
}

impl<'a, C, S> Mutation<'a, C, S> {
    /// Runs the local change under the write lock.
    ///
    /// If `change` fails the cache must be untouched; the guard is released
    /// and the error returned.
    pub async fn apply<F>(
        state: &'a RwLock<C>,
        guard: FlightGuard,
        label: &'static str,
        change: F,
    ) -> Result<Self>
    where
        F: FnOnce(&mut C) -> Result<S>,
    {
        let snapshot = {
            let mut cache = state.write().await;
            change(&mut cache)?
        };
        tracing::debug!(mutation = label, key = %guard.key(), "Applied optimistic change");

        Ok(Self {
            state,
            guard,
            snapshot,
            label,
        })
    }

    /// Confirms or rolls back according to the remote outcome.
    pub async fn settle<T, R, Confirm, Rollback>(
        self,
        outcome: Result<T>,
        confirm: Confirm,
        rollback: Rollback,
    ) -> Result<R>
    where
        Confirm: FnOnce(&mut C, T) -> R,
        Rollback: FnOnce(&mut C, S, &FeedbackError),
    {
        let Self {
            state,
            guard,
            snapshot,
            label,
        } = self;

        let result = {
            let mut cache = state.write().await;
            match outcome {
                Ok(payload) => {
                    tracing::debug!(mutation = label, key = %guard.key(), "Confirmed");
                    Ok(confirm(&mut cache, payload))
                }
                Err(err) => {
                    rollback(&mut cache, snapshot, &err);
                    tracing::warn!(
                        mutation = label,
                        key = %guard.key(),
                        error = %err,
                        "Rolled back optimistic change"
                    );
                    Err(err)
                }
            }
        };

        drop(guard);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::{EntityRef, FlightPolicy, InFlight, MutationKind};

    fn acquire(flights: &InFlight) -> FlightGuard {
        flights
            .try_acquire("u1", EntityRef::Idea("1".into()), MutationKind::Vote)
            .unwrap()
    }

    #[tokio::test]
    async fn test_confirm_keeps_change_and_releases_guard() {
        let flights = InFlight::new(FlightPolicy::PerOperation);
        let state = RwLock::new(vec![1, 2]);

        let mutation = Mutation::apply(&state, acquire(&flights), "push", |v: &mut Vec<i32>| {
            v.push(3);
            Ok(v.len() - 1)
        })
        .await
        .unwrap();
        assert_eq!(flights.active_count(), 1);

        let out = mutation
            .settle(
                Ok(30),
                |v: &mut Vec<i32>, server: i32| {
                    v[2] = server;
                    server
                },
                |_, _, _| unreachable!(),
            )
            .await
            .unwrap();

        assert_eq!(out, 30);
        assert_eq!(*state.read().await, vec![1, 2, 30]);
        assert_eq!(flights.active_count(), 0);
    }

    #[tokio::test]
    async fn test_rollback_restores_snapshot() {
        let flights = InFlight::new(FlightPolicy::PerOperation);
        let state = RwLock::new(vec![1, 2]);

        let mutation = Mutation::apply(&state, acquire(&flights), "clear", |v: &mut Vec<i32>| {
            Ok(std::mem::take(v))
        })
        .await
        .unwrap();
        assert!(state.read().await.is_empty());

        let err = mutation
            .settle(
                Err::<(), _>(FeedbackError::transport("offline")),
                |_, _| (),
                |v: &mut Vec<i32>, snapshot, _| *v = snapshot,
            )
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(*state.read().await, vec![1, 2]);
        assert_eq!(flights.active_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_apply_releases_guard() {
        let flights = InFlight::new(FlightPolicy::PerOperation);
        let state = RwLock::new(Vec::<i32>::new());

        let result = Mutation::<_, ()>::apply(&state, acquire(&flights), "noop", |_| {
            Err(FeedbackError::validation("vote", "missing"))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(flights.active_count(), 0);
    }
}
