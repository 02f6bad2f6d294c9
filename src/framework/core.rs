//! # Core Actor Framework
//!
//! Generic building blocks for the actor side of the crate.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: the trait a managed resource type must implement.
//! - [`ResourceActor`]: the generic actor that owns a store of entities.
//! - [`ResourceClient`]: the generic client for talking to an actor.
//! - [`FrameworkError`]: channel and lookup errors of the plumbing itself.
//!
//! The operation set is deliberately small: resources here are created,
//! read, and advanced through domain actions. There is no external update
//! or delete; once an entity exists, only its own action handler may
//! mutate it, which keeps every state transition inside the actor task.

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Trait that a resource entity must implement to be managed by
/// [`ResourceActor`].
///
/// Associated types keep every operation typed end to end: an order actor
/// can only be sent order creation payloads and order actions, and the
/// compiler enforces it.
///
/// # Context
///
/// `Context` carries the runtime dependencies an entity needs (clocks,
/// resolvers, other clients). It is injected into [`ResourceActor::run`]
/// rather than into the constructor, so actors can be built before their
/// dependencies exist and wired together at startup.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The payload required to create a new instance.
    type CreateParams: Send + Sync + Debug;

    /// Enum of resource-specific operations.
    type Action: Send + Sync + Debug;

    /// The result type returned by actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime dependencies injected into the actor. Use `()` if none
    /// are needed.
    type Context: Send + Sync;

    /// Construct the full entity from the generated id and the payload.
    fn from_create_params(
        id: Self::Id,
        params: Self::CreateParams,
        ctx: &Self::Context,
    ) -> Result<Self, String>;

    /// Handle a resource-specific action. This is the only mutation point
    /// after creation.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, String>;
}

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Custom error: {0}")]
    Custom(String),
}

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// Each variant maps to one lifecycle operation of the managed resource:
///
/// - **Create**: allocate an id, build the entity, store it, and return the
///   stored copy to the caller.
/// - **Get**: fetch a snapshot of the current state by id.
/// - **Action**: run a custom [`ActorEntity::Action`] against the stored
///   entity.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

/// The generic actor that manages a collection of entities.
///
/// This is the "server" half: it owns the store and the receiver end of the
/// channel. Messages are processed sequentially in a loop, so the store
/// needs no `Mutex`; exclusive ownership inside the task is the
/// synchronization.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: ActorEntity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until the channel
    /// closes.
    ///
    /// `context` is handed to every entity hook, which lets entities reach
    /// dependencies that were created after the actor was instantiated but
    /// before the loop started.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g. "Order" instead of
        // "payment_orders::model::order::Order")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = (self.next_id_fn)();

                    match T::from_create_params(id.clone(), params, &context) {
                        Ok(item) => {
                            self.store.insert(id.clone(), item.clone());
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(item));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::Custom(e)));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    if let Some(item) = self.store.get_mut(&id) {
                        let result = item
                            .handle_action(action, &context)
                            .await
                            .map_err(FrameworkError::Custom);
                        match &result {
                            Ok(_) => debug!(entity_type, %id, "Action ok"),
                            Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                        }
                        let _ = respond_to.send(result);
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}

/// A type-safe client for interacting with a [`ResourceActor`].
#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    /// Create a new entity and return the stored copy.
    pub async fn create(&self, params: T::CreateParams) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Create { params, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Fetch a snapshot of the entity with the given id.
    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Get { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Run a domain action against the entity with the given id.
    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Action {
                id,
                action,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: String,
        label: String,
        value: u64,
    }

    #[derive(Debug)]
    struct CounterCreate {
        label: String,
        start: u64,
    }

    #[derive(Debug)]
    enum CounterAction {
        Increment,
        Reset,
    }

    #[async_trait]
    impl ActorEntity for Counter {
        type Id = String;
        type CreateParams = CounterCreate;
        type Action = CounterAction;
        type ActionResult = u64;
        type Context = ();

        fn from_create_params(
            id: String,
            params: CounterCreate,
            _ctx: &Self::Context,
        ) -> Result<Self, String> {
            if params.label.is_empty() {
                return Err("label required".to_string());
            }
            Ok(Self {
                id,
                label: params.label,
                value: params.start,
            })
        }

        async fn handle_action(
            &mut self,
            action: CounterAction,
            _ctx: &Self::Context,
        ) -> Result<u64, String> {
            match action {
                CounterAction::Increment => {
                    self.value += 1;
                    Ok(self.value)
                }
                CounterAction::Reset => {
                    self.value = 0;
                    Ok(self.value)
                }
            }
        }
    }

    fn spawn_counter_actor() -> ResourceClient<Counter> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            format!("counter_{}", id)
        };
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run(()));
        client
    }

    #[tokio::test]
    async fn create_returns_stored_entity() {
        let client = spawn_counter_actor();

        let created = client
            .create(CounterCreate {
                label: "hits".into(),
                start: 3,
            })
            .await
            .unwrap();
        assert_eq!(created.id, "counter_1");
        assert_eq!(created.value, 3);

        let fetched = client.get(created.id.clone()).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_rejects_invalid_params() {
        let client = spawn_counter_actor();

        let err = client
            .create(CounterCreate {
                label: String::new(),
                start: 0,
            })
            .await
            .unwrap_err();
        assert_eq!(err, FrameworkError::Custom("label required".to_string()));
    }

    #[tokio::test]
    async fn actions_mutate_stored_state() {
        let client = spawn_counter_actor();

        let created = client
            .create(CounterCreate {
                label: "hits".into(),
                start: 0,
            })
            .await
            .unwrap();

        let value = client
            .perform_action(created.id.clone(), CounterAction::Increment)
            .await
            .unwrap();
        assert_eq!(value, 1);

        let value = client
            .perform_action(created.id.clone(), CounterAction::Reset)
            .await
            .unwrap();
        assert_eq!(value, 0);

        let fetched = client.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.value, 0);
    }

    #[tokio::test]
    async fn action_on_unknown_id_is_not_found() {
        let client = spawn_counter_actor();

        let err = client
            .perform_action("counter_404".to_string(), CounterAction::Increment)
            .await
            .unwrap_err();
        assert_eq!(err, FrameworkError::NotFound("counter_404".to_string()));

        let missing = client.get("counter_404".to_string()).await.unwrap();
        assert!(missing.is_none());
    }
}
