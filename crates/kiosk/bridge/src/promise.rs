//! One-shot result handed back to the application layer

use tokio::sync::oneshot;

/// Receiving side of a [`Promise`]; await it for the value
pub type Pending<T> = oneshot::Receiver<T>;

/// Resolves exactly once with a value
#[derive(Debug)]
pub struct Promise<T> {
    sender: oneshot::Sender<T>,
}

impl<T> Promise<T> {
    /// Create a promise and the receiver that observes it
    pub fn channel() -> (Promise<T>, Pending<T>) {
        let (sender, receiver) = oneshot::channel();
        (Promise { sender }, receiver)
    }

    /// Resolve the promise. A dropped receiver is not an error.
    pub fn resolve(self, value: T) {
        if self.sender.send(value).is_err() {
            tracing::debug!("Promise resolved after its receiver was dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_reaches_receiver() {
        let (promise, pending) = Promise::channel();
        promise.resolve(true);
        assert!(pending.await.unwrap());
    }

    #[test]
    fn test_resolve_after_drop_is_silent() {
        let (promise, pending) = Promise::<bool>::channel();
        drop(pending);
        promise.resolve(false);
    }
}
