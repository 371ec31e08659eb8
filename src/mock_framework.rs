//! # Mock Framework
//!
//! Utilities for testing store consumers in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_get`] or [`expect_update`] to assert the
//! requests a component makes and to answer them with whatever outcome the
//! test needs, including store failures.

use tokio::sync::mpsc;

use crate::actor_framework::{ResourceClient, ResourceRequest, Response};
use crate::store::{Entity, RecordId};

/// Creates a mock client and a receiver for asserting requests.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Draft, Response<RecordId>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { draft, respond_to }) => Some((draft, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(RecordId, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<Response<Vec<T>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(RecordId, T, Response<()>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update {
            id,
            record,
            respond_to,
        }) => Some((id, record, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Credential, User, UserDraft};
    use crate::store::RecordStore;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        let create_task = tokio::spawn(async move {
            let user = UserDraft {
                name: "Test".to_string(),
                email: "test@example.com".to_string(),
                password: Credential::new("pw"),
            };
            client.create(user).await
        });

        let (draft, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(draft.name, "Test");
        responder.send(Ok(1)).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(1));
    }
}
