//! [`Entity`] implementations for the two persisted collections.

use super::{Entity, RecordId};
use crate::domain::{Product, ProductDraft, User, UserDraft};

impl Entity for Product {
    type Draft = ProductDraft;

    const COLLECTION: &'static str = "products";

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            category: draft.category,
            price: draft.price,
            quantity: draft.quantity,
        }
    }
}

impl Entity for User {
    type Draft = UserDraft;

    const COLLECTION: &'static str = "users";

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: UserDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            password: draft.password,
        }
    }
}
