//! Request/response façade over the ledger and the user directory.
//!
//! The catalog checks request shape (required fields, numeric ranges, email
//! format) and maps internal failures to [`CatalogError`]. All quantity
//! logic stays in the ledger.

mod error;
mod receipt;
pub mod requests;
pub mod validation;

pub use error::CatalogError;
pub use receipt::SaleReceipt;
pub use requests::{
    parse_request, AddProductRequest, ChangePasswordRequest, LoginRequest, SignupRequest,
    UpdateProductRequest, UpdateUserRequest,
};

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::domain::{
    Credential, Product, ProductDetails, ProductDraft, ProductId, User, UserDraft, UserId,
    UserSummary,
};
use crate::ledger::{InventoryLedger, StockMovement};
use crate::monitor::{InventorySummary, LowStockMonitor};
use crate::store::RecordStore;

pub struct CatalogService<P, U> {
    ledger: Arc<InventoryLedger<P>>,
    monitor: LowStockMonitor<P>,
    users: U,
}

impl<P, U: Clone> Clone for CatalogService<P, U> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            monitor: self.monitor.clone(),
            users: self.users.clone(),
        }
    }
}

impl<P, U> CatalogService<P, U>
where
    P: RecordStore<Product>,
    U: RecordStore<User>,
{
    pub fn new(ledger: Arc<InventoryLedger<P>>, users: U) -> Self {
        let monitor = LowStockMonitor::new(Arc::clone(&ledger));
        Self {
            ledger,
            monitor,
            users,
        }
    }

    // =========================================================================
    // Products
    // =========================================================================

    #[instrument(skip(self, request), fields(product_name = %request.name))]
    pub async fn add_product(&self, request: AddProductRequest) -> Result<Product, CatalogError> {
        validation::required("name", &request.name)?;
        validation::required("description", &request.description)?;
        validation::required("category", &request.category)?;
        let price = validation::price(request.price)?;
        let quantity = validation::quantity(request.quantity)?;

        let product = self
            .ledger
            .register(ProductDraft {
                name: request.name,
                description: request.description,
                category: request.category,
                price,
                quantity,
            })
            .await?;
        Ok(product)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.ledger.snapshot().await?)
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        Ok(self.ledger.get(id).await?)
    }

    #[instrument(skip(self, request))]
    pub async fn update_product(
        &self,
        id: ProductId,
        request: UpdateProductRequest,
    ) -> Result<Product, CatalogError> {
        validation::required("name", &request.name)?;
        validation::required("description", &request.description)?;
        validation::required("category", &request.category)?;
        let price = validation::price(request.price)?;
        let quantity = request.quantity.map(validation::quantity).transpose()?;

        let details = ProductDetails {
            name: request.name,
            description: request.description,
            category: request.category,
            price,
        };
        Ok(self.ledger.edit(id, details, quantity).await?)
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        Ok(self.ledger.remove(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn sell(&self, id: ProductId, quantity: i64) -> Result<SaleReceipt, CatalogError> {
        let quantity = validation::quantity(quantity)?;
        let sale = self.ledger.sell(id, quantity).await?;

        let receipt = SaleReceipt::new(sale, quantity);
        info!(total = %receipt.total, remaining = receipt.product.quantity, "Sale confirmed");
        Ok(receipt)
    }

    #[instrument(skip(self))]
    pub async fn restock(&self, id: ProductId, quantity: i64) -> Result<Product, CatalogError> {
        let quantity = validation::quantity(quantity)?;
        Ok(self.ledger.restock(id, quantity).await?)
    }

    pub async fn low_stock(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.monitor.list().await?)
    }

    pub async fn inventory_summary(&self) -> Result<InventorySummary, CatalogError> {
        Ok(self.monitor.summary().await?)
    }

    pub async fn stock_movements(&self) -> Vec<StockMovement> {
        self.ledger.movements().await
    }

    // =========================================================================
    // Users
    // =========================================================================

    #[instrument(skip(self, request), fields(user_name = %request.name, user_email = %request.email))]
    pub async fn signup(&self, request: SignupRequest) -> Result<UserId, CatalogError> {
        validation::required("name", &request.name)?;
        validation::email(&request.email)?;
        validation::present("password", &request.password)?;

        let id = self
            .users
            .create(UserDraft {
                name: request.name,
                email: request.email,
                password: Credential::new(request.password),
            })
            .await?;

        info!(user_id = id, "User created");
        Ok(id)
    }

    /// Id of the first user registered under `email`, if the password matches exactly.
    #[instrument(skip(self, request), fields(user_email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<UserId, CatalogError> {
        validation::email(&request.email)?;
        validation::present("password", &request.password)?;

        let users = self.users.list().await?;
        match users.iter().find(|user| user.email == request.email) {
            Some(user) if user.password.matches(&request.password) => {
                info!(user_id = user.id, "Login succeeded");
                Ok(user.id)
            }
            _ => {
                warn!("Login rejected");
                Err(CatalogError::InvalidCredentials)
            }
        }
    }

    /// Set a new password on every user matching both name and email.
    #[instrument(skip(self, request), fields(user_name = %request.username, user_email = %request.email))]
    pub async fn change_password(&self, request: ChangePasswordRequest) -> Result<(), CatalogError> {
        validation::required("username", &request.username)?;
        validation::email(&request.email)?;
        validation::present("new password", &request.new_password)?;

        let matching: Vec<User> = self
            .users
            .list()
            .await?
            .into_iter()
            .filter(|user| user.name == request.username && user.email == request.email)
            .collect();
        if matching.is_empty() {
            return Err(CatalogError::NotFound("user".to_string()));
        }

        let mut applied: Vec<&User> = Vec::with_capacity(matching.len());
        for user in &matching {
            let mut updated = user.clone();
            updated.password = Credential::new(request.new_password.clone());
            if let Err(e) = self.users.update(user.id, updated).await {
                self.restore_users(&applied).await;
                return Err(e.into());
            }
            applied.push(user);
        }

        info!(updated = applied.len(), "Password changed");
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, CatalogError> {
        let users = self.users.list().await?;
        Ok(users.iter().map(UserSummary::from).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn update_user(
        &self,
        id: UserId,
        request: UpdateUserRequest,
    ) -> Result<(), CatalogError> {
        validation::required("name", &request.name)?;
        validation::email(&request.email)?;
        if let Some(password) = &request.password {
            validation::present("password", password)?;
        }

        let mut user = self.users.get(id).await?;
        user.name = request.name;
        user.email = request.email;
        if let Some(password) = request.password {
            user.password = Credential::new(password);
        }
        self.users.update(id, user).await?;

        info!("User updated");
        Ok(())
    }

    pub async fn delete_user(&self, id: UserId) -> Result<(), CatalogError> {
        self.users.delete(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Put back records a failed multi-record update already changed.
    async fn restore_users(&self, originals: &[&User]) {
        for user in originals {
            if let Err(e) = self.users.update(user.id, (*user).clone()).await {
                error!(user_id = user.id, error = %e, "Failed to restore user after partial update");
            }
        }
    }
}
