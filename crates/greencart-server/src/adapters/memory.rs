//! In-memory adapters for router tests
//!
//! One store implements every repository port so that `place_order` can be
//! atomic under a single lock, like the Postgres transaction.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use async_trait::async_trait;
use uuid::Uuid;

use greencart::{
    CartItem, CartLine, CartRepository, DomainError, ImageStorage, ImageUpload, Order,
    OrderRepository, Product, ProductFilter, ProductRepository, ProductWithSeller, Review,
    ReviewDetails, ReviewRepository, SellerProfile, SellerSummary, User, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    seller_profiles: Vec<SellerProfile>,
    products: Vec<Product>,
    cart_items: Vec<CartItem>,
    orders: Vec<Order>,
    reviews: Vec<Review>,
}

impl Tables {
    fn seller_summary(&self, seller_id: Uuid) -> Option<SellerSummary> {
        self.users
            .iter()
            .find(|u| u.id == seller_id)
            .map(|u| SellerSummary {
                id: u.id,
                username: u.username.clone(),
                email: u.email.clone(),
                city: u.city.clone(),
                profile_image: u.profile_image.clone(),
                created_at: u.created_at,
            })
    }

    fn with_seller(&self, product: &Product) -> ProductWithSeller {
        ProductWithSeller {
            product: product.clone(),
            seller: self.seller_summary(product.seller_id),
        }
    }

    fn review_details(&self, review: &Review) -> Option<ReviewDetails> {
        let buyer = self.users.iter().find(|u| u.id == review.buyer_id)?;
        let product = self.products.iter().find(|p| p.id == review.product_id)?;
        Some(ReviewDetails {
            review: review.clone(),
            buyer_username: buyer.username.clone(),
            buyer_profile_image: buyer.profile_image.clone(),
            product_title: product.title.clone(),
            product_images: product.images.clone(),
        })
    }
}

/// Newest first; ties keep the most recently inserted first
fn newest_first<T: Clone>(items: &[T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    let mut sorted: Vec<T> = items.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    sorted
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn seller_profile(&self, user_id: Uuid) -> Option<SellerProfile> {
        self.lock()
            .seller_profiles
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(newest_first(&self.lock().users, |u| u.created_at))
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.lock();
        let others = tables.users.iter().filter(|u| u.id != user.id);
        for other in others {
            if other.email == user.email {
                return Err(DomainError::Conflict("users_email_key".to_string()));
            }
            if other.username == user.username {
                return Err(DomainError::Conflict("users_username_key".to_string()));
            }
        }

        match tables.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => tables.users.push(user.clone()),
        }
        Ok(user.clone())
    }

    async fn save_seller_profile(
        &self,
        profile: &SellerProfile,
    ) -> Result<SellerProfile, DomainError> {
        let mut tables = self.lock();
        tables.seller_profiles.retain(|p| p.user_id != profile.user_id);
        tables.seller_profiles.push(profile.clone());
        Ok(profile.clone())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self.lock().products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_with_seller(&self, id: Uuid) -> Result<Option<ProductWithSeller>, DomainError> {
        let tables = self.lock();
        Ok(tables
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.with_seller(p)))
    }

    async fn search(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<ProductWithSeller>, i64), DomainError> {
        let tables = self.lock();
        let matching: Vec<Product> = newest_first(&tables.products, |p| p.created_at)
            .into_iter()
            .filter(|p| {
                let seller = tables
                    .users
                    .iter()
                    .find(|u| u.id == p.seller_id)
                    .map(|u| (u.city.as_str(), u.role));
                filter.matches(p, seller)
            })
            .collect();

        let total = matching.len() as i64;
        let page = matching
            .iter()
            .skip(usize::try_from(filter.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(filter.limit).unwrap_or(usize::MAX))
            .map(|p| tables.with_seller(p))
            .collect();
        Ok((page, total))
    }

    async fn find_active_by_seller(
        &self,
        seller_id: Uuid,
    ) -> Result<Vec<ProductWithSeller>, DomainError> {
        let tables = self.lock();
        Ok(newest_first(&tables.products, |p| p.created_at)
            .iter()
            .filter(|p| p.seller_id == seller_id && p.is_active)
            .map(|p| tables.with_seller(p))
            .collect())
    }

    async fn count_active_by_seller(&self, seller_id: Uuid) -> Result<i64, DomainError> {
        Ok(self
            .lock()
            .products
            .iter()
            .filter(|p| p.seller_id == seller_id && p.is_active)
            .count() as i64)
    }

    async fn save(&self, product: &Product) -> Result<Product, DomainError> {
        let mut tables = self.lock();
        match tables.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product.clone(),
            None => tables.products.push(product.clone()),
        }
        Ok(product.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.lock();
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        if tables.products.len() == before {
            return Ok(false);
        }

        tables.reviews.retain(|r| r.product_id != id);
        tables.cart_items.retain(|c| c.product_id != id);
        for item in tables.orders.iter_mut().flat_map(|o| o.items.iter_mut()) {
            if item.product_id == Some(id) {
                item.product_id = None;
            }
        }
        Ok(true)
    }

    async fn update_rating(
        &self,
        id: Uuid,
        average_rating: f64,
        review_count: i32,
    ) -> Result<(), DomainError> {
        if let Some(product) = self.lock().products.iter_mut().find(|p| p.id == id) {
            product.average_rating = average_rating;
            product.review_count = review_count;
        }
        Ok(())
    }
}

#[async_trait]
impl CartRepository for InMemoryStore {
    async fn find_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, DomainError> {
        let tables = self.lock();
        Ok(tables
            .cart_items
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| CartLine {
                item: c.clone(),
                product: tables.products.iter().find(|p| p.id == c.product_id).cloned(),
            })
            .collect())
    }

    async fn find_item(
        &self,
        user_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<CartItem>, DomainError> {
        Ok(self
            .lock()
            .cart_items
            .iter()
            .find(|c| c.id == item_id && c.user_id == user_id)
            .cloned())
    }

    async fn find_item_by_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<CartItem>, DomainError> {
        Ok(self
            .lock()
            .cart_items
            .iter()
            .find(|c| c.user_id == user_id && c.product_id == product_id)
            .cloned())
    }

    async fn save_item(&self, item: &CartItem) -> Result<CartItem, DomainError> {
        let mut tables = self.lock();
        match tables
            .cart_items
            .iter_mut()
            .find(|c| c.user_id == item.user_id && c.product_id == item.product_id)
        {
            Some(existing) => {
                existing.quantity = item.quantity;
                Ok(existing.clone())
            }
            None => {
                tables.cart_items.push(item.clone());
                Ok(item.clone())
            }
        }
    }

    async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.lock();
        let before = tables.cart_items.len();
        tables
            .cart_items
            .retain(|c| !(c.id == item_id && c.user_id == user_id));
        Ok(tables.cart_items.len() < before)
    }

    async fn clear(&self, user_id: Uuid) -> Result<(), DomainError> {
        self.lock().cart_items.retain(|c| c.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn place_order(&self, order: &Order) -> Result<Order, DomainError> {
        let mut tables = self.lock();

        for item in &order.items {
            let available = tables
                .products
                .iter()
                .find(|p| Some(p.id) == item.product_id && p.is_active)
                .map(|p| p.stock)
                .unwrap_or(0);
            if available < item.quantity {
                return Err(DomainError::Conflict(format!(
                    "Stock for \"{}\" changed during checkout",
                    item.product_title
                )));
            }
        }

        for item in &order.items {
            if let Some(product) = tables
                .products
                .iter_mut()
                .find(|p| Some(p.id) == item.product_id)
            {
                product.stock -= item.quantity;
            }
        }

        tables.orders.push(order.clone());
        tables.cart_items.retain(|c| c.user_id != order.buyer_id);
        Ok(order.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.lock().orders.iter().find(|o| o.id == id).cloned())
    }

    async fn find_by_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        Ok(newest_first(&self.lock().orders, |o| o.created_at)
            .into_iter()
            .filter(|o| o.buyer_id == buyer_id)
            .collect())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, DomainError> {
        Ok(self.lock().reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn exists(
        &self,
        buyer_id: Uuid,
        order_id: Uuid,
        product_id: Uuid,
    ) -> Result<bool, DomainError> {
        Ok(self.lock().reviews.iter().any(|r| {
            r.buyer_id == buyer_id && r.order_id == order_id && r.product_id == product_id
        }))
    }

    async fn insert(&self, review: &Review) -> Result<Review, DomainError> {
        let mut tables = self.lock();
        let duplicate = tables.reviews.iter().any(|r| {
            r.buyer_id == review.buyer_id
                && r.order_id == review.order_id
                && r.product_id == review.product_id
        });
        if duplicate {
            return Err(DomainError::Conflict(
                "reviews_buyer_order_product_key".to_string(),
            ));
        }
        tables.reviews.push(review.clone());
        Ok(review.clone())
    }

    async fn find_by_product(&self, product_id: Uuid) -> Result<Vec<ReviewDetails>, DomainError> {
        let tables = self.lock();
        Ok(newest_first(&tables.reviews, |r| r.created_at)
            .iter()
            .filter(|r| r.product_id == product_id && r.is_approved)
            .filter_map(|r| tables.review_details(r))
            .collect())
    }

    async fn find_by_seller(&self, seller_id: Uuid) -> Result<Vec<ReviewDetails>, DomainError> {
        let tables = self.lock();
        Ok(newest_first(&tables.reviews, |r| r.created_at)
            .iter()
            .filter(|r| r.seller_id == seller_id && r.is_approved)
            .filter_map(|r| tables.review_details(r))
            .collect())
    }

    async fn approved_ratings_for_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<i32>, DomainError> {
        Ok(self
            .lock()
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id && r.is_approved)
            .map(|r| r.rating)
            .collect())
    }

    async fn approved_ratings_for_seller(&self, seller_id: Uuid) -> Result<Vec<i32>, DomainError> {
        Ok(self
            .lock()
            .reviews
            .iter()
            .filter(|r| r.seller_id == seller_id && r.is_approved)
            .map(|r| r.rating)
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.lock();
        let before = tables.reviews.len();
        tables.reviews.retain(|r| r.id != id);
        Ok(tables.reviews.len() < before)
    }
}

/// Image storage that hands out predictable URLs
#[derive(Default)]
pub struct InMemoryImageStorage {
    uploads: AtomicUsize,
}

impl InMemoryImageStorage {
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageStorage for InMemoryImageStorage {
    async fn upload(&self, image: ImageUpload) -> Result<String, DomainError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://images.test/{n}/{}", image.file_name))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
