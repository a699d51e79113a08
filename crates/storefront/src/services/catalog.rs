//! Catalog service.
//!
//! Read-only access to products, categories, brands, and shops, cached with
//! `moka` (5-minute TTL). Search queries bypass the cache: their keyspace is
//! unbounded and results go stale faster than browsing pages.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use crate::api::types::{Brand, Category, Paginated, Product, Shop};
use crate::api::{ApiClient, ApiError};

/// How long catalog responses stay cached.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Paginated<Product>),
    Categories(Vec<Category>),
    Brands(Vec<Brand>),
    Shops(Paginated<Shop>),
    Shop(Box<Shop>),
}

/// Filters for a product listing request.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub shop: Option<String>,
    pub sort: Option<String>,
    pub search: Option<String>,
}

impl ProductFilter {
    fn is_search(&self) -> bool {
        self.search.as_deref().is_some_and(|q| !q.is_empty())
    }

    fn query(&self) -> [(&'static str, Option<String>); 7] {
        [
            ("page", self.page.map(|p| p.to_string())),
            ("perPage", self.per_page.map(|p| p.to_string())),
            ("category", self.category.clone()),
            ("brand", self.brand.clone()),
            ("shop", self.shop.clone()),
            ("sort", self.sort.clone()),
            ("q", self.search.clone()),
        ]
    }

    fn cache_key(&self) -> String {
        format!(
            "products:{}:{}:{}:{}:{}:{}",
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(0),
            self.category.as_deref().unwrap_or(""),
            self.brand.as_deref().unwrap_or(""),
            self.shop.as_deref().unwrap_or(""),
            self.sort.as_deref().unwrap_or(""),
        )
    }
}

/// Catalog service.
///
/// Cheaply cloneable; all clones share the cache.
#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogServiceInner>,
}

struct CatalogServiceInner {
    api: ApiClient,
    cache: Cache<String, CacheValue>,
}

impl CatalogService {
    /// Create a new catalog service over the shared API client.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(CatalogServiceInner { api, cache }),
        }
    }

    /// Get a page of products matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, filter: &ProductFilter) -> Result<Paginated<Product>, ApiError> {
        if filter.is_search() {
            // Search results skip the cache entirely.
            return self
                .inner
                .api
                .get_with("/products", &filter.query())
                .await;
        }

        let cache_key = filter.cache_key();
        if let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for product listing");
            return Ok(page);
        }

        let page: Paginated<Product> = self
            .inner
            .api
            .get_with("/products", &filter.query())
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(page.clone()))
            .await;

        Ok(page)
    }

    /// Get a single product by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Product, ApiError> {
        let cache_key = format!("product:{slug}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.inner.api.get(&format!("/products/{slug}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.inner.api.get("/categories").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Get all brands.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn brands(&self) -> Result<Vec<Brand>, ApiError> {
        let cache_key = "brands".to_string();

        if let Some(CacheValue::Brands(brands)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for brands");
            return Ok(brands);
        }

        let brands: Vec<Brand> = self.inner.api.get("/brands").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Brands(brands.clone()))
            .await;

        Ok(brands)
    }

    /// Get a page of vendor shops.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn shops(&self, page: Option<u32>) -> Result<Paginated<Shop>, ApiError> {
        let cache_key = format!("shops:{}", page.unwrap_or(1));

        if let Some(CacheValue::Shops(shops)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for shops");
            return Ok(shops);
        }

        let query = [("page", page.map(|p| p.to_string()))];
        let shops: Paginated<Shop> = self.inner.api.get_with("/shops", &query).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Shops(shops.clone()))
            .await;

        Ok(shops)
    }

    /// Get a single shop by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the shop is not found or the request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn shop_by_slug(&self, slug: &str) -> Result<Shop, ApiError> {
        let cache_key = format!("shop:{slug}");

        if let Some(CacheValue::Shop(shop)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for shop");
            return Ok(*shop);
        }

        let shop: Shop = self.inner.api.get(&format!("/shops/{slug}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Shop(Box::new(shop.clone())))
            .await;

        Ok(shop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_bypasses_cache() {
        let filter = ProductFilter {
            search: Some("lamp".to_string()),
            ..ProductFilter::default()
        };
        assert!(filter.is_search());

        let empty_search = ProductFilter {
            search: Some(String::new()),
            ..ProductFilter::default()
        };
        assert!(!empty_search.is_search());
    }

    #[test]
    fn test_cache_key_ignores_search() {
        let a = ProductFilter {
            page: Some(2),
            category: Some("lighting".to_string()),
            ..ProductFilter::default()
        };
        let b = ProductFilter {
            page: Some(2),
            category: Some("lighting".to_string()),
            search: Some("lamp".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(a.cache_key(), b.cache_key());

        let c = ProductFilter {
            page: Some(3),
            ..ProductFilter::default()
        };
        assert_ne!(a.cache_key(), c.cache_key());
    }

    #[test]
    fn test_query_includes_all_filters() {
        let filter = ProductFilter {
            page: Some(2),
            per_page: Some(24),
            sort: Some("price".to_string()),
            search: Some("lamp".to_string()),
            ..ProductFilter::default()
        };

        let query = filter.query();
        assert!(query.contains(&("page", Some("2".to_string()))));
        assert!(query.contains(&("q", Some("lamp".to_string()))));
        assert!(query.contains(&("category", None)));
    }
}
