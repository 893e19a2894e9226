//! Lazy multi-page listing for `BigCommerceClient`.

use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::pagination::{Resource, MAX_PAGES};
use crate::types::{CatalogItem, Coupon};

use super::BigCommerceClient;

impl BigCommerceClient {
    /// Streams every item of `resource`, one page at a time.
    ///
    /// Pages are requested lazily as the stream is polled, starting at page 1.
    /// The stream ends at the first empty page. The fixed page delay is
    /// applied before every page after the first.
    ///
    /// The first error ends the stream; items already yielded stay with the
    /// caller.
    pub fn paginate<'a, T>(
        &'a self,
        resource: Resource,
        page_size: u32,
    ) -> impl Stream<Item = Result<T, ClientError>> + 'a
    where
        T: DeserializeOwned + 'a,
    {
        stream::try_unfold(1u32, move |page| async move {
            if page > MAX_PAGES {
                return Err(ClientError::PaginationLimit {
                    path: resource.path().to_owned(),
                    max_pages: MAX_PAGES,
                });
            }
            if page > 1 {
                self.pacer.pause().await;
            }

            let items: Vec<T> = self.fetch_page(resource, page, page_size).await?;
            if items.is_empty() {
                tracing::debug!(path = resource.path(), pages = page - 1, "pagination drained");
                return Ok(None);
            }
            Ok(Some((items, page + 1)))
        })
        .map_ok(|items| stream::iter(items.into_iter().map(Ok)))
        .try_flatten()
    }

    /// Drains [`Self::paginate`] into a `Vec`.
    ///
    /// # Errors
    ///
    /// Returns the first page error; partial results are discarded.
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        resource: Resource,
        page_size: u32,
    ) -> Result<Vec<T>, ClientError> {
        self.paginate(resource, page_size).try_collect().await
    }

    /// All coupons in the store.
    ///
    /// # Errors
    ///
    /// See [`Self::list_all`].
    pub async fn list_coupons(&self) -> Result<Vec<Coupon>, ClientError> {
        self.list_all(Resource::Coupons, self.page_size).await
    }

    /// All catalog products, reduced to id and name.
    ///
    /// # Errors
    ///
    /// See [`Self::list_all`].
    pub async fn list_products(&self) -> Result<Vec<CatalogItem>, ClientError> {
        self.list_all(Resource::Products, self.page_size).await
    }

    /// All catalog categories, reduced to id and name.
    ///
    /// # Errors
    ///
    /// See [`Self::list_all`].
    pub async fn list_categories(&self) -> Result<Vec<CatalogItem>, ClientError> {
        self.list_all(Resource::Categories, self.page_size).await
    }
}
