//! Content service: the access-scoped query pipeline.
//!
//! Composes the store, the injected authorization policy, and the
//! serializers so route handlers stay thin. Every lookup distinguishes
//! "not found" from "found but not authorized".

use std::collections::HashMap;
use std::sync::Arc;

use crate::content::definitions::ElementDefinitionRegistry;
use crate::content::scope::{ElementFilters, PageFilters};
use crate::content::serializer::{ElementJson, serialize_element};
use crate::content::tree::{ElementArena, PageTreeJson, TreeDepth, serialize_page_tree};
use crate::error::{AppError, AppResult};
use crate::models::{Content, Element, Page};
use crate::permissions::{AccessAction, AccessPolicy, AccessResource, UserContext};
use crate::store::ContentStore;

/// Read-only content query service.
#[derive(Clone)]
pub struct ContentService {
    inner: Arc<ContentServiceInner>,
}

struct ContentServiceInner {
    store: Arc<dyn ContentStore>,
    definitions: Arc<ElementDefinitionRegistry>,
    policy: Arc<dyn AccessPolicy>,
    default_language: String,
}

impl ContentService {
    /// Create a new content service.
    pub fn new(
        store: Arc<dyn ContentStore>,
        definitions: Arc<ElementDefinitionRegistry>,
        policy: Arc<dyn AccessPolicy>,
        default_language: String,
    ) -> Self {
        Self {
            inner: Arc::new(ContentServiceInner {
                store,
                definitions,
                policy,
                default_language,
            }),
        }
    }

    /// List authorized, not-nested elements matching the filters.
    pub async fn list_elements(
        &self,
        filters: &ElementFilters,
        user: &UserContext,
    ) -> AppResult<Vec<ElementJson>> {
        let elements = self.inner.store.list_elements(filters).await?;

        let visible: Vec<Element> = elements
            .into_iter()
            .filter(|e| {
                self.inner
                    .policy
                    .allows(user, AccessAction::Index, AccessResource::Element(e))
            })
            .collect();

        let grouped = self.load_contents(&visible).await?;

        Ok(visible
            .iter()
            .map(|e| serialize_element(e, grouped.get(&e.id).map_or(&[], Vec::as_slice)))
            .collect())
    }

    /// Fetch one element; `NotFound` if absent, `Forbidden` if present but
    /// rejected by the policy.
    pub async fn show_element(&self, id: i64, user: &UserContext) -> AppResult<ElementJson> {
        let Some(element) = self.inner.store.find_element(id).await? else {
            return Err(AppError::NotFound);
        };

        if !self
            .inner
            .policy
            .allows(user, AccessAction::Show, AccessResource::Element(&element))
        {
            return Err(AppError::Forbidden);
        }

        let contents = self.inner.store.contents_for_elements(&[id]).await?;
        Ok(serialize_element(&element, &contents))
    }

    /// List authorized pages matching the filters (own fields only).
    pub async fn list_pages(&self, filters: &PageFilters, user: &UserContext) -> AppResult<Vec<Page>> {
        let pages = self.inner.store.list_pages(filters).await?;

        Ok(pages
            .into_iter()
            .filter(|p| {
                self.inner
                    .policy
                    .allows(user, AccessAction::Index, AccessResource::Page(p))
            })
            .collect())
    }

    /// Resolve one page by numeric id, falling back to a
    /// `(urlname, locale)` pair for non-numeric identifiers.
    pub async fn show_page(
        &self,
        ident: &str,
        locale: Option<&str>,
        user: &UserContext,
    ) -> AppResult<Page> {
        let page = match ident.parse::<i64>() {
            Ok(id) => self.inner.store.find_page(id).await?,
            Err(_) => {
                let language_code = locale.unwrap_or(&self.inner.default_language);
                self.inner
                    .store
                    .find_page_by_urlname(ident, language_code)
                    .await?
            }
        };

        let Some(page) = page else {
            return Err(AppError::NotFound);
        };

        if !self
            .inner
            .policy
            .allows(user, AccessAction::Show, AccessResource::Page(&page))
        {
            return Err(AppError::Forbidden);
        }

        Ok(page)
    }

    /// Serialize a page's full element tree.
    ///
    /// With no `page_id` the current root page of the default language is
    /// used. `expand` restricts which element names appear at the first
    /// level; `depth` selects shallow vs full traversal.
    pub async fn page_tree(
        &self,
        page_id: Option<i64>,
        depth: TreeDepth,
        expand: Option<&[String]>,
        user: &UserContext,
    ) -> AppResult<PageTreeJson> {
        let page = match page_id {
            Some(id) => self.inner.store.find_page(id).await?,
            None => {
                self.inner
                    .store
                    .language_root(&self.inner.default_language)
                    .await?
            }
        };

        let Some(page) = page else {
            return Err(AppError::NotFound);
        };

        if !self
            .inner
            .policy
            .allows(user, AccessAction::Show, AccessResource::Page(&page))
        {
            return Err(AppError::Forbidden);
        }

        let elements = self.inner.store.elements_for_page(page.id).await?;
        let ids: Vec<i64> = elements.iter().map(|e| e.id).collect();
        let contents = self.inner.store.contents_for_elements(&ids).await?;
        let arena = ElementArena::build(elements, contents);

        serialize_page_tree(
            &page,
            &arena,
            &self.inner.definitions,
            self.inner.policy.as_ref(),
            user,
            depth,
            expand,
        )
        .map_err(|e| AppError::StructuralIntegrity(e.to_string()))
    }

    /// Group contents by owning element, preserving position order.
    async fn load_contents(&self, elements: &[Element]) -> AppResult<HashMap<i64, Vec<Content>>> {
        let ids: Vec<i64> = elements.iter().map(|e| e.id).collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let contents = self.inner.store.contents_for_elements(&ids).await?;

        let mut grouped: HashMap<i64, Vec<Content>> = HashMap::new();
        for content in contents {
            grouped.entry(content.element_id).or_default().push(content);
        }
        for list in grouped.values_mut() {
            list.sort_by_key(|c| c.position);
        }

        Ok(grouped)
    }
}
