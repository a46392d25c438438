//! Email discovery: by person name and domain, by domain, by company.

use crate::client::Client;
use crate::core::error::{Error, Result};
use crate::core::models::{CompanySearch, DomainSearch, FoundEmail};
use crate::core::options::{require_finder_limit, require_non_empty, DEFAULT_FINDER_LIMIT};
use serde::Serialize;
use serde_json::Value;

const FINDER_TARGET: &str = "emaillistchecker::finder";

#[derive(Serialize)]
struct FindEmailRequest<'a> {
    first_name: &'a str,
    last_name: &'a str,
    domain: &'a str,
}

#[derive(Serialize)]
struct DomainRequest<'a> {
    domain: &'a str,
    limit: u32,
    offset: u32,
}

#[derive(Serialize)]
struct CompanyRequest<'a> {
    company: &'a str,
    limit: u32,
}

impl Client {
    /// Guesses the most likely address of a person at a domain.
    ///
    /// Returns `Ok(None)` when the server finds no candidate, either with a
    /// 404 or with an empty result.
    ///
    /// The API answers "no candidate" with a plain 404, so a 404 caused by a
    /// wrong `base_url` also reads as `None` here. Check the base URL with a
    /// call that cannot 404, such as [`Client::get_credits`], when `None`
    /// comes back for every lookup.
    pub async fn find_email(
        &self,
        first_name: &str,
        last_name: &str,
        domain: &str,
    ) -> Result<Option<FoundEmail>> {
        require_non_empty("first_name", first_name)?;
        require_non_empty("last_name", last_name)?;
        require_non_empty("domain", domain)?;

        let request = FindEmailRequest {
            first_name,
            last_name,
            domain,
        };
        let found: Value = match self.post_json(&["finder", "email"], &request).await {
            Ok(value) => value,
            Err(Error::NotFound { message }) => {
                tracing::debug!(
                    target: FINDER_TARGET,
                    "No address for {} {} at {}: {}",
                    first_name,
                    last_name,
                    domain,
                    message
                );
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if found.is_null() {
            return Ok(None);
        }
        let found: FoundEmail = serde_json::from_value(found)?;
        Ok((!found.email.trim().is_empty()).then_some(found))
    }

    /// Lists addresses known for a domain, first page of `limit` (1 to 100).
    pub async fn find_by_domain(&self, domain: &str, limit: u32) -> Result<DomainSearch> {
        self.find_by_domain_page(domain, limit, 0).await
    }

    /// Lists addresses known for a domain, starting at `offset`.
    pub async fn find_by_domain_page(
        &self,
        domain: &str,
        limit: u32,
        offset: u32,
    ) -> Result<DomainSearch> {
        require_non_empty("domain", domain)?;
        require_finder_limit(limit)?;

        let request = DomainRequest {
            domain,
            limit,
            offset,
        };
        let search: DomainSearch = self.post_json(&["finder", "domain"], &request).await?;
        tracing::debug!(
            target: FINDER_TARGET,
            "Domain {} page at offset {}: {} of {} addresses",
            domain,
            offset,
            search.emails.len(),
            search.total_found
        );
        Ok(search)
    }

    /// Looks up candidate domains and addresses for a company name.
    pub async fn find_by_company(&self, company: &str) -> Result<CompanySearch> {
        self.find_by_company_with_limit(company, DEFAULT_FINDER_LIMIT)
            .await
    }

    pub async fn find_by_company_with_limit(
        &self,
        company: &str,
        limit: u32,
    ) -> Result<CompanySearch> {
        require_non_empty("company", company)?;
        require_finder_limit(limit)?;
        let request = CompanyRequest { company, limit };
        self.post_json(&["finder", "company"], &request).await
    }
}
