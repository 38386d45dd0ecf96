// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Typed calls on top of the management and catalog clients.

use polctl_protocol::{
    Catalog, CatalogList, CatalogRole, CatalogRoleList, CreateCatalogRequest,
    CreatePrincipalRequest, CreatePrincipalRoleRequest, NamespaceList, Principal, PrincipalList,
    PrincipalRole, PrincipalRoleList, PrincipalWithCredentials,
};
use serde::de::IgnoredAny;
use urlencoding::encode;

use crate::api_client::{ApiClient, RestClient};
use crate::error::ApiError;

/// Polaris management API (`/api/management/v1`).
#[derive(Clone)]
pub struct ManagementApi {
    client: RestClient,
}

impl ManagementApi {
    pub fn new(api: &ApiClient) -> Self {
        Self {
            client: api.management(),
        }
    }

    pub async fn list_catalogs(&self) -> Result<Vec<Catalog>, ApiError> {
        let list: CatalogList = self.client.get("/catalogs").await?;
        Ok(list.catalogs)
    }

    pub async fn get_catalog(&self, name: &str) -> Result<Catalog, ApiError> {
        self.client.get(&format!("/catalogs/{}", encode(name))).await
    }

    pub async fn create_catalog(&self, catalog: Catalog) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .client
            .post("/catalogs", &CreateCatalogRequest { catalog })
            .await?;
        Ok(())
    }

    pub async fn delete_catalog(&self, name: &str) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .client
            .delete(&format!("/catalogs/{}", encode(name)))
            .await?;
        Ok(())
    }

    pub async fn list_principals(&self) -> Result<Vec<Principal>, ApiError> {
        let list: PrincipalList = self.client.get("/principals").await?;
        Ok(list.principals)
    }

    /// The returned secret is only ever shown once by the server.
    pub async fn create_principal(
        &self,
        principal: Principal,
    ) -> Result<PrincipalWithCredentials, ApiError> {
        let request = CreatePrincipalRequest {
            principal,
            credential_rotation_required: None,
        };
        self.client.post("/principals", &request).await
    }

    pub async fn delete_principal(&self, name: &str) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .client
            .delete(&format!("/principals/{}", encode(name)))
            .await?;
        Ok(())
    }

    pub async fn list_principal_roles(&self) -> Result<Vec<PrincipalRole>, ApiError> {
        let list: PrincipalRoleList = self.client.get("/principal-roles").await?;
        Ok(list.roles)
    }

    pub async fn create_principal_role(&self, role: PrincipalRole) -> Result<(), ApiError> {
        let request = CreatePrincipalRoleRequest {
            principal_role: role,
        };
        let _: IgnoredAny = self.client.post("/principal-roles", &request).await?;
        Ok(())
    }

    pub async fn delete_principal_role(&self, name: &str) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .client
            .delete(&format!("/principal-roles/{}", encode(name)))
            .await?;
        Ok(())
    }

    pub async fn list_catalog_roles(&self, catalog: &str) -> Result<Vec<CatalogRole>, ApiError> {
        let list: CatalogRoleList = self
            .client
            .get(&format!("/catalogs/{}/catalog-roles", encode(catalog)))
            .await?;
        Ok(list.roles)
    }
}

/// Iceberg REST catalog API (`/api/catalog/v1`), prefixed by catalog name.
#[derive(Clone)]
pub struct CatalogApi {
    client: RestClient,
}

impl CatalogApi {
    pub fn new(api: &ApiClient) -> Self {
        Self {
            client: api.catalog(),
        }
    }

    /// Top-level namespaces of `catalog`, or the children of `parent`.
    pub async fn list_namespaces(
        &self,
        catalog: &str,
        parent: Option<&[String]>,
    ) -> Result<Vec<Vec<String>>, ApiError> {
        let mut path = format!("/{}/namespaces", encode(catalog));
        if let Some(levels) = parent.filter(|levels| !levels.is_empty()) {
            // multi-level namespaces are joined with the unit separator
            path.push_str("?parent=");
            path.push_str(&encode(&levels.join("\u{1f}")));
        }
        let list: NamespaceList = self.client.get(&path).await?;
        Ok(list.namespaces)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::ConsoleContext;
    use crate::navigation::NoopNavigator;
    use crate::test_support::{json_response, workspace};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, ApiClient) {
        let server = MockServer::start().await;
        let ctx = ConsoleContext::in_memory();
        ctx.active().set(&workspace("W1", &server.uri())).unwrap();
        ctx.credentials().set_token("tok", "W1").unwrap();
        let api = ApiClient::new(ctx, reqwest::Client::new(), Arc::new(NoopNavigator));
        (server, api)
    }

    #[tokio::test]
    async fn test_list_catalogs() {
        let (server, api) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/management/v1/catalogs"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(json_response(
                200,
                r#"{"catalogs":[{"type":"INTERNAL","name":"quickstart","properties":{}}]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let catalogs = ManagementApi::new(&api).list_catalogs().await.unwrap();
        assert_eq!(catalogs.len(), 1);
        assert_eq!(catalogs[0].name, "quickstart");
    }

    #[tokio::test]
    async fn test_names_are_percent_encoded() {
        let (server, api) = setup().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        ManagementApi::new(&api)
            .delete_principal_role("data eng/ops")
            .await
            .unwrap();
        let requests = server.received_requests().await.unwrap();
        assert_eq!(
            requests[0].url.path(),
            "/api/management/v1/principal-roles/data%20eng%2Fops"
        );
    }

    #[tokio::test]
    async fn test_create_principal_returns_credentials() {
        let (server, api) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/management/v1/principals"))
            .respond_with(json_response(
                201,
                r#"{"principal":{"name":"svc","clientId":"abc"},"credentials":{"clientId":"abc","clientSecret":"xyz"}}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let created = ManagementApi::new(&api)
            .create_principal(Principal::named("svc"))
            .await
            .unwrap();
        assert_eq!(created.credentials.client_id, "abc");

        let requests = server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent["principal"]["name"], "svc");
    }

    #[tokio::test]
    async fn test_create_catalog_ignores_response_body() {
        let (server, api) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/management/v1/catalogs"))
            .respond_with(json_response(
                201,
                r#"{"type":"INTERNAL","name":"c1","properties":{}}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let catalog: Catalog =
            serde_json::from_str(r#"{"type":"INTERNAL","name":"c1","properties":{}}"#).unwrap();
        ManagementApi::new(&api).create_catalog(catalog).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_catalog_roles() {
        let (server, api) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/management/v1/catalogs/c1/catalog-roles"))
            .respond_with(json_response(200, r#"{"roles":[{"name":"catalog_admin"}]}"#))
            .expect(1)
            .mount(&server)
            .await;

        let roles = ManagementApi::new(&api).list_catalog_roles("c1").await.unwrap();
        assert_eq!(roles[0].name, "catalog_admin");
    }

    #[tokio::test]
    async fn test_list_namespaces() {
        let (server, api) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/catalog/v1/c1/namespaces"))
            .respond_with(json_response(200, r#"{"namespaces":[["db","raw"]]}"#))
            .expect(2)
            .mount(&server)
            .await;
        let catalog = CatalogApi::new(&api);

        let namespaces = catalog.list_namespaces("c1", None).await.unwrap();
        assert_eq!(namespaces, vec![vec!["db".to_string(), "raw".to_string()]]);

        let parent = vec!["db".to_string()];
        catalog.list_namespaces("c1", Some(parent.as_slice())).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].url.query().is_none());
        let parents: Vec<_> = requests[1].url.query_pairs().collect();
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].0, "parent");
        assert_eq!(parents[0].1, "db");
    }
}
