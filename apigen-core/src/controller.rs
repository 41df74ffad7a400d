//! Generic CRUD controller
//!
//! Implementors supply a repository and a transformer; every action has a
//! default implementation:
//!
//! | action    | route                  | success |
//! |-----------|------------------------|---------|
//! | `index`   | `GET /res`             | 200     |
//! | `store`   | `POST /res`            | 201     |
//! | `show`    | `GET /res/{id}`        | 200     |
//! | `update`  | `PUT\|PATCH /res/{id}` | 200     |
//! | `destroy` | `DELETE /res/{id}`     | 200     |
//! | `create`  | `GET /res/create`      | 501     |
//! | `edit`    | `GET /res/{id}/edit`   | 501     |

use std::sync::Arc;

use async_trait::async_trait;
use heck::ToLowerCamelCase;
use hyper::StatusCode;

use crate::http::{ApiError, ApiRequest, ApiResponse, ApiResult};
use crate::repository::{Record, Repository, RepositoryResult};
use crate::serializer::Manager;
use crate::transformer::{prepare_root_scope, Resource, Transformer};
use crate::validation::{validate, Rules};

/// Query parameter listing relations to embed
pub const INCLUDE_PARAM: &str = "include";
/// Query parameter naming the field used instead of the primary key
pub const USE_AS_ID_PARAM: &str = "use_as_id";

pub const VALIDATION_FAILED: &str = "Validation failed";
pub const EMPTY_DATA: &str = "Empty data";
pub const DELETED: &str = "Deleted";

#[async_trait]
pub trait ApiController: Send + Sync + 'static {
    type Model: Record;
    type Repository: Repository<Record = Self::Model>;
    type Transformer: Transformer<Item = Self::Model>;

    fn repository(&self) -> &Self::Repository;

    fn transformer(&self) -> Arc<Self::Transformer>;

    /// Rules applied to `data` on store
    fn rules_for_create(&self) -> Rules {
        Rules::new()
    }

    /// Rules applied to `data` on update of the record with primary key `id`
    fn rules_for_update(&self, id: &str) -> Rules {
        let _ = id;
        Rules::new()
    }

    /// Skip fillable filtering on mass assignment
    fn unguard(&self) -> bool {
        false
    }

    async fn index(&self, req: &ApiRequest) -> ApiResult {
        let with = eager_load(req);
        let items = self.repository().all(&with).await?;
        Ok(respond_with(req, Resource::collection(items, self.transformer()), StatusCode::OK))
    }

    async fn store(&self, req: &ApiRequest) -> ApiResult {
        let data = req.data().cloned().unwrap_or_default();

        let outcome = validate(&data, &self.rules_for_create());
        if outcome.fails() {
            log::debug!("Store rejected: {:?}", outcome.errors());
            return Err(ApiError::WrongArgs(VALIDATION_FAILED.to_string()));
        }

        let item = self.repository().create(data, self.unguard()).await?;
        Ok(respond_with(req, Resource::item(item, self.transformer()), StatusCode::CREATED))
    }

    async fn show(&self, id: &str, req: &ApiRequest) -> ApiResult {
        let with = eager_load(req);
        let item =
            find_item(self.repository(), id, req, &with).await?.ok_or_else(ApiError::not_found)?;
        Ok(respond_with(req, Resource::item(item, self.transformer()), StatusCode::OK))
    }

    async fn update(&self, id: &str, req: &ApiRequest) -> ApiResult {
        let data = match req.data() {
            Some(data) if !data.is_empty() => data.clone(),
            _ => return Err(ApiError::WrongArgs(EMPTY_DATA.to_string())),
        };

        let item =
            find_item(self.repository(), id, req, &[]).await?.ok_or_else(ApiError::not_found)?;

        let outcome = validate(&data, &self.rules_for_update(&item.id()));
        if outcome.fails() {
            log::debug!("Update of {} rejected: {:?}", item.id(), outcome.errors());
            return Err(ApiError::WrongArgs(VALIDATION_FAILED.to_string()));
        }

        let item = self.repository().update(item, data, self.unguard()).await?;
        Ok(respond_with(req, Resource::item(item, self.transformer()), StatusCode::OK))
    }

    async fn destroy(&self, id: &str, req: &ApiRequest) -> ApiResult {
        let item =
            find_item(self.repository(), id, req, &[]).await?.ok_or_else(ApiError::not_found)?;
        self.repository().delete(item).await?;
        Ok(ApiResponse::message(DELETED))
    }

    /// HTML form for a new record; JSON APIs have none
    async fn create(&self, _req: &ApiRequest) -> ApiResult {
        Err(ApiError::not_implemented())
    }

    /// HTML form for an existing record; JSON APIs have none
    async fn edit(&self, _id: &str, _req: &ApiRequest) -> ApiResult {
        Err(ApiError::not_implemented())
    }
}

/// Relations named by `?include=`, each dotted segment lowerCamelCased.
///
/// `include=profile_owner, tags` gives `["profileOwner", "tags"]`.
pub fn eager_load(req: &ApiRequest) -> Vec<String> {
    let Some(include) = req.query(INCLUDE_PARAM) else {
        return Vec::new();
    };

    include
        .split(',')
        .map(|relation| {
            relation
                .split('.')
                .map(|segment| segment.trim().to_lower_camel_case())
                .filter(|segment| !segment.is_empty())
                .collect::<Vec<_>>()
                .join(".")
        })
        .filter(|relation| !relation.is_empty())
        .collect()
}

/// Look a record up by primary key, or by the field named in `?use_as_id=`
pub async fn find_item<R: Repository>(
    repository: &R,
    id: &str,
    req: &ApiRequest,
    with: &[String],
) -> RepositoryResult<Option<R::Record>> {
    match req.query(USE_AS_ID_PARAM).filter(|field| !field.is_empty()) {
        Some(field) => repository.find_by(field, id, with).await,
        None => repository.find(id, with).await,
    }
}

/// Serialize `resource` with the request's includes and root meta.
///
/// Includes go through the same lowerCamelCase conversion as [`eager_load`].
pub fn respond_with(req: &ApiRequest, mut resource: Resource, status: StatusCode) -> ApiResponse {
    let mut manager = Manager::new();
    let includes = eager_load(req);
    if !includes.is_empty() {
        manager.parse_includes(&includes.join(","));
    }

    prepare_root_scope(&mut resource);
    ApiResponse::new(status, manager.create_data(resource).to_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Method;

    fn request(include: Option<&str>) -> ApiRequest {
        let req = ApiRequest::new(Method::GET, "/api/payers");
        match include {
            Some(include) => req.with_query(INCLUDE_PARAM, include),
            None => req,
        }
    }

    #[test]
    fn eager_load_without_parameter_is_empty() {
        assert!(eager_load(&request(None)).is_empty());
        assert!(eager_load(&request(Some(""))).is_empty());
    }

    #[test]
    fn eager_load_camel_cases_each_segment() {
        assert_eq!(eager_load(&request(Some("profileOwner,tags"))), vec!["profileOwner", "tags"]);
        assert_eq!(eager_load(&request(Some("profile_owner"))), vec!["profileOwner"]);
        assert_eq!(
            eager_load(&request(Some(" owner.home_address , ,tags"))),
            vec!["owner.homeAddress", "tags"]
        );
    }
}
