use std::sync::Arc;

use crate::dto::organisation_dto::OrganisationRouteResponse;
use crate::dto::ApiResponse;
use crate::models::organisation::{CreateOrganisationRequest, Organisation};
use crate::models::organisation_route::AssignRouteRequest;
use crate::repositories::organisation_repository::OrganisationRepository;
use crate::repositories::RouteRepository;
use crate::utils::errors::{not_found_error, AppResult};
use sqlx::PgPool;
use validator::Validate;

pub struct OrganisationController {
    repository: OrganisationRepository,
    routes: Arc<dyn RouteRepository>,
}

impl OrganisationController {
    pub fn new(pool: PgPool, routes: Arc<dyn RouteRepository>) -> Self {
        Self {
            repository: OrganisationRepository::new(pool),
            routes,
        }
    }

    pub async fn create(&self, request: CreateOrganisationRequest) -> AppResult<ApiResponse<Organisation>> {
        request.validate()?;
        let organisation = self.repository.create(&request).await?;
        Ok(ApiResponse::success_with_message(organisation, "Organisation created"))
    }

    pub async fn get(&self, id: i32) -> AppResult<Organisation> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Organisation", id))
    }

    pub async fn list(&self) -> AppResult<Vec<Organisation>> {
        self.repository.find_all().await
    }

    pub async fn assign_route(
        &self,
        organisation_id: i32,
        request: AssignRouteRequest,
    ) -> AppResult<ApiResponse<OrganisationRouteResponse>> {
        request.validate()?;
        self.get(organisation_id).await?;

        let route = self
            .routes
            .find_by_id(request.route_id)
            .await?
            .ok_or_else(|| not_found_error("Route", request.route_id))?;

        let assignment = self.repository.assign_route(organisation_id, &request).await?;
        Ok(ApiResponse::success_with_message(
            OrganisationRouteResponse::new(assignment, Some(&route)),
            "Route assigned",
        ))
    }

    pub async fn list_routes(&self, organisation_id: i32) -> AppResult<Vec<OrganisationRouteResponse>> {
        let assignments = self.repository.find_routes(organisation_id).await?;

        let mut responses = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let route = self.routes.find_by_id(assignment.route_id).await?;
            responses.push(OrganisationRouteResponse::new(assignment, route.as_ref()));
        }
        Ok(responses)
    }
}
