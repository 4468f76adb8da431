use crate::adapters::http::error::ApiError;
use crate::adapters::http::schemas::{
    CreatePetRequest, DeletePetsRequest, DeletePetsResponse, ListPetsQuery, PetListResponse,
    PetResponse, UpdatePetRequest,
};
use crate::core::service::PetService;
use axum::extract::{FromRequest, FromRequestParts, State};
use axum::Json;

pub const HEALTH_OK: &str = "Health - OK";

/// JSON body extractor whose failures render as 422.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

pub async fn list_pets(
    State(service): State<PetService>,
    ApiQuery(query): ApiQuery<ListPetsQuery>,
) -> Result<Json<PetListResponse>, ApiError> {
    let page = service.list_pets(query.limit).await?;
    Ok(Json(page.into()))
}

pub async fn create_pet(
    State(service): State<PetService>,
    ApiJson(request): ApiJson<CreatePetRequest>,
) -> Result<Json<PetResponse>, ApiError> {
    let pet = service.create_pet(request.into_draft()).await?;
    Ok(Json(pet.into()))
}

pub async fn update_pet(
    State(service): State<PetService>,
    ApiJson(request): ApiJson<UpdatePetRequest>,
) -> Result<Json<PetResponse>, ApiError> {
    let pet = service.update_pet(request.into_patch()).await?;
    Ok(Json(pet.into()))
}

pub async fn delete_pets(
    State(service): State<PetService>,
    ApiJson(request): ApiJson<DeletePetsRequest>,
) -> Result<Json<DeletePetsResponse>, ApiError> {
    let outcome = service.delete_many_pets(&request.into_ids()).await?;
    Ok(Json(outcome.into()))
}

pub async fn healthcheck() -> Json<&'static str> {
    Json(HEALTH_OK)
}
