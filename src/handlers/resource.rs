//! Generic CRUD handlers for one model: list, create, read, update, delete.

use crate::error::AppError;
use crate::extractors::RequestContext;
use crate::filter::{parse_query_params, FindBy};
use crate::model::{identifier, new_id, FieldKind, Model};
use crate::pagination::Pagination;
use crate::response::{
    new_model_collection_response, new_model_single_response, CollectionMetadata, CollectionResponse,
    SingleResponse,
};
use crate::state::ResourceState;
use crate::validation::{validate_model, ValidationError};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::Value;

fn id_wire_name<M: Model>() -> &'static str {
    M::fields()
        .iter()
        .find(|f| f.column == M::ID_COLUMN)
        .map(|f| f.wire)
        .unwrap_or(M::ID_COLUMN)
}

fn not_found(resource_type: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} '{}' not found", resource_type, id))
}

/// The `:id` path parameter of an item route.
fn path_id(ctx: &RequestContext) -> Result<String, AppError> {
    ctx.path_params
        .get("id")
        .cloned()
        .ok_or_else(|| AppError::BadRequest("id: Cannot be blank.".into()))
}

/// Load by path id. Ids that cannot be valid for a uuid column are reported as not found.
async fn load<M: Model>(state: &ResourceState<M>, id: &str) -> Result<M, AppError> {
    let uuid_id = M::fields()
        .iter()
        .any(|f| f.column == M::ID_COLUMN && f.kind == FieldKind::Uuid);
    if uuid_id && uuid::Uuid::parse_str(id).is_err() {
        return Err(not_found(&state.resource_type, id));
    }
    state
        .repository
        .find(id)
        .await?
        .ok_or_else(|| not_found(&state.resource_type, id))
}

fn single<M: Model>(
    state: &ResourceState<M>,
    model: M,
    ctx: &RequestContext,
) -> Result<SingleResponse<M>, AppError> {
    Ok(new_model_single_response(
        model,
        &state.route_names,
        &state.resource_type,
        state.routes.clone(),
        ctx,
    )?
    .into_response_logged())
}

pub async fn list<M: Model>(
    State(state): State<ResourceState<M>>,
    pagination: Pagination,
    ctx: RequestContext,
) -> Result<Json<CollectionResponse<M>>, AppError> {
    let mut find_by = FindBy::new();
    parse_query_params::<M>(ctx.path_and_query(), &mut find_by, state.validator.as_ref())?;

    let count = state.repository.count(&find_by).await?.max(0) as u64;
    let metadata = CollectionMetadata::new(count, &pagination, &find_by)?;
    let rows = state.repository.find_by(&find_by.paginate(&pagination)).await?;

    let mut collection = new_model_collection_response::<M>(
        metadata,
        &state.route_names,
        &state.collection_type,
        state.routes.clone(),
        &ctx,
    )?
    .into_response_logged();
    for row in rows {
        collection.add_item(single(&state, row, &ctx)?);
    }
    Ok(Json(collection))
}

pub async fn read<M: Model>(
    State(state): State<ResourceState<M>>,
    ctx: RequestContext,
) -> Result<Json<SingleResponse<M>>, AppError> {
    let id = path_id(&ctx)?;
    let model = load(&state, &id).await?;
    Ok(Json(single(&state, model, &ctx)?))
}

/// Decode the body, assign a fresh id, validate and insert. Responds 201.
pub async fn create<M: Model>(
    State(state): State<ResourceState<M>>,
    ctx: RequestContext,
    body: Bytes,
) -> Result<(StatusCode, Json<SingleResponse<M>>), AppError> {
    let mut values = state.create_decoder.checked_values(&body)?;
    values.insert(id_wire_name::<M>().to_string(), Value::String(new_id()));
    let model: M = serde_json::from_value(Value::Object(values)).map_err(ValidationError::from)?;
    validate_model(state.validator.as_ref(), &model)?;
    state.repository.create(&model).await?;
    Ok((StatusCode::CREATED, Json(single(&state, model, &ctx)?)))
}

/// Apply the keys present in the body to the stored model and save it.
pub async fn update<M: Model>(
    State(state): State<ResourceState<M>>,
    ctx: RequestContext,
    body: Bytes,
) -> Result<Json<SingleResponse<M>>, AppError> {
    let id = path_id(&ctx)?;
    let mut model = load(&state, &id).await?;
    state.update_decoder.decode_into(&body, &mut model)?;
    if identifier(&model).as_deref() != Some(id.as_str()) {
        return Err(AppError::BadRequest(format!(
            "{}: This property is not allowed to be set.",
            id_wire_name::<M>()
        )));
    }
    validate_model(state.validator.as_ref(), &model)?;
    state.repository.update(&model).await?;
    Ok(Json(single(&state, model, &ctx)?))
}

pub async fn delete<M: Model>(
    State(state): State<ResourceState<M>>,
    ctx: RequestContext,
) -> Result<StatusCode, AppError> {
    let id = path_id(&ctx)?;
    let model = load(&state, &id).await?;
    state.repository.delete(&model).await?;
    Ok(StatusCode::NO_CONTENT)
}
