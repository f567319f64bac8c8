//! Site JSON endpoints.
//!
//! Each request builds its own list controller or search aggregator, so hospital names are cached
//! for the duration of one listing request and never shared between visitors.

use crate::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use medtour_core::{
    CatalogApi, DropdownOptions, EntitySearchAggregator, FilterSelection, FilteredListController,
    ListOptions, ListResult, ListStatus, ListedEntity, Load, ResolveReport, SearchOutcome,
};
use medtour_types::{Doctor, Listing, SearchBuckets, Treatment};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

type HandlerError = (StatusCode, &'static str);

const BACKEND_UNAVAILABLE: HandlerError = (StatusCode::BAD_GATEWAY, "Catalogue backend unavailable");

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        doctors,
        treatments,
        search,
        doctor_filters,
        treatment_filters,
    ),
    components(schemas(HealthRes, DoctorListRes, TreatmentListRes, SearchRes, FiltersRes))
)]
pub struct ApiDoc;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DoctorFilterParams {
    /// Location as shown in the dropdown or typed by the user; any spelling of a city works.
    pub location: Option<String>,
    pub specialization: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TreatmentFilterParams {
    pub location: Option<String>,
    pub treatment_type: Option<String>,
    /// List Ayushman-scheme treatments only.
    #[serde(default)]
    pub ayushman: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free-text query; fewer than three characters returns an idle response.
    #[serde(default)]
    pub q: String,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DoctorListRes {
    #[schema(value_type = Vec<Object>)]
    pub doctors: Vec<Listing<Doctor>>,
    #[schema(value_type = String, example = "populated")]
    pub status: ListStatus,
    #[schema(value_type = Object)]
    pub options: ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub hospitals: Option<ResolveReport>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TreatmentListRes {
    #[schema(value_type = Vec<Object>)]
    pub treatments: Vec<Listing<Treatment>>,
    #[schema(value_type = String, example = "empty")]
    pub status: ListStatus,
    #[schema(value_type = Object)]
    pub options: ListOptions,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchRes {
    /// `idle` when the query was too short to send, otherwise `ready`.
    pub state: String,
    pub query: String,
    pub total_results: u64,
    #[schema(value_type = Object)]
    pub results: SearchBuckets,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FiltersRes {
    pub locations: Vec<String>,
    pub categories: Vec<String>,
    /// True when a list came from the built-in defaults because the backend failed.
    pub fallback: bool,
}

impl From<DropdownOptions> for FiltersRes {
    fn from(options: DropdownOptions) -> Self {
        Self {
            locations: options.locations,
            categories: options.categories,
            fallback: options.fallback,
        }
    }
}

/// Load a listing, refreshing the dropdown options first when the selection filters anything.
async fn load_listing<C, T>(
    controller: &FilteredListController<C, T>,
    selection: FilterSelection,
) -> Result<ListResult<T>, HandlerError>
where
    C: CatalogApi,
    T: ListedEntity,
{
    if !selection.is_empty() {
        if let Err(e) = controller.refresh_options().await {
            tracing::warn!("Option refresh failed: {}", e);
        }
    }

    match controller.load(selection).await {
        Load::Current(result) if result.status == ListStatus::Unavailable => {
            tracing::error!("Listing {:?} failed: backend unavailable", controller.kind());
            Err(BACKEND_UNAVAILABLE)
        }
        Load::Current(result) => Ok(result),
        Load::Superseded => Err((StatusCode::CONFLICT, "Listing superseded")),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint used by load balancers.
#[axum::debug_handler]
pub(crate) async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Medtour site is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/site/doctors",
    params(DoctorFilterParams),
    responses(
        (status = 200, description = "Doctors sorted by rating with hospital names", body = DoctorListRes),
        (status = 502, description = "Catalogue backend unavailable")
    )
)]
/// Doctors for the listing page.
///
/// The location is filtered by the backend, the specialization locally. Hospital names are
/// resolved before the response is sent.
///
/// # Errors
/// Returns `502 Bad Gateway` if the doctor list cannot be fetched.
#[axum::debug_handler]
pub(crate) async fn doctors(
    State(state): State<AppState>,
    Query(params): Query<DoctorFilterParams>,
) -> Result<Json<DoctorListRes>, HandlerError> {
    let controller = FilteredListController::doctors(state.client.clone(), &state.cfg);
    let selection = FilterSelection::new(
        params.location.as_deref(),
        params.specialization.as_deref(),
    );
    let result = load_listing(&controller, selection).await?;

    Ok(Json(DoctorListRes {
        doctors: result.items,
        status: result.status,
        options: controller.options(),
        hospitals: result.hospitals,
    }))
}

#[utoipa::path(
    get,
    path = "/api/site/treatments",
    params(TreatmentFilterParams),
    responses(
        (status = 200, description = "Treatments sorted by rating", body = TreatmentListRes),
        (status = 502, description = "Catalogue backend unavailable")
    )
)]
/// Treatments for the listing page, or Ayushman-scheme treatments when `ayushman=true`.
///
/// # Errors
/// Returns `502 Bad Gateway` if the treatment list cannot be fetched.
#[axum::debug_handler]
pub(crate) async fn treatments(
    State(state): State<AppState>,
    Query(params): Query<TreatmentFilterParams>,
) -> Result<Json<TreatmentListRes>, HandlerError> {
    let controller = if params.ayushman {
        FilteredListController::ayushman_treatments(state.client.clone(), &state.cfg)
    } else {
        FilteredListController::treatments(state.client.clone(), &state.cfg)
    };
    let selection = FilterSelection::new(
        params.location.as_deref(),
        params.treatment_type.as_deref(),
    );
    let result = load_listing(&controller, selection).await?;

    Ok(Json(TreatmentListRes {
        treatments: result.items,
        status: result.status,
        options: controller.options(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/site/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Grouped search results", body = SearchRes),
        (status = 502, description = "Catalogue backend unavailable")
    )
)]
/// Combined doctor, treatment and hospital search.
///
/// # Errors
/// Returns `502 Bad Gateway` if the backend search fails.
#[axum::debug_handler]
pub(crate) async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchRes>, HandlerError> {
    let aggregator = EntitySearchAggregator::new(state.client.clone(), &state.cfg);
    let limit = params.limit.unwrap_or(state.cfg.search_limit());

    match aggregator.search(&params.q, limit).await {
        SearchOutcome::Applied(results) => Ok(Json(SearchRes {
            state: "ready".into(),
            query: results.query,
            total_results: results.total_results,
            results: results.results,
        })),
        SearchOutcome::Failed(e) => {
            tracing::error!("Search error: {:?}", e);
            Err(BACKEND_UNAVAILABLE)
        }
        SearchOutcome::Skipped | SearchOutcome::Superseded => Ok(Json(SearchRes {
            state: "idle".into(),
            query: params.q.trim().to_string(),
            total_results: 0,
            results: SearchBuckets::default(),
        })),
    }
}

#[utoipa::path(
    get,
    path = "/api/site/filters/doctors",
    responses(
        (status = 200, description = "Doctor dropdown lists", body = FiltersRes)
    )
)]
/// Doctor location and specialization dropdowns, with built-in defaults if the backend fails.
#[axum::debug_handler]
pub(crate) async fn doctor_filters(State(state): State<AppState>) -> Json<FiltersRes> {
    let controller = FilteredListController::doctors(state.client.clone(), &state.cfg);
    Json(controller.remote_options().await.into())
}

#[utoipa::path(
    get,
    path = "/api/site/filters/treatments",
    responses(
        (status = 200, description = "Treatment dropdown lists", body = FiltersRes)
    )
)]
/// Treatment location and type dropdowns, with built-in defaults if the backend fails.
#[axum::debug_handler]
pub(crate) async fn treatment_filters(State(state): State<AppState>) -> Json<FiltersRes> {
    let controller = FilteredListController::treatments(state.client.clone(), &state.cfg);
    Json(controller.remote_options().await.into())
}

pub(crate) async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
